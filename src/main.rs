//! `nowplaying` binary.

use std::process;

use clap::Parser;
use nowplaying::{
    cli::{Cli, CliError, CliService, MediaCommand, formatting::format_error},
    config::Config,
    tracing_config,
};
use tracing::{Level, info, span};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}", format_error(&format!("Error: {e}")));
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    let tracing_result = if cli.log_file {
        tracing_config::init_with_file(&config.general.log_level)
    } else {
        tracing_config::init(&config.general.log_level)
    };
    if let Err(e) = tracing_result {
        eprintln!("{}", format_error(&format!("Failed to initialize logging: {e}")));
    }

    let _span = span!(Level::INFO, "nowplaying").entered();
    if cli.command == MediaCommand::Watch {
        info!("Starting now playing widget");
    }

    let output = CliService::new(config).execute(cli.command).await?;
    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}
