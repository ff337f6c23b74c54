//! Command-line interface.
//!
//! `watch` runs the widget in the terminal; the other commands talk to the
//! active player once and exit.

mod args;
pub mod formatting;
mod position;
mod service;
mod types;

pub use args::{Cli, MediaCommand};
pub use position::parse_position;
pub use service::CliService;
pub use types::{CliError, CommandResult};

#[cfg(test)]
mod tests;
