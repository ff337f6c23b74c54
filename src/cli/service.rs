use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    config::Config,
    services::media::{MediaProvider, MprisProvider, TransportCommand, Volume},
    widget::{NowPlayingController, TerminalSurface, format_clock, run_render_loop},
};

use super::{CliError, CommandResult, MediaCommand, formatting::format_media_state, parse_position};

/// Runs CLI commands against the session's media players.
pub struct CliService {
    config: Config,
}

impl CliService {
    /// Creates a CLI service using `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes a command, returning the text to print.
    ///
    /// # Errors
    /// Returns `CliError::ServiceError` when no player is reachable or a
    /// player call fails, and `CliError::InvalidArgument` for bad input.
    #[instrument(skip(self))]
    pub async fn execute(&self, command: MediaCommand) -> CommandResult {
        match command {
            MediaCommand::Schema => serde_json::to_string_pretty(&Config::schema()).map_err(|e| {
                CliError::ServiceError {
                    service: "Schema".to_string(),
                    details: e.to_string(),
                }
            }),
            MediaCommand::Watch => self.watch().await,
            MediaCommand::Status { json } => self.status(json).await,
            MediaCommand::Play => self.transport(TransportCommand::Play).await,
            MediaCommand::Pause => self.transport(TransportCommand::Pause).await,
            MediaCommand::Next => self.transport(TransportCommand::Next).await,
            MediaCommand::Previous => self.transport(TransportCommand::Previous).await,
            MediaCommand::Rewind => self.transport(TransportCommand::Rewind).await,
            MediaCommand::FastForward => self.transport(TransportCommand::FastForward).await,
            MediaCommand::Seek { position } => self.seek(&position).await,
            MediaCommand::Volume { level } => self.volume(level).await,
        }
    }

    async fn provider(&self) -> Result<MprisProvider, CliError> {
        Ok(MprisProvider::connect(self.config.provider.clone()).await?)
    }

    async fn watch(&self) -> CommandResult {
        let provider = Arc::new(self.provider().await?);
        let (handle, controller) = NowPlayingController::spawn(provider, self.config.widget.clone());

        let render = tokio::spawn(run_render_loop(
            handle.clone(),
            TerminalSurface::stdout(handle.clone()),
            self.config.widget.frame_interval(),
        ));

        tokio::signal::ctrl_c()
            .await
            .map_err(|e| CliError::ServiceError {
                service: "Signal".to_string(),
                details: e.to_string(),
            })?;

        info!("Interrupted, shutting down");
        handle.shutdown();
        let _ = controller.await;
        let _ = render.await;

        Ok(String::new())
    }

    async fn status(&self, json: bool) -> CommandResult {
        let provider = self.provider().await?;
        let Some(state) = provider.media_state().await? else {
            return Ok("No active media player".to_string());
        };

        if json {
            return serde_json::to_string_pretty(&state).map_err(|e| CliError::ServiceError {
                service: "Media".to_string(),
                details: e.to_string(),
            });
        }

        Ok(format_media_state(&state))
    }

    async fn transport(&self, command: TransportCommand) -> CommandResult {
        let provider = self.provider().await?;
        provider.execute(command).await?;

        Ok(format!("Sent {command}"))
    }

    async fn seek(&self, position: &str) -> CommandResult {
        let provider = self.provider().await?;
        let metadata = provider
            .media_state()
            .await?
            .and_then(|state| state.metadata)
            .unwrap_or_default();

        let target = parse_position(
            position,
            metadata.position_ms.unwrap_or(0),
            metadata.duration_ms.unwrap_or(0),
        )?;
        provider.seek(target).await?;

        Ok(format!("Seeked to {}", format_clock(target)))
    }

    async fn volume(&self, level: Option<f64>) -> CommandResult {
        let provider = self.provider().await?;

        let Some(level) = level else {
            let volume = provider.volume().await?;
            return Ok(format!("Volume: {}%", volume.percent()));
        };

        let volume =
            Volume::try_new(level).map_err(|e| CliError::invalid("level", e.to_string()))?;
        provider.set_volume(volume).await?;

        Ok(format!("Volume set to {}%", volume.percent()))
    }
}
