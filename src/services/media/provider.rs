use async_trait::async_trait;
use futures::stream::BoxStream;

use super::{ArtworkRef, MediaError, MediaState, TransportCommand, Volume};

/// The host media provider.
///
/// Request/response calls plus an optional push channel. Implementations
/// must be cheap to share between the controller and the tasks it spawns
/// for each call.
#[async_trait]
pub trait MediaProvider: Send + Sync + 'static {
    /// Read the current playback state.
    ///
    /// `Ok(None)` means no player is available.
    async fn media_state(&self) -> Result<Option<MediaState>, MediaError>;

    /// Fetch artwork for the current track.
    async fn artwork(&self) -> Result<Option<ArtworkRef>, MediaError>;

    /// Start playback.
    async fn play(&self) -> Result<(), MediaError>;

    /// Pause playback.
    async fn pause(&self) -> Result<(), MediaError>;

    /// Go to the previous track.
    async fn previous(&self) -> Result<(), MediaError>;

    /// Skip to the next track.
    async fn next(&self) -> Result<(), MediaError>;

    /// Jump backwards within the track.
    async fn rewind(&self) -> Result<(), MediaError>;

    /// Jump forwards within the track.
    async fn fast_forward(&self) -> Result<(), MediaError>;

    /// Seek to an absolute position.
    async fn seek(&self, position_ms: u64) -> Result<(), MediaError>;

    /// Read the player volume.
    async fn volume(&self) -> Result<Volume, MediaError>;

    /// Set the player volume.
    async fn set_volume(&self, volume: Volume) -> Result<(), MediaError>;

    /// Push channel of state updates, if the provider has one.
    fn updates(&self) -> Option<BoxStream<'static, MediaState>> {
        None
    }

    /// Dispatch a transport command to the matching call.
    async fn execute(&self, command: TransportCommand) -> Result<(), MediaError> {
        match command {
            TransportCommand::Play => self.play().await,
            TransportCommand::Pause => self.pause().await,
            TransportCommand::Previous => self.previous().await,
            TransportCommand::Next => self.next().await,
            TransportCommand::Rewind => self.rewind().await,
            TransportCommand::FastForward => self.fast_forward().await,
            TransportCommand::Seek(position_ms) => self.seek(position_ms).await,
        }
    }
}
