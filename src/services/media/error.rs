use super::PlayerId;

/// Errors that can occur while talking to the media provider
#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    /// No player is currently available to control
    #[error("No active media player")]
    NoActivePlayer,

    /// Player with the given ID was not found
    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    /// D-Bus communication error
    #[error("D-Bus operation failed: {0}")]
    DbusError(#[from] zbus::Error),

    /// Failed to initialize the media provider
    #[error("Failed to initialize media provider: {0}")]
    InitializationFailed(String),

    /// Failed to control the player
    #[error("Failed to control player: {0}")]
    ControlFailed(String),

    /// Volume level outside of `0.0..=1.0`
    #[error("Invalid volume level: {0}")]
    InvalidVolume(f64),

    /// Artwork exists but could not be loaded
    #[error("Artwork unavailable: {0}")]
    ArtworkUnavailable(String),
}

impl From<zbus::fdo::Error> for MediaError {
    fn from(error: zbus::fdo::Error) -> Self {
        MediaError::DbusError(error.into())
    }
}
