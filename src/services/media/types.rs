use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::MediaError;

/// Unique identifier for a media player
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a PlayerId from a D-Bus bus name
    pub fn from_bus_name(bus_name: &str) -> Self {
        Self(bus_name.to_string())
    }

    /// Get the D-Bus bus name
    pub fn bus_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Current playback state reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaybackState {
    /// Player is currently playing
    Playing,

    /// Player is paused
    Paused,

    /// Player is stopped
    #[default]
    Stopped,
}

impl From<&str> for PlaybackState {
    fn from(status: &str) -> Self {
        match status {
            "Playing" => Self::Playing,
            "Paused" => Self::Paused,
            _ => Self::Stopped,
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Stopped => "Stopped",
        };
        f.write_str(label)
    }
}

/// Track metadata as delivered by the provider.
///
/// Position and duration are optional because not every player reports
/// them; consumers treat a missing value as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MediaMetadata {
    /// Track title
    pub title: String,

    /// Track artist(s)
    pub artist: String,

    /// Album name
    pub album: Option<String>,

    /// Artwork URL as advertised by the player
    pub artwork_url: Option<String>,

    /// Track length in milliseconds
    pub duration_ms: Option<u64>,

    /// Playback position in milliseconds at the time of the read
    pub position_ms: Option<u64>,
}

/// Result of a `media_state` call and payload of a push update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaState {
    /// Player the state was read from
    pub source_app: String,

    /// Playback state
    pub state: PlaybackState,

    /// Track metadata; absent when the player exposes none
    pub metadata: Option<MediaMetadata>,
}

/// A single authoritative playback reading.
///
/// Immutable once received and superseded by the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    /// Track title
    pub title: String,
    /// Track artist(s)
    pub artist: String,
    /// Position in milliseconds
    pub position_ms: u64,
    /// Track length in milliseconds, 0 when unknown
    pub duration_ms: u64,
    /// Whether the player reports `Playing`
    pub is_playing: bool,
}

impl PlaybackSnapshot {
    /// Builds a snapshot from a provider state.
    ///
    /// Returns `None` when the state carries no metadata; such readings are
    /// ignored wholesale.
    pub fn from_state(state: &MediaState) -> Option<Self> {
        let metadata = state.metadata.as_ref()?;

        Some(Self {
            title: metadata.title.clone(),
            artist: metadata.artist.clone(),
            position_ms: metadata.position_ms.unwrap_or(0),
            duration_ms: metadata.duration_ms.unwrap_or(0),
            is_playing: state.state == PlaybackState::Playing,
        })
    }
}

/// Track text shown by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TrackMetadata {
    /// Track title
    pub title: String,

    /// Track artist(s)
    pub artist: String,

    /// Album name, if known
    pub album: Option<String>,
}

impl From<&MediaMetadata> for TrackMetadata {
    fn from(metadata: &MediaMetadata) -> Self {
        Self {
            title: metadata.title.clone(),
            artist: metadata.artist.clone(),
            album: metadata.album.clone(),
        }
    }
}

/// Reference to track artwork: a URL or a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkRef(pub String);

impl ArtworkRef {
    /// The URL or data URI.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Player volume in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Volume(f64);

impl Volume {
    /// Creates a volume, clamping into `0.0..=1.0`. NaN becomes silence.
    pub fn new(level: f64) -> Self {
        if level.is_nan() {
            return Self(0.0);
        }
        Self(level.clamp(0.0, 1.0))
    }

    /// Creates a volume, rejecting levels outside `0.0..=1.0`.
    ///
    /// # Errors
    /// Returns `MediaError::InvalidVolume` for out-of-range or NaN levels.
    pub fn try_new(level: f64) -> Result<Self, MediaError> {
        if (0.0..=1.0).contains(&level) {
            Ok(Self(level))
        } else {
            Err(MediaError::InvalidVolume(level))
        }
    }

    /// Volume as a whole percentage.
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl Deref for Volume {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A command dispatched to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCommand {
    /// Start playback
    Play,
    /// Pause playback
    Pause,
    /// Go to previous track
    Previous,
    /// Skip to next track
    Next,
    /// Jump backwards by the provider's skip step
    Rewind,
    /// Jump forwards by the provider's skip step
    FastForward,
    /// Seek to an absolute position in milliseconds
    Seek(u64),
}

impl fmt::Display for TransportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Play => f.write_str("play"),
            Self::Pause => f.write_str("pause"),
            Self::Previous => f.write_str("previous"),
            Self::Next => f.write_str("next"),
            Self::Rewind => f.write_str("rewind"),
            Self::FastForward => f.write_str("fast-forward"),
            Self::Seek(position_ms) => write!(f, "seek({position_ms}ms)"),
        }
    }
}

/// Transport input coming from the presentation layer.
///
/// Same as [`TransportCommand`] minus seeking, plus a toggle that is
/// resolved against the current play state when the input is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserTransport {
    /// Play if paused, pause if playing
    TogglePlayback,
    /// Start playback
    Play,
    /// Pause playback
    Pause,
    /// Go to previous track
    Previous,
    /// Skip to next track
    Next,
    /// Jump backwards
    Rewind,
    /// Jump forwards
    FastForward,
}

impl UserTransport {
    /// Resolves the input to the command to dispatch.
    pub fn resolve(self, is_playing: bool) -> TransportCommand {
        match self {
            Self::TogglePlayback if is_playing => TransportCommand::Pause,
            Self::TogglePlayback => TransportCommand::Play,
            Self::Play => TransportCommand::Play,
            Self::Pause => TransportCommand::Pause,
            Self::Previous => TransportCommand::Previous,
            Self::Next => TransportCommand::Next,
            Self::Rewind => TransportCommand::Rewind,
            Self::FastForward => TransportCommand::FastForward,
        }
    }
}
