use crate::services::media::{ArtworkRef, TrackMetadata, Volume};

/// Discrete notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// A snapshot with a new title was merged
    TrackChanged(TrackMetadata),

    /// Playing flag flipped, by snapshot or by user command
    PlayStateChanged {
        /// New playing flag
        playing: bool,
    },

    /// Artwork for the current track arrived, or the track has none
    ArtworkChanged(Option<ArtworkRef>),

    /// Volume changed
    VolumeChanged(Volume),
}
