/// Media provider error types
pub mod error;
/// D-Bus MPRIS provider
pub mod mpris;
/// Provider trait
pub mod provider;
/// Playback, metadata and command types
pub mod types;

pub use error::MediaError;
pub use mpris::MprisProvider;
pub use provider::MediaProvider;
pub use types::*;
