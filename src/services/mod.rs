/// Shared reactive primitives
pub mod common;
/// Media provider boundary and implementations
pub mod media;

pub use media::{MediaError, MediaProvider, MprisProvider};
