//! MPRIS implementation of the media provider over the D-Bus session bus.

mod metadata;
mod priority;
mod provider;
mod proxy;

pub use priority::PriorityStack;
pub use provider::MprisProvider;
pub use proxy::MediaPlayer2PlayerProxy;

/// Bus name prefix shared by all MPRIS players.
pub const MPRIS_BUS_PREFIX: &str = "org.mpris.MediaPlayer2.";

/// Object path every MPRIS player exports.
pub const MPRIS_OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

/// Convert MPRIS microseconds to milliseconds, flooring negatives at zero.
pub(crate) fn micros_to_ms(micros: i64) -> u64 {
    micros.max(0) as u64 / 1_000
}

/// Convert milliseconds to MPRIS microseconds.
pub(crate) fn ms_to_micros(ms: u64) -> i64 {
    i64::try_from(ms.saturating_mul(1_000)).unwrap_or(i64::MAX)
}
