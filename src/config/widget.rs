use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Timing settings for the now-playing controller.
///
/// All values are in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct WidgetConfig {
    /// How often the provider is polled for a snapshot.
    pub poll_interval_ms: u64,

    /// Drift above which a snapshot's position replaces the local estimate.
    pub resync_threshold_ms: u64,

    /// Time after dispatching a command before snapshots are trusted again.
    pub settle_delay_ms: u64,

    /// Quiet window that coalesces repeated seek input into one call.
    pub seek_debounce_ms: u64,

    /// Render tick interval for the progress display.
    pub frame_interval_ms: u64,

    /// Use the provider's push updates when available.
    pub prefer_push: bool,

    /// Polling interval while push updates are active.
    ///
    /// Push streams only fire on property changes, so a slow poll keeps
    /// position and missed changes in sync.
    pub push_poll_interval_ms: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            resync_threshold_ms: 1500,
            settle_delay_ms: 500,
            seek_debounce_ms: 300,
            frame_interval_ms: 16,
            prefer_push: true,
            push_poll_interval_ms: 5000,
        }
    }
}

impl WidgetConfig {
    /// Snapshot polling interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Polling interval while push updates are active.
    pub fn push_poll_interval(&self) -> Duration {
        Duration::from_millis(self.push_poll_interval_ms.max(1))
    }

    /// Delay after a command before the gate reopens.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Seek coalescing window.
    pub fn seek_debounce(&self) -> Duration {
        Duration::from_millis(self.seek_debounce_ms)
    }

    /// Render tick interval.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}
