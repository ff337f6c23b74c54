//! Client-side playback position estimation.
//!
//! Providers report position coarsely (about once a second, or whenever a
//! push event happens to fire) and with IPC latency baked in. The estimator
//! keeps an anchor `(instant, position)` and extrapolates from it, so the
//! progress display can advance smoothly at frame rate. Snapshots only move
//! the anchor when they disagree with the estimate by more than the resync
//! threshold, when play state flips, or when the track changes.

use tokio::time::Instant;
use tracing::trace;

use crate::services::media::PlaybackSnapshot;

/// Default drift, in milliseconds, above which a snapshot resyncs the anchor.
pub const RESYNC_THRESHOLD_MS: u64 = 1500;

/// Everything needed to evaluate the live position.
///
/// `anchor_position_ms` was the true position at `anchor_wall_clock`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimatorState {
    /// When the anchor position was true
    pub anchor_wall_clock: Instant,
    /// Position at the anchor instant, in milliseconds
    pub anchor_position_ms: u64,
    /// Whether the position advances with the clock
    pub is_playing: bool,
    /// Track length in milliseconds, the upper clamp bound
    pub duration_ms: u64,
    /// Title of the track the anchor belongs to
    pub current_title: Option<String>,
}

impl EstimatorState {
    /// Startup state: position zero, paused, no track.
    pub fn new(now: Instant) -> Self {
        Self {
            anchor_wall_clock: now,
            anchor_position_ms: 0,
            is_playing: false,
            duration_ms: 0,
            current_title: None,
        }
    }

    /// Live position at `now`, clamped to `[0, duration_ms]`.
    ///
    /// An instant earlier than the anchor counts as no elapsed time.
    pub fn estimate_at(&self, now: Instant) -> u64 {
        let elapsed_ms = if self.is_playing {
            u64::try_from(
                now.saturating_duration_since(self.anchor_wall_clock)
                    .as_millis(),
            )
            .unwrap_or(u64::MAX)
        } else {
            0
        };

        self.anchor_position_ms
            .saturating_add(elapsed_ms)
            .min(self.duration_ms)
    }

    fn reanchor(&mut self, position_ms: u64, now: Instant) {
        self.anchor_position_ms = position_ms;
        self.anchor_wall_clock = now;
    }
}

/// What a snapshot did to the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// Title differs from the previous one; fires once per distinct title
    pub track_changed: bool,
    /// Playing flag flipped
    pub play_state_changed: bool,
    /// Anchor was moved to the snapshot position
    pub resynced: bool,
    /// Distance between the snapshot and the pre-snapshot estimate
    pub drift_ms: u64,
}

/// Anchor-and-offset position estimator.
#[derive(Debug, Clone)]
pub struct PositionEstimator {
    state: EstimatorState,
    resync_threshold_ms: u64,
}

impl PositionEstimator {
    /// Creates an estimator in its startup state.
    pub fn new(resync_threshold_ms: u64, now: Instant) -> Self {
        Self {
            state: EstimatorState::new(now),
            resync_threshold_ms,
        }
    }

    /// Current state, for publication to readers.
    pub fn state(&self) -> &EstimatorState {
        &self.state
    }

    /// Whether the estimate is currently advancing.
    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Live position at `now`. Pure; safe to call every frame.
    pub fn estimate_now_ms(&self, now: Instant) -> u64 {
        self.state.estimate_at(now)
    }

    /// Merge an authoritative snapshot received at `now`.
    pub fn reconcile(&mut self, snapshot: &PlaybackSnapshot, now: Instant) -> Reconciliation {
        let expected = self.estimate_now_ms(now);
        let track_changed = self.state.current_title.as_deref() != Some(snapshot.title.as_str());
        let play_state_changed = snapshot.is_playing != self.state.is_playing;
        let drift_ms = snapshot.position_ms.abs_diff(expected);

        let resynced =
            drift_ms > self.resync_threshold_ms || play_state_changed || track_changed;
        if resynced {
            self.state.reanchor(snapshot.position_ms, now);
        }

        self.state.is_playing = snapshot.is_playing;

        if track_changed {
            self.state.current_title = Some(snapshot.title.clone());
            self.state.duration_ms = snapshot.duration_ms;
        }

        trace!(
            expected,
            position_ms = snapshot.position_ms,
            drift_ms,
            resynced,
            "Reconciled snapshot"
        );

        Reconciliation {
            track_changed,
            play_state_changed,
            resynced,
            drift_ms,
        }
    }

    /// Optimistically jump to `position_ms`, keeping the play state.
    pub fn apply_user_seek(&mut self, position_ms: u64, now: Instant) {
        self.state.reanchor(position_ms, now);
    }

    /// Optimistically start or freeze the clock at the current estimate.
    ///
    /// Returns whether the play state changed.
    pub fn apply_user_transport(&mut self, playing: bool, now: Instant) -> bool {
        let position_ms = self.estimate_now_ms(now);
        self.state.reanchor(position_ms, now);

        let changed = self.state.is_playing != playing;
        self.state.is_playing = playing;
        changed
    }
}
