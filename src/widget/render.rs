//! Frame-rate rendering of the live position.
//!
//! The render tick only reads published state; it never blocks on the
//! provider and never mutates the controller.

use std::{
    io::{self, Write},
    time::Duration,
};

use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, instrument};

use super::WidgetHandle;

/// One rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Live position in milliseconds
    pub position_ms: u64,
    /// Track length in milliseconds, never 0
    pub duration_ms: u64,
    /// `position_ms / duration_ms`, in `0.0..=1.0`
    pub progress: f64,
    /// Whether playback is advancing
    pub playing: bool,
}

impl Frame {
    /// Evaluate the handle's published state at `now`.
    ///
    /// Returns `None` when the track length is unknown.
    pub fn capture(handle: &WidgetHandle, now: Instant) -> Option<Self> {
        let state = handle.estimator_state();
        if state.duration_ms == 0 {
            return None;
        }

        let position_ms = state.estimate_at(now);
        Some(Self {
            position_ms,
            duration_ms: state.duration_ms,
            progress: position_ms as f64 / state.duration_ms as f64,
            playing: state.is_playing,
        })
    }
}

/// Something that can show a progress frame.
pub trait RenderSurface {
    /// Whether the surface is currently attached. Unmounted surfaces are skipped.
    fn is_mounted(&self) -> bool;

    /// Draw one frame.
    fn paint(&mut self, frame: &Frame);
}

/// Paint one frame if the surface is mounted and the track length is known.
///
/// Returns whether anything was painted.
pub fn render_frame(handle: &WidgetHandle, surface: &mut impl RenderSurface, now: Instant) -> bool {
    if !surface.is_mounted() {
        return false;
    }

    match Frame::capture(handle, now) {
        Some(frame) => {
            surface.paint(&frame);
            true
        }
        None => false,
    }
}

/// Render at `frame_interval` until the controller stops.
#[instrument(skip_all)]
pub async fn run_render_loop(
    handle: WidgetHandle,
    mut surface: impl RenderSurface,
    frame_interval: Duration,
) {
    let mut ticker = interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while handle.is_running() {
        let now = ticker.tick().await;
        render_frame(&handle, &mut surface, now);
    }

    debug!("Render loop stopped");
}

/// Format milliseconds as `m:ss`, or `h:mm:ss` past an hour.
pub fn format_clock(ms: u64) -> String {
    let total = ms / 1000;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Single status line on a terminal, redrawn in place.
///
/// Only repaints when the visible text would change.
pub struct TerminalSurface<W: Write = io::Stdout> {
    handle: WidgetHandle,
    out: W,
    last_line: Option<String>,
}

impl TerminalSurface {
    /// Surface writing to stdout.
    pub fn stdout(handle: WidgetHandle) -> Self {
        Self::new(handle, io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    /// Surface writing to `out`.
    pub fn new(handle: WidgetHandle, out: W) -> Self {
        Self {
            handle,
            out,
            last_line: None,
        }
    }

    /// The writer, for inspection.
    pub fn output(&self) -> &W {
        &self.out
    }

    fn line(&self, frame: &Frame) -> String {
        let track = self
            .handle
            .current_track_metadata()
            .map(|meta| {
                if meta.artist.is_empty() {
                    meta.title
                } else {
                    format!("{} - {}", meta.title, meta.artist)
                }
            })
            .unwrap_or_default();
        let icon = if frame.playing { "▶" } else { "⏸" };

        format!(
            "{track} [{} / {}] {icon}",
            format_clock(frame.position_ms),
            format_clock(frame.duration_ms)
        )
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn is_mounted(&self) -> bool {
        true
    }

    fn paint(&mut self, frame: &Frame) {
        let line = self.line(frame);
        if self.last_line.as_deref() == Some(line.as_str()) {
            return;
        }

        let written = write!(self.out, "\r\x1b[2K{line}").and_then(|()| self.out.flush());
        if let Err(e) = written {
            debug!(error = %e, "Failed to write status line");
        }
        self.last_line = Some(line);
    }
}
