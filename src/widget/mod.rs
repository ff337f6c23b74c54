//! Now playing widget logic.
//!
//! [`NowPlayingController`] owns the playback state and runs it against a
//! [`MediaProvider`](crate::services::media::MediaProvider). The presentation
//! layer holds a [`WidgetHandle`] for reads and input, and renders frames
//! through a [`RenderSurface`].

mod controller;
mod estimator;
mod events;
mod gate;
mod render;

pub use controller::{NowPlayingController, PlayerState, WidgetHandle};
pub use estimator::{EstimatorState, PositionEstimator, RESYNC_THRESHOLD_MS, Reconciliation};
pub use events::WidgetEvent;
pub use gate::{CommandGate, GateState};
pub use render::{Frame, RenderSurface, TerminalSurface, format_clock, render_frame, run_render_loop};
