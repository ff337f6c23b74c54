//! Now playing widget for MPRIS media players.
//!
//! Shows the current track with a smoothly advancing progress position and
//! forwards transport, seek and volume input to the player. The core pieces:
//!
//! - [`widget::PositionEstimator`] extrapolates the live position between
//!   coarse provider readings
//! - [`widget::CommandGate`] holds provider readings off while a user
//!   command settles, and coalesces seek gestures
//! - [`widget::NowPlayingController`] runs both against a
//!   [`services::media::MediaProvider`]
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use nowplaying::{
//!     config::Config,
//!     services::MprisProvider,
//!     widget::NowPlayingController,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_default()?;
//! let provider = Arc::new(MprisProvider::connect(config.provider).await?);
//! let (handle, _task) = NowPlayingController::spawn(provider, config.widget);
//!
//! println!("{} ms", handle.current_estimate_ms());
//! # Ok(())
//! # }
//! ```

/// Command-line interface.
pub mod cli;

/// Configuration schema definitions and loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Media provider boundary and its MPRIS implementation.
pub mod services;

/// Logging setup.
pub mod tracing_config;

/// Position estimation, command gating and rendering.
pub mod widget;

/// Re-exported core types for convenience.
pub use core::{Result, WidgetError};
