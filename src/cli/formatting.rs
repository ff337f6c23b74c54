//! Formatting utilities for CLI output.

use crate::{
    services::media::{MediaState, PlaybackState},
    widget::format_clock,
};

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";

    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Formats a labelled value, label dimmed
pub fn format_field(label: &str, value: &str) -> String {
    format!("{}{label:>8}{} {value}", Colors::DIM, Colors::RESET)
}

/// Human-readable rendering of a media state.
pub fn format_media_state(state: &MediaState) -> String {
    let status_color = match state.state {
        PlaybackState::Playing => Colors::GREEN,
        _ => Colors::DIM,
    };

    let mut lines = vec![format!(
        "{}{}{}{} {}{}{}",
        Colors::BOLD,
        Colors::CYAN,
        state.source_app,
        Colors::RESET,
        status_color,
        state.state,
        Colors::RESET
    )];

    let Some(metadata) = &state.metadata else {
        lines.push(format_field("track", "(no metadata)"));
        return lines.join("\n");
    };

    lines.push(format_field("title", &metadata.title));
    lines.push(format_field("artist", &metadata.artist));
    if let Some(album) = &metadata.album {
        lines.push(format_field("album", album));
    }

    let position = metadata.position_ms.unwrap_or(0);
    let time = match metadata.duration_ms {
        Some(duration) if duration > 0 => {
            format!("{} / {}", format_clock(position), format_clock(duration))
        }
        _ => format_clock(position),
    };
    lines.push(format_field("time", &time));

    lines.join("\n")
}
