//! Unit tests for CLI module
//!
//! Tests argument parsing, seek position parsing and output formatting.
//! No media players are contacted.

use clap::Parser;

use crate::cli::{Cli, CliError, MediaCommand, formatting::format_media_state, parse_position};
use crate::services::media::{MediaMetadata, MediaState, PlaybackState};

const TRACK: u64 = 240_000;

#[test]
fn position_in_seconds() {
    assert_eq!(parse_position("30", 0, TRACK).unwrap(), 30_000);
    assert_eq!(parse_position(" 0 ", 5_000, TRACK).unwrap(), 0);
}

#[test]
fn position_in_minutes_and_seconds() {
    assert_eq!(parse_position("1:30", 0, TRACK).unwrap(), 90_000);
    assert_eq!(parse_position("0:05", 0, TRACK).unwrap(), 5_000);
}

#[test]
fn position_rejects_seconds_over_59() {
    let err = parse_position("1:60", 0, TRACK).unwrap_err();
    assert!(matches!(err, CliError::InvalidArgument { .. }));
}

#[test]
fn position_as_percentage() {
    assert_eq!(parse_position("50%", 0, TRACK).unwrap(), 120_000);
    assert_eq!(parse_position("100%", 0, TRACK).unwrap(), TRACK);
}

#[test]
fn percentage_needs_known_length() {
    assert!(parse_position("50%", 0, 0).is_err());
    assert!(parse_position("150%", 0, TRACK).is_err());
}

#[test]
fn relative_positions_saturate() {
    assert_eq!(parse_position("+10", 20_000, TRACK).unwrap(), 30_000);
    assert_eq!(parse_position("-10", 20_000, TRACK).unwrap(), 10_000);
    assert_eq!(parse_position("-60", 20_000, TRACK).unwrap(), 0);
}

#[test]
fn position_clamped_to_track_length() {
    assert_eq!(parse_position("9999", 0, TRACK).unwrap(), TRACK);
    assert_eq!(parse_position("+9999", 0, 0).unwrap(), 9_999_000);
}

#[test]
fn oversized_position_is_rejected() {
    for input in ["999999999999999999:00", "18446744073709551615", "307445734561825860:59"] {
        let err = parse_position(input, 0, TRACK).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }), "{input}");
    }
}

#[test]
fn garbage_position_is_rejected() {
    for input in ["abc", "1:2:3", "+x", "", "%"] {
        assert!(parse_position(input, 0, TRACK).is_err(), "{input}");
    }
}

#[test]
fn parses_seek_with_negative_offset() {
    let cli = Cli::try_parse_from(["nowplaying", "seek", "-15"]).unwrap();
    assert_eq!(
        cli.command,
        MediaCommand::Seek {
            position: "-15".to_string()
        }
    );
}

#[test]
fn parses_global_config_flag_after_command() {
    let cli = Cli::try_parse_from(["nowplaying", "status", "--json", "--config", "/tmp/x.toml"])
        .unwrap();

    assert_eq!(cli.command, MediaCommand::Status { json: true });
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/x.toml")));
}

#[test]
fn parses_kebab_case_commands() {
    let cli = Cli::try_parse_from(["nowplaying", "fast-forward"]).unwrap();
    assert_eq!(cli.command, MediaCommand::FastForward);

    let cli = Cli::try_parse_from(["nowplaying", "volume", "0.5"]).unwrap();
    assert_eq!(cli.command, MediaCommand::Volume { level: Some(0.5) });
}

#[test]
fn media_state_text_includes_track_and_time() {
    let state = MediaState {
        source_app: "spotify".to_string(),
        state: PlaybackState::Playing,
        metadata: Some(MediaMetadata {
            title: "Song".to_string(),
            artist: "Band".to_string(),
            album: Some("Record".to_string()),
            artwork_url: None,
            duration_ms: Some(200_000),
            position_ms: Some(65_000),
        }),
    };

    let text = format_media_state(&state);

    assert!(text.contains("spotify"));
    assert!(text.contains("Song"));
    assert!(text.contains("Record"));
    assert!(text.contains("1:05 / 3:20"));
}

#[test]
fn media_state_without_metadata() {
    let state = MediaState {
        source_app: "vlc".to_string(),
        state: PlaybackState::Stopped,
        metadata: None,
    };

    assert!(format_media_state(&state).contains("(no metadata)"));
}
