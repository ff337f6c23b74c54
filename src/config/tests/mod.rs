//! Unit tests for config module
//!
//! Tests configuration types, defaults, and TOML handling.

#![allow(clippy::panic)]

use std::time::Duration;

use crate::WidgetError;
use crate::config::{Config, LogLevel};

#[test]
fn config_default_timings() {
    let config = Config::default();

    assert_eq!(config.widget.poll_interval(), Duration::from_secs(1));
    assert_eq!(config.widget.resync_threshold_ms, 1500);
    assert_eq!(config.widget.settle_delay(), Duration::from_millis(500));
    assert_eq!(config.widget.seek_debounce(), Duration::from_millis(300));
    assert!(config.widget.prefer_push);
    assert_eq!(config.widget.push_poll_interval(), Duration::from_secs(5));
    assert_eq!(config.provider.skip_step_ms, 10_000);
    assert_eq!(config.general.log_level, LogLevel::Info);
}

#[test]
fn config_serialize_toml() {
    let config = Config::default();

    let toml_str = toml::to_string(&config).unwrap();
    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[widget]"));
    assert!(toml_str.contains("[provider]"));
}

#[test]
fn config_partial_toml_keeps_defaults() {
    let toml_str = r#"
        [general]
        log_level = "debug"

        [widget]
        settle_delay_ms = 750

        [provider]
        ignored_players = ["firefox"]
    "#;

    let config = Config::from_toml(toml_str).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.widget.settle_delay_ms, 750);
    assert_eq!(config.widget.seek_debounce_ms, 300);
    assert_eq!(config.provider.ignored_players, vec!["firefox".to_string()]);
    assert_eq!(config.provider.skip_step_ms, 10_000);
}

#[test]
fn config_empty_toml() {
    let config = Config::from_toml("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn config_rejects_wrong_types() {
    let result = Config::from_toml("[widget]\npoll_interval_ms = \"fast\"\n");

    match result {
        Err(WidgetError::TomlParseError { location, .. }) => assert_eq!(location, "string"),
        other => panic!("expected TomlParseError, got {other:?}"),
    }
}

#[test]
fn config_serialize_roundtrip() {
    let original = Config::default();
    let toml_str = toml::to_string(&original).unwrap();
    let deserialized: Config = toml::from_str(&toml_str).unwrap();

    assert_eq!(original, deserialized);
}

#[test]
fn log_level_display_matches_filter_names() {
    assert_eq!(LogLevel::Error.to_string(), "error");
    assert_eq!(LogLevel::Trace.to_string(), "trace");
}

#[test]
fn zero_intervals_are_clamped() {
    let config = Config::from_toml("[widget]\npoll_interval_ms = 0\nframe_interval_ms = 0\n").unwrap();

    assert_eq!(config.widget.poll_interval(), Duration::from_millis(1));
    assert_eq!(config.widget.frame_interval(), Duration::from_millis(1));
}

#[test]
fn schema_lists_sections() {
    let schema = Config::schema();
    let properties = schema.get("properties").unwrap();

    assert!(properties.get("general").is_some());
    assert!(properties.get("widget").is_some());
    assert!(properties.get("provider").is_some());
}
