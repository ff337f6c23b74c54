//! Configuration schema definitions and loading.
//!
//! Defines the complete configuration structure for the widget. All
//! configurations are serializable to/from TOML format and every field
//! has a default, so an empty file is a valid configuration.

mod general;
mod loading;
mod paths;
mod provider;
mod widget;

#[cfg(test)]
mod tests;

pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;
pub use provider::ProviderConfig;
pub use widget::WidgetConfig;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Estimator and command gate timing.
    #[serde(default)]
    pub widget: WidgetConfig,

    /// Media provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Config {
    /// JSON schema describing the configuration file.
    pub fn schema() -> serde_json::Value {
        let schema = schemars::schema_for!(Config);
        serde_json::to_value(&schema).unwrap_or_default()
    }
}
