use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Media provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    /// List of player bus name patterns to ignore during discovery
    pub ignored_players: Vec<String>,

    /// Step used by rewind and fast-forward, in milliseconds.
    pub skip_step_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            ignored_players: Vec::new(),
            skip_step_ms: 10_000,
        }
    }
}
