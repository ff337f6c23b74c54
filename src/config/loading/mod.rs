mod file_creation;

use std::{fs, path::Path};

use file_creation::create_default_config_file;
use tracing::{debug, instrument};

use super::Config;
use crate::{Result, WidgetError};

impl Config {
    /// Loads the configuration file at `path`.
    ///
    /// A commented default file is written first when none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be created or read
    /// - The TOML content is invalid
    /// - A value does not match the schema
    #[instrument]
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!("No config file found, writing defaults");
            create_default_config_file(path)?;
        }

        let content = fs::read_to_string(path).map_err(|e| WidgetError::io(e, path))?;
        Self::from_toml(&content).map_err(|e| match e {
            WidgetError::TomlParseError { details, .. } => {
                WidgetError::toml_parse(details, Some(path))
            }
            other => other,
        })
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `TomlParseError` on syntax or type errors.
    pub fn from_toml(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| WidgetError::toml_parse(e, None))
    }

    /// Loads the configuration from the default location.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined
    /// or the file cannot be loaded.
    pub fn load_default() -> Result<Config> {
        let path = super::ConfigPaths::main_config()?;
        Self::load(&path)
    }
}
