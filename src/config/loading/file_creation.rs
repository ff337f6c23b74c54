use std::{fs, path::Path};

use crate::{Result, WidgetError, config::Config};

const HEADER: &str = "# nowplaying configuration file\n# Every value below is the default.\n\n";

/// Creates a default configuration file, including its parent directory.
pub fn create_default_config_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| WidgetError::io(e, parent))?;
    }

    let body = toml::to_string_pretty(&Config::default()).map_err(|e| {
        WidgetError::ConfigValidation {
            component: "default config".to_string(),
            details: e.to_string(),
        }
    })?;

    fs::write(path, format!("{HEADER}{body}")).map_err(|e| WidgetError::io(e, path))?;

    Ok(())
}
