//! Config file loading

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::error::LoaderError;

/// Load the structured config record.
///
/// No path means the built-in defaults. An explicit path must exist and
/// must parse; there is no discovery and no soft failure. Total: always a
/// `Config` or a typed error.
pub fn load_config(path: Option<&Path>) -> Result<Config, LoaderError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    if !path.exists() {
        return Err(LoaderError::Configuration(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).map_err(|err| {
        LoaderError::Configuration(format!(
            "Failed reading config file {}: {err}",
            path.display()
        ))
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    let config = match ext.as_str() {
        "toml" => toml::from_str(&content).map_err(|err| {
            LoaderError::Configuration(format!("Invalid TOML config {}: {err}", path.display()))
        })?,
        // YAML is the native format; anything but .toml parses as YAML.
        _ => serde_yaml::from_str(&content).map_err(|err| {
            LoaderError::Configuration(format!("Invalid YAML config {}: {err}", path.display()))
        })?,
    };

    debug!(config_file = %path.display(), "loaded config file");
    Ok(config)
}
