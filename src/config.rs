//! Configuration handling for texttemplate.
//! Models and syntax settings are read from JSON or YAML files.

use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::settings::SyntaxSettings;

/// Reads a configuration file.
///
/// # Errors
/// * `Error::IoError` if the file cannot be read
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    std::fs::read_to_string(path).map_err(Error::IoError)
}

/// Parses `content` as JSON first and as YAML second.
///
/// # Errors
/// * `Error::ConfigError` if neither format accepts the content
pub fn parse_config<T: DeserializeOwned>(content: &str) -> Result<T> {
    let json_error = match serde_json::from_str(content) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };
    serde_yaml::from_str(content).map_err(|yaml_error| {
        Error::ConfigError(format!(
            "Invalid configuration format: not JSON ({json_error}), not YAML ({yaml_error})"
        ))
    })
}

/// Loads the model a template is executed against.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Value> {
    parse_config(&load_config(path)?)
}

/// Loads syntax settings. Fields missing from the file keep their defaults;
/// an inconsistent combination is rejected.
pub fn load_syntax<P: AsRef<Path>>(path: P) -> Result<SyntaxSettings> {
    parse_config(&load_config(path)?)
}
