// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, StoryboardError};

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        StoryboardError::ConfigError(format!("failed to read config file {path:?}: {e}"))
    })?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the raw config, falling back to built-in defaults when the file does
/// not exist.
///
/// The fallback only applies when `explicit` is false, i.e. the user relied
/// on [`default_config_path`]. A path passed explicitly must exist.
pub fn load_or_default(path: impl AsRef<Path>, explicit: bool) -> Result<RawConfigFile> {
    let path = path.as_ref();
    if !explicit && !path.exists() {
        debug!(path = ?path, "no config file found; using built-in defaults");
        return Ok(RawConfigFile::default());
    }
    load_from_path(path)
}

/// Default config location: `Storyboard.toml` in the current working
/// directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Storyboard.toml")
}
