//! TOML configuration file I/O
//!
//! Loads and saves application settings under the user's configuration
//! directory. A missing file is not an error; defaults apply.

use crate::config::AppConfig;
use crate::error::{ConfigError, HstrayError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the default configuration directory
///
/// Returns `~/.config/hstray`, or the `HSTRAY_CONFIG_DIR` environment
/// variable if set (used by tests).
pub fn get_config_dir() -> Result<PathBuf, HstrayError> {
    if let Ok(config_dir) = std::env::var("HSTRAY_CONFIG_DIR") {
        return Ok(PathBuf::from(config_dir));
    }

    let home = std::env::var("HOME").map_err(|_| {
        HstrayError::Config(ConfigError::IoError {
            message: "HOME environment variable not set".to_string(),
        })
    })?;

    Ok(PathBuf::from(home).join(".config").join("hstray"))
}

/// Get the default configuration file path
pub fn get_config_path() -> Result<PathBuf, HstrayError> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load settings from the default path, falling back to defaults when the
/// file does not exist
pub fn load_or_default() -> Result<AppConfig, HstrayError> {
    let path = get_config_path()?;
    if !path.exists() {
        debug!(path = %path.display(), "no configuration file, using defaults");
        return Ok(AppConfig::default());
    }
    load_from_path(&path)
}

/// Load settings from a specific TOML file
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<AppConfig, HstrayError> {
    let contents = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => HstrayError::Config(ConfigError::LoadFailed {
            path: path.as_ref().to_string_lossy().to_string(),
        }),
        _ => HstrayError::Config(ConfigError::IoError {
            message: format!("Failed to read config file: {e}"),
        }),
    })?;

    let config: AppConfig = toml::from_str(&contents).map_err(|e| {
        HstrayError::Config(ConfigError::ValidationError {
            message: format!("Failed to parse config file: {e}"),
        })
    })?;

    config
        .validate()
        .map_err(|message| HstrayError::Config(ConfigError::ValidationError { message }))?;

    Ok(config)
}

/// Save settings to the default TOML file
pub fn save_config(config: &AppConfig) -> Result<(), HstrayError> {
    let path = get_config_path()?;
    save_to_path(config, &path)
}

/// Save settings to a specific TOML file
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), HstrayError> {
    let contents = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            HstrayError::Config(ConfigError::IoError {
                message: format!("Failed to create config directory: {e}"),
            })
        })?;
    }

    std::fs::write(path, contents).map_err(|e| {
        HstrayError::Config(ConfigError::IoError {
            message: format!("Failed to write config file: {e}"),
        })
    })?;

    Ok(())
}
