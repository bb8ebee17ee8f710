//! Configuration module
//!
//! Handles loading and saving application settings from a TOML file. The
//! session controller itself persists nothing; everything here is optional
//! tuning with defaults matching the upstream behavior.

use serde::{Deserialize, Serialize};

pub mod toml_config;

pub use toml_config::{get_config_dir, get_config_path, load_or_default, save_config};

/// Application configuration
///
/// The settle delays preserve the upstream 2 s / 3 s asymmetry as tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// External VPN command to invoke
    #[serde(default = "default_command")]
    pub command: String,

    /// Endpoint for the network reachability probe
    #[serde(default = "default_probe_url")]
    pub probe_url: String,

    /// Reachability probe timeout in seconds
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Default interface language ("tr" or "en")
    #[serde(default = "default_language")]
    pub language: String,

    /// Pause after a plain connect before re-querying status
    #[serde(default = "default_connect_settle")]
    pub connect_settle_secs: u64,

    /// Pause after a location connect before re-querying status
    #[serde(default = "default_location_settle")]
    pub location_settle_secs: u64,

    /// Pause after a disconnect before re-querying status
    #[serde(default = "default_disconnect_settle")]
    pub disconnect_settle_secs: u64,

    /// Timeout for the external status query
    #[serde(default = "default_status_timeout")]
    pub status_timeout_secs: u64,

    /// Timeout for the external connect command
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Timeout for the external disconnect command
    #[serde(default = "default_disconnect_timeout")]
    pub disconnect_timeout_secs: u64,

    /// Timeout for the external account sign-in/sign-out commands
    #[serde(default = "default_login_timeout")]
    pub login_timeout_secs: u64,

    /// Timeout for the external locations listing
    #[serde(default = "default_locations_timeout")]
    pub locations_timeout_secs: u64,
}

fn default_command() -> String {
    "hotspotshield".to_string()
}

fn default_probe_url() -> String {
    "http://1.1.1.1".to_string()
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_language() -> String {
    "tr".to_string()
}

fn default_connect_settle() -> u64 {
    2
}

fn default_location_settle() -> u64 {
    3
}

fn default_disconnect_settle() -> u64 {
    2
}

fn default_status_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    60
}

fn default_disconnect_timeout() -> u64 {
    30
}

fn default_login_timeout() -> u64 {
    30
}

fn default_locations_timeout() -> u64 {
    10
}

impl AppConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.command.trim().is_empty() {
            return Err("command cannot be empty".to_string());
        }

        match url::Url::parse(&self.probe_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(format!(
                    "probe_url must use http or https, got: {}",
                    url.scheme()
                ));
            }
            Err(e) => return Err(format!("probe_url is not a valid URL: {e}")),
        }

        if self.language.parse::<crate::locale::Lang>().is_err() {
            return Err(format!("language must be \"tr\" or \"en\", got: {}", self.language));
        }

        let timeouts = [
            ("probe_timeout_secs", self.probe_timeout_secs),
            ("status_timeout_secs", self.status_timeout_secs),
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("disconnect_timeout_secs", self.disconnect_timeout_secs),
            ("login_timeout_secs", self.login_timeout_secs),
            ("locations_timeout_secs", self.locations_timeout_secs),
        ];
        for (name, value) in timeouts {
            if value == 0 {
                return Err(format!("{name} cannot be zero"));
            }
        }

        Ok(())
    }

    /// Parsed default language, falling back to Turkish on bad input
    pub fn default_language(&self) -> crate::locale::Lang {
        self.language.parse().unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            probe_url: default_probe_url(),
            probe_timeout_secs: default_probe_timeout(),
            language: default_language(),
            connect_settle_secs: default_connect_settle(),
            location_settle_secs: default_location_settle(),
            disconnect_settle_secs: default_disconnect_settle(),
            status_timeout_secs: default_status_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            disconnect_timeout_secs: default_disconnect_timeout(),
            login_timeout_secs: default_login_timeout(),
            locations_timeout_secs: default_locations_timeout(),
        }
    }
}
