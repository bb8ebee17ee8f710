//! Error types for the hstray application
//!
//! Every external-process or parsing failure raised inside the session
//! controller is converted into one of the `SessionError` kinds here; raw
//! errors never escape to the presentation layer.

use thiserror::Error;

/// Main error type for the hstray application
#[derive(Error, Debug)]
pub enum HstrayError {
    /// Errors related to configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors surfaced by the VPN session controller
    #[error("VPN session error: {0}")]
    Session(#[from] SessionError),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {path}")]
    LoadFailed { path: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// Failure kinds surfaced by the VPN session controller
///
/// One variant per outcome the presentation layer has to render; the
/// controller converts every raw process or timeout error into one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The reachability probe failed before the connect attempt
    #[error("no network connectivity")]
    NoNetwork,

    /// The external tool reports no active account session
    #[error("not signed in to the VPN account")]
    NotSignedIn,

    /// The connect command ran but status never reached connected
    #[error("connection attempt failed")]
    ConnectFailed,

    /// The disconnect command ran (or timed out) but status is still connected
    #[error("disconnect attempt failed")]
    DisconnectFailed,

    /// A bounded external call exceeded its allotted duration
    #[error("external command timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Any other process or parsing error, always logged with full detail
    #[error("unexpected failure: {reason}")]
    Unexpected { reason: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, HstrayError>;
