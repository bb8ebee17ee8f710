//! Shared data types
//!
//! Locations are read-only views over the external tool's output and are
//! rebuilt on every load. Credentials exist only for the duration of a login
//! attempt; the password is wrapped with the `secrecy` crate so it is never
//! logged or exposed in debug output.

use secrecy::{ExposeSecret, SecretString};

/// A VPN location offered by the external tool
///
/// The display name is the raw list line; the first whitespace-separated
/// token is the code passed back to `connect`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    name: String,
    placeholder: bool,
}

impl Location {
    /// Create a location from one line of `locations` output
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            placeholder: false,
        }
    }

    /// The sentinel entry substituted when the real list cannot be obtained
    ///
    /// Guarantees the presentation layer always has something to render; the
    /// localized "not available" text is chosen at render time.
    pub fn placeholder() -> Self {
        Self {
            name: String::new(),
            placeholder: true,
        }
    }

    /// Full display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location code understood by `connect` (first token of the name)
    pub fn code(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// Whether this is the sentinel placeholder entry
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

/// Transient credentials for one login attempt
///
/// Never persisted to disk. The `Debug` output redacts the password.
#[derive(Clone, Debug)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: String) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Expose the password value (use with caution!)
    ///
    /// Only called when feeding the external sign-in command's stdin.
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}
