//! Text classification of the external tool's output
//!
//! The tool has no machine-readable interface; all of these are exact
//! substring contracts preserved from its observed behavior.

use crate::types::Location;

/// Case-insensitive marker the tool prints when no account session exists
pub const NOT_SIGNED_IN_MARKER: &str = "not signed in";

/// Number of header lines preceding the data in `locations` output
pub const LOCATIONS_HEADER_LINES: usize = 2;

/// Classification of one `status` invocation's output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Connected,
    NotConnected,
    /// Output matched neither marker; not trusted as connected
    Unrecognized,
}

/// Classify raw `status` output
///
/// "Not connected" does not match the capitalized "Connected" marker, so the
/// check order mirrors the upstream tool's contract exactly.
pub fn classify_status(output: &str) -> StatusKind {
    if output.contains("Connected") {
        StatusKind::Connected
    } else if output.contains("Not connected") {
        StatusKind::NotConnected
    } else {
        StatusKind::Unrecognized
    }
}

/// Whether either output stream mentions the not-signed-in marker
pub fn mentions_not_signed_in(text: &str) -> bool {
    text.to_lowercase().contains(NOT_SIGNED_IN_MARKER)
}

/// Whether `account status` output names the given user
///
/// Login success is inferred from this indirect signal; an empty username
/// never matches.
pub fn contains_username(status_output: &str, username: &str) -> bool {
    let needle = username.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    status_output.to_lowercase().contains(&needle)
}

/// Parse `locations` output into entries
///
/// Strips the fixed two-line header and blank lines. Returns an empty list
/// when no data lines remain; the controller substitutes the sentinel.
pub fn parse_locations(output: &str) -> Vec<Location> {
    output
        .lines()
        .skip(LOCATIONS_HEADER_LINES)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Location::new)
        .collect()
}
