//! Constants for the download module (timeout bounds).

/// Smallest accepted connect/read timeout in seconds.
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Largest accepted connect/read timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;
