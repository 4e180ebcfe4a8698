//! # Exit Codes
//!
//! Standard exit codes for the `rips` CLI.
//!
//! These codes follow common Unix conventions and give scripts and CI/CD
//! pipelines something to branch on.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// General error (unspecified)
pub const EXIT_ERROR: i32 = 1;

/// Configuration error (missing or invalid config)
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Authentication error (invalid login or expired session)
pub const EXIT_AUTH_ERROR: i32 = 3;

/// Network error (connection failed, timeout, etc.)
pub const EXIT_NETWORK_ERROR: i32 = 4;

/// Requested project or resource does not exist
pub const EXIT_NOT_FOUND: i32 = 5;

/// Invalid input (bad arguments, unreadable archive, rejected request)
pub const EXIT_INVALID_INPUT: i32 = 6;

/// Server error (500 or undocumented status)
pub const EXIT_SERVICE_UNAVAILABLE: i32 = 7;

/// The scan did not finish before `--max-wait`
pub const EXIT_SCAN_TIMEOUT: i32 = 9;

/// Interrupted by the user (Ctrl+C)
pub const EXIT_CANCELLED: i32 = 130;
