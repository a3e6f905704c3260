//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const GENERAL: i32 = 1;

    /// Resource not found (draft file, letter file).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// A supplied password did not open its paragraph.
    pub const AUTH_FAILED: i32 = 5;

    /// Link or letter file is corrupted or malformed.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "LETTER_LOG";

/// Filter used when `LETTER_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Receiver page the token is appended to.
pub const DEFAULT_BASE_URL: &str = "https://letters.example/read";
