//! # Error Handling
//!
//! Centralized error type for the `course-repo` library, built with
//! `thiserror`. Every failure mode of a provisioning run maps to one variant
//! here: external command failures, unresolved settings, tool validation
//! problems, and plain I/O errors.
//!
//! All failures are fatal. The tool performs no retries and no partial
//! recovery; errors propagate to the binary, which reports them and exits
//! non-zero.

use thiserror::Error;

/// Main error type for course-repo operations
#[derive(Error, Debug)]
pub enum Error {
    /// An external command could not be started at all (typically the
    /// program is not installed or not on the `PATH`).
    #[error("failed to start `{command}`: {source}")]
    CommandStart {
        command: String,
        source: std::io::Error,
    },

    /// An external command ran but exited with a non-zero status.
    ///
    /// Carries the rendered command line, the exit code, and whatever the
    /// command wrote to stderr.
    #[error("command `{command}` failed with exit code {code}{}", if stderr.trim().is_empty() { String::new() } else { format!(": {}", stderr.trim()) })]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// A required setting could not be resolved from any source.
    ///
    /// `key` is the environment/properties spelling of the setting (e.g.
    /// `STUDENT_ID`); the same value can be supplied as a CLI flag.
    #[error("required setting `{key}` is missing; pass it as a flag, environment variable, or settings.properties entry")]
    MissingSetting { key: &'static str },

    /// `CI` is set but no `GITHUB_TOKEN` is available to authenticate pushes.
    #[error("GITHUB_TOKEN is not set, but we are in a CI environment")]
    CiTokenMissing,

    /// A required external tool is unusable.
    #[error("tool validation error: {tool} - {message}")]
    ToolValidation { tool: String, message: String },

    /// A repository-relative path escapes the repository root.
    #[error("path `{path}` is outside the repository")]
    PathOutsideRepo { path: String },

    /// The `settings.properties` file could not be read or parsed.
    #[error("properties file error: {0}")]
    Properties(#[from] ini::Error),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
