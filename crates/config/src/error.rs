//! Error types for configuration operations.

use std::path::PathBuf;

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// The path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the configuration file.
    #[error("failed to write config file {path}: {source}")]
    WriteFile {
        /// The path to the file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON5 content.
    #[error("failed to parse config: {0}")]
    ParseJson5(#[from] serde_json5::Error),

    /// Failed to serialize to JSON.
    #[error("failed to serialize config: {0}")]
    SerializeJson(#[from] serde_json::Error),

    /// A numeric setting is outside its accepted range.
    #[error("invalid {setting}: {value} is outside {min}..={max}")]
    OutOfRange {
        /// Dotted name of the setting, e.g. `sync.timeout_ms`.
        setting: &'static str,
        /// The configured value.
        value: u64,
        /// Smallest accepted value.
        min: u64,
        /// Largest accepted value.
        max: u64,
    },

    /// A required identifier is empty.
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),

    /// The log level is not one the subscriber understands.
    #[error("invalid log level {0:?}: expected trace, debug, info, warn, or error")]
    InvalidLogLevel(String),

    /// Could not determine home or data directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
