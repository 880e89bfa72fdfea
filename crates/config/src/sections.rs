//! Tuning sections of the configuration.
//!
//! Each section deserializes with per-field defaults so a config file only
//! needs to mention the values it changes.
//!
//! # Ranges
//!
//! - `drag.activation_distance`: 1 to 10 cells
//! - `sync.timeout_ms`: 100 to 120000 milliseconds

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default pointer travel, in cells, before a press becomes a drag.
pub const DEFAULT_ACTIVATION_DISTANCE: u16 = 1;

/// Smallest accepted activation distance.
pub const MIN_ACTIVATION_DISTANCE: u16 = 1;

/// Largest accepted activation distance.
pub const MAX_ACTIVATION_DISTANCE: u16 = 10;

/// Default bound on a single persistence call (10 seconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Smallest accepted persistence timeout.
pub const MIN_TIMEOUT_MS: u64 = 100;

/// Largest accepted persistence timeout (2 minutes).
pub const MAX_TIMEOUT_MS: u64 = 120_000;

/// Default log filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log file name, relative to the data directory.
pub const DEFAULT_LOG_FILE: &str = "hireboard.log";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Drag-and-drop behavior.
///
/// # Examples
///
/// ```
/// use hireboard_config::DragConfig;
///
/// let drag = DragConfig::default();
/// assert_eq!(drag.activation_distance, 1);
/// assert!(drag.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Cells the pointer must travel with the button held before a drag
    /// starts. Shorter presses are treated as clicks.
    #[serde(default = "default_activation_distance")]
    pub activation_distance: u16,
}

fn default_activation_distance() -> u16 {
    DEFAULT_ACTIVATION_DISTANCE
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            activation_distance: DEFAULT_ACTIVATION_DISTANCE,
        }
    }
}

impl DragConfig {
    /// Returns the activation distance as the pointer sensor measures it.
    #[must_use]
    pub fn distance(&self) -> f64 {
        f64::from(self.activation_distance)
    }

    /// Checks the activation distance is within range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] otherwise.
    pub fn validate(&self) -> Result<()> {
        check_range(
            "drag.activation_distance",
            u64::from(self.activation_distance),
            u64::from(MIN_ACTIVATION_DISTANCE),
            u64::from(MAX_ACTIVATION_DISTANCE),
        )
    }
}

/// Persistence timing.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hireboard_config::SyncConfig;
///
/// let sync = SyncConfig::with_timeout_ms(2_500);
/// assert_eq!(sync.timeout(), Duration::from_millis(2_500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Milliseconds before an outstanding write is treated as failed.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl SyncConfig {
    /// Creates a sync section with the given timeout.
    #[must_use]
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    /// Returns the timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Checks the timeout is within range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] otherwise.
    pub fn validate(&self) -> Result<()> {
        check_range("sync.timeout_ms", self.timeout_ms, MIN_TIMEOUT_MS, MAX_TIMEOUT_MS)
    }
}

/// Log output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter level used when `HIREBOARD_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file name. Relative names resolve against the data directory.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl LogConfig {
    /// Checks the level is a plain tracing level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLogLevel`] for anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use hireboard_config::LogConfig;
    ///
    /// let mut log = LogConfig::default();
    /// log.level = "WARN".into();
    /// assert!(log.validate().is_ok());
    ///
    /// log.level = "loud".into();
    /// assert!(log.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let level = self.level.to_ascii_lowercase();
        if LOG_LEVELS.contains(&level.as_str()) {
            Ok(())
        } else {
            Err(ConfigError::InvalidLogLevel(self.level.clone()))
        }
    }
}

fn check_range(setting: &'static str, value: u64, min: u64, max: u64) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            setting,
            value,
            min,
            max,
        })
    }
}
