//! Core configuration struct and loading logic.
//!
//! This module provides the main [`Config`] struct which aggregates all
//! configuration options for the hireboard application.

use std::path::{Path, PathBuf};

use hireboard_protocol::dummy::DUMMY_JOB;
use hireboard_protocol::{JobId, RecruiterId};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::persistence::{default_data_dir, find_config_file, read_config_file, write_config_file};
use crate::sections::{DragConfig, LogConfig, SyncConfig};

/// Recruiter id used when none is configured.
pub const DEFAULT_RECRUITER: &str = "demo-recruiter";

/// Where board data is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// In-process store seeded with demo data. Nothing survives a restart.
    #[default]
    Memory,
    /// JSON files under the data directory.
    File,
}

/// The main configuration struct for the hireboard application.
///
/// # Examples
///
/// ```
/// use hireboard_config::{Config, StorageKind, SyncConfig};
/// use hireboard_protocol::JobId;
///
/// let config = Config::default();
/// assert_eq!(config.storage, StorageKind::Memory);
///
/// let config = Config {
///     job: JobId::new("data-engineer"),
///     storage: StorageKind::File,
///     sync: SyncConfig::with_timeout_ms(5_000),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The job whose pipeline is shown.
    #[serde(default = "default_job")]
    pub job: JobId,

    /// The recruiter using the board. Determines which applicants are
    /// claimed and therefore ratable.
    #[serde(default = "default_recruiter")]
    pub recruiter: RecruiterId,

    /// Directory for board data and the log file. Defaults to the
    /// platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Storage backend.
    #[serde(default)]
    pub storage: StorageKind,

    /// Drag-and-drop tuning.
    #[serde(default)]
    pub drag: DragConfig,

    /// Persistence timing.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Log output.
    #[serde(default)]
    pub log: LogConfig,
}

fn default_job() -> JobId {
    JobId::new(DUMMY_JOB)
}

fn default_recruiter() -> RecruiterId {
    RecruiterId::new(DEFAULT_RECRUITER)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            job: default_job(),
            recruiter: default_recruiter(),
            data_dir: None,
            storage: StorageKind::default(),
            drag: DragConfig::default(),
            sync: SyncConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Creates a default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the default file locations.
    ///
    /// If no configuration file is found, returns a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found but cannot be
    /// read, parsed, or validated.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use hireboard_config::Config;
    ///
    /// # fn example() -> hireboard_config::Result<()> {
    /// let config = Config::load()?;
    /// println!("Opening the {} board", config.job);
    /// # Ok(())
    /// # }
    /// ```
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Loads and validates configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_config_file(path, self)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first failing check: empty identifiers, an out-of-range
    /// drag or sync setting, or an unknown log level.
    ///
    /// # Examples
    ///
    /// ```
    /// use hireboard_config::{Config, DragConfig};
    ///
    /// let mut config = Config::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.drag = DragConfig { activation_distance: 0 };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.job.as_str().trim().is_empty() {
            return Err(ConfigError::EmptyIdentifier("job"));
        }
        if self.recruiter.as_str().trim().is_empty() {
            return Err(ConfigError::EmptyIdentifier("recruiter"));
        }
        self.drag.validate()?;
        self.sync.validate()?;
        self.log.validate()?;
        Ok(())
    }

    /// Returns the configured data directory, or the platform default.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the home
    /// directory cannot be determined.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    /// Returns the log file path, resolving relative names against the
    /// data directory.
    ///
    /// # Errors
    ///
    /// Same as [`Config::data_dir`].
    pub fn log_path(&self) -> Result<PathBuf> {
        let file = Path::new(&self.log.file);
        if file.is_absolute() {
            Ok(file.to_path_buf())
        } else {
            Ok(self.data_dir()?.join(file))
        }
    }
}
