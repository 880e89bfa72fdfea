//! Configuration file reading and writing.
//!
//! # File Formats
//!
//! Both JSON5 (`.json5`, comments and trailing commas allowed) and plain
//! JSON (`.json`) are read. Files are always written as pretty JSON.
//!
//! # File Locations
//!
//! Configuration is searched in the following order:
//!
//! 1. Local: `./hireboard.json5` or `./hireboard.json`
//! 2. User: `~/.config/hireboard/config.json5` or `~/.config/hireboard/config.json`

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Local configuration file names, in priority order.
const CONFIG_FILE_NAMES: &[&str] = &["hireboard.json5", "hireboard.json"];

/// Directory name under the user's config and data directories.
const APP_DIR: &str = "hireboard";

/// User config file names, in priority order.
const USER_CONFIG_FILE_NAMES: &[&str] = &["config.json5", "config.json"];

/// Finds the configuration file path.
///
/// Returns `None` when neither a local nor a user file exists.
///
/// # Examples
///
/// ```no_run
/// use hireboard_config::persistence::find_config_file;
///
/// if let Some(path) = find_config_file() {
///     println!("Found config at: {}", path.display());
/// }
/// ```
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    find_config_file_in(Path::new("."), dirs::config_dir().as_deref())
}

/// Finds the configuration file, looking in `local` first and then in the
/// `hireboard` directory under `user_config`.
#[must_use]
pub fn find_config_file_in(local: &Path, user_config: Option<&Path>) -> Option<PathBuf> {
    let local_candidates = CONFIG_FILE_NAMES.iter().map(|name| local.join(name));
    let user_candidates = user_config
        .map(|dir| dir.join(APP_DIR))
        .into_iter()
        .flat_map(|dir| USER_CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)));

    local_candidates.chain(user_candidates).find(|path| path.exists())
}

/// Returns the default user configuration directory.
///
/// This is typically `~/.config/hireboard/` on Unix systems.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn user_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Returns the default user configuration file path.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_user_config_path() -> Result<PathBuf> {
    Ok(user_config_dir()?.join("config.json5"))
}

/// Returns the default directory for board data and logs.
///
/// This is typically `~/.local/share/hireboard/` on Linux.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Reads and parses a configuration file.
///
/// The JSON5 parser accepts plain JSON too.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Examples
///
/// ```no_run
/// use hireboard_config::persistence::read_config_file;
/// use hireboard_config::Config;
///
/// # fn main() -> hireboard_config::Result<()> {
/// let config: Config = read_config_file("hireboard.json5")?;
/// # Ok(())
/// # }
/// ```
pub fn read_config_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json5::from_str(&content).map_err(ConfigError::from)
}

/// Writes a configuration to a file as pretty-printed JSON, creating parent
/// directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written, or the
/// value cannot be serialized.
pub fn write_config_file<T: serde::Serialize>(path: impl AsRef<Path>, config: &T) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty() && !p.exists()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let content = serde_json::to_string_pretty(config)?;

    std::fs::write(path, content).map_err(|e| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        job: String,
        timeout_ms: u64,
    }

    #[test]
    fn read_json5_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.json5");
        std::fs::write(
            &path,
            r#"
            {
                // the job being hired for
                job: "backend",
                timeout_ms: 2500,
            }
            "#,
        )
        .unwrap();

        let sample: Sample = read_config_file(&path).unwrap();
        assert_eq!(sample.job, "backend");
        assert_eq!(sample.timeout_ms, 2500);
    }

    #[test]
    fn read_nonexistent_file() {
        let result: Result<Sample> = read_config_file("/nonexistent/hireboard.json");
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn read_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("invalid.json");
        std::fs::write(&path, "{ job: ").unwrap();

        let result: Result<Sample> = read_config_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseJson5(_))));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let sample = Sample {
            job: "backend".into(),
            timeout_ms: 100,
        };

        write_config_file(&path, &sample).unwrap();
        let loaded: Sample = read_config_file(&path).unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn local_file_wins_over_user_file() {
        let local = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        std::fs::create_dir_all(user.path().join(APP_DIR)).unwrap();
        std::fs::write(user.path().join(APP_DIR).join("config.json"), "{}").unwrap();

        let found = find_config_file_in(local.path(), Some(user.path())).unwrap();
        assert!(found.ends_with("hireboard/config.json"));

        std::fs::write(local.path().join("hireboard.json"), "{}").unwrap();
        let found = find_config_file_in(local.path(), Some(user.path())).unwrap();
        assert_eq!(found, local.path().join("hireboard.json"));

        std::fs::write(local.path().join("hireboard.json5"), "{}").unwrap();
        let found = find_config_file_in(local.path(), Some(user.path())).unwrap();
        assert_eq!(found, local.path().join("hireboard.json5"));
    }

    #[test]
    fn no_file_found() {
        let local = TempDir::new().unwrap();
        assert!(find_config_file_in(local.path(), None).is_none());
    }
}
