//! Error types for the storage backends.

use std::path::PathBuf;

use hireboard_pipeline::PersistenceError;

/// Errors that can occur while reading or writing board data.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A data file exists but does not contain what we expect.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The file involved.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized.
    #[error("failed to serialize board data: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The record to update does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The store is refusing calls.
    #[error("{0}")]
    Unavailable(String),
}

/// A specialized Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for PersistenceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::Unavailable(reason) => Self::Unavailable(reason),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_its_kind() {
        let err = StoreError::NotFound("application 42".into());
        assert_eq!(
            PersistenceError::from(err),
            PersistenceError::NotFound("application 42".into())
        );
    }

    #[test]
    fn io_errors_become_unavailable() {
        let err = StoreError::Io {
            path: PathBuf::from("/data/jobs/x/stages.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let PersistenceError::Unavailable(reason) = PersistenceError::from(err) else {
            panic!("expected Unavailable");
        };
        assert!(reason.contains("stages.json"));
        assert!(reason.contains("denied"));
    }
}
