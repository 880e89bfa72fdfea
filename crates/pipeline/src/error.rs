//! Error types for pipeline operations.
//!
//! [`PipelineError`] is what board operations return to their caller;
//! [`PersistenceError`] is what collaborators report when a load or save
//! fails.

use std::time::Duration;

use hireboard_protocol::{ApplicationId, ProtocolError, StageKey};

/// Errors reported by storage collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// The backing store could not be reached or refused the write.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The call did not resolve within the configured timeout.
    #[error("persistence call timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),

    /// The record to update does not exist in the backing store.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The call panicked or was cancelled before it resolved.
    #[error("persistence call aborted: {0}")]
    Aborted(String),
}

/// Errors that can occur during pipeline board operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// Input was rejected before any mutation was attempted.
    #[error("validation failed: {0}")]
    Validation(#[from] ProtocolError),

    /// The operation would break a board invariant; nothing was changed.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// No application with this id is loaded.
    #[error("application not found: {0}")]
    UnknownApplication(ApplicationId),

    /// No stage with this key exists for the job.
    #[error("stage not found: {0}")]
    UnknownStage(StageKey),

    /// Rating requires the applicant to be on the recruiter's list.
    #[error("add this candidate to your list before rating them")]
    NotClaimed(ApplicationId),

    /// A collaborator call failed.
    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}

impl PipelineError {
    /// Creates an [`PipelineError::InvariantViolation`] from a message.
    #[must_use]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Returns `true` for informational errors that should not be shown as failures.
    #[must_use]
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::NotClaimed(_))
    }
}

/// A specialized Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// A specialized Result type for collaborator calls.
pub type PersistResult<T> = std::result::Result<T, PersistenceError>;
