//! Running persistence calls off the UI path.
//!
//! Calls are spawned on the tokio runtime with a timeout. Their outcomes
//! come back as [`Completion`]s over an unbounded channel that the UI loop
//! drains between frames, so board state is only ever touched from one
//! place.

use std::future::Future;
use std::time::Duration;

use hireboard_protocol::{ApplicationId, StageKey};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::{PersistResult, PersistenceError};
use crate::registry::StageEdit;
use crate::store::RatingChange;
use crate::transition::TransitionTicket;

/// Default bound on a single persistence call.
pub const DEFAULT_PERSIST_TIMEOUT: Duration = Duration::from_secs(10);

/// The resolved outcome of a persistence call.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// An optimistic status transition.
    Status {
        /// The transition's ticket.
        ticket: TransitionTicket,
        /// The write's outcome.
        result: PersistResult<()>,
    },
    /// A status write caused by migrating a deleted stage's applications.
    Migration {
        /// The migrated application.
        application: ApplicationId,
        /// Its new stage.
        stage: StageKey,
        /// The write's outcome.
        result: PersistResult<()>,
    },
    /// A stage configuration write.
    StageConfig {
        /// The edit that was persisted.
        edit: StageEdit,
        /// The write's outcome.
        result: PersistResult<()>,
    },
    /// A rating write.
    Rating {
        /// The optimistic rating change.
        change: RatingChange,
        /// The write's outcome.
        result: PersistResult<()>,
    },
    /// A first-viewed write.
    Viewed {
        /// The viewed application.
        application: ApplicationId,
        /// The write's outcome.
        result: PersistResult<()>,
    },
}

impl Completion {
    /// Returns the write's outcome.
    #[must_use]
    pub fn result(&self) -> &PersistResult<()> {
        match self {
            Self::Status { result, .. }
            | Self::Migration { result, .. }
            | Self::StageConfig { result, .. }
            | Self::Rating { result, .. }
            | Self::Viewed { result, .. } => result,
        }
    }
}

/// Spawns persistence calls and collects their completions.
#[derive(Debug)]
pub struct Dispatcher {
    timeout: Duration,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    outstanding: usize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_PERSIST_TIMEOUT)
    }
}

impl Dispatcher {
    /// Creates a dispatcher whose calls time out after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            timeout,
            tx,
            rx,
            outstanding: 0,
        }
    }

    /// Returns the per-call timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of calls whose completion has not been received yet.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Spawns `call` and reports its outcome through `complete`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, C>(&mut self, call: F, complete: C)
    where
        F: Future<Output = PersistResult<()>> + Send + 'static,
        C: FnOnce(PersistResult<()>) -> Completion + Send + 'static,
    {
        let tx = self.tx.clone();
        let timeout = self.timeout;
        self.outstanding += 1;
        tokio::spawn(async move {
            // The call runs in its own task so a panic still yields a completion.
            let result = match tokio::spawn(tokio::time::timeout(timeout, call)).await {
                Ok(Ok(result)) => result,
                Ok(Err(_)) => Err(PersistenceError::TimedOut(timeout)),
                Err(err) => {
                    warn!(error = %err, "persistence call aborted");
                    Err(PersistenceError::Aborted(err.to_string()))
                }
            };
            if tx.send(complete(result)).is_err() {
                debug!("board dropped before persistence completed");
            }
        });
    }

    /// Returns a completion if one is ready.
    pub fn try_next(&mut self) -> Option<Completion> {
        let completion = self.rx.try_recv().ok()?;
        self.outstanding = self.outstanding.saturating_sub(1);
        Some(completion)
    }

    /// Waits for the next completion.
    pub async fn next(&mut self) -> Option<Completion> {
        if self.outstanding == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        self.outstanding = self.outstanding.saturating_sub(1);
        Some(completion)
    }
}
