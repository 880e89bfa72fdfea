//! User-facing notices.
//!
//! Failures that the board recovers from on its own (rolled-back moves,
//! reverted stage edits) are reported here instead of being returned to the
//! caller. The terminal front end shows the most recent notice in its status
//! line.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// How many notices are kept before the oldest is dropped.
pub const NOTICE_CAPACITY: usize = 32;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// Informational, e.g. a soft denial.
    Info,
    /// Something was undone or needs attention.
    Warning,
    /// An operation failed.
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Human-readable message.
    pub message: String,
    /// When the notice was raised.
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    /// Creates a notice raised now.
    #[must_use]
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

/// A bounded queue of notices, newest last.
///
/// # Examples
///
/// ```
/// use hireboard_pipeline::{NoticeLevel, Notices};
///
/// let mut notices = Notices::default();
/// notices.warn("Move failed");
/// assert_eq!(notices.latest().map(|n| n.level), Some(NoticeLevel::Warning));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    /// Pushes a notice, dropping the oldest one when full.
    pub fn push(&mut self, notice: Notice) {
        if self.queue.len() == NOTICE_CAPACITY {
            self.queue.pop_front();
        }
        self.queue.push_back(notice);
    }

    /// Pushes an informational notice.
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notice::new(NoticeLevel::Info, message));
    }

    /// Pushes a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Notice::new(NoticeLevel::Warning, message));
    }

    /// Pushes an error.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notice::new(NoticeLevel::Error, message));
    }

    /// Returns the most recent notice.
    #[must_use]
    pub fn latest(&self) -> Option<&Notice> {
        self.queue.back()
    }

    /// Iterates notices oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    /// Returns the number of queued notices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if there are no notices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Removes the most recent notice (the user dismissed it).
    pub fn dismiss(&mut self) -> Option<Notice> {
        self.queue.pop_back()
    }

    /// Removes and returns every queued notice.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }
}
