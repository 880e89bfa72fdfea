//! Shared protocol types for the hireboard application.
//!
//! This crate defines the data model shared by every hireboard component:
//! applications and applicants, pipeline stages, job/recruiter identifiers,
//! and the UI messages the terminal front end produces.
//!
//! # Overview
//!
//! - [`application`]: applications, applicants, media and criterion results
//! - [`stage`]: stage keys, the built-in stages and validation helpers
//! - [`job`]: job and recruiter identifiers
//! - [`message`]: TUI event messages
//! - [`error`]: validation errors
//! - [`dummy`]: demo data
//!
//! # Examples
//!
//! ```
//! use hireboard_protocol::{Applicant, Application, BuiltinStage, StageKey};
//!
//! let app = Application::new(
//!     Applicant::new("Ada Lovelace", "ada@example.com"),
//!     BuiltinStage::Pending.into(),
//! );
//! assert_eq!(app.status, StageKey::from(BuiltinStage::Pending));
//! ```

pub mod application;
pub mod dummy;
pub mod error;
pub mod job;
pub mod message;
pub mod stage;

// Re-export primary types at crate root for convenience
pub use application::{
    Applicant, ApplicantId, ApplicantMedia, Application, ApplicationId, CriterionResult,
    CriterionVerdict, DocumentRef, MAX_RATING, validate_rating,
};
pub use error::{ProtocolError, Result};
pub use job::{JobId, RecruiterId};
pub use message::Message;
pub use stage::{
    BuiltinStage, STAGE_ICONS, STAGE_PALETTE, Stage, StageKey, color_rgb, default_stages,
    validate_color, validate_label,
};
