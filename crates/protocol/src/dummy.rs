//! Demo data for testing and demonstration.
//!
//! This module provides a sample job with realistic applications spread
//! across the built-in stages, used to seed the in-memory store and the
//! renderer tests.
//!
//! # Examples
//!
//! ```
//! use hireboard_protocol::dummy::dummy_applications;
//!
//! let apps = dummy_applications();
//! assert_eq!(apps.len(), 8);
//! ```

use chrono::{Duration, TimeZone, Utc};

use crate::application::{
    Applicant, ApplicantMedia, Application, CriterionResult, CriterionVerdict, DocumentRef,
};
use crate::stage::BuiltinStage;

/// The job id the demo data belongs to.
pub const DUMMY_JOB: &str = "rust-platform-engineer";

/// A builder for creating applications with specific stages and extras.
///
/// An internal helper to reduce boilerplate when creating several
/// applications with non-default fields.
struct ApplicationBuilder {
    name: String,
    bio: String,
    stage: BuiltinStage,
    days_ago: i64,
    criteria: Vec<CriterionResult>,
    viewed: bool,
}

impl ApplicationBuilder {
    /// Creates a new builder for an applicant with the given name and bio.
    fn new(name: impl Into<String>, bio: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bio: bio.into(),
            stage: BuiltinStage::Pending,
            days_ago: 1,
            criteria: Vec::new(),
            viewed: false,
        }
    }

    /// Sets the stage.
    fn stage(mut self, stage: BuiltinStage) -> Self {
        self.stage = stage;
        self
    }

    /// Sets how many days ago the application was submitted.
    fn days_ago(mut self, days: i64) -> Self {
        self.days_ago = days;
        self
    }

    /// Adds a criterion result.
    fn criterion(mut self, tag: &str, verdict: CriterionVerdict, reasoning: &str) -> Self {
        self.criteria.push(CriterionResult {
            tag: tag.to_string(),
            verdict,
            reasoning: Some(reasoning.to_string()),
        });
        self
    }

    /// Marks the application as already opened.
    fn viewed(mut self) -> Self {
        self.viewed = true;
        self
    }

    /// Builds the application.
    fn build(self) -> Application {
        let slug: String = self
            .name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '.' })
            .collect();
        let mut applicant = Applicant::new(self.name, format!("{slug}@example.com"));
        applicant.bio = self.bio;
        applicant.documents.push(DocumentRef {
            name: format!("{slug}-resume.pdf"),
            uri: format!("https://files.example.com/resumes/{slug}.pdf"),
        });

        let base = Utc
            .with_ymd_and_hms(2025, 1, 20, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let applied_at = base - Duration::days(self.days_ago);

        let mut app = Application::new(applicant, self.stage.into());
        app.applied_at = applied_at;
        app.criterion_results = self.criteria;
        app.media = ApplicantMedia {
            avatar: Some(format!("https://media.example.com/avatars/{slug}.png")),
            video: None,
        };
        if self.viewed {
            app.viewed_at = Some(applied_at + Duration::hours(4));
        }
        app
    }
}

/// Generates a sample set of applications for [`DUMMY_JOB`].
///
/// - **Inbox**: 3 applications, none opened yet
/// - **Reviewing**: 2 applications
/// - **Interview**: 1 application
/// - **Offered**: 1 application
/// - **Rejected**: 1 application
///
/// # Examples
///
/// ```
/// use hireboard_protocol::dummy::dummy_applications;
///
/// let apps = dummy_applications();
/// let inbox = apps.iter().filter(|a| a.status.as_str() == "pending").count();
/// assert_eq!(inbox, 3);
/// ```
#[must_use]
pub fn dummy_applications() -> Vec<Application> {
    vec![
        ApplicationBuilder::new(
            "Ada Lovelace",
            "Systems programmer, eight years of embedded C, two of Rust.",
        )
        .days_ago(1)
        .criterion("rust", CriterionVerdict::Match, "Two years of production Rust.")
        .criterion("remote", CriterionVerdict::NoData, "Location not stated.")
        .build(),
        ApplicationBuilder::new(
            "Alan Turing",
            "Compiler engineer interested in async runtimes.",
        )
        .days_ago(2)
        .criterion("rust", CriterionVerdict::Match, "Maintains a tokio-based crate.")
        .build(),
        ApplicationBuilder::new("Barbara Liskov", "Distributed systems researcher.")
            .days_ago(3)
            .build(),
        ApplicationBuilder::new("Grace Hopper", "Backend engineer, Go and Rust services.")
            .stage(BuiltinStage::Reviewing)
            .days_ago(5)
            .criterion("rust", CriterionVerdict::Match, "Rust services in production.")
            .criterion("on-call", CriterionVerdict::NoMatch, "Declines on-call rotation.")
            .viewed()
            .build(),
        ApplicationBuilder::new("Ken Thompson", "Operating systems, storage engines.")
            .stage(BuiltinStage::Reviewing)
            .days_ago(6)
            .viewed()
            .build(),
        ApplicationBuilder::new("Margaret Hamilton", "Flight software, formal methods.")
            .stage(BuiltinStage::Interview)
            .days_ago(9)
            .criterion("rust", CriterionVerdict::NoMatch, "No Rust experience listed.")
            .viewed()
            .build(),
        ApplicationBuilder::new("Dennis Ritchie", "Language design, toolchains.")
            .stage(BuiltinStage::Offered)
            .days_ago(14)
            .viewed()
            .build(),
        ApplicationBuilder::new("Edsger Dijkstra", "Prefers whiteboards to keyboards.")
            .stage(BuiltinStage::Rejected)
            .days_ago(20)
            .viewed()
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_applications_are_distributed() {
        let apps = dummy_applications();
        let count = |stage: BuiltinStage| {
            apps.iter()
                .filter(|a| a.status.builtin() == Some(stage))
                .count()
        };

        assert_eq!(count(BuiltinStage::Pending), 3);
        assert_eq!(count(BuiltinStage::Reviewing), 2);
        assert_eq!(count(BuiltinStage::Interview), 1);
        assert_eq!(count(BuiltinStage::Offered), 1);
        assert_eq!(count(BuiltinStage::Hired), 0);
        assert_eq!(count(BuiltinStage::Rejected), 1);
    }

    #[test]
    fn dummy_inbox_is_unviewed() {
        let apps = dummy_applications();
        assert!(
            apps.iter()
                .filter(|a| a.status.builtin() == Some(BuiltinStage::Pending))
                .all(|a| !a.is_viewed())
        );
    }

    #[test]
    fn dummy_ids_are_unique() {
        let apps = dummy_applications();
        let mut ids: Vec<_> = apps.iter().map(|a| a.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), apps.len());
    }

    #[test]
    fn dummy_applicants_have_resumes() {
        for app in dummy_applications() {
            assert_eq!(app.applicant.documents.len(), 1);
            assert!(app.applicant.email.ends_with("@example.com"));
        }
    }
}
