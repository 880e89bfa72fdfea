//! Application-related types.
//!
//! An application is a candidate's submission to a job. It is the unit that
//! moves between the columns of the pipeline board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};
use crate::stage::StageKey;

/// Unique identifier for an application.
pub type ApplicationId = uuid::Uuid;

/// Unique identifier for an applicant (the person behind an application).
pub type ApplicantId = uuid::Uuid;

/// The highest rating a recruiter can give.
pub const MAX_RATING: u8 = 5;

/// Validates a rating value.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidRating`] if the rating exceeds [`MAX_RATING`].
///
/// # Examples
///
/// ```
/// use hireboard_protocol::validate_rating;
///
/// assert!(validate_rating(5).is_ok());
/// assert!(validate_rating(6).is_err());
/// ```
pub fn validate_rating(rating: u8) -> Result<u8> {
    if rating > MAX_RATING {
        Err(ProtocolError::InvalidRating(rating))
    } else {
        Ok(rating)
    }
}

/// A reference to a document uploaded with an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// File name as uploaded.
    pub name: String,
    /// Where the document can be fetched from.
    pub uri: String,
}

/// The person behind an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    /// Unique identifier for this applicant.
    pub id: ApplicantId,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number, if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-text bio.
    #[serde(default)]
    pub bio: String,
    /// Uploaded documents (resume, cover letter, ...).
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
}

impl Applicant {
    /// Creates an applicant with a fresh id and no optional fields.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: ApplicantId::new_v4(),
            name: name.into(),
            email: email.into(),
            phone: None,
            bio: String::new(),
            documents: Vec::new(),
        }
    }
}

/// Avatar and intro video references for an applicant.
///
/// Both are empty when media could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantMedia {
    /// Avatar image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Intro video reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
}

impl ApplicantMedia {
    /// Returns `true` if neither avatar nor video is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.avatar.is_none() && self.video.is_none()
    }
}

/// Outcome of evaluating one screening criterion against an applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionVerdict {
    /// The applicant meets the criterion.
    Match,
    /// The applicant does not meet the criterion.
    NoMatch,
    /// Not enough information to decide.
    NoData,
}

/// A screening criterion result attached by the evaluation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionResult {
    /// Short tag naming the criterion (e.g. "rust", "remote").
    pub tag: String,
    /// The verdict.
    pub verdict: CriterionVerdict,
    /// Optional explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl CriterionResult {
    /// Creates a result without reasoning.
    #[must_use]
    pub fn new(tag: impl Into<String>, verdict: CriterionVerdict) -> Self {
        Self {
            tag: tag.into(),
            verdict,
            reasoning: None,
        }
    }
}

/// A candidate's application to a job.
///
/// # Examples
///
/// ```
/// use hireboard_protocol::{Applicant, Application, BuiltinStage};
///
/// let app = Application::new(
///     Applicant::new("Ada Lovelace", "ada@example.com"),
///     BuiltinStage::Pending.into(),
/// );
/// assert_eq!(app.rating, 0);
/// assert!(app.viewed_at.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Unique identifier for this application.
    pub id: ApplicationId,
    /// Who applied.
    pub applicant: Applicant,
    /// The stage this application sits in.
    pub status: StageKey,
    /// Recruiter rating, `0..=5`. Only editable once the applicant is claimed.
    #[serde(default)]
    pub rating: u8,
    /// When the application was submitted.
    pub applied_at: DateTime<Utc>,
    /// When a recruiter first opened the application. Set once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewed_at: Option<DateTime<Utc>>,
    /// Screening results attached by the evaluation service.
    #[serde(default)]
    pub criterion_results: Vec<CriterionResult>,
    /// Avatar/video references, resolved after load.
    #[serde(default)]
    pub media: ApplicantMedia,
}

impl Application {
    /// Creates a new, unviewed, unrated application submitted now.
    #[must_use]
    pub fn new(applicant: Applicant, status: StageKey) -> Self {
        Self::with_id(ApplicationId::new_v4(), applicant, status)
    }

    /// Creates a new application with a specific id.
    ///
    /// Useful for tests or when recreating records from storage.
    #[must_use]
    pub fn with_id(id: ApplicationId, applicant: Applicant, status: StageKey) -> Self {
        Self {
            id,
            applicant,
            status,
            rating: 0,
            applied_at: Utc::now(),
            viewed_at: None,
            criterion_results: Vec::new(),
            media: ApplicantMedia::default(),
        }
    }

    /// Returns `true` once a recruiter has opened the application.
    #[must_use]
    pub fn is_viewed(&self) -> bool {
        self.viewed_at.is_some()
    }

    /// Counts criterion results per verdict as `(matches, no_matches, no_data)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hireboard_protocol::{Applicant, Application, BuiltinStage, CriterionResult, CriterionVerdict};
    ///
    /// let mut app = Application::new(Applicant::new("A", "a@example.com"), BuiltinStage::Pending.into());
    /// app.criterion_results.push(CriterionResult::new("rust", CriterionVerdict::Match));
    /// app.criterion_results.push(CriterionResult::new("remote", CriterionVerdict::NoData));
    /// assert_eq!(app.criterion_tally(), (1, 0, 1));
    /// ```
    #[must_use]
    pub fn criterion_tally(&self) -> (usize, usize, usize) {
        self.criterion_results
            .iter()
            .fold((0, 0, 0), |(m, n, d), r| match r.verdict {
                CriterionVerdict::Match => (m + 1, n, d),
                CriterionVerdict::NoMatch => (m, n + 1, d),
                CriterionVerdict::NoData => (m, n, d + 1),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::BuiltinStage;

    #[test]
    fn application_new_has_defaults() {
        let app = Application::new(
            Applicant::new("Grace Hopper", "grace@example.com"),
            BuiltinStage::Reviewing.into(),
        );
        assert_eq!(app.status.as_str(), "reviewing");
        assert_eq!(app.rating, 0);
        assert!(!app.is_viewed());
        assert!(app.media.is_empty());
    }

    #[test]
    fn application_deserializes_with_missing_optional_fields() {
        let json = r#"{
            "id": "4f9c7a52-2d4e-4b7b-9a53-0a9c1d3c1e11",
            "applicant": {
                "id": "7d1f0d8a-0b7f-4a43-8f0e-2b5b1b8f4f21",
                "name": "Linus",
                "email": "linus@example.com"
            },
            "status": "pending",
            "applied_at": "2025-01-15T10:30:00Z"
        }"#;
        let app: Application = serde_json::from_str(json).expect("deserialize");
        assert_eq!(app.rating, 0);
        assert!(app.viewed_at.is_none());
        assert!(app.applicant.documents.is_empty());
        assert!(app.criterion_results.is_empty());
    }

    #[test]
    fn criterion_verdict_json_format() {
        let json = serde_json::to_string(&CriterionVerdict::NoMatch).expect("serialize");
        assert_eq!(json, r#""no_match""#);
    }

    #[test]
    fn validate_rating_bounds() {
        for rating in 0..=MAX_RATING {
            assert_eq!(validate_rating(rating), Ok(rating));
        }
        assert_eq!(validate_rating(6), Err(ProtocolError::InvalidRating(6)));
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    impl Arbitrary for CriterionVerdict {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            prop_oneof![
                Just(CriterionVerdict::Match),
                Just(CriterionVerdict::NoMatch),
                Just(CriterionVerdict::NoData),
            ]
            .boxed()
        }
    }

    proptest! {
        /// The tally always accounts for every criterion result exactly once.
        #[test]
        fn criterion_tally_sums_to_len(verdicts in proptest::collection::vec(any::<CriterionVerdict>(), 0..20)) {
            let mut app = Application::new(
                Applicant::new("P", "p@example.com"),
                crate::stage::BuiltinStage::Pending.into(),
            );
            app.criterion_results = verdicts
                .iter()
                .map(|v| CriterionResult::new("tag", *v))
                .collect();
            let (m, n, d) = app.criterion_tally();
            prop_assert_eq!(m + n + d, verdicts.len());
        }
    }
}
