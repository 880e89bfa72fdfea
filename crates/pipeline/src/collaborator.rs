//! External collaborators the board loads from and persists to.
//!
//! The board never talks to a database directly. Each concern is a trait
//! object so that storage backends and test doubles can be swapped freely.
//! All persistence calls are issued without holding any board state, and
//! their outcomes are fed back through [`crate::Dispatcher`].

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hireboard_protocol::{
    ApplicantId, ApplicantMedia, Application, ApplicationId, CriterionResult, JobId,
    RecruiterId, Stage, StageKey,
};

use crate::error::PersistResult;

/// Loads and persists application records.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Loads every application submitted to `job`.
    async fn load_applications(&self, job: &JobId) -> PersistResult<Vec<Application>>;

    /// Persists a new status for one application.
    async fn persist_status(
        &self,
        job: &JobId,
        application: ApplicationId,
        status: &StageKey,
    ) -> PersistResult<()>;

    /// Persists the first-viewed timestamp for one application.
    async fn persist_viewed(
        &self,
        job: &JobId,
        application: ApplicationId,
        viewed_at: DateTime<Utc>,
    ) -> PersistResult<()>;

    /// Persists the recruiter rating for one application.
    async fn persist_rating(
        &self,
        job: &JobId,
        application: ApplicationId,
        rating: u8,
    ) -> PersistResult<()>;
}

/// Loads and persists a job's stage configuration.
#[async_trait]
pub trait StageRepository: Send + Sync {
    /// Loads the stage list for `job`. An empty list means "use the defaults".
    async fn load_stage_config(&self, job: &JobId) -> PersistResult<Vec<Stage>>;

    /// Replaces the stage list for `job`.
    async fn persist_stage_config(&self, job: &JobId, stages: &[Stage]) -> PersistResult<()>;
}

/// Resolves applicant data that lives outside the application record.
#[async_trait]
pub trait ApplicantEnricher: Send + Sync {
    /// Resolves avatar and video links.
    async fn resolve_media(&self, applicant: ApplicantId) -> PersistResult<ApplicantMedia>;

    /// Resolves automated screening results.
    async fn resolve_criterion_results(
        &self,
        applicant: ApplicantId,
    ) -> PersistResult<Vec<CriterionResult>>;
}

/// Answers which applicants a recruiter has claimed for a job.
#[async_trait]
pub trait ClaimDirectory: Send + Sync {
    /// Returns the applicants on the recruiter's list for `job`.
    async fn claimed_applicants(
        &self,
        recruiter: &RecruiterId,
        job: &JobId,
    ) -> PersistResult<HashSet<ApplicantId>>;
}

/// A capability that decides whether an applicant may be rated.
pub trait ClaimCheck {
    /// Returns `true` if the applicant is on the recruiter's list.
    fn is_claimed(&self, applicant: ApplicantId) -> bool;
}

impl<F> ClaimCheck for F
where
    F: Fn(ApplicantId) -> bool,
{
    fn is_claimed(&self, applicant: ApplicantId) -> bool {
        self(applicant)
    }
}

/// A loaded snapshot of claimed applicants.
///
/// # Examples
///
/// ```
/// use hireboard_pipeline::{ClaimCheck, ClaimSet};
/// use uuid::Uuid;
///
/// let applicant = Uuid::new_v4();
/// let claims = ClaimSet::from_iter([applicant]);
/// assert!(claims.is_claimed(applicant));
/// assert!(!claims.is_claimed(Uuid::new_v4()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimSet(HashSet<ApplicantId>);

impl ClaimSet {
    /// Creates a claim set.
    #[must_use]
    pub fn new(claimed: HashSet<ApplicantId>) -> Self {
        Self(claimed)
    }

    /// Returns the number of claimed applicants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is claimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ApplicantId> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = ApplicantId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl ClaimCheck for ClaimSet {
    fn is_claimed(&self, applicant: ApplicantId) -> bool {
        self.0.contains(&applicant)
    }
}

/// The set of collaborators a board session works against.
#[derive(Clone)]
pub struct Collaborators {
    /// Application records.
    pub applications: Arc<dyn ApplicationRepository>,
    /// Stage configuration.
    pub stages: Arc<dyn StageRepository>,
    /// Media and criterion enrichment.
    pub enricher: Arc<dyn ApplicantEnricher>,
    /// Recruiter claims.
    pub claims: Arc<dyn ClaimDirectory>,
}

impl Collaborators {
    /// Uses a single backend for every concern.
    #[must_use]
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: ApplicationRepository + StageRepository + ApplicantEnricher + ClaimDirectory + 'static,
    {
        Self {
            applications: backend.clone(),
            stages: backend.clone(),
            enricher: backend.clone(),
            claims: backend,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_claim_checks() {
        let allowed = ApplicantId::new_v4();
        let check = move |applicant: ApplicantId| applicant == allowed;
        assert!(check.is_claimed(allowed));
        assert!(!check.is_claimed(ApplicantId::new_v4()));
    }

    #[test]
    fn claim_set_len() {
        let claims = ClaimSet::from_iter([ApplicantId::new_v4(), ApplicantId::new_v4()]);
        assert_eq!(claims.len(), 2);
        assert!(!claims.is_empty());
        assert!(ClaimSet::default().is_empty());
    }
}
