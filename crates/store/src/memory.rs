//! In-memory storage.
//!
//! [`MemoryStore`] keeps every job's board data in process. It backs the
//! demo mode and doubles as a configurable fake: writes can be switched to
//! fail and every call can be slowed down, which is how rollbacks and
//! timeouts are exercised without a real server.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hireboard_pipeline::{
    ApplicantEnricher, ApplicationRepository, ClaimDirectory, PersistResult, PersistenceError,
    StageRepository,
};
use hireboard_protocol::dummy::{DUMMY_JOB, dummy_applications};
use hireboard_protocol::{
    ApplicantId, ApplicantMedia, Application, ApplicationId, BuiltinStage, CriterionResult, JobId,
    RecruiterId, Stage, StageKey,
};
use tracing::{debug, instrument};

#[derive(Debug, Default)]
struct JobData {
    applications: Vec<Application>,
    stages: Vec<Stage>,
    claims: HashMap<RecruiterId, HashSet<ApplicantId>>,
}

#[derive(Debug, Default)]
struct State {
    jobs: HashMap<JobId, JobData>,
    offline: bool,
    latency: Duration,
    writes: usize,
}

/// Board storage held in memory.
///
/// # Examples
///
/// ```
/// use hireboard_protocol::{JobId, RecruiterId};
/// use hireboard_protocol::dummy::DUMMY_JOB;
/// use hireboard_store::MemoryStore;
///
/// let store = MemoryStore::demo(&RecruiterId::new("grace"));
/// assert!(store.stages(&JobId::new(DUMMY_JOB)).is_empty());
/// assert_eq!(store.write_count(), 0);
///
/// // From here on every call fails.
/// store.set_offline(true);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the demo applications for
    /// [`DUMMY_JOB`], with every applicant outside the inbox and the
    /// rejected bucket claimed by `recruiter`.
    #[must_use]
    pub fn demo(recruiter: &RecruiterId) -> Self {
        let store = Self::new();
        let job = JobId::new(DUMMY_JOB);
        let applications = dummy_applications();
        for app in &applications {
            let claimable = !matches!(
                app.status.builtin(),
                Some(BuiltinStage::Pending | BuiltinStage::Rejected)
            );
            if claimable {
                store.claim(recruiter, &job, app.applicant.id);
            }
        }
        store.insert_applications(&job, applications);
        store
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds applications to `job`.
    pub fn insert_applications(
        &self,
        job: &JobId,
        applications: impl IntoIterator<Item = Application>,
    ) {
        self.state()
            .jobs
            .entry(job.clone())
            .or_default()
            .applications
            .extend(applications);
    }

    /// Replaces `job`'s stage configuration without counting as a write.
    pub fn insert_stages(&self, job: &JobId, stages: Vec<Stage>) {
        self.state().jobs.entry(job.clone()).or_default().stages = stages;
    }

    /// Adds `applicant` to `recruiter`'s list for `job`.
    pub fn claim(&self, recruiter: &RecruiterId, job: &JobId, applicant: ApplicantId) {
        self.state()
            .jobs
            .entry(job.clone())
            .or_default()
            .claims
            .entry(recruiter.clone())
            .or_default()
            .insert(applicant);
    }

    /// Makes every subsequent call fail with
    /// [`PersistenceError::Unavailable`] until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    /// Delays every subsequent call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.state().latency = latency;
    }

    /// Returns the stored copy of an application.
    #[must_use]
    pub fn application(&self, job: &JobId, id: ApplicationId) -> Option<Application> {
        self.state()
            .jobs
            .get(job)
            .and_then(|data| data.applications.iter().find(|app| app.id == id))
            .cloned()
    }

    /// Returns the stored stage configuration for `job`.
    #[must_use]
    pub fn stages(&self, job: &JobId) -> Vec<Stage> {
        self.state()
            .jobs
            .get(job)
            .map(|data| data.stages.clone())
            .unwrap_or_default()
    }

    /// Number of writes that reached the store successfully.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state().writes
    }

    /// Waits out the configured latency, then fails if the store is
    /// offline.
    async fn gate(&self) -> PersistResult<()> {
        let latency = self.state().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.state().offline {
            return Err(PersistenceError::Unavailable("store is offline".into()));
        }
        Ok(())
    }

    fn update_application(
        &self,
        job: &JobId,
        id: ApplicationId,
        update: impl FnOnce(&mut Application),
    ) -> PersistResult<()> {
        let mut state = self.state();
        let app = state
            .jobs
            .get_mut(job)
            .and_then(|data| data.applications.iter_mut().find(|app| app.id == id))
            .ok_or_else(|| PersistenceError::NotFound(format!("application {id} in job {job}")))?;
        update(app);
        state.writes += 1;
        Ok(())
    }

    fn find_applicant(&self, applicant: ApplicantId) -> PersistResult<Application> {
        self.state()
            .jobs
            .values()
            .flat_map(|data| &data.applications)
            .find(|app| app.applicant.id == applicant)
            .cloned()
            .ok_or_else(|| PersistenceError::NotFound(format!("applicant {applicant}")))
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    #[instrument(skip(self))]
    async fn load_applications(&self, job: &JobId) -> PersistResult<Vec<Application>> {
        self.gate().await?;
        let applications = self
            .state()
            .jobs
            .get(job)
            .map(|data| data.applications.clone())
            .unwrap_or_default();
        debug!(count = applications.len(), "loaded applications");
        Ok(applications)
    }

    #[instrument(skip(self))]
    async fn persist_status(
        &self,
        job: &JobId,
        application: ApplicationId,
        status: &StageKey,
    ) -> PersistResult<()> {
        self.gate().await?;
        self.update_application(job, application, |app| app.status = status.clone())
    }

    #[instrument(skip(self))]
    async fn persist_viewed(
        &self,
        job: &JobId,
        application: ApplicationId,
        viewed_at: DateTime<Utc>,
    ) -> PersistResult<()> {
        self.gate().await?;
        self.update_application(job, application, |app| {
            app.viewed_at.get_or_insert(viewed_at);
        })
    }

    #[instrument(skip(self))]
    async fn persist_rating(
        &self,
        job: &JobId,
        application: ApplicationId,
        rating: u8,
    ) -> PersistResult<()> {
        self.gate().await?;
        self.update_application(job, application, |app| app.rating = rating)
    }
}

#[async_trait]
impl StageRepository for MemoryStore {
    async fn load_stage_config(&self, job: &JobId) -> PersistResult<Vec<Stage>> {
        self.gate().await?;
        Ok(self.stages(job))
    }

    #[instrument(skip(self, stages), fields(count = stages.len()))]
    async fn persist_stage_config(&self, job: &JobId, stages: &[Stage]) -> PersistResult<()> {
        self.gate().await?;
        let mut state = self.state();
        state.jobs.entry(job.clone()).or_default().stages = stages.to_vec();
        state.writes += 1;
        Ok(())
    }
}

#[async_trait]
impl ApplicantEnricher for MemoryStore {
    async fn resolve_media(&self, applicant: ApplicantId) -> PersistResult<ApplicantMedia> {
        self.gate().await?;
        Ok(self.find_applicant(applicant)?.media)
    }

    async fn resolve_criterion_results(
        &self,
        applicant: ApplicantId,
    ) -> PersistResult<Vec<CriterionResult>> {
        self.gate().await?;
        Ok(self.find_applicant(applicant)?.criterion_results)
    }
}

#[async_trait]
impl ClaimDirectory for MemoryStore {
    async fn claimed_applicants(
        &self,
        recruiter: &RecruiterId,
        job: &JobId,
    ) -> PersistResult<HashSet<ApplicantId>> {
        self.gate().await?;
        Ok(self
            .state()
            .jobs
            .get(job)
            .and_then(|data| data.claims.get(recruiter))
            .cloned()
            .unwrap_or_default())
    }
}
