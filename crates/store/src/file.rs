//! JSON file storage.
//!
//! Board data for each job lives in its own directory under the store's
//! base path:
//!
//! ```text
//! <data dir>/
//! └── jobs/
//!     └── {job}/
//!         ├── applications.json
//!         ├── stages.json
//!         └── claims.json      # recruiter -> claimed applicant ids
//! ```
//!
//! Missing files read as empty. Writes are read-modify-write cycles and
//! are serialized through one lock per store.
//!
//! # Examples
//!
//! ```no_run
//! use hireboard_protocol::JobId;
//! use hireboard_protocol::dummy::dummy_applications;
//! use hireboard_store::JsonStore;
//!
//! # fn example() -> hireboard_store::Result<()> {
//! let store = JsonStore::with_path("/tmp/hireboard".into())?;
//! let job = JobId::new("backend");
//! if store.seed(&job, &dummy_applications())? {
//!     println!("seeded {}", store.job_dir(&job).display());
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hireboard_pipeline::{
    ApplicantEnricher, ApplicationRepository, ClaimDirectory, PersistResult, StageRepository,
};
use hireboard_protocol::{
    ApplicantId, ApplicantMedia, Application, ApplicationId, CriterionResult, JobId, RecruiterId,
    Stage, StageKey,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::error::{Result, StoreError};

const APPLICATIONS_FILE: &str = "applications.json";
const STAGES_FILE: &str = "stages.json";
const CLAIMS_FILE: &str = "claims.json";

/// Recruiter id to the applicants on their list.
type ClaimsFile = BTreeMap<String, BTreeSet<ApplicantId>>;

/// Board storage backed by JSON files.
#[derive(Debug)]
pub struct JsonStore {
    base_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Creates a store rooted at `base_path`, creating the directory if it
    /// doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    #[instrument]
    pub fn with_path(base_path: PathBuf) -> Result<Self> {
        if !base_path.exists() {
            debug!(?base_path, "creating data directory");
            fs::create_dir_all(&base_path).map_err(|source| StoreError::Io {
                path: base_path.clone(),
                source,
            })?;
        }

        Ok(Self {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the store's root directory.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the directory holding `job`'s files.
    ///
    /// Path separators and dots in the job id are replaced so the id can
    /// never escape the base path.
    #[must_use]
    pub fn job_dir(&self, job: &JobId) -> PathBuf {
        let safe_job = job.as_str().replace(['/', '\\', '.'], "_");
        self.base_path.join("jobs").join(safe_job)
    }

    /// Reads every application stored for `job`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read_applications(&self, job: &JobId) -> Result<Vec<Application>> {
        read_json(&self.job_dir(job).join(APPLICATIONS_FILE))
    }

    /// Replaces the applications stored for `job`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_applications(&self, job: &JobId, applications: &[Application]) -> Result<()> {
        write_json(&self.job_dir(job).join(APPLICATIONS_FILE), &applications)
    }

    /// Reads the stage configuration stored for `job`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read_stages(&self, job: &JobId) -> Result<Vec<Stage>> {
        read_json(&self.job_dir(job).join(STAGES_FILE))
    }

    /// Replaces the stage configuration stored for `job`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_stages(&self, job: &JobId, stages: &[Stage]) -> Result<()> {
        write_json(&self.job_dir(job).join(STAGES_FILE), &stages)
    }

    /// Writes `applications` for `job` unless applications are already
    /// stored. Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing file is unreadable or the new one
    /// cannot be written.
    #[instrument(skip(self, applications), fields(count = applications.len()))]
    pub fn seed(&self, job: &JobId, applications: &[Application]) -> Result<bool> {
        if !self.read_applications(job)?.is_empty() {
            debug!("applications already stored, not seeding");
            return Ok(false);
        }
        self.write_applications(job, applications)?;
        Ok(true)
    }

    /// Adds `applicant` to `recruiter`'s list for `job`.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims file cannot be read or written.
    pub fn claim(&self, recruiter: &RecruiterId, job: &JobId, applicant: ApplicantId) -> Result<()> {
        let path = self.job_dir(job).join(CLAIMS_FILE);
        let mut claims: ClaimsFile = read_json(&path)?;
        claims
            .entry(recruiter.as_str().to_string())
            .or_default()
            .insert(applicant);
        write_json(&path, &claims)
    }

    fn read_claims(&self, recruiter: &RecruiterId, job: &JobId) -> Result<HashSet<ApplicantId>> {
        let mut claims: ClaimsFile = read_json(&self.job_dir(job).join(CLAIMS_FILE))?;
        Ok(claims
            .remove(recruiter.as_str())
            .map(|set| set.into_iter().collect())
            .unwrap_or_default())
    }

    fn update_application(
        &self,
        job: &JobId,
        id: ApplicationId,
        update: impl FnOnce(&mut Application),
    ) -> Result<()> {
        let mut applications = self.read_applications(job)?;
        let app = applications
            .iter_mut()
            .find(|app| app.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("application {id} in job {job}")))?;
        update(app);
        self.write_applications(job, &applications)
    }

    fn find_applicant(&self, applicant: ApplicantId) -> Result<Application> {
        let jobs_dir = self.base_path.join("jobs");
        let entries = match fs::read_dir(&jobs_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(format!("applicant {applicant}")));
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: jobs_dir,
                    source,
                });
            }
        };

        for entry in entries.flatten() {
            let path = entry.path().join(APPLICATIONS_FILE);
            let applications: Vec<Application> = read_json(&path)?;
            if let Some(app) = applications
                .into_iter()
                .find(|app| app.applicant.id == applicant)
            {
                return Ok(app);
            }
        }
        Err(StoreError::NotFound(format!("applicant {applicant}")))
    }
}

#[async_trait]
impl ApplicationRepository for JsonStore {
    #[instrument(skip(self))]
    async fn load_applications(&self, job: &JobId) -> PersistResult<Vec<Application>> {
        let applications = self.read_applications(job)?;
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
        let _guard = self.write_lock.lock().await;
        self.update_application(job, application, |app| app.status = status.clone())?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn persist_viewed(
        &self,
        job: &JobId,
        application: ApplicationId,
        viewed_at: DateTime<Utc>,
    ) -> PersistResult<()> {
        let _guard = self.write_lock.lock().await;
        self.update_application(job, application, |app| {
            app.viewed_at.get_or_insert(viewed_at);
        })?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn persist_rating(
        &self,
        job: &JobId,
        application: ApplicationId,
        rating: u8,
    ) -> PersistResult<()> {
        let _guard = self.write_lock.lock().await;
        self.update_application(job, application, |app| app.rating = rating)?;
        Ok(())
    }
}

#[async_trait]
impl StageRepository for JsonStore {
    #[instrument(skip(self))]
    async fn load_stage_config(&self, job: &JobId) -> PersistResult<Vec<Stage>> {
        Ok(self.read_stages(job)?)
    }

    #[instrument(skip(self, stages), fields(count = stages.len()))]
    async fn persist_stage_config(&self, job: &JobId, stages: &[Stage]) -> PersistResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write_stages(job, stages)?;
        Ok(())
    }
}

#[async_trait]
impl ApplicantEnricher for JsonStore {
    async fn resolve_media(&self, applicant: ApplicantId) -> PersistResult<ApplicantMedia> {
        Ok(self.find_applicant(applicant)?.media)
    }

    async fn resolve_criterion_results(
        &self,
        applicant: ApplicantId,
    ) -> PersistResult<Vec<CriterionResult>> {
        Ok(self.find_applicant(applicant)?.criterion_results)
    }
}

#[async_trait]
impl ClaimDirectory for JsonStore {
    #[instrument(skip(self))]
    async fn claimed_applicants(
        &self,
        recruiter: &RecruiterId,
        job: &JobId,
    ) -> PersistResult<HashSet<ApplicantId>> {
        Ok(self.read_claims(recruiter, job)?)
    }
}

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).map_err(|source| {
            warn!(?path, error = %source, "failed to parse data file");
            StoreError::Parse {
                path: path.to_path_buf(),
                source,
            }
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(?path, "data file not found");
            Ok(T::default())
        }
        Err(source) => {
            warn!(?path, error = %source, "failed to read data file");
            Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.exists()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(?path, "data file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hireboard_pipeline::PersistenceError;
    use hireboard_protocol::dummy::dummy_applications;
    use hireboard_protocol::{Applicant, BuiltinStage, default_stages};
    use tempfile::TempDir;

    fn create_test_store() -> (JsonStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonStore::with_path(temp_dir.path().to_path_buf()).expect("create store");
        (store, temp_dir)
    }

    fn job() -> JobId {
        JobId::new("backend")
    }

    fn seeded() -> (JsonStore, TempDir, Application) {
        let (store, temp) = create_test_store();
        let app = Application::new(
            Applicant::new("Ada", "ada@example.com"),
            BuiltinStage::Pending.into(),
        );
        store.write_applications(&job(), &[app.clone()]).unwrap();
        (store, temp, app)
    }

    #[test]
    fn job_dir_sanitizes_input() {
        let (store, _temp) = create_test_store();
        assert!(store.job_dir(&job()).ends_with("jobs/backend"));
        assert!(store.job_dir(&JobId::new("../evil")).ends_with("jobs/___evil"));
    }

    #[tokio::test]
    async fn missing_files_load_empty() {
        let (store, _temp) = create_test_store();
        assert!(store.load_applications(&job()).await.unwrap().is_empty());
        assert!(store.load_stage_config(&job()).await.unwrap().is_empty());
        let claims = store
            .claimed_applicants(&RecruiterId::new("grace"), &job())
            .await
            .unwrap();
        assert!(claims.is_empty());
    }

    #[tokio::test]
    async fn status_viewed_and_rating_writes_update_the_record() {
        let (store, _temp, app) = seeded();
        let viewed_at = Utc::now();

        store
            .persist_status(&job(), app.id, &BuiltinStage::Interview.into())
            .await
            .unwrap();
        store.persist_viewed(&job(), app.id, viewed_at).await.unwrap();
        store.persist_rating(&job(), app.id, 4).await.unwrap();

        let stored = &store.read_applications(&job()).unwrap()[0];
        assert_eq!(stored.status, StageKey::from(BuiltinStage::Interview));
        assert_eq!(stored.viewed_at, Some(viewed_at));
        assert_eq!(stored.rating, 4);
    }

    #[tokio::test]
    async fn viewed_is_only_recorded_once() {
        let (store, _temp, app) = seeded();
        let first = Utc::now();
        store.persist_viewed(&job(), app.id, first).await.unwrap();
        store
            .persist_viewed(&job(), app.id, first + chrono::Duration::hours(1))
            .await
            .unwrap();

        let stored = &store.read_applications(&job()).unwrap()[0];
        assert_eq!(stored.viewed_at, Some(first));
    }

    #[tokio::test]
    async fn unknown_application_is_not_found() {
        let (store, _temp, _app) = seeded();
        let err = store
            .persist_status(&job(), ApplicationId::new_v4(), &BuiltinStage::Hired.into())
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::NotFound(_)));
    }

    #[tokio::test]
    async fn stage_config_roundtrip() {
        let (store, _temp) = create_test_store();
        let stages = default_stages();
        store.persist_stage_config(&job(), &stages).await.unwrap();
        assert_eq!(store.load_stage_config(&job()).await.unwrap(), stages);
    }

    #[tokio::test]
    async fn claims_are_per_recruiter() {
        let (store, _temp, app) = seeded();
        let grace = RecruiterId::new("grace");
        store.claim(&grace, &job(), app.applicant.id).unwrap();

        let claims = store.claimed_applicants(&grace, &job()).await.unwrap();
        assert!(claims.contains(&app.applicant.id));

        let other = store
            .claimed_applicants(&RecruiterId::new("linus"), &job())
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn enrichment_reads_the_stored_record() {
        let (store, _temp) = create_test_store();
        let apps = dummy_applications();
        store.write_applications(&job(), &apps).unwrap();

        let first = &apps[0];
        let media = store.resolve_media(first.applicant.id).await.unwrap();
        assert_eq!(media, first.media);
        let criteria = store
            .resolve_criterion_results(first.applicant.id)
            .await
            .unwrap();
        assert_eq!(criteria, first.criterion_results);

        let err = store
            .resolve_media(ApplicantId::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::NotFound(_)));
    }

    #[test]
    fn seed_only_writes_once() {
        let (store, _temp) = create_test_store();
        let apps = dummy_applications();
        assert!(store.seed(&job(), &apps).unwrap());
        assert!(!store.seed(&job(), &apps[..1]).unwrap());
        assert_eq!(store.read_applications(&job()).unwrap().len(), apps.len());
    }

    #[tokio::test]
    async fn corrupt_file_is_unavailable() {
        let (store, _temp) = create_test_store();
        let dir = store.job_dir(&job());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(APPLICATIONS_FILE), "not valid json").unwrap();

        let err = store.load_applications(&job()).await.unwrap_err();
        let PersistenceError::Unavailable(reason) = err else {
            panic!("expected Unavailable, got {err:?}");
        };
        assert!(reason.contains("applications.json"));
    }

    #[test]
    fn with_path_creates_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("data");
        assert!(!path.exists());
        let store = JsonStore::with_path(path.clone()).unwrap();
        assert!(path.exists());
        assert_eq!(store.base_path(), path);
    }
}
