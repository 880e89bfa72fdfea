//! The in-memory application store for one job.
//!
//! The store exclusively owns the loaded applications. Their order in the
//! backing list is the display order inside each column, so every move is a
//! remove-and-insert on that list. Applications are never handed out
//! mutably; all changes go through the methods below.

use chrono::{DateTime, Utc};
use hireboard_protocol::{Application, ApplicationId, JobId, Stage, StageKey, validate_rating};
use tracing::{debug, warn};

use crate::collaborator::ClaimCheck;
use crate::error::{PersistenceError, PipelineError, Result};
use crate::partition::{BoardPartition, partition_by_stage};
use crate::transition::{InFlight, Placement, Settlement, TransitionTicket};

/// A rating change that was applied optimistically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingChange {
    /// The application rated.
    pub application: ApplicationId,
    /// Rating before the change.
    pub previous: u8,
    /// Rating after the change.
    pub current: u8,
}

/// Applications of the current job.
///
/// # Examples
///
/// ```
/// use hireboard_pipeline::ApplicationStore;
/// use hireboard_protocol::{Applicant, Application, BuiltinStage, JobId, default_stages};
///
/// let app = Application::new(Applicant::new("Ada", "ada@example.com"), BuiltinStage::Pending.into());
/// let store = ApplicationStore::new(JobId::new("job"), vec![app]);
/// let stages = default_stages();
/// assert_eq!(store.partition(&stages).placed(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ApplicationStore {
    job: JobId,
    applications: Vec<Application>,
    in_flight: InFlight,
}

impl ApplicationStore {
    /// Creates a store from loaded applications.
    #[must_use]
    pub fn new(job: JobId, applications: Vec<Application>) -> Self {
        Self {
            job,
            applications,
            in_flight: InFlight::default(),
        }
    }

    /// Returns the job these applications belong to.
    #[must_use]
    pub fn job(&self) -> &JobId {
        &self.job
    }

    /// All applications in display order.
    #[must_use]
    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    /// Looks up an application.
    #[must_use]
    pub fn get(&self, id: ApplicationId) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == id)
    }

    fn index_of(&self, id: ApplicationId) -> Option<usize> {
        self.applications.iter().position(|a| a.id == id)
    }

    fn require(&self, id: ApplicationId) -> Result<usize> {
        self.index_of(id).ok_or(PipelineError::UnknownApplication(id))
    }

    /// Number of applications with this status.
    #[must_use]
    pub fn count_in(&self, stage: &StageKey) -> usize {
        self.applications.iter().filter(|a| &a.status == stage).count()
    }

    /// Applications of one stage in display order.
    #[must_use]
    pub fn column(&self, stage: &StageKey) -> Vec<&Application> {
        self.applications
            .iter()
            .filter(|a| &a.status == stage)
            .collect()
    }

    /// Returns `true` while a status write for the application is unresolved.
    #[must_use]
    pub fn is_syncing(&self, id: ApplicationId) -> bool {
        self.in_flight.is_pending(id)
    }

    /// Groups the applications by the given stages.
    #[must_use]
    pub fn partition<'a, S>(&'a self, stages: S) -> BoardPartition<'a>
    where
        S: IntoIterator<Item = &'a Stage>,
    {
        partition_by_stage(&self.applications, stages)
    }

    fn placement(&self, index: usize) -> Placement {
        let status = &self.applications[index].status;
        let previous = self.applications[..index]
            .iter()
            .rev()
            .find(|a| &a.status == status)
            .map(|a| a.id);
        let next = self.applications[index + 1..]
            .iter()
            .find(|a| &a.status == status)
            .map(|a| a.id);
        Placement {
            next,
            previous,
            index,
        }
    }

    /// Removes the application at `index` and re-inserts it in front of
    /// `before` (when that card has `status`) or after the last card of
    /// `status`.
    fn relocate(&mut self, index: usize, status: &StageKey, before: Option<ApplicationId>) {
        let app = self.applications.remove(index);
        let anchor = before.and_then(|b| {
            self.applications
                .iter()
                .position(|a| a.id == b && &a.status == status)
        });
        let target = anchor.unwrap_or_else(|| {
            self.applications
                .iter()
                .rposition(|a| &a.status == status)
                .map_or(self.applications.len(), |i| i + 1)
        });
        self.applications.insert(target, app);
    }

    fn restore(&mut self, index: usize, origin: &Placement) {
        let app = self.applications.remove(index);
        let status = app.status.clone();
        let position = |id: Option<ApplicationId>, apps: &[Application]| {
            id.and_then(|id| apps.iter().position(|a| a.id == id && a.status == status))
        };
        let target = position(origin.next, &self.applications)
            .or_else(|| position(origin.previous, &self.applications).map(|i| i + 1))
            .unwrap_or_else(|| origin.index.min(self.applications.len()));
        self.applications.insert(target, app);
    }

    /// Reorders an application inside its current column.
    ///
    /// With `before` the card is placed directly in front of that card,
    /// otherwise at the end of the column. Returns `false` when nothing
    /// moved. Ordering is kept in memory only.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownApplication`] for an unknown id and
    /// [`PipelineError::InvariantViolation`] when `before` is in another
    /// column.
    pub fn move_within(
        &mut self,
        id: ApplicationId,
        before: Option<ApplicationId>,
    ) -> Result<bool> {
        let index = self.require(id)?;
        let status = self.applications[index].status.clone();
        if let Some(before) = before {
            if before == id {
                return Ok(false);
            }
            let anchor = self.require(before)?;
            if self.applications[anchor].status != status {
                return Err(PipelineError::invariant(
                    "cannot reorder against a card in another column",
                ));
            }
        }
        let old = self.column(&status).iter().map(|a| a.id).collect::<Vec<_>>();
        self.relocate(index, &status, before);
        let new = self.column(&status).iter().map(|a| a.id).collect::<Vec<_>>();
        Ok(old != new)
    }

    /// Optimistically moves an application to another stage.
    ///
    /// The application is placed in front of `before` when that card is in
    /// the target column, otherwise appended. The returned ticket must be
    /// settled with [`ApplicationStore::settle_transition`] once the
    /// persistence call resolves.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownApplication`] for an unknown id and
    /// [`PipelineError::InvariantViolation`] if the application already has
    /// the target status.
    pub fn begin_transition(
        &mut self,
        id: ApplicationId,
        to: &StageKey,
        before: Option<ApplicationId>,
    ) -> Result<TransitionTicket> {
        let index = self.require(id)?;
        let from = self.applications[index].status.clone();
        if &from == to {
            return Err(PipelineError::invariant(format!(
                "application is already in {to}"
            )));
        }
        let origin = self.placement(index);
        self.applications[index].status = to.clone();
        self.relocate(index, to, before);
        let ticket = self.in_flight.issue(id, from, to.clone(), origin);
        debug!(
            job = %self.job,
            application = %id,
            ticket = %ticket.id,
            from = %ticket.from,
            to = %ticket.to,
            "applied optimistic transition"
        );
        Ok(ticket)
    }

    /// Applies the outcome of a status write.
    ///
    /// A failure only rolls back when the ticket is still the newest
    /// optimistic state of the application; older failures are recorded
    /// and otherwise ignored.
    pub fn settle_transition(
        &mut self,
        ticket: &TransitionTicket,
        outcome: &std::result::Result<(), PersistenceError>,
    ) -> Settlement {
        if outcome.is_ok() {
            self.in_flight.confirm(ticket);
            return Settlement::Confirmed;
        }

        let Some(index) = self.index_of(ticket.application) else {
            return Settlement::Superseded;
        };
        let current = self.applications[index].status.clone();
        let Some(rollback) = self.in_flight.fail(ticket, &current) else {
            warn!(
                job = %self.job,
                application = %ticket.application,
                ticket = %ticket.id,
                "ignoring failure of superseded transition"
            );
            return Settlement::Superseded;
        };

        self.applications[index].status = rollback.status.clone();
        self.restore(index, &rollback.origin);
        warn!(
            job = %self.job,
            application = %ticket.application,
            ticket = %ticket.id,
            restored = %rollback.status,
            "rolled back failed transition"
        );
        Settlement::RolledBack {
            restored: rollback.status,
        }
    }

    /// Moves an application to `stage` outside the transition protocol.
    ///
    /// Pending transitions of the application are forgotten, so their late
    /// failures cannot pull it back.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownApplication`] for an unknown id.
    pub fn force_status(&mut self, id: ApplicationId, stage: &StageKey) -> Result<()> {
        let index = self.require(id)?;
        self.applications[index].status = stage.clone();
        self.relocate(index, stage, None);
        self.in_flight.forget(id);
        Ok(())
    }

    /// Moves every application of `from` to the end of `to`.
    ///
    /// Returns the ids that moved, in their previous order.
    pub fn reassign_stage(&mut self, from: &StageKey, to: &StageKey) -> Vec<ApplicationId> {
        let moved: Vec<ApplicationId> = self.column(from).iter().map(|a| a.id).collect();
        for id in &moved {
            if let Some(index) = self.index_of(*id) {
                self.applications[index].status = to.clone();
                self.relocate(index, to, None);
                self.in_flight.forget(*id);
            }
        }
        if !moved.is_empty() {
            debug!(job = %self.job, from = %from, to = %to, count = moved.len(), "reassigned applications");
        }
        moved
    }

    /// Records the first time an application was opened.
    ///
    /// Returns the timestamp that was set, or `None` if the application had
    /// already been viewed.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownApplication`] for an unknown id.
    pub fn mark_viewed(
        &mut self,
        id: ApplicationId,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>> {
        let index = self.require(id)?;
        let app = &mut self.applications[index];
        if app.viewed_at.is_some() {
            return Ok(None);
        }
        app.viewed_at = Some(now);
        Ok(Some(now))
    }

    /// Sets the recruiter rating of a claimed applicant.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Validation`] for a rating above 5,
    /// [`PipelineError::UnknownApplication`] for an unknown id, and
    /// [`PipelineError::NotClaimed`] when the applicant is not on the
    /// recruiter's list. Nothing changes on error.
    pub fn set_rating(
        &mut self,
        id: ApplicationId,
        rating: u8,
        claims: &dyn ClaimCheck,
    ) -> Result<RatingChange> {
        let rating = validate_rating(rating)?;
        let index = self.require(id)?;
        let app = &mut self.applications[index];
        if !claims.is_claimed(app.applicant.id) {
            return Err(PipelineError::NotClaimed(id));
        }
        let previous = app.rating;
        app.rating = rating;
        Ok(RatingChange {
            application: id,
            previous,
            current: rating,
        })
    }

    /// Undoes a failed rating write if the rating still shows it.
    pub fn revert_rating(&mut self, change: &RatingChange) -> bool {
        match self.index_of(change.application) {
            Some(index) if self.applications[index].rating == change.current => {
                self.applications[index].rating = change.previous;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use hireboard_protocol::{Applicant, ApplicantId};

    use super::*;
    use crate::collaborator::ClaimSet;

    fn key(s: &str) -> StageKey {
        StageKey::new(s).unwrap()
    }

    fn app(name: &str, status: &str) -> Application {
        Application::new(
            Applicant::new(name, format!("{name}@example.com")),
            key(status),
        )
    }

    fn column_names(store: &ApplicationStore, status: &str) -> Vec<String> {
        store
            .column(&key(status))
            .iter()
            .map(|a| a.applicant.name.clone())
            .collect()
    }

    fn store() -> ApplicationStore {
        ApplicationStore::new(
            JobId::new("job"),
            vec![
                app("a", "pending"),
                app("x", "reviewing"),
                app("b", "pending"),
                app("y", "reviewing"),
                app("c", "pending"),
            ],
        )
    }

    fn id_of(store: &ApplicationStore, name: &str) -> ApplicationId {
        store
            .applications()
            .iter()
            .find(|a| a.applicant.name == name)
            .map(|a| a.id)
            .unwrap()
    }

    fn failure() -> std::result::Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable("offline".into()))
    }

    #[test]
    fn transition_appends_or_inserts() {
        let mut store = store();
        let b = id_of(&store, "b");
        let y = id_of(&store, "y");
        store.begin_transition(b, &key("reviewing"), Some(y)).unwrap();
        assert_eq!(column_names(&store, "reviewing"), ["x", "b", "y"]);
        assert_eq!(column_names(&store, "pending"), ["a", "c"]);

        let a = id_of(&store, "a");
        store.begin_transition(a, &key("reviewing"), None).unwrap();
        assert_eq!(column_names(&store, "reviewing"), ["x", "b", "y", "a"]);
    }

    #[test]
    fn transition_to_same_stage_is_rejected() {
        let mut store = store();
        let a = id_of(&store, "a");
        assert!(matches!(
            store.begin_transition(a, &key("pending"), None),
            Err(PipelineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn rollback_restores_origin_position() {
        let mut store = store();
        let b = id_of(&store, "b");
        let ticket = store.begin_transition(b, &key("interview"), None).unwrap();
        assert!(store.is_syncing(b));

        let settled = store.settle_transition(&ticket, &failure());
        assert_eq!(
            settled,
            Settlement::RolledBack {
                restored: key("pending")
            }
        );
        assert_eq!(column_names(&store, "pending"), ["a", "b", "c"]);
        assert!(!store.is_syncing(b));
    }

    #[test]
    fn rollback_uses_previous_neighbor_when_next_left() {
        let mut store = store();
        let b = id_of(&store, "b");
        let c = id_of(&store, "c");
        let ticket = store.begin_transition(b, &key("interview"), None).unwrap();
        store.begin_transition(c, &key("hired"), None).unwrap();

        store.settle_transition(&ticket, &failure());
        assert_eq!(column_names(&store, "pending"), ["a", "b"]);
    }

    #[test]
    fn success_keeps_new_status() {
        let mut store = store();
        let a = id_of(&store, "a");
        let ticket = store.begin_transition(a, &key("hired"), None).unwrap();
        assert_eq!(store.settle_transition(&ticket, &Ok(())), Settlement::Confirmed);
        assert_eq!(store.get(a).map(|a| a.status.clone()), Some(key("hired")));
        assert!(!store.is_syncing(a));
    }

    #[test]
    fn last_wins_out_of_order() {
        let mut store = store();
        let a = id_of(&store, "a");
        let t1 = store.begin_transition(a, &key("reviewing"), None).unwrap();
        let t2 = store.begin_transition(a, &key("interview"), None).unwrap();

        // The older call fails after the newer one was issued: ignored.
        assert_eq!(store.settle_transition(&t1, &failure()), Settlement::Superseded);
        assert_eq!(store.get(a).map(|a| a.status.as_str().to_string()), Some("interview".into()));

        // The newer call fails too: the walk skips the failed state.
        assert_eq!(
            store.settle_transition(&t2, &failure()),
            Settlement::RolledBack {
                restored: key("pending")
            }
        );
        assert_eq!(column_names(&store, "pending"), ["a", "b", "c"]);
    }

    #[test]
    fn older_failure_after_newer_success_is_ignored() {
        let mut store = store();
        let a = id_of(&store, "a");
        let t1 = store.begin_transition(a, &key("reviewing"), None).unwrap();
        let t2 = store.begin_transition(a, &key("interview"), None).unwrap();
        store.settle_transition(&t2, &Ok(()));
        assert_eq!(store.settle_transition(&t1, &failure()), Settlement::Superseded);
        assert_eq!(store.get(a).map(|a| a.status.clone()), Some(key("interview")));
    }

    #[test]
    fn move_within_reorders() {
        let mut store = store();
        let a = id_of(&store, "a");
        let c = id_of(&store, "c");
        assert!(store.move_within(c, Some(a)).unwrap());
        assert_eq!(column_names(&store, "pending"), ["c", "a", "b"]);
        assert!(store.move_within(c, None).unwrap());
        assert_eq!(column_names(&store, "pending"), ["a", "b", "c"]);
        assert!(!store.move_within(c, None).unwrap());
        assert!(!store.move_within(c, Some(c)).unwrap());

        let x = id_of(&store, "x");
        assert!(matches!(
            store.move_within(c, Some(x)),
            Err(PipelineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn reassign_moves_everything_and_forgets_tickets() {
        let mut store = store();
        let x = id_of(&store, "x");
        let ticket = store.begin_transition(x, &key("interview"), None).unwrap();
        let moved = store.reassign_stage(&key("interview"), &key("hired"));
        assert_eq!(moved, vec![x]);

        assert_eq!(store.settle_transition(&ticket, &failure()), Settlement::Superseded);
        assert_eq!(store.get(x).map(|a| a.status.clone()), Some(key("hired")));
        assert_eq!(store.count_in(&key("interview")), 0);
    }

    #[test]
    fn mark_viewed_is_idempotent() {
        let mut store = store();
        let a = id_of(&store, "a");
        let first = Utc::now();
        assert_eq!(store.mark_viewed(a, first).unwrap(), Some(first));
        let later = first + chrono::Duration::minutes(5);
        assert_eq!(store.mark_viewed(a, later).unwrap(), None);
        assert_eq!(store.get(a).and_then(|a| a.viewed_at), Some(first));
    }

    #[test]
    fn rating_requires_claim() {
        let mut store = store();
        let a = id_of(&store, "a");
        let applicant = store.get(a).map(|a| a.applicant.id).unwrap();

        let nobody = ClaimSet::default();
        assert_eq!(store.set_rating(a, 4, &nobody), Err(PipelineError::NotClaimed(a)));
        assert_eq!(store.get(a).map(|a| a.rating), Some(0));

        let claims = ClaimSet::from_iter([applicant]);
        assert!(matches!(store.set_rating(a, 6, &claims), Err(PipelineError::Validation(_))));

        let change = store.set_rating(a, 4, &claims).unwrap();
        assert_eq!((change.previous, change.current), (0, 4));
        assert_eq!(store.get(a).map(|a| a.rating), Some(4));

        let newer = store.set_rating(a, 5, &claims).unwrap();
        assert!(!store.revert_rating(&change));
        assert!(store.revert_rating(&newer));
        assert_eq!(store.get(a).map(|a| a.rating), Some(4));

        let unknown = ApplicantId::new_v4();
        assert!(!claims.is_claimed(unknown));
    }
}
