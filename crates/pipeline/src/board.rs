//! The board session.
//!
//! [`PipelineBoard`] owns everything one recruiter's view of one job needs:
//! the stage registry, the application store, the drag coordinator, the
//! pointer sensor, the notice queue and the dispatcher for persistence
//! calls. The front end feeds it input events and drains completions with
//! [`PipelineBoard::pump`]; the board applies every state change itself.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hireboard_protocol::{
    ApplicantMedia, Application, ApplicationId, JobId, RecruiterId, Stage, StageKey,
};
use tracing::{debug, info, instrument, warn};

use crate::collaborator::{ApplicantEnricher, ClaimCheck, ClaimSet, Collaborators};
use crate::collision::{BoardLayout, DropTarget};
use crate::dispatch::{Completion, DEFAULT_PERSIST_TIMEOUT, Dispatcher};
use crate::drag::{Direction, DragCoordinator, DropOutcome};
use crate::error::{PersistResult, PipelineError, Result};
use crate::geometry::Point;
use crate::notice::Notices;
use crate::partition::BoardPartition;
use crate::registry::{RevertOutcome, StageEdit, StageEditKind, StageRegistry};
use crate::sensor::{DEFAULT_ACTIVATION_DISTANCE, PointerSensor};
use crate::store::{ApplicationStore, RatingChange};
use crate::transition::{Settlement, TransitionTicket};

/// The job and recruiter a board session works for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineContext {
    /// The job whose applications are shown.
    pub job: JobId,
    /// The recruiter using the board.
    pub recruiter: RecruiterId,
}

impl PipelineContext {
    /// Creates a context.
    #[must_use]
    pub fn new(job: JobId, recruiter: RecruiterId) -> Self {
        Self { job, recruiter }
    }
}

/// Tunables of a board session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardSettings {
    /// Pointer travel needed before a press becomes a drag.
    pub activation_distance: f64,
    /// Bound on every persistence call.
    pub persist_timeout: Duration,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            activation_distance: DEFAULT_ACTIVATION_DISTANCE,
            persist_timeout: DEFAULT_PERSIST_TIMEOUT,
        }
    }
}

/// What a pointer release did.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerRelease {
    /// Nothing was pressed or dragged.
    Idle,
    /// A card was clicked without dragging.
    Click(ApplicationId),
    /// A drag ended.
    Drop(DropOutcome),
}

/// One recruiter's session on one job's pipeline board.
pub struct PipelineBoard {
    context: PipelineContext,
    collaborators: Collaborators,
    registry: StageRegistry,
    store: ApplicationStore,
    claims: ClaimSet,
    drag: DragCoordinator,
    sensor: PointerSensor,
    notices: Notices,
    dispatcher: Dispatcher,
    drift_reported: HashSet<(ApplicationId, StageKey)>,
}

impl std::fmt::Debug for PipelineBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineBoard")
            .field("context", &self.context)
            .field("stages", &self.registry.stages().len())
            .field("applications", &self.store.applications().len())
            .field("drag", self.drag.state())
            .finish_non_exhaustive()
    }
}

async fn enrich(enricher: &dyn ApplicantEnricher, app: &mut Application) {
    let applicant = app.applicant.id;
    match enricher.resolve_media(applicant).await {
        Ok(media) if !media.is_empty() => app.media = media,
        Ok(_) => {}
        Err(err) => {
            warn!(application = %app.id, error = %err, "media unavailable; showing without media");
            app.media = ApplicantMedia::default();
        }
    }
    match enricher.resolve_criterion_results(applicant).await {
        Ok(results) if !results.is_empty() => app.criterion_results = results,
        Ok(_) => {}
        Err(err) => {
            warn!(application = %app.id, error = %err, "criterion results unavailable");
            app.criterion_results.clear();
        }
    }
}

impl PipelineBoard {
    /// Loads stages, applications and claims for the context's job.
    ///
    /// Enrichment and claim lookups degrade gracefully; only failing to
    /// load the stage configuration or the applications is an error.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Persistence`] if stages or applications
    /// cannot be loaded.
    #[instrument(skip(collaborators, settings), fields(job = %context.job))]
    pub async fn load(
        context: PipelineContext,
        collaborators: Collaborators,
        settings: BoardSettings,
    ) -> Result<Self> {
        let stages = collaborators.stages.load_stage_config(&context.job).await?;
        let mut applications = collaborators
            .applications
            .load_applications(&context.job)
            .await?;
        for app in &mut applications {
            enrich(collaborators.enricher.as_ref(), app).await;
        }
        let claims = match collaborators
            .claims
            .claimed_applicants(&context.recruiter, &context.job)
            .await
        {
            Ok(claimed) => ClaimSet::new(claimed),
            Err(err) => {
                warn!(error = %err, "claims unavailable; rating is disabled");
                ClaimSet::default()
            }
        };

        let registry = StageRegistry::new(context.job.clone(), stages);
        let store = ApplicationStore::new(context.job.clone(), applications);
        info!(
            stages = registry.stages().len(),
            applications = store.applications().len(),
            claimed = claims.len(),
            "board loaded"
        );
        Ok(Self::from_parts(
            context,
            collaborators,
            registry,
            store,
            claims,
            settings,
        ))
    }

    /// Assembles a board from already loaded parts.
    #[must_use]
    pub fn from_parts(
        context: PipelineContext,
        collaborators: Collaborators,
        registry: StageRegistry,
        store: ApplicationStore,
        claims: ClaimSet,
        settings: BoardSettings,
    ) -> Self {
        let mut board = Self {
            context,
            collaborators,
            registry,
            store,
            claims,
            drag: DragCoordinator::default(),
            sensor: PointerSensor::new(settings.activation_distance),
            notices: Notices::default(),
            dispatcher: Dispatcher::new(settings.persist_timeout),
            drift_reported: HashSet::new(),
        };
        board.report_drift();
        board
    }

    /// Returns the session context.
    #[must_use]
    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Returns the stage registry.
    #[must_use]
    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    /// Returns the application store.
    #[must_use]
    pub fn store(&self) -> &ApplicationStore {
        &self.store
    }

    /// Returns the drag coordinator.
    #[must_use]
    pub fn drag(&self) -> &DragCoordinator {
        &self.drag
    }

    /// Returns the notice queue.
    #[must_use]
    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Returns the notice queue for dismissing notices.
    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    /// Returns `true` if the recruiter may rate this application.
    #[must_use]
    pub fn is_claimed(&self, id: ApplicationId) -> bool {
        self.store
            .get(id)
            .is_some_and(|app| self.claims.is_claimed(app.applicant.id))
    }

    /// Visible stages in order.
    #[must_use]
    pub fn visible_stages(&self, include_rejected: bool) -> Vec<&Stage> {
        self.registry.list_stages(include_rejected)
    }

    /// The board partition over the visible stages.
    #[must_use]
    pub fn partition(&self, include_rejected: bool) -> BoardPartition<'_> {
        self.store
            .partition(self.registry.list_stages(include_rejected))
    }

    /// Number of persistence calls still in flight.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.dispatcher.outstanding()
    }

    fn stage_label(&self, key: &StageKey) -> String {
        self.registry
            .get(key)
            .map_or_else(|| key.to_string(), |s| s.label.clone())
    }

    fn applicant_name(&self, id: ApplicationId) -> String {
        self.store
            .get(id)
            .map_or_else(|| "application".to_string(), |a| a.applicant.name.clone())
    }

    fn report_drift(&mut self) {
        let orphaned: Vec<(ApplicationId, StageKey)> = self
            .store
            .partition(self.registry.stages())
            .orphaned()
            .iter()
            .map(|a| (a.id, a.status.clone()))
            .collect();
        for (id, status) in orphaned {
            if self.drift_reported.insert((id, status.clone())) {
                warn!(
                    job = %self.context.job,
                    application = %id,
                    status = %status,
                    "application references an unknown stage; hidden from the board"
                );
            }
        }
    }

    // --- Pointer input ---

    /// Records a press; returns `true` if it landed on a card.
    pub fn pointer_down(&mut self, layout: &BoardLayout, pointer: Point) -> bool {
        if self.drag.is_dragging() {
            return false;
        }
        match layout.card_at(pointer) {
            Some(card) => {
                self.sensor.press(card.application, pointer, card.bounds);
                true
            }
            None => {
                self.sensor.reset();
                false
            }
        }
    }

    /// Reports pointer motion with the button held.
    ///
    /// Starts a drag once the activation distance is passed and returns
    /// the hovered stage while dragging.
    pub fn pointer_move(&mut self, layout: &BoardLayout, pointer: Point) -> Option<StageKey> {
        if let Some(activation) = self.sensor.motion(pointer) {
            self.drag.begin_pointer_drag(&activation, &self.store);
        }
        self.drag.hover(layout, pointer, &self.store).cloned()
    }

    /// Reports a release: a click opens the card, a drag drops it.
    pub fn pointer_up(&mut self, layout: &BoardLayout, pointer: Point) -> PointerRelease {
        if let Some(id) = self.sensor.release() {
            if let Err(err) = self.open_application(id) {
                debug!(application = %id, error = %err, "click on vanished card");
            }
            return PointerRelease::Click(id);
        }
        if !self.drag.is_dragging() {
            return PointerRelease::Idle;
        }
        let outcome = self
            .drag
            .drop_at(layout, pointer, &self.registry, &mut self.store);
        self.after_drop(&outcome);
        PointerRelease::Drop(outcome)
    }

    // --- Keyboard input ---

    /// Picks up a card for a keyboard move.
    pub fn pick_up(&mut self, id: ApplicationId) -> bool {
        self.sensor.reset();
        self.drag.begin_keyboard_drag(id, &self.store)
    }

    /// Moves the keyboard drop target.
    pub fn keyboard_move(&mut self, direction: Direction, include_rejected: bool) -> Option<DropTarget> {
        let stages = self.registry.list_stages(include_rejected);
        self.drag
            .keyboard_move(direction, &stages, &self.store)
            .cloned()
    }

    /// Drops a keyboard-carried card on its current target.
    pub fn keyboard_drop(&mut self) -> DropOutcome {
        let outcome = self.drag.drop_hovered(&self.registry, &mut self.store);
        self.after_drop(&outcome);
        outcome
    }

    /// Cancels any press or drag.
    pub fn cancel_drag(&mut self) -> bool {
        self.sensor.reset();
        self.drag.cancel()
    }

    fn after_drop(&mut self, outcome: &DropOutcome) {
        match outcome {
            DropOutcome::Transitioned(ticket) => self.persist_status(ticket.clone()),
            DropOutcome::Failed(err) => self.notices.error(format!("Could not move card: {err}")),
            DropOutcome::Ignored
            | DropOutcome::Cancelled
            | DropOutcome::Unchanged
            | DropOutcome::Reordered => {}
        }
    }

    // --- Application operations ---

    /// Moves an application to another stage through the optimistic
    /// transition protocol.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownStage`] for an unknown stage and the
    /// store's errors for unknown applications or no-op moves.
    pub fn transition(&mut self, id: ApplicationId, to: &StageKey) -> Result<TransitionTicket> {
        if !self.registry.contains(to) {
            return Err(PipelineError::UnknownStage(to.clone()));
        }
        let ticket = self.store.begin_transition(id, to, None)?;
        self.persist_status(ticket.clone());
        Ok(ticket)
    }

    fn persist_status(&mut self, ticket: TransitionTicket) {
        let repo = Arc::clone(&self.collaborators.applications);
        let job = self.context.job.clone();
        let (application, status) = (ticket.application, ticket.to.clone());
        self.dispatcher.spawn(
            async move { repo.persist_status(&job, application, &status).await },
            move |result| Completion::Status { ticket, result },
        );
    }

    fn persist_migration(&mut self, application: ApplicationId, stage: StageKey) {
        let repo = Arc::clone(&self.collaborators.applications);
        let job = self.context.job.clone();
        let target = stage.clone();
        self.dispatcher.spawn(
            async move { repo.persist_status(&job, application, &target).await },
            move |result| Completion::Migration {
                application,
                stage,
                result,
            },
        );
    }

    /// Opens an application: marks it viewed the first time.
    ///
    /// The viewed write is fire-and-forget.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownApplication`] for an unknown id.
    pub fn open_application(&mut self, id: ApplicationId) -> Result<&Application> {
        if let Some(viewed_at) = self.store.mark_viewed(id, Utc::now())? {
            let repo = Arc::clone(&self.collaborators.applications);
            let job = self.context.job.clone();
            self.dispatcher.spawn(
                async move { repo.persist_viewed(&job, id, viewed_at).await },
                move |result| Completion::Viewed {
                    application: id,
                    result,
                },
            );
        }
        self.store
            .get(id)
            .ok_or(PipelineError::UnknownApplication(id))
    }

    /// Rates a claimed applicant.
    ///
    /// An unclaimed applicant gets an informational notice and is left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NotClaimed`], [`PipelineError::Validation`]
    /// or [`PipelineError::UnknownApplication`]; nothing changes on error.
    pub fn set_rating(&mut self, id: ApplicationId, rating: u8) -> Result<RatingChange> {
        let change = match self.store.set_rating(id, rating, &self.claims) {
            Ok(change) => change,
            Err(err) => {
                if err.is_informational() {
                    let message =
                        format!("Add {} to your list before rating them", self.applicant_name(id));
                    self.notices.info(message);
                }
                return Err(err);
            }
        };
        let repo = Arc::clone(&self.collaborators.applications);
        let job = self.context.job.clone();
        self.dispatcher.spawn(
            async move { repo.persist_rating(&job, id, change.current).await },
            move |result| Completion::Rating { change, result },
        );
        Ok(change)
    }

    // --- Stage operations ---

    fn persist_stages(&mut self, edit: StageEdit) {
        let repo = Arc::clone(&self.collaborators.stages);
        let job = self.context.job.clone();
        let snapshot = edit.snapshot.clone();
        self.dispatcher.spawn(
            async move { repo.persist_stage_config(&job, &snapshot).await },
            move |result| Completion::StageConfig { edit, result },
        );
    }

    /// Adds a custom stage at the end of the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Validation`] for an empty label or bad color.
    pub fn create_stage(&mut self, label: &str, color: &str, icon: &str) -> Result<Stage> {
        let (stage, edit) = self.registry.create_stage(label, color, icon)?;
        self.persist_stages(edit);
        Ok(stage)
    }

    /// Renames a stage.
    ///
    /// # Errors
    ///
    /// See [`StageRegistry::rename_stage`].
    pub fn rename_stage(&mut self, key: &StageKey, label: &str) -> Result<Stage> {
        let (stage, edit) = self.registry.rename_stage(key, label)?;
        self.persist_stages(edit);
        Ok(stage)
    }

    /// Recolors a stage.
    ///
    /// # Errors
    ///
    /// See [`StageRegistry::recolor_stage`].
    pub fn recolor_stage(&mut self, key: &StageKey, color: &str) -> Result<Stage> {
        let (stage, edit) = self.registry.recolor_stage(key, color)?;
        self.persist_stages(edit);
        Ok(stage)
    }

    /// Changes a stage's icon.
    ///
    /// # Errors
    ///
    /// See [`StageRegistry::reicon_stage`].
    pub fn reicon_stage(&mut self, key: &StageKey, icon: &str) -> Result<Stage> {
        let (stage, edit) = self.registry.reicon_stage(key, icon)?;
        self.persist_stages(edit);
        Ok(stage)
    }

    /// Moves a stage within the visible order.
    ///
    /// # Errors
    ///
    /// See [`StageRegistry::reorder_stage`].
    pub fn reorder_stage(&mut self, key: &StageKey, new_index: usize) -> Result<()> {
        let edit = self.registry.reorder_stage(key, new_index)?;
        self.persist_stages(edit);
        Ok(())
    }

    /// Deletes a custom stage, migrating its applications to `reassign_to`.
    ///
    /// A drag hovering the deleted stage is cancelled. Returns the ids of
    /// the migrated applications.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvariantViolation`] for built-ins, for a
    /// non-empty stage without a target, or for an invalid target. Nothing
    /// changes on error.
    #[instrument(skip(self), fields(job = %self.context.job))]
    pub fn delete_stage(
        &mut self,
        key: &StageKey,
        reassign_to: Option<&StageKey>,
    ) -> Result<Vec<ApplicationId>> {
        let occupancy = self.store.count_in(key);
        self.registry.check_delete(key, occupancy, reassign_to)?;

        let moved = match reassign_to {
            Some(target) => self.store.reassign_stage(key, target),
            None => Vec::new(),
        };
        let edit = self.registry.delete_stage(key, 0, reassign_to)?;
        if let Some(target) = reassign_to {
            for id in &moved {
                self.persist_migration(*id, target.clone());
            }
        }
        if self.drag.on_stage_removed(key) {
            self.notices.info("Drag cancelled because its stage was deleted");
        }
        info!(key = %key, migrated = moved.len(), "stage deleted");
        self.persist_stages(edit);
        Ok(moved)
    }

    // --- Completions ---

    /// Applies every completion that has already arrived.
    ///
    /// Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(completion) = self.dispatcher.try_next() {
            self.apply_completion(completion);
            applied += 1;
        }
        applied
    }

    /// Waits for the next completion, applies it and returns it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn settle_next(&mut self) -> Option<Completion> {
        let completion = self.dispatcher.next().await?;
        self.apply_completion(completion.clone());
        Some(completion)
    }

    /// Applies one persistence outcome to the board.
    pub fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Status { ticket, result } => self.settle_status(&ticket, &result),
            Completion::Migration {
                application,
                stage,
                result: Err(err),
            } => {
                warn!(application = %application, stage = %stage, error = %err, "migration write failed");
                let message = format!(
                    "Could not save {}'s move to {}: {err}",
                    self.applicant_name(application),
                    self.stage_label(&stage)
                );
                self.notices.warn(message);
            }
            Completion::StageConfig {
                edit,
                result: Err(err),
            } => self.revert_stage_edit(&edit, &err.to_string()),
            Completion::Rating {
                change,
                result: Err(err),
            } => {
                warn!(application = %change.application, error = %err, "rating write failed");
                if self.store.revert_rating(&change) {
                    let message = format!(
                        "Could not save rating for {}: {err}",
                        self.applicant_name(change.application)
                    );
                    self.notices.error(message);
                }
            }
            Completion::Viewed {
                application,
                result: Err(err),
            } => {
                warn!(application = %application, error = %err, "viewed write failed");
            }
            Completion::Migration { .. }
            | Completion::StageConfig { .. }
            | Completion::Rating { .. }
            | Completion::Viewed { .. } => {}
        }
    }

    fn settle_status(&mut self, ticket: &TransitionTicket, result: &PersistResult<()>) {
        match self.store.settle_transition(ticket, result) {
            Settlement::Confirmed => {
                debug!(application = %ticket.application, ticket = %ticket.id, "transition confirmed");
            }
            Settlement::Superseded => {}
            Settlement::RolledBack { restored } => {
                let reason = result
                    .as_ref()
                    .err()
                    .map_or_else(String::new, ToString::to_string);
                let message = format!(
                    "Could not move {} to {}: {reason}",
                    self.applicant_name(ticket.application),
                    self.stage_label(&ticket.to),
                );
                self.notices.error(message);
                if !self.registry.contains(&restored) {
                    self.rehome(ticket.application);
                }
            }
        }
    }

    /// Moves an application whose stage no longer exists to the first
    /// visible stage.
    fn rehome(&mut self, id: ApplicationId) {
        let Some(fallback) = self.registry.first_visible().map(|s| s.key.clone()) else {
            return;
        };
        if self.store.force_status(id, &fallback).is_ok() {
            warn!(application = %id, stage = %fallback, "rolled back into a deleted stage; moved to fallback");
            self.persist_migration(id, fallback);
        }
    }

    fn revert_stage_edit(&mut self, edit: &StageEdit, reason: &str) {
        let label = edit
            .after
            .as_ref()
            .or(edit.before.as_ref())
            .map_or_else(|| edit.key.to_string(), |s| s.label.clone());
        warn!(key = %edit.key, seq = edit.seq, error = reason, "stage config write failed");

        match edit.kind {
            StageEditKind::Deleted => {
                self.notices.error(format!(
                    "Could not delete stage {label}: {reason}. Please retry."
                ));
            }
            StageEditKind::Created if self.store.count_in(&edit.key) > 0 => {
                self.notices.warn(format!(
                    "Could not save stage {label}: {reason}. It is kept because it holds applications."
                ));
            }
            StageEditKind::Created | StageEditKind::Updated | StageEditKind::Reordered => {
                match self.registry.revert(edit) {
                    RevertOutcome::Reverted => {
                        if edit.kind == StageEditKind::Created {
                            self.drag.on_stage_removed(&edit.key);
                        }
                        self.notices.error(format!(
                            "Could not save stage {label}: {reason}. Change undone."
                        ));
                    }
                    RevertOutcome::Superseded | RevertOutcome::NotRevertible => {
                        debug!(key = %edit.key, seq = edit.seq, "stage edit superseded; not reverted");
                    }
                }
            }
        }
    }
}
