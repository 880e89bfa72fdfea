//! The drag interaction state machine.
//!
//! The coordinator owns the only [`DragSession`]. Pointer and keyboard
//! drags share the same session type and end in the same drop logic;
//! pointer drags resolve their target through [`resolve_collision`] while
//! keyboard drags step through stages and insertion slots.
//!
//! Nothing here returns an error: every failure ends the session and is
//! reported in the [`DropOutcome`].

use hireboard_protocol::{ApplicationId, Stage, StageKey};
use tracing::debug;

use crate::collision::{BoardLayout, DropTarget, resolve_collision};
use crate::error::PipelineError;
use crate::geometry::{Bounds, Point};
use crate::registry::StageRegistry;
use crate::sensor::Activation;
use crate::store::ApplicationStore;
use crate::transition::TransitionTicket;

/// Keyboard movement of the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Previous visible stage.
    Left,
    /// Next visible stage.
    Right,
    /// Previous insertion slot.
    Up,
    /// Next insertion slot.
    Down,
}

/// Offset of the pointer inside the grabbed card.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Grab {
    offset_x: f64,
    offset_y: f64,
    width: f64,
    height: f64,
}

/// State of an in-progress drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// The application being moved.
    pub active: ApplicationId,
    /// The stage currently under the card.
    pub hovered_stage: Option<StageKey>,
    /// The exact target currently under the card.
    pub hovered: Option<DropTarget>,
    grab: Option<Grab>,
}

impl DragSession {
    fn new(active: ApplicationId, grab: Option<Grab>) -> Self {
        Self {
            active,
            hovered_stage: None,
            hovered: None,
            grab,
        }
    }

    /// Returns `true` for keyboard-driven sessions.
    #[must_use]
    pub fn is_keyboard(&self) -> bool {
        self.grab.is_none()
    }

    /// Bounds of the dragged card with the pointer at `pointer`.
    #[must_use]
    pub fn dragged_bounds(&self, pointer: Point) -> Bounds {
        match self.grab {
            Some(grab) => Bounds::new(
                pointer.x - grab.offset_x,
                pointer.y - grab.offset_y,
                grab.width,
                grab.height,
            ),
            None => Bounds::new(pointer.x, pointer.y, 0.0, 0.0),
        }
    }

    fn set_hovered(&mut self, target: Option<DropTarget>, store: &ApplicationStore) {
        self.hovered_stage = target.as_ref().and_then(|t| t.stage(store));
        self.hovered = target;
    }
}

/// Drag coordinator state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A card is being dragged.
    Dragging(DragSession),
}

/// What a drop did.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// There was no drag to drop.
    Ignored,
    /// Dropped outside any column, or the target vanished.
    Cancelled,
    /// Dropped where it already was.
    Unchanged,
    /// Reordered inside its own column.
    Reordered,
    /// Moved to another stage; the ticket awaits persistence.
    Transitioned(TransitionTicket),
    /// The move could not be applied.
    Failed(PipelineError),
}

/// Owns the drag session and turns input into store mutations.
///
/// # Examples
///
/// ```
/// use hireboard_pipeline::{ApplicationStore, DragCoordinator, DropOutcome, StageRegistry};
/// use hireboard_protocol::{Applicant, Application, BuiltinStage, JobId};
///
/// let job = JobId::new("job");
/// let app = Application::new(Applicant::new("Ada", "ada@example.com"), BuiltinStage::Pending.into());
/// let id = app.id;
/// let registry = StageRegistry::new(job.clone(), Vec::new());
/// let mut store = ApplicationStore::new(job, vec![app]);
/// let mut drag = DragCoordinator::default();
///
/// assert!(drag.begin_keyboard_drag(id, &store));
/// assert_eq!(drag.drop_hovered(&registry, &mut store), DropOutcome::Unchanged);
/// assert!(!drag.is_dragging());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragCoordinator {
    state: DragState,
}

impl DragCoordinator {
    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Returns the active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging(session) => Some(session),
        }
    }

    /// Returns `true` while a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Returns the application being dragged.
    #[must_use]
    pub fn active(&self) -> Option<ApplicationId> {
        self.session().map(|s| s.active)
    }

    fn begin(&mut self, session: DragSession, store: &ApplicationStore) -> bool {
        if self.is_dragging() {
            debug!(application = %session.active, "ignoring drag start while already dragging");
            return false;
        }
        if store.get(session.active).is_none() {
            return false;
        }
        debug!(application = %session.active, keyboard = session.is_keyboard(), "drag started");
        self.state = DragState::Dragging(session);
        true
    }

    /// Starts a pointer drag from a sensor activation.
    ///
    /// Ignored (returns `false`) while another drag is active or when the
    /// application is unknown.
    pub fn begin_pointer_drag(&mut self, activation: &Activation, store: &ApplicationStore) -> bool {
        let grab = Grab {
            offset_x: activation.origin.x - activation.card.x,
            offset_y: activation.origin.y - activation.card.y,
            width: activation.card.width,
            height: activation.card.height,
        };
        self.begin(DragSession::new(activation.application, Some(grab)), store)
    }

    /// Picks up a card for a keyboard move, targeting its own column.
    pub fn begin_keyboard_drag(&mut self, application: ApplicationId, store: &ApplicationStore) -> bool {
        if !self.begin(DragSession::new(application, None), store) {
            return false;
        }
        let status = store.get(application).map(|a| a.status.clone());
        if let (DragState::Dragging(session), Some(status)) = (&mut self.state, status) {
            session.set_hovered(Some(DropTarget::Column(status)), store);
        }
        true
    }

    /// Re-resolves the hovered target for a pointer position.
    ///
    /// Only the session changes; no application is touched.
    pub fn hover(
        &mut self,
        layout: &BoardLayout,
        pointer: Point,
        store: &ApplicationStore,
    ) -> Option<&StageKey> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        let target = resolve_collision(layout, session.dragged_bounds(pointer), pointer);
        session.set_hovered(target, store);
        session.hovered_stage.as_ref()
    }

    /// Moves the keyboard drop target.
    pub fn keyboard_move(
        &mut self,
        direction: Direction,
        stages: &[&Stage],
        store: &ApplicationStore,
    ) -> Option<&DropTarget> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        let current = session
            .hovered_stage
            .clone()
            .or_else(|| store.get(session.active).map(|a| a.status.clone()))?;

        let target = match direction {
            Direction::Left | Direction::Right => {
                let index = stages.iter().position(|s| s.key == current);
                let next = match (direction, index) {
                    (_, None) => stages.first(),
                    (Direction::Left, Some(i)) => stages.get(i.saturating_sub(1)),
                    (_, Some(i)) => stages.get(i + 1).or_else(|| stages.get(i)),
                };
                next.map(|s| DropTarget::Column(s.key.clone()))
            }
            Direction::Up | Direction::Down => {
                let mut slots: Vec<DropTarget> = store
                    .column(&current)
                    .iter()
                    .filter(|a| a.id != session.active)
                    .map(|a| DropTarget::Card(a.id))
                    .collect();
                slots.push(DropTarget::Column(current.clone()));
                let index = session
                    .hovered
                    .as_ref()
                    .and_then(|h| slots.iter().position(|s| s == h))
                    .unwrap_or(slots.len() - 1);
                let next = if direction == Direction::Up {
                    index.saturating_sub(1)
                } else {
                    (index + 1).min(slots.len() - 1)
                };
                slots.into_iter().nth(next)
            }
        };
        if target.is_some() {
            session.set_hovered(target, store);
        }
        session.hovered.as_ref()
    }

    /// Drops at a pointer position, re-resolving the target first.
    pub fn drop_at(
        &mut self,
        layout: &BoardLayout,
        pointer: Point,
        registry: &StageRegistry,
        store: &mut ApplicationStore,
    ) -> DropOutcome {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return DropOutcome::Ignored;
        };
        let target = resolve_collision(layout, session.dragged_bounds(pointer), pointer);
        finish(session.active, target, registry, store)
    }

    /// Drops on the currently hovered target (keyboard path).
    pub fn drop_hovered(&mut self, registry: &StageRegistry, store: &mut ApplicationStore) -> DropOutcome {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return DropOutcome::Ignored;
        };
        finish(session.active, session.hovered, registry, store)
    }

    /// Abandons the drag without touching any application.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        if was_dragging {
            debug!("drag cancelled");
        }
        was_dragging
    }

    /// Cancels the drag if it hovers a stage that no longer exists.
    pub fn on_stage_removed(&mut self, key: &StageKey) -> bool {
        let hovering = self
            .session()
            .is_some_and(|s| s.hovered_stage.as_ref() == Some(key));
        if hovering {
            self.cancel();
        }
        hovering
    }
}

fn finish(
    active: ApplicationId,
    target: Option<DropTarget>,
    registry: &StageRegistry,
    store: &mut ApplicationStore,
) -> DropOutcome {
    let Some(target) = target else {
        debug!(application = %active, "dropped outside any column");
        return DropOutcome::Cancelled;
    };
    let Some(stage) = target.stage(store).filter(|s| registry.contains(s)) else {
        return DropOutcome::Cancelled;
    };
    let Some(status) = store.get(active).map(|a| a.status.clone()) else {
        return DropOutcome::Cancelled;
    };
    if target == DropTarget::Card(active) {
        return DropOutcome::Unchanged;
    }

    // Same column: reorder in memory only. A column target appends.
    if status == stage {
        return match store.move_within(active, target.before()) {
            Ok(true) => DropOutcome::Reordered,
            Ok(false) => DropOutcome::Unchanged,
            Err(err) => DropOutcome::Failed(err),
        };
    }

    match store.begin_transition(active, &stage, target.before()) {
        Ok(ticket) => DropOutcome::Transitioned(ticket),
        Err(err) => DropOutcome::Failed(err),
    }
}
