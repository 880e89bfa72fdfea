//! The hireboard pipeline engine.
//!
//! This crate holds the board logic independent of any front end: the
//! per-job stage registry, the application store and its partitioning into
//! columns, drop-target collision resolution, the drag state machine, and
//! the optimistic transition protocol with last-wins rollback.
//!
//! # Overview
//!
//! - [`registry`]: ordered stage configuration with revertible edits
//! - [`store`]: applications, optimistic transitions, viewing and rating
//! - [`partition`]: grouping applications into columns
//! - [`collision`]: which column or card a dragged card is over
//! - [`sensor`]: press/move/release activation threshold
//! - [`drag`]: the drag coordinator
//! - [`transition`]: transition tickets
//! - [`dispatch`]: spawning persistence calls with a timeout
//! - [`board`]: the session facade tying everything together
//! - [`collaborator`]: traits for storage and enrichment backends
//!
//! # Examples
//!
//! ```
//! use hireboard_pipeline::{ApplicationStore, StageRegistry};
//! use hireboard_protocol::{Applicant, Application, BuiltinStage, JobId};
//!
//! let job = JobId::new("backend");
//! let registry = StageRegistry::new(job.clone(), Vec::new());
//! let app = Application::new(Applicant::new("Ada", "ada@example.com"), BuiltinStage::Pending.into());
//! let mut store = ApplicationStore::new(job, vec![app.clone()]);
//!
//! let ticket = store
//!     .begin_transition(app.id, &BuiltinStage::Interview.into(), None)
//!     .unwrap();
//! let board = store.partition(registry.list_stages(false));
//! assert_eq!(board.get(&ticket.to).map(<[_]>::len), Some(1));
//! ```

pub mod board;
pub mod collaborator;
pub mod collision;
pub mod dispatch;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod notice;
pub mod partition;
pub mod registry;
pub mod sensor;
pub mod store;
pub mod transition;

pub use board::{BoardSettings, PipelineBoard, PipelineContext, PointerRelease};
pub use collaborator::{
    ApplicantEnricher, ApplicationRepository, ClaimCheck, ClaimDirectory, ClaimSet,
    Collaborators, StageRepository,
};
pub use collision::{BoardLayout, CardRegion, ColumnRegion, DropTarget, resolve_collision};
pub use dispatch::{Completion, DEFAULT_PERSIST_TIMEOUT, Dispatcher};
pub use drag::{Direction, DragCoordinator, DragSession, DragState, DropOutcome};
pub use error::{PersistResult, PersistenceError, PipelineError, Result};
pub use geometry::{Bounds, Point};
pub use notice::{Notice, NoticeLevel, Notices};
pub use partition::{BoardColumn, BoardPartition, partition_by_stage};
pub use registry::{RevertOutcome, StageEdit, StageEditKind, StageRegistry};
pub use sensor::{Activation, DEFAULT_ACTIVATION_DISTANCE, PointerSensor};
pub use store::{ApplicationStore, RatingChange};
pub use transition::{Settlement, TicketId, TransitionTicket};
