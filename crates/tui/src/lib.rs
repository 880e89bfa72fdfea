//! Terminal front end for the hireboard candidate pipeline.
//!
//! This crate renders a [`PipelineBoard`](hireboard_pipeline::PipelineBoard)
//! as a Ratatui kanban board: one column per stage, one card per
//! application, with mouse and keyboard drag-and-drop between columns.
//!
//! # Overview
//!
//! - [`app`]: main application struct and run loop
//! - [`state`]: selection, focus, overlays and the stage-name prompt
//! - [`layout`]: geometry shared by rendering and pointer hit-testing
//! - [`terminal`]: terminal session and panic handling
//! - [`event`]: event polling and key mappings
//! - [`widgets`]: board, card, detail, help, notice and prompt rendering
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hireboard_pipeline::{BoardSettings, Collaborators, PipelineBoard, PipelineContext};
//! use hireboard_protocol::{JobId, RecruiterId, dummy::DUMMY_JOB};
//! use hireboard_store::MemoryStore;
//! use hireboard_tui::{App, terminal};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let recruiter = RecruiterId::new("me");
//!     let store = Arc::new(MemoryStore::demo(&recruiter));
//!     let context = PipelineContext::new(JobId::new(DUMMY_JOB), recruiter);
//!     let board = PipelineBoard::load(
//!         context,
//!         Collaborators::from_backend(store),
//!         BoardSettings::default(),
//!     )
//!     .await?;
//!
//!     terminal::install_panic_hook();
//!     let mut session = terminal::TerminalSession::enter()?;
//!     let result = App::new(board).run(session.terminal_mut()).await;
//!     session.close()?;
//!     result
//! }
//! ```

pub mod app;
pub mod event;
pub mod layout;
pub mod state;
pub mod terminal;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_utils;

pub use app::App;
pub use state::{AppState, Focus, Prompt, PromptKind};
