//! Test utilities for the TUI crate.
//!
//! Rendering helpers and a demo board backed by an in-memory store.

use std::sync::Arc;

use hireboard_pipeline::{
    ApplicationStore, BoardSettings, ClaimSet, Collaborators, PipelineBoard, PipelineContext,
    StageRegistry,
};
use hireboard_protocol::dummy::{DUMMY_JOB, dummy_applications};
use hireboard_protocol::{BuiltinStage, JobId, RecruiterId};
use hireboard_store::MemoryStore;
use ratatui::buffer::Buffer;

/// Converts a ratatui [`Buffer`] to a string, one line per row, with
/// trailing whitespace trimmed.
#[must_use]
pub(crate) fn buffer_to_string(buf: &Buffer) -> String {
    let mut result = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            if let Some(cell) = buf.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        let trimmed = result.trim_end_matches(' ');
        result.truncate(trimmed.len());
        result.push('\n');
    }
    result
}

/// The demo board together with the store it persists to.
///
/// Applicants past the inbox are claimed, so their cards can be rated.
pub(crate) fn demo_board_with_store() -> (PipelineBoard, Arc<MemoryStore>) {
    let job = JobId::new(DUMMY_JOB);
    let recruiter = RecruiterId::new("tester");
    let applications = dummy_applications();

    let backend = Arc::new(MemoryStore::new());
    backend.insert_applications(&job, applications.clone());
    let claims: ClaimSet = applications
        .iter()
        .filter(|app| {
            !matches!(
                app.status.builtin(),
                Some(BuiltinStage::Pending | BuiltinStage::Rejected)
            )
        })
        .map(|app| app.applicant.id)
        .inspect(|applicant| backend.claim(&recruiter, &job, *applicant))
        .collect();

    let board = PipelineBoard::from_parts(
        PipelineContext::new(job.clone(), recruiter),
        Collaborators::from_backend(Arc::clone(&backend)),
        StageRegistry::new(job.clone(), Vec::new()),
        ApplicationStore::new(job, applications),
        claims,
        BoardSettings::default(),
    );
    (board, backend)
}

/// The demo board on its own.
pub(crate) fn demo_board() -> PipelineBoard {
    demo_board_with_store().0
}
