//! hireboard - a candidate pipeline board for recruiters.
//!
//! This is the main binary: it loads the configuration, sets up file
//! logging, hydrates a board from the configured storage and runs the TUI.

use std::sync::Arc;

use anyhow::Context;
use hireboard_config::{Config, StorageKind};
use hireboard_pipeline::{BoardSettings, Collaborators, PipelineBoard, PipelineContext};
use hireboard_protocol::dummy::dummy_applications;
use hireboard_protocol::{ApplicantId, Application, BuiltinStage};
use hireboard_store::{JsonStore, MemoryStore};
use hireboard_tui::{App, terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured log filter.
const LOG_ENV: &str = "HIREBOARD_LOG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = setup_logging(&config)?;
    info!(job = %config.job, recruiter = %config.recruiter, storage = ?config.storage, "starting");

    let collaborators = open_storage(&config)?;
    let settings = BoardSettings {
        activation_distance: config.drag.distance(),
        persist_timeout: config.sync.timeout(),
    };
    let context = PipelineContext::new(config.job.clone(), config.recruiter.clone());
    let board = PipelineBoard::load(context, collaborators, settings)
        .await
        .context("failed to load the board")?;

    // Install before entering the session so panics print on the main screen.
    terminal::install_panic_hook();
    let mut session = terminal::TerminalSession::enter()?;

    let mut app = App::new(board);
    let result = app.run(session.terminal_mut()).await;

    // Restore even if the app failed.
    session.close()?;
    info!("stopped");
    result
}

/// Logs to a file under the data directory so the TUI stays clean.
fn setup_logging(config: &Config) -> anyhow::Result<WorkerGuard> {
    let path = config.log_path()?;
    let dir = path.parent().context("log path has no parent directory")?;
    let file_name = path.file_name().context("log path has no file name")?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config.log.level.to_ascii_lowercase()));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

/// Opens the configured backend, seeding demo data where there is none.
fn open_storage(config: &Config) -> anyhow::Result<Collaborators> {
    let applications = dummy_applications();
    match config.storage {
        StorageKind::Memory => {
            let store = MemoryStore::new();
            for applicant in claimable(&applications) {
                store.claim(&config.recruiter, &config.job, applicant);
            }
            store.insert_applications(&config.job, applications);
            Ok(Collaborators::from_backend(Arc::new(store)))
        }
        StorageKind::File => {
            let store = JsonStore::with_path(config.data_dir()?)?;
            if store.seed(&config.job, &applications)? {
                info!(job = %config.job, "seeded demo applications");
                for applicant in claimable(&applications) {
                    store.claim(&config.recruiter, &config.job, applicant)?;
                }
            }
            Ok(Collaborators::from_backend(Arc::new(store)))
        }
    }
}

/// Applicants of the demo data that start on the recruiter's list.
fn claimable(applications: &[Application]) -> impl Iterator<Item = ApplicantId> + '_ {
    applications
        .iter()
        .filter(|app| {
            !matches!(
                app.status.builtin(),
                Some(BuiltinStage::Pending | BuiltinStage::Rejected)
            )
        })
        .map(|app| app.applicant.id)
}
