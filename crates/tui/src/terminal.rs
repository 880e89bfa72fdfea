//! Terminal session handling.
//!
//! [`TerminalSession`] puts the terminal into raw mode on the alternate
//! screen with mouse capture (pointer drags need it) and puts everything
//! back when it is closed or dropped. [`install_panic_hook`] does the same
//! reset before a panic message is printed.

use std::io::{self, Stdout};

use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

/// The terminal type used by the application.
pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Error type for terminal operations.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    /// Failed to initialize the terminal.
    #[error("failed to setup terminal: {0}")]
    Setup(#[source] io::Error),

    /// Failed to restore the terminal.
    #[error("failed to restore terminal: {0}")]
    Restore(#[source] io::Error),
}

/// An interactive terminal session.
///
/// # Examples
///
/// ```no_run
/// use hireboard_tui::terminal::TerminalSession;
///
/// let mut session = TerminalSession::enter()?;
/// session.terminal_mut().clear()?;
/// session.close()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct TerminalSession {
    terminal: AppTerminal,
    active: bool,
}

impl TerminalSession {
    /// Enables raw mode, enters the alternate screen and captures the mouse.
    ///
    /// # Errors
    ///
    /// Returns [`TerminalError::Setup`] if any terminal operation fails. Raw
    /// mode is undone again when a later step fails.
    pub fn enter() -> Result<Self, TerminalError> {
        enable_raw_mode().map_err(TerminalError::Setup)?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            reset();
            return Err(TerminalError::Setup(err));
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self {
                terminal,
                active: true,
            }),
            Err(err) => {
                reset();
                Err(TerminalError::Setup(err))
            }
        }
    }

    /// The ratatui terminal to draw on.
    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }

    /// Restores the terminal, reporting failures.
    ///
    /// # Errors
    ///
    /// Returns [`TerminalError::Restore`] if any terminal operation fails.
    pub fn close(mut self) -> Result<(), TerminalError> {
        self.restore()
    }

    fn restore(&mut self) -> Result<(), TerminalError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode().map_err(TerminalError::Restore)?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .map_err(TerminalError::Restore)?;
        self.terminal.show_cursor().map_err(TerminalError::Restore)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!(error = %err, "terminal left in a modified state");
        }
    }
}

/// Best-effort reset used on error and panic paths.
fn reset() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen, Show);
}

/// Installs a panic hook that resets the terminal before the previous hook runs.
///
/// Call it once at startup, before entering a [`TerminalSession`], so the
/// panic message lands on the normal screen.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        reset();
        original_hook(panic_info);
    }));
}
