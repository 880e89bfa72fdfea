//! Main application struct and run loop.
//!
//! This module provides the `App` struct which orchestrates the TUI
//! application lifecycle including event handling, state updates, and rendering.

use std::time::Duration;

use hireboard_pipeline::{
    BoardLayout, Direction as DragDirection, DropOutcome, PipelineBoard, PipelineError, Point,
    PointerRelease,
};
use hireboard_protocol::{ApplicationId, Message, STAGE_ICONS, STAGE_PALETTE, StageKey};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use tracing::{debug, info, warn};

use crate::{
    AppState, Focus,
    event::{event_to_message, poll_event},
    layout::{HEADER_HEIGHT, MIN_HEIGHT, MIN_HEIGHT_WITH_HEADER, MIN_WIDTH, NOTICE_HEIGHT, board_layout, point_at},
    state::PromptKind,
    terminal::AppTerminal,
    widgets::{
        BoardView, DetailContext, body_area_dimensions, max_scroll_offset, render_board,
        render_detail_panel, render_help_overlay, render_notice, render_prompt,
    },
};

/// How long quitting waits for in-flight writes to land.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Icon given to stages created from the prompt.
const NEW_STAGE_ICON: &str = "flag";

/// The main application struct.
///
/// Owns the [`AppState`] and translates messages into board operations.
#[derive(Debug)]
pub struct App {
    state: AppState,
    should_quit: bool,
    /// Last known terminal area, used for pointer hit-testing.
    last_area: Rect,
    /// Whether the header was shown in the last render (affects hit-testing).
    header_visible: bool,
    /// Last pointer position while the button is held.
    pointer: Option<Point>,
}

impl App {
    /// Creates a new application over a loaded board.
    #[must_use]
    pub fn new(board: PipelineBoard) -> Self {
        Self {
            state: AppState::new(board),
            should_quit: false,
            last_area: Rect::default(),
            header_visible: true,
            pointer: None,
        }
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns `true` once the user asked to quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Updates the application state based on a message.
    ///
    /// Overlays take messages first: the help overlay swallows everything
    /// but `Quit`, an open prompt takes text input, and an active drag
    /// takes navigation and drop keys.
    pub fn update(&mut self, msg: Message) {
        if msg.is_terminating() {
            self.should_quit = true;
            return;
        }

        if self.state.help_visible {
            match msg {
                Message::ToggleHelp | Message::Escape => self.state.toggle_help(),
                _ => {
                    self.state.dismiss_help();
                }
            }
            return;
        }

        if self.state.is_prompting() {
            self.update_prompt(msg);
        } else if self.state.board.drag().is_dragging() {
            self.update_dragging(msg);
        } else {
            self.update_board(msg);
        }
        self.state.clamp_selection();
    }

    fn update_prompt(&mut self, msg: Message) {
        match msg {
            Message::Input { ch } => self.state.prompt_input(ch),
            Message::Backspace | Message::Back => self.state.prompt_backspace(),
            Message::Select => self.confirm_prompt(),
            Message::Escape => self.state.prompt = None,
            _ => {}
        }
    }

    fn update_dragging(&mut self, msg: Message) {
        let keyboard = self
            .state
            .board
            .drag()
            .session()
            .is_some_and(|s| s.is_keyboard());
        match msg {
            Message::Escape => {
                self.state.board.cancel_drag();
                self.pointer = None;
            }
            Message::NavigateLeft if keyboard => self.move_carried(DragDirection::Left),
            Message::NavigateRight if keyboard => self.move_carried(DragDirection::Right),
            Message::NavigateUp if keyboard => self.move_carried(DragDirection::Up),
            Message::NavigateDown if keyboard => self.move_carried(DragDirection::Down),
            Message::Select | Message::PickUp if keyboard => {
                let active = self.state.board.drag().active();
                let outcome = self.state.board.keyboard_drop();
                self.after_drop(active, &outcome);
            }
            Message::PointerDrag { column, row } => self.pointer_drag(column, row),
            Message::PointerUp { column, row } => self.pointer_up(column, row),
            _ => {}
        }
    }

    fn update_board(&mut self, msg: Message) {
        match msg {
            Message::Escape => {
                if self.state.detail.is_some() {
                    self.state.close_detail();
                } else if self.state.board.notices_mut().dismiss().is_none() {
                    self.state.clear_selection();
                }
            }
            Message::NavigateLeft if self.state.focus == Focus::Board => self.state.navigate_left(),
            Message::NavigateRight if self.state.focus == Focus::Board => {
                self.state.navigate_right();
            }
            Message::NavigateUp => match self.state.focus {
                Focus::Board => self.state.navigate_up(),
                Focus::Detail => {
                    self.state.scroll_detail(-1);
                    self.clamp_scroll_to_content();
                }
            },
            Message::NavigateDown => match self.state.focus {
                Focus::Board => self.state.navigate_down(),
                Focus::Detail => {
                    self.state.scroll_detail(1);
                    self.clamp_scroll_to_content();
                }
            },
            Message::Select if self.state.focus == Focus::Board => {
                if let Some(id) = self.state.selected_application().map(|a| a.id) {
                    self.open(id);
                }
            }
            Message::Back => {
                if self.state.detail.is_some() {
                    self.state.close_detail();
                }
            }
            Message::ToggleHelp => self.state.toggle_help(),
            Message::ToggleRejected => self.state.toggle_rejected(),
            Message::PointerDown { column, row } if self.state.focus == Focus::Board => {
                self.pointer_down(column, row);
            }
            Message::PointerDrag { column, row } => self.pointer_drag(column, row),
            Message::PointerUp { column, row } => self.pointer_up(column, row),
            Message::PickUp if self.state.focus == Focus::Board => {
                if let Some(id) = self.state.selected_application().map(|a| a.id) {
                    self.state.board.pick_up(id);
                }
            }
            Message::SetRating { value } => self.rate(value),
            Message::OpenDocument => self.open_document(),
            msg if msg.is_stage_edit() && self.state.focus == Focus::Board => self.edit_stage(&msg),
            _ => {}
        }
    }

    /// The application card actions apply to: the open one, else the selected one.
    fn target_application(&self) -> Option<ApplicationId> {
        self.state
            .detail
            .or_else(|| self.state.selected_application().map(|a| a.id))
    }

    fn open(&mut self, id: ApplicationId) {
        match self.state.board.open_application(id) {
            Ok(_) => self.state.open_detail(id),
            Err(err) => self.report("Could not open candidate", &err),
        }
    }

    fn rate(&mut self, value: u8) {
        let Some(id) = self.target_application() else {
            return;
        };
        if let Err(err) = self.state.board.set_rating(id, value) {
            self.report("Could not rate candidate", &err);
        }
    }

    fn open_document(&mut self) {
        let Some(app) = self.target_application().and_then(|id| self.state.board.store().get(id))
        else {
            return;
        };
        let name = app.applicant.name.clone();
        let Some(document) = app.applicant.documents.first().cloned() else {
            self.state
                .board
                .notices_mut()
                .info(format!("{name} has not uploaded any documents"));
            return;
        };
        match open::that_detached(&document.uri) {
            Ok(()) => debug!(uri = %document.uri, "opened document"),
            Err(err) => {
                warn!(uri = %document.uri, error = %err, "could not open document");
                self.state
                    .board
                    .notices_mut()
                    .error(format!("Could not open {}: {err}", document.name));
            }
        }
    }

    /// Surfaces an operation error as a notice.
    ///
    /// Informational errors already raised their own notice.
    fn report(&mut self, action: &str, err: &PipelineError) {
        if !err.is_informational() {
            self.state.board.notices_mut().error(format!("{action}: {err}"));
        }
    }

    // --- Drag and drop ---

    fn move_carried(&mut self, direction: DragDirection) {
        let target = self
            .state
            .board
            .keyboard_move(direction, self.state.show_rejected)
            .and_then(|t| t.stage(self.state.board.store()));
        if let Some(stage) = target {
            self.state.select_stage(&stage);
        }
    }

    fn after_drop(&mut self, active: Option<ApplicationId>, outcome: &DropOutcome) {
        debug!(?outcome, "drop");
        match outcome {
            DropOutcome::Transitioned(_) | DropOutcome::Reordered | DropOutcome::Unchanged => {
                if let Some(id) = active {
                    self.state.select_application(id);
                }
            }
            DropOutcome::Ignored | DropOutcome::Cancelled | DropOutcome::Failed(_) => {}
        }
    }

    /// The board area of the last render.
    fn board_area(&self) -> Rect {
        let header = if self.header_visible { HEADER_HEIGHT } else { 0 };
        Rect {
            x: self.last_area.x,
            y: self.last_area.y + header,
            width: self.last_area.width,
            height: self.last_area.height.saturating_sub(header + NOTICE_HEIGHT),
        }
    }

    fn current_layout(&self) -> BoardLayout {
        board_layout(
            &self.state.board.partition(self.state.show_rejected),
            self.board_area(),
            (self.state.selected_column, self.state.selected_card),
        )
    }

    fn pointer_down(&mut self, column: u16, row: u16) {
        let point = point_at(column, row);
        let layout = self.current_layout();
        self.pointer = Some(point);
        if !self.state.board.pointer_down(&layout, point)
            && let Some(region) = layout.column_at(point)
        {
            let stage = region.stage.clone();
            self.state.select_stage(&stage);
        }
    }

    fn pointer_drag(&mut self, column: u16, row: u16) {
        if self.pointer.is_none() {
            return;
        }
        let point = point_at(column, row);
        let layout = self.current_layout();
        self.pointer = Some(point);
        self.state.board.pointer_move(&layout, point);
    }

    fn pointer_up(&mut self, column: u16, row: u16) {
        if self.pointer.take().is_none() {
            return;
        }
        let point = point_at(column, row);
        let layout = self.current_layout();
        let active = self.state.board.drag().active();
        match self.state.board.pointer_up(&layout, point) {
            PointerRelease::Idle => {}
            PointerRelease::Click(id) => {
                if self.state.select_application(id) {
                    self.state.open_detail(id);
                }
            }
            PointerRelease::Drop(outcome) => self.after_drop(active, &outcome),
        }
    }

    // --- Stage editing ---

    fn edit_stage(&mut self, msg: &Message) {
        if matches!(msg, Message::NewStage) {
            self.state.start_prompt(PromptKind::NewStage, "");
            return;
        }
        let Some(stage) = self.state.selected_stage().cloned() else {
            return;
        };
        let result = match msg {
            Message::RenameStage => {
                self.state
                    .start_prompt(PromptKind::RenameStage(stage.key.clone()), stage.label.clone());
                Ok(())
            }
            Message::CycleStageColor => {
                let color = next_in(STAGE_PALETTE, &stage.color);
                self.state.board.recolor_stage(&stage.key, color).map(drop)
            }
            Message::CycleStageIcon => {
                let icon = next_in(STAGE_ICONS, &stage.icon);
                self.state.board.reicon_stage(&stage.key, icon).map(drop)
            }
            Message::MoveStageLeft | Message::MoveStageRight => self.move_stage(&stage.key, msg),
            Message::DeleteStage => self.delete_stage(&stage.key, &stage.label),
            _ => Ok(()),
        };
        if let Err(err) = result {
            self.report(&format!("Could not change stage {}", stage.label), &err);
        }
    }

    fn move_stage(&mut self, key: &StageKey, msg: &Message) -> Result<(), PipelineError> {
        let Some(index) = self.state.board.registry().index_of(key) else {
            return Err(PipelineError::UnknownStage(key.clone()));
        };
        let target = match msg {
            Message::MoveStageLeft => index.saturating_sub(1),
            _ => index + 1,
        };
        self.state.board.reorder_stage(key, target)?;
        self.state.select_stage(key);
        Ok(())
    }

    /// Deletes a custom stage, moving its candidates to the first other
    /// visible stage.
    fn delete_stage(&mut self, key: &StageKey, label: &str) -> Result<(), PipelineError> {
        let fallback = self
            .state
            .board
            .visible_stages(false)
            .into_iter()
            .find(|s| &s.key != key)
            .map(|s| (s.key.clone(), s.label.clone()));
        let occupied = self.state.board.store().count_in(key) > 0;
        let reassign = fallback.as_ref().filter(|_| occupied).map(|(k, _)| k);

        let moved = self.state.board.delete_stage(key, reassign)?;
        let message = match (&fallback, moved.len()) {
            (Some((_, to)), n) if n > 0 => format!("Deleted stage {label}; moved {n} candidate(s) to {to}"),
            _ => format!("Deleted stage {label}"),
        };
        self.state.board.notices_mut().info(message);
        Ok(())
    }

    fn confirm_prompt(&mut self) {
        let Some(prompt) = self.state.prompt.take() else {
            return;
        };
        match prompt.kind {
            PromptKind::NewStage => {
                let custom = self
                    .state
                    .board
                    .registry()
                    .stages()
                    .iter()
                    .filter(|s| s.is_custom)
                    .count();
                let color = STAGE_PALETTE[custom % STAGE_PALETTE.len()];
                match self.state.board.create_stage(&prompt.input, color, NEW_STAGE_ICON) {
                    Ok(stage) => {
                        info!(key = %stage.key, label = %stage.label, "stage created");
                        self.state.select_stage(&stage.key);
                    }
                    Err(err) => self.report("Could not create stage", &err),
                }
            }
            PromptKind::RenameStage(key) => {
                if let Err(err) = self.state.board.rename_stage(&key, &prompt.input) {
                    self.report("Could not rename stage", &err);
                }
            }
        }
    }

    /// Clamps the detail scroll offset to prevent scrolling past content.
    fn clamp_scroll_to_content(&mut self) {
        let Some(app) = self.state.detail_application() else {
            return;
        };
        let max = body_area_dimensions(self.board_area())
            .map_or(0, |(height, width)| max_scroll_offset(app, height, width));
        self.state.clamp_detail_scroll(max);
    }

    // --- Rendering ---

    /// Renders the application UI to the given frame.
    ///
    /// Below the minimum size only a "terminal too small" message is shown;
    /// in tight terminals the header is hidden to reclaim space.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.last_area = area;

        if area.height < MIN_HEIGHT || area.width < MIN_WIDTH {
            self.header_visible = false;
            Self::render_terminal_too_small(frame, area);
            return;
        }

        let show_header = area.height >= MIN_HEIGHT_WITH_HEADER;
        self.header_visible = show_header;

        let content_area = if show_header {
            let [header, rest] =
                Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)]).areas(area);
            self.render_header(frame, header);
            rest
        } else {
            area
        };
        let [main, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(NOTICE_HEIGHT)]).areas(content_area);

        match self.state.detail_application() {
            Some(app) => {
                let context = DetailContext {
                    stage: self.state.board.registry().get(&app.status),
                    claimed: self.state.board.is_claimed(app.id),
                    syncing: self.state.board.store().is_syncing(app.id),
                };
                render_detail_panel(app, context, self.state.detail_scroll, main, frame.buffer_mut());
            }
            None => {
                let view = BoardView {
                    selected_column: self.state.selected_column,
                    selected_card: self.state.selected_card,
                    show_rejected: self.state.show_rejected,
                    pointer: self.pointer,
                };
                render_board(&self.state.board, &view, main, frame.buffer_mut());
            }
        }

        render_notice(
            self.state.board.notices().latest(),
            self.state.board.outstanding(),
            status,
            frame.buffer_mut(),
        );

        if let Some(prompt) = &self.state.prompt {
            render_prompt(prompt, area, frame.buffer_mut());
        }
        if self.state.help_visible {
            render_help_overlay(area, frame.buffer_mut());
        }
    }

    /// Renders a message indicating the terminal is too small.
    fn render_terminal_too_small(frame: &mut Frame, area: Rect) {
        let message = format!(
            "Terminal too small ({}×{})\nMinimum: {}×{} (w×h)",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );

        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });

        let vertical_offset = area.height.saturating_sub(2) / 2;
        let centered_area = Rect {
            x: area.x,
            y: area.y + vertical_offset,
            width: area.width,
            height: area.height.saturating_sub(vertical_offset),
        };

        frame.render_widget(paragraph, centered_area);
    }

    /// Renders the header bar with the job, the recruiter and the help cue.
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [title_area, help_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(17)]).areas(inner);

        let context = self.state.board.context();
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "hireboard",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::styled(context.job.to_string(), Style::default().fg(Color::White)),
            Span::styled(
                format!("  ({})", context.recruiter),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        frame.render_widget(title, title_area);

        let help_cue = Paragraph::new(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" for help", Style::default().fg(Color::DarkGray)),
        ]))
        .alignment(Alignment::Right);
        frame.render_widget(help_cue, help_area);
    }

    /// Runs the main application loop until the user quits.
    ///
    /// Persistence completions are applied between frames. On quit, writes
    /// still in flight get a short grace period to land.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal operations fail.
    pub async fn run(&mut self, terminal: &mut AppTerminal) -> anyhow::Result<()> {
        loop {
            if self.state.board.pump() > 0 {
                self.state.clamp_selection();
            }

            terminal.draw(|frame| self.view(frame))?;

            if let Some(event) = poll_event()?
                && let Some(msg) = event_to_message(&event, self.state.is_prompting())
            {
                self.update(msg);
            }

            if self.should_quit {
                break;
            }
            tokio::task::yield_now().await;
        }

        self.flush().await;
        Ok(())
    }

    /// Waits a bounded time for in-flight writes.
    async fn flush(&mut self) {
        let pending = self.state.board.outstanding();
        if pending == 0 {
            return;
        }
        info!(pending, "waiting for in-flight writes");
        let board = &mut self.state.board;
        let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
            while board.settle_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!(
                pending = self.state.board.outstanding(),
                "quitting with writes still in flight"
            );
        }
    }
}

/// The entry after `current` in `options`, wrapping around.
fn next_in<'a>(options: &[&'a str], current: &str) -> &'a str {
    let next = options
        .iter()
        .position(|o| o.eq_ignore_ascii_case(current))
        .map_or(0, |i| (i + 1) % options.len());
    options.get(next).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests;
