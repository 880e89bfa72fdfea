//! Application state management.
//!
//! This module defines the state the TUI keeps on top of the pipeline
//! board: focus, the selected column and card, the detail view, and the
//! stage label prompt.

use hireboard_pipeline::PipelineBoard;
use hireboard_protocol::{Application, ApplicationId, Stage, StageKey};

/// The current focus area in the UI.
///
/// Determines which UI component receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Focus is on the board columns.
    #[default]
    Board,
    /// Focus is on the application detail view.
    Detail,
}

/// What a prompt's text is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Label of a new custom stage.
    NewStage,
    /// New label of an existing stage.
    RenameStage(StageKey),
}

/// A single-line text prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// What the text will be used for.
    pub kind: PromptKind,
    /// Text typed so far.
    pub input: String,
}

impl Prompt {
    /// Title shown above the input.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.kind {
            PromptKind::NewStage => "New stage",
            PromptKind::RenameStage(_) => "Rename stage",
        }
    }
}

/// The application state.
///
/// Owns the pipeline board and tracks what the recruiter is looking at.
/// Selection is by position in the visible partition and is re-clamped
/// whenever the board changes under it.
#[derive(Debug)]
pub struct AppState {
    /// The pipeline board being displayed.
    pub board: PipelineBoard,
    /// Current focus area.
    pub focus: Focus,
    /// Index of the selected column among the visible stages.
    pub selected_column: usize,
    /// Index of the selected card within the column, if any.
    pub selected_card: Option<usize>,
    /// Application shown in the detail view.
    pub detail: Option<ApplicationId>,
    /// Scroll offset for the detail view.
    pub detail_scroll: u16,
    /// Whether the help overlay is visible.
    pub help_visible: bool,
    /// Whether the Rejected column is shown.
    pub show_rejected: bool,
    /// Open stage label prompt.
    pub prompt: Option<Prompt>,
}

impl AppState {
    /// Creates a new state over `board`, selecting the first column.
    #[must_use]
    pub fn new(board: PipelineBoard) -> Self {
        Self {
            board,
            focus: Focus::default(),
            selected_column: 0,
            selected_card: None,
            detail: None,
            detail_scroll: 0,
            help_visible: false,
            show_rejected: false,
            prompt: None,
        }
    }

    /// Number of visible columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.board.visible_stages(self.show_rejected).len()
    }

    /// The stage of the selected column.
    #[must_use]
    pub fn selected_stage(&self) -> Option<&Stage> {
        self.board
            .visible_stages(self.show_rejected)
            .get(self.selected_column)
            .copied()
    }

    /// Number of cards in the selected column.
    fn selected_column_len(&self) -> usize {
        self.selected_stage()
            .map_or(0, |stage| self.board.store().count_in(&stage.key))
    }

    /// The selected application, if a card is selected.
    #[must_use]
    pub fn selected_application(&self) -> Option<&Application> {
        let card = self.selected_card?;
        let stage = self.selected_stage()?;
        self.board.store().column(&stage.key).get(card).copied()
    }

    /// The application shown in the detail view.
    #[must_use]
    pub fn detail_application(&self) -> Option<&Application> {
        self.detail.and_then(|id| self.board.store().get(id))
    }

    /// Toggles the help overlay visibility.
    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    /// Dismisses the help overlay if it is visible.
    ///
    /// Returns `true` if help was visible and has been dismissed.
    pub fn dismiss_help(&mut self) -> bool {
        std::mem::replace(&mut self.help_visible, false)
    }

    /// Shows or hides the Rejected column.
    pub fn toggle_rejected(&mut self) {
        self.show_rejected = !self.show_rejected;
        self.clamp_selection();
    }

    /// Moves the column selection to the left, wrapping around if needed.
    pub fn navigate_left(&mut self) {
        let count = self.column_count();
        if count == 0 {
            return;
        }
        self.selected_column = if self.selected_column == 0 {
            count - 1
        } else {
            self.selected_column - 1
        };
        self.clamp_card_selection();
    }

    /// Moves the column selection to the right, wrapping around if needed.
    pub fn navigate_right(&mut self) {
        let count = self.column_count();
        if count == 0 {
            return;
        }
        self.selected_column = (self.selected_column + 1) % count;
        self.clamp_card_selection();
    }

    /// Moves the card selection up within the current column.
    pub fn navigate_up(&mut self) {
        let len = self.selected_column_len();
        if len == 0 {
            self.selected_card = None;
            return;
        }
        self.selected_card = match self.selected_card {
            Some(idx) if idx > 0 => Some(idx - 1),
            Some(_) => Some(len - 1),
            None => Some(0),
        };
    }

    /// Moves the card selection down within the current column.
    pub fn navigate_down(&mut self) {
        let len = self.selected_column_len();
        if len == 0 {
            self.selected_card = None;
            return;
        }
        self.selected_card = match self.selected_card {
            Some(idx) if idx + 1 < len => Some(idx + 1),
            Some(_) | None => Some(0),
        };
    }

    /// Selects the card of `id`, wherever it currently is.
    ///
    /// Returns `false` if the application is not on a visible column.
    pub fn select_application(&mut self, id: ApplicationId) -> bool {
        let partition = self.board.partition(self.show_rejected);
        let found = partition.columns().iter().enumerate().find_map(|(col, column)| {
            column
                .applications
                .iter()
                .position(|app| app.id == id)
                .map(|card| (col, card))
        });
        match found {
            Some((column, card)) => {
                self.selected_column = column;
                self.selected_card = Some(card);
                true
            }
            None => false,
        }
    }

    /// Selects the column showing `key`.
    pub fn select_stage(&mut self, key: &StageKey) {
        if let Some(index) = self
            .board
            .visible_stages(self.show_rejected)
            .iter()
            .position(|s| &s.key == key)
        {
            self.selected_column = index;
            self.clamp_card_selection();
        }
    }

    /// Opens the detail view for `id`.
    pub fn open_detail(&mut self, id: ApplicationId) {
        self.detail = Some(id);
        self.focus = Focus::Detail;
        self.detail_scroll = 0;
    }

    /// Closes the detail view.
    pub fn close_detail(&mut self) {
        self.detail = None;
        self.focus = Focus::Board;
        self.detail_scroll = 0;
    }

    /// Scrolls the detail view by `delta` rows, never above the top.
    ///
    /// Call [`clamp_detail_scroll`](Self::clamp_detail_scroll) afterwards
    /// to stop at the end of the content.
    pub fn scroll_detail(&mut self, delta: i16) {
        self.detail_scroll = self.detail_scroll.saturating_add_signed(delta);
    }

    /// Clamps the detail scroll offset to `max`.
    pub fn clamp_detail_scroll(&mut self, max: u16) {
        self.detail_scroll = self.detail_scroll.min(max);
    }

    /// Clears the current card selection.
    pub fn clear_selection(&mut self) {
        self.selected_card = None;
    }

    /// Keeps the selection valid after the board changed.
    ///
    /// Also closes the detail view if its application is gone.
    pub fn clamp_selection(&mut self) {
        let count = self.column_count();
        if self.selected_column >= count {
            self.selected_column = count.saturating_sub(1);
        }
        self.clamp_card_selection();
        if self.detail.is_some() && self.detail_application().is_none() {
            self.close_detail();
        }
    }

    fn clamp_card_selection(&mut self) {
        let len = self.selected_column_len();
        if len == 0 {
            self.selected_card = None;
        } else if let Some(idx) = self.selected_card
            && idx >= len
        {
            self.selected_card = Some(len - 1);
        }
    }

    /// Opens a prompt, prefilled with `initial`.
    pub fn start_prompt(&mut self, kind: PromptKind, initial: impl Into<String>) {
        self.prompt = Some(Prompt {
            kind,
            input: initial.into(),
        });
    }

    /// Appends a character to the open prompt.
    pub fn prompt_input(&mut self, ch: char) {
        if let Some(prompt) = &mut self.prompt
            && !ch.is_control()
        {
            prompt.input.push(ch);
        }
    }

    /// Removes the last character of the open prompt.
    pub fn prompt_backspace(&mut self) {
        if let Some(prompt) = &mut self.prompt {
            prompt.input.pop();
        }
    }

    /// Returns `true` while a prompt is open.
    #[must_use]
    pub fn is_prompting(&self) -> bool {
        self.prompt.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::demo_board;
    use hireboard_protocol::BuiltinStage;

    #[test]
    fn new_state_has_correct_defaults() {
        let state = AppState::new(demo_board());

        assert_eq!(state.focus, Focus::Board);
        assert_eq!(state.selected_column, 0);
        assert_eq!(state.selected_card, None);
        assert!(state.detail.is_none());
        assert!(!state.help_visible);
        assert!(!state.show_rejected);
        assert_eq!(state.column_count(), 5);
    }

    #[test]
    fn navigate_left_wraps_around() {
        let mut state = AppState::new(demo_board());

        state.navigate_left();
        assert_eq!(state.selected_column, 4);

        state.navigate_left();
        assert_eq!(state.selected_column, 3);

        state.navigate_right();
        state.navigate_right();
        assert_eq!(state.selected_column, 0);
    }

    #[test]
    fn navigate_up_down_wraps_within_column() {
        let mut state = AppState::new(demo_board());

        state.navigate_down();
        assert_eq!(state.selected_card, Some(0));
        state.navigate_down();
        state.navigate_down();
        assert_eq!(state.selected_card, Some(2));
        state.navigate_down();
        assert_eq!(state.selected_card, Some(0));
        state.navigate_up();
        assert_eq!(state.selected_card, Some(2));

        let selected = state.selected_application().unwrap();
        assert_eq!(selected.status, BuiltinStage::Pending.into());
    }

    #[test]
    fn card_selection_clamped_when_changing_column() {
        let mut state = AppState::new(demo_board());
        state.selected_card = Some(2);

        // Reviewing holds two applications.
        state.navigate_right();
        assert_eq!(state.selected_card, Some(1));

        // Hired is empty.
        state.navigate_right();
        state.navigate_right();
        state.navigate_right();
        assert_eq!(state.selected_stage().unwrap().label, "Hired");
        assert_eq!(state.selected_card, None);
        state.navigate_down();
        assert_eq!(state.selected_card, None);
    }

    #[test]
    fn toggling_rejected_changes_columns() {
        let mut state = AppState::new(demo_board());
        state.toggle_rejected();
        assert_eq!(state.column_count(), 6);

        state.selected_column = 5;
        state.toggle_rejected();
        assert_eq!(state.column_count(), 5);
        assert_eq!(state.selected_column, 4);
    }

    #[test]
    fn select_application_finds_its_card() {
        let mut state = AppState::new(demo_board());
        let id = state
            .board
            .store()
            .column(&BuiltinStage::Interview.into())[0]
            .id;

        assert!(state.select_application(id));
        assert_eq!(state.selected_column, 2);
        assert_eq!(state.selected_card, Some(0));
        assert_eq!(state.selected_application().map(|a| a.id), Some(id));
    }

    #[test]
    fn scroll_detail_does_not_underflow() {
        let mut state = AppState::new(demo_board());

        state.scroll_detail(5);
        assert_eq!(state.detail_scroll, 5);
        state.scroll_detail(-10);
        assert_eq!(state.detail_scroll, 0);

        state.scroll_detail(100);
        state.clamp_detail_scroll(10);
        assert_eq!(state.detail_scroll, 10);
    }

    #[test]
    fn open_and_close_detail() {
        let mut state = AppState::new(demo_board());
        let id = state.board.store().applications()[0].id;

        state.open_detail(id);
        assert_eq!(state.focus, Focus::Detail);
        assert_eq!(state.detail_application().map(|a| a.id), Some(id));

        state.close_detail();
        assert_eq!(state.focus, Focus::Board);
        assert!(state.detail.is_none());
    }

    #[test]
    fn dismiss_help_reports_visibility() {
        let mut state = AppState::new(demo_board());
        assert!(!state.dismiss_help());

        state.toggle_help();
        assert!(state.dismiss_help());
        assert!(!state.help_visible);
    }

    #[test]
    fn prompt_editing() {
        let mut state = AppState::new(demo_board());
        state.prompt_input('x');
        assert!(!state.is_prompting());

        state.start_prompt(PromptKind::NewStage, "");
        state.prompt_input('O');
        state.prompt_input('k');
        state.prompt_input('\n');
        state.prompt_backspace();
        state.prompt_input('n');
        assert_eq!(state.prompt.as_ref().map(|p| p.input.as_str()), Some("On"));
        assert_eq!(state.prompt.as_ref().map(Prompt::title), Some("New stage"));
    }
}
