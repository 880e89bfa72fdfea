//! TUI message types for event handling.
//!
//! This module defines the message enum used for communication between
//! the TUI input handler and the board application state.

use serde::{Deserialize, Serialize};

/// Messages that represent user actions in the TUI.
///
/// These messages are produced by the input handler and consumed by
/// the application to update the board.
///
/// # Examples
///
/// ```
/// use hireboard_protocol::Message;
///
/// let msg = Message::NavigateRight;
/// assert!(msg.is_navigation());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// Move selection (or the keyboard drop target) to the left stage.
    NavigateLeft,
    /// Move selection (or the keyboard drop target) to the right stage.
    NavigateRight,
    /// Move selection (or the keyboard insertion slot) up.
    NavigateUp,
    /// Move selection (or the keyboard insertion slot) down.
    NavigateDown,
    /// Open details, confirm a prompt, or drop a keyboard-carried card.
    Select,
    /// Go back to the board from the detail view.
    Back,
    /// Escape: cancel a drag or prompt, close a panel, or clear selection.
    Escape,
    /// Quit the application.
    Quit,
    /// Toggle help overlay.
    ToggleHelp,

    // --- Pointer messages ---
    /// Left button pressed at (column, row).
    PointerDown {
        /// Column (x coordinate).
        column: u16,
        /// Row (y coordinate).
        row: u16,
    },
    /// Pointer moved with the left button held.
    PointerDrag {
        /// Column (x coordinate).
        column: u16,
        /// Row (y coordinate).
        row: u16,
    },
    /// Left button released at (column, row).
    PointerUp {
        /// Column (x coordinate).
        column: u16,
        /// Row (y coordinate).
        row: u16,
    },

    // --- Card actions ---
    /// Pick up the selected card for a keyboard move.
    PickUp,
    /// Rate the selected application.
    SetRating {
        /// The rating, `0..=5`.
        value: u8,
    },
    /// Open the first document of the selected application externally.
    OpenDocument,
    /// Show or hide the Rejected column.
    ToggleRejected,

    // --- Stage editing ---
    /// Start a prompt for a new custom stage.
    NewStage,
    /// Start a prompt to rename the focused stage.
    RenameStage,
    /// Cycle the focused stage's color.
    CycleStageColor,
    /// Cycle the focused stage's icon.
    CycleStageIcon,
    /// Move the focused stage one position to the left.
    MoveStageLeft,
    /// Move the focused stage one position to the right.
    MoveStageRight,
    /// Delete the focused stage.
    DeleteStage,

    // --- Prompt input ---
    /// Input a character while a prompt is open.
    Input {
        /// The character that was input.
        ch: char,
    },
    /// Delete the last character of the prompt.
    Backspace,
}

impl Message {
    /// Returns `true` if this message is a navigation action.
    ///
    /// # Examples
    ///
    /// ```
    /// use hireboard_protocol::Message;
    ///
    /// assert!(Message::NavigateLeft.is_navigation());
    /// assert!(!Message::Select.is_navigation());
    /// ```
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::NavigateLeft | Self::NavigateRight | Self::NavigateUp | Self::NavigateDown
        )
    }

    /// Returns `true` if this message comes from the pointer.
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            Self::PointerDown { .. } | Self::PointerDrag { .. } | Self::PointerUp { .. }
        )
    }

    /// Returns `true` if this message edits the stage configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use hireboard_protocol::Message;
    ///
    /// assert!(Message::DeleteStage.is_stage_edit());
    /// assert!(!Message::PickUp.is_stage_edit());
    /// ```
    #[must_use]
    pub fn is_stage_edit(&self) -> bool {
        matches!(
            self,
            Self::NewStage
                | Self::RenameStage
                | Self::CycleStageColor
                | Self::CycleStageIcon
                | Self::MoveStageLeft
                | Self::MoveStageRight
                | Self::DeleteStage
        )
    }

    /// Returns `true` if this message should terminate the application.
    #[must_use]
    pub fn is_terminating(&self) -> bool {
        matches!(self, Self::Quit)
    }
}
