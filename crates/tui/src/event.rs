//! Event handling and key mappings.
//!
//! This module provides event polling and conversion from terminal events
//! to application messages.

use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use hireboard_protocol::Message;

/// Default poll timeout for events.
///
/// Also bounds how long a persistence completion waits before the loop
/// applies it.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Polls for a terminal event with the default timeout.
///
/// Returns `Some(Event)` if an event is available within the timeout,
/// or `None` if the timeout expires without an event.
///
/// # Errors
///
/// Returns an error if polling the terminal fails.
pub fn poll_event() -> std::io::Result<Option<Event>> {
    if event::poll(POLL_TIMEOUT)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Converts an event (keyboard or mouse) to an application message.
///
/// `prompting` switches the keyboard into text entry while a stage label
/// prompt is open.
#[must_use]
pub fn event_to_message(event: &Event, prompting: bool) -> Option<Message> {
    match event {
        Event::Key(key) if prompting => key_to_prompt_message(*key),
        Event::Key(key) => key_to_message(*key),
        Event::Mouse(mouse) => mouse_to_message(mouse),
        _ => None,
    }
}

/// Converts a mouse event to a pointer message.
///
/// Only the left button takes part in dragging.
#[must_use]
fn mouse_to_message(mouse: &MouseEvent) -> Option<Message> {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Message::PointerDown { column, row }),
        MouseEventKind::Drag(MouseButton::Left) => Some(Message::PointerDrag { column, row }),
        MouseEventKind::Up(MouseButton::Left) => Some(Message::PointerUp { column, row }),
        _ => None,
    }
}

/// Converts a terminal key event to an application message.
///
/// # Key Bindings
///
/// | Key | Action |
/// |-----|--------|
/// | `Ctrl+C` | Quit |
/// | `Esc` | Cancel drag, close panel, or clear selection |
/// | Arrows | Navigate, or move a picked-up card |
/// | `Enter` or `Space` | Open card, or drop a picked-up card |
/// | `Backspace` | Back |
/// | `m` | Pick up the selected card |
/// | `0`-`5` | Rate the selected applicant |
/// | `o` | Open the applicant's first document |
/// | `z` | Show or hide the Rejected column |
/// | `n` | New stage |
/// | `e` | Rename stage |
/// | `c` | Cycle stage color |
/// | `i` | Cycle stage icon |
/// | `<` / `>` | Move stage left / right |
/// | `x` | Delete stage |
/// | `?` | Toggle help |
#[must_use]
pub fn key_to_message(key: KeyEvent) -> Option<Message> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Message::Quit);
    }

    match key.code {
        KeyCode::Esc => Some(Message::Escape),

        KeyCode::Left => Some(Message::NavigateLeft),
        KeyCode::Right => Some(Message::NavigateRight),
        KeyCode::Up => Some(Message::NavigateUp),
        KeyCode::Down => Some(Message::NavigateDown),

        KeyCode::Enter | KeyCode::Char(' ') => Some(Message::Select),
        KeyCode::Backspace => Some(Message::Back),

        // Card actions
        KeyCode::Char('m') => Some(Message::PickUp),
        KeyCode::Char(ch @ '0'..='5') => ch
            .to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .map(|value| Message::SetRating { value }),
        KeyCode::Char('o') => Some(Message::OpenDocument),
        KeyCode::Char('z') => Some(Message::ToggleRejected),

        // Stage editing
        KeyCode::Char('n') => Some(Message::NewStage),
        KeyCode::Char('e') => Some(Message::RenameStage),
        KeyCode::Char('c') => Some(Message::CycleStageColor),
        KeyCode::Char('i') => Some(Message::CycleStageIcon),
        KeyCode::Char('<') => Some(Message::MoveStageLeft),
        KeyCode::Char('>') => Some(Message::MoveStageRight),
        KeyCode::Char('x') => Some(Message::DeleteStage),

        KeyCode::Char('?') => Some(Message::ToggleHelp),

        _ => None,
    }
}

/// Converts a key event while a prompt is open.
///
/// Every printable character becomes input; `Enter` confirms and `Esc`
/// cancels.
#[must_use]
pub fn key_to_prompt_message(key: KeyEvent) -> Option<Message> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Message::Quit);
    }

    match key.code {
        KeyCode::Enter => Some(Message::Select),
        KeyCode::Esc => Some(Message::Escape),
        KeyCode::Backspace => Some(Message::Backspace),
        KeyCode::Char(ch) => Some(Message::Input { ch }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_c() -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn make_mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn quit_keys() {
        assert_eq!(key_to_message(ctrl_c()), Some(Message::Quit));
        assert_eq!(key_to_prompt_message(ctrl_c()), Some(Message::Quit));
        assert_eq!(key_to_message(make_key(KeyCode::Char('q'))), None);
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(
            key_to_message(make_key(KeyCode::Left)),
            Some(Message::NavigateLeft)
        );
        assert_eq!(
            key_to_message(make_key(KeyCode::Right)),
            Some(Message::NavigateRight)
        );
        assert_eq!(
            key_to_message(make_key(KeyCode::Up)),
            Some(Message::NavigateUp)
        );
        assert_eq!(
            key_to_message(make_key(KeyCode::Down)),
            Some(Message::NavigateDown)
        );
        assert_eq!(
            key_to_message(make_key(KeyCode::Enter)),
            Some(Message::Select)
        );
        assert_eq!(
            key_to_message(make_key(KeyCode::Backspace)),
            Some(Message::Back)
        );
    }

    #[test]
    fn rating_keys() {
        assert_eq!(
            key_to_message(make_key(KeyCode::Char('0'))),
            Some(Message::SetRating { value: 0 })
        );
        assert_eq!(
            key_to_message(make_key(KeyCode::Char('5'))),
            Some(Message::SetRating { value: 5 })
        );
        assert_eq!(key_to_message(make_key(KeyCode::Char('6'))), None);
    }

    #[test]
    fn card_and_stage_keys() {
        let cases = [
            ('m', Message::PickUp),
            ('o', Message::OpenDocument),
            ('z', Message::ToggleRejected),
            ('n', Message::NewStage),
            ('e', Message::RenameStage),
            ('c', Message::CycleStageColor),
            ('i', Message::CycleStageIcon),
            ('<', Message::MoveStageLeft),
            ('>', Message::MoveStageRight),
            ('x', Message::DeleteStage),
            ('?', Message::ToggleHelp),
        ];
        for (ch, expected) in cases {
            assert_eq!(key_to_message(make_key(KeyCode::Char(ch))), Some(expected));
        }
    }

    #[test]
    fn unmapped_keys_return_none() {
        assert_eq!(key_to_message(make_key(KeyCode::Char('h'))), None);
        assert_eq!(key_to_message(make_key(KeyCode::F(1))), None);
    }

    #[test]
    fn prompt_mode_captures_text() {
        assert_eq!(
            key_to_prompt_message(make_key(KeyCode::Char('x'))),
            Some(Message::Input { ch: 'x' })
        );
        assert_eq!(
            key_to_prompt_message(make_key(KeyCode::Backspace)),
            Some(Message::Backspace)
        );
        assert_eq!(
            key_to_prompt_message(make_key(KeyCode::Enter)),
            Some(Message::Select)
        );
        assert_eq!(
            key_to_prompt_message(make_key(KeyCode::Esc)),
            Some(Message::Escape)
        );

        let event = Event::Key(make_key(KeyCode::Char('n')));
        assert_eq!(
            event_to_message(&event, true),
            Some(Message::Input { ch: 'n' })
        );
        assert_eq!(event_to_message(&event, false), Some(Message::NewStage));
    }

    #[test]
    fn left_button_drives_the_pointer() {
        assert_eq!(
            mouse_to_message(&make_mouse(MouseEventKind::Down(MouseButton::Left), 10, 5)),
            Some(Message::PointerDown { column: 10, row: 5 })
        );
        assert_eq!(
            mouse_to_message(&make_mouse(MouseEventKind::Drag(MouseButton::Left), 11, 5)),
            Some(Message::PointerDrag { column: 11, row: 5 })
        );
        assert_eq!(
            mouse_to_message(&make_mouse(MouseEventKind::Up(MouseButton::Left), 12, 6)),
            Some(Message::PointerUp { column: 12, row: 6 })
        );
    }

    #[test]
    fn other_mouse_events_ignored() {
        assert_eq!(
            mouse_to_message(&make_mouse(MouseEventKind::Down(MouseButton::Right), 1, 1)),
            None
        );
        assert_eq!(
            mouse_to_message(&make_mouse(MouseEventKind::Moved, 1, 1)),
            None
        );
    }

    #[test]
    fn resize_events_ignored() {
        assert_eq!(event_to_message(&Event::Resize(80, 24), false), None);
    }
}
