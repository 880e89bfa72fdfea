use hireboard_pipeline::NoticeLevel;
use hireboard_protocol::{BuiltinStage, JobId, StageKey, dummy::DUMMY_JOB};
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

use super::*;
use crate::test_utils::{buffer_to_string, demo_board, demo_board_with_store};

fn app() -> App {
    App::new(demo_board())
}

fn draw(app: &mut App, width: u16, height: u16) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| app.view(frame)).unwrap();
    terminal.backend().buffer().clone()
}

fn id_of(app: &App, name: &str) -> ApplicationId {
    app.state()
        .board
        .store()
        .applications()
        .iter()
        .find(|a| a.applicant.name == name)
        .map(|a| a.id)
        .unwrap()
}

fn status_of(app: &App, name: &str) -> StageKey {
    let id = id_of(app, name);
    app.state().board.store().get(id).unwrap().status.clone()
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.update(Message::Input { ch });
    }
}

fn latest_level(app: &App) -> Option<NoticeLevel> {
    app.state().board.notices().latest().map(|n| n.level)
}

#[test]
fn quit_sets_should_quit() {
    let mut app = app();
    assert!(!app.should_quit());
    app.update(Message::Quit);
    assert!(app.should_quit());
}

#[test]
fn help_overlay_swallows_messages() {
    let mut app = app();
    app.update(Message::ToggleHelp);
    assert!(app.state().help_visible);

    app.update(Message::NavigateRight);
    assert!(!app.state().help_visible);
    assert_eq!(app.state().selected_column, 0);

    app.update(Message::ToggleHelp);
    app.update(Message::Quit);
    assert!(app.should_quit());
}

#[test]
fn arrows_move_the_selection() {
    let mut app = app();
    app.update(Message::NavigateRight);
    app.update(Message::NavigateDown);
    assert_eq!(app.state().selected_column, 1);
    assert_eq!(app.state().selected_card, Some(0));
    assert_eq!(
        app.state().selected_stage().map(|s| s.key.clone()),
        Some(BuiltinStage::Reviewing.into())
    );
}

#[tokio::test]
async fn select_opens_detail_and_marks_viewed() {
    let (board, backend) = demo_board_with_store();
    let mut app = App::new(board);
    let ada = id_of(&app, "Ada Lovelace");

    app.update(Message::NavigateDown);
    app.update(Message::Select);
    assert_eq!(app.state().detail, Some(ada));
    assert_eq!(app.state().focus, Focus::Detail);
    assert!(app.state().detail_application().unwrap().is_viewed());

    app.state.board.settle_next().await;
    let stored = backend.application(&JobId::new(DUMMY_JOB), ada).unwrap();
    assert!(stored.viewed_at.is_some());
}

#[tokio::test]
async fn escape_closes_detail_then_clears_selection() {
    let mut app = app();
    app.update(Message::NavigateDown);
    app.update(Message::Select);
    assert!(app.state().detail.is_some());

    app.update(Message::Escape);
    assert!(app.state().detail.is_none());
    assert_eq!(app.state().focus, Focus::Board);
    assert_eq!(app.state().selected_card, Some(0));

    app.update(Message::Escape);
    assert_eq!(app.state().selected_card, None);
}

#[tokio::test]
async fn keyboard_move_transitions_the_candidate() {
    let (board, backend) = demo_board_with_store();
    let mut app = App::new(board);
    let ada = id_of(&app, "Ada Lovelace");

    app.update(Message::NavigateDown);
    app.update(Message::PickUp);
    assert!(app.state().board.drag().is_dragging());

    app.update(Message::NavigateRight);
    assert_eq!(app.state().selected_column, 1);
    app.update(Message::Select);

    assert!(!app.state().board.drag().is_dragging());
    assert_eq!(status_of(&app, "Ada Lovelace"), BuiltinStage::Reviewing.into());
    assert_eq!(app.state().selected_application().map(|a| a.id), Some(ada));

    while app.state.board.settle_next().await.is_some() {}
    let stored = backend.application(&JobId::new(DUMMY_JOB), ada).unwrap();
    assert_eq!(stored.status, BuiltinStage::Reviewing.into());
}

#[tokio::test]
async fn failed_move_rolls_back_with_an_error() {
    let (board, backend) = demo_board_with_store();
    backend.set_offline(true);
    let mut app = App::new(board);

    app.update(Message::NavigateDown);
    app.update(Message::PickUp);
    app.update(Message::NavigateRight);
    app.update(Message::Select);
    assert_eq!(status_of(&app, "Ada Lovelace"), BuiltinStage::Reviewing.into());

    while app.state.board.settle_next().await.is_some() {}
    app.state.clamp_selection();
    assert_eq!(status_of(&app, "Ada Lovelace"), BuiltinStage::Pending.into());
    assert_eq!(latest_level(&app), Some(NoticeLevel::Error));
}

#[test]
fn escape_cancels_a_keyboard_drag() {
    let mut app = app();
    app.update(Message::NavigateDown);
    app.update(Message::PickUp);
    app.update(Message::NavigateRight);
    app.update(Message::Escape);

    assert!(!app.state().board.drag().is_dragging());
    assert_eq!(status_of(&app, "Ada Lovelace"), BuiltinStage::Pending.into());
}

#[test]
fn board_keys_are_ignored_while_dragging() {
    let mut app = app();
    app.update(Message::NavigateDown);
    app.update(Message::PickUp);
    app.update(Message::NewStage);
    app.update(Message::ToggleRejected);
    assert!(app.state().prompt.is_none());
    assert!(!app.state().show_rejected);
}

#[tokio::test]
async fn clicking_a_card_opens_it() {
    let mut app = app();
    let ada = id_of(&app, "Ada Lovelace");
    draw(&mut app, 100, 20);

    app.update(Message::PointerDown { column: 5, row: 5 });
    app.update(Message::PointerUp { column: 5, row: 5 });
    assert_eq!(app.state().detail, Some(ada));
}

#[tokio::test]
async fn dragging_a_card_to_another_column_moves_it() {
    let mut app = app();
    let ada = id_of(&app, "Ada Lovelace");
    draw(&mut app, 100, 20);

    app.update(Message::PointerDown { column: 5, row: 5 });
    app.update(Message::PointerDrag { column: 25, row: 6 });
    assert!(app.state().board.drag().is_dragging());
    let buf = draw(&mut app, 100, 20);
    assert!(buffer_to_string(&buf).contains("Reviewing"));

    app.update(Message::PointerUp { column: 25, row: 6 });
    assert!(!app.state().board.drag().is_dragging());
    assert_eq!(status_of(&app, "Ada Lovelace"), BuiltinStage::Reviewing.into());
    assert_eq!(app.state().selected_application().map(|a| a.id), Some(ada));
    assert!(app.state().detail.is_none());
}

#[test]
fn clicking_an_empty_column_selects_it() {
    let mut app = app();
    draw(&mut app, 100, 20);

    // The fifth column (Hired) has no cards.
    app.update(Message::PointerDown { column: 85, row: 10 });
    app.update(Message::PointerUp { column: 85, row: 10 });
    assert_eq!(app.state().selected_column, 4);
    assert!(app.state().detail.is_none());
}

#[tokio::test]
async fn claimed_candidates_can_be_rated() {
    let mut app = app();
    let grace = id_of(&app, "Grace Hopper");
    assert!(app.state.select_application(grace));

    app.update(Message::SetRating { value: 4 });
    assert_eq!(app.state().board.store().get(grace).unwrap().rating, 4);
}

#[test]
fn rating_an_unclaimed_candidate_is_informational() {
    let mut app = app();
    let ada = id_of(&app, "Ada Lovelace");
    app.update(Message::NavigateDown);

    app.update(Message::SetRating { value: 3 });
    assert_eq!(app.state().board.store().get(ada).unwrap().rating, 0);
    assert_eq!(latest_level(&app), Some(NoticeLevel::Info));
}

#[tokio::test]
async fn new_stage_prompt_creates_a_stage() {
    let mut app = app();
    let columns = app.state().column_count();

    app.update(Message::NewStage);
    assert!(app.state().is_prompting());
    type_text(&mut app, "Take-home");
    // Board keys are text while prompting.
    app.update(Message::Input { ch: 'z' });
    app.update(Message::Backspace);
    app.update(Message::Select);

    assert!(app.state().prompt.is_none());
    assert_eq!(app.state().column_count(), columns + 1);
    let stage = app.state().selected_stage().unwrap();
    assert_eq!(stage.label, "Take-home");
    assert!(stage.is_custom);
}

#[test]
fn escape_cancels_the_prompt() {
    let mut app = app();
    let columns = app.state().column_count();
    app.update(Message::NewStage);
    type_text(&mut app, "Nope");
    app.update(Message::Escape);

    assert!(app.state().prompt.is_none());
    assert_eq!(app.state().column_count(), columns);
}

#[test]
fn blank_stage_name_is_reported() {
    let mut app = app();
    app.update(Message::NewStage);
    type_text(&mut app, "   ");
    app.update(Message::Select);

    assert_eq!(latest_level(&app), Some(NoticeLevel::Error));
    assert_eq!(app.state().column_count(), 5);
}

#[tokio::test]
async fn rename_prompt_starts_with_the_current_label() {
    let mut app = app();
    let label = app.state().selected_stage().unwrap().label.clone();

    app.update(Message::RenameStage);
    assert_eq!(app.state().prompt.as_ref().map(|p| p.input.as_str()), Some(label.as_str()));
    type_text(&mut app, "!");
    app.update(Message::Select);

    assert_eq!(app.state().selected_stage().unwrap().label, format!("{label}!"));
}

#[tokio::test]
async fn color_and_icon_cycle() {
    let mut app = app();
    let before = app.state().selected_stage().cloned().unwrap();

    app.update(Message::CycleStageColor);
    app.update(Message::CycleStageIcon);

    let after = app.state().selected_stage().cloned().unwrap();
    assert_eq!(after.key, before.key);
    assert_ne!(after.color, before.color);
    assert_ne!(after.icon, before.icon);
}

#[tokio::test]
async fn moving_a_stage_keeps_it_selected() {
    let mut app = app();
    let pending: StageKey = BuiltinStage::Pending.into();

    app.update(Message::MoveStageRight);
    assert_eq!(app.state().board.registry().index_of(&pending), Some(1));
    assert_eq!(app.state().selected_column, 1);

    app.update(Message::MoveStageLeft);
    assert_eq!(app.state().board.registry().index_of(&pending), Some(0));
    assert_eq!(app.state().selected_column, 0);
}

#[test]
fn builtin_stages_cannot_be_deleted() {
    let mut app = app();
    app.update(Message::DeleteStage);

    assert_eq!(app.state().column_count(), 5);
    assert_eq!(latest_level(&app), Some(NoticeLevel::Error));
}

#[tokio::test]
async fn deleting_a_custom_stage_moves_its_candidates() {
    let mut app = app();
    let ada = id_of(&app, "Ada Lovelace");
    let stage = app.state.board.create_stage("Take-home", "#22c55e", "flag").unwrap();
    app.state.board.transition(ada, &stage.key).unwrap();
    while app.state.board.settle_next().await.is_some() {}

    app.state.select_stage(&stage.key);
    app.update(Message::DeleteStage);

    assert!(app.state().board.registry().get(&stage.key).is_none());
    assert_eq!(status_of(&app, "Ada Lovelace"), BuiltinStage::Pending.into());
    let notice = app.state().board.notices().latest().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert!(notice.message.contains("moved 1 candidate"));
}

#[test]
fn toggling_rejected_adds_a_column() {
    let mut app = app();
    app.update(Message::ToggleRejected);
    assert_eq!(app.state().column_count(), 6);
    app.update(Message::ToggleRejected);
    assert_eq!(app.state().column_count(), 5);
}

#[test]
fn tiny_terminal_shows_a_message() {
    let mut app = app();
    let buf = draw(&mut app, 30, 8);
    assert!(buffer_to_string(&buf).contains("Terminal too small"));
}

#[test]
fn header_shows_job_and_help_cue() {
    let mut app = app();
    let buf = draw(&mut app, 100, 20);
    let text = buffer_to_string(&buf);
    let first_rows: Vec<&str> = text.lines().take(3).collect();
    assert!(first_rows[1].contains("hireboard - rust-platform-engineer"));
    assert!(first_rows[1].contains("Press ? for help"));
}

#[test]
fn short_terminal_hides_the_header() {
    let mut app = app();
    let buf = draw(&mut app, 100, MIN_HEIGHT);
    let text = buffer_to_string(&buf);
    assert!(!text.contains("Press ? for help"));
    assert!(text.contains("Inbox"));
}

#[tokio::test]
async fn detail_view_replaces_the_board() {
    let mut app = app();
    app.update(Message::NavigateDown);
    app.update(Message::Select);

    let text = buffer_to_string(&draw(&mut app, 100, 24));
    assert!(text.contains("Ada Lovelace"));
    assert!(text.contains("Screening"));
    assert!(!text.contains("No candidates"));
}

#[test]
fn next_in_wraps_and_falls_back() {
    let options = ["a", "b", "c"];
    assert_eq!(next_in(&options, "a"), "b");
    assert_eq!(next_in(&options, "c"), "a");
    assert_eq!(next_in(&options, "zzz"), "a");
}
