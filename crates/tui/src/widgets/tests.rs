//! Rendering tests for the composed board.

use hireboard_pipeline::PipelineBoard;
use ratatui::{buffer::Buffer, layout::Rect, style::Color};

use super::{BoardView, render_board};
use crate::layout::{board_layout, point_at};
use crate::test_utils::{buffer_to_string, demo_board};

const AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 100,
    height: 14,
};

fn render(board: &PipelineBoard, view: &BoardView) -> Buffer {
    let mut buf = Buffer::empty(AREA);
    render_board(board, view, AREA, &mut buf);
    buf
}

#[test]
fn board_shows_every_pipeline_stage() {
    let board = demo_board();
    let buf = render(&board, &BoardView::default());
    let content = buffer_to_string(&buf);

    for title in ["Inbox (3)", "Reviewing (2)", "Interview (1)", "Offered (1)", "Hired (0)"] {
        assert!(content.contains(title), "missing {title}");
    }
    assert!(!content.contains("Rejected"));
    assert!(content.contains("No candidates"));
}

#[test]
fn rejected_column_can_be_shown() {
    let board = demo_board();
    let view = BoardView {
        show_rejected: true,
        ..BoardView::default()
    };
    let content = buffer_to_string(&render(&board, &view));

    assert!(content.contains("Rejected (1)"));
    assert!(content.contains("Edsger"));
}

#[test]
fn borders_are_shared_between_columns() {
    let board = demo_board();
    let buf = render(&board, &BoardView::default());

    assert_eq!(buf[(0, 0)].symbol(), "╭");
    assert_eq!(buf[(20, 0)].symbol(), "┬");
    assert_eq!(buf[(99, 0)].symbol(), "╮");
    assert_eq!(buf[(0, 13)].symbol(), "╰");
    assert_eq!(buf[(99, 13)].symbol(), "╯");
}

#[test]
fn focused_column_is_highlighted() {
    let board = demo_board();
    let view = BoardView {
        selected_column: 1,
        selected_card: Some(0),
        ..BoardView::default()
    };
    let buf = render(&board, &view);

    assert_eq!(buf[(20, 0)].fg, Color::Cyan);
    // The shared edge to the right of the focused column.
    assert_eq!(buf[(40, 5)].fg, Color::Cyan);
    assert_eq!(buf[(60, 0)].fg, Color::DarkGray);
    assert_eq!(buf[(21, 1)].symbol(), "┏");
}

#[test]
fn keyboard_drag_highlights_target_column() {
    let mut board = demo_board();
    let ada = board.partition(false).columns()[0].applications[0].id;
    assert!(board.pick_up(ada));
    board.keyboard_move(hireboard_pipeline::Direction::Right, false);

    let buf = render(&board, &BoardView::default());
    assert_eq!(buf[(20, 0)].fg, Color::Yellow);
    // Ada's card stays behind as a placeholder.
    assert_eq!(buf[(1, 1)].fg, Color::DarkGray);
}

#[test]
fn pointer_drag_draws_a_ghost() {
    let mut board = demo_board();
    let layout = board_layout(&board.partition(false), AREA, (0, None));
    assert!(board.pointer_down(&layout, point_at(5, 2)));
    board.pointer_move(&layout, point_at(65, 8));
    assert!(board.drag().is_dragging());

    let view = BoardView {
        pointer: Some(point_at(65, 8)),
        ..BoardView::default()
    };
    let buf = render(&board, &view);

    // Grabbed at (4, 1) inside the card, so the ghost starts at (61, 7).
    assert_eq!(buf[(61, 7)].symbol(), "┏");
    let rows: Vec<String> = buffer_to_string(&buf).lines().map(str::to_string).collect();
    assert!(rows[8].contains("● Ada Lovelace"));
}
