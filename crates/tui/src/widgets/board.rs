//! Pipeline board rendering widget.
//!
//! Draws every visible stage as a column, then the dragged card on top of
//! them while a pointer drag is in progress.

use hireboard_pipeline::{PipelineBoard, Point};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Clear, Widget},
};

use super::card::{CardView, render_card, stage_color};
use super::lane::{LaneView, render_lane};
use crate::layout::{LanePosition, column_areas, rect_of};

/// Selection and drag overlay state for a board render.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoardView {
    /// Index of the focused column.
    pub selected_column: usize,
    /// Selected card within the focused column.
    pub selected_card: Option<usize>,
    /// Whether the Rejected column is shown.
    pub show_rejected: bool,
    /// Last pointer position, for drawing a dragged card.
    pub pointer: Option<Point>,
}

/// Renders the board.
///
/// # Examples
///
/// ```no_run
/// # async fn demo(board: hireboard_pipeline::PipelineBoard) {
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use hireboard_tui::widgets::{BoardView, render_board};
///
/// let area = Rect::new(0, 0, 100, 20);
/// let mut buf = Buffer::empty(area);
/// render_board(&board, &BoardView::default(), area, &mut buf);
/// # }
/// ```
pub fn render_board(board: &PipelineBoard, view: &BoardView, area: Rect, buf: &mut Buffer) {
    let partition = board.partition(view.show_rejected);
    let columns = partition.columns();
    let session = board.drag().session();

    let areas = column_areas(area, columns.len());
    for (i, (column, column_area)) in columns.iter().zip(areas).enumerate() {
        let focused = i == view.selected_column;
        let lane_view = LaneView {
            position: LanePosition::of(i, columns.len()),
            focused,
            prev_focused: i > 0 && i - 1 == view.selected_column,
            hovered: session.is_some_and(|s| s.hovered_stage.as_ref() == Some(&column.stage.key)),
            selected: if focused { view.selected_card } else { None },
            dragging: session.map(|s| s.active),
            insert_before: session.and_then(|s| s.hovered.as_ref()).and_then(|t| t.before()),
        };
        render_lane(column, board, lane_view, column_area, buf);
    }

    render_drag_ghost(board, view.pointer, area, buf);
}

/// Draws the card being dragged under the pointer.
///
/// Keyboard drags have no ghost; their target column is highlighted
/// instead.
fn render_drag_ghost(board: &PipelineBoard, pointer: Option<Point>, area: Rect, buf: &mut Buffer) {
    let Some(session) = board.drag().session() else {
        return;
    };
    let Some(pointer) = pointer else {
        return;
    };
    if session.is_keyboard() {
        return;
    }
    let Some(app) = board.store().get(session.active) else {
        return;
    };

    let ghost = rect_of(session.dragged_bounds(pointer), area);
    if ghost.is_empty() {
        return;
    }
    let color = board
        .registry()
        .get(&app.status)
        .map_or(ratatui::style::Color::DarkGray, stage_color);
    let view = CardView {
        selected: true,
        claimed: board.is_claimed(app.id),
        syncing: board.store().is_syncing(app.id),
        placeholder: false,
    };
    Clear.render(ghost, buf);
    render_card(app, color, view, ghost, buf);
}
