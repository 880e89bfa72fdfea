//! Centralized layout measurements for the TUI.
//!
//! Rendering and pointer hit-testing both derive their geometry from the
//! functions here, so a card is hit exactly where it is drawn.

use hireboard_pipeline::{BoardLayout, BoardPartition, Bounds, ColumnRegion, Point};
use ratatui::layout::{Constraint, Layout, Rect};

/// Height of the header bar in rows.
pub const HEADER_HEIGHT: u16 = 3;

/// Height of the notice line below the board.
pub const NOTICE_HEIGHT: u16 = 1;

/// Height of each application card in rows.
///
/// Two border rows plus the name line and the summary line.
pub const CARD_HEIGHT: u16 = 4;

/// Minimum terminal height for useful rendering.
pub const MIN_HEIGHT: u16 = 10;

/// Below this height the header is hidden to reclaim space.
pub const MIN_HEIGHT_WITH_HEADER: u16 = MIN_HEIGHT + HEADER_HEIGHT;

/// Minimum terminal width for useful rendering.
pub const MIN_WIDTH: u16 = 40;

/// Position of a column in the horizontal layout.
///
/// Adjacent columns share a border: every column draws its left edge and
/// only the last one draws its right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanePosition {
    /// Leftmost column.
    First,
    /// Any column between the first and the last.
    Middle,
    /// Rightmost column. Also used when there is a single column.
    Last,
}

impl LanePosition {
    /// Returns the position of column `index` out of `count`.
    #[must_use]
    pub fn of(index: usize, count: usize) -> Self {
        if index + 1 >= count {
            Self::Last
        } else if index == 0 {
            Self::First
        } else {
            Self::Middle
        }
    }
}

/// Splits the board area into `count` equal columns.
#[must_use]
pub fn column_areas(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let ratio = u32::try_from(count).unwrap_or(u32::MAX);
    Layout::horizontal(std::iter::repeat_n(Constraint::Ratio(1, ratio), count))
        .split(area)
        .to_vec()
}

/// Returns the area inside a column's borders.
#[must_use]
pub fn lane_inner(area: Rect, position: LanePosition) -> Rect {
    let right = u16::from(position == LanePosition::Last);
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(1 + right),
        height: area.height.saturating_sub(2),
    }
}

/// Number of whole cards that fit in a column's inner area.
#[must_use]
pub fn cards_fitting(inner: Rect) -> usize {
    usize::from(inner.height / CARD_HEIGHT)
}

/// First card to draw so that the selected card stays visible.
#[must_use]
pub fn scroll_offset(selected: Option<usize>, total: usize, visible: usize) -> usize {
    let Some(selected) = selected else {
        return 0;
    };
    if total <= visible {
        return 0;
    }
    let max_offset = total - visible;
    selected.saturating_sub(visible / 2).min(max_offset)
}

/// Card rectangles for the visible window of a column.
///
/// Returns the index of the first visible card and one rectangle per
/// card drawn, stacked from the top of `inner`.
#[must_use]
pub fn card_areas(inner: Rect, total: usize, selected: Option<usize>) -> (usize, Vec<Rect>) {
    let fitting = cards_fitting(inner);
    let offset = scroll_offset(selected, total, fitting);
    let areas = (0..total.saturating_sub(offset).min(fitting))
        .map(|i| {
            // i < fitting <= u16::MAX / CARD_HEIGHT
            let row = u16::try_from(i).unwrap_or(0) * CARD_HEIGHT;
            Rect {
                x: inner.x,
                y: inner.y + row,
                width: inner.width,
                height: CARD_HEIGHT,
            }
        })
        .collect();
    (offset, areas)
}

/// Converts a cell rectangle to pipeline bounds.
#[must_use]
pub fn bounds_of(rect: Rect) -> Bounds {
    Bounds::new(
        f64::from(rect.x),
        f64::from(rect.y),
        f64::from(rect.width),
        f64::from(rect.height),
    )
}

/// Converts a terminal cell position to a pipeline point.
#[must_use]
pub fn point_at(column: u16, row: u16) -> Point {
    Point::new(f64::from(column), f64::from(row))
}

/// Converts pipeline bounds back to a cell rectangle clipped to `area`.
#[must_use]
pub fn rect_of(bounds: Bounds, area: Rect) -> Rect {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let to_cell = |v: f64| v.round().clamp(0.0, f64::from(u16::MAX)) as u16;
    Rect {
        x: to_cell(bounds.x),
        y: to_cell(bounds.y),
        width: to_cell(bounds.width),
        height: to_cell(bounds.height),
    }
    .intersection(area)
}

/// Builds the hit-testing layout for a rendered board.
///
/// Mirrors [`render_board`](crate::widgets::render_board): one region per
/// column, with a card region for every card that was drawn. `selection`
/// is the selected `(column, card)`, which decides the scroll window of
/// its column.
#[must_use]
pub fn board_layout(
    partition: &BoardPartition<'_>,
    area: Rect,
    selection: (usize, Option<usize>),
) -> BoardLayout {
    let columns = partition.columns();
    let areas = column_areas(area, columns.len());
    let regions = columns
        .iter()
        .zip(areas)
        .enumerate()
        .map(|(i, (column, column_area))| {
            let inner = lane_inner(column_area, LanePosition::of(i, columns.len()));
            let selected = if i == selection.0 { selection.1 } else { None };
            let (offset, cards) = card_areas(inner, column.applications.len(), selected);
            column
                .applications
                .iter()
                .skip(offset)
                .zip(cards)
                .fold(
                    ColumnRegion::new(column.stage.key.clone(), bounds_of(column_area)),
                    |region, (app, card)| region.with_card(app.id, bounds_of(card)),
                )
        })
        .collect();
    BoardLayout::new(regions)
}
