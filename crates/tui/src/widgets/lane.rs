//! Stage column rendering widget.
//!
//! A column shows its stage's icon, label and card count in the top
//! border, followed by the cards of the applications in that stage.
//! Adjacent columns share a border.

use hireboard_pipeline::{BoardColumn, PipelineBoard};
use hireboard_protocol::ApplicationId;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::card::{CardView, icon_glyph, render_card, stage_color};
use crate::layout::{LanePosition, card_areas, lane_inner};

/// Border set for the first (leftmost) column: rounded corners on the left.
const BORDER_SET_FIRST: border::Set = border::Set {
    top_left: "╭",
    top_right: "─",
    bottom_left: "╰",
    bottom_right: "─",
    vertical_left: "│",
    vertical_right: " ",
    horizontal_top: "─",
    horizontal_bottom: "─",
};

/// Border set for middle columns: T-connectors on the left.
const BORDER_SET_MIDDLE: border::Set = border::Set {
    top_left: "┬",
    top_right: "─",
    bottom_left: "┴",
    bottom_right: "─",
    vertical_left: "│",
    vertical_right: " ",
    horizontal_top: "─",
    horizontal_bottom: "─",
};

/// Border set for the last column: T-connectors on the left, rounded on the right.
const BORDER_SET_LAST: border::Set = border::Set {
    top_left: "┬",
    top_right: "╮",
    bottom_left: "┴",
    bottom_right: "╯",
    vertical_left: "│",
    vertical_right: "│",
    horizontal_top: "─",
    horizontal_bottom: "─",
};

/// How a column should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneView {
    /// Position in the horizontal layout.
    pub position: LanePosition,
    /// The column holds the keyboard selection.
    pub focused: bool,
    /// The column to the left is focused, so the shared border is highlighted.
    pub prev_focused: bool,
    /// A dragged card is over this column.
    pub hovered: bool,
    /// Selected card index, when focused.
    pub selected: Option<usize>,
    /// The card being dragged, drawn as a placeholder.
    pub dragging: Option<ApplicationId>,
    /// The card a drop would insert before.
    pub insert_before: Option<ApplicationId>,
}

impl LaneView {
    /// A plain, unfocused column at `position`.
    #[must_use]
    pub fn at(position: LanePosition) -> Self {
        Self {
            position,
            focused: false,
            prev_focused: false,
            hovered: false,
            selected: None,
            dragging: None,
            insert_before: None,
        }
    }
}

/// Renders one stage column.
///
/// ```text
/// ╭▤ Inbox (3)──────┬◉ Reviewing (2)──
/// │╭──────────────╮ │╭──────────────╮
/// ││● Ada Lovelace│ ││Grace Hopper  │
/// ││+1 -0 ?1      │ ││+1 -1 ?0 ★☆☆☆☆│
/// │╰──────────────╯ │╰──────────────╯
/// ```
pub fn render_lane(
    column: &BoardColumn<'_>,
    board: &PipelineBoard,
    view: LaneView,
    area: Rect,
    buf: &mut Buffer,
) {
    let accent = if view.hovered {
        Color::Yellow
    } else if view.focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let title_style = if view.focused || view.hovered {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let stage = column.stage;
    let title = Line::from(vec![
        Span::styled(icon_glyph(&stage.icon), Style::default().fg(stage_color(stage))),
        Span::styled(
            format!(" {} ({})", stage.label, column.applications.len()),
            title_style,
        ),
    ]);

    let (borders, border_set) = match view.position {
        LanePosition::First => (Borders::TOP | Borders::BOTTOM | Borders::LEFT, BORDER_SET_FIRST),
        LanePosition::Middle => (Borders::TOP | Borders::BOTTOM | Borders::LEFT, BORDER_SET_MIDDLE),
        LanePosition::Last => (Borders::ALL, BORDER_SET_LAST),
    };
    Block::default()
        .title(title)
        .borders(borders)
        .border_set(border_set)
        .border_style(Style::default().fg(accent))
        .render(area, buf);

    // The left edge is shared with the previous column.
    if view.prev_focused && !view.focused && !view.hovered && area.width > 0 {
        for y in area.y..area.y.saturating_add(area.height) {
            if let Some(cell) = buf.cell_mut((area.x, y)) {
                cell.set_style(Style::default().fg(Color::Cyan));
            }
        }
    }

    let inner = lane_inner(area, view.position);
    if column.applications.is_empty() {
        render_empty_placeholder(inner, buf);
        return;
    }

    let (offset, cards) = card_areas(inner, column.applications.len(), view.selected);
    for (i, (app, card_area)) in column
        .applications
        .iter()
        .skip(offset)
        .zip(cards)
        .enumerate()
    {
        let card_view = CardView {
            selected: view.focused && view.selected == Some(offset + i),
            claimed: board.is_claimed(app.id),
            syncing: board.store().is_syncing(app.id),
            placeholder: view.dragging == Some(app.id),
        };
        render_card(app, stage_color(stage), card_view, card_area, buf);

        if view.insert_before == Some(app.id) {
            mark_insertion(card_area, buf);
        }
    }
}

/// Highlights the top edge of the card a drop would insert before.
fn mark_insertion(card: Rect, buf: &mut Buffer) {
    for x in card.x..card.x.saturating_add(card.width) {
        if let Some(cell) = buf.cell_mut((x, card.y)) {
            cell.set_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        }
    }
}

/// Renders a placeholder message for empty columns.
fn render_empty_placeholder(area: Rect, buf: &mut Buffer) {
    Paragraph::new(Line::from(Span::styled(
        "No candidates",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )))
    .render(area, buf);
}
