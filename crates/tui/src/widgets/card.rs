//! Application card rendering widget.
//!
//! A card shows the applicant's name and a one-line summary inside a box
//! whose border takes the color of the card's stage.

use hireboard_protocol::{Application, MAX_RATING, Stage, color_rgb};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

/// Marker prefixed to applications nobody has opened yet.
const UNVIEWED_MARKER: &str = "● ";

/// Marker shown while a status write is unresolved.
const SYNCING_MARKER: &str = "⟳";

/// Returns the terminal color of a stage.
///
/// Falls back to gray for colors that do not parse.
///
/// # Examples
///
/// ```
/// use hireboard_protocol::BuiltinStage;
/// use hireboard_tui::widgets::stage_color;
/// use ratatui::style::Color;
///
/// assert_eq!(stage_color(&BuiltinStage::Hired.stage()), Color::Rgb(0x16, 0xA3, 0x4A));
/// ```
#[must_use]
pub fn stage_color(stage: &Stage) -> Color {
    color_rgb(&stage.color).map_or(Color::DarkGray, |(r, g, b)| Color::Rgb(r, g, b))
}

/// Returns the glyph drawn for a stage icon name.
#[must_use]
pub fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "inbox" => "▤",
        "eye" => "◉",
        "users" => "☺",
        "gift" => "◆",
        "check" => "✓",
        "x" => "✗",
        "star" => "★",
        "flag" => "⚑",
        "phone" => "☎",
        "clipboard" => "▣",
        _ => "•",
    }
}

/// Renders `rating` as filled and empty stars.
#[must_use]
pub fn rating_stars(rating: u8) -> String {
    let filled = rating.min(MAX_RATING);
    (0..MAX_RATING)
        .map(|i| if i < filled { '★' } else { '☆' })
        .collect()
}

/// How a card should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardView {
    /// The card is the keyboard selection.
    pub selected: bool,
    /// The recruiter has claimed the applicant, so the rating is shown.
    pub claimed: bool,
    /// A status write for the card is in flight.
    pub syncing: bool,
    /// The card is being dragged; this is its placeholder.
    pub placeholder: bool,
}

/// Truncates a string to fit within the given width, adding "..." if truncated.
fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        ".".repeat(max_width)
    } else {
        let truncated: String = s.chars().take(max_width - 3).collect();
        format!("{truncated}...")
    }
}

/// The summary line: criterion tally, rating and sync marker.
fn summary_line(app: &Application, view: CardView) -> String {
    let (matches, misses, unknown) = app.criterion_tally();
    let mut summary = format!("+{matches} -{misses} ?{unknown}");
    if view.claimed {
        summary.push(' ');
        summary.push_str(&rating_stars(app.rating));
    }
    if view.syncing {
        summary.push(' ');
        summary.push_str(SYNCING_MARKER);
    }
    summary
}

/// Renders an application card.
///
/// Areas smaller than a bordered two-line box are skipped.
///
/// ```text
/// ╭───────────────╮
/// │● Ada Lovelace │
/// │+1 -0 ?1 ★★☆☆☆ │
/// ╰───────────────╯
/// ```
pub fn render_card(app: &Application, stage_color: Color, view: CardView, area: Rect, buf: &mut Buffer) {
    if area.width < 4 || area.height < 3 {
        return;
    }

    let (border_style, name_style, summary_style) = if view.placeholder {
        let dim = Style::default().fg(Color::DarkGray);
        (dim.add_modifier(Modifier::DIM), dim, dim)
    } else if view.selected {
        (
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Gray),
        )
    } else {
        (
            Style::default().fg(stage_color),
            Style::default().fg(Color::White),
            Style::default().fg(Color::DarkGray),
        )
    };

    let inner_width = usize::from(area.width.saturating_sub(2));
    let mut name_spans = Vec::with_capacity(2);
    let mut name_width = inner_width;
    if !app.is_viewed() {
        name_spans.push(Span::styled(UNVIEWED_MARKER, Style::default().fg(Color::Cyan)));
        name_width = name_width.saturating_sub(UNVIEWED_MARKER.chars().count());
    }
    name_spans.push(Span::styled(
        truncate_string(&app.applicant.name, name_width),
        name_style,
    ));

    let content = vec![
        Line::from(name_spans),
        Line::from(Span::styled(
            truncate_string(&summary_line(app, view), inner_width),
            summary_style,
        )),
    ];

    let border_type = if view.selected {
        BorderType::Thick
    } else {
        BorderType::Rounded
    };
    Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(border_type)
                .border_style(border_style),
        )
        .render(area, buf);
}
