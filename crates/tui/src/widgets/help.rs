//! Help overlay widget.
//!
//! Lists every key binding, grouped by what it acts on.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

/// The width of the help overlay panel.
const HELP_WIDTH: u16 = 44;

/// Key bindings by section.
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Board",
        &[
            ("← →", "Select stage"),
            ("↑ ↓", "Select candidate"),
            ("Enter", "Open candidate"),
            ("Esc", "Close / cancel / dismiss"),
            ("z", "Show or hide Rejected"),
        ],
    ),
    (
        "Candidate",
        &[
            ("m", "Pick up, then arrows + Enter"),
            ("drag", "Move with the mouse"),
            ("0-5", "Rate (claimed only)"),
            ("o", "Open first document"),
        ],
    ),
    (
        "Stages",
        &[
            ("n", "New stage"),
            ("e", "Rename stage"),
            ("c / i", "Cycle color / icon"),
            ("< >", "Move stage left / right"),
            ("x", "Delete custom stage"),
        ],
    ),
    ("General", &[("?", "Toggle help"), ("Ctrl+C", "Quit")]),
];

/// Renders a centered help overlay displaying all keybindings.
///
/// # Examples
///
/// ```
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use hireboard_tui::widgets::render_help_overlay;
///
/// let area = Rect::new(0, 0, 80, 30);
/// let mut buf = Buffer::empty(area);
///
/// render_help_overlay(area, &mut buf);
/// ```
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let lines = build_help_lines();
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup_area = centered_rect(HELP_WIDTH, height, area);

    Clear.render(popup_area, buf);

    let help_block = Block::default()
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::LightYellow));

    Paragraph::new(lines)
        .block(help_block)
        .alignment(Alignment::Left)
        .render(popup_area, buf);
}

/// Builds the lines of help content.
fn build_help_lines() -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Green);
    let text_style = Style::default().fg(Color::White);
    let hint_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);

    let mut lines = Vec::new();
    for (title, bindings) in SECTIONS {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {title}"), header_style)));
        for (key, text) in *bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<9}"), key_style),
                Span::styled(*text, text_style),
            ]));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Press any key to close", hint_style)));
    lines
}

/// Creates a centered rectangle within a given area, clamped to fit.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let popup_width = width.min(area.width);
    let popup_height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;

    Rect::new(x, y, popup_width, popup_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn centered_rect_positions_correctly() {
        let area = Rect::new(0, 0, 80, 24);
        let centered = centered_rect(20, 10, area);

        assert_eq!(centered, Rect::new(30, 7, 20, 10));
    }

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 12);
        let centered = centered_rect(100, 50, area);

        assert_eq!(centered, Rect::new(0, 0, 40, 12));
    }

    #[test]
    fn render_help_overlay_creates_output() {
        let area = Rect::new(0, 0, 80, 40);
        let mut buf = Buffer::empty(area);

        render_help_overlay(area, &mut buf);

        let content = buffer_to_string(&buf);
        assert!(content.contains("Help"));
        assert!(content.contains("Board"));
        assert!(content.contains("Stages"));
        assert!(content.contains("Rate (claimed only)"));
    }

    #[test]
    fn render_help_overlay_handles_small_area() {
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);

        render_help_overlay(area, &mut buf);
    }

    #[test]
    fn every_binding_is_listed() {
        let content: String = build_help_lines()
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");

        for key in ["← →", "↑ ↓", "Enter", "Esc", "m", "0-5", "o", "z", "n", "e", "x", "Ctrl+C"] {
            assert!(content.contains(&format!("  {key}")), "missing {key}");
        }
    }
}
