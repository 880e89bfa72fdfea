//! Status line rendering widget.
//!
//! Shows the most recent notice, or the main key hints when there is none.

use hireboard_pipeline::{Notice, NoticeLevel};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Returns the color used for a notice level.
#[must_use]
pub const fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => Color::Cyan,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    }
}

fn hints() -> Line<'static> {
    let key_style = Style::default().fg(Color::Yellow);
    let text_style = Style::default().fg(Color::DarkGray);
    Line::from(vec![
        Span::styled("?", key_style),
        Span::styled(" help  ", text_style),
        Span::styled("m", key_style),
        Span::styled(" move  ", text_style),
        Span::styled("0-5", key_style),
        Span::styled(" rate  ", text_style),
        Span::styled("z", key_style),
        Span::styled(" rejected  ", text_style),
        Span::styled("n", key_style),
        Span::styled(" new stage", text_style),
    ])
}

/// Renders the status line.
///
/// `syncing` is the number of persistence calls still in flight.
pub fn render_notice(notice: Option<&Notice>, syncing: usize, area: Rect, buf: &mut Buffer) {
    let mut line = match notice {
        Some(notice) => {
            let color = notice_color(notice.level);
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", notice.raised_at.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    notice.message.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled("  (Esc to dismiss)", Style::default().fg(Color::DarkGray)),
            ])
        }
        None => hints(),
    };
    if syncing > 0 {
        line.spans.insert(
            0,
            Span::styled(format!("⟳ {syncing}  "), Style::default().fg(Color::Blue)),
        );
    }
    Paragraph::new(line).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn hints_without_notice() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        render_notice(None, 0, area, &mut buf);

        insta::assert_snapshot!(buffer_to_string(&buf), @"? help  m move  0-5 rate  z rejected  n new stage");
    }

    #[test]
    fn latest_notice_is_shown_in_its_color() {
        let notice = Notice::new(NoticeLevel::Error, "Could not move Ada to Hired");
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        render_notice(Some(&notice), 2, area, &mut buf);

        let content = buffer_to_string(&buf);
        assert!(content.starts_with("⟳ 2  ["));
        assert!(content.contains("Could not move Ada to Hired"));
        let x = (0..area.width)
            .find(|&x| buf[(x, 0)].symbol() == "C")
            .unwrap();
        assert_eq!(buf[(x, 0)].fg, Color::Red);
    }
}
