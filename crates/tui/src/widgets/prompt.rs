//! Stage label prompt widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::help::centered_rect;
use crate::state::Prompt;

/// Width of the prompt popup.
const PROMPT_WIDTH: u16 = 40;

/// Height of the prompt popup: borders, input line and hint line.
const PROMPT_HEIGHT: u16 = 4;

/// Renders a centered single-line text prompt.
pub fn render_prompt(prompt: &Prompt, area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(PROMPT_WIDTH, PROMPT_HEIGHT, area);
    Clear.render(popup, buf);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", prompt.title()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    // Keep the end of long input visible.
    let room = usize::from(popup.width.saturating_sub(3));
    let skip = prompt.input.chars().count().saturating_sub(room);
    let visible: String = prompt.input.chars().skip(skip).collect();

    let lines = vec![
        Line::from(vec![
            Span::styled(visible, Style::default().fg(Color::White)),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
            Span::styled(" Save  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::styled(" Cancel", Style::default().fg(Color::DarkGray)),
        ]),
    ];
    Paragraph::new(lines).block(block).render(popup, buf);
}
