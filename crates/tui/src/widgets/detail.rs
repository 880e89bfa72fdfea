//! Application detail screen widget.
//!
//! Full-screen view of one application: stage, dates and contact details
//! at the top, then a scrollable body with the bio, screening results,
//! documents and media.

use hireboard_protocol::{Application, CriterionVerdict, Stage};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use super::card::{icon_glyph, rating_stars, stage_color};

/// Rows taken by the metadata block.
const METADATA_HEIGHT: u16 = 3;

/// Minimum panel width for rendering.
const MIN_PANEL_WIDTH: u16 = 20;

/// Minimum panel height for rendering.
const MIN_PANEL_HEIGHT: u16 = 10;

/// Returns the indicator symbol and color for a screening verdict.
#[must_use]
pub const fn verdict_indicator(verdict: CriterionVerdict) -> (char, Color) {
    match verdict {
        CriterionVerdict::Match => ('✓', Color::Green),
        CriterionVerdict::NoMatch => ('✗', Color::Red),
        CriterionVerdict::NoData => ('?', Color::DarkGray),
    }
}

/// What the detail screen shows next to the application itself.
#[derive(Debug, Clone, Copy)]
pub struct DetailContext<'a> {
    /// The application's stage, if it still exists.
    pub stage: Option<&'a Stage>,
    /// Whether the recruiter may rate the applicant.
    pub claimed: bool,
    /// Whether a status write is in flight.
    pub syncing: bool,
}

/// Renders the detail screen.
///
/// ```text
/// ╭ Ada Lovelace ───────────────────────────────────────────╮
/// │◉ Reviewing   Applied 2025-01-19   Viewed 2025-01-19     │
/// │ada.lovelace@example.com                                  │
/// │Rating ★★☆☆☆                                             │
/// │──────────────────────────────────────────────────────────│
/// │Systems programmer, eight years of embedded C ...         │
/// │                                                          │
/// │Screening                                                 │
/// │  ✓ rust  Two years of production Rust.                   │
/// │──────────────────────────────────────────────────────────│
/// │[Esc] Back  [↑↓] Scroll  [0-5] Rate  [o] Open document    │
/// ╰──────────────────────────────────────────────────────────╯
/// ```
pub fn render_detail_panel(
    app: &Application,
    context: DetailContext<'_>,
    scroll_offset: u16,
    area: Rect,
    buf: &mut Buffer,
) {
    if area.width < MIN_PANEL_WIDTH || area.height < MIN_PANEL_HEIGHT {
        return;
    }

    let accent = context.stage.map_or(Color::Cyan, stage_color);
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", app.applicant.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent));
    let inner = block.inner(area);
    block.render(area, buf);

    let [metadata, sep1, body, sep2, footer] = Layout::vertical([
        Constraint::Length(METADATA_HEIGHT),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    render_metadata(app, context, metadata, buf);
    render_separator(sep1, buf);
    render_body(app, scroll_offset, body, buf);
    render_separator(sep2, buf);
    render_footer(app, footer, buf);
}

fn render_metadata(app: &Application, context: DetailContext<'_>, area: Rect, buf: &mut Buffer) {
    let label_style = Style::default().fg(Color::DarkGray);
    let value_style = Style::default().fg(Color::White);

    let stage_span = match context.stage {
        Some(stage) => Span::styled(
            format!("{} {}", icon_glyph(&stage.icon), stage.label),
            Style::default().fg(stage_color(stage)).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(app.status.to_string(), Style::default().fg(Color::Red)),
    };
    let viewed = app
        .viewed_at
        .map_or_else(|| "never".to_string(), |at| at.format("%Y-%m-%d").to_string());
    let mut first = vec![
        stage_span,
        Span::styled("   Applied ", label_style),
        Span::styled(app.applied_at.format("%Y-%m-%d").to_string(), value_style),
        Span::styled("   Viewed ", label_style),
        Span::styled(viewed, value_style),
    ];
    if context.syncing {
        first.push(Span::styled("   ⟳ saving", Style::default().fg(Color::Blue)));
    }

    let mut contact = vec![Span::styled(app.applicant.email.clone(), value_style)];
    if let Some(phone) = &app.applicant.phone {
        contact.push(Span::styled("   ", label_style));
        contact.push(Span::styled(phone.clone(), value_style));
    }

    let rating = if context.claimed {
        Line::from(vec![
            Span::styled("Rating ", label_style),
            Span::styled(rating_stars(app.rating), Style::default().fg(Color::Yellow)),
        ])
    } else {
        Line::from(Span::styled(
            "Add this candidate to your list to rate them",
            label_style.add_modifier(Modifier::ITALIC),
        ))
    };

    Paragraph::new(vec![Line::from(first), Line::from(contact), rating]).render(area, buf);
}

fn render_separator(area: Rect, buf: &mut Buffer) {
    Paragraph::new(Line::from(Span::styled(
        "─".repeat(usize::from(area.width)),
        Style::default().fg(Color::DarkGray),
    )))
    .render(area, buf);
}

fn render_body(app: &Application, scroll_offset: u16, area: Rect, buf: &mut Buffer) {
    let lines: Vec<Line<'static>> = build_body_lines(app, area.width)
        .into_iter()
        .skip(usize::from(scroll_offset))
        .collect();
    Paragraph::new(lines).render(area, buf);
}

fn render_footer(app: &Application, area: Rect, buf: &mut Buffer) {
    let key = Style::default().fg(Color::Yellow);
    let text = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled("[Esc]", key),
        Span::styled(" Back  ", text),
        Span::styled("[↑↓]", key),
        Span::styled(" Scroll  ", text),
        Span::styled("[0-5]", key),
        Span::styled(" Rate", text),
    ];
    if !app.applicant.documents.is_empty() {
        spans.push(Span::styled("  [o]", key));
        spans.push(Span::styled(" Open document", text));
    }
    Paragraph::new(Line::from(spans)).render(area, buf);
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
}

fn placeholder(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {text}"),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))
}

/// Builds the body lines, pre-wrapped to `width` so scrolling counts
/// rows exactly.
fn build_body_lines(app: &Application, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width);
    let text_style = Style::default().fg(Color::White);
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    if app.applicant.bio.is_empty() {
        lines.push(placeholder("No bio"));
    } else {
        lines.extend(
            wrap_text(&app.applicant.bio, width)
                .into_iter()
                .map(|l| Line::from(Span::styled(l, text_style))),
        );
    }

    lines.push(Line::from(""));
    lines.push(section("Screening"));
    if app.criterion_results.is_empty() {
        lines.push(placeholder("No screening results"));
    }
    for result in &app.criterion_results {
        let (symbol, color) = verdict_indicator(result.verdict);
        lines.push(Line::from(vec![
            Span::styled(format!("  {symbol} "), Style::default().fg(color)),
            Span::styled(result.tag.clone(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ]));
        if let Some(reasoning) = &result.reasoning {
            lines.extend(
                wrap_text(reasoning, width.saturating_sub(4))
                    .into_iter()
                    .map(|l| Line::from(Span::styled(format!("    {l}"), dim))),
            );
        }
    }

    lines.push(Line::from(""));
    lines.push(section("Documents"));
    if app.applicant.documents.is_empty() {
        lines.push(placeholder("No documents"));
    }
    for doc in &app.applicant.documents {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", doc.name), text_style),
            Span::styled(format!("  {}", doc.uri), dim),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(section("Media"));
    if app.media.is_empty() {
        lines.push(placeholder("No media"));
    }
    for (label, uri) in [("Avatar", &app.media.avatar), ("Video", &app.media.video)] {
        if let Some(uri) = uri {
            lines.push(Line::from(vec![
                Span::styled(format!("  {label} "), dim),
                Span::styled(uri.clone(), text_style),
            ]));
        }
    }

    lines
}

/// Wraps text at word boundaries; words longer than `max_width` are split.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_width > 0 && current_width + 1 + word_len <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_len;
            continue;
        }
        if current_width > 0 {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if word_len > max_width {
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(max_width).peekable();
            while let Some(chunk) = chunks.next() {
                let chunk: String = chunk.iter().collect();
                if chunks.peek().is_some() {
                    lines.push(chunk);
                } else {
                    current_width = chunk.chars().count();
                    current = chunk;
                }
            }
        } else {
            current = word.to_string();
            current_width = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Maximum scroll offset for an application's body.
///
/// Keeps the last page of the body on screen.
#[must_use]
pub fn max_scroll_offset(app: &Application, visible_height: u16, panel_width: u16) -> u16 {
    let total = u16::try_from(build_body_lines(app, panel_width).len()).unwrap_or(u16::MAX);
    total.saturating_sub(visible_height)
}

/// The body's `(visible_height, width)` inside a detail panel of `area`.
///
/// Returns `None` when the panel is too small to render.
#[must_use]
pub fn body_area_dimensions(area: Rect) -> Option<(u16, u16)> {
    if area.width < MIN_PANEL_WIDTH || area.height < MIN_PANEL_HEIGHT {
        return None;
    }
    let inner_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(2);
    let body_height = inner_height.saturating_sub(METADATA_HEIGHT + 3);
    (body_height > 0).then_some((body_height, inner_width))
}
