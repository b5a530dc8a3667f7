use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::pane::Pane;
use crate::config::ThemeConfig;
use crate::mail::reply::body_to_text;
use crate::mail::Thread;
use crate::summary::{SummaryState, SummaryStatus};

/// Split a line into plain and underlined URL spans
fn style_urls(line_str: &str, base: Style, url_style: Style) -> Line<'static> {
    let mut spans = Vec::new();
    let mut last_end = 0;
    let mut search_start = 0;

    while let Some(start) = line_str[search_start..]
        .find("http://")
        .or_else(|| line_str[search_start..].find("https://"))
    {
        let abs_start = search_start + start;
        let url_end = line_str[abs_start..]
            .find(|c: char| c.is_whitespace() || c == '>' || c == ')' || c == ']' || c == '"')
            .map(|i| abs_start + i)
            .unwrap_or(line_str.len());

        if abs_start > last_end {
            spans.push(Span::styled(line_str[last_end..abs_start].to_string(), base));
        }
        spans.push(Span::styled(line_str[abs_start..url_end].to_string(), url_style));

        last_end = url_end;
        search_start = url_end;
    }

    if last_end < line_str.len() || spans.is_empty() {
        spans.push(Span::styled(line_str[last_end..].to_string(), base));
    }

    Line::from(spans)
}

fn summary_lines(summary: &SummaryState, theme: &ThemeConfig) -> Vec<Line<'static>> {
    let heading = Line::styled(
        "Summary",
        Style::default().fg(theme.secondary()).add_modifier(Modifier::BOLD),
    );
    let mut lines = vec![heading];
    match &summary.status {
        SummaryStatus::Loading => {
            lines.push(Line::styled("Summarizing…", Style::default().fg(theme.fg_muted())));
        }
        SummaryStatus::Ready(text) => {
            lines.extend(text.lines().map(|l| Line::raw(l.to_string())));
        }
        SummaryStatus::Failed(message) => {
            lines.push(Line::styled(message.clone(), Style::default().fg(theme.error())));
        }
    }
    lines.push(Line::raw(""));
    lines
}

/// Header, optional summary, then every message oldest first.
/// The message at `quoted` is marked as the one a reply will quote.
pub fn thread_lines(
    thread: &Thread,
    summary: Option<&SummaryState>,
    quoted: Option<usize>,
    theme: &ThemeConfig,
) -> Vec<Line<'static>> {
    let muted = Style::default().fg(theme.fg_muted());
    let url_style = Style::default()
        .fg(theme.secondary())
        .add_modifier(Modifier::UNDERLINED);

    let mut lines = vec![Line::styled(
        thread.subject.clone(),
        Style::default().fg(theme.primary()).add_modifier(Modifier::BOLD),
    )];
    let names: Vec<&str> = thread.participants.iter().map(|p| p.name.as_str()).collect();
    lines.push(Line::styled(names.join(", "), muted));
    lines.push(Line::raw(""));

    if let Some(summary) = summary.filter(|s| s.thread_id == thread.id) {
        lines.extend(summary_lines(summary, theme));
    }

    for (i, message) in thread.messages.iter().enumerate() {
        let marker = if quoted == Some(i) { "▸ " } else { "" };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.primary())),
            Span::styled(
                message.sender.name.clone(),
                Style::default().fg(theme.fg()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" <{}>", message.sender.email), muted),
            Span::styled(format!("  {}", message.timestamp.format("%b %-d, %H:%M")), muted),
        ]));
        for line in body_to_text(&message.body).lines() {
            lines.push(style_urls(line, Style::default().fg(theme.fg()), url_style));
        }
        lines.push(Line::raw(""));
    }

    lines
}

pub fn render_reader(
    f: &mut Frame,
    area: Rect,
    thread: Option<&Thread>,
    summary: Option<&SummaryState>,
    quoted: Option<usize>,
    scroll: u16,
    focused: bool,
    theme: &ThemeConfig,
) {
    let (title, lines) = match thread {
        Some(t) => ("Thread", thread_lines(t, summary, quoted, theme)),
        None => (
            "Reader",
            vec![Line::styled(
                "Select a thread and press Enter to read it.",
                Style::default().fg(theme.fg_muted()),
            )],
        ),
    };

    let paragraph = Paragraph::new(lines)
        .block(Pane::new(title, focused, theme).block())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    f.render_widget(paragraph, area);
}
