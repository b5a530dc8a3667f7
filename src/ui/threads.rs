use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use super::pane::Pane;
use crate::config::ThemeConfig;
use crate::mail::selection::Selection;
use crate::mail::Thread;

pub struct ThreadList<'a> {
    pub threads: &'a [&'a Thread],
    pub selection: &'a Selection,
    pub title: String,
    pub focused: bool,
    pub now: DateTime<Utc>,
    /// Shown instead of an empty list
    pub empty_message: &'a str,
}

pub fn render_threads(
    f: &mut Frame,
    area: Rect,
    list: ThreadList<'_>,
    state: &mut ListState,
    theme: &ThemeConfig,
) {
    let block = Pane::new(list.title, list.focused, theme).block();

    if list.threads.is_empty() {
        let hint = Line::styled(list.empty_message, Style::default().fg(theme.fg_muted()));
        f.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }

    // Available width: area minus borders (2) minus highlight symbol (2)
    let avail_width = area.width.saturating_sub(4) as usize;

    // marks (4) + date (7) + spacing
    let date_width = 7;
    let from_width = 18.min(avail_width.saturating_sub(date_width + 6) / 3);
    let subject_width = avail_width.saturating_sub(date_width + from_width + 6);

    let items: Vec<ListItem> = list
        .threads
        .iter()
        .map(|t| {
            let picked = if list.selection.contains(&t.id) { "■" } else { " " };
            let unread = if t.is_read { " " } else { "*" };
            let star = if t.is_starred { "★" } else { " " };
            let base = if t.is_read {
                Style::default().fg(theme.fg_subtle())
            } else {
                Style::default().fg(theme.fg()).add_modifier(Modifier::BOLD)
            };

            ListItem::new(Line::from(vec![
                Span::styled(picked, Style::default().fg(theme.secondary())),
                Span::styled(unread, Style::default().fg(theme.unread())),
                Span::styled(star, Style::default().fg(theme.starred())),
                Span::raw(" "),
                Span::styled(
                    format!("{:dw$}", format_date(t.timestamp, list.now), dw = date_width),
                    Style::default().fg(theme.fg_muted()),
                ),
                Span::raw(" "),
                Span::styled(truncate(&t.from_display(), from_width), base),
                Span::raw(" "),
                Span::styled(truncate(&t.subject, subject_width), base),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(theme.selected_bg())
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, state);
}

/// Pad or cut `s` to exactly `max` columns
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max < 4 {
        return s.chars().take(max).collect();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        format!("{:width$}", s, width = max)
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}

/// "14:05" for today, "Mar 02" otherwise
pub(crate) fn format_date(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if at.date_naive() == now.date_naive() {
        at.format("%H:%M").to_string()
    } else {
        at.format("%b %d").to_string()
    }
}
