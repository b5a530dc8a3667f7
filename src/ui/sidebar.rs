use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};

use super::pane::Pane;
use super::threads::truncate;
use crate::config::ThemeConfig;

pub struct SidebarRow {
    pub label: String,
    /// Unread or snoozed count shown at the right edge
    pub badge: Option<usize>,
    pub active: bool,
}

pub fn render_sidebar(
    f: &mut Frame,
    area: Rect,
    rows: &[SidebarRow],
    title: &str,
    state: &mut ListState,
    focused: bool,
    dragging: bool,
    theme: &ThemeConfig,
) {
    // borders (2) + highlight symbol (2) + badge column (4)
    let label_width = area.width.saturating_sub(8) as usize;

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let style = if row.active {
                Style::default().fg(theme.primary()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg())
            };
            let badge = match row.badge {
                Some(n) if n > 0 => format!("{:>4}", n),
                _ => "    ".to_string(),
            };
            ListItem::new(Line::from(vec![
                Span::styled(truncate(&row.label, label_width), style),
                Span::styled(badge, Style::default().fg(theme.unread())),
            ]))
        })
        .collect();

    // The border lights up while it is being dragged
    let block = Pane::new(title, focused || dragging, theme).block();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.selected_bg()))
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, state);
}
