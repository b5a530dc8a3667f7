use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::pane::Modal;
use crate::app::FilterField;
use crate::config::ThemeConfig;
use crate::mail::SearchFilters;

pub fn render_filters(
    f: &mut Frame,
    filters: &SearchFilters,
    field: FilterField,
    matches: usize,
    theme: &ThemeConfig,
) {
    let inner = Modal::new(" Filters ", theme).open(f, 48, 9);

    let mut lines: Vec<Line> = FilterField::ALL
        .iter()
        .map(|&row| {
            let value = match row {
                FilterField::Sender if filters.sender.is_empty() && row != field => {
                    "anyone".to_string()
                }
                FilterField::Sender => filters.sender.clone(),
                FilterField::DateRange => filters.date_range.label().to_string(),
                FilterField::Status => filters.status.label().to_string(),
            };
            let (marker, style) = if row == field {
                ("> ", Style::default().fg(theme.primary()).add_modifier(Modifier::BOLD))
            } else {
                ("  ", Style::default().fg(theme.fg()))
            };
            let cursor = if row == field && row == FilterField::Sender { "_" } else { "" };
            Line::from(vec![
                Span::styled(marker, style),
                Span::styled(format!("{:<8}", row.label()), Style::default().fg(theme.fg_muted())),
                Span::styled(format!("{}{}", value, cursor), style),
            ])
        })
        .collect();

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        format!("{} matching thread(s) across all folders", matches),
        Style::default().fg(theme.fg_muted()),
    ));

    f.render_widget(Paragraph::new(lines), inner);
}
