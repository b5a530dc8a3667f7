use chrono::{DateTime, Utc};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::pane::Modal;
use crate::config::ThemeConfig;
use crate::mail::snooze::SnoozePreset;

pub fn render_snooze_picker(f: &mut Frame, choice: usize, now: DateTime<Utc>, theme: &ThemeConfig) {
    let inner = Modal::new(" Snooze until ", theme).open(f, 40, 5);

    let lines: Vec<Line> = SnoozePreset::ALL
        .iter()
        .enumerate()
        .map(|(i, preset)| {
            let style = if i == choice {
                Style::default().fg(theme.primary()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg())
            };
            Line::from(vec![
                Span::styled(if i == choice { "> " } else { "  " }, style),
                Span::styled(format!("{:<12}", preset.label()), style),
                Span::styled(
                    preset.until(now).format("%a %b %-d, %H:%M").to_string(),
                    Style::default().fg(theme.fg_muted()),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}
