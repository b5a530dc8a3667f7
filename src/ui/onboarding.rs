use ratatui::{
    style::{Modifier, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::pane::Modal;
use crate::config::ThemeConfig;

const WELCOME: &[&str] = &[
    "Both of your mailboxes live here, Hogwarts and Liverpool.",
    "",
    "Pick a folder on the left, open a thread with Enter and",
    "archive it with e. Changed your mind? Press z within a few",
    "seconds to undo.",
    "",
    "Press / to search everything, F for filters, t to switch theme.",
];

pub fn render_onboarding(f: &mut Frame, theme: &ThemeConfig) {
    let inner = Modal::new(" Welcome to owlpost ", theme).open(f, 66, 12);

    let mut lines: Vec<Line> = WELCOME
        .iter()
        .map(|l| Line::styled(*l, Style::default().fg(theme.fg())))
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Press Enter to get started",
        Style::default().fg(theme.primary()).add_modifier(Modifier::BOLD),
    ));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
