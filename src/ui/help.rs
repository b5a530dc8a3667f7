use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{Focus, Mode};
use crate::config::ThemeConfig;

/// Pending undo shown at the left of the bar
pub struct UndoNotice<'a> {
    pub message: &'a str,
    pub seconds_left: i64,
}

pub struct HelpBar<'a> {
    pub mode: Mode,
    pub focus: Focus,
    pub status: Option<&'a str>,
    pub query: &'a str,
    pub selected: usize,
    pub undo: Option<UndoNotice<'a>>,
}

fn keys<'a>(pairs: &[(&'a str, &'a str)], theme: &ThemeConfig) -> Vec<Span<'a>> {
    let key_style = Style::default().fg(theme.primary());
    let text_style = Style::default().fg(theme.fg_subtle());
    pairs
        .iter()
        .flat_map(|(key, what)| {
            [
                Span::styled(*key, key_style),
                Span::styled(format!(" {}  ", what), text_style),
            ]
        })
        .collect()
}

pub fn render_help(f: &mut Frame, area: Rect, bar: HelpBar<'_>, theme: &ThemeConfig) {
    let mut spans = Vec::new();

    if let Some(undo) = &bar.undo {
        spans.push(Span::styled(
            format!(" {} ", undo.message),
            Style::default().fg(theme.bg()).bg(theme.primary()),
        ));
        spans.push(Span::styled(
            format!(" z undo ({}s) ", undo.seconds_left),
            Style::default().fg(theme.primary()).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    let help_text = match bar.mode {
        Mode::Search => vec![
            Span::styled("/", Style::default().fg(theme.primary())),
            Span::raw(" "),
            Span::styled(bar.query.to_string(), Style::default().fg(theme.fg())),
            Span::styled("_", Style::default().fg(theme.primary())),
            Span::raw("  "),
        ]
        .into_iter()
        .chain(keys(&[("Enter", "keep"), ("Esc", "clear")], theme))
        .collect(),
        Mode::Filters => keys(
            &[("Tab", "field"), ("Space", "cycle"), ("x", "clear"), ("Esc", "done")],
            theme,
        ),
        Mode::Snooze => keys(&[("j/k", "choose"), ("Enter", "snooze"), ("Esc", "cancel")], theme),
        Mode::Onboarding => keys(&[("Enter", "get started")], theme),
        Mode::List if bar.selected > 0 => {
            let mut spans = vec![Span::styled(
                format!("{} selected  ", bar.selected),
                Style::default().fg(theme.secondary()),
            )];
            spans.extend(keys(
                &[("R", "read"), ("E", "archive"), ("D", "delete"), ("Esc", "clear")],
                theme,
            ));
            spans
        }
        Mode::List => match bar.focus {
            Focus::Reader => keys(
                &[
                    ("j/k", "scroll"),
                    ("r/a/f", "reply/all/fwd"),
                    ("[/]", "quote"),
                    ("S", "summarize"),
                    ("e", "archive"),
                    ("#", "delete"),
                    ("!", "junk"),
                    ("b", "snooze"),
                    ("Esc", "back"),
                ],
                theme,
            ),
            _ => keys(
                &[
                    ("j/k", "nav"),
                    ("Enter", "open"),
                    ("x", "select"),
                    ("e", "archive"),
                    ("#", "delete"),
                    ("!", "junk"),
                    ("s", "star"),
                    ("u", "read"),
                    ("b", "snooze"),
                    ("U", "unread only"),
                    ("/", "search"),
                    ("F", "filters"),
                    ("t", "theme"),
                    ("q", "quit"),
                ],
                theme,
            ),
        },
    };
    spans.extend(help_text);

    if let Some(msg) = bar.status {
        spans.push(Span::styled("│ ", Style::default().fg(theme.border())));
        spans.push(Span::styled(msg, Style::default().fg(theme.success())));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg_panel()));

    f.render_widget(paragraph, area);
}
