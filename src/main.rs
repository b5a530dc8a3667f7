use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use owlpost::app::{sidebar_entries, App, FilterField, Focus, Mode};
use owlpost::config::Config;
use owlpost::mail::reply::{Draft, ReplyKind};
use owlpost::mail::seed::{default_threads, load_seed};
use owlpost::mail::{derive, Clock, Identities, SystemClock, Thread, View};
use owlpost::prefs::PrefStore;
use owlpost::summary::{CommandSummarizer, DigestSummarizer, Summarizer};
use owlpost::ui::{
    render_filters, render_help, render_onboarding, render_reader, render_sidebar,
    render_snooze_picker, render_threads, HelpBar, SidebarRow, ThreadList, UndoNotice,
};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

fn main() -> Result<()> {
    let log_path = init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), log = ?log_path, "starting owlpost");

    let config = Arc::new(Config::load());
    let clock = SystemClock;
    let threads = load_threads(&config, &config.identities(), clock.now());

    let summarizer: Arc<dyn Summarizer> = match &config.summary.command {
        Some(cmd) => Arc::new(CommandSummarizer::new(cmd.clone())),
        None => Arc::new(DigestSummarizer),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let width = terminal.size()?.width;

    let mut app = App::new(
        config,
        threads,
        Box::new(clock),
        summarizer,
        PrefStore::default_location(),
        width,
    );

    let result = run(&mut app, &mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!(error = %e, "exiting after error");
    }
    result
}

/// Log to a file; the terminal belongs to the UI
fn init_logging() -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("owlpost=info"));

    let path = dirs::cache_dir()?.join("owlpost").join("owlpost.log");
    std::fs::create_dir_all(path.parent()?).ok()?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Some(path)
}

/// Seed file from config, else the bundled mailbox
fn load_threads(
    config: &Config,
    identities: &Identities,
    now: chrono::DateTime<chrono::Utc>,
) -> Vec<Thread> {
    if let Some(path) = config.seed_path() {
        match std::fs::read_to_string(&path) {
            Ok(json) => match load_seed(&json, identities, now) {
                Ok(threads) => {
                    info!(path = %path.display(), count = threads.len(), "loaded seed file");
                    return threads;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "bad seed file, using bundled mailbox"),
            },
            Err(e) => warn!(path = %path.display(), error = %e, "cannot read seed file, using bundled mailbox"),
        }
    }
    default_threads(identities, now).unwrap_or_else(|e| {
        warn!(error = %e, "bundled mailbox failed to load");
        Vec::new()
    })
}

fn run(app: &mut App, terminal: &mut Term) -> Result<()> {
    loop {
        terminal.draw(|f| render(app, f))?;

        app.tick();

        // Poll with timeout so snooze expiry and undo countdowns redraw
        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                app.clear_status();
                handle_key(app, key, terminal)?;
            }
            Event::Mouse(mouse) => handle_mouse(app, mouse),
            Event::Resize(width, _) => app.layout.on_resize(width, Instant::now()),
            _ => {}
        }

        if app.should_quit {
            info!("quit");
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, terminal: &mut Term) -> Result<()> {
    match app.mode {
        Mode::Onboarding => match key.code {
            KeyCode::Enter | KeyCode::Esc => app.finish_onboarding(),
            KeyCode::Char('q') => app.should_quit = true,
            _ => {}
        },
        Mode::Search => match key.code {
            KeyCode::Esc => app.cancel_search(),
            KeyCode::Enter => app.finish_search(),
            KeyCode::Backspace => app.search_backspace(),
            KeyCode::Down => app.next(),
            KeyCode::Up => app.previous(),
            KeyCode::Char(c) => app.search_input(c),
            _ => {}
        },
        Mode::Filters => match key.code {
            KeyCode::Esc | KeyCode::Enter => app.close_filters(),
            KeyCode::Tab | KeyCode::Down => app.filter_next_field(),
            KeyCode::BackTab | KeyCode::Up => app.filter_previous_field(),
            KeyCode::Backspace => app.filter_backspace(),
            KeyCode::Char('x') if app.filter_field != FilterField::Sender => {
                app.clear_filters()
            }
            KeyCode::Char(c) => app.filter_input(c),
            _ => {}
        },
        Mode::Snooze => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.snooze_picker_move(true),
            KeyCode::Char('k') | KeyCode::Up => app.snooze_picker_move(false),
            KeyCode::Enter => app.confirm_snooze(),
            KeyCode::Esc => app.cancel_snooze(),
            _ => {}
        },
        Mode::List => handle_list_key(app, key, terminal)?,
    }
    Ok(())
}

fn handle_list_key(app: &mut App, key: KeyEvent, terminal: &mut Term) -> Result<()> {
    // Keys that work from every pane
    match key.code {
        KeyCode::Char('z') => {
            if !app.undo() {
                app.set_status("Nothing to undo");
            }
            return Ok(());
        }
        KeyCode::Tab => {
            app.cycle_focus();
            return Ok(());
        }
        KeyCode::Char('t') => {
            app.cycle_theme();
            return Ok(());
        }
        KeyCode::Char('/') => {
            app.start_search();
            return Ok(());
        }
        KeyCode::Char('F') => {
            app.open_filters();
            return Ok(());
        }
        KeyCode::Char('U') => {
            app.toggle_unread_only();
            return Ok(());
        }
        _ => {}
    }

    if !app.selection.is_empty() {
        match key.code {
            KeyCode::Char('R') => {
                app.bulk_mark_read();
                return Ok(());
            }
            KeyCode::Char('E') => {
                app.bulk_archive();
                return Ok(());
            }
            KeyCode::Char('D') => {
                app.bulk_delete();
                return Ok(());
            }
            KeyCode::Esc => {
                app.selection.clear();
                return Ok(());
            }
            _ => {}
        }
    }

    match app.focus {
        Focus::Sidebar => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => app.sidebar_next(),
            KeyCode::Char('k') | KeyCode::Up => app.sidebar_previous(),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                if let Some(i) = app.sidebar_state.selected() {
                    app.navigate_to_entry(i);
                    app.focus = Focus::List;
                }
            }
            _ => {}
        },
        Focus::List => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => app.next(),
            KeyCode::Char('k') | KeyCode::Up => app.previous(),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.open_selected(),
            KeyCode::Char('h') | KeyCode::Left if !app.layout.is_compact() => {
                app.focus = Focus::Sidebar
            }
            KeyCode::Char('x') => app.toggle_selected(),
            KeyCode::Esc if app.view_state.filters.query_active() => app.cancel_search(),
            KeyCode::Esc => app.dismiss_undo(),
            _ => thread_action(app, key.code),
        },
        Focus::Reader => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.reader_scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => app.reader_scroll_up(),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Left => {
                app.close_thread()
            }
            KeyCode::Char('S') => app.request_summary(),
            KeyCode::Char('[') => app.quote_previous(),
            KeyCode::Char(']') => app.quote_next(),
            KeyCode::Char('r') => compose(app, ReplyKind::Reply, terminal)?,
            KeyCode::Char('a') => compose(app, ReplyKind::ReplyAll, terminal)?,
            KeyCode::Char('f') => compose(app, ReplyKind::Forward, terminal)?,
            _ => thread_action(app, key.code),
        },
    }
    Ok(())
}

/// Single-thread actions shared by the list and the reader
fn thread_action(app: &mut App, code: KeyCode) {
    let Some(id) = app.target() else {
        return;
    };
    match code {
        KeyCode::Char('e') => {
            app.archive_thread(&id);
        }
        KeyCode::Char('#') => {
            app.delete_thread(&id);
        }
        KeyCode::Char('!') => {
            app.move_to_junk(&id);
        }
        KeyCode::Char('s') => {
            app.toggle_star(&id);
        }
        KeyCode::Char('u') => {
            app.toggle_read(&id);
        }
        KeyCode::Char('b') if app.view_state.view == View::Snoozed => {
            if app.unsnooze(&id) {
                app.set_status("Back in the inbox");
            }
        }
        KeyCode::Char('b') => app.open_snooze_picker(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.mode != Mode::List {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if !app.layout.is_compact() && app.layout.on_sidebar_edge(mouse.column) {
                app.layout.begin_drag(mouse.column);
            } else if app.handle_click(mouse.column, mouse.row) {
                app.open_selected();
            }
        }
        MouseEventKind::Drag(MouseButton::Left) if app.layout.is_dragging() => {
            app.layout.drag_to(mouse.column);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(width) = app.layout.end_drag() {
                info!(width, "sidebar resized");
            }
        }
        MouseEventKind::ScrollDown => match app.focus {
            Focus::Sidebar => app.sidebar_next(),
            Focus::List => app.next(),
            Focus::Reader => app.reader_scroll_down(),
        },
        MouseEventKind::ScrollUp => match app.focus {
            Focus::Sidebar => app.sidebar_previous(),
            Focus::List => app.previous(),
            Focus::Reader => app.reader_scroll_up(),
        },
        _ => {}
    }
}

fn render(app: &mut App, f: &mut Frame) {
    let config = app.config.clone();
    let theme = config.palette(app.resolved_theme());

    // Split into main area and help bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    let sidebar_width = if app.layout.is_compact() {
        0
    } else {
        app.layout.sidebar_width()
    };
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(sidebar_width),
            Constraint::Percentage(45),
            Constraint::Percentage(55),
        ])
        .split(chunks[0]);

    // Store pane areas for mouse handling
    app.set_pane_areas(panes[0], panes[1], panes[2]);

    if sidebar_width > 0 {
        let counts = app.unread_counts();
        let snoozed = app.snoozed_count();
        let rows: Vec<SidebarRow> = sidebar_entries()
            .iter()
            .map(|entry| SidebarRow {
                label: entry.label(),
                badge: match (&entry.view, entry.domain) {
                    (View::Inbox, Some(domain)) => Some(counts.get(domain)),
                    (View::Snoozed, _) => Some(snoozed),
                    _ => None,
                },
                active: app.is_active_entry(entry),
            })
            .collect();
        let title = format!("Mail ({})", counts.total());
        let focused = app.focus == Focus::Sidebar;
        let dragging = app.layout.is_dragging();
        render_sidebar(
            f,
            panes[0],
            &rows,
            &title,
            &mut app.sidebar_state,
            focused,
            dragging,
            theme,
        );
    }

    let now = app.now();
    let outcome = derive(app.store.all(), &app.view_state, now, &app.identities);
    let unread_suffix = if app.view_state.show_unread_only {
        " (Unread)"
    } else {
        ""
    };
    let title = if outcome.is_searching {
        format!(
            "Search: {} ({} results){}",
            app.view_state.filters.query,
            outcome.threads.len(),
            unread_suffix
        )
    } else if app.view_state.view.is_domain_scoped() {
        format!(
            "{} · {}{}",
            app.view_state.view.label(),
            app.view_state.domain.label(),
            unread_suffix
        )
    } else {
        format!("{}{}", app.view_state.view.label(), unread_suffix)
    };
    let matches = outcome.threads.len();
    render_threads(
        f,
        panes[1],
        ThreadList {
            threads: &outcome.threads,
            selection: &app.selection,
            title,
            focused: app.focus == Focus::List,
            now,
            empty_message: if outcome.is_searching {
                "No threads match."
            } else {
                "Nothing here."
            },
        },
        &mut app.list_state,
        theme,
    );

    render_reader(
        f,
        panes[2],
        app.open(),
        app.summary.as_ref(),
        app.quoted,
        app.reader_scroll,
        app.focus == Focus::Reader,
        theme,
    );

    let wall = app.wall_now();
    let undo = app.undo.pending().map(|record| UndoNotice {
        message: &record.message,
        seconds_left: app
            .undo
            .remaining(wall)
            .map_or(0, |d| (d.num_milliseconds() + 999) / 1000),
    });
    render_help(
        f,
        chunks[1],
        HelpBar {
            mode: app.mode,
            focus: app.focus,
            status: app.status_message.as_deref(),
            query: &app.view_state.filters.query,
            selected: app.selection.len(),
            undo,
        },
        theme,
    );

    match app.mode {
        Mode::Filters => render_filters(f, &app.view_state.filters, app.filter_field, matches, theme),
        Mode::Snooze => render_snooze_picker(f, app.snooze_choice, wall, theme),
        Mode::Onboarding => render_onboarding(f, theme),
        Mode::List | Mode::Search => {}
    }
}

/// Draft a reply in $EDITOR, then hand it to the app
fn compose(app: &mut App, kind: ReplyKind, terminal: &mut Term) -> Result<()> {
    let Some(draft) = app.draft(kind) else {
        return Ok(());
    };
    let from = app
        .open()
        .map(|t| app.identities.for_domain(t.account).email.clone());

    let edited = edit_message(&draft, from.as_deref());
    terminal.clear()?;
    match edited? {
        Some(draft) => app.send_draft(&draft),
        None => app.set_status("Draft discarded"),
    }
    Ok(())
}

fn edit_message(draft: &Draft, from_email: Option<&str>) -> Result<Option<Draft>> {
    use std::io::Write;

    // Create temp file with email template
    let mut temp_file = tempfile::NamedTempFile::new()?;
    if let Some(email) = from_email {
        writeln!(temp_file, "From: {}", email)?;
    }
    writeln!(temp_file, "To: {}", draft.to)?;
    writeln!(temp_file, "Subject: {}", draft.subject)?;
    writeln!(temp_file)?;
    write!(temp_file, "{}", draft.body)?;
    temp_file.flush()?;

    let path = temp_file.path().to_owned();

    // Open editor
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = Command::new(&editor).arg(&path).status();

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    if !status?.success() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    Ok(parse_draft(&content))
}

/// Read back the header block and body; a draft without a recipient is dropped
fn parse_draft(content: &str) -> Option<Draft> {
    let mut draft = Draft::default();
    let mut lines = content.lines();

    for line in lines.by_ref() {
        if line.is_empty() {
            break;
        } else if let Some(val) = line.strip_prefix("To: ") {
            draft.to = val.to_string();
        } else if let Some(val) = line.strip_prefix("Subject: ") {
            draft.subject = val.to_string();
        }
    }
    draft.body = lines.collect::<Vec<_>>().join("\n");

    if draft.to.trim().is_empty() {
        return None;
    }
    Some(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_draft_reads_headers_and_body() {
        let draft = parse_draft("From: me@x\nTo: ron@hogwarts.edu\nSubject: Re: Quidditch\n\nSee you\nthere").unwrap();
        assert_eq!(draft.to, "ron@hogwarts.edu");
        assert_eq!(draft.subject, "Re: Quidditch");
        assert_eq!(draft.body, "See you\nthere");
    }

    #[test]
    fn test_parse_draft_without_recipient_is_discarded() {
        assert!(parse_draft("To: \nSubject: hi\n\nbody").is_none());
    }
}
