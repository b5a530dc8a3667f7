use chrono::{DateTime, Utc};
use ratatui::{layout::Rect, widgets::ListState};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{Config, ThemeConfig};
use crate::layout::Layout;
use crate::mail::reply::{draft_for, Draft, ReplyKind};
use crate::mail::selection::Selection;
use crate::mail::snooze::SnoozePreset;
use crate::mail::{
    derive, snoozed_count, unread_counts, Clock, Domain, Identities, SearchOutcome, Thread,
    ThreadId, ThreadStore, Ticker, UndoController, UnreadCounts, View, ViewState,
};
use crate::prefs::{PrefStore, Prefs, Theme};
use crate::summary::{SummaryRequests, SummaryState, Summarizer};

/// What keyboard input currently drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Search,
    Filters,
    Snooze,
    Onboarding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    List,
    Reader,
}

/// Field under the cursor in the filter editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Sender,
    DateRange,
    Status,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [
        FilterField::Sender,
        FilterField::DateRange,
        FilterField::Status,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Sender => "Sender",
            FilterField::DateRange => "Date",
            FilterField::Status => "Status",
        }
    }
}

/// One clickable row of the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub view: View,
    /// Switches the active domain when set
    pub domain: Option<Domain>,
}

impl SidebarEntry {
    fn new(view: View, domain: Option<Domain>) -> Self {
        Self { view, domain }
    }

    pub fn label(&self) -> String {
        match self.domain {
            Some(domain) => format!("{} · {}", self.view.label(), domain.label()),
            None => self.view.label().to_string(),
        }
    }
}

pub fn sidebar_entries() -> Vec<SidebarEntry> {
    vec![
        SidebarEntry::new(View::Inbox, Some(Domain::Hogwarts)),
        SidebarEntry::new(View::Inbox, Some(Domain::Liverpool)),
        SidebarEntry::new(View::Todos, None),
        SidebarEntry::new(View::Finance, None),
        SidebarEntry::new(View::Feedback, None),
        SidebarEntry::new(View::Travel, None),
        SidebarEntry::new(View::Starred, None),
        SidebarEntry::new(View::Snoozed, None),
        SidebarEntry::new(View::AllSent, None),
        SidebarEntry::new(View::Sent, Some(Domain::Hogwarts)),
        SidebarEntry::new(View::Sent, Some(Domain::Liverpool)),
        SidebarEntry::new(View::Drafts, Some(Domain::Hogwarts)),
        SidebarEntry::new(View::Drafts, Some(Domain::Liverpool)),
        SidebarEntry::new(View::Archive, Some(Domain::Hogwarts)),
        SidebarEntry::new(View::Archive, Some(Domain::Liverpool)),
    ]
}

pub struct App {
    pub config: Arc<Config>,
    clock: Box<dyn Clock>,
    ticker: Ticker,
    pub store: ThreadStore,
    pub view_state: ViewState,
    pub identities: Identities,
    pub selection: Selection,
    pub undo: UndoController,
    pub open_thread: Option<ThreadId>,
    pub list_state: ListState,
    pub sidebar_state: ListState,
    pub focus: Focus,
    pub mode: Mode,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub summary: Option<SummaryState>,
    summaries: SummaryRequests,
    pub prefs: Prefs,
    prefs_store: PrefStore,
    pub layout: Layout,
    pub reader_scroll: u16,
    /// Message of the open thread that replies quote; `None` means the last
    pub quoted: Option<usize>,
    pub filter_field: FilterField,
    pub snooze_choice: usize,
    // Mouse tracking - pane areas
    pub sidebar_area: Rect,
    pub list_area: Rect,
    pub reader_area: Rect,
}

impl App {
    pub fn new(
        config: Arc<Config>,
        threads: Vec<Thread>,
        clock: Box<dyn Clock>,
        summarizer: Arc<dyn Summarizer>,
        prefs_store: PrefStore,
        terminal_width: u16,
    ) -> Self {
        let now = clock.now();
        let prefs = prefs_store.load();
        let tick = config.timing.clock_tick();
        let undo_window = config.timing.undo_window();
        let layout = Layout::new(&config.layout, &config.timing, terminal_width);
        let identities = config.identities();

        let mut sidebar_state = ListState::default();
        sidebar_state.select(Some(0));

        let mut app = Self {
            config,
            clock,
            ticker: Ticker::new(now, tick),
            store: ThreadStore::new(threads),
            view_state: ViewState::default(),
            identities,
            selection: Selection::default(),
            undo: UndoController::new(undo_window),
            open_thread: None,
            list_state: ListState::default(),
            sidebar_state,
            focus: Focus::List,
            mode: if prefs.onboarding_complete {
                Mode::List
            } else {
                Mode::Onboarding
            },
            should_quit: false,
            status_message: None,
            summary: None,
            summaries: SummaryRequests::new(summarizer),
            prefs,
            prefs_store,
            layout,
            reader_scroll: 0,
            quoted: None,
            filter_field: FilterField::Sender,
            snooze_choice: 0,
            sidebar_area: Rect::default(),
            list_area: Rect::default(),
            reader_area: Rect::default(),
        };
        app.clamp_selection();
        app
    }

    /// Logical now used for snooze checks; moves once per tick period
    pub fn now(&self) -> DateTime<Utc> {
        self.ticker.now()
    }

    /// Wall-clock now, used for undo deadlines and snooze targets
    pub fn wall_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The rendered thread list
    pub fn visible(&self) -> SearchOutcome<'_> {
        derive(self.store.all(), &self.view_state, self.now(), &self.identities)
    }

    pub fn visible_ids(&self) -> Vec<ThreadId> {
        self.visible().threads.iter().map(|t| t.id.clone()).collect()
    }

    pub fn unread_counts(&self) -> UnreadCounts {
        unread_counts(self.store.all(), self.now())
    }

    pub fn snoozed_count(&self) -> usize {
        snoozed_count(self.store.all(), self.now())
    }

    pub fn selected_id(&self) -> Option<ThreadId> {
        let i = self.list_state.selected()?;
        self.visible().threads.get(i).map(|t| t.id.clone())
    }

    pub fn open(&self) -> Option<&Thread> {
        self.open_thread.as_ref().and_then(|id| self.store.get(id))
    }

    /// Thread that single-thread actions apply to
    pub fn target(&self) -> Option<ThreadId> {
        match self.focus {
            Focus::Reader => self.open_thread.clone(),
            _ => self.selected_id(),
        }
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Periodic housekeeping, called every loop iteration
    pub fn tick(&mut self) {
        let wall = self.clock.now();
        if self.ticker.poll(wall) {
            debug!(now = %self.ticker.now(), "clock tick");
            self.clamp_selection();
        }
        if self.undo.expire(wall) {
            debug!("undo window closed");
        }
        for result in self.summaries.drain() {
            let relevant = self.open_thread.as_ref() == Some(&result.thread_id);
            match &mut self.summary {
                Some(state) if relevant => {
                    state.accept(result);
                }
                _ => debug!(thread = %result.thread_id, "summary arrived for closed thread"),
            }
        }
        if self.layout.settle(Instant::now()) {
            debug!(compact = self.layout.is_compact(), "layout settled");
        }
    }

    /// Keep the list cursor on a row that exists
    pub fn clamp_selection(&mut self) {
        let len = self.visible().threads.len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    // --- Navigation ---

    pub fn navigate(&mut self, view: View, domain: Option<Domain>) {
        info!(view = view.name(), domain = ?domain, "navigate");
        self.view_state.view = view;
        if let Some(domain) = domain {
            self.view_state.domain = domain;
        }
        self.close_thread();
        self.selection.clear();
        self.list_state = ListState::default();
        self.clamp_selection();
    }

    pub fn navigate_to_entry(&mut self, index: usize) {
        if let Some(entry) = sidebar_entries().into_iter().nth(index) {
            self.sidebar_state.select(Some(index));
            self.navigate(entry.view, entry.domain);
        }
    }

    pub fn is_active_entry(&self, entry: &SidebarEntry) -> bool {
        entry.view == self.view_state.view
            && entry.domain.is_none_or(|d| d == self.view_state.domain)
    }

    pub fn next(&mut self) {
        let len = self.visible().threads.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.visible().threads.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn sidebar_next(&mut self) {
        let max = sidebar_entries().len() - 1;
        let i = self.sidebar_state.selected().map_or(0, |i| (i + 1).min(max));
        self.sidebar_state.select(Some(i));
    }

    pub fn sidebar_previous(&mut self) {
        let i = self.sidebar_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.sidebar_state.select(Some(i));
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar => Focus::List,
            Focus::List if self.open_thread.is_some() => Focus::Reader,
            Focus::List | Focus::Reader if !self.layout.is_compact() => Focus::Sidebar,
            _ => Focus::List,
        };
    }

    // --- Reading ---

    /// Open a thread: marks it read, drops the bulk selection and any summary
    pub fn open_thread(&mut self, id: &ThreadId) {
        if !self.store.contains(id) {
            return;
        }
        self.store.set_read(id, true);
        self.open_thread = Some(id.clone());
        self.selection.clear();
        self.summary = None;
        self.reader_scroll = 0;
        self.quoted = None;
        self.focus = Focus::Reader;
        debug!(thread = %id, "open thread");
    }

    pub fn open_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.open_thread(&id);
        }
    }

    pub fn close_thread(&mut self) {
        self.open_thread = None;
        self.summary = None;
        self.reader_scroll = 0;
        self.quoted = None;
        if self.focus == Focus::Reader {
            self.focus = Focus::List;
        }
    }

    fn close_if_open(&mut self, id: &ThreadId) {
        if self.open_thread.as_ref() == Some(id) {
            self.close_thread();
        }
    }

    pub fn reader_scroll_down(&mut self) {
        self.reader_scroll = self.reader_scroll.saturating_add(3);
    }

    pub fn reader_scroll_up(&mut self) {
        self.reader_scroll = self.reader_scroll.saturating_sub(3);
    }

    /// Pick the message a reply quotes, moving from the last one backwards
    pub fn quote_previous(&mut self) {
        let Some(len) = self.open().map(|t| t.messages.len()) else {
            return;
        };
        if len == 0 {
            return;
        }
        let current = self.quoted.unwrap_or(len - 1);
        self.quoted = Some(current.saturating_sub(1));
    }

    pub fn quote_next(&mut self) {
        let Some(len) = self.open().map(|t| t.messages.len()) else {
            return;
        };
        self.quoted = match self.quoted {
            Some(i) if i + 1 < len => Some(i + 1),
            _ => None,
        };
    }

    // --- Single-thread actions ---

    pub fn archive_thread(&mut self, id: &ThreadId) -> bool {
        self.destructive(id, "Thread archived.", |store, id| store.archive(id))
    }

    pub fn delete_thread(&mut self, id: &ThreadId) -> bool {
        self.destructive(id, "Thread deleted.", |store, id| store.delete(id))
    }

    /// Junk has no folder of its own; the thread is archived and undoable
    pub fn move_to_junk(&mut self, id: &ThreadId) -> bool {
        self.destructive(id, "Thread moved to junk.", |store, id| store.archive(id))
    }

    fn destructive(
        &mut self,
        id: &ThreadId,
        message: &str,
        apply: impl FnOnce(&mut ThreadStore, &ThreadId) -> bool,
    ) -> bool {
        let snapshot = self.store.snapshot();
        if !apply(&mut self.store, id) {
            return false;
        }
        self.undo.push(message, snapshot, self.clock.now());
        self.close_if_open(id);
        self.selection.remove(id);
        self.clamp_selection();
        info!(thread = %id, action = message, "undoable action");
        true
    }

    /// Put back the collection from before the pending archive/delete
    pub fn undo(&mut self) -> bool {
        match self.undo.restore_current(self.clock.now()) {
            Some(snapshot) => {
                self.store.replace_all(snapshot);
                self.clamp_selection();
                self.set_status("Action undone.");
                info!("undo restored");
                true
            }
            None => false,
        }
    }

    pub fn dismiss_undo(&mut self) {
        self.undo.dismiss();
    }

    pub fn set_read(&mut self, id: &ThreadId, is_read: bool) -> bool {
        let changed = self.store.set_read(id, is_read);
        self.clamp_selection();
        changed
    }

    pub fn toggle_read(&mut self, id: &ThreadId) -> bool {
        match self.store.get(id).map(|t| t.is_read) {
            Some(is_read) => self.set_read(id, !is_read),
            None => false,
        }
    }

    pub fn toggle_star(&mut self, id: &ThreadId) -> bool {
        let changed = self.store.toggle_star(id);
        self.clamp_selection();
        changed
    }

    /// Hide `id` until `until`; the open thread closes
    pub fn snooze(&mut self, id: &ThreadId, until: DateTime<Utc>) -> bool {
        if !self.store.snooze(id, until) {
            return false;
        }
        info!(thread = %id, until = %until, "snoozed");
        self.close_if_open(id);
        self.clamp_selection();
        true
    }

    pub fn snooze_preset(&mut self, id: &ThreadId, preset: SnoozePreset) -> bool {
        let until = preset.until(self.clock.now());
        let snoozed = self.snooze(id, until);
        if snoozed {
            self.set_status(&format!("Snoozed until {}", until.format("%a %b %-d, %H:%M")));
        }
        snoozed
    }

    pub fn unsnooze(&mut self, id: &ThreadId) -> bool {
        let changed = self.store.unsnooze(id);
        self.clamp_selection();
        changed
    }

    // --- Bulk actions (not undoable) ---

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.selection.toggle(&id);
        }
    }

    pub fn bulk_mark_read(&mut self) -> usize {
        let ids = self.selection.snapshot();
        let n = self.store.mark_read_many(&ids);
        self.finish_bulk("marked read", n, &ids, false)
    }

    pub fn bulk_archive(&mut self) -> usize {
        let ids = self.selection.snapshot();
        let n = self.store.archive_many(&ids);
        self.finish_bulk("archived", n, &ids, true)
    }

    pub fn bulk_delete(&mut self) -> usize {
        let ids = self.selection.snapshot();
        let n = self.store.delete_many(&ids);
        self.finish_bulk("deleted", n, &ids, true)
    }

    fn finish_bulk(&mut self, verb: &str, n: usize, ids: &[ThreadId], closes: bool) -> usize {
        if closes {
            if let Some(open) = self.open_thread.clone() {
                if ids.contains(&open) {
                    self.close_thread();
                }
            }
        }
        self.selection.clear();
        self.clamp_selection();
        info!(count = n, action = verb, "bulk action");
        self.set_status(&format!("{} thread(s) {}", n, verb));
        n
    }

    // --- Search & filters ---

    pub fn start_search(&mut self) {
        self.mode = Mode::Search;
    }

    pub fn search_input(&mut self, c: char) {
        self.view_state.filters.query.push(c);
        self.list_state.select(Some(0));
        self.clamp_selection();
    }

    pub fn search_backspace(&mut self) {
        self.view_state.filters.query.pop();
        self.clamp_selection();
    }

    /// Leave the search box keeping the query
    pub fn finish_search(&mut self) {
        self.mode = Mode::List;
    }

    pub fn cancel_search(&mut self) {
        self.view_state.filters.query.clear();
        self.mode = Mode::List;
        self.clamp_selection();
    }

    pub fn toggle_unread_only(&mut self) {
        self.view_state.show_unread_only = !self.view_state.show_unread_only;
        self.clamp_selection();
    }

    pub fn open_filters(&mut self) {
        self.filter_field = FilterField::Sender;
        self.mode = Mode::Filters;
    }

    pub fn filter_next_field(&mut self) {
        self.filter_field = match self.filter_field {
            FilterField::Sender => FilterField::DateRange,
            FilterField::DateRange => FilterField::Status,
            FilterField::Status => FilterField::Sender,
        };
    }

    pub fn filter_previous_field(&mut self) {
        self.filter_field = match self.filter_field {
            FilterField::Sender => FilterField::Status,
            FilterField::DateRange => FilterField::Sender,
            FilterField::Status => FilterField::DateRange,
        };
    }

    /// Type into the sender field, or cycle the other fields
    pub fn filter_input(&mut self, c: char) {
        let filters = &mut self.view_state.filters;
        match self.filter_field {
            FilterField::Sender => filters.sender.push(c),
            FilterField::DateRange if c == ' ' => filters.date_range = filters.date_range.next(),
            FilterField::Status if c == ' ' => filters.status = filters.status.next(),
            _ => {}
        }
        self.clamp_selection();
    }

    pub fn filter_backspace(&mut self) {
        if self.filter_field == FilterField::Sender {
            self.view_state.filters.sender.pop();
            self.clamp_selection();
        }
    }

    pub fn clear_filters(&mut self) {
        self.view_state.filters.clear_filters();
        self.clamp_selection();
    }

    pub fn close_filters(&mut self) {
        self.mode = Mode::List;
    }

    // --- Snooze picker ---

    pub fn open_snooze_picker(&mut self) {
        if self.target().is_some() {
            self.snooze_choice = 0;
            self.mode = Mode::Snooze;
        }
    }

    pub fn snooze_picker_move(&mut self, down: bool) {
        let max = SnoozePreset::ALL.len() - 1;
        self.snooze_choice = if down {
            (self.snooze_choice + 1).min(max)
        } else {
            self.snooze_choice.saturating_sub(1)
        };
    }

    pub fn confirm_snooze(&mut self) {
        self.mode = Mode::List;
        let preset = SnoozePreset::ALL[self.snooze_choice.min(SnoozePreset::ALL.len() - 1)];
        if let Some(id) = self.target() {
            self.snooze_preset(&id, preset);
        }
    }

    pub fn cancel_snooze(&mut self) {
        self.mode = Mode::List;
    }

    // --- Summaries ---

    pub fn request_summary(&mut self) {
        let Some(thread) = self.open() else {
            return;
        };
        let state = self.summaries.request(thread);
        self.summary = Some(state);
    }

    // --- Replies ---

    /// Prefilled draft for the open thread, signature included
    pub fn draft(&self, kind: ReplyKind) -> Option<Draft> {
        let thread = self.open()?;
        let me = self.identities.for_domain(thread.account);
        let quoting = self.quoted.and_then(|i| thread.messages.get(i));
        let mut draft = draft_for(thread, kind, me, quoting);
        if let Some(signature) = &self.config.account(thread.account).signature {
            draft.body = format!("\n\n-- \n{}{}", signature, draft.body);
        }
        Some(draft)
    }

    /// There is no transport; sending records the draft and nothing else
    pub fn send_draft(&mut self, draft: &Draft) {
        info!(to = %draft.to, subject = %draft.subject, bytes = draft.body.len(), "draft sent (not delivered)");
        self.set_status("Message logged (offline mode, nothing was delivered)");
    }

    // --- Preferences ---

    pub fn resolved_theme(&self) -> Theme {
        let colorfgbg = std::env::var("COLORFGBG").ok();
        self.prefs.theme.resolve(colorfgbg.as_deref())
    }

    pub fn palette(&self) -> &ThemeConfig {
        self.config.palette(self.resolved_theme())
    }

    pub fn cycle_theme(&mut self) {
        self.prefs.theme = self.prefs.theme.next();
        self.save_prefs();
        self.set_status(&format!("Theme: {}", self.prefs.theme.label()));
    }

    pub fn finish_onboarding(&mut self) {
        self.prefs.onboarding_complete = true;
        self.mode = Mode::List;
        self.save_prefs();
    }

    fn save_prefs(&mut self) {
        if let Err(e) = self.prefs_store.save(&self.prefs) {
            warn!(error = %e, "could not save prefs");
            self.set_status("Could not save preferences");
        }
    }

    // --- Mouse ---

    pub fn set_pane_areas(&mut self, sidebar: Rect, list: Rect, reader: Rect) {
        self.sidebar_area = sidebar;
        self.list_area = list;
        self.reader_area = reader;
    }

    /// Get visible height of list (excluding borders)
    pub fn list_visible_height(&self) -> usize {
        self.list_area.height.saturating_sub(2) as usize
    }

    /// Handle click at (x, y) - returns true if the list selection changed
    pub fn handle_click(&mut self, x: u16, y: u16) -> bool {
        if contains(self.sidebar_area, x, y) {
            self.focus = Focus::Sidebar;
            let row = y.saturating_sub(self.sidebar_area.y + 1) as usize;
            let index = row + self.sidebar_state.offset();
            if index < sidebar_entries().len() {
                self.navigate_to_entry(index);
            }
        } else if contains(self.list_area, x, y) {
            self.focus = Focus::List;
            let visual_row = y.saturating_sub(self.list_area.y + 1) as usize;
            let actual_row = visual_row + self.list_state.offset();
            if actual_row < self.visible().threads.len() {
                self.list_state.select(Some(actual_row));
                return true;
            }
        } else if contains(self.reader_area, x, y) && self.open_thread.is_some() {
            self.focus = Focus::Reader;
        }
        false
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}
