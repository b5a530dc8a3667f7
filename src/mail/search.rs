use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::sync::LazyLock;

use super::types::{Domain, Identities, ReadStatus, SearchFilters, Thread, View};
use super::view::select_base;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Remove anything that looks like an HTML tag
pub fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

/// Everything that decides what the list shows, apart from the store and the clock
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub view: View,
    pub domain: Domain,
    pub filters: SearchFilters,
    pub show_unread_only: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view: View::Inbox,
            domain: Domain::Hogwarts,
            filters: SearchFilters::default(),
            show_unread_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<'a> {
    pub threads: Vec<&'a Thread>,
    pub is_searching: bool,
    /// Structured filters only, independent of the typed query
    pub filters_active: bool,
}

fn matches_query(thread: &Thread, query: &str) -> bool {
    thread.subject.to_lowercase().contains(query)
        || thread
            .participants
            .iter()
            .any(|p| p.name.to_lowercase().contains(query))
        || thread
            .messages
            .iter()
            .any(|m| strip_tags(&m.body).to_lowercase().contains(query))
}

fn matches_sender(thread: &Thread, sender: &str) -> bool {
    thread.participants.iter().any(|p| {
        p.name.to_lowercase().contains(sender) || p.email.to_lowercase().contains(sender)
    })
}

/// Layer the free-text query and structured filters over the base set.
///
/// Once anything is searched the candidates are the whole store, not `base`.
/// Filters apply in order: text, sender, status, date.
pub fn apply_search<'a>(
    base: &[&'a Thread],
    all: &'a [Thread],
    filters: &SearchFilters,
    now: DateTime<Utc>,
) -> SearchOutcome<'a> {
    let is_searching = filters.is_searching();
    let filters_active = filters.filters_active();

    if !is_searching {
        return SearchOutcome {
            threads: base.to_vec(),
            is_searching,
            filters_active,
        };
    }

    let mut threads: Vec<&Thread> = all.iter().collect();

    if filters.query_active() {
        let query = filters.query.to_lowercase();
        threads.retain(|t| matches_query(t, &query));
    }

    if !filters.sender.trim().is_empty() {
        let sender = filters.sender.to_lowercase();
        threads.retain(|t| matches_sender(t, &sender));
    }

    match filters.status {
        ReadStatus::Read => threads.retain(|t| t.is_read),
        ReadStatus::Unread => threads.retain(|t| !t.is_read),
        ReadStatus::Any => {}
    }

    if let Some(days) = filters.date_range.days() {
        let start = now - Duration::days(days);
        threads.retain(|t| t.timestamp >= start);
    }

    SearchOutcome {
        threads,
        is_searching,
        filters_active,
    }
}

/// Narrow the base set to unread threads.
///
/// Only when idle and no status filter is set: once searching, the search
/// output is authoritative.
pub fn apply_unread_only<'a>(
    outcome: SearchOutcome<'a>,
    base: &[&'a Thread],
    show_unread_only: bool,
    filters: &SearchFilters,
) -> SearchOutcome<'a> {
    if show_unread_only && filters.status == ReadStatus::Any && !outcome.is_searching {
        SearchOutcome {
            threads: base.iter().copied().filter(|t| !t.is_read).collect(),
            ..outcome
        }
    } else {
        outcome
    }
}

/// Full pipeline: view selector, search stage, unread-only stage
pub fn derive<'a>(
    all: &'a [Thread],
    state: &ViewState,
    now: DateTime<Utc>,
    identities: &Identities,
) -> SearchOutcome<'a> {
    let base = select_base(all, &state.view, state.domain, now, identities);
    let outcome = apply_search(&base, all, &state.filters, now);
    apply_unread_only(outcome, &base, state.show_unread_only, &state.filters)
}
