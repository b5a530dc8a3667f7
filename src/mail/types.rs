use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subject prefix that marks a thread as an unsent draft
pub const DRAFT_PREFIX: &str = "(Draft)";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Mailbox identity a thread belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Hogwarts,
    Liverpool,
}

impl Domain {
    pub const ALL: [Domain; 2] = [Domain::Hogwarts, Domain::Liverpool];

    pub fn name(&self) -> &'static str {
        match self {
            Domain::Hogwarts => "hogwarts",
            Domain::Liverpool => "liverpool",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Domain::Hogwarts => "Hogwarts",
            Domain::Liverpool => "Liverpool",
        }
    }

    pub fn other(&self) -> Domain {
        match self {
            Domain::Hogwarts => Domain::Liverpool,
            Domain::Liverpool => Domain::Hogwarts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Primary,
    Promotions,
    Social,
    Updates,
    Forums,
    Todos,
    Finance,
    Feedback,
    Travel,
}

impl Category {
    /// Categories that make a thread eligible for the inbox
    pub const BASE_FOLDERS: [Category; 5] = [
        Category::Primary,
        Category::Promotions,
        Category::Social,
        Category::Updates,
        Category::Forums,
    ];

    pub fn is_base_folder(&self) -> bool {
        Self::BASE_FOLDERS.contains(self)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Primary => "primary",
            Category::Promotions => "promotions",
            Category::Social => "social",
            Category::Updates => "updates",
            Category::Forums => "forums",
            Category::Todos => "todos",
            Category::Finance => "finance",
            Category::Feedback => "feedback",
            Category::Travel => "travel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub email: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Participant,
    /// May contain inline HTML tags
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    pub subject: String,
    pub timestamp: DateTime<Utc>,
    pub account: Domain,
    pub category: Category,
    pub participants: Vec<Participant>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub snoozed_until: Option<DateTime<Utc>>,
}

impl Thread {
    /// Snoozed means hidden until a strictly later instant. Never stored.
    pub fn is_snoozed(&self, now: DateTime<Utc>) -> bool {
        self.snoozed_until.is_some_and(|until| until > now)
    }

    pub fn is_draft(&self) -> bool {
        self.subject.starts_with(DRAFT_PREFIX)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn last_sender_email(&self) -> Option<&str> {
        self.last_message().map(|m| m.sender.email.as_str())
    }

    /// Display name of the first participant, used as the list "From" column
    pub fn from_display(&self) -> String {
        match self.participants.first() {
            Some(p) if !p.name.is_empty() => p.name.clone(),
            Some(p) => p.email.clone(),
            None => "(unknown)".to_string(),
        }
    }
}

/// Named folder predicate over the thread collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum View {
    Inbox,
    Todos,
    Finance,
    Feedback,
    Travel,
    Starred,
    Snoozed,
    AllSent,
    Sent,
    Drafts,
    Archive,
    Folders,
    /// Unrecognized name, selected with the inbox predicate
    Other(String),
}

impl View {
    pub fn from_name(name: &str) -> Self {
        match name {
            "inbox" => View::Inbox,
            "todos" => View::Todos,
            "finance" => View::Finance,
            "feedback" => View::Feedback,
            "travel" => View::Travel,
            "starred" => View::Starred,
            "snoozed" => View::Snoozed,
            "all-sent" => View::AllSent,
            "sent" => View::Sent,
            "drafts" => View::Drafts,
            "archive" => View::Archive,
            "folders" => View::Folders,
            other => View::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            View::Inbox => "inbox",
            View::Todos => "todos",
            View::Finance => "finance",
            View::Feedback => "feedback",
            View::Travel => "travel",
            View::Starred => "starred",
            View::Snoozed => "snoozed",
            View::AllSent => "all-sent",
            View::Sent => "sent",
            View::Drafts => "drafts",
            View::Archive => "archive",
            View::Folders => "folders",
            View::Other(name) => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            View::Inbox => "Inbox",
            View::Todos => "To-dos",
            View::Finance => "Finance",
            View::Feedback => "Feedback",
            View::Travel => "Travel",
            View::Starred => "Starred",
            View::Snoozed => "Snoozed",
            View::AllSent => "All sent",
            View::Sent => "Sent",
            View::Drafts => "Drafts",
            View::Archive => "Archive",
            View::Folders => "Folders",
            View::Other(name) => name,
        }
    }

    /// Views whose contents depend on the active domain
    pub fn is_domain_scoped(&self) -> bool {
        matches!(
            self,
            View::Inbox | View::Sent | View::Drafts | View::Archive | View::Other(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateRange {
    #[default]
    Any,
    Last7Days,
    Last30Days,
}

impl DateRange {
    pub fn days(&self) -> Option<i64> {
        match self {
            DateRange::Any => None,
            DateRange::Last7Days => Some(7),
            DateRange::Last30Days => Some(30),
        }
    }

    pub fn next(&self) -> Self {
        match self {
            DateRange::Any => DateRange::Last7Days,
            DateRange::Last7Days => DateRange::Last30Days,
            DateRange::Last30Days => DateRange::Any,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateRange::Any => "Any time",
            DateRange::Last7Days => "Last 7 days",
            DateRange::Last30Days => "Last 30 days",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReadStatus {
    #[default]
    Any,
    Read,
    Unread,
}

impl ReadStatus {
    pub fn next(&self) -> Self {
        match self {
            ReadStatus::Any => ReadStatus::Read,
            ReadStatus::Read => ReadStatus::Unread,
            ReadStatus::Unread => ReadStatus::Any,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReadStatus::Any => "Any",
            ReadStatus::Read => "Read",
            ReadStatus::Unread => "Unread",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    pub query: String,
    pub sender: String,
    pub date_range: DateRange,
    pub status: ReadStatus,
}

impl SearchFilters {
    pub fn query_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Structured filters only (sender, date range, read status)
    pub fn filters_active(&self) -> bool {
        !self.sender.trim().is_empty()
            || self.date_range != DateRange::Any
            || self.status != ReadStatus::Any
    }

    pub fn is_searching(&self) -> bool {
        self.query_active() || self.filters_active()
    }

    /// Reset the structured filters, keeping the typed query
    pub fn clear_filters(&mut self) {
        self.sender.clear();
        self.date_range = DateRange::Any;
        self.status = ReadStatus::Any;
    }
}

/// The local sending address for each domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identities {
    pub hogwarts: Participant,
    pub liverpool: Participant,
}

impl Identities {
    pub fn for_domain(&self, domain: Domain) -> &Participant {
        match domain {
            Domain::Hogwarts => &self.hogwarts,
            Domain::Liverpool => &self.liverpool,
        }
    }

    pub fn is_local(&self, email: &str) -> bool {
        email == self.hogwarts.email || email == self.liverpool.email
    }
}

impl Default for Identities {
    fn default() -> Self {
        Self {
            hogwarts: Participant::new("Harry Potter", "harry.potter@hogwarts.edu"),
            liverpool: Participant::new("Harry Potter", "harry@liverpoolfc.com"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn thread_snoozed_until(until: Option<DateTime<Utc>>) -> Thread {
        Thread {
            id: ThreadId::new("t"),
            subject: "Subject".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            account: Domain::Hogwarts,
            category: Category::Primary,
            participants: vec![],
            messages: vec![],
            is_read: false,
            is_starred: false,
            is_archived: false,
            snoozed_until: until,
        }
    }

    #[test]
    fn test_snoozed_is_strict() {
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let thread = thread_snoozed_until(Some(t));
        assert!(thread.is_snoozed(t - Duration::seconds(1)));
        assert!(!thread.is_snoozed(t));
        assert!(!thread.is_snoozed(t + Duration::seconds(1)));
        assert!(!thread_snoozed_until(None).is_snoozed(t));
    }

    #[test]
    fn test_view_names_round_trip() {
        for name in [
            "inbox", "todos", "finance", "feedback", "travel", "starred", "snoozed", "all-sent",
            "sent", "drafts", "archive", "folders",
        ] {
            assert_eq!(View::from_name(name).name(), name);
        }
        assert_eq!(
            View::from_name("labels/work"),
            View::Other("labels/work".to_string())
        );
    }

    #[test]
    fn test_filters_active_ignores_query() {
        let mut filters = SearchFilters {
            query: "owl".to_string(),
            ..Default::default()
        };
        assert!(filters.is_searching());
        assert!(!filters.filters_active());

        filters.query = "   ".to_string();
        assert!(!filters.is_searching());

        filters.status = ReadStatus::Unread;
        assert!(filters.is_searching());
        assert!(filters.filters_active());

        filters.clear_filters();
        assert!(!filters.filters_active());
    }
}
