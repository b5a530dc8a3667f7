//! Session-start thread data.
//!
//! Times in the seed file are offsets in minutes before `now`, so a fresh
//! session always has recent mail. Participant references name an entry in
//! `people`, or `me:<domain>` for the configured local identity.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::types::{Category, Domain, Identities, Message, Participant, Thread, ThreadId};

pub const DEFAULT_SEED: &str = include_str!("../../data/seed.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("invalid seed file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("thread {thread} refers to unknown person '{person}'")]
    UnknownPerson { thread: String, person: String },
    #[error("thread id '{id}' appears more than once")]
    DuplicateId { id: String },
    #[error("thread {thread} has a time offset out of range")]
    OffsetOutOfRange { thread: String },
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    people: HashMap<String, Participant>,
    threads: Vec<SeedThread>,
}

#[derive(Debug, Deserialize)]
struct SeedThread {
    id: String,
    subject: String,
    account: Domain,
    category: Category,
    minutes_ago: i64,
    #[serde(default)]
    participants: Vec<String>,
    #[serde(default)]
    read: bool,
    #[serde(default)]
    starred: bool,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    snoozed_for_minutes: Option<i64>,
    #[serde(default)]
    messages: Vec<SeedMessage>,
}

#[derive(Debug, Deserialize)]
struct SeedMessage {
    from: String,
    minutes_ago: i64,
    body: String,
}

struct People<'a> {
    named: &'a HashMap<String, Participant>,
    me: &'a Identities,
}

impl People<'_> {
    fn resolve(&self, thread: &str, reference: &str) -> Result<Participant, SeedError> {
        let found = match reference.strip_prefix("me:") {
            Some("hogwarts") => Some(self.me.hogwarts.clone()),
            Some("liverpool") => Some(self.me.liverpool.clone()),
            Some(_) => None,
            None => self.named.get(reference).cloned(),
        };
        found.ok_or_else(|| SeedError::UnknownPerson {
            thread: thread.to_string(),
            person: reference.to_string(),
        })
    }
}

/// `now` shifted by `minutes`; `None` when either step overflows
fn offset(now: DateTime<Utc>, minutes: i64) -> Option<DateTime<Utc>> {
    now.checked_add_signed(Duration::try_minutes(minutes)?)
}

/// Parse seed JSON into threads anchored at `now`
pub fn load_seed(
    json: &str,
    identities: &Identities,
    now: DateTime<Utc>,
) -> Result<Vec<Thread>, SeedError> {
    let file: SeedFile = serde_json::from_str(json)?;
    let people = People {
        named: &file.people,
        me: identities,
    };

    let mut seen = HashSet::new();
    let mut threads = Vec::with_capacity(file.threads.len());
    for seed in file.threads {
        if !seen.insert(seed.id.clone()) {
            return Err(SeedError::DuplicateId { id: seed.id });
        }
        let out_of_range = || SeedError::OffsetOutOfRange {
            thread: seed.id.clone(),
        };
        let ago = |minutes: i64| offset(now, minutes.checked_neg()?);

        let participants = seed
            .participants
            .iter()
            .map(|r| people.resolve(&seed.id, r))
            .collect::<Result<Vec<_>, _>>()?;
        let messages = seed
            .messages
            .iter()
            .map(|m| {
                Ok(Message {
                    sender: people.resolve(&seed.id, &m.from)?,
                    body: m.body.clone(),
                    timestamp: ago(m.minutes_ago).ok_or_else(out_of_range)?,
                })
            })
            .collect::<Result<Vec<_>, SeedError>>()?;
        let timestamp = ago(seed.minutes_ago).ok_or_else(out_of_range)?;
        let snoozed_until = match seed.snoozed_for_minutes {
            Some(m) => Some(offset(now, m).ok_or_else(out_of_range)?),
            None => None,
        };

        threads.push(Thread {
            id: ThreadId::new(seed.id),
            subject: seed.subject,
            timestamp,
            account: seed.account,
            category: seed.category,
            participants,
            messages,
            is_read: seed.read,
            is_starred: seed.starred,
            is_archived: seed.archived,
            snoozed_until,
        });
    }
    Ok(threads)
}

/// The bundled demo mailbox
pub fn default_threads(
    identities: &Identities,
    now: DateTime<Utc>,
) -> Result<Vec<Thread>, SeedError> {
    load_seed(DEFAULT_SEED, identities, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::counts::unread_counts;
    use crate::mail::fixtures::base_time;
    use crate::mail::types::View;
    use crate::mail::view::select_base;

    #[test]
    fn test_default_seed_loads() {
        let me = Identities::default();
        let threads = default_threads(&me, base_time()).unwrap();
        assert_eq!(threads.len(), 16);

        let mut ids: Vec<&str> = threads.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), threads.len());
    }

    #[test]
    fn test_times_relative_to_now() {
        let now = base_time();
        let threads = default_threads(&Identities::default(), now).unwrap();
        let hut = threads.iter().find(|t| t.id.as_str() == "thread-5").unwrap();
        assert_eq!(hut.timestamp, now - Duration::minutes(5760));
        assert_eq!(hut.snoozed_until, Some(now + Duration::minutes(120)));
        assert!(hut.is_snoozed(now));
        assert!(!hut.is_snoozed(now + Duration::minutes(120)));
    }

    #[test]
    fn test_me_resolves_to_configured_identity() {
        let mut me = Identities::default();
        me.liverpool = Participant::new("H. Potter", "hp@lfc.example");
        let threads = default_threads(&me, base_time()).unwrap();
        let tour = threads.iter().find(|t| t.id.as_str() == "thread-12").unwrap();
        assert_eq!(tour.last_sender_email(), Some("hp@lfc.example"));
    }

    #[test]
    fn test_seed_views_are_populated() {
        let me = Identities::default();
        let now = base_time();
        let threads = default_threads(&me, now).unwrap();

        let inbox = select_base(&threads, &View::Inbox, Domain::Hogwarts, now, &me);
        assert!(inbox.iter().any(|t| t.id.as_str() == "thread-1"));
        assert!(inbox.iter().all(|t| !t.is_snoozed(now) && !t.is_archived));

        let sent = select_base(&threads, &View::AllSent, Domain::Hogwarts, now, &me);
        assert_eq!(sent.len(), 2);

        let counts = unread_counts(&threads, now);
        assert!(counts.hogwarts > 0 && counts.liverpool > 0);
    }

    #[test]
    fn test_unknown_person_is_reported() {
        let json = r#"{
            "people": {},
            "threads": [{
                "id": "x", "subject": "s", "account": "hogwarts",
                "category": "primary", "minutes_ago": 1,
                "participants": ["nobody"]
            }]
        }"#;
        let err = load_seed(json, &Identities::default(), base_time()).unwrap_err();
        assert!(matches!(err, SeedError::UnknownPerson { ref person, .. } if person == "nobody"));
    }

    #[test]
    fn test_duplicate_thread_id_is_rejected() {
        let json = r#"{
            "threads": [
                {"id": "x", "subject": "a", "account": "hogwarts", "category": "primary", "minutes_ago": 1},
                {"id": "x", "subject": "b", "account": "liverpool", "category": "primary", "minutes_ago": 2}
            ]
        }"#;
        let err = load_seed(json, &Identities::default(), base_time()).unwrap_err();
        assert!(matches!(err, SeedError::DuplicateId { ref id } if id == "x"));
    }

    #[test]
    fn test_huge_offsets_are_errors_not_panics() {
        let thread = |field: &str| {
            format!(
                r#"{{"threads": [{{"id": "x", "subject": "s", "account": "hogwarts",
                    "category": "primary", "minutes_ago": 1, {}}}]}}"#,
                field
            )
        };
        let me = Identities::default();
        for field in [
            r#""snoozed_for_minutes": 9000000000000000"#,
            r#""messages": [{"from": "me:hogwarts", "minutes_ago": 9000000000000000, "body": ""}]"#,
            r#""messages": [{"from": "me:hogwarts", "minutes_ago": -9223372036854775808, "body": ""}]"#,
        ] {
            let err = load_seed(&thread(field), &me, base_time()).unwrap_err();
            assert!(matches!(err, SeedError::OffsetOutOfRange { ref thread } if thread == "x"));
        }

        let json = r#"{"threads": [{"id": "y", "subject": "s", "account": "hogwarts",
            "category": "primary", "minutes_ago": 9000000000000000}]}"#;
        let err = load_seed(json, &me, base_time()).unwrap_err();
        assert!(matches!(err, SeedError::OffsetOutOfRange { ref thread } if thread == "y"));
    }

    #[test]
    fn test_malformed_json() {
        let err = load_seed("{", &Identities::default(), base_time()).unwrap_err();
        assert!(matches!(err, SeedError::Json(_)));
    }
}
