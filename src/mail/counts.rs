use chrono::{DateTime, Utc};

use super::types::{Domain, Thread};
use super::view::is_inbox_eligible;

/// Unread inbox threads per domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnreadCounts {
    pub hogwarts: usize,
    pub liverpool: usize,
}

impl UnreadCounts {
    pub fn get(&self, domain: Domain) -> usize {
        match domain {
            Domain::Hogwarts => self.hogwarts,
            Domain::Liverpool => self.liverpool,
        }
    }

    pub fn total(&self) -> usize {
        self.hogwarts + self.liverpool
    }
}

/// Recomputed from scratch on every call; the collection is small.
pub fn unread_counts(threads: &[Thread], now: DateTime<Utc>) -> UnreadCounts {
    let mut counts = UnreadCounts::default();
    for thread in threads
        .iter()
        .filter(|t| !t.is_read && is_inbox_eligible(t, now))
    {
        match thread.account {
            Domain::Hogwarts => counts.hogwarts += 1,
            Domain::Liverpool => counts.liverpool += 1,
        }
    }
    counts
}

pub fn snoozed_count(threads: &[Thread], now: DateTime<Utc>) -> usize {
    threads.iter().filter(|t| t.is_snoozed(now)).count()
}
