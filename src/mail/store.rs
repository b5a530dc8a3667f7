use chrono::{DateTime, Utc};
use std::collections::HashSet;

use super::types::{Thread, ThreadId};

/// The authoritative thread collection for the session.
///
/// Every mutation goes through here. Unknown ids are ignored and reported
/// as `false` / `0` rather than errors, so a stale selection can't break a
/// bulk action.
#[derive(Debug, Clone, Default)]
pub struct ThreadStore {
    threads: Vec<Thread>,
}

impl ThreadStore {
    pub fn new(threads: Vec<Thread>) -> Self {
        Self { threads }
    }

    pub fn all(&self) -> &[Thread] {
        &self.threads
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn get(&self, id: &ThreadId) -> Option<&Thread> {
        self.threads.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &ThreadId) -> bool {
        self.get(id).is_some()
    }

    /// Deep copy of the collection, used as an undo snapshot
    pub fn snapshot(&self) -> Vec<Thread> {
        self.threads.clone()
    }

    /// Replace the whole collection (undo restore)
    pub fn replace_all(&mut self, threads: Vec<Thread>) {
        self.threads = threads;
    }

    fn update(&mut self, id: &ThreadId, f: impl FnOnce(&mut Thread)) -> bool {
        match self.threads.iter_mut().find(|t| &t.id == id) {
            Some(thread) => {
                f(thread);
                true
            }
            None => false,
        }
    }

    pub fn archive(&mut self, id: &ThreadId) -> bool {
        self.update(id, |t| t.is_archived = true)
    }

    /// Permanent removal; the only structural change to the collection
    pub fn delete(&mut self, id: &ThreadId) -> bool {
        let before = self.threads.len();
        self.threads.retain(|t| &t.id != id);
        self.threads.len() != before
    }

    pub fn set_read(&mut self, id: &ThreadId, is_read: bool) -> bool {
        self.update(id, |t| t.is_read = is_read)
    }

    pub fn toggle_star(&mut self, id: &ThreadId) -> bool {
        self.update(id, |t| t.is_starred = !t.is_starred)
    }

    pub fn snooze(&mut self, id: &ThreadId, until: DateTime<Utc>) -> bool {
        self.update(id, |t| t.snoozed_until = Some(until))
    }

    pub fn unsnooze(&mut self, id: &ThreadId) -> bool {
        self.update(id, |t| t.snoozed_until = None)
    }

    /// Returns the number of threads actually marked
    pub fn mark_read_many(&mut self, ids: &[ThreadId]) -> usize {
        let targets: HashSet<&ThreadId> = ids.iter().collect();
        let mut count = 0;
        for thread in self.threads.iter_mut().filter(|t| targets.contains(&t.id)) {
            thread.is_read = true;
            count += 1;
        }
        count
    }

    pub fn archive_many(&mut self, ids: &[ThreadId]) -> usize {
        let targets: HashSet<&ThreadId> = ids.iter().collect();
        let mut count = 0;
        for thread in self.threads.iter_mut().filter(|t| targets.contains(&t.id)) {
            thread.is_archived = true;
            count += 1;
        }
        count
    }

    pub fn delete_many(&mut self, ids: &[ThreadId]) -> usize {
        let targets: HashSet<&ThreadId> = ids.iter().collect();
        let before = self.threads.len();
        self.threads.retain(|t| !targets.contains(&t.id));
        before - self.threads.len()
    }
}
