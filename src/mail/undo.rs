use chrono::{DateTime, Duration, Utc};

use super::types::Thread;

/// Identifies one pending undo; a token from a superseded or expired record
/// restores nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndoToken(u64);

#[derive(Debug, Clone)]
pub struct UndoRecord {
    pub token: UndoToken,
    pub message: String,
    pub expires_at: DateTime<Utc>,
    snapshot: Vec<Thread>,
}

/// Single-slot undo with a fixed expiry window.
///
/// `Idle -> Pending -> Idle`. Pushing while pending drops the old record
/// without restoring it. Expiry, dismissal and restore all return to idle.
#[derive(Debug)]
pub struct UndoController {
    window: Duration,
    pending: Option<UndoRecord>,
    next_token: u64,
}

impl UndoController {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            next_token: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn pending(&self) -> Option<&UndoRecord> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a new undo window with the pre-mutation `snapshot`.
    /// Any prior pending record is discarded.
    pub fn push(
        &mut self,
        message: impl Into<String>,
        snapshot: Vec<Thread>,
        now: DateTime<Utc>,
    ) -> UndoToken {
        self.next_token += 1;
        let token = UndoToken(self.next_token);
        self.pending = Some(UndoRecord {
            token,
            message: message.into(),
            expires_at: now + self.window,
            snapshot,
        });
        token
    }

    /// Hand back the snapshot for `token` if it is still the live record.
    pub fn restore(&mut self, token: UndoToken, now: DateTime<Utc>) -> Option<Vec<Thread>> {
        self.expire(now);
        match self.pending.take() {
            Some(record) if record.token == token => Some(record.snapshot),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Restore whatever is currently pending
    pub fn restore_current(&mut self, now: DateTime<Utc>) -> Option<Vec<Thread>> {
        let token = self.pending.as_ref()?.token;
        self.restore(token, now)
    }

    /// Close the window keeping the mutation. Returns true if something was pending.
    pub fn dismiss(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Finalize the pending record once its deadline has passed
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        match &self.pending {
            Some(record) if now >= record.expires_at => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|r| (r.expires_at - now).max(Duration::zero()))
    }
}

impl Default for UndoController {
    fn default() -> Self {
        Self::new(Duration::seconds(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::fixtures::{base_time, ThreadBuilder};
    use crate::mail::store::ThreadStore;
    use crate::mail::types::ThreadId;

    fn store() -> ThreadStore {
        ThreadStore::new(vec![
            ThreadBuilder::new("A").build(),
            ThreadBuilder::new("B").build(),
        ])
    }

    fn archived(store: &ThreadStore, id: &str) -> bool {
        store.get(&ThreadId::new(id)).unwrap().is_archived
    }

    #[test]
    fn test_restore_within_window() {
        let now = base_time();
        let mut store = store();
        let mut undo = UndoController::default();

        let token = undo.push("Thread archived.", store.snapshot(), now);
        store.archive(&ThreadId::new("A"));

        let snapshot = undo.restore(token, now + Duration::seconds(4)).unwrap();
        store.replace_all(snapshot);
        assert!(!archived(&store, "A"));
        assert!(!undo.is_pending());
    }

    #[test]
    fn test_single_slot_supersede() {
        let now = base_time();
        let mut store = store();
        let mut undo = UndoController::default();

        let first = undo.push("Thread archived.", store.snapshot(), now);
        store.archive(&ThreadId::new("A"));

        let second = undo.push(
            "Thread archived.",
            store.snapshot(),
            now + Duration::seconds(1),
        );
        store.archive(&ThreadId::new("B"));

        assert!(undo.restore(first, now + Duration::seconds(2)).is_none());
        assert!(undo.is_pending());

        let snapshot = undo.restore(second, now + Duration::seconds(2)).unwrap();
        store.replace_all(snapshot);
        assert!(archived(&store, "A"));
        assert!(!archived(&store, "B"));
        assert!(!undo.is_pending());
    }

    #[test]
    fn test_expired_undo_is_noop() {
        let now = base_time();
        let mut store = store();
        let mut undo = UndoController::default();

        let token = undo.push("Thread deleted.", store.snapshot(), now);
        store.delete(&ThreadId::new("A"));

        assert!(undo.expire(now + Duration::seconds(5)));
        assert!(!undo.is_pending());
        assert!(undo.restore(token, now + Duration::seconds(6)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_restore_at_deadline_is_too_late() {
        let now = base_time();
        let mut undo = UndoController::default();
        let token = undo.push("Thread archived.", Vec::new(), now);
        assert!(undo.restore(token, now + Duration::seconds(5)).is_none());
    }

    #[test]
    fn test_dismiss_keeps_mutation() {
        let now = base_time();
        let mut undo = UndoController::default();
        let token = undo.push("Thread archived.", Vec::new(), now);
        assert!(undo.dismiss());
        assert!(!undo.dismiss());
        assert!(undo.restore(token, now).is_none());
        assert!(undo.restore_current(now).is_none());
    }

    #[test]
    fn test_snapshot_unaffected_by_later_mutation() {
        let now = base_time();
        let mut store = store();
        let mut undo = UndoController::default();
        undo.push("Thread archived.", store.snapshot(), now);
        store.archive(&ThreadId::new("A"));
        store.toggle_star(&ThreadId::new("B"));

        let snapshot = undo.restore_current(now).unwrap();
        assert!(snapshot.iter().all(|t| !t.is_archived && !t.is_starred));
    }

    #[test]
    fn test_remaining_counts_down() {
        let now = base_time();
        let mut undo = UndoController::new(Duration::seconds(5));
        assert_eq!(undo.remaining(now), None);
        undo.push("Thread archived.", Vec::new(), now);
        assert_eq!(
            undo.remaining(now + Duration::seconds(2)),
            Some(Duration::seconds(3))
        );
        assert_eq!(
            undo.remaining(now + Duration::seconds(9)),
            Some(Duration::zero())
        );
    }
}
