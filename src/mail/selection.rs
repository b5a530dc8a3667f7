use super::types::ThreadId;

/// Threads picked for a bulk action. Each id appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ThreadId>,
}

impl Selection {
    /// Add `id` if absent, remove it if present. Returns true if now selected.
    pub fn toggle(&mut self, id: &ThreadId) -> bool {
        if let Some(pos) = self.ids.iter().position(|i| i == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.clone());
            true
        }
    }

    pub fn remove(&mut self, id: &ThreadId) {
        self.ids.retain(|i| i != id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &ThreadId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids targeted by a bulk action, fixed at invocation time
    pub fn snapshot(&self) -> Vec<ThreadId> {
        self.ids.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_membership() {
        let mut selection = Selection::default();
        let a = ThreadId::new("a");
        assert!(selection.toggle(&a));
        assert!(selection.contains(&a));
        assert!(!selection.toggle(&a));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_each_id_once() {
        let mut selection = Selection::default();
        let a = ThreadId::new("a");
        let b = ThreadId::new("b");
        selection.toggle(&a);
        selection.toggle(&b);
        selection.toggle(&a);
        selection.toggle(&a);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_snapshot_detached_from_later_changes() {
        let mut selection = Selection::default();
        selection.toggle(&ThreadId::new("a"));
        let snapshot = selection.snapshot();
        selection.clear();
        assert_eq!(snapshot, vec![ThreadId::new("a")]);
        assert!(selection.is_empty());
    }
}
