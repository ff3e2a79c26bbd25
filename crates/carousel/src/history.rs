//! Linear undo/redo log over whole-project snapshots.

/// Ordered snapshots plus a cursor.
///
/// `index` is `None` before anything is recorded, otherwise it points inside
/// `entries`. Undo and redo only move the cursor; stored entries are never
/// modified.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    index: Option<usize>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: None,
        }
    }
}

impl<T: Clone> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// History seeded with one snapshot at index 0.
    pub fn with_initial(snapshot: T) -> Self {
        let mut history = Self::new();
        history.record(snapshot);
        history
    }

    /// Drop every entry after the cursor, append `snapshot` and point at it.
    pub fn record(&mut self, snapshot: T) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(snapshot);
        self.index = Some(self.entries.len() - 1);
    }

    /// Step back one entry. No-op at index 0.
    pub fn undo(&mut self) -> Option<T> {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                self.entries.get(i - 1).cloned()
            }
            _ => None,
        }
    }

    /// Step forward one entry. No-op at the newest entry.
    pub fn redo(&mut self) -> Option<T> {
        match self.index {
            Some(i) if i + 1 < self.entries.len() => {
                self.index = Some(i + 1);
                self.entries.get(i + 1).cloned()
            }
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.index.and_then(|i| self.entries.get(i))
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.index, Some(i) if i > 0)
    }

    pub fn can_redo(&self) -> bool {
        match self.index {
            Some(i) => i + 1 < self.entries.len(),
            None => false,
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything and start again from `snapshot`.
    pub fn reset(&mut self, snapshot: T) {
        self.entries.clear();
        self.index = None;
        self.record(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_is_inert() {
        let mut h: History<u32> = History::new();
        assert_eq!(h.undo(), None);
        assert_eq!(h.redo(), None);
        assert_eq!(h.current(), None);
        assert_eq!(h.index(), None);
    }

    #[test]
    fn test_undo_at_first_entry_is_noop() {
        let mut h = History::with_initial(1);
        assert_eq!(h.undo(), None);
        assert_eq!(h.current(), Some(&1));
        assert_eq!(h.index(), Some(0));
    }

    #[test]
    fn test_record_truncates_redo_future() {
        let mut h = History::with_initial(0);
        h.record(1);
        h.record(2);
        assert_eq!(h.undo(), Some(1));
        h.record(3);
        assert_eq!(h.len(), 3);
        assert!(!h.can_redo());
        assert_eq!(h.redo(), None);
        assert_eq!(h.current(), Some(&3));
    }

    #[test]
    fn test_reset() {
        let mut h = History::with_initial(0);
        h.record(1);
        h.reset(9);
        assert_eq!(h.len(), 1);
        assert_eq!(h.current(), Some(&9));
        assert!(!h.can_undo());
    }
}
