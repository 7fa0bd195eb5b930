//! Undo log for the trail-based engines.
//!
//! Every destructive step an engine takes between two decisions is recorded
//! as a typed change; backtracking replays the changes in reverse down to
//! the mark taken when the decision was made. The change types themselves
//! are engine-specific, so the journal is generic over them.

/// An append-only log of changes with mark-based rollback.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Journal<C> {
    changes: Vec<C>,
}

impl<C> Journal<C> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            changes: Vec::with_capacity(capacity),
        }
    }

    /// Current height; used as the rollback mark.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn record(&mut self, change: C) {
        self.changes.push(change);
    }

    /// Drains every change above `mark`, newest first, for the caller to
    /// invert.
    pub fn drain_to(&mut self, mark: usize) -> impl Iterator<Item = C> + '_ {
        self.changes.drain(mark..).rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_newest_first() {
        let mut journal: Journal<u32> = Journal::new(4);
        journal.record(1);
        let mark = journal.len();
        journal.record(2);
        journal.record(3);

        let undone: Vec<u32> = journal.drain_to(mark).collect();
        assert_eq!(undone, vec![3, 2]);
        assert_eq!(journal.len(), 1);
    }
}
