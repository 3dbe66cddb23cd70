// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Undo/redo history.
//!
//! A linear list of state snapshots with a cursor. Pushing a new state while
//! the cursor is behind the tail discards the redo branch.

/// Default number of snapshots kept before the oldest is evicted.
pub const DEFAULT_MAX_ENTRIES: usize = 200;

/// History system for undo/redo functionality.
#[derive(Debug, Clone)]
pub struct HistoryStore<T> {
    /// Snapshots, oldest first
    entries: Vec<T>,
    /// Index of the current snapshot
    cursor: usize,
    /// Maximum number of snapshots kept
    max_entries: usize,
    /// Bumped on every change of the current snapshot
    generation: u64,
}

impl<T> HistoryStore<T> {
    /// Create a history that keeps at most `max_entries` snapshots.
    pub fn with_max_entries(initial: T, max_entries: usize) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            max_entries: max_entries.max(1),
            generation: 0,
        }
    }

    /// The snapshot the cursor points at.
    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    /// Push a new state, dropping anything that could have been redone.
    pub fn set(&mut self, state: T) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(state);
        // Limit history size
        if self.entries.len() > self.max_entries {
            let overflow = self.entries.len() - self.max_entries;
            self.entries.drain(..overflow);
        }
        self.cursor = self.entries.len() - 1;
        self.generation += 1;
    }

    /// Undo: step back one snapshot. Returns `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.generation += 1;
        Some(&self.entries[self.cursor])
    }

    /// Redo: step forward one snapshot. Returns `None` at the tail.
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.generation += 1;
        Some(&self.entries[self.cursor])
    }

    /// Discard all history and start again from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push(initial);
        self.cursor = 0;
        self.generation += 1;
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Version of the current snapshot.
    ///
    /// Any `set`, `undo`, `redo` or `reset` produces a new generation, so a
    /// value captured earlier identifies the exact state it was taken from.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(values: &[i32]) -> HistoryStore<i32> {
        let mut history = HistoryStore::with_max_entries(0, DEFAULT_MAX_ENTRIES);
        for value in values {
            history.set(*value);
        }
        history
    }

    #[test]
    fn test_new_history_has_nothing_to_undo() {
        let mut history = HistoryStore::with_max_entries("initial", DEFAULT_MAX_ENTRIES);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(*history.current(), "initial");
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = history_of(&[1, 2, 3, 4]);

        for expected in [3, 2, 1, 0] {
            assert_eq!(history.undo(), Some(&expected));
        }
        assert!(history.undo().is_none());
        assert_eq!(*history.current(), 0);

        for expected in [1, 2, 3, 4] {
            assert_eq!(history.redo(), Some(&expected));
        }
        assert!(history.redo().is_none());
        assert_eq!(*history.current(), 4);
    }

    #[test]
    fn test_set_after_undo_truncates_redo_branch() {
        let mut history = history_of(&[1, 2, 3]);
        history.undo();
        history.undo();
        history.set(10);

        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo(), Some(&1));
        assert_eq!(history.redo(), Some(&10));
    }

    #[test]
    fn test_reset_leaves_single_entry() {
        let mut history = history_of(&[1, 2, 3]);
        history.undo();
        history.reset(-1);

        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert_eq!(*history.current(), -1);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = HistoryStore::with_max_entries(0, 3);
        for value in 1..=5 {
            history.set(value);
        }

        assert_eq!(history.len(), 3);
        assert_eq!(*history.current(), 5);
        assert_eq!(history.undo(), Some(&4));
        assert_eq!(history.undo(), Some(&3));
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_generation_changes_on_every_transition() {
        let mut history = HistoryStore::with_max_entries(0, DEFAULT_MAX_ENTRIES);
        let mut seen = vec![history.generation()];

        history.set(1);
        seen.push(history.generation());
        history.undo();
        seen.push(history.generation());
        history.redo();
        seen.push(history.generation());
        history.reset(0);
        seen.push(history.generation());

        let mut unique = seen.clone();
        unique.dedup();
        assert_eq!(unique, seen);

        // No-op transitions keep the generation
        let before = history.generation();
        assert!(history.undo().is_none());
        assert_eq!(history.generation(), before);
    }
}
