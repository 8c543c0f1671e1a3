//! # Undo/Redo Stack
//!
//! Snapshot history for the editor store.
//!
//! ## Design
//!
//! - Before each edit the store records the document as it was
//! - Undo swaps the current document with the newest recorded snapshot and
//!   keeps the displaced document for redo
//! - New edits clear the redo stack
//! - Oldest snapshots are dropped first once `max_levels` is exceeded
//! - Batches group several edits into one undo step
//! - Rapid edits under the same key (e.g. typing into one field) can be
//!   coalesced into one undo step
//!
//! Snapshots are owned values. Nothing recorded here is reachable from the
//! live document, so later edits cannot alter history.
//!
//! ## Example
//!
//! ```rust
//! use pagecraft_editor::UndoStack;
//!
//! let mut stack = UndoStack::with_max_levels(10);
//! let mut text = String::from("a");
//!
//! stack.record(text.clone(), Some("type b"));
//! text.push('b');
//!
//! assert!(stack.undo(&mut text));
//! assert_eq!(text, "a");
//! assert!(stack.redo(&mut text));
//! assert_eq!(text, "ab");
//! ```

use std::collections::VecDeque;
use std::time::Duration;

/// Default number of undo levels
pub const DEFAULT_MAX_LEVELS: usize = 50;

/// One recorded state
#[derive(Debug, Clone)]
pub struct HistoryEntry<T> {
    /// State to restore
    pub snapshot: T,

    /// Description of the step that moved away from `snapshot`
    pub label: Option<String>,
}

#[derive(Debug)]
struct OpenBatch {
    label: Option<String>,
    depth: usize,
    recorded: bool,
}

/// Bounded linear undo/redo history of `T` snapshots
#[derive(Debug)]
pub struct UndoStack<T> {
    /// Past states (most recent last)
    undo_stack: VecDeque<HistoryEntry<T>>,

    /// Undone states (most recent last)
    redo_stack: Vec<HistoryEntry<T>>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    current_batch: Option<OpenBatch>,

    /// Key and clock reading of the last coalescable record
    last_coalesce: Option<(String, Duration)>,
}

impl<T> UndoStack<T> {
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
            last_coalesce: None,
        }
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Change the bound, evicting the oldest snapshots if needed
    pub fn set_max_levels(&mut self, max_levels: usize) {
        self.max_levels = max_levels;
        self.trim();
    }

    /// Record `previous` as the state before an edit
    ///
    /// Inside a batch only the first record of the batch is kept.
    pub fn record(&mut self, previous: T, label: Option<&str>) {
        self.last_coalesce = None;
        self.push(previous, label);
    }

    /// Record `previous`, merging with the last record if it carried the same
    /// `key` and happened no more than `window` ago
    ///
    /// `now` is a reading of any monotonic clock; only differences matter.
    ///
    /// Returns `true` if a new undo step was created.
    pub fn record_coalescing(
        &mut self,
        previous: T,
        label: Option<&str>,
        key: &str,
        window: Duration,
        now: Duration,
    ) -> bool {
        let merge = self.current_batch.is_none()
            && self.redo_stack.is_empty()
            && !self.undo_stack.is_empty()
            && matches!(
                &self.last_coalesce,
                Some((last_key, at)) if last_key == key && now.saturating_sub(*at) <= window
            );

        // Edits inside a batch never seed a later merge
        self.last_coalesce = self.current_batch.is_none().then(|| (key.to_string(), now));

        if merge {
            return false;
        }

        self.push(previous, label)
    }

    fn push(&mut self, previous: T, label: Option<&str>) -> bool {
        // New action invalidates future
        self.redo_stack.clear();

        if let Some(batch) = &mut self.current_batch {
            if batch.recorded {
                return false;
            }
            batch.recorded = true;
            let label = batch.label.clone().or_else(|| label.map(str::to_string));
            self.undo_stack.push_back(HistoryEntry { snapshot: previous, label });
        } else {
            self.undo_stack.push_back(HistoryEntry {
                snapshot: previous,
                label: label.map(str::to_string),
            });
        }

        self.trim();
        true
    }

    fn trim(&mut self) {
        if self.max_levels > 0 {
            while self.undo_stack.len() > self.max_levels {
                self.undo_stack.pop_front();
            }
        }
    }

    /// Start a batch; edits until the matching `end_batch` undo together
    ///
    /// Batches nest; only the outermost label is used.
    pub fn begin_batch(&mut self, label: Option<&str>) {
        self.last_coalesce = None;
        match &mut self.current_batch {
            Some(batch) => batch.depth += 1,
            None => {
                self.current_batch = Some(OpenBatch {
                    label: label.map(str::to_string),
                    depth: 1,
                    recorded: false,
                })
            }
        }
    }

    /// Close the innermost open batch
    pub fn end_batch(&mut self) {
        if let Some(batch) = &mut self.current_batch {
            batch.depth -= 1;
            if batch.depth == 0 {
                self.current_batch = None;
                self.last_coalesce = None;
            }
        }
    }

    /// Make the next coalescing record start a new step
    pub fn break_coalescing(&mut self) {
        self.last_coalesce = None;
    }

    pub fn in_batch(&self) -> bool {
        self.current_batch.is_some()
    }

    /// Restore the most recent snapshot into `current`
    ///
    /// Returns `false` (and leaves `current` alone) when there is nothing to
    /// undo. Closes any open batch.
    pub fn undo(&mut self, current: &mut T) -> bool {
        self.current_batch = None;
        self.last_coalesce = None;

        match self.undo_stack.pop_back() {
            Some(entry) => {
                let displaced = std::mem::replace(current, entry.snapshot);
                self.redo_stack.push(HistoryEntry {
                    snapshot: displaced,
                    label: entry.label,
                });
                true
            }
            None => false,
        }
    }

    /// Reapply the most recently undone state into `current`
    pub fn redo(&mut self, current: &mut T) -> bool {
        self.current_batch = None;
        self.last_coalesce = None;

        match self.redo_stack.pop() {
            Some(entry) => {
                let displaced = std::mem::replace(current, entry.snapshot);
                self.undo_stack.push_back(HistoryEntry {
                    snapshot: displaced,
                    label: entry.label,
                });
                self.trim();
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
        self.last_coalesce = None;
    }

    /// Label of the step `undo` would revert
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.back().and_then(|entry| entry.label.as_deref())
    }

    /// Label of the step `redo` would reapply
    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().and_then(|entry| entry.label.as_deref())
    }

    /// Recorded snapshots, oldest first
    pub fn past(&self) -> impl Iterator<Item = &T> {
        self.undo_stack.iter().map(|entry| &entry.snapshot)
    }
}

impl<T> Default for UndoStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_stack_creation() {
        let stack: UndoStack<u32> = UndoStack::new();
        assert_eq!(stack.max_levels(), DEFAULT_MAX_LEVELS);
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_record_undo_redo() {
        let mut stack = UndoStack::new();
        let mut value = 1;

        stack.record(value, Some("set 2"));
        value = 2;

        assert!(stack.undo(&mut value));
        assert_eq!(value, 1);
        assert_eq!(stack.redo_label(), Some("set 2"));

        assert!(stack.redo(&mut value));
        assert_eq!(value, 2);
        assert_eq!(stack.undo_label(), Some("set 2"));
    }

    #[test]
    fn test_empty_history_is_not_an_error() {
        let mut stack: UndoStack<u32> = UndoStack::new();
        let mut value = 7;
        assert!(!stack.undo(&mut value));
        assert!(!stack.redo(&mut value));
        assert_eq!(value, 7);
    }

    #[test]
    fn test_new_record_clears_redo() {
        let mut stack = UndoStack::new();
        let mut value = 0;

        stack.record(value, None);
        value = 1;
        stack.undo(&mut value);
        assert_eq!(stack.redo_levels(), 1);

        stack.record(value, None);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_max_levels_enforced_oldest_first() {
        let mut stack = UndoStack::with_max_levels(2);
        for i in 0..5 {
            stack.record(i, None);
        }
        assert_eq!(stack.undo_levels(), 2);
        assert_eq!(stack.past().copied().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_zero_levels_is_unbounded() {
        let mut stack = UndoStack::with_max_levels(0);
        for i in 0..200 {
            stack.record(i, None);
        }
        assert_eq!(stack.undo_levels(), 200);
    }

    #[test]
    fn test_shrinking_bound_evicts() {
        let mut stack = UndoStack::with_max_levels(10);
        for i in 0..10 {
            stack.record(i, None);
        }
        stack.set_max_levels(3);
        assert_eq!(stack.past().copied().collect::<Vec<_>>(), vec![7, 8, 9]);
    }

    #[test]
    fn test_batched_records() {
        let mut stack = UndoStack::new();
        let mut value = 0;

        stack.begin_batch(Some("Update greeting"));
        stack.record(value, Some("first"));
        value = 1;
        stack.record(value, Some("second"));
        value = 2;
        stack.end_batch();

        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_label(), Some("Update greeting"));

        stack.undo(&mut value);
        assert_eq!(value, 0);
    }

    #[test]
    fn test_nested_batches_close_at_outermost() {
        let mut stack = UndoStack::new();
        stack.begin_batch(Some("outer"));
        stack.begin_batch(Some("inner"));
        stack.record(0, None);
        stack.end_batch();
        assert!(stack.in_batch());
        stack.record(1, None);
        stack.end_batch();
        assert!(!stack.in_batch());

        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_label(), Some("outer"));
    }

    #[test]
    fn test_coalescing_within_window() {
        let mut stack = UndoStack::new();
        let window = Duration::from_millis(500);
        let start = Duration::from_secs(10);

        assert!(stack.record_coalescing("", None, "title", window, start));
        assert!(!stack.record_coalescing("H", None, "title", window, start + Duration::from_millis(100)));
        assert!(!stack.record_coalescing("Hi", None, "title", window, start + Duration::from_millis(200)));
        assert_eq!(stack.undo_levels(), 1);

        // Past the window
        assert!(stack.record_coalescing("Hi!", None, "title", window, start + Duration::from_secs(2)));
        // Different key
        assert!(stack.record_coalescing("x", None, "subtitle", window, start + Duration::from_secs(2)));
        assert_eq!(stack.undo_levels(), 3);

        let mut current = "xy";
        stack.undo(&mut current);
        stack.undo(&mut current);
        stack.undo(&mut current);
        assert_eq!(current, "");
    }

    #[test]
    fn test_undo_breaks_coalescing() {
        let mut stack = UndoStack::new();
        let window = Duration::from_secs(60);
        let now = Duration::from_secs(10);
        let mut value = 0;

        stack.record_coalescing(value, None, "k", window, now);
        value = 1;
        stack.undo(&mut value);
        stack.redo(&mut value);

        assert!(stack.record_coalescing(value, None, "k", window, now));
        assert_eq!(stack.undo_levels(), 2);
    }

    #[test]
    fn test_batch_does_not_seed_coalescing() {
        let mut stack = UndoStack::new();
        let window = Duration::from_secs(60);
        let now = Duration::from_secs(10);

        stack.record(0, None);
        stack.begin_batch(Some("preset"));
        assert!(stack.record_coalescing(1, None, "k", window, now));
        stack.end_batch();

        assert!(stack.record_coalescing(2, None, "k", window, now));
        assert_eq!(stack.undo_levels(), 3);
    }

    #[test]
    fn test_break_coalescing_starts_new_step() {
        let mut stack = UndoStack::new();
        let window = Duration::from_secs(60);
        let now = Duration::from_secs(10);

        assert!(stack.record_coalescing(0, None, "k", window, now));
        stack.break_coalescing();
        assert!(stack.record_coalescing(1, None, "k", window, now));
        assert_eq!(stack.undo_levels(), 2);
    }
}
