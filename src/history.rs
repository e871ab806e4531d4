//! Undo/redo history as a bounded log of design snapshots.
//!
//! The log is append-only with truncate-on-branch: pushing after an undo
//! discards the redo tail. Once the log exceeds its limit the oldest entry is
//! dropped. Entries are independent clones, never aliased with the live design.
//!
//! `undo` and `redo` arm a one-shot latch that swallows the next `push`. The
//! caller is expected to install the returned snapshot as the live design and
//! then run its usual "record after change" path; the latch keeps that replay
//! from landing in the log as a new branch.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use tracing::debug;

use crate::consts::MAX_HISTORY_ENTRIES;
use crate::doc::Design;

/// Bounded snapshot log with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Design>,
    /// Position of the live design in `entries`. Meaningless while empty.
    index: usize,
    limit: usize,
    suppress_next_push: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Empty history bounded to [`MAX_HISTORY_ENTRIES`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(MAX_HISTORY_ENTRIES)
    }

    /// Empty history bounded to `limit` entries (at least one).
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self { entries: VecDeque::new(), index: 0, limit: limit.max(1), suppress_next_push: false }
    }

    /// Record `design` as the newest entry.
    ///
    /// Returns `false` when the push was swallowed by the undo/redo latch.
    pub fn push(&mut self, design: &Design) -> bool {
        if self.suppress_next_push {
            self.suppress_next_push = false;
            return false;
        }

        if !self.entries.is_empty() {
            let dropped = self.entries.len() - (self.index + 1);
            if dropped > 0 {
                debug!(dropped, "history: discarding redo branch");
            }
            self.entries.truncate(self.index + 1);
        }
        self.entries.push_back(design.clone());
        if self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.index = self.entries.len() - 1;
        true
    }

    /// Step back one entry and return that snapshot.
    ///
    /// Returns `None` at the oldest entry; the latch is only armed on success.
    pub fn undo(&mut self) -> Option<Design> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.suppress_next_push = true;
        self.entries.get(self.index).cloned()
    }

    /// Step forward one entry and return that snapshot.
    ///
    /// Returns `None` at the newest entry.
    pub fn redo(&mut self) -> Option<Design> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.suppress_next_push = true;
        self.entries.get(self.index).cloned()
    }

    /// Replace the whole log with a single entry.
    ///
    /// Used when a template is loaded or a blank design starts; clears the latch.
    pub fn reset(&mut self, design: &Design) {
        self.entries.clear();
        self.entries.push_back(design.clone());
        self.index = 0;
        self.suppress_next_push = false;
        debug!("history: reset");
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position, or `None` while the log is empty.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        if self.entries.is_empty() { None } else { Some(self.index) }
    }

    /// The snapshot under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Design> {
        self.entries.get(self.index)
    }

    /// Maximum number of snapshots kept.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether the next `push` will be swallowed.
    #[must_use]
    pub fn is_push_suppressed(&self) -> bool {
        self.suppress_next_push
    }
}
