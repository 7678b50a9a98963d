//! Content provider contract: the iterator-like collaborator supplying the
//! sequence of game content items (questions, tracks, prompts).
//!
//! The core and phase controllers only ever call the three operations below;
//! they never inspect provider internals. Real providers (filesystem,
//! network) live outside this workspace; [`VecContentProvider`] is the
//! in-memory implementation used by modules with embedded content and by
//! tests.

use serde::{Deserialize, Serialize};

/// Position within a content sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Zero-based index of the current item.
    pub index: usize,
    /// Total number of items in the sequence.
    pub total: usize,
}

/// Narrow iterator contract over a sequence of content items.
pub trait ContentProvider<T: Clone>: Send {
    /// The current item, or `None` for an empty sequence.
    fn current(&self) -> Option<T>;

    /// Advance to the next item and return it, or `None` at the end of the
    /// sequence. At the end the cursor does not move.
    fn next(&mut self) -> Option<T>;

    /// Current position and total item count.
    fn progress(&self) -> Progress;
}

/// In-memory content provider over a fixed item list.
#[derive(Debug, Clone)]
pub struct VecContentProvider<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T: Clone> VecContentProvider<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, cursor: 0 }
    }

    /// Rewind to the first item (used when a run restarts).
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone + Send> ContentProvider<T> for VecContentProvider<T> {
    fn current(&self) -> Option<T> {
        self.items.get(self.cursor).cloned()
    }

    fn next(&mut self) -> Option<T> {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
            self.items.get(self.cursor).cloned()
        } else {
            None
        }
    }

    fn progress(&self) -> Progress {
        Progress {
            index: self.cursor,
            total: self.items.len(),
        }
    }
}
