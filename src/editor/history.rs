//! Undo/redo history: a log of canvas snapshots plus a cursor.
//!
//! Snapshots are owned clones of the canvas. Undo and redo only move the
//! cursor; entries are never rewritten, and the log only grows through
//! [`History::record`].

use super::canvas::Canvas;

/// Snapshot log. Always holds at least one entry; `cursor` is in `[0, len - 1]`.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Canvas>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Canvas::default())
    }
}

impl History {
    /// Start a history whose only checkpoint is `initial`.
    pub fn new(initial: Canvas) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Append a checkpoint, dropping any redo branch beyond the cursor.
    pub fn record(&mut self, snapshot: Canvas) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back. Returns the snapshot now under the cursor, or `None` at the start.
    pub fn undo(&mut self) -> Option<&Canvas> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward. Returns the snapshot now under the cursor, or `None` at the end.
    pub fn redo(&mut self) -> Option<&Canvas> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    pub fn current(&self) -> &Canvas {
        &self.snapshots[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }
}
