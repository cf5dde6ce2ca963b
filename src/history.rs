//! Undo / redo for an editor buffer.
//!
//! Because ropes are persistent, a snapshot is just a rope handle plus the
//! cursor and dirty flag at the time. Nothing is copied: every snapshot shares
//! all its unchanged text with the live buffer.

use std::collections::VecDeque;
use crate::{Position, Rope};

/// The state of a buffer at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub rope: Rope,
    pub cursor: Position,
    pub dirty: bool,
}

impl Snapshot {
    pub fn new(rope: Rope, cursor: Position, dirty: bool) -> Self {
        Snapshot { rope, cursor, dirty }
    }
}

#[derive(Debug, Clone, Default)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,

    /// Maximum number of undo steps kept. None is unbounded.
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// A history which only remembers the most recent limit undo steps.
    pub fn with_limit(limit: usize) -> Self {
        History { limit: Some(limit), ..Self::default() }
    }

    /// Record the state before an edit. This invalidates anything which could
    /// have been redone.
    pub fn save(&mut self, snapshot: Snapshot) {
        self.undo.push_back(snapshot);
        self.redo.clear();

        if let Some(limit) = self.limit {
            while self.undo.len() > limit {
                self.undo.pop_front();
            }
        }
    }

    /// Step back. current is the live state, which becomes redoable. Returns
    /// the state to restore, or None if there's nothing to undo (in which
    /// case current is dropped and nothing changes).
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.undo.pop_back()?;
        log::debug!("undo: {} undo / {} redo steps remain", self.undo.len(), self.redo.len() + 1);
        self.redo.push(current);
        Some(prev)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        log::debug!("redo: {} undo / {} redo steps remain", self.undo.len() + 1, self.redo.len());
        self.undo.push_back(current);
        Some(next)
    }

    /// The rope an undo would restore.
    pub fn undo_top(&self) -> Option<&Rope> {
        self.undo.back().map(|s| &s.rope)
    }

    pub fn can_undo(&self) -> bool { !self.undo.is_empty() }
    pub fn can_redo(&self) -> bool { !self.redo.is_empty() }

    pub fn undo_len(&self) -> usize { self.undo.len() }
    pub fn redo_len(&self) -> usize { self.redo.len() }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
