#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Linear undo/redo history built from whole-game snapshots.
//!
//! The host records the pre-mutation snapshot before every state-mutating
//! action; undo and redo exchange snapshots with the live state. The undo
//! stack is bounded: beyond the configured depth the oldest snapshot is
//! evicted, so memory stays proportional to the depth rather than to the
//! length of the play session.

use std::collections::VecDeque;

use thiserror::Error;
use tilegarden_core::GameSnapshot;

/// Default maximum number of snapshots retained on the undo stack.
pub const DEFAULT_DEPTH: usize = 64;

/// Raised when undo or redo is requested with nothing to pop.
///
/// A reported no-op: the caller logs it and leaves state unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("history has nothing to pop")]
pub struct EmptyHistory;

/// Two-stack snapshot history with push/pop/clear discipline.
#[derive(Debug)]
pub struct History {
    undo: VecDeque<GameSnapshot>,
    redo: Vec<GameSnapshot>,
    depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Creates an empty history with the default depth.
    #[must_use]
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_DEPTH)
    }

    /// Creates an empty history retaining at most `depth` undo snapshots.
    #[must_use]
    pub fn with_depth(depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            depth: depth.max(1),
        }
    }

    /// Records the pre-mutation snapshot of a state-mutating action.
    ///
    /// Pushes onto the undo stack, evicting the oldest entry beyond the
    /// configured depth, and unconditionally discards the redo branch.
    pub fn record(&mut self, snapshot: GameSnapshot) {
        self.push_undo(snapshot);
        self.redo.clear();
    }

    /// Pops the most recent undo snapshot, parking `current` for redo.
    ///
    /// The live state the caller passes in becomes redoable; the returned
    /// snapshot is what the caller should restore.
    pub fn undo(&mut self, current: GameSnapshot) -> Result<GameSnapshot, EmptyHistory> {
        let previous = self.undo.pop_back().ok_or(EmptyHistory)?;
        self.redo.push(current);
        Ok(previous)
    }

    /// Pops the most recent redo snapshot, parking `current` for undo.
    pub fn redo(&mut self, current: GameSnapshot) -> Result<GameSnapshot, EmptyHistory> {
        let next = self.redo.pop().ok_or(EmptyHistory)?;
        self.push_undo(current);
        Ok(next)
    }

    /// Number of snapshots available to undo.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of snapshots available to redo.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    fn push_undo(&mut self, snapshot: GameSnapshot) {
        if self.undo.len() == self.depth {
            let _ = self.undo.pop_front();
        }
        self.undo.push_back(snapshot);
    }
}
