//! # Mutation Log
//!
//! The ordered, truncatable record of a session's past edit commands.
//!
//! A cursor (`count`) separates "applied" entries from entries that are
//! only available for redo: `entries[..count]` produced the current tree,
//! `entries[count..]` is the redo branch. Recording a new command while the
//! cursor sits before the end discards that branch, which is exactly the
//! "editing after an undo erases redo" rule.

use crate::Command;

/// Per-session record of logged commands plus the applied/redoable cursor.
#[derive(Debug, Clone, Default)]
pub struct MutationLog {
    entries: Vec<Command>,
    count: usize,
}

impl MutationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly issued command: truncate the redo branch, append,
    /// and advance the cursor.
    pub fn record(&mut self, command: Command) {
        self.entries.truncate(self.count);
        self.entries.push(command);
        self.count += 1;
    }

    /// Advance the cursor without touching the entries. Used when a
    /// command is replayed from the log itself (undo rebuild, redo).
    pub fn mark_replayed(&mut self) {
        self.count += 1;
    }

    /// Number of currently applied entries.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Total number of logged entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of redoable steps.
    pub fn redoable(&self) -> usize {
        self.entries.len() - self.count
    }

    pub fn entries(&self) -> &[Command] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&Command> {
        self.entries.get(index)
    }

    /// Drop all entries and reset the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.count = 0;
    }

    /// Reinstate a snapshotted entry list and cursor after a replay
    /// rebuild, preserving the redo branch.
    pub(crate) fn reinstate(&mut self, entries: Vec<Command>, count: usize) {
        debug_assert!(count <= entries.len());
        self.entries = entries;
        self.count = count;
    }
}
