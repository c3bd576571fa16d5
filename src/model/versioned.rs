use std::sync::Arc;

use super::issue::{Issue, IssueList};

/// Undo/redo boundary errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("no more commands to undo")]
    NoUndoableState,
    #[error("no more commands to redo")]
    NoRedoableState,
}

/// The live issue collection plus a linear history of full snapshots.
///
/// `states` is never empty and `pointer` always indexes into it. The live
/// collection may run ahead of `states[pointer]` while a command is being
/// applied; `commit` captures it.
#[derive(Debug, Clone)]
pub struct VersionedIssueBook {
    live: IssueList,
    states: Vec<Arc<IssueList>>,
    pointer: usize,
    /// Maximum number of undo steps kept (None = unbounded)
    undo_limit: Option<usize>,
}

impl Default for VersionedIssueBook {
    fn default() -> Self {
        Self::new(IssueList::new())
    }
}

impl VersionedIssueBook {
    /// Start a history whose only snapshot is `initial`.
    pub fn new(initial: IssueList) -> Self {
        VersionedIssueBook {
            states: vec![Arc::new(initial.clone())],
            live: initial,
            pointer: 0,
            undo_limit: None,
        }
    }

    pub fn with_undo_limit(mut self, limit: Option<usize>) -> Self {
        self.undo_limit = limit;
        self.enforce_limit();
        self
    }

    /// The live collection.
    pub fn issues(&self) -> &IssueList {
        &self.live
    }

    /// Mutable access to the live collection. Changes become an undo point
    /// only once [`commit`](Self::commit) is called.
    pub fn issues_mut(&mut self) -> &mut IssueList {
        &mut self.live
    }

    /// Convenience: the live collection as a slice.
    pub fn as_slice(&self) -> &[Issue] {
        self.live.as_slice()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn snapshot_count(&self) -> usize {
        self.states.len()
    }


    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.states.len()
    }

    /// Record the live collection as a new undo point, discarding any redo
    /// branch past the pointer.
    pub fn commit(&mut self) {
        self.states.truncate(self.pointer + 1);
        self.states.push(Arc::new(self.live.clone()));
        self.pointer += 1;
        self.enforce_limit();
        tracing::debug!(
            pointer = self.pointer,
            snapshots = self.states.len(),
            "committed snapshot"
        );
    }

    /// Fold the live collection into the current snapshot without adding
    /// an undo point. Used for bookkeeping that is not itself undoable.
    pub fn amend_current(&mut self) {
        self.states[self.pointer] = Arc::new(self.live.clone());
        tracing::debug!(pointer = self.pointer, "amended snapshot");
    }

    /// Step back one snapshot and restore the live collection from it.
    pub fn undo(&mut self) -> Result<(), HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::NoUndoableState);
        }
        self.pointer -= 1;
        self.restore();
        tracing::debug!(pointer = self.pointer, "undo");
        Ok(())
    }

    /// Step forward one snapshot and restore the live collection from it.
    pub fn redo(&mut self) -> Result<(), HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::NoRedoableState);
        }
        self.pointer += 1;
        self.restore();
        tracing::debug!(pointer = self.pointer, "redo");
        Ok(())
    }

    fn restore(&mut self) {
        self.live = self.states[self.pointer].as_ref().clone();
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.undo_limit else {
            return;
        };
        let max_states = limit + 1;
        if self.states.len() > max_states {
            let excess = self.states.len() - max_states;
            let dropped = excess.min(self.pointer);
            self.states.drain(..dropped);
            self.pointer -= dropped;
        }
    }
}

impl PartialEq for VersionedIssueBook {
    /// Equal when the snapshot sequences and pointers match.
    fn eq(&self, other: &Self) -> bool {
        self.pointer == other.pointer && self.states == other.states
    }
}

impl Eq for VersionedIssueBook {}
