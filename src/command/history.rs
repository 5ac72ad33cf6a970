use log::debug;

use super::{CommandType, HistoryCommand};
use crate::element::RedactionObject;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Linear undo/redo over object-list snapshots
#[derive(Debug, Clone)]
pub struct CommandHistory {
    /// Stack of commands that can be undone
    undo_stack: Vec<HistoryCommand>,
    /// Stack of commands that can be redone
    redo_stack: Vec<HistoryCommand>,
    /// Maximum number of undo entries kept
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl CommandHistory {
    /// Creates a new empty command history holding at most `limit` undo steps
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record a completed action. Returns false when `before == after` and
    /// nothing was recorded. A recorded action clears the redo stack and evicts
    /// the oldest entries beyond the limit.
    pub fn commit(&mut self, kind: CommandType, before: &[RedactionObject], after: &[RedactionObject]) -> bool {
        let Some(command) = HistoryCommand::new(kind, before, after) else {
            return false;
        };

        self.undo_stack.push(command);
        if self.undo_stack.len() > self.limit {
            let excess = self.undo_stack.len() - self.limit;
            self.undo_stack.drain(..excess);
        }
        self.redo_stack.clear();

        debug!("Committed {} (undo depth {})", kind.label(), self.undo_stack.len());
        true
    }

    /// Undo the last command and return the object list to restore
    pub fn undo(&mut self) -> Option<Vec<RedactionObject>> {
        let command = self.undo_stack.pop()?;
        let objects = command.before.clone();
        self.redo_stack.push(command);
        Some(objects)
    }

    /// Redo the last undone command and return the object list to restore
    pub fn redo(&mut self) -> Option<Vec<RedactionObject>> {
        let command = self.redo_stack.pop()?;
        let objects = command.after.clone();
        self.undo_stack.push(command);
        Some(objects)
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &[HistoryCommand] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[HistoryCommand] {
        &self.redo_stack
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
