use serde::{Deserialize, Serialize};

use crate::element::RedactionObject;

/// What kind of user action a history entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Add,
    Delete,
    Update,
}

impl CommandType {
    pub fn label(&self) -> &'static str {
        match self {
            CommandType::Add => "Add",
            CommandType::Delete => "Delete",
            CommandType::Update => "Update",
        }
    }
}

/// A complete user action, stored as the object list before and after it.
///
/// Both snapshots are owned copies; nothing outside the history can reach them.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryCommand {
    pub kind: CommandType,
    pub before: Vec<RedactionObject>,
    pub after: Vec<RedactionObject>,
}

impl HistoryCommand {
    /// Snapshots both lists. Returns `None` when they are structurally identical,
    /// since such a command would be a no-op step in the undo stack.
    pub fn new(kind: CommandType, before: &[RedactionObject], after: &[RedactionObject]) -> Option<Self> {
        if before == after {
            return None;
        }
        Some(Self {
            kind,
            before: before.to_vec(),
            after: after.to_vec(),
        })
    }
}
