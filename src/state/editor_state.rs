//! The pointer gesture state machine of the canvas.
//!
//! Every gesture starts from `Idle` and ends back in `Idle`; there are no
//! direct transitions between gestures.
//!
//! ```text
//!              ┌──────────┐
//!         ┌────►  Drawing ├────┐
//!         │    └──────────┘    │
//! ┌──────┐│    ┌──────────┐    │┌──────┐
//! │ Idle ├┼────►  Moving  ├────┼► Idle │
//! └──────┘│    └──────────┘    │└──────┘
//!         │    ┌──────────┐    │
//!         └────► Resizing ├────┘
//!              └──────────┘
//! ```
//!
//! Each gesture carries the object list as it was when the gesture began, so
//! per-frame updates are computed from that snapshot instead of accumulating, and
//! pointer release can commit one `before`/`after` pair.
use std::collections::BTreeSet;

use eframe::egui::Pos2;

use crate::element::RedactionObject;
use crate::error::TransitionError;
use crate::geometry::ResizeHandle;
use crate::tools::ToolType;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorState {
    /// No active gesture
    #[default]
    Idle,
    /// Dragging out a new shape with a drawing tool
    Drawing {
        tool: ToolType,
        start: Pos2,
        /// Traced points, only used by the freehand tool
        points: Vec<Pos2>,
        before: Vec<RedactionObject>,
    },
    /// Translating the target objects
    Moving {
        start: Pos2,
        before: Vec<RedactionObject>,
        target_ids: BTreeSet<String>,
    },
    /// Dragging a handle of a single object
    Resizing {
        before: Vec<RedactionObject>,
        object_id: String,
        handle: ResizeHandle,
    },
}

impl EditorState {
    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "idle",
            EditorState::Drawing { .. } => "drawing",
            EditorState::Moving { .. } => "moving",
            EditorState::Resizing { .. } => "resizing",
        }
    }

    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        match (self, new_state) {
            // A gesture can only begin from Idle
            (EditorState::Idle, _) => true,
            // Every gesture ends (or is cancelled) back in Idle
            (_, EditorState::Idle) => true,
            _ => false,
        }
    }

    /// Replaces the state if the transition is allowed; otherwise leaves it untouched
    pub fn transition_to(&mut self, new_state: EditorState) -> Result<(), TransitionError> {
        if !self.can_transition_to(&new_state) {
            return Err(TransitionError::InvalidStateTransition {
                from: self.name(),
                to: new_state.name(),
            });
        }
        *self = new_state;
        Ok(())
    }

    /// Returns to Idle and yields the state that was active
    pub fn finish(&mut self) -> EditorState {
        std::mem::take(self)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, EditorState::Drawing { .. })
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, EditorState::Moving { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, EditorState::Resizing { .. })
    }

    /// Object list captured when the active gesture began
    pub fn before(&self) -> Option<&[RedactionObject]> {
        match self {
            EditorState::Idle => None,
            EditorState::Drawing { before, .. }
            | EditorState::Moving { before, .. }
            | EditorState::Resizing { before, .. } => Some(before),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn drawing() -> EditorState {
        EditorState::Drawing {
            tool: ToolType::Rect,
            start: pos2(0.0, 0.0),
            points: Vec::new(),
            before: Vec::new(),
        }
    }

    fn moving() -> EditorState {
        EditorState::Moving {
            start: pos2(0.0, 0.0),
            before: Vec::new(),
            target_ids: BTreeSet::new(),
        }
    }

    #[test]
    fn test_gestures_start_from_idle_only() {
        let mut state = EditorState::Idle;
        assert!(state.transition_to(drawing()).is_ok());
        assert!(state.is_drawing());

        let err = state.transition_to(moving()).unwrap_err();
        assert_eq!(err, TransitionError::InvalidStateTransition { from: "drawing", to: "moving" });
        assert!(state.is_drawing());
    }

    #[test]
    fn test_finish_returns_previous_state() {
        let mut state = moving();
        let previous = state.finish();
        assert!(previous.is_moving());
        assert!(state.is_idle());
        assert!(state.before().is_none());
        assert_eq!(previous.before(), Some(&[][..]));
    }
}
