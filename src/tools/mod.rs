use egui::CursorIcon;
use serde::{Deserialize, Serialize};

/// The active tool of the editor. Every tool except `Select` draws a new shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    #[default]
    Select,
    Rect,
    Ellipse,
    Line,
    Freehand,
}

impl ToolType {
    pub const ALL: [ToolType; 5] = [
        ToolType::Select,
        ToolType::Rect,
        ToolType::Ellipse,
        ToolType::Line,
        ToolType::Freehand,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolType::Select => "Select",
            ToolType::Rect => "Rectangle",
            ToolType::Ellipse => "Ellipse",
            ToolType::Line => "Line",
            ToolType::Freehand => "Freehand",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ToolType::Select => "⬉",
            ToolType::Rect => "▭",
            ToolType::Ellipse => "◯",
            ToolType::Line => "╱",
            ToolType::Freehand => "✎",
        }
    }

    pub fn is_drawing(&self) -> bool {
        !matches!(self, ToolType::Select)
    }

    /// Cursor shown while idle over the canvas
    pub fn idle_cursor(&self) -> CursorIcon {
        if self.is_drawing() {
            CursorIcon::Crosshair
        } else {
            CursorIcon::Default
        }
    }
}
