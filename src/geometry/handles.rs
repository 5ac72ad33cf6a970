use egui::{CursorIcon, Pos2};
use serde::{Deserialize, Serialize};

use crate::element::Shape;

/// A grab point on a selected shape.
///
/// Box shapes expose the eight compass handles; lines expose their two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
    Start,
    End,
}

impl ResizeHandle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::Ne => "ne",
            ResizeHandle::E => "e",
            ResizeHandle::Se => "se",
            ResizeHandle::S => "s",
            ResizeHandle::Sw => "sw",
            ResizeHandle::W => "w",
            ResizeHandle::Nw => "nw",
            ResizeHandle::Start => "start",
            ResizeHandle::End => "end",
        }
    }

    /// True for the line endpoint handles
    pub fn is_endpoint(&self) -> bool {
        matches!(self, ResizeHandle::Start | ResizeHandle::End)
    }

    pub(crate) fn moves_left(&self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::Nw | ResizeHandle::Sw)
    }

    pub(crate) fn moves_right(&self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::Ne | ResizeHandle::Se)
    }

    pub(crate) fn moves_top(&self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::Ne | ResizeHandle::Nw)
    }

    pub(crate) fn moves_bottom(&self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::Se | ResizeHandle::Sw)
    }

    /// Cursor hint shown while hovering or dragging this handle
    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            ResizeHandle::Start | ResizeHandle::End => CursorIcon::Grab,
            ResizeHandle::N | ResizeHandle::S => CursorIcon::ResizeVertical,
            ResizeHandle::E | ResizeHandle::W => CursorIcon::ResizeHorizontal,
            ResizeHandle::Ne | ResizeHandle::Sw => CursorIcon::ResizeNeSw,
            ResizeHandle::Nw | ResizeHandle::Se => CursorIcon::ResizeNwSe,
        }
    }
}

/// A handle and where it sits in image space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlePoint {
    pub handle: ResizeHandle,
    pub point: Pos2,
}

/// Handle positions for a shape: corners and edge midpoints of the bounding box,
/// or the two endpoints of a line.
pub fn handles_for(shape: &Shape) -> Vec<HandlePoint> {
    if let Shape::Line(line) = shape {
        return vec![
            HandlePoint { handle: ResizeHandle::Start, point: line.from },
            HandlePoint { handle: ResizeHandle::End, point: line.to },
        ];
    }

    let bounds = super::bounds_of(shape);
    let center = bounds.center();

    vec![
        HandlePoint { handle: ResizeHandle::Nw, point: bounds.left_top() },
        HandlePoint { handle: ResizeHandle::N, point: Pos2::new(center.x, bounds.top()) },
        HandlePoint { handle: ResizeHandle::Ne, point: bounds.right_top() },
        HandlePoint { handle: ResizeHandle::E, point: Pos2::new(bounds.right(), center.y) },
        HandlePoint { handle: ResizeHandle::Se, point: bounds.right_bottom() },
        HandlePoint { handle: ResizeHandle::S, point: Pos2::new(center.x, bounds.bottom()) },
        HandlePoint { handle: ResizeHandle::Sw, point: bounds.left_bottom() },
        HandlePoint { handle: ResizeHandle::W, point: Pos2::new(bounds.left(), center.y) },
    ]
}

/// Directional resize cursor for a handle, `Grab` for line endpoints
pub fn cursor_for(handle: ResizeHandle) -> CursorIcon {
    handle.cursor_icon()
}
