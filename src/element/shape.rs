use egui::Pos2;
use serde::{Deserialize, Serialize};

use super::common::{clamp_extent, MIN_LINE_WIDTH};

/// Axis-aligned rectangle in image pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Axis-aligned ellipse described by center and radii
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipseGeometry {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
}

/// Straight segment with a stroke width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineGeometry {
    pub from: Pos2,
    pub to: Pos2,
    pub width: f32,
}

/// Closed polygon traced by hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreehandGeometry {
    pub points: Vec<Pos2>,
    #[serde(default = "closed_default")]
    pub closed: bool,
}

fn closed_default() -> bool {
    true
}

/// The geometric part of a redaction object.
///
/// Serialized as `{"type": "<kind>", "data": {...}}` so clipboard payloads stay
/// self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Shape {
    Rect(RectGeometry),
    Ellipse(EllipseGeometry),
    Line(LineGeometry),
    Freehand(FreehandGeometry),
}

impl Shape {
    /// Rectangle with each extent clamped to the minimum size
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Shape::Rect(RectGeometry {
            x,
            y,
            width: clamp_extent(width),
            height: clamp_extent(height),
        })
    }

    /// Ellipse whose diameters are clamped to the minimum size
    pub fn ellipse(cx: f32, cy: f32, rx: f32, ry: f32) -> Self {
        Shape::Ellipse(EllipseGeometry {
            cx,
            cy,
            rx: clamp_extent(rx * 2.0) / 2.0,
            ry: clamp_extent(ry * 2.0) / 2.0,
        })
    }

    pub fn line(from: Pos2, to: Pos2, width: f32) -> Self {
        Shape::Line(LineGeometry {
            from,
            to,
            width: width.max(MIN_LINE_WIDTH),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Rect(_) => "rect",
            Shape::Ellipse(_) => "ellipse",
            Shape::Line(_) => "line",
            Shape::Freehand(_) => "freehand",
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Shape::Line(_))
    }
}
