use serde::{Deserialize, Serialize};

mod common;
mod shape;
mod style;

pub use common::{distance_to_line_segment, MIN_ELEMENT_SIZE, MIN_LINE_WIDTH};
pub(crate) use common::{calculate_bounds, clamp_extent};
pub use shape::{EllipseGeometry, FreehandGeometry, LineGeometry, RectGeometry, Shape};
pub use style::{
    clamp_alpha, clamp_block_size, parse_hex_color, to_hex_color, FillParams, MarkParams,
    PixelateParams, RedactionMode, StyleParams, MAX_ALPHA, MAX_BLOCK_SIZE, MAX_STROKE_WIDTH,
    MIN_ALPHA, MIN_BLOCK_SIZE, MIN_STROKE_WIDTH,
};

use crate::id_generator::generate_id;
use crate::util::time;

/// One shape + style + visibility entity of the document.
///
/// Objects are values: edits produce a new object through [`RedactionObject::with_shape`]
/// or [`RedactionObject::with_style`] and the document swaps it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionObject {
    pub id: String,
    pub shape: Shape,
    pub style: StyleParams,
    pub visible: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

impl RedactionObject {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Copy of this object with a new shape and a bumped `updated_at`
    pub fn with_shape(&self, shape: Shape) -> Self {
        Self {
            shape,
            updated_at: time::now_millis(),
            ..self.clone()
        }
    }

    /// Copy of this object with a new style and a bumped `updated_at`
    pub fn with_style(&self, style: StyleParams) -> Self {
        Self {
            style,
            updated_at: time::now_millis(),
            ..self.clone()
        }
    }

    pub fn with_visibility(&self, visible: bool) -> Self {
        Self {
            visible,
            updated_at: time::now_millis(),
            ..self.clone()
        }
    }

    /// Stroke width used when this object's shape is stroked instead of filled.
    /// Line shapes carry their own width; mark mode uses the mark width for every shape.
    pub fn stroke_width(&self) -> f32 {
        match (&self.style.mode, &self.shape) {
            (RedactionMode::Mark, _) => self.style.mark.stroke_width as f32,
            (RedactionMode::Fill, Shape::Line(_)) => self.style.line_width as f32,
            (_, Shape::Line(line)) => line.width,
            _ => 0.0,
        }
    }
}

/// Factory functions for creating redaction objects
pub mod factory {
    use super::*;

    /// Create a visible object with a fresh id and timestamps
    pub fn create_object(shape: Shape, style: StyleParams) -> RedactionObject {
        let now = time::now_millis();
        RedactionObject {
            id: generate_id(),
            shape,
            style,
            visible: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_assigns_unique_ids() {
        let a = factory::create_object(Shape::rect(0.0, 0.0, 10.0, 10.0), StyleParams::default());
        let b = factory::create_object(Shape::rect(0.0, 0.0, 10.0, 10.0), StyleParams::default());
        assert_ne!(a.id, b.id);
        assert!(a.visible);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_with_shape_keeps_identity() {
        let object = factory::create_object(Shape::rect(0.0, 0.0, 10.0, 10.0), StyleParams::default());
        let moved = object.with_shape(Shape::rect(5.0, 5.0, 10.0, 10.0));
        assert_eq!(moved.id, object.id);
        assert_eq!(moved.created_at, object.created_at);
        assert!(moved.updated_at >= object.updated_at);
        assert_ne!(moved.shape, object.shape);
    }

    #[test]
    fn test_stroke_width_follows_mode() {
        let line = Shape::line(egui::pos2(0.0, 0.0), egui::pos2(10.0, 0.0), 8.0);
        let mut style = StyleParams::default();
        let object = factory::create_object(line, style.clone());
        assert_eq!(object.stroke_width(), 8.0);

        style.mode = RedactionMode::Fill;
        assert_eq!(object.with_style(style.clone()).stroke_width(), style.line_width as f32);

        style.mode = RedactionMode::Mark;
        assert_eq!(object.with_style(style.clone()).stroke_width(), style.mark.stroke_width as f32);
    }

    #[test]
    fn test_object_json_uses_camel_case() {
        let object = factory::create_object(Shape::rect(1.0, 2.0, 3.0, 4.0), StyleParams::default());
        let json = serde_json::to_value(&object).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["shape"]["type"], "rect");
    }
}
