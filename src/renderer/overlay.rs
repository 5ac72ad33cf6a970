//! Selection and draft indicators, built as egui shapes in screen space so line
//! widths and dash lengths stay constant at any zoom. They are rebuilt every
//! frame from the document and never touch the composited image.

use std::f32::consts::TAU;

use egui::{Color32, Pos2, Stroke, Vec2};

use crate::element::{EllipseGeometry, FreehandGeometry, LineGeometry, RectGeometry, RedactionObject, Shape};
use crate::geometry::{bounds_of, handles_for};
use crate::viewport::ViewportTransform;

pub const SELECTION_COLOR: Color32 = Color32::from_rgb(0x31, 0xd0, 0xff);
pub const SELECTION_DASH: [f32; 2] = [8.0, 6.0];
pub const HANDLE_RADIUS: f32 = 5.0;

pub const DRAFT_STROKE_COLOR: Color32 = Color32::from_rgb(0xf9, 0x73, 0x16);
/// rgba(249, 115, 22, 0.24), premultiplied
pub const DRAFT_FILL_COLOR: Color32 = Color32::from_rgba_premultiplied(60, 28, 5, 61);
pub const DRAFT_DASH: [f32; 2] = [6.0, 4.0];

const OUTLINE_WIDTH: f32 = 1.0;

/// Maps a shape from image space into container space
pub fn shape_to_screen(shape: &Shape, transform: &ViewportTransform) -> Shape {
    let map = |point: Pos2| transform.to_screen_point(point);
    let scale = transform.scale;

    match shape {
        Shape::Rect(rect) => {
            let origin = map(Pos2::new(rect.x, rect.y));
            Shape::Rect(RectGeometry {
                x: origin.x,
                y: origin.y,
                width: rect.width * scale,
                height: rect.height * scale,
            })
        }
        Shape::Ellipse(ellipse) => {
            let center = map(Pos2::new(ellipse.cx, ellipse.cy));
            Shape::Ellipse(EllipseGeometry {
                cx: center.x,
                cy: center.y,
                rx: ellipse.rx * scale,
                ry: ellipse.ry * scale,
            })
        }
        Shape::Line(line) => Shape::Line(LineGeometry {
            from: map(line.from),
            to: map(line.to),
            width: line.width * scale,
        }),
        Shape::Freehand(freehand) => Shape::Freehand(FreehandGeometry {
            points: freehand.points.iter().copied().map(map).collect(),
            closed: freehand.closed,
        }),
    }
}

/// Polyline through a shape's outline. Closed outlines end where they start.
fn outline_points(shape: &Shape, origin: Vec2) -> Vec<Pos2> {
    let mut points: Vec<Pos2> = match shape {
        Shape::Rect(_) => {
            let bounds = bounds_of(shape);
            vec![bounds.left_top(), bounds.right_top(), bounds.right_bottom(), bounds.left_bottom()]
        }
        Shape::Ellipse(ellipse) => {
            let segments = (ellipse.rx.max(ellipse.ry) * TAU / 4.0).ceil().clamp(24.0, 256.0) as usize;
            (0..segments)
                .map(|step| {
                    let angle = step as f32 / segments as f32 * TAU;
                    Pos2::new(ellipse.cx + ellipse.rx * angle.cos(), ellipse.cy + ellipse.ry * angle.sin())
                })
                .collect()
        }
        Shape::Line(line) => vec![line.from, line.to],
        Shape::Freehand(freehand) => freehand.points.clone(),
    };

    let closed = match shape {
        Shape::Line(_) => false,
        Shape::Freehand(freehand) => freehand.closed,
        _ => true,
    };
    if let (true, Some(first)) = (closed, points.first().copied()) {
        points.push(first);
    }

    points.into_iter().map(|point| point + origin).collect()
}

/// Dashed outlines and handle dots for every selected object. `origin` is the
/// canvas position in window coordinates.
pub fn selection_shapes(transform: &ViewportTransform, origin: Vec2, selected: &[&RedactionObject]) -> Vec<egui::Shape> {
    let mut shapes = Vec::new();

    for object in selected {
        let screen = shape_to_screen(&object.shape, transform);
        let width = if screen.is_line() { object.style.line_width as f32 } else { OUTLINE_WIDTH };
        shapes.extend(egui::Shape::dashed_line(
            &outline_points(&screen, origin),
            Stroke::new(width, SELECTION_COLOR),
            SELECTION_DASH[0],
            SELECTION_DASH[1],
        ));
    }

    for object in selected {
        for handle in handles_for(&object.shape) {
            let center = transform.to_screen_point(handle.point) + origin;
            shapes.push(egui::Shape::circle_filled(center, HANDLE_RADIUS, SELECTION_COLOR));
        }
    }

    shapes
}

/// Translucent preview of the shape being drawn. Freehand drafts are still
/// open strokes and get no fill.
pub fn draft_shapes(transform: &ViewportTransform, origin: Vec2, draft: &RedactionObject) -> Vec<egui::Shape> {
    let screen = shape_to_screen(&draft.shape, transform);
    let mut points = outline_points(&screen, origin);

    if screen.is_line() {
        let stroke = Stroke::new(draft.style.line_width as f32, DRAFT_STROKE_COLOR);
        return egui::Shape::dashed_line(&points, stroke, DRAFT_DASH[0], DRAFT_DASH[1]);
    }

    let outline = egui::Shape::dashed_line(
        &points,
        Stroke::new(OUTLINE_WIDTH, DRAFT_STROKE_COLOR),
        DRAFT_DASH[0],
        DRAFT_DASH[1],
    );

    let mut shapes = Vec::with_capacity(outline.len() + 1);
    if matches!(screen, Shape::Rect(_) | Shape::Ellipse(_)) {
        points.pop();
        shapes.push(egui::Shape::convex_polygon(points, DRAFT_FILL_COLOR, Stroke::NONE));
    }
    shapes.extend(outline);
    shapes
}
