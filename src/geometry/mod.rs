//! Shape construction from gestures, bounds, translation and handle resizing.
//!
//! Every function here is pure: it takes a shape by reference and returns a new one.

pub mod handles;
pub mod hit_testing;

use egui::{Pos2, Rect, Vec2};

use crate::element::{
    calculate_bounds, clamp_extent, EllipseGeometry, FreehandGeometry, LineGeometry, Shape,
    MIN_ELEMENT_SIZE,
};
use crate::tools::ToolType;

pub use handles::{cursor_for, handles_for, HandlePoint, ResizeHandle};
pub use hit_testing::{hit_test_handles, hit_test_objects, HitKind, HitResult};

/// Normalizes two drag points into a box with positive, clamped extents
fn rect_from_points(a: Pos2, b: Pos2) -> Rect {
    let min = Pos2::new(a.x.min(b.x), a.y.min(b.y));
    let size = Vec2::new(clamp_extent((b.x - a.x).abs()), clamp_extent((b.y - a.y).abs()));
    Rect::from_min_size(min, size)
}

fn ellipse_in(bounds: Rect) -> Shape {
    let center = bounds.center();
    Shape::Ellipse(EllipseGeometry {
        cx: center.x,
        cy: center.y,
        rx: bounds.width() / 2.0,
        ry: bounds.height() / 2.0,
    })
}

/// Builds the shape for a drag gesture of a drawing tool.
///
/// Returns `None` for the select tool, which never draws.
pub fn create_from_drag(tool: ToolType, start: Pos2, current: Pos2, stroke_width: f32) -> Option<Shape> {
    match tool {
        ToolType::Select => None,
        ToolType::Rect => {
            let bounds = rect_from_points(start, current);
            Some(Shape::rect(bounds.min.x, bounds.min.y, bounds.width(), bounds.height()))
        }
        ToolType::Ellipse => Some(ellipse_in(rect_from_points(start, current))),
        ToolType::Line => Some(Shape::line(start, current, stroke_width)),
        ToolType::Freehand => Some(create_freehand(&[start, current])),
    }
}

/// Closes a traced point list into a polygon.
///
/// A single point is duplicated and the first point is appended when the trace
/// does not already end where it started.
pub fn create_freehand(points: &[Pos2]) -> Shape {
    let mut normalized: Vec<Pos2> = if points.len() < 2 {
        points.iter().chain(points.iter()).copied().collect()
    } else {
        points.to_vec()
    };

    if let (Some(first), Some(last)) = (normalized.first().copied(), normalized.last().copied()) {
        if first != last {
            normalized.push(first);
        }
    }

    Shape::Freehand(FreehandGeometry {
        points: normalized,
        closed: true,
    })
}

/// Axis-aligned bounding box in image space.
/// Lines are expanded by half their stroke width on every side.
pub fn bounds_of(shape: &Shape) -> Rect {
    match shape {
        Shape::Rect(rect) => Rect::from_min_size(
            Pos2::new(rect.x, rect.y),
            Vec2::new(rect.width, rect.height),
        ),
        Shape::Ellipse(ellipse) => Rect::from_min_size(
            Pos2::new(ellipse.cx - ellipse.rx, ellipse.cy - ellipse.ry),
            Vec2::new(ellipse.rx * 2.0, ellipse.ry * 2.0),
        ),
        Shape::Line(line) => {
            let half = line.width / 2.0;
            let min_x = line.from.x.min(line.to.x);
            let min_y = line.from.y.min(line.to.y);
            let max_x = line.from.x.max(line.to.x);
            let max_y = line.from.y.max(line.to.y);
            Rect::from_min_size(
                Pos2::new(min_x - half, min_y - half),
                Vec2::new(
                    clamp_extent(max_x - min_x + line.width),
                    clamp_extent(max_y - min_y + line.width),
                ),
            )
        }
        Shape::Freehand(freehand) => calculate_bounds(&freehand.points),
    }
}

/// Translates every control point of the shape
pub fn move_shape(shape: &Shape, delta: Vec2) -> Shape {
    match shape {
        Shape::Rect(rect) => {
            let mut rect = *rect;
            rect.x += delta.x;
            rect.y += delta.y;
            Shape::Rect(rect)
        }
        Shape::Ellipse(ellipse) => {
            let mut ellipse = *ellipse;
            ellipse.cx += delta.x;
            ellipse.cy += delta.y;
            Shape::Ellipse(ellipse)
        }
        Shape::Line(line) => Shape::Line(LineGeometry {
            from: line.from + delta,
            to: line.to + delta,
            width: line.width,
        }),
        Shape::Freehand(freehand) => Shape::Freehand(FreehandGeometry {
            points: freehand.points.iter().map(|p| *p + delta).collect(),
            closed: freehand.closed,
        }),
    }
}

/// Moves the edges named by a compass handle to `point`, keeping the opposite edges
/// fixed and never letting the box get thinner than the minimum size.
fn resize_bounds_by_handle(bounds: Rect, handle: ResizeHandle, point: Pos2) -> Rect {
    let (left, right, top, bottom) = (bounds.left(), bounds.right(), bounds.top(), bounds.bottom());
    let mut next = (left, right, top, bottom);

    if handle.moves_left() {
        next.0 = point.x.min(right - MIN_ELEMENT_SIZE);
    }
    if handle.moves_right() {
        next.1 = point.x.max(left + MIN_ELEMENT_SIZE);
    }
    if handle.moves_top() {
        next.2 = point.y.min(bottom - MIN_ELEMENT_SIZE);
    }
    if handle.moves_bottom() {
        next.3 = point.y.max(top + MIN_ELEMENT_SIZE);
    }

    Rect::from_min_size(
        Pos2::new(next.0, next.2),
        Vec2::new(clamp_extent(next.1 - next.0), clamp_extent(next.3 - next.2)),
    )
}

/// Affine fit of a polygon from one box onto another, anchored at the box origins
fn scale_points(points: &[Pos2], from: Rect, to: Rect) -> Vec<Pos2> {
    let scale_x = if from.width() == 0.0 { 1.0 } else { to.width() / from.width() };
    let scale_y = if from.height() == 0.0 { 1.0 } else { to.height() / from.height() };

    points
        .iter()
        .map(|p| {
            Pos2::new(
                to.min.x + (p.x - from.min.x) * scale_x,
                to.min.y + (p.y - from.min.y) * scale_y,
            )
        })
        .collect()
}

/// Applies a handle drag to a shape.
///
/// Box handles resize rects, ellipses and freehand polygons; endpoint handles
/// relocate one end of a line. Mismatched handle kinds leave the shape unchanged.
pub fn resize_by_handle(shape: &Shape, handle: ResizeHandle, point: Pos2) -> Shape {
    if let Shape::Line(line) = shape {
        let mut line = *line;
        match handle {
            ResizeHandle::Start => line.from = point,
            ResizeHandle::End => line.to = point,
            _ => return shape.clone(),
        }
        return Shape::Line(line);
    }

    if handle.is_endpoint() {
        return shape.clone();
    }

    let from = bounds_of(shape);
    let to = resize_bounds_by_handle(from, handle, point);

    match shape {
        Shape::Rect(_) => Shape::rect(to.min.x, to.min.y, to.width(), to.height()),
        Shape::Ellipse(_) => ellipse_in(to),
        Shape::Freehand(freehand) => Shape::Freehand(FreehandGeometry {
            points: scale_points(&freehand.points, from, to),
            closed: freehand.closed,
        }),
        Shape::Line(_) => shape.clone(),
    }
}
