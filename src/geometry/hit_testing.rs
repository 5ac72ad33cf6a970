use egui::{Pos2, Rect};

use super::{bounds_of, handles_for, ResizeHandle};
use crate::element::{distance_to_line_segment, RedactionObject, Shape};

pub const RESIZE_HANDLE_RADIUS: f32 = 8.0;
/// Slack around the bounding box before the exact shape test runs
pub const BOUNDS_PADDING: f32 = 8.0;
/// Extra reach added to half the stroke width when picking lines
pub const LINE_HIT_TOLERANCE: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Body,
    Handle(ResizeHandle),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitResult {
    pub object_id: String,
    pub kind: HitKind,
}

impl HitResult {
    pub fn handle(&self) -> Option<ResizeHandle> {
        match self.kind {
            HitKind::Handle(handle) => Some(handle),
            HitKind::Body => None,
        }
    }
}

/// Inclusive on every edge, so corners count as inside
pub fn point_in_rect(point: Pos2, rect: Rect) -> bool {
    point.x >= rect.min.x && point.x <= rect.max.x && point.y >= rect.min.y && point.y <= rect.max.y
}

pub fn point_in_ellipse(point: Pos2, center: Pos2, rx: f32, ry: f32) -> bool {
    if rx == 0.0 || ry == 0.0 {
        return false;
    }
    let dx = (point.x - center.x) / rx;
    let dy = (point.y - center.y) / ry;
    dx * dx + dy * dy <= 1.0
}

/// Even-odd ray casting
pub fn point_in_polygon(point: Pos2, points: &[Pos2]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut previous = points.len() - 1;

    for index in 0..points.len() {
        let current = points[index];
        let prev = points[previous];
        let crosses = (current.y > point.y) != (prev.y > point.y)
            && point.x < (prev.x - current.x) * (point.y - current.y) / (prev.y - current.y) + current.x;
        if crosses {
            inside = !inside;
        }
        previous = index;
    }

    inside
}

/// Exact containment test used for picking
pub fn is_point_on_shape(point: Pos2, shape: &Shape) -> bool {
    match shape {
        Shape::Rect(_) => point_in_rect(point, bounds_of(shape)),
        Shape::Ellipse(ellipse) => {
            point_in_ellipse(point, Pos2::new(ellipse.cx, ellipse.cy), ellipse.rx, ellipse.ry)
        }
        Shape::Line(line) => {
            let tolerance = line.width / 2.0 + LINE_HIT_TOLERANCE;
            distance_to_line_segment(point, line.from, line.to) <= tolerance
        }
        Shape::Freehand(freehand) => point_in_polygon(point, &freehand.points),
    }
}

/// Checks the handles of the selected objects, topmost object and last handle first.
pub fn hit_test_handles(point: Pos2, selected: &[&RedactionObject], radius: f32) -> Option<HitResult> {
    for object in selected.iter().rev() {
        for handle in handles_for(&object.shape).iter().rev() {
            if point.distance(handle.point) <= radius {
                return Some(HitResult {
                    object_id: object.id.clone(),
                    kind: HitKind::Handle(handle.handle),
                });
            }
        }
    }
    None
}

/// Finds the topmost visible object under the point
pub fn hit_test_objects(point: Pos2, objects: &[RedactionObject]) -> Option<HitResult> {
    objects
        .iter()
        .rev()
        .filter(|object| object.visible)
        .filter(|object| point_in_rect(point, bounds_of(&object.shape).expand(BOUNDS_PADDING)))
        .find(|object| is_point_on_shape(point, &object.shape))
        .map(|object| HitResult {
            object_id: object.id.clone(),
            kind: HitKind::Body,
        })
}
