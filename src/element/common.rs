use egui::{Pos2, Rect};

// Common constants for all shape kinds
pub const MIN_ELEMENT_SIZE: f32 = 2.0;
pub const MIN_LINE_WIDTH: f32 = 1.0;

/// Clamps a single extent to the minimum visible size
pub(crate) fn clamp_extent(value: f32) -> f32 {
    value.max(MIN_ELEMENT_SIZE)
}

/// Calculate distance from a point to a line segment (useful for line hit testing)
pub fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let length_sq = line_vec.length_sq();

    if length_sq == 0.0 {
        return point.distance(line_start);
    }

    let t = ((point - line_start).dot(line_vec) / length_sq).clamp(0.0, 1.0);
    let projection = line_start + line_vec * t;
    point.distance(projection)
}

/// Calculate the bounding box for a set of points, never thinner than the minimum size
pub(crate) fn calculate_bounds(points: &[Pos2]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::from_min_size(Pos2::ZERO, egui::vec2(MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE));
    };

    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;

    for point in &points[1..] {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_size(
        Pos2::new(min_x, min_y),
        egui::vec2(clamp_extent(max_x - min_x), clamp_extent(max_y - min_y)),
    )
}
