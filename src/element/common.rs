use egui::{Pos2, Rect, Vec2};

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Map a local point into world space
pub fn local_to_world(point: Pos2, position: Vec2, scale: f32) -> Pos2 {
    Pos2::new(point.x * scale + position.x, point.y * scale + position.y)
}

/// Map a local rect into world space
pub fn world_rect(rect: Rect, position: Vec2, scale: f32) -> Rect {
    Rect::from_min_max(
        local_to_world(rect.min, position, scale),
        local_to_world(rect.max, position, scale),
    )
}
