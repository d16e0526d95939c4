use egui::{Pos2, Rect};

use crate::transform::Edge;

/// Resize handle centres, one per edge midpoint of the world rect
pub fn handle_positions(world: Rect) -> [(Edge, Pos2); 4] {
    Edge::ALL.map(|edge| (edge, edge.midpoint(world)))
}

/// The confirm button sits on the top-right corner of the world rect
pub fn confirm_button_center(world: Rect) -> Pos2 {
    world.right_top()
}

pub fn is_on_confirm_button(pos: Pos2, world: Rect, radius: f32) -> bool {
    pos.distance(confirm_button_center(world)) <= radius
}

/// The handle closest to `pos`, if any lies within `hit_radius`
pub fn handle_at(pos: Pos2, world: Rect, hit_radius: f32) -> Option<Edge> {
    handle_positions(world)
        .into_iter()
        .map(|(edge, center)| (edge, pos.distance(center)))
        .filter(|(_, distance)| *distance <= hit_radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(edge, _)| edge)
}
