use egui::Rect;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::geometry::hit_testing;
use crate::transform::Edge;

const BOX_COLOR: [u8; 4] = [0, 122, 255, 255];
const RESIZE_COLOR: [u8; 4] = [255, 149, 0, 255];
const CONFIRM_COLOR: [u8; 4] = [52, 199, 89, 255];

/// Sizes for the editing overlay drawn around an unconfirmed shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffordanceStyle {
    pub handle_radius: f32,
    pub confirm_button_radius: f32,
    /// Highlight the bounding box while this edge is being resized
    pub active_resize: Option<Edge>,
}

fn paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    let [r, g, b, a] = rgba;
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Bounding box, four edge handles and the confirm button, in world space
pub fn draw_affordances(
    pixmap: &mut Pixmap,
    world: Rect,
    style: &AffordanceStyle,
    base: Transform,
) {
    let (box_color, box_width) = match style.active_resize {
        Some(_) => (RESIZE_COLOR, 3.0),
        None => (BOX_COLOR, 1.5),
    };
    if let Some(path) = super::path::rect_path(world) {
        let stroke = Stroke {
            width: box_width,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint(box_color), &stroke, base, None);
    }

    for (edge, center) in hit_testing::handle_positions(world) {
        let Some(circle) = PathBuilder::from_circle(center.x, center.y, style.handle_radius) else {
            continue;
        };
        let ring = if style.active_resize == Some(edge) { RESIZE_COLOR } else { BOX_COLOR };
        pixmap.fill_path(&circle, &paint([255, 255, 255, 255]), FillRule::Winding, base, None);
        let stroke = Stroke {
            width: 2.0,
            ..Default::default()
        };
        pixmap.stroke_path(&circle, &paint(ring), &stroke, base, None);
    }

    let center = hit_testing::confirm_button_center(world);
    let radius = style.confirm_button_radius;
    if let Some(button) = PathBuilder::from_circle(center.x, center.y, radius) {
        pixmap.fill_path(&button, &paint(CONFIRM_COLOR), FillRule::Winding, base, None);
    }

    let mut tick = PathBuilder::new();
    tick.move_to(center.x - 0.45 * radius, center.y);
    tick.line_to(center.x - 0.1 * radius, center.y + 0.35 * radius);
    tick.line_to(center.x + 0.45 * radius, center.y - 0.3 * radius);
    if let Some(tick) = tick.finish() {
        let stroke = Stroke {
            width: (radius * 0.18).max(1.5),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        pixmap.stroke_path(&tick, &paint([255, 255, 255, 255]), &stroke, base, None);
    }
}
