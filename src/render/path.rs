//! Path construction for strokes and shapes, in local coordinates.

use egui::{Pos2, Rect};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};
use tiny_skia::{Path, PathBuilder};

use crate::element::ShapeKind;

const HEART_SAMPLES: usize = 120;
/// Vertical midpoint of the parametric heart curve (its y spans -17..~12)
const HEART_Y_CENTER: f32 = -2.5;
const HEART_EXTENT: f32 = 34.0;

/// Smoothed path through stroke points.
///
/// Three or more points are joined with quadratic curves through the
/// midpoints of consecutive points, using each interior point as the control
/// point. Two points give a straight segment. A single point gives `None`;
/// callers draw it as a dot.
pub fn stroke_path(points: &[Pos2]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);

    if points.len() > 2 {
        for pair in points[1..].windows(2) {
            let (control, next) = (pair[0], pair[1]);
            let mid = control.lerp(next, 0.5);
            pb.quad_to(control.x, control.y, mid.x, mid.y);
        }
    }

    let last = points[points.len() - 1];
    pb.line_to(last.x, last.y);
    pb.finish()
}

/// Whether the shape is drawn as lines only, regardless of the fill mode
pub fn is_line_only(kind: ShapeKind) -> bool {
    matches!(kind, ShapeKind::Cross)
}

/// Outline for a parametric shape inside `rect`. Text is laid out elsewhere.
pub fn shape_path(kind: ShapeKind, rect: Rect) -> Option<Path> {
    match kind {
        ShapeKind::Rectangle => rect_path(rect),
        ShapeKind::Circle => {
            let center = rect.center();
            PathBuilder::from_circle(center.x, center.y, rect.width().min(rect.height()) / 2.0)
        }
        ShapeKind::Heart => heart_path(rect),
        ShapeKind::Star => star_path(rect),
        ShapeKind::Cross => cross_path(rect),
        ShapeKind::Text => None,
    }
}

pub(crate) fn rect_path(rect: Rect) -> Option<Path> {
    tiny_skia::Rect::from_ltrb(rect.min.x, rect.min.y, rect.max.x, rect.max.y)
        .map(PathBuilder::from_rect)
}

/// x = 16 sin³θ, y = 13 cosθ − 5 cos2θ − 2 cos3θ − cos4θ, fitted to the
/// smaller side of the rect
fn heart_path(rect: Rect) -> Option<Path> {
    let center = rect.center();
    let unit = rect.width().min(rect.height()) / HEART_EXTENT;

    let mut pb = PathBuilder::new();
    for i in 0..=HEART_SAMPLES {
        let t = i as f32 / HEART_SAMPLES as f32 * TAU;
        let x = 16.0 * t.sin().powi(3);
        let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
        let px = center.x + x * unit;
        let py = center.y - (y - HEART_Y_CENTER) * unit;
        if i == 0 {
            pb.move_to(px, py);
        } else {
            pb.line_to(px, py);
        }
    }
    pb.close();
    pb.finish()
}

/// Four-point star alternating outer and inner radius
fn star_path(rect: Rect) -> Option<Path> {
    let center = rect.center();
    let outer = 0.4 * rect.width().min(rect.height());
    let inner = 0.4 * outer;

    let mut pb = PathBuilder::new();
    for i in 0..8 {
        let angle = -FRAC_PI_2 + i as f32 * FRAC_PI_4;
        let radius = if i % 2 == 0 { outer } else { inner };
        let (x, y) = (center.x + radius * angle.cos(), center.y + radius * angle.sin());
        if i == 0 {
            pb.move_to(x, y);
        } else {
            pb.line_to(x, y);
        }
    }
    pb.close();
    pb.finish()
}

/// Two perpendicular segments through the centre
fn cross_path(rect: Rect) -> Option<Path> {
    let center = rect.center();
    let half = 0.8 * rect.width().min(rect.height()) / 2.0;

    let mut pb = PathBuilder::new();
    pb.move_to(center.x - half, center.y);
    pb.line_to(center.x + half, center.y);
    pb.move_to(center.x, center.y - half);
    pb.line_to(center.x, center.y + half);
    pb.finish()
}
