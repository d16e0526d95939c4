//! Pure placement math for editable shapes.
//!
//! A shape is stored as an untransformed local rect plus a cumulative
//! translation and uniform scale. Every gesture intent maps one placement to
//! the next; nothing here touches the line collection directly.

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::element::{Line, ShapeSizeError, SizeLimits};

/// The four edges carrying a resize handle at their midpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Midpoint of this edge on the given rect
    pub fn midpoint(&self, rect: Rect) -> Pos2 {
        match self {
            Edge::Left => rect.left_center(),
            Edge::Right => rect.right_center(),
            Edge::Top => rect.center_top(),
            Edge::Bottom => rect.center_bottom(),
        }
    }

    pub fn opposite(&self) -> Edge {
        match self {
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
        }
    }
}

/// Intent produced by the gesture interpreter for one gesture update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    None,
    Dragging(Vec2),
    Scaling(f32),
    Resizing(Edge, Vec2),
    Tapping(Pos2),
    InvalidSize(ShapeSizeError),
    PrepareResizing(Edge),
}

/// Local geometry plus world transform of a shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub rect: Rect,
    pub position: Vec2,
    pub scale: f32,
}

impl Placement {
    pub fn to_world(&self, local: Pos2) -> Pos2 {
        crate::element::local_to_world(local, self.position, self.scale)
    }

    pub fn world_center(&self) -> Pos2 {
        self.to_world(self.rect.center())
    }

    pub fn world_rect(&self) -> Rect {
        crate::element::world_rect(self.rect, self.position, self.scale)
    }
}

/// Compute the placement that results from applying `gesture`
pub fn resolve(placement: Placement, gesture: &GestureState) -> Placement {
    match *gesture {
        GestureState::Dragging(delta) => Placement {
            position: placement.position + delta,
            ..placement
        },
        GestureState::Scaling(factor) => {
            let center = placement.rect.center();
            let world_center = placement.world_center();
            let scale = placement.scale * factor;
            Placement {
                rect: placement.rect,
                position: (world_center - center.to_vec2() * scale).to_vec2(),
                scale,
            }
        }
        GestureState::Resizing(edge, delta) => resize(placement, edge, delta),
        GestureState::None
        | GestureState::Tapping(_)
        | GestureState::InvalidSize(_)
        | GestureState::PrepareResizing(_) => placement,
    }
}

// Resize keeps the scale fixed; the anchor solve below uses `placement.scale`
// for both sides and would drift if scale were changed in the same step.
fn resize(placement: Placement, edge: Edge, delta: Vec2) -> Placement {
    let anchor_edge = edge.opposite();
    let anchor_world = placement.to_world(anchor_edge.midpoint(placement.rect));

    let local = delta / placement.scale;
    let mut rect = placement.rect;
    match edge {
        Edge::Left => rect.min.x += local.x,
        Edge::Right => rect.max.x += local.x,
        Edge::Top => rect.min.y += local.y,
        Edge::Bottom => rect.max.y += local.y,
    }

    let anchor_local = anchor_edge.midpoint(rect);
    let position = anchor_world - anchor_local.to_vec2() * placement.scale;

    Placement {
        rect,
        position: position.to_vec2(),
        scale: placement.scale,
    }
}

/// Resolve `gesture` against an editable line and commit it if the result is
/// within `limits`. Returns whether the line changed. On rejection the line
/// keeps its previous geometry.
pub fn apply(
    line: &mut Line,
    gesture: &GestureState,
    limits: &SizeLimits,
) -> Result<bool, ShapeSizeError> {
    if let GestureState::InvalidSize(reason) = gesture {
        return Err(*reason);
    }
    if !line.is_editable() {
        return Ok(false);
    }
    let Some(current) = line.placement() else {
        return Ok(false);
    };

    let next = resolve(current, gesture);
    if next == current {
        return Ok(false);
    }
    limits.validate_rect(next.rect, next.scale)?;
    line.set_placement(next);
    Ok(true)
}
