use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod common;
pub mod style;
pub mod validation;

pub use common::{local_to_world, world_rect};
pub use style::{DrawMode, LineStyle, ShapeKind, TextAlignment};
pub use validation::{
    validate_line, validate_rect, ShapeSizeError, SizeLimits, MAX_SHAPE_SIZE, MIN_SHAPE_SIZE,
};

use crate::transform::Placement;

/// A drawable object: either a freehand stroke or a parametric shape.
///
/// Shapes keep their untransformed geometry in `bounding_rect` and are
/// placed in the world with `world = local * scale + position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: Uuid,
    pub points: Vec<Pos2>,
    pub style: LineStyle,
    pub bounding_rect: Option<Rect>,
    pub position: Vec2,
    pub scale: f32,
    pub is_confirmed: bool,
}

impl Line {
    /// A committed freehand stroke
    pub fn stroke(points: Vec<Pos2>, style: LineStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style,
            bounding_rect: None,
            position: Vec2::ZERO,
            scale: 1.0,
            is_confirmed: true,
        }
    }

    /// A freshly created shape, still open for editing
    pub fn shape(rect: Rect, style: LineStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            style,
            bounding_rect: Some(rect),
            position: Vec2::ZERO,
            scale: 1.0,
            is_confirmed: false,
        }
    }

    pub fn is_shape(&self) -> bool {
        self.bounding_rect.is_some()
    }

    /// Shapes stay draggable/resizable/scalable until confirmed
    pub fn is_editable(&self) -> bool {
        self.is_shape() && !self.is_confirmed
    }

    pub fn confirm(&mut self) {
        self.is_confirmed = true;
    }

    /// Shape geometry and transform, `None` for strokes
    pub fn placement(&self) -> Option<Placement> {
        self.bounding_rect.map(|rect| Placement {
            rect,
            position: self.position,
            scale: self.scale,
        })
    }

    pub(crate) fn set_placement(&mut self, placement: Placement) {
        self.bounding_rect = Some(placement.rect);
        self.position = placement.position;
        self.scale = placement.scale;
    }

    /// Where the object currently sits on the canvas
    pub fn world_bounds(&self) -> Rect {
        match self.bounding_rect {
            Some(rect) => world_rect(rect, self.position, self.scale),
            None => common::calculate_bounds(&self.points, self.style.width / 2.0),
        }
    }
}
