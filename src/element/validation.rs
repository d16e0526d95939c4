use egui::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Line;

/// Smallest allowed effective width/height of a shape
pub const MIN_SHAPE_SIZE: f32 = 30.0;
/// Largest allowed effective width/height of a shape
pub const MAX_SHAPE_SIZE: f32 = 3000.0;

/// Reasons a shape geometry is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ShapeSizeError {
    #[error("Shape is too small")]
    TooSmall,
    #[error("Shape is too large")]
    TooLarge,
}

/// Inclusive bounds for the effective size of a shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeLimits {
    pub min: f32,
    pub max: f32,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min: MIN_SHAPE_SIZE,
            max: MAX_SHAPE_SIZE,
        }
    }
}

impl SizeLimits {
    /// Check a local rect drawn at the given uniform scale
    pub fn validate_rect(&self, rect: Rect, scale: f32) -> Result<(), ShapeSizeError> {
        let width = rect.width() * scale;
        let height = rect.height() * scale;

        // NaN compares false everywhere, so reject it explicitly
        if width.is_nan() || height.is_nan() || width < self.min || height < self.min {
            return Err(ShapeSizeError::TooSmall);
        }
        if width > self.max || height > self.max {
            return Err(ShapeSizeError::TooLarge);
        }
        Ok(())
    }

    /// Check a full line. Freehand strokes have no size bounds.
    pub fn validate_line(&self, line: &Line) -> Result<(), ShapeSizeError> {
        match line.bounding_rect {
            Some(rect) => self.validate_rect(rect, line.scale),
            None => Ok(()),
        }
    }
}

/// Validate against the default 30..=3000 limits
pub fn validate_rect(rect: Rect, scale: f32) -> Result<(), ShapeSizeError> {
    SizeLimits::default().validate_rect(rect, scale)
}

/// Validate a line against the default limits
pub fn validate_line(line: &Line) -> Result<(), ShapeSizeError> {
    SizeLimits::default().validate_line(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn square(side: f32) -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(side, side))
    }

    #[test]
    fn boundaries_are_valid() {
        assert_eq!(validate_rect(square(30.0), 1.0), Ok(()));
        assert_eq!(validate_rect(square(3000.0), 1.0), Ok(()));
        assert_eq!(validate_rect(square(15.0), 2.0), Ok(()));
    }

    #[test]
    fn too_small_wins_over_too_large() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 5000.0));
        assert_eq!(validate_rect(rect, 1.0), Err(ShapeSizeError::TooSmall));
    }

    #[test]
    fn scale_is_applied() {
        assert_eq!(validate_rect(square(100.0), 0.2), Err(ShapeSizeError::TooSmall));
        assert_eq!(validate_rect(square(100.0), 31.0), Err(ShapeSizeError::TooLarge));
    }

    #[test]
    fn lines_are_checked_at_their_scale() {
        use crate::element::LineStyle;

        let stroke = Line::stroke(vec![pos2(0.0, 0.0), pos2(1.0, 0.0)], LineStyle::default());
        assert_eq!(validate_line(&stroke), Ok(()));

        let mut shape = Line::shape(square(100.0), LineStyle::default());
        assert_eq!(validate_line(&shape), Ok(()));
        shape.scale = 0.25;
        assert_eq!(validate_line(&shape), Err(ShapeSizeError::TooSmall));
        shape.scale = 40.0;
        assert_eq!(validate_line(&shape), Err(ShapeSizeError::TooLarge));

        let strict = SizeLimits { min: 50.0, max: 200.0 };
        shape.scale = 1.0;
        assert_eq!(strict.validate_line(&shape), Ok(()));
        shape.scale = 2.5;
        assert_eq!(strict.validate_line(&shape), Err(ShapeSizeError::TooLarge));
    }

    #[test]
    fn inverted_rect_is_too_small() {
        let rect = Rect::from_min_max(pos2(100.0, 100.0), pos2(50.0, 200.0));
        assert_eq!(validate_rect(rect, 1.0), Err(ShapeSizeError::TooSmall));
    }
}
