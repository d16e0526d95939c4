use egui::Color32;
use serde::{Deserialize, Serialize};

/// Parametric shape kinds offered by the shape tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Heart,
    Cross,
    Star,
    Text,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Heart,
        ShapeKind::Cross,
        ShapeKind::Star,
        ShapeKind::Text,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Heart => "Heart",
            ShapeKind::Cross => "Cross",
            ShapeKind::Star => "Star",
            ShapeKind::Text => "Text",
        }
    }
}

/// Whether a shape is filled or outlined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawMode {
    Fill,
    #[default]
    Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Visual properties captured when a line is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub color: Color32,
    pub width: f32,
    /// Multiplied into the colour alpha at render time, 0.0..=1.0
    pub opacity: f32,
    pub is_eraser: bool,
    pub shape: ShapeKind,
    pub draw_mode: DrawMode,
    pub text_alignment: TextAlignment,
    pub text: String,
    pub font_size: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color32::from_rgb(255, 59, 48),
            width: 5.0,
            opacity: 1.0,
            is_eraser: false,
            shape: ShapeKind::default(),
            draw_mode: DrawMode::default(),
            text_alignment: TextAlignment::default(),
            text: String::new(),
            font_size: 24.0,
        }
    }
}

impl LineStyle {
    /// The colour with `opacity` folded into its alpha
    pub fn effective_color(&self) -> Color32 {
        let opacity = self.opacity.clamp(0.0, 1.0);
        let alpha = (self.color.a() as f32 * opacity).round() as u8;
        let [r, g, b, _] = self.color.to_srgba_unmultiplied();
        Color32::from_rgba_unmultiplied(r, g, b, alpha)
    }

    /// Copy of this style marked as an eraser
    pub fn as_eraser(&self) -> Self {
        Self {
            is_eraser: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_scales_alpha() {
        let style = LineStyle {
            color: Color32::from_rgb(10, 20, 30),
            opacity: 0.5,
            ..Default::default()
        };
        let color = style.effective_color();
        assert_eq!(color.a(), 128);
    }
}
