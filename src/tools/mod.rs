use serde::{Deserialize, Serialize};

/// Tools offered by the drawing overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Pencil,
    Shape,
    Eraser,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Pencil, ToolKind::Shape, ToolKind::Eraser];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Pencil => "Pencil",
            ToolKind::Shape => "Shape",
            ToolKind::Eraser => "Eraser",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ToolKind::Pencil => "✏",
            ToolKind::Shape => "◻",
            ToolKind::Eraser => "⌫",
        }
    }

    /// Tools that lay down freehand strokes
    pub fn draws_strokes(&self) -> bool {
        matches!(self, ToolKind::Pencil | ToolKind::Eraser)
    }
}
