use uuid::Uuid;

use crate::element::ShapeSizeError;
use crate::tools::ToolKind;

/// Changes broadcast by the canvas controller to its observers
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    ToolChanged {
        old: ToolKind,
        new: ToolKind,
    },
    LineCommitted {
        id: Uuid,
        is_shape: bool,
    },
    /// An unconfirmed shape now exists (true) or no longer exists (false)
    EditingChanged(bool),
    ShapeConfirmed {
        id: Uuid,
    },
    SizeRejected(ShapeSizeError),
    HistoryChanged {
        can_undo: bool,
        can_redo: bool,
    },
    Pinned,
    Cleared,
    TemplateSaved {
        slot: usize,
    },
}
