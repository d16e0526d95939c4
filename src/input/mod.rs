use egui::{Pos2, Rect};

mod gestures;
mod handler;
mod hold;

pub use gestures::{GestureConfig, GestureInterpreter, Preview};
pub use handler::{CanvasInput, InputHandler};
pub use hold::HoldTimer;
pub use crate::transform::{Edge, GestureState};

use crate::tools::ToolKind;

/// A single pointer update in canvas coordinates, stamped with a monotonic
/// time in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed { pos: Pos2, time: f64 },
    Moved { pos: Pos2, time: f64 },
    Released { pos: Pos2, time: f64 },
}

impl PointerEvent {
    pub fn pos(&self) -> Pos2 {
        match *self {
            PointerEvent::Pressed { pos, .. }
            | PointerEvent::Moved { pos, .. }
            | PointerEvent::Released { pos, .. } => pos,
        }
    }

    pub fn time(&self) -> f64 {
        match *self {
            PointerEvent::Pressed { time, .. }
            | PointerEvent::Moved { time, .. }
            | PointerEvent::Released { time, .. } => time,
        }
    }
}

/// Read-only state the interpreter needs to classify a gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputContext {
    pub tool: ToolKind,
    /// World rect of the unconfirmed shape, if one exists
    pub editing: Option<Rect>,
}

/// What a gesture update means for the canvas
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    Nothing,
    /// The in-progress stroke changed; see [`GestureInterpreter::preview`]
    StrokeUpdated,
    CommitStroke(Vec<Pos2>),
    /// The in-progress shape box changed
    ShapeUpdated,
    CommitShape(Rect),
    Transform(GestureState),
    Confirm,
}
