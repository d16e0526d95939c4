use egui::{Pos2, Rect};

use super::hold::HoldTimer;
use super::{InputContext, Interpretation, PointerEvent};
use crate::config::CanvasConfig;
use crate::element::SizeLimits;
use crate::geometry::hit_testing;
use crate::transform::{Edge, GestureState};

/// Configuration for gesture recognition
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Movement that cancels a pending hold
    pub movement_threshold: f32,
    /// Time required for a long press (seconds)
    pub hold_duration: f64,
    pub handle_hit_radius: f32,
    pub confirm_button_radius: f32,
    pub size_limits: SizeLimits,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::from(&CanvasConfig::default())
    }
}

impl From<&CanvasConfig> for GestureConfig {
    fn from(config: &CanvasConfig) -> Self {
        Self {
            movement_threshold: config.movement_threshold,
            hold_duration: config.hold_duration,
            handle_hit_radius: config.handle_hit_radius,
            confirm_button_radius: config.confirm_button_radius,
            size_limits: config.size_limits,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EditMode {
    Dragging,
    ArmingResize(Edge),
    Resizing(Edge),
}

/// What the pointer currently does between press and release
#[derive(Debug, Clone)]
enum Interaction {
    Idle,
    Stroke {
        anchor: Pos2,
        points: Vec<Pos2>,
        hold: HoldTimer,
        straight: bool,
    },
    Shape {
        anchor: Pos2,
        current: Pos2,
    },
    Confirming,
    Editing {
        last: Pos2,
        mode: EditMode,
        hold: HoldTimer,
    },
}

/// Interpreter state from before the latest transform step, restored when
/// the canvas rejects that step
#[derive(Debug, Clone, Copy, PartialEq)]
enum Rollback {
    Pointer(Pos2),
    Pinch(Option<f32>),
}

/// Transient in-progress geometry the renderer shows before commit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Preview<'a> {
    Stroke(&'a [Pos2]),
    Shape(Rect),
}

/// Turns pointer and pinch input into strokes, new shapes and
/// [`GestureState`] intents for the shape being edited.
#[derive(Debug)]
pub struct GestureInterpreter {
    config: GestureConfig,
    interaction: Interaction,
    last_magnification: Option<f32>,
    rollback: Option<Rollback>,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            interaction: Interaction::Idle,
            last_magnification: None,
            rollback: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Drop any in-progress gesture without committing it
    pub fn cancel(&mut self) {
        self.interaction = Interaction::Idle;
        self.last_magnification = None;
        self.rollback = None;
    }

    /// Undo the bookkeeping of the latest drag, resize or pinch step after
    /// the canvas refused it, so the next step is measured from the last
    /// geometry that was actually applied
    pub fn reject_step(&mut self) {
        match self.rollback.take() {
            Some(Rollback::Pointer(previous)) => {
                if let Interaction::Editing { last, .. } = &mut self.interaction {
                    *last = previous;
                }
            }
            Some(Rollback::Pinch(previous)) => self.last_magnification = previous,
            None => {}
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.interaction, Interaction::Idle)
    }

    pub fn preview(&self) -> Option<Preview<'_>> {
        match &self.interaction {
            Interaction::Stroke { points, .. } => Some(Preview::Stroke(points)),
            Interaction::Shape { anchor, current } => {
                Some(Preview::Shape(Rect::from_two_pos(*anchor, *current)))
            }
            _ => None,
        }
    }

    /// Edge being resized, once the resize hold has fired
    pub fn active_resize_edge(&self) -> Option<Edge> {
        match self.interaction {
            Interaction::Editing {
                mode: EditMode::Resizing(edge),
                ..
            } => Some(edge),
            _ => None,
        }
    }

    /// Whether a stroke switched to straight-line mode
    pub fn is_straight_line(&self) -> bool {
        matches!(self.interaction, Interaction::Stroke { straight: true, .. })
    }

    pub fn handle_pointer(&mut self, event: PointerEvent, ctx: &InputContext) -> Interpretation {
        match event {
            PointerEvent::Pressed { pos, time } => self.pressed(pos, time, ctx),
            PointerEvent::Moved { pos, time } => self.moved(pos, time),
            PointerEvent::Released { pos, time } => self.released(pos, time),
        }
    }

    /// Advance hold timers without pointer motion
    pub fn tick(&mut self, time: f64) -> Interpretation {
        let duration = self.config.hold_duration;
        match &mut self.interaction {
            Interaction::Stroke { hold, straight, .. } => {
                if hold.poll(time, duration) {
                    log::debug!("Hold detected, switching stroke to straight line");
                    *straight = true;
                }
                Interpretation::Nothing
            }
            Interaction::Editing { mode, hold, .. } => {
                if let EditMode::ArmingResize(edge) = *mode {
                    if hold.poll(time, duration) {
                        *mode = EditMode::Resizing(edge);
                        return Interpretation::Transform(GestureState::PrepareResizing(edge));
                    }
                }
                Interpretation::Nothing
            }
            _ => Interpretation::Nothing,
        }
    }

    /// Cumulative pinch magnification since the pinch began (1.0 at start)
    pub fn pinch_changed(&mut self, magnification: f32, ctx: &InputContext) -> Interpretation {
        if ctx.editing.is_none() || !magnification.is_finite() || magnification <= 0.0 {
            return Interpretation::Nothing;
        }
        let previous = self.last_magnification.unwrap_or(1.0);
        self.rollback = Some(Rollback::Pinch(self.last_magnification));
        self.last_magnification = Some(magnification);
        let factor = magnification / previous;
        if factor == 1.0 {
            return Interpretation::Nothing;
        }
        Interpretation::Transform(GestureState::Scaling(factor))
    }

    pub fn pinch_ended(&mut self) {
        self.last_magnification = None;
    }

    fn pressed(&mut self, pos: Pos2, time: f64, ctx: &InputContext) -> Interpretation {
        if let Some(world) = ctx.editing {
            if hit_testing::is_on_confirm_button(pos, world, self.config.confirm_button_radius) {
                self.interaction = Interaction::Confirming;
                return Interpretation::Transform(GestureState::Tapping(pos));
            }

            let mode = match hit_testing::handle_at(pos, world, self.config.handle_hit_radius) {
                Some(edge) => EditMode::ArmingResize(edge),
                None => EditMode::Dragging,
            };
            self.interaction = Interaction::Editing {
                last: pos,
                mode,
                hold: HoldTimer::start(pos, time),
            };
            return Interpretation::Transform(GestureState::None);
        }

        if ctx.tool.draws_strokes() {
            self.interaction = Interaction::Stroke {
                anchor: pos,
                points: vec![pos],
                hold: HoldTimer::start(pos, time),
                straight: false,
            };
            Interpretation::StrokeUpdated
        } else {
            self.interaction = Interaction::Shape {
                anchor: pos,
                current: pos,
            };
            Interpretation::ShapeUpdated
        }
    }

    fn moved(&mut self, pos: Pos2, time: f64) -> Interpretation {
        let threshold = self.config.movement_threshold;
        let duration = self.config.hold_duration;

        match &mut self.interaction {
            Interaction::Idle | Interaction::Confirming => Interpretation::Nothing,
            Interaction::Stroke {
                anchor,
                points,
                hold,
                straight,
            } => {
                // A hold that was due before this motion wins over the motion
                if hold.poll(time, duration) {
                    *straight = true;
                }
                hold.observe_motion(pos, threshold);

                if *straight {
                    *points = vec![*anchor, pos];
                } else {
                    points.push(pos);
                }
                Interpretation::StrokeUpdated
            }
            Interaction::Shape { current, .. } => {
                *current = pos;
                Interpretation::ShapeUpdated
            }
            Interaction::Editing { last, mode, hold } => {
                if let EditMode::ArmingResize(edge) = *mode {
                    if hold.poll(time, duration) {
                        *mode = EditMode::Resizing(edge);
                    } else if hold.observe_motion(pos, threshold) {
                        log::debug!("Resize arm cancelled by movement, dragging instead");
                        *mode = EditMode::Dragging;
                    }
                }

                let gesture = match *mode {
                    // Motion within the threshold accumulates until the arm resolves
                    EditMode::ArmingResize(_) => return Interpretation::Nothing,
                    EditMode::Dragging => GestureState::Dragging(pos - *last),
                    EditMode::Resizing(edge) => GestureState::Resizing(edge, pos - *last),
                };
                self.rollback = Some(Rollback::Pointer(*last));
                *last = pos;
                Interpretation::Transform(gesture)
            }
        }
    }

    fn released(&mut self, pos: Pos2, time: f64) -> Interpretation {
        let duration = self.config.hold_duration;
        let limits = self.config.size_limits;

        match std::mem::replace(&mut self.interaction, Interaction::Idle) {
            Interaction::Idle => Interpretation::Nothing,
            Interaction::Stroke {
                anchor,
                mut points,
                mut hold,
                straight,
            } => {
                let straight = straight || hold.poll(time, duration);
                if straight {
                    if pos != anchor {
                        points = vec![anchor, pos];
                    }
                } else if points.last() != Some(&pos) {
                    points.push(pos);
                }
                Interpretation::CommitStroke(points)
            }
            Interaction::Shape { anchor, .. } => {
                let rect = Rect::from_two_pos(anchor, pos);
                match limits.validate_rect(rect, 1.0) {
                    Ok(()) => Interpretation::CommitShape(rect),
                    Err(reason) => {
                        log::info!("Discarding new shape {:?}: {}", rect, reason);
                        Interpretation::Transform(GestureState::InvalidSize(reason))
                    }
                }
            }
            Interaction::Confirming => Interpretation::Confirm,
            Interaction::Editing { .. } => Interpretation::Transform(GestureState::None),
        }
    }
}
