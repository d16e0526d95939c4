use egui::{Context, Pos2, Rect};

use super::PointerEvent;

/// Input for the canvas, already translated into canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasInput {
    Pointer(PointerEvent),
    /// Cumulative pinch magnification since the pinch began
    Pinch { magnification: f32, time: f64 },
    PinchEnded,
    Tick(f64),
}

/// Converts raw egui input into [`CanvasInput`] for the canvas rect
#[derive(Debug, Default)]
pub struct InputHandler {
    canvas_rect: Option<Rect>,
    pressed_in_canvas: bool,
    last_pointer_pos: Option<Pos2>,
    magnification: Option<f32>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the canvas rectangle in screen coordinates
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = Some(rect);
    }

    fn to_canvas(&self, pos: Pos2) -> Pos2 {
        match self.canvas_rect {
            Some(rect) => (pos - rect.min).to_pos2(),
            None => pos,
        }
    }

    /// Process raw egui input and generate canvas input events
    pub fn process_input(&mut self, ctx: &Context) -> Vec<CanvasInput> {
        let mut events = Vec::new();
        let Some(canvas_rect) = self.canvas_rect else {
            return events;
        };

        ctx.input(|input| {
            let time = input.time;
            let pointer_pos = input.pointer.interact_pos();

            if input.pointer.primary_pressed() {
                if let Some(pos) = pointer_pos.filter(|pos| canvas_rect.contains(*pos)) {
                    self.pressed_in_canvas = true;
                    self.last_pointer_pos = Some(pos);
                    events.push(CanvasInput::Pointer(PointerEvent::Pressed {
                        pos: self.to_canvas(pos),
                        time,
                    }));
                }
            } else if self.pressed_in_canvas && input.pointer.primary_down() {
                if let Some(pos) = pointer_pos.filter(|pos| Some(*pos) != self.last_pointer_pos) {
                    self.last_pointer_pos = Some(pos);
                    events.push(CanvasInput::Pointer(PointerEvent::Moved {
                        pos: self.to_canvas(pos),
                        time,
                    }));
                }
            }

            if self.pressed_in_canvas && input.pointer.primary_released() {
                let pos = pointer_pos.or(self.last_pointer_pos).unwrap_or(canvas_rect.min);
                self.pressed_in_canvas = false;
                self.last_pointer_pos = None;
                events.push(CanvasInput::Pointer(PointerEvent::Released {
                    pos: self.to_canvas(pos),
                    time,
                }));
            }

            // Two-finger pinch, or ctrl+scroll on desktop
            if let Some(touch) = input.multi_touch() {
                let magnification = self.magnification.unwrap_or(1.0) * touch.zoom_delta;
                self.magnification = Some(magnification);
                events.push(CanvasInput::Pinch {
                    magnification,
                    time,
                });
            } else if self.magnification.take().is_some() {
                events.push(CanvasInput::PinchEnded);
            } else if input.zoom_delta() != 1.0 {
                events.push(CanvasInput::Pinch {
                    magnification: input.zoom_delta(),
                    time,
                });
                events.push(CanvasInput::PinchEnded);
            }

            events.push(CanvasInput::Tick(time));
        });

        events
    }
}
