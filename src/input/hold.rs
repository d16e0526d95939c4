use egui::Pos2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldState {
    Pending,
    Fired,
    Cancelled,
}

/// Long-press detection driven by event timestamps instead of a platform timer.
///
/// The hold fires once `duration` seconds have passed since the press, as
/// long as the pointer never moved further than the threshold from where it
/// went down. Moving too far first cancels it for the rest of the gesture.
#[derive(Debug, Clone, Copy)]
pub struct HoldTimer {
    origin: Pos2,
    started_at: f64,
    state: HoldState,
}

impl HoldTimer {
    pub fn start(origin: Pos2, time: f64) -> Self {
        Self {
            origin,
            started_at: time,
            state: HoldState::Pending,
        }
    }

    /// Fire if the deadline has passed. Returns true only on the firing call.
    pub fn poll(&mut self, time: f64, duration: f64) -> bool {
        if self.state == HoldState::Pending && time - self.started_at >= duration {
            self.state = HoldState::Fired;
            return true;
        }
        false
    }

    /// Cancel a pending hold when `pos` strays beyond `threshold`.
    /// Returns true only on the cancelling call.
    pub fn observe_motion(&mut self, pos: Pos2, threshold: f32) -> bool {
        if self.state == HoldState::Pending && pos.distance(self.origin) > threshold {
            self.state = HoldState::Cancelled;
            return true;
        }
        false
    }

    pub fn is_pending(&self) -> bool {
        self.state == HoldState::Pending
    }

    pub fn has_fired(&self) -> bool {
        self.state == HoldState::Fired
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == HoldState::Cancelled
    }
}
