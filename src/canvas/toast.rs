/// A single transient message. Showing a new one replaces the current text
/// and restarts the timer instead of stacking.
#[derive(Debug, Clone, Default)]
pub struct Toast {
    message: Option<(String, f64)>,
    duration: f64,
}

impl Toast {
    pub fn new(duration: f64) -> Self {
        Self {
            message: None,
            duration,
        }
    }

    pub fn show(&mut self, text: impl Into<String>, now: f64) {
        self.message = Some((text.into(), now + self.duration));
    }

    /// The message still visible at `now`
    pub fn current(&self, now: f64) -> Option<&str> {
        match &self.message {
            Some((text, until)) if now < *until => Some(text),
            _ => None,
        }
    }

    /// When the visible message goes away, for scheduling a repaint
    pub fn expires_at(&self) -> Option<f64> {
        self.message.as_ref().map(|(_, until)| *until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_expires_after_duration() {
        let mut toast = Toast::new(0.5);
        toast.show("Shape is too small", 1.0);
        assert_eq!(toast.current(1.2), Some("Shape is too small"));
        assert_eq!(toast.current(1.5), None);
    }

    #[test]
    fn new_message_restarts_timer() {
        let mut toast = Toast::new(0.5);
        toast.show("first", 0.0);
        toast.show("second", 0.4);
        assert_eq!(toast.current(0.8), Some("second"));
        assert_eq!(toast.current(0.9), None);
    }
}
