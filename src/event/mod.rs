mod bus;
mod events;

pub use bus::EventBus;
pub use events::CanvasEvent;

/// Observer registered on an [`EventBus`]
pub trait EventHandler {
    fn handle_event(&mut self, event: &CanvasEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&CanvasEvent),
{
    fn handle_event(&mut self, event: &CanvasEvent) {
        self(event)
    }
}
