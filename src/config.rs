use serde::{Deserialize, Serialize};

use crate::element::SizeLimits;
use crate::state::KeyValueStore;

/// Storage key for the serialized [`CanvasConfig`]
pub const CONFIG_KEY: &str = "canvas_config";

/// Tunables for gesture interpretation, validation, rendering and templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old config
pub struct CanvasConfig {
    pub size_limits: SizeLimits,
    /// Movement (in points) that cancels a pending long-press or resize arm
    pub movement_threshold: f32,
    /// Seconds a pointer must be held still to arm straight-line or resize mode
    pub hold_duration: f64,
    /// Hit radius around each edge-midpoint resize handle
    pub handle_hit_radius: f32,
    /// Drawn radius of the resize handles
    pub handle_radius: f32,
    /// Radius of the circular confirm button at the top-right corner
    pub confirm_button_radius: f32,
    /// Seconds a transient message stays visible
    pub message_duration: f64,
    pub template_slots: usize,
    /// Characters per line before text shapes wrap
    pub text_wrap_chars: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            size_limits: SizeLimits::default(),
            movement_threshold: 5.0,
            hold_duration: 0.5,
            handle_hit_radius: 44.0,
            handle_radius: 8.0,
            confirm_button_radius: 16.0,
            message_duration: 0.5,
            template_slots: 6,
            text_wrap_chars: 16,
        }
    }
}

impl CanvasConfig {
    /// Load from `store`, falling back to defaults when missing or unreadable
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get_string(CONFIG_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|err| {
                log::warn!("Ignoring malformed canvas config: {}", err);
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(err) => {
                log::error!("Failed to read canvas config: {}", err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStore;

    #[test]
    fn missing_fields_take_defaults() {
        let mut store = MemoryStore::default();
        store
            .set_string(CONFIG_KEY, r#"{"template_slots": 4}"#.to_string())
            .unwrap();
        let config = CanvasConfig::load(&store);
        assert_eq!(config.template_slots, 4);
        assert_eq!(config.handle_hit_radius, 44.0);
    }

    #[test]
    fn malformed_config_falls_back() {
        let mut store = MemoryStore::default();
        store.set_string(CONFIG_KEY, "not json".to_string()).unwrap();
        assert_eq!(CanvasConfig::load(&store), CanvasConfig::default());
    }
}
