//! Fixed number of template slots holding flattened drawings as PNG bytes.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::render::RenderError;
use crate::state::{KeyValueStore, PersistenceError};

/// Storage key for the serialized slot collection
pub const TEMPLATES_KEY: &str = "drawing_templates";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingTemplate {
    pub id: Uuid,
    pub name: String,
    /// PNG bytes, `None` for an empty slot
    pub image: Option<Vec<u8>>,
}

impl DrawingTemplate {
    fn empty(index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("Template {}", index + 1),
            image: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Slot {index} is out of range ({count} slots)")]
    SlotOutOfRange { index: usize, count: usize },
    #[error("All template slots are in use")]
    NoSlotAvailable,
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type TemplateResult<T> = Result<T, TemplateError>;

/// How `save_to_available` behaves when every slot is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Report [`TemplateError::NoSlotAvailable`]
    #[default]
    Normal,
    /// Replace the last slot; only after the user agreed to override
    OverwriteLast,
}

/// Template slots kept in memory and rewritten to `store` as a whole on
/// every mutation
pub struct TemplateStore<S: KeyValueStore> {
    store: S,
    slots: Vec<DrawingTemplate>,
}

impl<S: KeyValueStore> TemplateStore<S> {
    /// Read the slots from `store`, padding up to `slot_count`.
    ///
    /// Stored collections larger than `slot_count` are kept whole. An
    /// unreadable record is logged and replaced by empty slots.
    pub fn load(store: S, slot_count: usize) -> Self {
        let mut slots: Vec<DrawingTemplate> = match store.get_string(TEMPLATES_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|err| {
                log::error!("Failed to decode stored templates: {}", err);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                log::error!("Failed to read stored templates: {}", err);
                Vec::new()
            }
        };
        while slots.len() < slot_count {
            slots.push(DrawingTemplate::empty(slots.len()));
        }
        log::debug!("Loaded {} template slots", slots.len());
        Self { store, slots }
    }

    pub fn list_slots(&self) -> &[DrawingTemplate] {
        &self.slots
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn slot_mut(&mut self, index: usize) -> TemplateResult<&mut DrawingTemplate> {
        let count = self.slots.len();
        self.slots
            .get_mut(index)
            .ok_or(TemplateError::SlotOutOfRange { index, count })
    }

    /// Put `png` into slot `index`, replacing whatever was there
    pub fn save(&mut self, png: Vec<u8>, index: usize) -> TemplateResult<()> {
        self.slot_mut(index)?.image = Some(png);
        self.persist()?;
        log::info!("Saved template into slot {}", index);
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> TemplateResult<()> {
        self.slot_mut(index)?.image = None;
        self.persist()?;
        log::info!("Cleared template slot {}", index);
        Ok(())
    }

    pub fn has_available_slot(&self) -> bool {
        self.first_available_slot().is_some()
    }

    pub fn first_available_slot(&self) -> Option<usize> {
        self.slots.iter().position(DrawingTemplate::is_empty)
    }

    /// Save into the first empty slot, returning its index
    pub fn save_to_available(&mut self, png: Vec<u8>, mode: SaveMode) -> TemplateResult<usize> {
        let index = match (self.first_available_slot(), mode) {
            (Some(index), _) => index,
            (None, SaveMode::OverwriteLast) if !self.slots.is_empty() => self.slots.len() - 1,
            _ => return Err(TemplateError::NoSlotAvailable),
        };
        self.save(png, index)?;
        Ok(index)
    }

    fn persist(&mut self) -> TemplateResult<()> {
        let json = serde_json::to_string(&self.slots).map_err(PersistenceError::from)?;
        self.store.set_string(TEMPLATES_KEY, json)?;
        Ok(())
    }
}
