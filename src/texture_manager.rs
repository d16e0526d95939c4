use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use thiserror::Error;

use crate::render::RenderError;

/// Errors that can occur during texture generation
#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("Failed to render texture: {0}")]
    Render(#[from] RenderError),
    #[error("Invalid texture dimensions")]
    InvalidDimensions,
}

/// What a cached texture shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Canvas,
    TemplateThumbnail(usize),
}

/// Caches GPU textures per key, regenerating when the content version
/// changes and evicting the least recently used beyond `max_cache_size`
pub struct TextureManager {
    textures: HashMap<TextureKey, (u64, TextureHandle)>,
    /// Frame each key was last requested in
    last_used: HashMap<TextureKey, u64>,
    current_frame: u64,
    max_cache_size: usize,
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            textures: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size,
        }
    }

    /// Call at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Texture for `key` at `version`, running `generator` only when the
    /// cached texture is missing or stale
    pub fn get_or_create_texture<F>(
        &mut self,
        key: TextureKey,
        version: u64,
        generator: F,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        self.last_used.insert(key, self.current_frame);

        if let Some((cached_version, handle)) = self.textures.get_mut(&key) {
            if *cached_version != version {
                handle.set(generator()?, TextureOptions::LINEAR);
                *cached_version = version;
            }
            return Ok(handle.id());
        }

        let image = generator()?;
        if image.width() == 0 || image.height() == 0 {
            return Err(TextureGenerationError::InvalidDimensions);
        }
        let handle = ctx.load_texture(format!("{:?}", key), image, TextureOptions::LINEAR);
        let id = handle.id();
        self.textures.insert(key, (version, handle));
        self.prune_cache_if_needed();
        Ok(id)
    }

    pub fn invalidate(&mut self, key: TextureKey) {
        self.textures.remove(&key);
        self.last_used.remove(&key);
    }

    fn prune_cache_if_needed(&mut self) {
        if self.textures.len() <= self.max_cache_size {
            return;
        }

        let mut entries: Vec<(TextureKey, u64)> =
            self.last_used.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = self.textures.len() - self.max_cache_size;
        for (key, _) in entries.into_iter().take(to_remove) {
            self.invalidate(key);
        }
    }

    pub fn cache_size(&self) -> usize {
        self.textures.len()
    }

    #[cfg(test)]
    fn cached_version(&self, key: TextureKey) -> Option<u64> {
        self.textures.get(&key).map(|(version, _)| *version)
    }
}
