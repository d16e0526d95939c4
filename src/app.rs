use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use egui::{ColorImage, TextureId};
use futures::channel::oneshot::Canceled;

use crate::canvas::CanvasController;
use crate::config::{CanvasConfig, CONFIG_KEY};
use crate::event::CanvasEvent;
use crate::input::InputHandler;
use crate::panels;
use crate::render::{self, spawn_flatten, FlattenReceiver, RenderTarget, Renderer};
use crate::state::MemoryStore;
use crate::template::{SaveMode, TemplateError, TemplateStore, TEMPLATES_KEY};
use crate::texture_manager::{TextureGenerationError, TextureKey, TextureManager};

/// A template save waiting on the flatten worker
struct PendingTemplate {
    receiver: FlattenReceiver,
    mode: SaveMode,
}

/// Composition root: builds the store, config, renderer and canvas once and
/// hands them to the panels
pub struct MirrorCanvasApp {
    canvas: CanvasController,
    templates: TemplateStore<MemoryStore>,
    input: InputHandler,
    textures: TextureManager,
    /// Bumped whenever template slots change, for thumbnail caching
    template_revision: u64,
    pending_template: Option<PendingTemplate>,
    show_override_prompt: bool,
    canvas_target: Option<RenderTarget>,
    status: Rc<RefCell<String>>,
}

impl MirrorCanvasApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let store = match cc.storage {
            Some(storage) => MemoryStore::from_storage(storage, &[CONFIG_KEY, TEMPLATES_KEY]),
            None => {
                log::warn!("No app storage available, templates will not persist");
                MemoryStore::default()
            }
        };
        Self::with_store(store)
    }

    /// Build the app over `store`, which is flushed to eframe's storage
    /// whenever it changes
    pub fn with_store(store: MemoryStore) -> Self {
        let config = CanvasConfig::load(&store);
        let renderer = Renderer::new(config.text_wrap_chars);
        let templates = TemplateStore::load(store, config.template_slots);
        let canvas = CanvasController::new(config, renderer);

        let status = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&status);
        canvas.events().subscribe(Box::new(move |event: &CanvasEvent| {
            let text = match event {
                CanvasEvent::ToolChanged { new, .. } => format!("{} selected", new.name()),
                CanvasEvent::LineCommitted { is_shape: true, .. } => "Shape added".to_owned(),
                CanvasEvent::LineCommitted { .. } => "Stroke added".to_owned(),
                CanvasEvent::ShapeConfirmed { .. } => "Shape confirmed".to_owned(),
                CanvasEvent::SizeRejected(reason) => reason.to_string(),
                CanvasEvent::Pinned => "Drawing pinned".to_owned(),
                CanvasEvent::Cleared => "Canvas cleared".to_owned(),
                CanvasEvent::TemplateSaved { slot } => format!("Saved to template {}", slot + 1),
                CanvasEvent::EditingChanged(_) | CanvasEvent::HistoryChanged { .. } => return,
            };
            *sink.borrow_mut() = text;
        }));

        Self {
            canvas,
            templates,
            input: InputHandler::new(),
            textures: TextureManager::new(16),
            template_revision: 0,
            pending_template: None,
            show_override_prompt: false,
            canvas_target: None,
            status,
        }
    }

    pub fn canvas(&self) -> &CanvasController {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut CanvasController {
        &mut self.canvas
    }

    pub fn templates(&self) -> &TemplateStore<MemoryStore> {
        &self.templates
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    pub fn set_canvas_target(&mut self, target: RenderTarget) {
        self.canvas_target = Some(target);
    }

    pub fn is_saving_template(&self) -> bool {
        self.pending_template.is_some()
    }

    pub fn show_override_prompt(&self) -> bool {
        self.show_override_prompt
    }

    pub fn dismiss_override_prompt(&mut self) {
        self.show_override_prompt = false;
    }

    /// Texture of the current canvas, re-rendered only after changes
    pub fn canvas_texture(
        &mut self,
        ctx: &egui::Context,
    ) -> Result<TextureId, TextureGenerationError> {
        let target = self.canvas_target.ok_or(TextureGenerationError::InvalidDimensions)?;
        let mut hasher = DefaultHasher::new();
        (self.canvas.version(), target.pixel_size()).hash(&mut hasher);
        let canvas = &self.canvas;
        self.textures.get_or_create_texture(
            TextureKey::Canvas,
            hasher.finish(),
            || Ok(render::to_color_image(&canvas.render(target)?)),
            ctx,
        )
    }

    /// Thumbnail for a filled template slot
    pub fn template_texture(
        &mut self,
        ctx: &egui::Context,
        slot: usize,
    ) -> Option<Result<TextureId, TextureGenerationError>> {
        let png = self.templates.list_slots().get(slot)?.image.as_deref()?;
        Some(self.textures.get_or_create_texture(
            TextureKey::TemplateThumbnail(slot),
            self.template_revision,
            || {
                let image = render::decode_png(png)?;
                let size = [image.width() as usize, image.height() as usize];
                Ok(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
            },
            ctx,
        ))
    }

    /// Pin the drawing into the backing image
    pub fn pin(&mut self) {
        let Some(target) = self.canvas_target else {
            return;
        };
        if let Err(err) = self.canvas.pin(target) {
            log::error!("Pin failed: {}", err);
        }
    }

    /// Flatten on the worker and store into a free slot. With
    /// `SaveMode::Normal` and no free slot, asks for override first.
    pub fn request_template_save(&mut self, mode: SaveMode) {
        if self.pending_template.is_some() {
            return;
        }
        if mode == SaveMode::Normal && !self.templates.has_available_slot() {
            self.show_override_prompt = true;
            return;
        }
        self.show_override_prompt = false;
        let Some(target) = self.canvas_target else {
            return;
        };

        match spawn_flatten(self.canvas.flatten_job(target)) {
            Ok(receiver) => self.pending_template = Some(PendingTemplate { receiver, mode }),
            Err(err) => {
                log::warn!("Flattening on the UI thread: {}", err);
                let result = self.canvas.save_as_template(&mut self.templates, target, mode);
                self.finish_template_save(result.map(|_| ()));
            }
        }
    }

    /// Pick up a finished flatten from the worker
    pub fn poll_pending_template(&mut self) {
        let Some(pending) = &mut self.pending_template else {
            return;
        };
        let outcome = match pending.receiver.try_recv() {
            Ok(None) => return,
            Ok(Some(outcome)) => outcome,
            Err(Canceled) => Err(render::RenderError::WorkerCancelled),
        };
        let mode = pending.mode;
        self.pending_template = None;

        let result = outcome
            .map_err(TemplateError::from)
            .and_then(|image| self.canvas.store_template(&mut self.templates, &image, mode))
            .map(|_| ());
        self.finish_template_save(result);
    }

    fn finish_template_save(&mut self, result: Result<(), TemplateError>) {
        match result {
            Ok(()) => self.template_revision += 1,
            Err(TemplateError::NoSlotAvailable) => self.show_override_prompt = true,
            Err(err) => log::error!("Saving template failed: {}", err),
        }
    }

    pub fn delete_template(&mut self, slot: usize) {
        match self.templates.delete(slot) {
            Ok(()) => {
                self.template_revision += 1;
                self.textures.invalidate(TextureKey::TemplateThumbnail(slot));
            }
            Err(err) => log::error!("Deleting template failed: {}", err),
        }
    }

    /// Put a stored template under the drawing
    pub fn use_template(&mut self, slot: usize) {
        let slots = self.templates.list_slots();
        let Some(png) = slots.get(slot).and_then(|t| t.image.as_deref()) else {
            return;
        };
        let result = render::decode_png(png).and_then(|image| self.canvas.load_backing(&image));
        if let Err(err) = result {
            log::error!("Loading template {} failed: {}", slot, err);
        }
    }
}

impl eframe::App for MirrorCanvasApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.textures.begin_frame();
        self.poll_pending_template();

        panels::tools_panel(self, ctx);
        panels::template_panel(self, ctx);
        panels::central_panel(self, ctx);

        if self.pending_template.is_some() {
            ctx.request_repaint();
        }
        if let Some(storage) = frame.storage_mut() {
            self.templates.store_mut().flush_into(storage);
        }
    }

    /// Called by the framework on shutdown and on its autosave interval
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.templates.store_mut().flush_into(storage);
    }
}
