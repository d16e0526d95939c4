//! The editing session: owns the line collection and routes gestures
//! through validation and the transform resolver.

mod toast;

use egui::{Pos2, Rect};
use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::command::{Command, CommandHistory};
use crate::config::CanvasConfig;
use crate::element::{Line, LineStyle, ShapeKind, ShapeSizeError};
use crate::event::{CanvasEvent, EventBus};
use crate::input::{
    CanvasInput, GestureConfig, GestureInterpreter, GestureState, InputContext, Interpretation,
    PointerEvent, Preview,
};
use crate::render::{encode_png, AffordanceStyle, FlattenJob, RenderResult, RenderTarget, Renderer};
use crate::state::KeyValueStore;
use crate::template::{SaveMode, TemplateResult, TemplateStore};
use crate::tools::ToolKind;
use crate::transform;

pub use toast::Toast;

/// Owns everything drawn in one session and is the only writer of the
/// line collection
#[derive(Debug)]
pub struct CanvasController {
    config: CanvasConfig,
    renderer: Renderer,
    interpreter: GestureInterpreter,
    lines: Vec<Line>,
    history: CommandHistory,
    backing: Option<Pixmap>,
    tool: ToolKind,
    style: LineStyle,
    toast: Toast,
    events: EventBus,
    version: u64,
    now: f64,
}

impl CanvasController {
    pub fn new(config: CanvasConfig, renderer: Renderer) -> Self {
        Self {
            interpreter: GestureInterpreter::new(GestureConfig::from(&config)),
            toast: Toast::new(config.message_duration),
            config,
            renderer,
            lines: Vec::new(),
            history: CommandHistory::new(),
            backing: None,
            tool: ToolKind::default(),
            style: LineStyle::default(),
            events: EventBus::new(),
            version: 0,
            now: 0.0,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn style(&self) -> &LineStyle {
        &self.style
    }

    pub fn backing(&self) -> Option<&Pixmap> {
        self.backing.as_ref()
    }

    /// Bumped on every visible change, for texture caching
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The unconfirmed shape, if there is one
    pub fn editing_shape(&self) -> Option<&Line> {
        self.lines.iter().rev().find(|line| line.is_editable())
    }

    pub fn is_editing(&self) -> bool {
        self.editing_shape().is_some()
    }

    /// A pointer gesture is in progress; hold timers need frames
    pub fn is_gesture_active(&self) -> bool {
        !self.interpreter.is_idle()
    }

    fn editing_index(&self) -> Option<usize> {
        self.lines.iter().rposition(Line::is_editable)
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    fn input_context(&self) -> InputContext {
        InputContext {
            tool: self.tool,
            editing: self.editing_shape().map(Line::world_bounds),
        }
    }

    /// Switch tools. Ignored while a shape awaits confirmation.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        if self.is_editing() {
            log::debug!("Ignoring tool change to {:?} while a shape is unconfirmed", tool);
            return false;
        }
        if tool == self.tool {
            return true;
        }
        let old = std::mem::replace(&mut self.tool, tool);
        self.interpreter.cancel();
        self.touch();
        self.events.emit(CanvasEvent::ToolChanged { old, new: tool });
        true
    }

    /// Style for new lines. The unconfirmed shape, if any, takes it too.
    pub fn set_style(&mut self, style: LineStyle) {
        if let Some(index) = self.editing_index() {
            self.lines[index].style = LineStyle {
                is_eraser: false,
                ..style.clone()
            };
        }
        self.style = style;
        self.touch();
    }

    /// Select the shape tool with `kind`. Ignored while a shape awaits
    /// confirmation, so at most one shape is ever unconfirmed.
    pub fn begin_shape(&mut self, kind: ShapeKind) -> bool {
        if self.is_editing() {
            log::debug!("Ignoring new {:?}: confirm the current shape first", kind);
            return false;
        }
        self.style.shape = kind;
        self.set_tool(ToolKind::Shape)
    }

    /// Route one input from the canvas surface
    pub fn handle_input(&mut self, input: CanvasInput) {
        match input {
            CanvasInput::Pointer(event) => self.handle_pointer(event),
            CanvasInput::Pinch {
                magnification,
                time,
            } => self.pinch_changed(magnification, time),
            CanvasInput::PinchEnded => self.pinch_ended(),
            CanvasInput::Tick(time) => self.tick(time),
        }
    }

    pub fn pointer_pressed(&mut self, pos: Pos2, time: f64) {
        self.handle_pointer(PointerEvent::Pressed { pos, time });
    }

    pub fn pointer_moved(&mut self, pos: Pos2, time: f64) {
        self.handle_pointer(PointerEvent::Moved { pos, time });
    }

    pub fn pointer_released(&mut self, pos: Pos2, time: f64) {
        self.handle_pointer(PointerEvent::Released { pos, time });
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.now = event.time();
        let ctx = self.input_context();
        let interpretation = self.interpreter.handle_pointer(event, &ctx);
        self.dispatch(interpretation);
    }

    /// Advance hold timers; call once per frame
    pub fn tick(&mut self, time: f64) {
        self.now = time;
        let interpretation = self.interpreter.tick(time);
        self.dispatch(interpretation);
    }

    /// Cumulative magnification since the pinch began
    pub fn pinch_changed(&mut self, magnification: f32, time: f64) {
        self.now = time;
        let ctx = self.input_context();
        let interpretation = self.interpreter.pinch_changed(magnification, &ctx);
        self.dispatch(interpretation);
    }

    pub fn pinch_ended(&mut self) {
        self.interpreter.pinch_ended();
    }

    fn dispatch(&mut self, interpretation: Interpretation) {
        match interpretation {
            Interpretation::Nothing => {}
            Interpretation::StrokeUpdated | Interpretation::ShapeUpdated => self.touch(),
            Interpretation::CommitStroke(points) => {
                let style = match self.tool {
                    ToolKind::Eraser => self.style.as_eraser(),
                    _ => self.style.clone(),
                };
                self.commit(Line::stroke(points, style));
            }
            Interpretation::CommitShape(rect) => self.commit_shape(rect),
            Interpretation::Transform(gesture) => self.apply_gesture(gesture),
            Interpretation::Confirm => {
                self.confirm_shape();
            }
        }
    }

    fn commit_shape(&mut self, rect: Rect) {
        let style = LineStyle {
            is_eraser: false,
            ..self.style.clone()
        };
        let shape = Line::shape(rect, style);
        if let Err(reason) = self.config.size_limits.validate_line(&shape) {
            self.reject(reason);
            return;
        }
        self.commit(shape);
        self.events.emit(CanvasEvent::EditingChanged(true));
    }

    fn commit(&mut self, line: Line) {
        let (id, is_shape) = (line.id, line.is_shape());
        if let Err(err) = self.history.execute(Command::AddLine(line), &mut self.lines) {
            log::error!("Failed to add line: {}", err);
            return;
        }
        log::debug!("Committed {} {}", if is_shape { "shape" } else { "stroke" }, id);
        self.touch();
        self.events.emit(CanvasEvent::LineCommitted { id, is_shape });
        self.emit_history();
    }

    fn apply_gesture(&mut self, gesture: GestureState) {
        if let GestureState::InvalidSize(reason) = gesture {
            self.reject(reason);
            return;
        }
        let Some(index) = self.editing_index() else {
            return;
        };
        match transform::apply(&mut self.lines[index], &gesture, &self.config.size_limits) {
            Ok(true) => self.touch(),
            // The resize highlight still changes
            Ok(false) if matches!(gesture, GestureState::PrepareResizing(_)) => self.touch(),
            Ok(false) => {}
            Err(reason) => {
                self.interpreter.reject_step();
                self.reject(reason);
            }
        }
    }

    fn reject(&mut self, reason: ShapeSizeError) {
        log::info!("Rejected shape geometry: {}", reason);
        self.toast.show(reason.to_string(), self.now);
        self.touch();
        self.events.emit(CanvasEvent::SizeRejected(reason));
    }

    /// Freeze the unconfirmed shape. Returns false if there was none.
    pub fn confirm_shape(&mut self) -> bool {
        let Some(index) = self.editing_index() else {
            return false;
        };
        let line = &mut self.lines[index];
        line.confirm();
        let id = line.id;
        log::debug!("Confirmed shape {}", id);
        self.touch();
        self.events.emit(CanvasEvent::ShapeConfirmed { id });
        self.events.emit(CanvasEvent::EditingChanged(false));
        true
    }

    pub fn undo(&mut self) {
        let was_editing = self.is_editing();
        if let Err(err) = self.history.undo(&mut self.lines) {
            log::error!("Undo failed: {}", err);
        }
        self.after_history_change(was_editing);
    }

    pub fn redo(&mut self) {
        let was_editing = self.is_editing();
        if let Err(err) = self.history.redo(&mut self.lines) {
            log::error!("Redo failed: {}", err);
        }
        self.after_history_change(was_editing);
    }

    /// Remove every line, undoably
    pub fn clear(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        let was_editing = self.is_editing();
        let removed = self.lines.clone();
        if let Err(err) = self.history.execute(Command::Clear(removed), &mut self.lines) {
            log::error!("Clear failed: {}", err);
            return;
        }
        self.events.emit(CanvasEvent::Cleared);
        self.after_history_change(was_editing);
    }

    fn after_history_change(&mut self, was_editing: bool) {
        self.interpreter.cancel();
        self.touch();
        let editing = self.is_editing();
        if editing != was_editing {
            self.events.emit(CanvasEvent::EditingChanged(editing));
        }
        self.emit_history();
    }

    fn emit_history(&self) {
        self.events.emit(CanvasEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    /// Text of the transient message visible at `now`
    pub fn message(&self, now: f64) -> Option<&str> {
        self.toast.current(now)
    }

    pub fn message_expires_at(&self) -> Option<f64> {
        self.toast.expires_at()
    }

    /// The stroke or shape box being dragged out, styled as it will commit
    pub fn preview_line(&self) -> Option<Line> {
        match self.interpreter.preview()? {
            Preview::Stroke(points) => {
                let style = match self.tool {
                    ToolKind::Eraser => self.style.as_eraser(),
                    _ => self.style.clone(),
                };
                Some(Line::stroke(points.to_vec(), style))
            }
            Preview::Shape(rect) => Some(Line::shape(rect, self.style.clone())),
        }
    }

    /// Interactive render with affordances
    pub fn render(&self, target: RenderTarget) -> RenderResult<Pixmap> {
        let affordances = AffordanceStyle {
            handle_radius: self.config.handle_radius,
            confirm_button_radius: self.config.confirm_button_radius,
            active_resize: self.interpreter.active_resize_edge(),
        };
        let preview = self.preview_line();
        self.renderer.render_canvas(
            target,
            self.backing.as_ref(),
            &self.lines,
            preview.as_ref(),
            Some(&affordances),
        )
    }

    /// Snapshot for flattening on a worker thread
    pub fn flatten_job(&self, target: RenderTarget) -> FlattenJob {
        FlattenJob {
            renderer: self.renderer.clone(),
            target,
            backing: self.backing.clone(),
            lines: self.lines.clone(),
        }
    }

    /// Backing image and lines composited without affordances
    pub fn flatten(&self, target: RenderTarget) -> RenderResult<RgbaImage> {
        self.flatten_job(target).run()
    }

    /// Flatten into the backing image and end the session
    pub fn pin(&mut self, target: RenderTarget) -> RenderResult<()> {
        let pixmap = self
            .renderer
            .flatten(target, self.backing.as_ref(), &self.lines)?;
        let was_editing = self.is_editing();
        log::info!("Pinned {} lines into the backing image", self.lines.len());
        self.backing = Some(pixmap);
        self.lines.clear();
        self.history.clear();
        self.interpreter.cancel();
        self.touch();
        if was_editing {
            self.events.emit(CanvasEvent::EditingChanged(false));
        }
        self.events.emit(CanvasEvent::Pinned);
        self.emit_history();
        Ok(())
    }

    /// Flatten and store as PNG in the first free template slot
    pub fn save_as_template<S: KeyValueStore>(
        &self,
        templates: &mut TemplateStore<S>,
        target: RenderTarget,
        mode: SaveMode,
    ) -> TemplateResult<usize> {
        let image = self.flatten(target)?;
        let slot = templates.save_to_available(encode_png(&image)?, mode)?;
        self.events.emit(CanvasEvent::TemplateSaved { slot });
        Ok(slot)
    }

    /// Store an image flattened elsewhere (e.g. by a worker) as a template
    pub fn store_template<S: KeyValueStore>(
        &self,
        templates: &mut TemplateStore<S>,
        image: &RgbaImage,
        mode: SaveMode,
    ) -> TemplateResult<usize> {
        let slot = templates.save_to_available(encode_png(image)?, mode)?;
        self.events.emit(CanvasEvent::TemplateSaved { slot });
        Ok(slot)
    }

    /// Use a stored template image as the backing image
    pub fn load_backing(&mut self, image: &RgbaImage) -> RenderResult<()> {
        self.backing = Some(crate::render::image_to_pixmap(image)?);
        self.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn controller() -> CanvasController {
        CanvasController::new(CanvasConfig::default(), Renderer::new(16))
    }

    #[test]
    fn stroke_commit_records_history() {
        let mut canvas = controller();
        canvas.pointer_pressed(pos2(10.0, 10.0), 0.0);
        canvas.pointer_moved(pos2(30.0, 10.0), 0.05);
        assert!(canvas.preview_line().is_some());
        canvas.pointer_released(pos2(50.0, 10.0), 0.1);

        assert_eq!(canvas.lines().len(), 1);
        assert!(canvas.can_undo());
        assert!(canvas.preview_line().is_none());
    }

    #[test]
    fn eraser_tool_commits_eraser_strokes() {
        let mut canvas = controller();
        canvas.set_tool(ToolKind::Eraser);
        canvas.pointer_pressed(pos2(10.0, 10.0), 0.0);
        canvas.pointer_released(pos2(40.0, 10.0), 0.1);
        assert!(canvas.lines()[0].style.is_eraser);
    }

    #[test]
    fn small_shape_is_rejected_with_message() {
        let mut canvas = controller();
        canvas.begin_shape(ShapeKind::Circle);
        canvas.pointer_pressed(pos2(10.0, 10.0), 1.0);
        canvas.pointer_moved(pos2(20.0, 20.0), 1.1);
        canvas.pointer_released(pos2(20.0, 20.0), 1.2);

        assert!(canvas.lines().is_empty());
        assert_eq!(canvas.message(1.3), Some("Shape is too small"));
        assert_eq!(canvas.message(1.8), None);
    }

    #[test]
    fn set_style_restyles_unconfirmed_shape() {
        let mut canvas = controller();
        canvas.begin_shape(ShapeKind::Text);
        canvas.pointer_pressed(pos2(0.0, 0.0), 0.0);
        canvas.pointer_released(pos2(200.0, 100.0), 0.1);

        let style = LineStyle {
            text: "hello".to_owned(),
            ..canvas.style().clone()
        };
        canvas.set_style(style);
        assert_eq!(canvas.lines()[0].style.text, "hello");
    }
}
