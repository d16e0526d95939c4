//! Rasterization shared by the interactive canvas and offscreen flatten.
//!
//! Both targets go through [`Renderer::compose`]: the pinned backing image,
//! then a separate lines layer (so the eraser only clears drawn lines), then
//! the editing affordances when requested.

pub mod affordance;
pub mod path;
pub mod text;
mod worker;

use std::io::Cursor;

use ab_glyph::FontArc;
use egui::{ColorImage, Vec2};
use image::{ImageFormat, RgbaImage};
use thiserror::Error;
use tiny_skia::{
    BlendMode, ColorU8, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint,
    Stroke, Transform,
};

use crate::element::{DrawMode, Line, ShapeKind};
use crate::transform::Placement;

pub use affordance::AffordanceStyle;
pub use worker::{spawn_flatten, FlattenJob, FlattenReceiver};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid raster size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
    #[error("Failed to start render worker: {0}")]
    Worker(#[from] std::io::Error),
    #[error("Render worker stopped before finishing")]
    WorkerCancelled,
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Output size and density of a render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTarget {
    /// Canvas size in points
    pub size: Vec2,
    pub pixels_per_point: f32,
}

impl RenderTarget {
    pub fn new(size: Vec2, pixels_per_point: f32) -> Self {
        Self {
            size,
            pixels_per_point,
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        let scaled = self.size * self.pixels_per_point;
        (scaled.x.round().max(0.0) as u32, scaled.y.round().max(0.0) as u32)
    }

    fn base_transform(&self) -> Transform {
        Transform::from_scale(self.pixels_per_point, self.pixels_per_point)
    }

    fn new_pixmap(&self) -> RenderResult<Pixmap> {
        let (width, height) = self.pixel_size();
        Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })
    }
}

/// Draws lines, shapes and affordances into tiny-skia pixmaps
#[derive(Clone)]
pub struct Renderer {
    font: Option<FontArc>,
    text_wrap_chars: usize,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("has_font", &self.font.is_some())
            .field("text_wrap_chars", &self.text_wrap_chars)
            .finish()
    }
}

impl Renderer {
    pub fn new(text_wrap_chars: usize) -> Self {
        let font = match FontArc::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT) {
            Ok(font) => Some(font),
            Err(err) => {
                log::error!("Failed to load text font, text shapes will not render: {}", err);
                None
            }
        };
        Self {
            font,
            text_wrap_chars,
        }
    }

    /// Interactive render: backing image, lines, the in-progress preview and
    /// the affordances of any editable shape
    pub fn render_canvas(
        &self,
        target: RenderTarget,
        backing: Option<&Pixmap>,
        lines: &[Line],
        preview: Option<&Line>,
        affordances: Option<&AffordanceStyle>,
    ) -> RenderResult<Pixmap> {
        self.compose(target, backing, lines, preview, affordances)
    }

    /// Offscreen render of the finished drawing, without affordances
    pub fn flatten(
        &self,
        target: RenderTarget,
        backing: Option<&Pixmap>,
        lines: &[Line],
    ) -> RenderResult<Pixmap> {
        self.compose(target, backing, lines, None, None)
    }

    fn compose(
        &self,
        target: RenderTarget,
        backing: Option<&Pixmap>,
        lines: &[Line],
        preview: Option<&Line>,
        affordances: Option<&AffordanceStyle>,
    ) -> RenderResult<Pixmap> {
        let mut canvas = target.new_pixmap()?;
        if let Some(backing) = backing {
            draw_backing(&mut canvas, backing);
        }

        let base = target.base_transform();
        let mut layer = target.new_pixmap()?;
        for line in lines.iter().chain(preview) {
            self.draw_line(&mut layer, line, base);
        }
        let paint = PixmapPaint::default();
        canvas.draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), None);

        if let Some(style) = affordances {
            for line in lines.iter().filter(|line| line.is_editable()) {
                affordance::draw_affordances(&mut canvas, line.world_bounds(), style, base);
            }
        }
        Ok(canvas)
    }

    /// Draw one line in world space, `base` mapping points to pixels
    pub fn draw_line(&self, pixmap: &mut Pixmap, line: &Line, base: Transform) {
        let paint = line_paint(line);
        let stroke = Stroke {
            width: line.style.width.max(0.5),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };

        let Some(placement) = line.placement() else {
            match path::stroke_path(&line.points) {
                Some(path) => pixmap.stroke_path(&path, &paint, &stroke, base, None),
                None => {
                    if let Some(dot) = line
                        .points
                        .first()
                        .and_then(|p| PathBuilder::from_circle(p.x, p.y, stroke.width / 2.0))
                    {
                        pixmap.fill_path(&dot, &paint, FillRule::Winding, base, None);
                    }
                }
            }
            return;
        };

        let transform = base.pre_concat(placement_transform(&placement));
        let kind = line.style.shape;
        if kind == ShapeKind::Text {
            let Some(font) = &self.font else {
                return;
            };
            let layout = text::TextLayout::new(font, line.style.font_size, self.text_wrap_chars);
            let alignment = line.style.text_alignment;
            if let Some(path) = layout.build_path(&line.style.text, placement.rect, alignment) {
                pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
            }
            return;
        }

        let Some(path) = path::shape_path(kind, placement.rect) else {
            return;
        };
        if line.style.draw_mode == DrawMode::Fill && !path::is_line_only(kind) {
            pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
        } else {
            pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        }
    }
}

fn line_paint(line: &Line) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.anti_alias = true;
    if line.style.is_eraser {
        paint.blend_mode = BlendMode::Clear;
        paint.set_color_rgba8(0, 0, 0, 255);
    } else {
        let [r, g, b, a] = line.style.effective_color().to_srgba_unmultiplied();
        paint.set_color_rgba8(r, g, b, a);
    }
    paint
}

fn placement_transform(placement: &Placement) -> Transform {
    let s = placement.scale;
    Transform::from_row(s, 0.0, 0.0, s, placement.position.x, placement.position.y)
}

/// Draw the backing image pixel for pixel from the top-left corner. A
/// backing of another size is cropped or leaves the rest transparent.
fn draw_backing(canvas: &mut Pixmap, backing: &Pixmap) {
    canvas.draw_pixmap(
        0,
        0,
        backing.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

/// Premultiplied pixmap to a straight-alpha image
pub fn pixmap_to_image(pixmap: &Pixmap) -> RenderResult<RgbaImage> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let raw: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let c = pixel.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaImage::from_raw(width, height, raw).ok_or(RenderError::InvalidSize { width, height })
}

pub fn image_to_pixmap(image: &RgbaImage) -> RenderResult<Pixmap> {
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Upload format for the egui canvas texture
pub fn to_color_image(pixmap: &Pixmap) -> ColorImage {
    ColorImage::from_rgba_premultiplied(
        [pixmap.width() as usize, pixmap.height() as usize],
        pixmap.data(),
    )
}

pub fn encode_png(image: &RgbaImage) -> RenderResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub fn decode_png(bytes: &[u8]) -> RenderResult<RgbaImage> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::LineStyle;
    use egui::{pos2, vec2, Color32, Rect};

    fn target() -> RenderTarget {
        RenderTarget::new(vec2(200.0, 200.0), 1.0)
    }

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).map(|p| p.alpha()).unwrap_or(0)
    }

    #[test]
    fn zero_size_target_is_rejected() {
        let renderer = Renderer::new(16);
        let result = renderer.flatten(RenderTarget::new(Vec2::ZERO, 1.0), None, &[]);
        assert!(matches!(result, Err(RenderError::InvalidSize { .. })));
    }

    #[test]
    fn pixel_size_follows_density() {
        assert_eq!(RenderTarget::new(vec2(100.0, 50.0), 2.0).pixel_size(), (200, 100));
    }

    #[test]
    fn filled_rectangle_covers_its_interior() {
        let style = LineStyle {
            color: Color32::from_rgb(0, 0, 255),
            draw_mode: DrawMode::Fill,
            ..Default::default()
        };
        let rect = Rect::from_min_size(pos2(50.0, 50.0), vec2(100.0, 100.0));
        let pixmap = Renderer::new(16)
            .flatten(target(), None, &[Line::shape(rect, style)])
            .unwrap();
        assert_eq!(alpha_at(&pixmap, 100, 100), 255);
        assert_eq!(alpha_at(&pixmap, 10, 10), 0);
    }

    #[test]
    fn scaled_shape_is_drawn_in_world_space() {
        let style = LineStyle {
            draw_mode: DrawMode::Fill,
            ..Default::default()
        };
        let mut shape = Line::shape(Rect::from_min_size(pos2(0.0, 0.0), vec2(40.0, 40.0)), style);
        shape.scale = 2.0;
        shape.position = vec2(100.0, 100.0);
        let pixmap = Renderer::new(16).flatten(target(), None, &[shape]).unwrap();
        assert_eq!(alpha_at(&pixmap, 170, 170), 255);
        assert_eq!(alpha_at(&pixmap, 50, 50), 0);
    }

    #[test]
    fn eraser_clears_lines_but_not_backing() {
        let mut backing = target().new_pixmap().unwrap();
        backing.fill(tiny_skia::Color::from_rgba8(0, 255, 0, 255));

        let pen = LineStyle {
            width: 20.0,
            ..Default::default()
        };
        let stroke = Line::stroke(vec![pos2(20.0, 100.0), pos2(180.0, 100.0)], pen.clone());
        let eraser = Line::stroke(vec![pos2(100.0, 60.0), pos2(100.0, 140.0)], pen.as_eraser());
        let pixmap = Renderer::new(16)
            .flatten(target(), Some(&backing), &[stroke, eraser])
            .unwrap();

        let erased = pixmap.pixel(100, 100).unwrap().demultiply();
        assert_eq!((erased.red(), erased.green()), (0, 255));
        let drawn = pixmap.pixel(40, 100).unwrap().demultiply();
        assert_eq!((drawn.red(), drawn.green()), (255, 59));
    }

    #[test]
    fn smaller_backing_is_not_stretched() {
        let mut backing = Pixmap::new(20, 20).unwrap();
        backing.fill(tiny_skia::Color::from_rgba8(255, 0, 0, 255));
        let pixmap = Renderer::new(16).flatten(target(), Some(&backing), &[]).unwrap();

        assert_eq!(alpha_at(&pixmap, 10, 10), 255);
        assert_eq!(alpha_at(&pixmap, 19, 19), 255);
        assert_eq!(alpha_at(&pixmap, 20, 20), 0);
        assert_eq!(alpha_at(&pixmap, 100, 100), 0);
    }

    #[test]
    fn png_round_trip_keeps_dimensions() {
        let pixmap = Renderer::new(16)
            .flatten(RenderTarget::new(vec2(12.0, 8.0), 1.0), None, &[])
            .unwrap();
        let image = pixmap_to_image(&pixmap).unwrap();
        let decoded = decode_png(&encode_png(&image).unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (12, 8));
    }
}
