use ab_glyph::{Font, FontArc, GlyphId, OutlineCurve, ScaleFont};
use egui::Rect;
use tiny_skia::{Path, PathBuilder};

use crate::element::TextAlignment;

/// Shown when a text shape has no content yet
pub const PLACEHOLDER_TEXT: &str = "Text";

/// Break `text` into lines of at most `max_chars` characters.
///
/// Words are kept whole when they fit; longer words are split. Explicit
/// newlines always start a new line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
            if needed > max_chars && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        if current_len > 0 || paragraph.trim().is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Lays text out as glyph outlines inside a rect
#[derive(Clone)]
pub struct TextLayout<'a> {
    font: &'a FontArc,
    font_size: f32,
    wrap_chars: usize,
}

impl<'a> TextLayout<'a> {
    pub fn new(font: &'a FontArc, font_size: f32, wrap_chars: usize) -> Self {
        Self {
            font,
            font_size,
            wrap_chars,
        }
    }

    fn line_width(&self, line: &str) -> f32 {
        let scaled = self.font.as_scaled(self.font_size);
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;
        for ch in line.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }

    /// Build one path holding every glyph, block centred vertically in `rect`
    /// and each line aligned horizontally per `alignment`
    pub fn build_path(&self, text: &str, rect: Rect, alignment: TextAlignment) -> Option<Path> {
        let text = if text.trim().is_empty() { PLACEHOLDER_TEXT } else { text };
        let lines = wrap_text(text, self.wrap_chars);
        let scaled = self.font.as_scaled(self.font_size);
        let h_factor = scaled.h_scale_factor();
        let v_factor = scaled.v_scale_factor();
        let line_height = scaled.height() + scaled.line_gap();

        let block_height = line_height * lines.len() as f32;
        let top = rect.center().y - block_height / 2.0;

        let mut pb = PathBuilder::new();
        for (row, line) in lines.iter().enumerate() {
            let width = self.line_width(line);
            let mut pen_x = match alignment {
                TextAlignment::Left => rect.min.x,
                TextAlignment::Center => rect.center().x - width / 2.0,
                TextAlignment::Right => rect.max.x - width,
            };
            let baseline = top + row as f32 * line_height + scaled.ascent();

            let mut previous: Option<GlyphId> = None;
            for ch in line.chars() {
                let id = self.font.glyph_id(ch);
                if let Some(prev) = previous {
                    pen_x += scaled.kern(prev, id);
                }
                if let Some(outline) = self.font.outline(id) {
                    // Outlines are in font units with y pointing up
                    let map =
                        |p: ab_glyph::Point| (pen_x + p.x * h_factor, baseline - p.y * v_factor);
                    push_curves(&mut pb, &outline.curves, map);
                }
                pen_x += scaled.h_advance(id);
                previous = Some(id);
            }
        }
        pb.finish()
    }
}

fn push_curves(
    pb: &mut PathBuilder,
    curves: &[OutlineCurve],
    map: impl Fn(ab_glyph::Point) -> (f32, f32),
) {
    let mut last_end: Option<ab_glyph::Point> = None;
    for curve in curves {
        let start = match curve {
            OutlineCurve::Line(p0, _)
            | OutlineCurve::Quad(p0, _, _)
            | OutlineCurve::Cubic(p0, _, _, _) => *p0,
        };
        if last_end != Some(start) {
            if last_end.is_some() {
                pb.close();
            }
            let (x, y) = map(start);
            pb.move_to(x, y);
        }
        match curve {
            OutlineCurve::Line(_, p1) => {
                let (x, y) = map(*p1);
                pb.line_to(x, y);
                last_end = Some(*p1);
            }
            OutlineCurve::Quad(_, c, p1) => {
                let (cx, cy) = map(*c);
                let (x, y) = map(*p1);
                pb.quad_to(cx, cy, x, y);
                last_end = Some(*p1);
            }
            OutlineCurve::Cubic(_, c0, c1, p1) => {
                let (c0x, c0y) = map(*c0);
                let (c1x, c1y) = map(*c1);
                let (x, y) = map(*p1);
                pb.cubic_to(c0x, c0y, c1x, c1y, x, y);
                last_end = Some(*p1);
            }
        }
    }
    if last_end.is_some() {
        pb.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("hello brave new world", 11),
            vec!["hello brave", "new world"]
        );
    }

    #[test]
    fn splits_long_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn keeps_explicit_newlines() {
        assert_eq!(wrap_text("one\n\ntwo", 10), vec!["one", "", "two"]);
    }
}
