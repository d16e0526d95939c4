use egui::{Align2, Color32, FontId, Response, Sense, Stroke, Ui};

use crate::tools::ToolKind;

/// Square icon button for one tool
pub struct ToolButton {
    pub tool: ToolKind,
    pub selected: bool,
    /// Tools are locked while a shape awaits confirmation
    pub enabled: bool,
}

impl ToolButton {
    pub fn new(tool: ToolKind, selected: bool, enabled: bool) -> Self {
        Self {
            tool,
            selected,
            enabled,
        }
    }

    pub fn show(&self, ui: &mut Ui) -> Response {
        let sense = if self.enabled { Sense::click() } else { Sense::hover() };
        let (rect, response) = ui.allocate_exact_size(egui::vec2(36.0, 36.0), sense);

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                Color32::from_rgb(100, 181, 246)
            } else if response.hovered() && self.enabled {
                Color32::from_gray(40)
            } else {
                Color32::from_gray(30)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let text_color = match (self.selected, self.enabled) {
                (true, _) => Color32::BLACK,
                (false, true) => Color32::WHITE,
                (false, false) => Color32::from_gray(90),
            };
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.tool.icon(),
                FontId::proportional(22.0),
                text_color,
            );

            if self.selected {
                ui.painter()
                    .rect_stroke(rect, 4.0, Stroke::new(2.0, Color32::from_rgb(33, 150, 243)));
            }
        }

        response.on_hover_text(self.tool.name())
    }
}
