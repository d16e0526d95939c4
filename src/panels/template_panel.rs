use egui::{vec2, Button, Image, Layout};

use crate::app::MirrorCanvasApp;
use crate::template::SaveMode;

const THUMBNAIL_SIZE: f32 = 96.0;

pub fn template_panel(app: &mut MirrorCanvasApp, ctx: &egui::Context) {
    egui::SidePanel::right("template_panel")
        .resizable(false)
        .default_width(THUMBNAIL_SIZE + 40.0)
        .show(ctx, |ui| {
            ui.heading("Templates");

            let saving = app.is_saving_template();
            if ui
                .add_enabled(!saving, Button::new("Save as template"))
                .clicked()
            {
                app.request_template_save(SaveMode::Normal);
            }
            if saving {
                ui.spinner();
            }
            ui.separator();

            let slots: Vec<(String, bool)> = app
                .templates()
                .list_slots()
                .iter()
                .map(|slot| (slot.name.clone(), !slot.is_empty()))
                .collect();

            egui::ScrollArea::vertical().show(ui, |ui| {
                for (index, (name, filled)) in slots.into_iter().enumerate() {
                    ui.label(name);
                    match app.template_texture(ctx, index) {
                        Some(Ok(texture)) => {
                            let size = vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE);
                            ui.add(Image::new((texture, size)).maintain_aspect_ratio(true));
                        }
                        Some(Err(err)) => {
                            log::error!("Template {} thumbnail failed: {}", index, err);
                            ui.weak("Unreadable image");
                        }
                        None => {
                            ui.weak("Empty");
                        }
                    }
                    if filled {
                        ui.horizontal(|ui| {
                            if ui.small_button("Use").clicked() {
                                app.use_template(index);
                            }
                            if ui.small_button("Delete").clicked() {
                                app.delete_template(index);
                            }
                        });
                    }
                    ui.add_space(6.0);
                }
            });
        });

    if app.show_override_prompt() {
        egui::Window::new("No template slot available")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("All template slots are in use. Overwrite the last one?");
                ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Overwrite last").clicked() {
                        app.request_template_save(SaveMode::OverwriteLast);
                    }
                    if ui.button("Cancel").clicked() {
                        app.dismiss_override_prompt();
                    }
                });
            });
    }
}
