use egui::{Button, Slider};

use crate::app::MirrorCanvasApp;
use crate::components::ToolButton;
use crate::element::{DrawMode, ShapeKind, TextAlignment};
use crate::tools::ToolKind;

pub fn tools_panel(app: &mut MirrorCanvasApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let editing = app.canvas().is_editing();
            let active_tool = app.canvas().tool();
            ui.horizontal(|ui| {
                for tool in ToolKind::ALL {
                    if ToolButton::new(tool, tool == active_tool, !editing).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool.name());
                        app.canvas_mut().set_tool(tool);
                    }
                }
            });

            if active_tool == ToolKind::Shape {
                ui.add_space(4.0);
                let current = app.canvas().style().shape;
                ui.add_enabled_ui(!editing, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for kind in ShapeKind::ALL {
                            if ui.selectable_label(kind == current, kind.label()).clicked() {
                                app.canvas_mut().begin_shape(kind);
                            }
                        }
                    });
                });
                if editing {
                    ui.label("Tap ✔ on the shape to confirm it");
                }
            }

            ui.separator();
            style_section(app, ui);
            ui.separator();

            ui.horizontal(|ui| {
                let (can_undo, can_redo) = (app.canvas().can_undo(), app.canvas().can_redo());
                if ui.add_enabled(can_undo, Button::new("Undo")).clicked() {
                    app.canvas_mut().undo();
                }
                if ui.add_enabled(can_redo, Button::new("Redo")).clicked() {
                    app.canvas_mut().redo();
                }
                let has_lines = !app.canvas().lines().is_empty();
                if ui.add_enabled(has_lines, Button::new("Clear")).clicked() {
                    app.canvas_mut().clear();
                }
            });
            if ui.button("📌 Pin drawing").clicked() {
                app.pin();
            }

            ui.collapsing("History", |ui| {
                let history = app.canvas().history();
                egui::Grid::new("command_history_grid")
                    .num_columns(2)
                    .spacing([40.0, 4.0])
                    .striped(true)
                    .show(ui, |ui| {
                        ui.strong("Undo");
                        ui.strong("Redo");
                        ui.end_row();

                        let (undo, redo) = (history.undo_stack(), history.redo_stack());
                        for row in 0..undo.len().max(redo.len()) {
                            ui.label(undo.get(row).map_or("", |command| command.name()));
                            ui.label(redo.get(row).map_or("", |command| command.name()));
                            ui.end_row();
                        }
                    });
            });

            let status = app.status();
            if !status.is_empty() {
                ui.separator();
                ui.weak(status);
            }
        });
}

fn style_section(app: &mut MirrorCanvasApp, ui: &mut egui::Ui) {
    let mut style = app.canvas().style().clone();

    ui.horizontal(|ui| {
        ui.label("Color");
        ui.color_edit_button_srgba(&mut style.color);
    });
    ui.add(Slider::new(&mut style.width, 1.0..=40.0).text("Width"));
    ui.add(Slider::new(&mut style.opacity, 0.05..=1.0).text("Opacity"));

    if app.canvas().tool() == ToolKind::Shape {
        ui.horizontal(|ui| {
            ui.radio_value(&mut style.draw_mode, DrawMode::Stroke, "Outline");
            ui.radio_value(&mut style.draw_mode, DrawMode::Fill, "Fill");
        });

        if style.shape == ShapeKind::Text {
            ui.text_edit_multiline(&mut style.text);
            ui.add(Slider::new(&mut style.font_size, 8.0..=96.0).text("Font size"));
            ui.horizontal(|ui| {
                ui.radio_value(&mut style.text_alignment, TextAlignment::Left, "Left");
                ui.radio_value(&mut style.text_alignment, TextAlignment::Center, "Center");
                ui.radio_value(&mut style.text_alignment, TextAlignment::Right, "Right");
            });
        }
    }

    if &style != app.canvas().style() {
        app.canvas_mut().set_style(style);
    }
}
