use std::time::Duration;

use egui::{pos2, vec2, Align2, Color32, FontId, Rect, Sense};

use crate::app::MirrorCanvasApp;
use crate::render::RenderTarget;

pub fn central_panel(app: &mut MirrorCanvasApp, ctx: &egui::Context) {
    let frame = egui::Frame::none().fill(Color32::from_gray(24));
    egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let canvas_rect = response.rect;
        app.set_canvas_target(RenderTarget::new(canvas_rect.size(), ctx.pixels_per_point()));

        app.input_mut().set_canvas_rect(canvas_rect);
        for input in app.input_mut().process_input(ctx) {
            app.canvas_mut().handle_input(input);
        }

        match app.canvas_texture(ctx) {
            Ok(texture) => {
                let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
                painter.image(texture, canvas_rect, uv, Color32::WHITE);
            }
            Err(err) => log::error!("Failed to draw canvas: {}", err),
        }

        let now = ctx.input(|input| input.time);
        if let Some(message) = app.canvas().message(now) {
            let anchor = canvas_rect.center_top() + vec2(0.0, 24.0);
            let galley = painter.layout_no_wrap(
                message.to_owned(),
                FontId::proportional(16.0),
                Color32::WHITE,
            );
            let bubble = Align2::CENTER_TOP
                .anchor_size(anchor, galley.size())
                .expand2(vec2(12.0, 6.0));
            painter.rect_filled(bubble, 8.0, Color32::from_black_alpha(200));
            painter.galley(bubble.min + vec2(12.0, 6.0), galley, Color32::WHITE);
        }

        // Hold timers and message expiry only advance on frames
        if app.canvas().is_gesture_active() {
            ctx.request_repaint();
        } else if let Some(until) = app.canvas().message_expires_at().filter(|until| *until > now) {
            ctx.request_repaint_after(Duration::from_secs_f64(until - now));
        }
    });
}
