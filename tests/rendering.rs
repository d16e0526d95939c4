use egui::{pos2, vec2, Color32};
use image::RgbaImage;
use mirror_canvas::element::DrawMode;
use mirror_canvas::render::{pixmap_to_image, RenderTarget};
use mirror_canvas::{CanvasConfig, CanvasController, LineStyle, Renderer, ShapeKind, ToolKind};

fn target() -> RenderTarget {
    RenderTarget::new(vec2(300.0, 300.0), 1.0)
}

fn controller() -> CanvasController {
    CanvasController::new(CanvasConfig::default(), Renderer::new(16))
}

fn rgba(image: &RgbaImage, x: u32, y: u32) -> [u8; 4] {
    image.get_pixel(x, y).0
}

fn rectangle(canvas: &mut CanvasController) {
    canvas.begin_shape(ShapeKind::Rectangle);
    canvas.pointer_pressed(pos2(50.0, 50.0), 0.0);
    canvas.pointer_moved(pos2(150.0, 150.0), 0.05);
    canvas.pointer_released(pos2(150.0, 150.0), 0.1);
}

#[test]
fn affordances_only_appear_on_the_interactive_surface() {
    let mut canvas = controller();
    rectangle(&mut canvas);

    // Inside the confirm button, clear of its tick and the box outline
    let (x, y) = (156, 40);
    let interactive = pixmap_to_image(&canvas.render(target()).unwrap()).unwrap();
    assert_eq!(rgba(&interactive, x, y), [52, 199, 89, 255]);

    let flat = canvas.flatten(target()).unwrap();
    assert_eq!(rgba(&flat, x, y)[3], 0);
    // The shape itself is in both
    assert_eq!(rgba(&flat, 100, 50)[3], 255);
}

#[test]
fn confirmed_shape_has_no_affordances() {
    let mut canvas = controller();
    rectangle(&mut canvas);
    canvas.confirm_shape();
    let interactive = pixmap_to_image(&canvas.render(target()).unwrap()).unwrap();
    assert_eq!(rgba(&interactive, 156, 40)[3], 0);
}

#[test]
fn eraser_strokes_clear_earlier_lines() {
    let mut canvas = controller();
    canvas.set_style(LineStyle {
        width: 20.0,
        ..Default::default()
    });
    canvas.pointer_pressed(pos2(20.0, 100.0), 0.0);
    canvas.pointer_moved(pos2(150.0, 100.0), 0.05);
    canvas.pointer_released(pos2(280.0, 100.0), 0.1);

    canvas.set_tool(ToolKind::Eraser);
    canvas.pointer_pressed(pos2(150.0, 60.0), 1.0);
    canvas.pointer_moved(pos2(150.0, 100.0), 1.05);
    canvas.pointer_released(pos2(150.0, 140.0), 1.1);

    let flat = canvas.flatten(target()).unwrap();
    assert_eq!(rgba(&flat, 150, 100)[3], 0);
    assert_eq!(rgba(&flat, 60, 100), [255, 59, 48, 255]);
}

#[test]
fn opacity_is_applied_to_strokes() {
    let mut canvas = controller();
    canvas.set_style(LineStyle {
        color: Color32::from_rgb(0, 0, 255),
        width: 20.0,
        opacity: 0.5,
        ..Default::default()
    });
    canvas.pointer_pressed(pos2(20.0, 100.0), 0.0);
    canvas.pointer_released(pos2(280.0, 100.0), 0.1);

    let alpha = rgba(&canvas.flatten(target()).unwrap(), 150, 100)[3];
    assert!((126..=130).contains(&alpha), "alpha was {alpha}");
}

#[test]
fn pin_freezes_the_drawing_and_ends_the_session() {
    let mut canvas = controller();
    canvas.set_style(LineStyle {
        width: 20.0,
        ..Default::default()
    });
    canvas.pointer_pressed(pos2(20.0, 100.0), 0.0);
    canvas.pointer_released(pos2(280.0, 100.0), 0.1);

    canvas.pin(target()).unwrap();
    assert!(canvas.lines().is_empty());
    assert!(!canvas.can_undo());
    assert!(canvas.backing().is_some());

    // Erasing after the pin does not touch the pinned image
    canvas.set_tool(ToolKind::Eraser);
    canvas.pointer_pressed(pos2(150.0, 60.0), 1.0);
    canvas.pointer_released(pos2(150.0, 140.0), 1.1);

    let flat = canvas.flatten(target()).unwrap();
    assert_eq!(rgba(&flat, 150, 100), [255, 59, 48, 255]);
}

#[test]
fn filled_text_shape_renders_glyphs() {
    let mut canvas = controller();
    canvas.begin_shape(ShapeKind::Text);
    canvas.set_style(LineStyle {
        shape: ShapeKind::Text,
        text: "Hello mirror".to_owned(),
        font_size: 32.0,
        draw_mode: DrawMode::Fill,
        ..Default::default()
    });
    canvas.pointer_pressed(pos2(20.0, 20.0), 0.0);
    canvas.pointer_released(pos2(280.0, 200.0), 0.1);
    canvas.confirm_shape();

    let flat = canvas.flatten(target()).unwrap();
    let inked = flat.pixels().filter(|p| p.0[3] > 0).count();
    assert!(inked > 100, "only {inked} pixels drawn");
    // Nothing outside the text box
    assert_eq!(rgba(&flat, 5, 290)[3], 0);
}
