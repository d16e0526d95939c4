use egui::{pos2, vec2, Pos2, Rect};
use mirror_canvas::input::{
    Edge, GestureInterpreter, GestureState, InputContext, Interpretation, PointerEvent, Preview,
};
use mirror_canvas::{ShapeSizeError, ToolKind};

fn pencil() -> InputContext {
    InputContext {
        tool: ToolKind::Pencil,
        editing: None,
    }
}

fn editing() -> InputContext {
    InputContext {
        tool: ToolKind::Shape,
        editing: Some(Rect::from_min_max(pos2(50.0, 50.0), pos2(150.0, 150.0))),
    }
}

fn press(g: &mut GestureInterpreter, pos: Pos2, time: f64, ctx: &InputContext) -> Interpretation {
    g.handle_pointer(PointerEvent::Pressed { pos, time }, ctx)
}

fn move_to(g: &mut GestureInterpreter, pos: Pos2, time: f64, ctx: &InputContext) -> Interpretation {
    g.handle_pointer(PointerEvent::Moved { pos, time }, ctx)
}

fn release(g: &mut GestureInterpreter, pos: Pos2, time: f64, ctx: &InputContext) -> Interpretation {
    g.handle_pointer(PointerEvent::Released { pos, time }, ctx)
}

#[test]
fn freehand_stroke_collects_every_point() {
    let mut g = GestureInterpreter::default();
    let ctx = pencil();
    assert_eq!(press(&mut g, pos2(0.0, 0.0), 0.0, &ctx), Interpretation::StrokeUpdated);
    move_to(&mut g, pos2(20.0, 0.0), 0.1, &ctx);
    g.tick(1.0);
    assert!(!g.is_straight_line());
    assert_eq!(
        release(&mut g, pos2(40.0, 0.0), 1.1, &ctx),
        Interpretation::CommitStroke(vec![pos2(0.0, 0.0), pos2(20.0, 0.0), pos2(40.0, 0.0)])
    );
    assert!(g.is_idle());
}

#[test]
fn holding_still_switches_to_straight_line() {
    let mut g = GestureInterpreter::default();
    let ctx = pencil();
    press(&mut g, pos2(10.0, 10.0), 0.0, &ctx);
    move_to(&mut g, pos2(12.0, 11.0), 0.2, &ctx);
    g.tick(0.6);
    assert!(g.is_straight_line());

    move_to(&mut g, pos2(60.0, 40.0), 0.7, &ctx);
    move_to(&mut g, pos2(100.0, 50.0), 0.8, &ctx);
    assert_eq!(
        g.preview(),
        Some(Preview::Stroke(&[pos2(10.0, 10.0), pos2(100.0, 50.0)]))
    );
    assert_eq!(
        release(&mut g, pos2(100.0, 50.0), 0.9, &ctx),
        Interpretation::CommitStroke(vec![pos2(10.0, 10.0), pos2(100.0, 50.0)])
    );
}

#[test]
fn overdue_hold_fires_before_late_motion() {
    let mut g = GestureInterpreter::default();
    let ctx = pencil();
    press(&mut g, pos2(0.0, 0.0), 0.0, &ctx);
    // No tick arrives; the next motion comes after the deadline
    move_to(&mut g, pos2(80.0, 0.0), 0.7, &ctx);
    assert!(g.is_straight_line());
    assert_eq!(
        release(&mut g, pos2(80.0, 0.0), 0.8, &ctx),
        Interpretation::CommitStroke(vec![pos2(0.0, 0.0), pos2(80.0, 0.0)])
    );
}

#[test]
fn tap_commits_a_single_point() {
    let mut g = GestureInterpreter::default();
    let ctx = pencil();
    press(&mut g, pos2(5.0, 5.0), 0.0, &ctx);
    assert_eq!(
        release(&mut g, pos2(5.0, 5.0), 0.05, &ctx),
        Interpretation::CommitStroke(vec![pos2(5.0, 5.0)])
    );
}

#[test]
fn new_shape_is_validated_on_release() {
    let mut g = GestureInterpreter::default();
    let ctx = InputContext {
        tool: ToolKind::Shape,
        editing: None,
    };
    press(&mut g, pos2(50.0, 50.0), 0.0, &ctx);
    assert_eq!(move_to(&mut g, pos2(150.0, 150.0), 0.1, &ctx), Interpretation::ShapeUpdated);
    assert_eq!(
        release(&mut g, pos2(150.0, 150.0), 0.2, &ctx),
        Interpretation::CommitShape(Rect::from_min_max(pos2(50.0, 50.0), pos2(150.0, 150.0)))
    );

    press(&mut g, pos2(50.0, 50.0), 1.0, &ctx);
    assert_eq!(
        release(&mut g, pos2(60.0, 200.0), 1.1, &ctx),
        Interpretation::Transform(GestureState::InvalidSize(ShapeSizeError::TooSmall))
    );
}

#[test]
fn dragging_inside_the_shape_moves_it() {
    let mut g = GestureInterpreter::default();
    let ctx = editing();
    assert_eq!(
        press(&mut g, pos2(100.0, 100.0), 0.0, &ctx),
        Interpretation::Transform(GestureState::None)
    );
    assert_eq!(
        move_to(&mut g, pos2(110.0, 95.0), 0.1, &ctx),
        Interpretation::Transform(GestureState::Dragging(vec2(10.0, -5.0)))
    );
    assert_eq!(
        move_to(&mut g, pos2(130.0, 95.0), 0.2, &ctx),
        Interpretation::Transform(GestureState::Dragging(vec2(20.0, 0.0)))
    );
    assert_eq!(
        release(&mut g, pos2(130.0, 95.0), 0.3, &ctx),
        Interpretation::Transform(GestureState::None)
    );
}

#[test]
fn long_press_on_handle_arms_resize() {
    let mut g = GestureInterpreter::default();
    let ctx = editing();
    press(&mut g, pos2(148.0, 102.0), 0.0, &ctx);
    assert_eq!(g.tick(0.3), Interpretation::Nothing);
    assert_eq!(
        g.tick(0.6),
        Interpretation::Transform(GestureState::PrepareResizing(Edge::Right))
    );
    assert_eq!(g.active_resize_edge(), Some(Edge::Right));
    assert_eq!(
        move_to(&mut g, pos2(168.0, 102.0), 0.7, &ctx),
        Interpretation::Transform(GestureState::Resizing(Edge::Right, vec2(20.0, 0.0)))
    );
}

#[test]
fn rejected_resize_step_is_measured_again_from_before_it() {
    let mut g = GestureInterpreter::default();
    let ctx = editing();
    press(&mut g, pos2(148.0, 102.0), 0.0, &ctx);
    g.tick(0.6);
    assert_eq!(
        move_to(&mut g, pos2(40.0, 102.0), 0.7, &ctx),
        Interpretation::Transform(GestureState::Resizing(Edge::Right, vec2(-108.0, 0.0)))
    );
    g.reject_step();
    assert_eq!(
        move_to(&mut g, pos2(158.0, 102.0), 0.8, &ctx),
        Interpretation::Transform(GestureState::Resizing(Edge::Right, vec2(10.0, 0.0)))
    );
}

#[test]
fn moving_before_the_hold_falls_back_to_drag() {
    let mut g = GestureInterpreter::default();
    let ctx = editing();
    press(&mut g, pos2(100.0, 50.0), 0.0, &ctx);
    // Small motion while arming is held back
    assert_eq!(move_to(&mut g, pos2(102.0, 50.0), 0.1, &ctx), Interpretation::Nothing);
    assert_eq!(
        move_to(&mut g, pos2(120.0, 50.0), 0.2, &ctx),
        Interpretation::Transform(GestureState::Dragging(vec2(20.0, 0.0)))
    );
    assert_eq!(g.tick(1.0), Interpretation::Nothing);
    assert_eq!(g.active_resize_edge(), None);
}

#[test]
fn confirm_button_is_checked_first() {
    let mut g = GestureInterpreter::default();
    let ctx = editing();
    let corner = pos2(150.0, 50.0);
    assert_eq!(
        press(&mut g, corner, 0.0, &ctx),
        Interpretation::Transform(GestureState::Tapping(corner))
    );
    assert_eq!(release(&mut g, corner, 0.1, &ctx), Interpretation::Confirm);
}

#[test]
fn pinch_reports_incremental_factors() {
    let mut g = GestureInterpreter::default();
    let ctx = editing();
    assert_eq!(
        g.pinch_changed(1.5, &ctx),
        Interpretation::Transform(GestureState::Scaling(1.5))
    );
    assert_eq!(
        g.pinch_changed(3.0, &ctx),
        Interpretation::Transform(GestureState::Scaling(2.0))
    );
    g.pinch_ended();
    assert_eq!(
        g.pinch_changed(2.0, &ctx),
        Interpretation::Transform(GestureState::Scaling(2.0))
    );

    assert_eq!(g.pinch_changed(4.0, &pencil()), Interpretation::Nothing);
}

#[test]
fn rejected_pinch_step_keeps_the_previous_magnification() {
    let mut g = GestureInterpreter::default();
    let ctx = editing();
    g.pinch_changed(2.0, &ctx);
    assert_eq!(
        g.pinch_changed(80.0, &ctx),
        Interpretation::Transform(GestureState::Scaling(40.0))
    );
    g.reject_step();
    assert_eq!(
        g.pinch_changed(4.0, &ctx),
        Interpretation::Transform(GestureState::Scaling(2.0))
    );
}
