use super::*;
use crate::animation::preset::SLIDE_DISTANCE_PX;
use crate::animation::spec::AnimationSegmentSpec;
use std::cell::Cell;

const EPS: f64 = 1e-9;

fn spec(
    enter: Option<(&str, f64)>,
    exit: Option<(&str, f64)>,
    loop_: Option<(&str, f64)>,
) -> Option<PerformerAnimationSpec> {
    let seg = |s: Option<(&str, f64)>| s.map(|(p, d)| AnimationSegmentSpec::new(p, d));
    Some(PerformerAnimationSpec {
        enter: seg(enter),
        exit: seg(exit),
        loop_: seg(loop_),
    })
}

fn base() -> TransformState {
    TransformState::new(100.0, 50.0, 1.1, 0.9, 35.0, 0.8)
}

fn applied(
    controller: &AnimationController,
    t: f64,
    duration: f64,
    layout: Option<AnimationLayout>,
) -> TransformState {
    let mut out = None;
    controller.apply(t, duration, layout, |state| out = Some(state));
    out.unwrap()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < EPS, "{a} != {b}");
}

#[test]
fn no_spec_hands_back_base_unchanged() {
    let controller = AnimationController::new(base(), None);
    for (t, d) in [(0.0, 1000.0), (500.0, 1000.0), (-20.0, 0.0), (9e9, -1.0)] {
        assert_eq!(applied(&controller, t, d, None), base());
    }
}

#[test]
fn non_positive_duration_hands_back_base() {
    let controller = AnimationController::new(base(), spec(Some(("fade", 300.0)), None, None));
    assert_eq!(applied(&controller, 0.0, 0.0, None), base());
}

#[test]
fn callback_runs_once_inside_applying_scope() {
    let controller = AnimationController::new(base(), spec(Some(("fade", 300.0)), None, None));
    let calls = Cell::new(0);
    assert!(!controller.is_applying());
    controller.apply(10.0, 1000.0, None, |_| {
        calls.set(calls.get() + 1);
        assert!(controller.is_applying());
    });
    assert_eq!(calls.get(), 1);
    assert!(!controller.is_applying());
}

#[test]
fn slide_up_enter_starts_offset_and_ends_neutral() {
    let start = TransformState::at(10.0, 20.0);
    let controller = AnimationController::new(start, spec(Some(("slide-up", 400.0)), None, None));

    let first = applied(&controller, 0.0, 2000.0, None);
    assert_close(first.y, 20.0 + SLIDE_DISTANCE_PX);
    assert_close(first.alpha(), 0.0);

    let settled = applied(&controller, 400.0, 2000.0, None);
    assert_close(settled.x, 10.0);
    assert_close(settled.y, 20.0);
    assert_close(settled.alpha(), 1.0);
}

#[test]
fn exit_wins_when_windows_overlap() {
    let start = TransformState::at(0.0, 0.0);
    let controller = AnimationController::new(
        start,
        spec(Some(("slide-up", 400.0)), Some(("slide-left", 400.0)), None),
    );

    // The exit window covers the whole 300ms clip, so t=0 is exit's neutral start.
    assert_eq!(applied(&controller, 0.0, 300.0, None), start);

    let last = applied(&controller, 300.0, 300.0, None);
    assert_close(last.x, -SLIDE_DISTANCE_PX);
    assert_close(last.y, 0.0);
    assert_close(last.alpha(), 0.0);
}

#[test]
fn enter_wins_over_loop() {
    let controller = AnimationController::new(
        TransformState::default(),
        spec(Some(("fade", 500.0)), None, Some(("spin", 1000.0))),
    );
    let during_enter = applied(&controller, 250.0, 5000.0, None);
    assert_eq!(during_enter.rotation, 0.0);
    assert!(during_enter.alpha() < 1.0);

    let after_enter = applied(&controller, 750.0, 5000.0, None);
    assert_close(after_enter.rotation, 270.0);
}

#[test]
fn loop_is_periodic() {
    let start = TransformState::at(5.0, 5.0);
    let controller = AnimationController::new(start, spec(None, None, Some(("spin", 2000.0))));
    let a = applied(&controller, 500.0, 6000.0, None);
    let b = applied(&controller, 2500.0, 6000.0, None);
    assert_eq!(a, b);
    assert_close(a.rotation, 90.0);
}

#[test]
fn compressed_enter_still_reaches_neutral() {
    // A 400ms enter inside a 200ms clip plays at double speed.
    let controller = AnimationController::new(
        TransformState::default(),
        spec(Some(("fade", 400.0)), None, None),
    );
    assert_close(applied(&controller, 0.0, 200.0, None).alpha(), 0.0);
    assert_close(applied(&controller, 200.0, 200.0, None).alpha(), 1.0);
}

#[test]
fn unknown_preset_is_identity() {
    let controller = AnimationController::new(base(), spec(Some(("wobble", 400.0)), None, None));
    assert_eq!(applied(&controller, 100.0, 1000.0, None), base());
}

#[test]
fn center_pivot_keeps_center_for_rotation_and_scale() {
    let layout = AnimationLayout::new(200.0, 100.0);
    let cases = [
        spec(None, None, Some(("spin", 2000.0))),
        spec(Some(("zoom-out", 400.0)), None, None),
    ];
    for case in cases {
        let controller = AnimationController::new(base(), case);
        let expected = base().visual_center(layout);
        for t in [0.0, 120.0, 333.0, 700.0] {
            let out = applied(&controller, t, 5000.0, Some(layout));
            let center = out.visual_center(layout);
            assert_close(center.x, expected.x);
            assert_close(center.y, expected.y);
        }
    }
}

#[test]
fn center_pivot_translation_moves_center_by_offset() {
    let layout = AnimationLayout::new(200.0, 100.0);
    let controller = AnimationController::new(base(), spec(None, Some(("slide-left", 400.0)), None));
    let out = applied(&controller, 1000.0, 1000.0, Some(layout));
    let before = base().visual_center(layout);
    let after = out.visual_center(layout);
    assert_close(after.x - before.x, -SLIDE_DISTANCE_PX);
    assert_close(after.y - before.y, 0.0);
    assert_close(out.rotation, 35.0);
}

#[test]
fn invalid_layout_falls_back_to_naive_composition() {
    let controller = AnimationController::new(base(), spec(None, None, Some(("spin", 2000.0))));
    let degenerate = AnimationLayout::new(0.0, 100.0);
    let out = applied(&controller, 500.0, 5000.0, Some(degenerate));
    assert_eq!(out.x, base().x);
    assert_eq!(out.y, base().y);
    assert_close(out.rotation, 125.0);
}

#[test]
fn set_spec_recompiles_segments() {
    let mut controller = AnimationController::new(base(), None);
    controller.set_spec(spec(Some(("fade", 100.0)), None, None));
    assert_close(applied(&controller, 0.0, 1000.0, None).alpha(), 0.0);

    controller.set_spec(None);
    assert_eq!(applied(&controller, 0.0, 1000.0, None), base());
}
