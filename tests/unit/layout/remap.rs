use super::*;
use crate::foundation::core::TransformState;
use crate::performer::clip::ClipPerformer;
use crate::performer::source::MediaSource;
use crate::performer::{LoadFuture, Performer, PerformerKind};
use crate::surface::headless::HeadlessSurface;
use futures::FutureExt as _;
use std::rc::Rc;

const EPS: f64 = 1e-9;

fn assert_bounds_close(a: Bounds, b: Bounds) {
    for (l, r) in [
        (a.x, b.x),
        (a.y, b.y),
        (a.width, b.width),
        (a.height, b.height),
        (a.rotation, b.rotation),
    ] {
        assert!((l - r).abs() < EPS, "{a:?} != {b:?}");
    }
}

fn bounds(x: f64, y: f64, w: f64, h: f64) -> Bounds {
    Bounds {
        x,
        y,
        width: w,
        height: h,
        rotation: 12.0,
    }
}

fn placed(id: &str, x: f64, y: f64) -> Box<dyn Performer> {
    Box::new(
        ClipPerformer::image(id, Size::new(100.0, 50.0))
            .with_timing(0.0, 1000.0)
            .with_transform(TransformState::at(x, y)),
    )
}

/// Source whose natural size is only known after it has loaded.
struct LateSizeSource {
    size: Option<Size>,
}

impl MediaSource for LateSizeSource {
    fn load(&mut self) -> LoadFuture {
        self.size = Some(Size::new(100.0, 50.0));
        futures::future::ready(Ok(())).boxed_local()
    }

    fn intrinsic_size(&self) -> Option<Size> {
        self.size
    }
}

fn late_video(id: &str) -> Box<dyn Performer> {
    Box::new(
        ClipPerformer::new(id, PerformerKind::Video, Box::new(LateSizeSource { size: None }))
            .with_timing(0.0, 1000.0),
    )
}

fn wired(layout: &Rc<CanvasLayout>, theater: &Theater, id: &str) {
    let layout = Rc::clone(layout);
    theater
        .get(id)
        .unwrap()
        .position_updates()
        .on(Rc::new(move |u: &PositionUpdate| layout.on_position_update(u)));
}

#[test]
fn remap_round_trips_between_sizes() {
    let original = bounds(37.5, 12.25, 200.0, 80.0);
    let sizes = [
        Size::new(1920.0, 1080.0),
        Size::new(1280.0, 720.0),
        Size::new(1080.0, 1920.0),
        Size::new(333.0, 777.0),
    ];
    for a in sizes {
        for b in sizes {
            let there = remap_bounds_for_canvas_resize(original, a, b).unwrap();
            let back = remap_bounds_for_canvas_resize(there, b, a).unwrap();
            assert_bounds_close(back, original);
        }
    }
}

#[test]
fn remap_scales_axes_independently() {
    let out = remap_bounds_for_canvas_resize(
        bounds(100.0, 100.0, 50.0, 50.0),
        Size::new(1000.0, 1000.0),
        Size::new(500.0, 2000.0),
    )
    .unwrap();
    assert_bounds_close(out, bounds(50.0, 200.0, 25.0, 100.0));
}

#[test]
fn zero_dimension_sizes_do_not_project() {
    let b = bounds(1.0, 2.0, 3.0, 4.0);
    assert!(remap_bounds_for_canvas_resize(b, Size::new(0.0, 10.0), Size::new(5.0, 5.0)).is_none());
    assert!(remap_bounds_for_canvas_resize(b, Size::new(5.0, 5.0), Size::new(5.0, 0.0)).is_none());
    assert!(project_bounds_to_canvas_base(b, Size::new(0.0, 0.0), Size::new(0.0, 0.0)).is_none());
}

#[test]
fn projection_to_same_size_is_identity() {
    let b = bounds(1.0, 2.0, 3.0, 4.0);
    let size = Size::new(640.0, 360.0);
    assert_eq!(project_bounds_to_canvas_base(b, size, size), Some(b));
}

#[test]
fn resize_keeps_performers_proportional() {
    let mut surface = HeadlessSurface::new(Size::new(1000.0, 500.0));
    let mut theater = Theater::new();
    theater.hire(placed("a", 100.0, 50.0)).unwrap();
    let layout = CanvasLayout::new(surface.size());

    layout
        .resize_canvas(&mut surface, &mut theater, Size::new(500.0, 250.0), true)
        .unwrap();

    let a = theater.get("a").unwrap().base_bounds();
    assert_bounds_close(
        a,
        Bounds {
            x: 50.0,
            y: 25.0,
            width: 50.0,
            height: 25.0,
            rotation: 0.0,
        },
    );
    assert_eq!(surface.size(), Size::new(500.0, 250.0));
    assert_eq!(layout.base_size(), Some(Size::new(1000.0, 500.0)));
    assert!(!layout.is_applying_canvas_resize());
}

#[test]
fn repeated_resizes_return_to_original_placement() {
    let mut surface = HeadlessSurface::new(Size::new(1280.0, 720.0));
    let mut theater = Theater::new();
    theater.hire(placed("a", 333.0, 111.0)).unwrap();
    let layout = Rc::new(CanvasLayout::new(surface.size()));
    wired(&layout, &theater, "a");
    let before = theater.get("a").unwrap().base_bounds();

    for size in [
        Size::new(640.0, 480.0),
        Size::new(1920.0, 1080.0),
        Size::new(317.0, 911.0),
        Size::new(1280.0, 720.0),
    ] {
        layout
            .resize_canvas(&mut surface, &mut theater, size, true)
            .unwrap();
    }
    assert_bounds_close(theater.get("a").unwrap().base_bounds(), before);
    assert_bounds_close(layout.baseline("a").unwrap(), before);
}

#[test]
fn user_edit_between_resizes_refreshes_baseline() {
    let mut surface = HeadlessSurface::new(Size::new(1000.0, 1000.0));
    let mut theater = Theater::new();
    theater.hire(placed("a", 100.0, 100.0)).unwrap();
    let layout = Rc::new(CanvasLayout::new(surface.size()));
    wired(&layout, &theater, "a");

    layout
        .resize_canvas(&mut surface, &mut theater, Size::new(500.0, 500.0), true)
        .unwrap();
    theater.get_mut("a").unwrap().set_position(200.0, 0.0);
    assert_bounds_close(
        layout.baseline("a").unwrap(),
        Bounds {
            x: 400.0,
            y: 0.0,
            width: 100.0,
            height: 50.0,
            rotation: 0.0,
        },
    );

    layout
        .resize_canvas(&mut surface, &mut theater, Size::new(1000.0, 1000.0), true)
        .unwrap();
    let a = theater.get("a").unwrap().base_bounds();
    assert!((a.x - 400.0).abs() < EPS);
    assert!((a.width - 100.0).abs() < EPS);
}

#[test]
fn edits_before_first_resize_do_not_create_baselines() {
    let layout = CanvasLayout::new(Size::new(100.0, 100.0));
    layout.on_position_update(&PositionUpdate {
        id: "a".into(),
        bounds: bounds(1.0, 1.0, 1.0, 1.0),
        animated: false,
    });
    assert!(layout.baseline("a").is_none());
}

#[test]
fn animated_updates_leave_baseline_alone() {
    let mut surface = HeadlessSurface::new(Size::new(100.0, 100.0));
    let mut theater = Theater::new();
    theater.hire(placed("a", 10.0, 10.0)).unwrap();
    let layout = CanvasLayout::new(surface.size());
    layout
        .resize_canvas(&mut surface, &mut theater, Size::new(100.0, 100.0), true)
        .unwrap();
    let recorded = layout.baseline("a").unwrap();

    layout.on_position_update(&PositionUpdate {
        id: "a".into(),
        bounds: bounds(99.0, 99.0, 1.0, 1.0),
        animated: true,
    });
    assert_eq!(layout.baseline("a"), Some(recorded));
}

#[test]
fn non_adapting_resize_leaves_performers_in_place() {
    let mut surface = HeadlessSurface::new(Size::new(1000.0, 500.0));
    let mut theater = Theater::new();
    theater.hire(placed("a", 100.0, 50.0)).unwrap();
    let layout = CanvasLayout::new(surface.size());

    layout
        .resize_canvas(&mut surface, &mut theater, Size::new(200.0, 100.0), false)
        .unwrap();
    assert_eq!(theater.get("a").unwrap().base_bounds().x, 100.0);
    assert_eq!(layout.base_size(), None);
    assert_eq!(layout.canvas_size(), Size::new(200.0, 100.0));
}

#[test]
fn baselines_of_fired_performers_are_dropped() {
    let mut surface = HeadlessSurface::new(Size::new(100.0, 100.0));
    let mut theater = Theater::new();
    theater.hire(placed("a", 10.0, 10.0)).unwrap();
    theater.hire(placed("b", 20.0, 20.0)).unwrap();
    let layout = CanvasLayout::new(surface.size());
    layout
        .resize_canvas(&mut surface, &mut theater, Size::new(50.0, 50.0), true)
        .unwrap();
    theater.fire("b");
    layout.ensure_canvas_layout_baseline(surface.size(), &theater);
    assert!(layout.baseline("a").is_some());
    assert!(layout.baseline("b").is_none());
}

#[test]
fn performer_sized_after_load_survives_resizes() {
    let mut surface = HeadlessSurface::new(Size::new(1000.0, 500.0));
    let mut theater = Theater::new();
    theater.hire(late_video("video")).unwrap();
    let layout = Rc::new(CanvasLayout::new(surface.size()));
    wired(&layout, &theater, "video");

    layout
        .resize_canvas(&mut surface, &mut theater, Size::new(500.0, 250.0), true)
        .unwrap();
    assert!(layout.baseline("video").is_none());

    pollster::block_on(theater.get_mut("video").unwrap().load()).unwrap();
    let loaded = theater.get("video").unwrap().base_bounds();
    assert!((loaded.width - 100.0).abs() < EPS);
    assert!((loaded.height - 50.0).abs() < EPS);

    layout
        .resize_canvas(&mut surface, &mut theater, Size::new(1000.0, 500.0), true)
        .unwrap();
    let video = theater.get("video").unwrap();
    let t = video.base_transform();
    assert!((t.scale_x - 2.0).abs() < EPS && (t.scale_y - 2.0).abs() < EPS);
    let b = video.base_bounds();
    assert!((b.width - 200.0).abs() < EPS);
    assert!((b.height - 100.0).abs() < EPS);

    layout
        .resize_canvas(&mut surface, &mut theater, Size::new(500.0, 250.0), true)
        .unwrap();
    let t = theater.get("video").unwrap().base_transform();
    assert!((t.scale_x - 1.0).abs() < EPS && (t.scale_y - 1.0).abs() < EPS);
}

#[test]
fn edits_only_refresh_existing_baselines() {
    let mut surface = HeadlessSurface::new(Size::new(100.0, 100.0));
    let mut theater = Theater::new();
    theater.hire(placed("a", 10.0, 10.0)).unwrap();
    let layout = CanvasLayout::new(surface.size());
    layout
        .resize_canvas(&mut surface, &mut theater, Size::new(50.0, 50.0), true)
        .unwrap();
    let recorded = layout.baseline("a").unwrap();

    layout.on_position_update(&PositionUpdate {
        id: "newcomer".into(),
        bounds: bounds(1.0, 1.0, 5.0, 5.0),
        animated: false,
    });
    assert!(layout.baseline("newcomer").is_none());

    layout.on_position_update(&PositionUpdate {
        id: "a".into(),
        bounds: bounds(3.0, 3.0, 0.0, 0.0),
        animated: false,
    });
    assert_eq!(layout.baseline("a"), Some(recorded));
}
