use super::*;
use crate::foundation::core::Size;
use crate::performer::clip::ClipPerformer;
use std::cell::RefCell;
use std::rc::Rc;

fn clip(id: &str, start: f64, duration: f64) -> Box<dyn Performer> {
    Box::new(ClipPerformer::image(id, Size::new(10.0, 10.0)).with_timing(start, duration))
}

#[test]
fn hire_preserves_order_and_emits() {
    let mut theater = Theater::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    theater
        .events()
        .on(Rc::new(move |e: &TheaterEvent| sink.borrow_mut().push(e.clone())));

    theater.hire(clip("b", 0.0, 10.0)).unwrap();
    theater.hire(clip("a", 0.0, 10.0)).unwrap();

    assert_eq!(theater.ids().collect::<Vec<_>>(), vec!["b", "a"]);
    assert_eq!(
        *log.borrow(),
        vec![
            TheaterEvent::Hired { id: "b".into() },
            TheaterEvent::Hired { id: "a".into() }
        ]
    );
}

#[test]
fn duplicate_and_blank_ids_are_rejected() {
    let mut theater = Theater::new();
    theater.hire(clip("a", 0.0, 10.0)).unwrap();
    let dup = theater.hire(clip("a", 5.0, 10.0)).unwrap_err();
    assert!(dup.to_string().starts_with("validation error:"));
    assert!(theater.hire(clip("  ", 0.0, 10.0)).is_err());
    assert_eq!(theater.len(), 1);
}

#[test]
fn fire_removes_by_id() {
    let mut theater = Theater::new();
    theater.hire(clip("a", 0.0, 10.0)).unwrap();
    theater.hire(clip("b", 0.0, 10.0)).unwrap();
    let fired = theater.fire("a").unwrap();
    assert_eq!(fired.id(), "a");
    assert!(theater.fire("a").is_none());
    assert_eq!(theater.ids().collect::<Vec<_>>(), vec!["b"]);
}

#[test]
fn filter_by_time_is_half_open() {
    let mut theater = Theater::new();
    theater.hire(clip("video", 0.0, 1000.0)).unwrap();
    theater.hire(clip("text", 500.0, 500.0)).unwrap();

    let ids = |t: f64| {
        theater
            .filter_performer_by_time(t)
            .iter()
            .map(|p| p.id().to_owned())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(0.0), vec!["video"]);
    assert_eq!(ids(600.0), vec!["video", "text"]);
    assert!(ids(1000.0).is_empty());
}

#[test]
fn max_end_tracks_roster() {
    let mut theater = Theater::new();
    assert_eq!(theater.max_end(), 0.0);
    theater.hire(clip("a", 100.0, 400.0)).unwrap();
    theater.hire(clip("b", 0.0, 300.0)).unwrap();
    assert_eq!(theater.max_end(), 500.0);
}
