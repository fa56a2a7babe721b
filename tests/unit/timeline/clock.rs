use super::*;
use std::cell::RefCell;
use std::rc::Rc;

fn recorded(clock: &TimeController) -> Rc<RefCell<Vec<TimelineEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    clock
        .events()
        .on(Rc::new(move |e: &TimelineEvent| sink.borrow_mut().push(*e)));
    log
}

#[test]
fn set_time_emits_only_on_change() {
    let mut clock = TimeController::new();
    clock.set_duration(1000.0);
    let log = recorded(&clock);

    assert!(clock.set_time(250.0));
    assert!(!clock.set_time(250.0));
    assert_eq!(*log.borrow(), vec![TimelineEvent::TimeChanged(250.0)]);
}

#[test]
fn time_is_clamped_to_duration() {
    let mut clock = TimeController::new();
    clock.set_duration(1000.0);
    clock.set_time(5000.0);
    assert_eq!(clock.current_time(), 1000.0);
    assert!(clock.is_at_end());
    clock.set_time(-3.0);
    assert_eq!(clock.current_time(), 0.0);
    clock.set_time(f64::NAN);
    assert_eq!(clock.current_time(), 0.0);
}

#[test]
fn grow_duration_never_shrinks() {
    let mut clock = TimeController::new();
    assert!(clock.grow_duration(800.0));
    assert!(!clock.grow_duration(300.0));
    assert!(!clock.grow_duration(f64::INFINITY));
    assert_eq!(clock.duration(), 800.0);
}

#[test]
fn shrinking_duration_pulls_time_back() {
    let mut clock = TimeController::new();
    clock.set_duration(1000.0);
    clock.set_time(900.0);
    let log = recorded(&clock);

    clock.set_duration(400.0);
    assert_eq!(clock.current_time(), 400.0);
    assert_eq!(
        *log.borrow(),
        vec![
            TimelineEvent::DurationChanged(400.0),
            TimelineEvent::TimeChanged(400.0)
        ]
    );
}

#[test]
fn playing_flag_emits_transitions() {
    let mut clock = TimeController::new();
    let log = recorded(&clock);
    assert!(clock.set_playing(true));
    assert!(!clock.set_playing(true));
    assert!(clock.set_playing(false));
    assert_eq!(
        *log.borrow(),
        vec![TimelineEvent::Playing, TimelineEvent::Paused]
    );
}

#[test]
fn empty_project_is_never_at_end() {
    let clock = TimeController::new();
    assert!(!clock.is_at_end());
}
