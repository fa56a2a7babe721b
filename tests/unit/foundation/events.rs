use super::*;

fn recorder() -> (Rc<RefCell<Vec<u32>>>, Listener<u32>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let listener: Listener<u32> = Rc::new(move |v: &u32| sink.borrow_mut().push(*v));
    (seen, listener)
}

#[test]
fn same_callback_registers_once() {
    let emitter = Emitter::new();
    let (seen, listener) = recorder();
    let a = emitter.on(Rc::clone(&listener));
    let b = emitter.on(Rc::clone(&listener));
    assert_eq!(a, b);
    assert_eq!(emitter.listener_count(), 1);

    emitter.emit(&7);
    assert_eq!(*seen.borrow(), vec![7]);
}

#[test]
fn once_listener_fires_a_single_time() {
    let emitter = Emitter::new();
    let (seen, listener) = recorder();
    emitter.once(listener);
    emitter.emit(&1);
    emitter.emit(&2);
    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(emitter.listener_count(), 0);
}

#[test]
fn off_unsubscribes() {
    let emitter = Emitter::new();
    let (seen, listener) = recorder();
    let id = emitter.on(listener);
    assert!(emitter.off(id));
    assert!(!emitter.off(id));
    emitter.emit(&3);
    assert!(seen.borrow().is_empty());
}

#[test]
fn listeners_may_subscribe_during_emit() {
    let emitter = Rc::new(Emitter::<u32>::new());
    let (seen, late) = recorder();
    let inner = Rc::clone(&emitter);
    emitter.on(Rc::new(move |_: &u32| {
        inner.on(Rc::clone(&late));
    }));

    emitter.emit(&1);
    assert!(seen.borrow().is_empty());
    emitter.emit(&2);
    assert_eq!(*seen.borrow(), vec![2]);
}
