use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared listener callback.
pub type Listener<E> = Rc<dyn Fn(&E)>;

/// Handle returned by [`Emitter::on`] / [`Emitter::once`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry<E> {
    id: ListenerId,
    callback: Listener<E>,
    once: bool,
}

/// Typed single-threaded publish/subscribe channel.
///
/// Listeners are deduplicated by callback identity: registering the same `Rc` twice keeps a
/// single subscription. Emission works on a snapshot, so listeners may subscribe or
/// unsubscribe while an event is being delivered.
pub struct Emitter<E> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<Entry<E>>>,
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<E> std::fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<E> Emitter<E> {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `callback` for every future event.
    pub fn on(&self, callback: Listener<E>) -> ListenerId {
        self.register(callback, false)
    }

    /// Subscribe `callback` for the next event only.
    pub fn once(&self, callback: Listener<E>) -> ListenerId {
        self.register(callback, true)
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Deliver `event` to every listener in subscription order.
    pub fn emit(&self, event: &E) {
        let snapshot = {
            let mut entries = self.entries.borrow_mut();
            let callbacks: Vec<Listener<E>> =
                entries.iter().map(|e| Rc::clone(&e.callback)).collect();
            entries.retain(|e| !e.once);
            callbacks
        };
        for callback in snapshot {
            callback(event);
        }
    }

    fn register(&self, callback: Listener<E>, once: bool) -> ListenerId {
        let mut entries = self.entries.borrow_mut();
        if let Some(existing) = entries
            .iter()
            .find(|e| std::ptr::addr_eq(Rc::as_ptr(&e.callback), Rc::as_ptr(&callback)))
        {
            return existing.id;
        }
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        entries.push(Entry { id, callback, once });
        id
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/events.rs"]
mod tests;
