use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Handle for a scheduled display frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub u64);

/// Host hook that calls the director back on the next display frame.
///
/// The host is expected to invoke [`crate::Director::on_frame`] once per granted request.
pub trait FrameScheduler {
    /// Ask for one frame callback.
    fn request_frame(&mut self) -> FrameRequestId;

    /// Withdraw a request. Cancelling an unknown or already-fired id is a no-op.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Scheduler for headless hosts: records the outstanding request and lets the host poll it.
///
/// Clones share state, so a host can keep one handle while the director owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualFrameScheduler {
    next_id: Rc<Cell<u64>>,
    pending: Rc<Cell<Option<FrameRequestId>>>,
    requests: Rc<Cell<u64>>,
}

impl ManualFrameScheduler {
    /// Scheduler with nothing requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Outstanding request, if any.
    pub fn pending(&self) -> Option<FrameRequestId> {
        self.pending.get()
    }

    /// Consume the outstanding request; the host then calls `on_frame`.
    pub fn take_pending(&self) -> Option<FrameRequestId> {
        self.pending.take()
    }

    /// Total number of requests ever made.
    pub fn request_count(&self) -> u64 {
        self.requests.get()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&mut self) -> FrameRequestId {
        let id = FrameRequestId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.requests.set(self.requests.get() + 1);
        self.pending.set(Some(id));
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        if self.pending.get() == Some(id) {
            self.pending.set(None);
        }
    }
}

/// Wall-clock source used to measure elapsed time between ticks.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> f64;
}

/// [`Clock`] backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven [`Clock`]; clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Clock starting at 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to `ms`.
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    /// Move forward by `ms`.
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
