use std::cell::Cell;

/// Boolean re-entrancy flag with scoped acquisition.
///
/// Setter side effects (position updates) can synchronously re-enter code that is in the
/// middle of writing those values. Listeners check [`ReentrancyGuard::is_active`] and bail out
/// instead of recursing.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    active: Cell<bool>,
}

impl ReentrancyGuard {
    /// Create an inactive guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a [`GuardScope`] is currently held.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Activate the guard until the returned scope is dropped.
    ///
    /// Nested scopes restore the outer state on release, and release also runs on unwind.
    pub fn enter(&self) -> GuardScope<'_> {
        let previous = self.active.replace(true);
        GuardScope {
            flag: &self.active,
            previous,
        }
    }
}

/// Live acquisition of a [`ReentrancyGuard`].
#[derive(Debug)]
#[must_use = "the guard is released as soon as the scope is dropped"]
pub struct GuardScope<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl Drop for GuardScope<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}
