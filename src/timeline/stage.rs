use std::collections::HashSet;
use std::task::{Context, Poll};

use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt as _, StreamExt as _};

use crate::{
    foundation::error::StagecraftResult,
    foundation::events::Emitter,
    performer::Performer,
    surface::RenderSurface,
};

/// Stage changes, published as they happen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageEvent {
    /// A performer was added to the render tree.
    Attached {
        /// Performer id.
        id: String,
    },
    /// A performer was removed from the render tree.
    Detached {
        /// Performer id.
        id: String,
    },
    /// A pending performer finished loading and can now be attached.
    DelayedAdd {
        /// Performer id.
        id: String,
    },
    /// A pending performer failed to load and will never be attached.
    LoadFailed {
        /// Performer id.
        id: String,
        /// Rendered error.
        message: String,
    },
}

/// Result of [`Stage::add`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageAdd {
    /// The performer is in the render tree.
    Attached,
    /// The performer is loading; a [`StageEvent::DelayedAdd`] follows on success.
    Pending,
    /// The performer failed to load earlier and is not attached.
    Failed,
}

type PendingLoad = LocalBoxFuture<'static, (String, StagecraftResult<()>)>;

/// Subset of the roster attached to the render surface.
///
/// Performers that are not ready yet are loaded in the background. Completed loads are
/// delivered by [`Stage::poll_loaded`] or [`Stage::settle_loads`]; the stage never attaches
/// them itself, since the clock may have moved on while they were loading.
pub struct Stage {
    surface: Box<dyn RenderSurface>,
    visible: Vec<String>,
    pending: HashSet<String>,
    failed: HashSet<String>,
    loads: FuturesUnordered<PendingLoad>,
    events: Emitter<StageEvent>,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("visible", &self.visible)
            .field("pending", &self.pending)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

impl Stage {
    /// Stage drawing into `surface`.
    pub fn new(surface: Box<dyn RenderSurface>) -> Self {
        Self {
            surface,
            visible: Vec::new(),
            pending: HashSet::new(),
            failed: HashSet::new(),
            loads: FuturesUnordered::new(),
            events: Emitter::new(),
        }
    }

    /// The render surface.
    pub fn surface(&self) -> &dyn RenderSurface {
        self.surface.as_ref()
    }

    /// Mutable render surface.
    pub fn surface_mut(&mut self) -> &mut dyn RenderSurface {
        self.surface.as_mut()
    }

    /// Resolves once the surface is usable.
    pub fn ready(&self) -> LocalBoxFuture<'static, StagecraftResult<()>> {
        self.surface.ready()
    }

    /// Attach `performer`, or start loading it if its render handle does not exist yet.
    ///
    /// A second `add` while a load is in flight does not start another load. Ids whose
    /// load failed stay refused until [`Stage::forget`] clears them.
    pub fn add(&mut self, performer: &mut dyn Performer) -> StageAdd {
        let id = performer.id();
        if self.contains(id) {
            return StageAdd::Attached;
        }
        if self.failed.contains(id) {
            return StageAdd::Failed;
        }
        if performer.is_ready() {
            self.attach(id.to_owned(), performer.z_index());
            return StageAdd::Attached;
        }
        if self.pending.insert(id.to_owned()) {
            let id = id.to_owned();
            tracing::debug!(%id, "performer not ready, loading");
            let load = performer.load();
            self.loads
                .push(async move { (id, load.await) }.boxed_local());
        }
        StageAdd::Pending
    }

    /// Detach `id` and drop any pending load registration for it.
    pub fn remove(&mut self, id: &str) -> bool {
        self.pending.remove(id);
        let Some(idx) = self.visible.iter().position(|v| v == id) else {
            return false;
        };
        self.visible.remove(idx);
        self.surface.detach(id);
        tracing::debug!(%id, "detached");
        self.events.emit(&StageEvent::Detached { id: id.to_owned() });
        true
    }

    /// Forget everything known about `id`, including an earlier load failure.
    pub fn forget(&mut self, id: &str) {
        self.remove(id);
        self.failed.remove(id);
    }

    /// Deliver loads that already completed, without blocking.
    ///
    /// Returns the ids that are now ready to attach, in completion order.
    pub fn poll_loaded(&mut self) -> Vec<String> {
        let mut ready = Vec::new();
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        while let Poll::Ready(Some((id, result))) = self.loads.poll_next_unpin(&mut cx) {
            if let Some(id) = self.finish_load(id, result) {
                ready.push(id);
            }
        }
        ready
    }

    /// Wait for every registered load to complete.
    ///
    /// Returns the ids that are now ready to attach, in completion order.
    pub async fn settle_loads(&mut self) -> Vec<String> {
        let mut ready = Vec::new();
        while !self.pending.is_empty() {
            let Some((id, result)) = self.loads.next().await else {
                break;
            };
            if let Some(id) = self.finish_load(id, result) {
                ready.push(id);
            }
        }
        ready
    }

    /// Whether `id` is attached.
    pub fn contains(&self, id: &str) -> bool {
        self.visible.iter().any(|v| v == id)
    }

    /// Whether a load for `id` is in flight.
    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains(id)
    }

    /// Whether `id` failed to load.
    pub fn has_failed(&self, id: &str) -> bool {
        self.failed.contains(id)
    }

    /// Attached ids in attach order.
    pub fn visible(&self) -> &[String] {
        &self.visible
    }

    /// Event channel.
    pub fn events(&self) -> &Emitter<StageEvent> {
        &self.events
    }

    fn attach(&mut self, id: String, z_index: i32) {
        self.surface.attach(&id, z_index);
        tracing::debug!(%id, z_index, "attached");
        self.events.emit(&StageEvent::Attached { id: id.clone() });
        self.visible.push(id);
    }

    fn finish_load(&mut self, id: String, result: StagecraftResult<()>) -> Option<String> {
        // Removed while loading, or already delivered.
        if !self.pending.remove(&id) {
            return None;
        }
        match result {
            Ok(()) => {
                self.events.emit(&StageEvent::DelayedAdd { id: id.clone() });
                Some(id)
            }
            Err(err) => {
                tracing::warn!(%id, error = %err, "performer failed to load");
                self.failed.insert(id.clone());
                self.events.emit(&StageEvent::LoadFailed {
                    id,
                    message: err.to_string(),
                });
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/stage.rs"]
mod tests;
