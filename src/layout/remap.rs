use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::{
    foundation::core::{Bounds, LAYOUT_EPSILON, Size},
    foundation::error::StagecraftResult,
    foundation::guard::ReentrancyGuard,
    performer::PositionUpdate,
    surface::RenderSurface,
    timeline::theater::Theater,
};

/// Keeps performer placement proportional across canvas resizes.
///
/// Each performer's bounds are recorded against a fixed reference size (the baseline),
/// established lazily on the first adapting resize. Resizing remaps the baseline into the
/// new size, so repeated resizes never accumulate rounding drift. User edits made between
/// resizes refresh the baseline through [`CanvasLayout::on_position_update`].
///
/// State lives behind `Cell`/`RefCell` so position-update listeners can share the layout
/// through an `Rc`.
#[derive(Debug)]
pub struct CanvasLayout {
    base_size: Cell<Option<Size>>,
    base_bounds: RefCell<HashMap<String, Bounds>>,
    canvas_size: Cell<Size>,
    resizing: ReentrancyGuard,
}

impl CanvasLayout {
    /// Layout for a canvas currently sized `canvas`; no baseline yet.
    pub fn new(canvas: Size) -> Self {
        Self {
            base_size: Cell::new(None),
            base_bounds: RefCell::new(HashMap::new()),
            canvas_size: Cell::new(canvas),
            resizing: ReentrancyGuard::new(),
        }
    }

    /// Reference size baselines are expressed against, once established.
    pub fn base_size(&self) -> Option<Size> {
        self.base_size.get()
    }

    /// Baseline bounds recorded for `id`.
    pub fn baseline(&self, id: &str) -> Option<Bounds> {
        self.base_bounds.borrow().get(id).copied()
    }

    /// Canvas size the layout last saw.
    pub fn canvas_size(&self) -> Size {
        self.canvas_size.get()
    }

    /// True while [`CanvasLayout::resize_canvas`] is writing performer transforms.
    pub fn is_applying_canvas_resize(&self) -> bool {
        self.resizing.is_active()
    }

    /// Establish the reference size (first call only) and record missing baselines.
    ///
    /// Performers are projected from `previous` into the reference size. Performers with
    /// no measurable size yet get no baseline. Baselines of performers that left the
    /// roster are dropped.
    pub fn ensure_canvas_layout_baseline(&self, previous: Size, theater: &Theater) {
        let base = match self.base_size.get() {
            Some(base) => base,
            None => {
                self.base_size.set(Some(previous));
                previous
            }
        };
        let mut baselines = self.base_bounds.borrow_mut();
        baselines.retain(|id, _| theater.get(id).is_some());
        for performer in theater.iter() {
            if baselines.contains_key(performer.id()) {
                continue;
            }
            let current = performer.base_bounds();
            if current.is_empty() {
                continue;
            }
            if let Some(bounds) = project_bounds_to_canvas_base(current, previous, base) {
                baselines.insert(performer.id().to_owned(), bounds);
            }
        }
    }

    /// Resize `surface` to `next`, remapping every performer when `adapt` is set.
    #[tracing::instrument(skip(self, surface, theater))]
    pub fn resize_canvas(
        &self,
        surface: &mut dyn RenderSurface,
        theater: &mut Theater,
        next: Size,
        adapt: bool,
    ) -> StagecraftResult<()> {
        let previous = surface.size();
        if adapt {
            self.ensure_canvas_layout_baseline(previous, theater);
        }
        surface.resize(next)?;
        self.canvas_size.set(next);
        if !adapt {
            return Ok(());
        }
        let Some(base) = self.base_size.get() else {
            return Ok(());
        };

        let _resizing = self.resizing.enter();
        for performer in theater.iter_mut() {
            let current = performer.base_bounds();
            if current.is_empty() {
                continue;
            }
            let baseline = self
                .baseline(performer.id())
                .filter(|b| !b.is_empty())
                .or_else(|| project_bounds_to_canvas_base(current, previous, base));
            let Some(target) =
                baseline.and_then(|b| remap_bounds_for_canvas_resize(b, base, next))
            else {
                continue;
            };

            let ratio_x = target.width / current.width;
            let ratio_y = target.height / current.height;
            if (ratio_x - 1.0).abs() > LAYOUT_EPSILON || (ratio_y - 1.0).abs() > LAYOUT_EPSILON {
                let t = performer.base_transform();
                performer.set_scale(t.scale_x * ratio_x, t.scale_y * ratio_y);
            }
            if (target.x - current.x).abs() > LAYOUT_EPSILON
                || (target.y - current.y).abs() > LAYOUT_EPSILON
            {
                performer.set_position(target.x, target.y);
            }
        }
        tracing::debug!(performers = theater.len(), "canvas resized");
        Ok(())
    }

    /// Refresh the baseline after a user edit.
    ///
    /// Only an existing baseline is refreshed, and never to zero-sized bounds. Writes
    /// made by the resize itself or by animation are skipped.
    pub fn on_position_update(&self, update: &PositionUpdate) {
        if self.resizing.is_active() || update.animated || update.bounds.is_empty() {
            return;
        }
        if self.baseline(&update.id).is_none() {
            return;
        }
        let Some(base) = self.base_size.get() else {
            return;
        };
        let Some(bounds) =
            project_bounds_to_canvas_base(update.bounds, self.canvas_size.get(), base)
        else {
            return;
        };
        self.base_bounds
            .borrow_mut()
            .insert(update.id.clone(), bounds);
    }

    /// Drop the baseline of `id`.
    pub fn forget(&self, id: &str) {
        self.base_bounds.borrow_mut().remove(id);
    }
}

/// Express `bounds` measured on a `from`-sized canvas in `base` coordinates.
///
/// Identity when the sizes are equal; `None` when either size has a zero dimension.
pub fn project_bounds_to_canvas_base(bounds: Bounds, from: Size, base: Size) -> Option<Bounds> {
    if from == base && !from.has_zero_dimension() {
        return Some(bounds);
    }
    remap_bounds_for_canvas_resize(bounds, from, base)
}

/// Scale `bounds` from a `from`-sized canvas to a `to`-sized one.
///
/// Each axis scales independently, so a change of canvas aspect ratio distorts the bounds
/// the same way. Rotation is kept. `None` when either size has a zero dimension.
pub fn remap_bounds_for_canvas_resize(bounds: Bounds, from: Size, to: Size) -> Option<Bounds> {
    if from.has_zero_dimension() || to.has_zero_dimension() {
        return None;
    }
    let sx = to.width / from.width;
    let sy = to.height / from.height;
    Some(Bounds {
        x: bounds.x * sx,
        y: bounds.y * sy,
        width: bounds.width * sx,
        height: bounds.height * sy,
        rotation: bounds.rotation,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/remap.rs"]
mod tests;
