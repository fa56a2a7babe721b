use std::cell::Cell;
use std::rc::Rc;

use futures::FutureExt as _;

use crate::{
    animation::controller::AnimationController,
    animation::spec::PerformerAnimationSpec,
    foundation::core::{AnimationLayout, Size, TransformState},
    foundation::events::Emitter,
    performer::source::{MediaSource, StaticSource},
    performer::{LoadFuture, Performer, PerformerKind, PositionUpdate, SeekFuture, bounds_of},
};

/// Progress of a performer's asset loading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// `load` was never called.
    Idle,
    /// A load future is in flight.
    Loading,
    /// The render handle exists.
    Loaded,
    /// Loading failed; the performer will not become visible.
    Failed,
}

/// Performer backed by a [`MediaSource`] and animated by an [`AnimationController`].
///
/// Video forwards play/pause/seek to its source; image and text performers are static and
/// only re-apply their animation.
pub struct ClipPerformer {
    id: String,
    kind: PerformerKind,
    start: f64,
    duration: f64,
    z_index: i32,
    local_size: Option<Size>,
    source: Box<dyn MediaSource>,
    controller: AnimationController,
    sprite: TransformState,
    local_time_ms: f64,
    playing: bool,
    load_state: Rc<Cell<LoadState>>,
    positions: Emitter<PositionUpdate>,
}

impl std::fmt::Debug for ClipPerformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipPerformer")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("start", &self.start)
            .field("duration", &self.duration)
            .field("z_index", &self.z_index)
            .field("load_state", &self.load_state.get())
            .finish_non_exhaustive()
    }
}

impl ClipPerformer {
    /// Performer of `kind` drawing from `source`, spanning `[0, 0)` until timed.
    pub fn new(id: impl Into<String>, kind: PerformerKind, source: Box<dyn MediaSource>) -> Self {
        Self {
            id: id.into(),
            kind,
            start: 0.0,
            duration: 0.0,
            z_index: 0,
            local_size: None,
            source,
            controller: AnimationController::default(),
            sprite: TransformState::default(),
            local_time_ms: 0.0,
            playing: false,
            load_state: Rc::new(Cell::new(LoadState::Idle)),
            positions: Emitter::new(),
        }
    }

    /// Still image of a known size.
    pub fn image(id: impl Into<String>, size: Size) -> Self {
        Self::new(id, PerformerKind::Image, Box::new(StaticSource::new(size)))
    }

    /// Text block whose rasterized size is `size`.
    pub fn text(id: impl Into<String>, size: Size) -> Self {
        Self::new(id, PerformerKind::Text, Box::new(StaticSource::new(size)))
    }

    /// Video drawing from `source`.
    pub fn video(id: impl Into<String>, source: Box<dyn MediaSource>) -> Self {
        Self::new(id, PerformerKind::Video, source)
    }

    /// Place the performer on the timeline. Negative or non-finite values become 0.
    pub fn with_timing(mut self, start: f64, duration: f64) -> Self {
        self.start = non_negative(start);
        self.duration = non_negative(duration);
        self
    }

    /// Set the render order.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Override the untransformed size reported by the source.
    pub fn with_local_size(mut self, size: Size) -> Self {
        self.local_size = Some(size);
        self
    }

    /// Set the base transform.
    pub fn with_transform(mut self, transform: TransformState) -> Self {
        self.controller.set_base_transform(transform);
        self.sprite = transform;
        self
    }

    /// Attach an animation.
    pub fn with_animation(mut self, spec: Option<PerformerAnimationSpec>) -> Self {
        self.controller.set_spec(spec);
        self
    }

    /// Current loading progress.
    pub fn load_state(&self) -> LoadState {
        self.load_state.get()
    }

    /// Whether `play` was called more recently than `pause`.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Local time of the last render.
    pub fn local_time(&self) -> f64 {
        self.local_time_ms
    }

    /// The animation controller driving the render handle.
    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    fn render(&mut self, local_ms: f64) {
        self.local_time_ms = local_ms;
        let layout = self.layout();
        let duration = self.duration;
        let Self {
            id,
            controller,
            sprite,
            positions,
            ..
        } = self;
        let controller = &*controller;
        controller.apply(local_ms, duration, layout, |state| {
            let moved = sprite.x != state.x
                || sprite.y != state.y
                || sprite.scale_x != state.scale_x
                || sprite.scale_y != state.scale_y
                || sprite.rotation != state.rotation;
            *sprite = state;
            if moved {
                positions.emit(&PositionUpdate {
                    id: id.clone(),
                    bounds: bounds_of(&state, layout),
                    animated: controller.is_applying(),
                });
            }
        });
    }

    fn edit_base(&mut self, edit: impl FnOnce(&mut TransformState)) {
        let mut base = self.controller.base_transform();
        edit(&mut base);
        self.controller.set_base_transform(base);
        self.sprite = self
            .controller
            .sample(self.local_time_ms, self.duration, self.layout());
        self.positions.emit(&PositionUpdate {
            id: self.id.clone(),
            bounds: self.base_bounds(),
            animated: false,
        });
    }
}

impl Performer for ClipPerformer {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> PerformerKind {
        self.kind
    }

    fn start(&self) -> f64 {
        self.start
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn is_ready(&self) -> bool {
        self.load_state.get() == LoadState::Loaded
    }

    fn is_valid(&self) -> bool {
        self.load_state.get() != LoadState::Failed
    }

    fn base_transform(&self) -> TransformState {
        self.controller.base_transform()
    }

    fn layout(&self) -> Option<AnimationLayout> {
        self.local_size
            .or_else(|| self.source.intrinsic_size())
            .map(|s| AnimationLayout::new(s.width, s.height))
    }

    fn rendered_transform(&self) -> TransformState {
        self.sprite
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.edit_base(|t| {
            t.x = x;
            t.y = y;
        });
    }

    fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.edit_base(|t| {
            t.scale_x = scale_x;
            t.scale_y = scale_y;
        });
    }

    fn set_rotation(&mut self, degrees: f64) {
        self.edit_base(|t| t.rotation = degrees);
    }

    fn set_alpha(&mut self, alpha: f64) {
        let mut base = self.controller.base_transform();
        base.set_alpha(alpha);
        self.controller.set_base_transform(base);
        self.sprite = self
            .controller
            .sample(self.local_time_ms, self.duration, self.layout());
    }

    fn set_animation(&mut self, spec: Option<PerformerAnimationSpec>) {
        self.controller.set_spec(spec);
        self.render(self.local_time_ms);
    }

    fn play(&mut self, local_ms: f64) {
        self.playing = true;
        self.render(local_ms);
        if self.kind.has_media_clock() {
            self.source.play(local_ms);
        }
    }

    fn update(&mut self, local_ms: f64) {
        self.render(local_ms);
    }

    fn pause(&mut self, local_ms: f64) {
        self.playing = false;
        self.render(local_ms);
        if self.kind.has_media_clock() {
            self.source.pause();
        }
    }

    fn seek(&mut self, local_ms: f64) -> SeekFuture<'_> {
        self.render(local_ms);
        match self.kind {
            PerformerKind::Video => self.source.seek(local_ms),
            PerformerKind::Image | PerformerKind::Text => {
                futures::future::ready(Ok(())).boxed_local()
            }
        }
    }

    fn load(&mut self) -> LoadFuture {
        if self.load_state.get() == LoadState::Loaded {
            return futures::future::ready(Ok(())).boxed_local();
        }
        self.load_state.set(LoadState::Loading);
        let state = Rc::clone(&self.load_state);
        let pending = self.source.load();
        async move {
            let result = pending.await;
            state.set(if result.is_ok() {
                LoadState::Loaded
            } else {
                LoadState::Failed
            });
            result
        }
        .boxed_local()
    }

    fn position_updates(&self) -> &Emitter<PositionUpdate> {
        &self.positions
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/performer/clip.rs"]
mod tests;
