//! Time-scoped visual entities placed on the canvas.

pub(crate) mod clip;
pub(crate) mod source;

use futures::future::LocalBoxFuture;

use crate::{
    animation::spec::PerformerAnimationSpec,
    foundation::core::{AnimationLayout, Bounds, TransformState},
    foundation::error::StagecraftResult,
    foundation::events::Emitter,
};

/// Readiness future returned by [`Performer::load`]; owns everything it needs.
pub type LoadFuture = LocalBoxFuture<'static, StagecraftResult<()>>;

/// Future returned by [`Performer::seek`]; may borrow the performer while it decodes.
pub type SeekFuture<'a> = LocalBoxFuture<'a, StagecraftResult<()>>;

/// Performer variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformerKind {
    /// Timed media with its own playback clock.
    Video,
    /// Still raster image.
    Image,
    /// Rendered text block.
    Text,
}

impl PerformerKind {
    /// Whether the variant has a media clock that must follow play/pause/seek.
    pub fn has_media_clock(self) -> bool {
        match self {
            Self::Video => true,
            Self::Image | Self::Text => false,
        }
    }
}

/// Emitted whenever a performer's position, scale or rotation changes.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionUpdate {
    /// Performer id.
    pub id: String,
    /// Base bounds for user edits, rendered bounds for animation writes.
    pub bounds: Bounds,
    /// True when the write came from the animation controller rather than an edit.
    pub animated: bool,
}

/// Capability contract shared by every performer variant.
///
/// Times passed to `play`/`update`/`pause`/`seek` are performer-local: the project time
/// minus [`Performer::start`].
pub trait Performer {
    /// Unique id within a theater.
    fn id(&self) -> &str;

    /// Variant tag.
    fn kind(&self) -> PerformerKind;

    /// Project time at which the performer appears, in ms.
    fn start(&self) -> f64;

    /// How long the performer stays on stage, in ms.
    fn duration(&self) -> f64;

    /// Exclusive end of the performer's time window.
    fn end(&self) -> f64 {
        self.start() + self.duration()
    }

    /// Render and priority order; higher draws on top.
    fn z_index(&self) -> i32;

    /// Whether the render handle exists and the performer can be attached right away.
    fn is_ready(&self) -> bool;

    /// False once loading has failed.
    fn is_valid(&self) -> bool;

    /// User-authored transform, before animation.
    fn base_transform(&self) -> TransformState;

    /// Untransformed size, once known.
    fn layout(&self) -> Option<AnimationLayout>;

    /// Base transform projected to canvas bounds; zero-sized while the size is unknown.
    fn base_bounds(&self) -> Bounds {
        bounds_of(&self.base_transform(), self.layout())
    }

    /// Transform most recently applied to the render handle.
    fn rendered_transform(&self) -> TransformState;

    /// Move the top-left corner.
    fn set_position(&mut self, x: f64, y: f64);

    /// Set the scale factors.
    fn set_scale(&mut self, scale_x: f64, scale_y: f64);

    /// Set the rotation in degrees.
    fn set_rotation(&mut self, degrees: f64);

    /// Set the opacity; clamped to `[0, 1]`.
    fn set_alpha(&mut self, alpha: f64);

    /// Replace (or clear) the animation.
    fn set_animation(&mut self, spec: Option<PerformerAnimationSpec>);

    /// Start playing from `local_ms`.
    fn play(&mut self, local_ms: f64);

    /// Advance an already playing performer to `local_ms`.
    fn update(&mut self, local_ms: f64);

    /// Stop at `local_ms`.
    fn pause(&mut self, local_ms: f64);

    /// Jump to `local_ms`; resolves once the frame at that time can be shown.
    fn seek(&mut self, local_ms: f64) -> SeekFuture<'_>;

    /// Fetch and decode whatever the render handle needs.
    fn load(&mut self) -> LoadFuture;

    /// Channel carrying [`PositionUpdate`]s.
    fn position_updates(&self) -> &Emitter<PositionUpdate>;
}

pub(crate) fn bounds_of(transform: &TransformState, layout: Option<AnimationLayout>) -> Bounds {
    match layout {
        Some(layout) => transform.bounds(layout),
        None => Bounds {
            x: transform.x,
            y: transform.y,
            width: 0.0,
            height: 0.0,
            rotation: transform.rotation,
        },
    }
}
