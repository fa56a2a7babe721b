use crate::{
    animation::preset::SegmentPhase,
    animation::segment::{AnimationSegment, map_to_segment_time},
    animation::spec::{AnimationSegmentSpec, PerformerAnimationSpec},
    foundation::core::{Affine, AnimationLayout, Point, RelativeTransformState, TransformState},
    foundation::guard::ReentrancyGuard,
};

/// Composes enter/exit/loop animation on top of a performer's base transform.
///
/// The controller is pure with respect to time: sampling the same `(time, duration)` always
/// yields the same transform. The only side effect is the `apply` callback, during which
/// [`AnimationController::is_applying`] reports `true` so transform listeners can tell
/// animation-driven writes from user edits.
#[derive(Debug, Default)]
pub struct AnimationController {
    base: TransformState,
    spec: Option<PerformerAnimationSpec>,
    enter: Option<AnimationSegment>,
    exit: Option<AnimationSegment>,
    loop_: Option<AnimationSegment>,
    applying: ReentrancyGuard,
}

impl AnimationController {
    /// Build a controller; `spec` is sanitized and compiled immediately.
    pub fn new(base: TransformState, spec: Option<PerformerAnimationSpec>) -> Self {
        let mut controller = Self {
            base,
            ..Self::default()
        };
        controller.set_spec(spec);
        controller
    }

    /// The user-authored transform animation is composed onto.
    pub fn base_transform(&self) -> TransformState {
        self.base
    }

    /// Replace the base transform.
    pub fn set_base_transform(&mut self, base: TransformState) {
        self.base = base;
    }

    /// The active (sanitized) spec, if any.
    pub fn spec(&self) -> Option<&PerformerAnimationSpec> {
        self.spec.as_ref()
    }

    /// Replace the spec and recompile its segments.
    pub fn set_spec(&mut self, spec: Option<PerformerAnimationSpec>) {
        self.spec = spec.and_then(PerformerAnimationSpec::sanitized);
        let compile = |seg: Option<&AnimationSegmentSpec>, phase| {
            seg.map(|s| AnimationSegment::compile(s, phase))
        };
        let spec = self.spec.as_ref();
        self.enter = compile(spec.and_then(|s| s.enter.as_ref()), SegmentPhase::Enter);
        self.exit = compile(spec.and_then(|s| s.exit.as_ref()), SegmentPhase::Exit);
        self.loop_ = compile(spec.and_then(|s| s.loop_.as_ref()), SegmentPhase::Loop);
    }

    /// True while an [`AnimationController::apply`] callback runs.
    pub fn is_applying(&self) -> bool {
        self.applying.is_active()
    }

    /// Relative offset active at `time_ms` of a performer lasting `duration_ms`.
    ///
    /// `None` when there is nothing to animate (no spec, or a non-positive duration).
    /// Exit wins over enter when their windows overlap, and enter wins over loop.
    pub fn sample_relative(
        &self,
        time_ms: f64,
        duration_ms: f64,
    ) -> Option<RelativeTransformState> {
        self.spec.as_ref()?;
        if !(duration_ms.is_finite() && duration_ms > 0.0) {
            return None;
        }
        let safe_duration = duration_ms;
        let safe_time = if time_ms.is_nan() {
            0.0
        } else {
            time_ms.clamp(0.0, safe_duration)
        };

        if let Some(exit) = &self.exit {
            let exit_duration = exit.duration_ms().min(safe_duration);
            let exit_start = (safe_duration - exit_duration).max(0.0);
            if safe_time >= exit_start {
                let local = safe_time - exit_start;
                let t = map_to_segment_time(local, exit_duration, exit.duration_ms());
                return Some(exit.sample(t));
            }
        }
        if let Some(enter) = &self.enter {
            let enter_duration = enter.duration_ms().min(safe_duration);
            if safe_time <= enter_duration {
                let t = map_to_segment_time(safe_time, enter_duration, enter.duration_ms());
                return Some(enter.sample(t));
            }
        }
        if let Some(lp) = self.loop_.filter(|l| l.duration_ms() > 0.0) {
            return Some(lp.sample(safe_time % lp.duration_ms()));
        }
        Some(RelativeTransformState::NEUTRAL)
    }

    /// Final transform at `time_ms`; center-pivot composition when `layout` is valid.
    pub fn sample(
        &self,
        time_ms: f64,
        duration_ms: f64,
        layout: Option<AnimationLayout>,
    ) -> TransformState {
        let Some(rel) = self.sample_relative(time_ms, duration_ms) else {
            return self.base;
        };
        match layout.filter(AnimationLayout::is_valid) {
            Some(layout) => compose_center_pivot(self.base, rel, layout),
            None => compose(self.base, rel),
        }
    }

    /// Sample at `time_ms` and hand the result to `apply` exactly once.
    pub fn apply<F>(
        &self,
        time_ms: f64,
        duration_ms: f64,
        layout: Option<AnimationLayout>,
        apply: F,
    ) where
        F: FnOnce(TransformState),
    {
        let state = self.sample(time_ms, duration_ms, layout);
        let _applying = self.applying.enter();
        apply(state);
    }
}

/// Naive composition: offsets add to the top-left corner, multipliers multiply.
pub fn compose(base: TransformState, rel: RelativeTransformState) -> TransformState {
    TransformState::new(
        base.x + rel.x,
        base.y + rel.y,
        base.scale_x * rel.scale_x,
        base.scale_y * rel.scale_y,
        base.rotation + rel.rotation,
        base.alpha() * rel.alpha,
    )
}

/// Composition that keeps scale and rotation pivoting around the element's visual center.
///
/// The relative offset moves the center; the new top-left corner is derived back from the
/// moved center using the composed scale and rotation.
pub fn compose_center_pivot(
    base: TransformState,
    rel: RelativeTransformState,
    layout: AnimationLayout,
) -> TransformState {
    let center = base.visual_center(layout);
    let center = Point::new(center.x + rel.x, center.y + rel.y);

    let scale_x = base.scale_x * rel.scale_x;
    let scale_y = base.scale_y * rel.scale_y;
    let rotation = base.rotation + rel.rotation;
    let half = Point::new(
        layout.local_width * scale_x / 2.0,
        layout.local_height * scale_y / 2.0,
    );
    let offset = Affine::rotate(rotation.to_radians()) * half;

    TransformState::new(
        center.x - offset.x,
        center.y - offset.y,
        scale_x,
        scale_y,
        rotation,
        base.alpha() * rel.alpha,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/animation/controller.rs"]
mod tests;
