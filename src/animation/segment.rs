use crate::{
    animation::preset::{AnimationPreset, SegmentPhase},
    animation::spec::AnimationSegmentSpec,
    foundation::core::RelativeTransformState,
};

/// Compiled, sampleable animation phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSegment {
    duration_ms: f64,
    preset: AnimationPreset,
    phase: SegmentPhase,
}

impl AnimationSegment {
    /// Compile a segment spec for `phase`. Unknown presets compile to an identity segment.
    pub fn compile(spec: &AnimationSegmentSpec, phase: SegmentPhase) -> Self {
        let duration_ms = if spec.duration_ms.is_finite() {
            spec.duration_ms.max(0.0)
        } else {
            0.0
        };
        Self {
            duration_ms,
            preset: AnimationPreset::parse(&spec.preset),
            phase,
        }
    }

    /// Authored duration of the preset in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Resolved preset.
    pub fn preset(&self) -> AnimationPreset {
        self.preset
    }

    /// Phase this segment was compiled for.
    pub fn phase(&self) -> SegmentPhase {
        self.phase
    }

    /// Relative state `time_ms` into the segment (clamped to `[0, duration_ms]`).
    ///
    /// Zero-length segments are neutral.
    pub fn sample(&self, time_ms: f64) -> RelativeTransformState {
        if self.duration_ms <= 0.0 {
            return RelativeTransformState::NEUTRAL;
        }
        let t = if time_ms.is_nan() {
            0.0
        } else {
            time_ms.clamp(0.0, self.duration_ms)
        };
        self.preset.sample(self.phase, t / self.duration_ms)
    }
}

/// Rescale a local time inside an effective window onto the segment's authored duration.
///
/// A 400ms preset squeezed into a 200ms window plays twice as fast. Returns 0 when either
/// duration is non-positive.
pub fn map_to_segment_time(local_ms: f64, effective_ms: f64, source_ms: f64) -> f64 {
    if effective_ms <= 0.0 || source_ms <= 0.0 {
        return 0.0;
    }
    let local = local_ms.clamp(0.0, effective_ms);
    local / effective_ms * source_ms
}
