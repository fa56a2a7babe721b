use crate::{animation::ease::Ease, foundation::core::RelativeTransformState};

/// Travel distance of the `slide-*` presets, in pixels.
pub const SLIDE_DISTANCE_PX: f64 = 24.0;
/// Reduced scale factor of the `zoom-*` presets.
pub const ZOOM_FACTOR: f64 = 0.85;
/// Arc swept by `spin` over one segment duration, in degrees.
pub const SPIN_DEGREES: f64 = 360.0;

/// Which part of a performer's lifetime a segment animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentPhase {
    /// Runs from the performer's start; ends on the neutral state.
    Enter,
    /// Runs up to the performer's end; starts from the neutral state.
    Exit,
    /// Repeats for the whole lifetime; neutral at both ends of each cycle.
    Loop,
}

/// Built-in animation presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationPreset {
    /// No-op; what unknown preset names resolve to.
    Identity,
    /// Opacity between 0 and 1.
    Fade,
    /// Moves upwards while fading.
    SlideUp,
    /// Moves downwards while fading.
    SlideDown,
    /// Moves leftwards while fading.
    SlideLeft,
    /// Moves rightwards while fading.
    SlideRight,
    /// Grows through the neutral scale.
    ZoomIn,
    /// Shrinks through the neutral scale.
    ZoomOut,
    /// Rotation sweep; one full turn per loop cycle.
    Spin,
}

impl AnimationPreset {
    /// Resolve a preset name. Unknown names resolve to [`AnimationPreset::Identity`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "fade" | "fade-in" | "fade-out" => Self::Fade,
            "slide-up" => Self::SlideUp,
            "slide-down" => Self::SlideDown,
            "slide-left" => Self::SlideLeft,
            "slide-right" => Self::SlideRight,
            "zoom-in" => Self::ZoomIn,
            "zoom-out" => Self::ZoomOut,
            "spin" | "rotate" => Self::Spin,
            _ => Self::Identity,
        }
    }

    /// Canonical preset name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Identity => "none",
            Self::Fade => "fade",
            Self::SlideUp => "slide-up",
            Self::SlideDown => "slide-down",
            Self::SlideLeft => "slide-left",
            Self::SlideRight => "slide-right",
            Self::ZoomIn => "zoom-in",
            Self::ZoomOut => "zoom-out",
            Self::Spin => "spin",
        }
    }

    /// Relative state at normalized progress `progress` in `[0, 1]` of a `phase` segment.
    pub fn sample(self, phase: SegmentPhase, progress: f64) -> RelativeTransformState {
        let neutral = RelativeTransformState::NEUTRAL;
        let extreme = self.extreme(phase);
        match (self, phase) {
            (Self::Identity, _) => neutral,
            (_, SegmentPhase::Enter) => extreme.lerp(neutral, Ease::OutCubic.apply(progress)),
            (_, SegmentPhase::Exit) => neutral.lerp(extreme, Ease::InCubic.apply(progress)),
            (Self::Spin, SegmentPhase::Loop) => RelativeTransformState {
                rotation: SPIN_DEGREES * Ease::Linear.apply(progress),
                ..neutral
            },
            (_, SegmentPhase::Loop) => {
                let swing = (std::f64::consts::PI * progress.clamp(0.0, 1.0)).sin();
                neutral.lerp(extreme, swing)
            }
        }
    }

    // State furthest from neutral: where enter starts, exit ends and loops peak.
    fn extreme(self, phase: SegmentPhase) -> RelativeTransformState {
        let neutral = RelativeTransformState::NEUTRAL;
        let fades = !matches!(phase, SegmentPhase::Loop);
        let faded_alpha = if fades { 0.0 } else { 1.0 };
        let toward = match phase {
            SegmentPhase::Enter => -1.0,
            SegmentPhase::Exit | SegmentPhase::Loop => 1.0,
        };

        match self {
            Self::Identity => neutral,
            Self::Fade => RelativeTransformState {
                alpha: 0.0,
                ..neutral
            },
            Self::SlideUp | Self::SlideDown | Self::SlideLeft | Self::SlideRight => {
                let (dx, dy) = self.slide_direction();
                RelativeTransformState {
                    x: dx * SLIDE_DISTANCE_PX * toward,
                    y: dy * SLIDE_DISTANCE_PX * toward,
                    alpha: faded_alpha,
                    ..neutral
                }
            }
            Self::ZoomIn | Self::ZoomOut => {
                let shrunk = matches!(
                    (self, phase),
                    (Self::ZoomIn, SegmentPhase::Enter)
                        | (Self::ZoomOut, SegmentPhase::Exit | SegmentPhase::Loop)
                );
                let scale = if shrunk { ZOOM_FACTOR } else { 1.0 / ZOOM_FACTOR };
                RelativeTransformState {
                    scale_x: scale,
                    scale_y: scale,
                    alpha: faded_alpha,
                    ..neutral
                }
            }
            Self::Spin => RelativeTransformState {
                rotation: SPIN_DEGREES * toward,
                ..neutral
            },
        }
    }

    // Unit motion vector in canvas coordinates (y grows downwards).
    fn slide_direction(self) -> (f64, f64) {
        match self {
            Self::SlideUp => (0.0, -1.0),
            Self::SlideDown => (0.0, 1.0),
            Self::SlideLeft => (-1.0, 0.0),
            Self::SlideRight => (1.0, 0.0),
            _ => (0.0, 0.0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/preset.rs"]
mod tests;
