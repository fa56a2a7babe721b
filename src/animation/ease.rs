/// Easing curves used by animation presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ease {
    /// Constant speed.
    Linear,
    /// Slow start.
    InCubic,
    /// Slow finish.
    OutCubic,
    /// Slow start and finish.
    InOutSine,
}

impl Ease {
    /// Map progress `t` (clamped to `[0, 1]`) through the curve; endpoints are exact.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutSine => (1.0 - (std::f64::consts::PI * t).cos()) / 2.0,
        }
    }
}
