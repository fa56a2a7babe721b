/// One phase of a performer animation: a named preset played over a duration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSegmentSpec {
    /// Preset name, e.g. `"slide-up"`. Unknown names animate nothing.
    pub preset: String,
    /// Requested duration in milliseconds.
    #[serde(rename = "durationMs", alias = "duration_ms")]
    pub duration_ms: f64,
}

impl AnimationSegmentSpec {
    /// Build a segment spec.
    pub fn new(preset: impl Into<String>, duration_ms: f64) -> Self {
        Self {
            preset: preset.into(),
            duration_ms,
        }
    }

    fn is_usable(&self) -> bool {
        !self.preset.trim().is_empty() && self.duration_ms.is_finite() && self.duration_ms >= 0.0
    }
}

/// Declarative enter/exit/loop animation attached to a performer.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PerformerAnimationSpec {
    /// Segment played from the performer's start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enter: Option<AnimationSegmentSpec>,
    /// Segment played up to the performer's end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<AnimationSegmentSpec>,
    /// Segment repeated in between.
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_: Option<AnimationSegmentSpec>,
}

impl PerformerAnimationSpec {
    /// True when no segment is set.
    pub fn is_empty(&self) -> bool {
        self.enter.is_none() && self.exit.is_none() && self.loop_.is_none()
    }

    /// Drop unusable segments; `None` when nothing is left.
    pub fn sanitized(self) -> Option<Self> {
        let keep = |s: Option<AnimationSegmentSpec>| s.filter(AnimationSegmentSpec::is_usable);
        let spec = Self {
            enter: keep(self.enter),
            exit: keep(self.exit),
            loop_: keep(self.loop_),
        };
        (!spec.is_empty()).then_some(spec)
    }

    /// Leniently read a spec from loosely-typed JSON.
    ///
    /// Anything malformed is dropped segment by segment; a value with no usable segment
    /// normalizes to `None`, which the controller treats as "no animation".
    pub fn normalize(raw: &serde_json::Value) -> Option<Self> {
        let obj = raw.as_object()?;
        let segment = |key: &str| -> Option<AnimationSegmentSpec> {
            let seg = obj.get(key)?.as_object()?;
            let preset = seg.get("preset")?.as_str()?.trim();
            let duration_ms = ["durationMs", "duration_ms", "duration"]
                .iter()
                .find_map(|k| seg.get(*k).and_then(serde_json::Value::as_f64))?;
            Some(AnimationSegmentSpec::new(preset, duration_ms))
        };

        Self {
            enter: segment("enter"),
            exit: segment("exit"),
            loop_: segment("loop"),
        }
        .sanitized()
    }
}
