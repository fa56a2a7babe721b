//! JSON stage fixtures used by the `stagecraft` binary and by tests.
//!
//! A fixture is a diagnostic input: a canvas size plus a flat performer list. It is not a
//! project format and carries no assets; every performer is backed by a [`StaticSource`]
//! of the declared size.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    animation::spec::PerformerAnimationSpec,
    foundation::core::{Size, TransformState},
    foundation::error::{StagecraftError, StagecraftResult},
    performer::PerformerKind,
    performer::clip::ClipPerformer,
    performer::source::StaticSource,
};

/// Canvas and performers read from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StageFixture {
    /// Canvas size in pixels.
    pub canvas: Size,
    /// Performers, in hire order.
    #[serde(default)]
    pub performers: Vec<PerformerFixture>,
}

/// One performer entry of a [`StageFixture`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformerFixture {
    /// Unique id.
    pub id: String,
    /// Variant.
    pub kind: PerformerKind,
    /// Start in ms.
    #[serde(default)]
    pub start: f64,
    /// Duration in ms.
    pub duration: f64,
    /// Render order.
    #[serde(default)]
    pub z_index: i32,
    /// Untransformed width in pixels.
    pub width: f64,
    /// Untransformed height in pixels.
    pub height: f64,
    /// Base transform; identity at the origin when omitted.
    #[serde(default)]
    pub transform: Option<TransformState>,
    /// Loosely-typed animation spec, normalized on build.
    #[serde(default)]
    pub animation: Option<serde_json::Value>,
}

impl StageFixture {
    /// Parse a fixture from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StagecraftResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| StagecraftError::serde(format!("parse stage fixture JSON: {e}")))
    }

    /// Parse a fixture from a JSON string.
    pub fn from_json_str(s: &str) -> StagecraftResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a fixture from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StagecraftResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StagecraftError::validation(format!("open stage fixture '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check the canvas and every performer entry.
    pub fn validate(&self) -> StagecraftResult<()> {
        if !is_positive(self.canvas.width) || !is_positive(self.canvas.height) {
            return Err(StagecraftError::validation(
                "canvas width/height must be finite and > 0",
            ));
        }
        let mut seen = HashSet::new();
        for p in &self.performers {
            if p.id.trim().is_empty() {
                return Err(StagecraftError::validation("performer id must be non-empty"));
            }
            if !seen.insert(p.id.as_str()) {
                return Err(StagecraftError::validation(format!(
                    "duplicate performer id '{}'",
                    p.id
                )));
            }
            if !(p.start.is_finite() && p.start >= 0.0) {
                return Err(StagecraftError::validation(format!(
                    "performer '{}' start must be finite and >= 0",
                    p.id
                )));
            }
            if !(p.duration.is_finite() && p.duration >= 0.0) {
                return Err(StagecraftError::validation(format!(
                    "performer '{}' duration must be finite and >= 0",
                    p.id
                )));
            }
            if !is_positive(p.width) || !is_positive(p.height) {
                return Err(StagecraftError::validation(format!(
                    "performer '{}' width/height must be finite and > 0",
                    p.id
                )));
            }
        }
        Ok(())
    }

    /// Validate, then build one [`ClipPerformer`] per entry.
    pub fn into_performers(self) -> StagecraftResult<Vec<ClipPerformer>> {
        self.validate()?;
        Ok(self
            .performers
            .into_iter()
            .map(PerformerFixture::into_performer)
            .collect())
    }
}

impl PerformerFixture {
    fn into_performer(self) -> ClipPerformer {
        let size = Size::new(self.width, self.height);
        let animation = self
            .animation
            .as_ref()
            .and_then(PerformerAnimationSpec::normalize);
        ClipPerformer::new(self.id, self.kind, Box::new(StaticSource::new(size)))
            .with_timing(self.start, self.duration)
            .with_z_index(self.z_index)
            .with_transform(self.transform.unwrap_or_default())
            .with_animation(animation)
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
#[path = "../tests/unit/fixture.rs"]
mod tests;
