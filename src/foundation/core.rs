pub use kurbo::{Affine, Point, Vec2};

/// Tolerance used for layout comparisons (pivot sizes, resize ratios and offsets).
pub const LAYOUT_EPSILON: f64 = 1e-6;

/// Absolute 2D transform of a performer on the canvas.
///
/// `x`/`y` are the top-left position in canvas pixels, `rotation` is in degrees and pivots
/// around that top-left corner. `alpha` is kept in `[0, 1]` on every write.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformState {
    /// Left edge in canvas pixels.
    #[serde(default)]
    pub x: f64,
    /// Top edge in canvas pixels.
    #[serde(default)]
    pub y: f64,
    /// Horizontal scale factor.
    #[serde(default = "one")]
    pub scale_x: f64,
    /// Vertical scale factor.
    #[serde(default = "one")]
    pub scale_y: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "one", deserialize_with = "deserialize_alpha")]
    alpha: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            alpha: 1.0,
        }
    }
}

impl TransformState {
    /// Build a transform; `alpha` is clamped to `[0, 1]`.
    pub fn new(x: f64, y: f64, scale_x: f64, scale_y: f64, rotation: f64, alpha: f64) -> Self {
        Self {
            x,
            y,
            scale_x,
            scale_y,
            rotation,
            alpha: clamp_alpha(alpha),
        }
    }

    /// Identity transform placed at `(x, y)`.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Opacity in `[0, 1]`.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Set opacity, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = clamp_alpha(alpha);
    }

    /// Copy with a new opacity, clamped to `[0, 1]`.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.set_alpha(alpha);
        self
    }

    /// Rotation converted to radians.
    pub fn rotation_rad(&self) -> f64 {
        self.rotation.to_radians()
    }

    /// Visual center of an element of size `layout` drawn with this transform.
    ///
    /// The top-left corner is the rotation origin, so the center is the corner plus the
    /// rotated half-extent of the scaled box.
    pub fn visual_center(&self, layout: AnimationLayout) -> Point {
        let half = Point::new(
            layout.local_width * self.scale_x / 2.0,
            layout.local_height * self.scale_y / 2.0,
        );
        let offset = Affine::rotate(self.rotation_rad()) * half;
        Point::new(self.x + offset.x, self.y + offset.y)
    }

    /// Canvas bounds of an element of size `layout` drawn with this transform.
    pub fn bounds(&self, layout: AnimationLayout) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: layout.local_width * self.scale_x,
            height: layout.local_height * self.scale_y,
            rotation: self.rotation,
        }
    }
}

/// Offset/multiplier to compose onto a [`TransformState`].
///
/// Position and rotation are additive (neutral 0); scale and alpha are multipliers
/// (neutral 1).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RelativeTransformState {
    /// Additive horizontal offset in pixels.
    pub x: f64,
    /// Additive vertical offset in pixels.
    pub y: f64,
    /// Horizontal scale multiplier.
    pub scale_x: f64,
    /// Vertical scale multiplier.
    pub scale_y: f64,
    /// Additive rotation in degrees.
    pub rotation: f64,
    /// Opacity multiplier.
    pub alpha: f64,
}

impl Default for RelativeTransformState {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl RelativeTransformState {
    /// The no-op relative state.
    pub const NEUTRAL: Self = Self {
        x: 0.0,
        y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        rotation: 0.0,
        alpha: 1.0,
    };

    /// Component-wise linear blend between `self` (at `t = 0`) and `other` (at `t = 1`).
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a * (1.0 - t) + b * t;
        Self {
            x: mix(self.x, other.x),
            y: mix(self.y, other.y),
            scale_x: mix(self.scale_x, other.scale_x),
            scale_y: mix(self.scale_y, other.scale_y),
            rotation: mix(self.rotation, other.rotation),
            alpha: mix(self.alpha, other.alpha),
        }
    }
}

/// Untransformed size of an element, required for center-pivot composition.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationLayout {
    /// Unscaled width in pixels.
    pub local_width: f64,
    /// Unscaled height in pixels.
    pub local_height: f64,
}

impl AnimationLayout {
    /// Build a layout from a width and height.
    pub fn new(local_width: f64, local_height: f64) -> Self {
        Self {
            local_width,
            local_height,
        }
    }

    /// Whether both dimensions are finite and larger than [`LAYOUT_EPSILON`].
    pub fn is_valid(&self) -> bool {
        self.local_width.is_finite()
            && self.local_height.is_finite()
            && self.local_width > LAYOUT_EPSILON
            && self.local_height > LAYOUT_EPSILON
    }
}

/// Canvas or media size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Build a size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (or not a usable number).
    pub fn has_zero_dimension(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width == 0.0
            || self.height == 0.0
    }
}

impl From<AnimationLayout> for Size {
    fn from(layout: AnimationLayout) -> Self {
        Self::new(layout.local_width, layout.local_height)
    }
}

/// Rectangle placed on the canvas with a rotation in degrees around its top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Left edge in canvas pixels.
    pub x: f64,
    /// Top edge in canvas pixels.
    pub y: f64,
    /// Scaled width in pixels.
    pub width: f64,
    /// Scaled height in pixels.
    pub height: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl Bounds {
    /// True when the bounds have no area to remap.
    pub fn is_empty(&self) -> bool {
        self.width.abs() <= LAYOUT_EPSILON || self.height.abs() <= LAYOUT_EPSILON
    }
}

fn one() -> f64 {
    1.0
}

fn clamp_alpha(alpha: f64) -> f64 {
    if alpha.is_nan() {
        return 0.0;
    }
    alpha.clamp(0.0, 1.0)
}

fn deserialize_alpha<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = <f64 as serde::Deserialize>::deserialize(deserializer)?;
    Ok(clamp_alpha(raw))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
