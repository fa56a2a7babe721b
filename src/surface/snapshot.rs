use std::io::Cursor;

use anyhow::Context as _;
use base64::Engine as _;
use image::ImageEncoder as _;

use crate::{
    foundation::error::{StagecraftError, StagecraftResult},
    surface::{FrameRgba, RenderSurface},
};

/// Longest edge a snapshot is downsized to by default.
pub const DEFAULT_SNAPSHOT_MAX_EDGE: u32 = 320;

/// Encoding used for a snapshot data URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Lossless PNG with alpha.
    Png,
    /// JPEG; alpha is dropped.
    Jpeg {
        /// 1..=100, clamped on encode.
        quality: u8,
    },
}

impl SnapshotFormat {
    /// MIME type used in the data URL.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// Options for [`capture_snapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotOptions {
    /// The longer output edge is at most this many pixels. Frames are never upscaled.
    pub max_edge: u32,
    /// Output encoding.
    pub format: SnapshotFormat,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            max_edge: DEFAULT_SNAPSHOT_MAX_EDGE,
            format: SnapshotFormat::Png,
        }
    }
}

/// Capture the current frame of `surface` as a base64 data URL.
///
/// The off-screen extraction path is used when the surface offers one; if it is missing or
/// fails, the on-screen canvas is read back instead.
#[tracing::instrument(skip(surface))]
pub fn capture_snapshot(
    surface: &mut dyn RenderSurface,
    opts: &SnapshotOptions,
) -> StagecraftResult<String> {
    let frame = match surface.extract_frame() {
        Some(Ok(frame)) => frame,
        Some(Err(err)) => {
            tracing::warn!(error = %err, "off-screen extraction failed, reading canvas");
            surface.read_canvas()?
        }
        None => surface.read_canvas()?,
    };
    encode_data_url(&frame, opts)
}

/// Downsize and encode an already captured frame into a data URL.
pub fn encode_data_url(frame: &FrameRgba, opts: &SnapshotOptions) -> StagecraftResult<String> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| {
            StagecraftError::snapshot(format!(
                "frame buffer does not match {}x{}",
                frame.width, frame.height
            ))
        })?;
    if img.width() == 0 || img.height() == 0 {
        return Err(StagecraftError::snapshot("frame is empty"));
    }

    let (w, h) = fit_within(img.width(), img.height(), opts.max_edge);
    let img = if (w, h) == img.dimensions() {
        img
    } else {
        image::imageops::resize(&img, w, h, image::imageops::FilterType::Triangle)
    };

    let mut bytes = Vec::new();
    match opts.format {
        SnapshotFormat::Png => {
            image::DynamicImage::ImageRgba8(img)
                .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
                .context("encode png snapshot")?;
        }
        SnapshotFormat::Jpeg { quality } => {
            let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
                .write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .context("encode jpeg snapshot")?;
        }
    }

    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:{};base64,{encoded}", opts.format.mime()))
}

fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if max_edge == 0 || longest <= max_edge {
        return (width, height);
    }
    let scale = f64::from(max_edge) / f64::from(longest);
    let w = (f64::from(width) * scale).round().max(1.0) as u32;
    let h = (f64::from(height) * scale).round().max(1.0) as u32;
    (w, h)
}

#[cfg(test)]
#[path = "../../tests/unit/surface/snapshot.rs"]
mod tests;
