use futures::FutureExt as _;

use crate::{
    foundation::core::Size,
    performer::{LoadFuture, SeekFuture},
};

/// Media backing a performer (decoder, image, text rasterizer).
///
/// Only video sources have a clock; the default play/pause/seek are no-ops.
pub trait MediaSource {
    /// Start fetching/decoding; resolves once the first frame can be drawn.
    fn load(&mut self) -> LoadFuture;

    /// Natural size of the media, once known.
    fn intrinsic_size(&self) -> Option<Size>;

    /// Start media playback at `source_ms`.
    fn play(&mut self, _source_ms: f64) {}

    /// Stop media playback.
    fn pause(&mut self) {}

    /// Decode the frame at `source_ms`.
    fn seek(&mut self, _source_ms: f64) -> SeekFuture<'_> {
        futures::future::ready(Ok(())).boxed_local()
    }
}

/// Source whose content is available immediately with a fixed size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticSource {
    size: Size,
}

impl StaticSource {
    /// Source of the given natural size.
    pub fn new(size: Size) -> Self {
        Self { size }
    }
}

impl MediaSource for StaticSource {
    fn load(&mut self) -> LoadFuture {
        futures::future::ready(Ok(())).boxed_local()
    }

    fn intrinsic_size(&self) -> Option<Size> {
        Some(self.size)
    }
}
