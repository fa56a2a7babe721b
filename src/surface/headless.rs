use futures::FutureExt as _;
use futures::future::LocalBoxFuture;

use crate::{
    foundation::core::Size,
    foundation::error::{StagecraftError, StagecraftResult},
    surface::{FrameRgba, RenderSurface},
};

#[derive(Clone, Debug, PartialEq)]
struct Child {
    id: String,
    z_index: i32,
}

/// In-memory [`RenderSurface`] with no drawing backend.
///
/// Children are kept sorted by z-index, ties in attach order. Reading the canvas yields a
/// frame filled with the background color.
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    size: Size,
    background: [u8; 4],
    children: Vec<Child>,
}

impl HeadlessSurface {
    /// Surface of `size` with an opaque black background.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            background: [0, 0, 0, 255],
            children: Vec::new(),
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, rgba: [u8; 4]) -> Self {
        self.background = rgba;
        self
    }
}

impl RenderSurface for HeadlessSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) -> StagecraftResult<()> {
        if !(size.width.is_finite() && size.height.is_finite())
            || size.width < 0.0
            || size.height < 0.0
        {
            return Err(StagecraftError::surface(format!(
                "invalid canvas size {}x{}",
                size.width, size.height
            )));
        }
        self.size = size;
        Ok(())
    }

    fn attach(&mut self, id: &str, z_index: i32) {
        if self.children.iter().any(|c| c.id == id) {
            return;
        }
        let at = self
            .children
            .iter()
            .position(|c| c.z_index > z_index)
            .unwrap_or(self.children.len());
        self.children.insert(
            at,
            Child {
                id: id.to_owned(),
                z_index,
            },
        );
    }

    fn detach(&mut self, id: &str) -> bool {
        let before = self.children.len();
        self.children.retain(|c| c.id != id);
        self.children.len() != before
    }

    fn children(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.id.as_str()).collect()
    }

    fn ready(&self) -> LocalBoxFuture<'static, StagecraftResult<()>> {
        futures::future::ready(Ok(())).boxed_local()
    }

    fn read_canvas(&mut self) -> StagecraftResult<FrameRgba> {
        if self.size.has_zero_dimension() {
            return Err(StagecraftError::surface("canvas has a zero dimension"));
        }
        let width = self.size.width.round().max(1.0) as u32;
        let height = self.size.height.round().max(1.0) as u32;
        Ok(FrameRgba::filled(width, height, self.background))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/headless.rs"]
mod tests;
