//! Render surface contract the stage attaches performers to.

pub(crate) mod headless;
pub(crate) mod snapshot;

use futures::future::LocalBoxFuture;

use crate::foundation::{core::Size, error::StagecraftResult};

/// Straight-alpha RGBA8 pixels, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgba {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl FrameRgba {
    /// Frame of the given size filled with one color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: rgba.repeat(pixels),
        }
    }
}

/// Host render tree: a sized canvas performers are attached to by id.
pub trait RenderSurface {
    /// Current canvas size.
    fn size(&self) -> Size;

    /// Resize the canvas.
    fn resize(&mut self, size: Size) -> StagecraftResult<()>;

    /// Add a child; attaching an already attached id is a no-op.
    fn attach(&mut self, id: &str, z_index: i32);

    /// Remove a child; returns `false` if it was not attached.
    fn detach(&mut self, id: &str) -> bool;

    /// Attached children in draw order.
    fn children(&self) -> Vec<&str>;

    /// Resolves once the surface can be used.
    fn ready(&self) -> LocalBoxFuture<'static, StagecraftResult<()>>;

    /// Off-screen extraction of the current frame, if the host has one.
    fn extract_frame(&mut self) -> Option<StagecraftResult<FrameRgba>> {
        None
    }

    /// Read back the on-screen canvas.
    fn read_canvas(&mut self) -> StagecraftResult<FrameRgba>;
}
