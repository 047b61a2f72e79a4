//! Owned copy of a rectangular sub-region of a raster buffer

use crate::math::Rect;

use super::buffer::{CHANNELS, Pixel};

/// A sub-rectangle of texels copied out of a [`RasterBuffer`](super::RasterBuffer).
///
/// Local coordinates start at the window origin; `rect()` remembers where the
/// window came from so it can be written back at the same offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterWindow {
    rect: Rect,
    data: Vec<u8>,
}

impl RasterWindow {
    /// Create a transparent window covering `rect`.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            data: vec![0; rect.area() * CHANNELS],
        }
    }

    /// Buffer-space rect this window covers
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn width(&self) -> u32 {
        self.rect.width()
    }

    pub fn height(&self) -> u32 {
        self.rect.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width() && y < self.height(), "window texel ({x}, {y}) out of range");
        (y as usize * self.width() as usize + x as usize) * CHANNELS
    }

    /// Read a texel by local coordinates
    pub fn get(&self, x: u32, y: u32) -> Pixel {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Write a texel by local coordinates
    pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) {
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&pixel);
    }

    /// Buffer-space coordinates of a local texel
    pub fn to_buffer(&self, x: u32, y: u32) -> (i64, i64) {
        (self.rect.min_x + x as i64, self.rect.min_y + y as i64)
    }
}
