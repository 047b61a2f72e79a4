//! RGBA8 raster buffer

use crate::core::{Error, Result};
use crate::math::Rect;

use super::window::RasterWindow;

/// Bytes per texel (R, G, B, A)
pub const CHANNELS: usize = 4;

/// One RGBA8 texel
pub type Pixel = [u8; 4];

/// Width x height grid of RGBA8 texels, row-major, top row first.
///
/// Single-texel accessors follow a wrap-around policy: the byte index
/// `(y * width + x) * 4` is reduced modulo the buffer length, so coordinates
/// off the canvas land on some texel instead of failing. Rectangular window
/// reads and writes clip to the buffer bounds instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Create a buffer of transparent black texels.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Create a buffer with every texel set to `pixel`.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        let texels = width as usize * height as usize;
        let mut data = Vec::with_capacity(texels * CHANNELS);
        for _ in 0..texels {
            data.extend_from_slice(&pixel);
        }
        Self { width, height, data }
    }

    /// Wrap an existing RGBA8 byte buffer. The length must match the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(Error::BufferSize { expected, actual: data.len() });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of texels
    pub fn texel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Rect covering the whole buffer
    pub fn bounds(&self) -> Rect {
        Rect::full(self.width, self.height)
    }

    /// Raw RGBA8 bytes, row-major, top to bottom.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Iterate texels row by row
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|c| [c[0], c[1], c[2], c[3]])
    }

    /// Byte offset of a texel after wrap-around. `None` for an empty buffer.
    fn wrapped_index(&self, x: i64, y: i64) -> Option<usize> {
        if self.data.is_empty() {
            return None;
        }
        let raw = (y * self.width as i64 + x) * CHANNELS as i64;
        Some(raw.rem_euclid(self.data.len() as i64) as usize)
    }

    /// Read a texel with wrap-around. An empty buffer reads as transparent black.
    pub fn get_pixel(&self, x: i64, y: i64) -> Pixel {
        match self.wrapped_index(x, y) {
            Some(i) => [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]],
            None => [0; CHANNELS],
        }
    }

    /// Write a texel with wrap-around. No-op on an empty buffer.
    pub fn set_pixel(&mut self, x: i64, y: i64, pixel: Pixel) {
        if let Some(i) = self.wrapped_index(x, y) {
            self.data[i..i + CHANNELS].copy_from_slice(&pixel);
        }
    }

    /// Bounds-checked texel read.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.get_pixel(x as i64, y as i64))
    }

    /// Overwrite every texel
    pub fn fill(&mut self, pixel: Pixel) {
        for texel in self.data.chunks_exact_mut(CHANNELS) {
            texel.copy_from_slice(&pixel);
        }
    }

    /// Copy the texels of `rect` (clipped to the buffer) into a window.
    ///
    /// One allocation per call, proportional to the clipped area.
    pub fn read_window(&self, rect: Rect) -> RasterWindow {
        let clipped = rect.clipped(self.width, self.height);
        let mut window = RasterWindow::new(clipped);
        if clipped.is_empty() {
            return window;
        }

        let row_bytes = clipped.width() as usize * CHANNELS;
        for (row, y) in (clipped.min_y..clipped.max_y).enumerate() {
            let src = self.row_offset(clipped.min_x, y);
            let dst = row * row_bytes;
            window.bytes_mut()[dst..dst + row_bytes]
                .copy_from_slice(&self.data[src..src + row_bytes]);
        }
        window
    }

    /// Write a window back at its original offset. Parts of the window that
    /// fall outside the buffer are dropped.
    pub fn write_window(&mut self, window: &RasterWindow) {
        let target = window.rect().clipped(self.width, self.height);
        if target.is_empty() {
            return;
        }

        let src_row_bytes = window.width() as usize * CHANNELS;
        let copy_bytes = target.width() as usize * CHANNELS;
        let skip_x = (target.min_x - window.rect().min_x) as usize * CHANNELS;
        for y in target.min_y..target.max_y {
            let src = (y - window.rect().min_y) as usize * src_row_bytes + skip_x;
            let dst = self.row_offset(target.min_x, y);
            self.data[dst..dst + copy_bytes]
                .copy_from_slice(&window.as_bytes()[src..src + copy_bytes]);
        }
    }

    /// Byte offset of an in-bounds texel
    fn row_offset(&self, x: i64, y: i64) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent() {
        let buffer = RasterBuffer::new(3, 2);
        assert_eq!(buffer.texel_count(), 6);
        assert_eq!(buffer.as_bytes().len(), 24);
        assert!(buffer.pixels().all(|p| p == [0, 0, 0, 0]));
    }

    #[test]
    fn test_set_get_pixel() {
        let mut buffer = RasterBuffer::new(4, 4);
        buffer.set_pixel(1, 2, [10, 20, 30, 40]);
        assert_eq!(buffer.get_pixel(1, 2), [10, 20, 30, 40]);
        assert_eq!(buffer.pixel(1, 2), Some([10, 20, 30, 40]));
        // Index layout is (y * width + x) * 4
        assert_eq!(&buffer.as_bytes()[36..40], &[10, 20, 30, 40]);
    }

    #[test]
    fn test_wrap_around() {
        let mut buffer = RasterBuffer::new(4, 4);
        // x = 4 on row 0 is texel 0 of row 1
        buffer.set_pixel(4, 0, [1, 1, 1, 1]);
        assert_eq!(buffer.get_pixel(0, 1), [1, 1, 1, 1]);

        // Past the end wraps to the start
        buffer.set_pixel(0, 4, [2, 2, 2, 2]);
        assert_eq!(buffer.get_pixel(0, 0), [2, 2, 2, 2]);

        // Negative coordinates wrap from the end
        buffer.set_pixel(-1, 0, [3, 3, 3, 3]);
        assert_eq!(buffer.get_pixel(3, 3), [3, 3, 3, 3]);
    }

    #[test]
    fn test_bounds_checked_pixel() {
        let buffer = RasterBuffer::new(4, 4);
        assert!(buffer.pixel(4, 0).is_none());
        assert!(buffer.pixel(0, 4).is_none());
    }

    #[test]
    fn test_empty_buffer_is_inert() {
        let mut buffer = RasterBuffer::new(0, 0);
        buffer.set_pixel(3, 3, [9, 9, 9, 9]);
        assert_eq!(buffer.get_pixel(3, 3), [0, 0, 0, 0]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_from_rgba_size_mismatch() {
        let err = RasterBuffer::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, Error::BufferSize { expected: 16, actual: 15 }));
    }

    #[test]
    fn test_byte_export_import_preserves_pixels() {
        let mut buffer = RasterBuffer::new(5, 3);
        for (i, (x, y)) in buffer.bounds().texels().enumerate() {
            let v = (i * 13) as u8;
            buffer.set_pixel(x, y, [v, v.wrapping_add(1), v.wrapping_add(2), 255 - v]);
        }

        let bytes = buffer.as_bytes().to_vec();
        let restored = RasterBuffer::from_rgba(buffer.width(), buffer.height(), bytes).unwrap();
        assert_eq!(restored.width(), 5);
        assert_eq!(restored.height(), 3);
        assert_eq!(restored, buffer);
    }

    #[test]
    fn test_window_roundtrip_touches_only_window() {
        let mut buffer = RasterBuffer::filled(8, 8, [5, 5, 5, 255]);
        let mut window = buffer.read_window(Rect::new(2, 3, 5, 6));
        assert_eq!(window.width(), 3);
        assert_eq!(window.height(), 3);

        window.set(0, 0, [9, 9, 9, 255]);
        window.set(2, 2, [7, 7, 7, 255]);
        buffer.write_window(&window);

        assert_eq!(buffer.get_pixel(2, 3), [9, 9, 9, 255]);
        assert_eq!(buffer.get_pixel(4, 5), [7, 7, 7, 255]);
        assert_eq!(buffer.get_pixel(1, 3), [5, 5, 5, 255]);
        assert_eq!(buffer.get_pixel(5, 5), [5, 5, 5, 255]);
    }

    #[test]
    fn test_window_clips_to_bounds() {
        let buffer = RasterBuffer::filled(4, 4, [1, 2, 3, 4]);
        let window = buffer.read_window(Rect::new(-2, -2, 2, 2));
        assert_eq!(window.rect(), Rect::new(0, 0, 2, 2));
        assert_eq!(window.get(1, 1), [1, 2, 3, 4]);

        let empty = buffer.read_window(Rect::new(10, 10, 12, 12));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_write_window_drops_outside_part() {
        let mut buffer = RasterBuffer::new(4, 4);
        let mut window = RasterWindow::new(Rect::new(2, 2, 6, 6));
        for (x, y) in Rect::new(0, 0, 4, 4).texels() {
            window.set(x as u32, y as u32, [8, 8, 8, 8]);
        }
        buffer.write_window(&window);

        assert_eq!(buffer.get_pixel(3, 3), [8, 8, 8, 8]);
        assert_eq!(buffer.get_pixel(1, 1), [0, 0, 0, 0]);
        assert_eq!(buffer.pixels().filter(|p| *p == [8, 8, 8, 8]).count(), 4);
    }
}
