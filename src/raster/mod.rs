//! Raster buffers: RGBA8 texel grids with wrapped single-texel access and
//! clipped rectangular windows.
//!
//! The heightfield and the mix-map are both raster buffers of identical size,
//! exported to the renderer as raw RGBA8 bytes.

pub mod buffer;
pub mod window;
pub mod maps;

pub use buffer::{CHANNELS, Pixel, RasterBuffer};
pub use window::RasterWindow;
pub use maps::{Heightfield, MixMap, gray, height_to_byte, min_level_byte};
