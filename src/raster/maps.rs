//! Typed heightfield and mix-map wrappers over [`RasterBuffer`].

use crate::core::Result;
use crate::terrain::classifier::MixCategory;

use super::buffer::{Pixel, RasterBuffer};

/// Convert a normalized height to a grayscale byte, rounding to nearest.
pub fn height_to_byte(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Smallest byte whose normalized height is not below `min_level`.
pub fn min_level_byte(min_level: f64) -> u8 {
    (min_level * 255.0).ceil().clamp(0.0, 255.0) as u8
}

/// Grayscale heightfield: every texel is `[v, v, v, 255]`, height `v / 255`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heightfield {
    raster: RasterBuffer,
}

impl Heightfield {
    /// Flat heightfield at height 0
    pub fn new(width: u32, height: u32) -> Self {
        Self::flat(width, height, 0)
    }

    /// Heightfield with every texel at `value`
    pub fn flat(width: u32, height: u32, value: u8) -> Self {
        Self {
            raster: RasterBuffer::filled(width, height, gray(value)),
        }
    }

    /// Adopt a raster as-is. Channel 0 is read as the height.
    pub fn from_raster(raster: RasterBuffer) -> Self {
        Self { raster }
    }

    /// Import decoded RGBA8 pixels, reducing each texel to grayscale with the
    /// given RGB weights and raising it to at least `min_byte`.
    pub fn from_rgba_weighted(
        width: u32,
        height: u32,
        data: Vec<u8>,
        weights: [f32; 3],
        min_byte: u8,
    ) -> Result<Self> {
        let mut raster = RasterBuffer::from_rgba(width, height, data)?;
        for (x, y) in raster.bounds().texels() {
            let [r, g, b, _] = raster.get_pixel(x, y);
            let luma = r as f32 * weights[0] + g as f32 * weights[1] + b as f32 * weights[2];
            let value = (luma.round().clamp(0.0, 255.0) as u8).max(min_byte);
            raster.set_pixel(x, y, gray(value));
        }
        Ok(Self { raster })
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Height byte at a texel (wrapped)
    pub fn get(&self, x: i64, y: i64) -> u8 {
        self.raster.get_pixel(x, y)[0]
    }

    /// Normalized height in [0, 1] at a texel (wrapped)
    pub fn normalized(&self, x: i64, y: i64) -> f64 {
        self.get(x, y) as f64 / 255.0
    }

    /// Set height byte at a texel (wrapped)
    pub fn set(&mut self, x: i64, y: i64, value: u8) {
        self.raster.set_pixel(x, y, gray(value));
    }

    /// Set every texel to `value`
    pub fn fill(&mut self, value: u8) {
        self.raster.fill(gray(value));
    }

    /// Lowest and highest height byte, `None` if empty
    pub fn range(&self) -> Option<(u8, u8)> {
        self.raster.pixels().map(|p| p[0]).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    pub fn raster_mut(&mut self) -> &mut RasterBuffer {
        &mut self.raster
    }

    pub fn into_raster(self) -> RasterBuffer {
        self.raster
    }

    /// RGBA8 bytes for the mesh collaborator
    pub fn as_bytes(&self) -> &[u8] {
        self.raster.as_bytes()
    }
}

/// Grayscale texel for a height byte
pub fn gray(value: u8) -> Pixel {
    [value, value, value, 255]
}

/// Material selector map: every texel holds one [`MixCategory`] color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MixMap {
    raster: RasterBuffer,
}

impl MixMap {
    /// Mix-map with every texel in the fallback (transparent) category
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            raster: RasterBuffer::new(width, height),
        }
    }

    pub fn from_raster(raster: RasterBuffer) -> Self {
        Self { raster }
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Category at a texel (wrapped). Texels that are not an exact category
    /// color (e.g. after an external blur) read as `None`.
    pub fn category(&self, x: i64, y: i64) -> Option<MixCategory> {
        MixCategory::from_pixel(self.raster.get_pixel(x, y))
    }

    pub fn set_category(&mut self, x: i64, y: i64, category: MixCategory) {
        self.raster.set_pixel(x, y, category.color());
    }

    /// Texel count per category, indexed by [`MixCategory::index`]
    pub fn histogram(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for category in self.raster.pixels().filter_map(MixCategory::from_pixel) {
            counts[category.index()] += 1;
        }
        counts
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    pub fn raster_mut(&mut self) -> &mut RasterBuffer {
        &mut self.raster
    }

    pub fn into_raster(self) -> RasterBuffer {
        self.raster
    }

    /// RGBA8 bytes for the material collaborator
    pub fn as_bytes(&self) -> &[u8] {
        self.raster.as_bytes()
    }
}
