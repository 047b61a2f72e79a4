//! Height-to-material classification (mix-map generation)

use std::time::Instant;

use super::biome::BiomeProfile;
use super::noise_field::NoiseField;
use crate::math::Rect;
use crate::raster::{Heightfield, MixMap, Pixel};

/// One of the four material slots a mix-map texel selects.
///
/// Each category is stored as a fixed color: the blend material reads the
/// red, green and blue channels as weights for the first three materials and
/// transparency as the weight of the fourth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MixCategory {
    Red,
    Green,
    Blue,
    Clear,
}

impl MixCategory {
    pub const ALL: [MixCategory; 4] = [
        MixCategory::Red,
        MixCategory::Green,
        MixCategory::Blue,
        MixCategory::Clear,
    ];

    /// Category for a normalized height given ascending `levels`.
    ///
    /// `h <= t0` is Red, `h <= t1` Green, `h <= t2` Blue, anything higher Clear.
    pub fn from_height(height: f64, levels: &[f64; 3]) -> Self {
        if height <= levels[0] {
            MixCategory::Red
        } else if height <= levels[1] {
            MixCategory::Green
        } else if height <= levels[2] {
            MixCategory::Blue
        } else {
            MixCategory::Clear
        }
    }

    /// Texture slot index (0-3)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Mix-map texel color
    pub fn color(self) -> Pixel {
        match self {
            MixCategory::Red => [255, 0, 0, 255],
            MixCategory::Green => [0, 255, 0, 255],
            MixCategory::Blue => [0, 0, 255, 255],
            MixCategory::Clear => [0, 0, 0, 0],
        }
    }

    /// Exact inverse of [`color`](Self::color)
    pub fn from_pixel(pixel: Pixel) -> Option<Self> {
        MixCategory::ALL.into_iter().find(|c| c.color() == pixel)
    }
}

/// Classify the texels of `region` (the whole map if `None`) without jitter.
///
/// The region is clipped to the bounds both maps share.
pub fn classify(
    heightfield: &Heightfield,
    mixmap: &mut MixMap,
    profile: &BiomeProfile,
    region: Option<Rect>,
) {
    let bounds = shared_bounds(heightfield, mixmap);
    let region = region.map_or(bounds, |r| r.intersection(&bounds));

    for (x, y) in region.texels() {
        let category = MixCategory::from_height(heightfield.normalized(x, y), &profile.levels);
        mixmap.set_category(x, y, category);
    }
}

/// Full-field classification with the profile's jitter term added to every
/// height, softening category boundaries.
///
/// The jitter comes from `noise`, so the same field seed reproduces the same
/// boundaries.
pub fn classify_jittered(
    heightfield: &Heightfield,
    mixmap: &mut MixMap,
    profile: &BiomeProfile,
    noise: &NoiseField,
) {
    let start = Instant::now();
    let bounds = shared_bounds(heightfield, mixmap);

    for (x, y) in bounds.texels() {
        let height = heightfield.normalized(x, y) + noise.jitter(x, y) * profile.mix_jitter_amount;
        mixmap.set_category(x, y, MixCategory::from_height(height, &profile.levels));
    }

    log::info!(
        "Classified {}x{} mix-map for {} in {:.1}ms",
        bounds.width(),
        bounds.height(),
        profile.id,
        start.elapsed().as_secs_f64() * 1000.0
    );
}

fn shared_bounds(heightfield: &Heightfield, mixmap: &MixMap) -> Rect {
    Rect::full(
        heightfield.width().min(mixmap.width()),
        heightfield.height().min(mixmap.height()),
    )
}
