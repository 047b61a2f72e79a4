//! Noise-based heightfield synthesis

use std::time::Instant;

use noise::{NoiseFn, Simplex};

use super::biome::BiomeProfile;
use crate::raster::{Heightfield, height_to_byte, min_level_byte};

/// Share of the field width/height on each side that gets the border falloff.
const BORDER_MARGIN: f64 = 0.1;

/// Steepness of the border falloff curve.
const BORDER_STEEPNESS: f64 = 4.0;

/// Frequency of the classification jitter noise. Off the integer lattice so
/// neighbouring texels decorrelate.
const JITTER_FREQUENCY: f64 = 0.37;

/// Seeded coherent-noise field.
///
/// Build one per full-field generation and drop it afterwards: the same seed
/// reproduces the same field, a new seed produces a new terrain.
pub struct NoiseField {
    seed: u32,
    noise: Simplex,
    jitter: Simplex,
}

impl NoiseField {
    /// Create a field with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            noise: Simplex::new(seed),
            jitter: Simplex::new(seed.wrapping_add(1000)),
        }
    }

    /// Create a field with a fresh random seed
    pub fn with_random_seed() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Raw simplex value, roughly in [-1, 1]
    pub fn raw(&self, x: f64, y: f64) -> f64 {
        self.noise.get([x, y])
    }

    /// Classification jitter term in roughly [-1, 1] for a texel
    pub fn jitter(&self, x: i64, y: i64) -> f64 {
        self.jitter.get([x as f64 * JITTER_FREQUENCY, y as f64 * JITTER_FREQUENCY])
    }

    /// Normalized height of texel `(x, y)` in a `width x height` field.
    ///
    /// With decimation (`noise_sampling > 1`) every texel of an `n x n` block
    /// returns the value sampled at the block's top-left corner.
    pub fn sample(&self, x: i64, y: i64, width: u32, height: u32, profile: &BiomeProfile) -> f64 {
        let stride = profile.noise_sampling.max(1) as i64;
        let gx = x.div_euclid(stride);
        let gy = y.div_euclid(stride);
        self.evaluate((gx, gy), stride, (width, height), profile)
    }

    /// Shaped, bordered and clamped height for noise-grid cell `(gx, gy)`,
    /// with the border falloff taken at the cell's top-left texel.
    fn evaluate(&self, (gx, gy): (i64, i64), stride: i64, (width, height): (u32, u32), profile: &BiomeProfile) -> f64 {
        let (tx, ty) = (gx * stride, gy * stride);
        let raw = self.raw(gx as f64 * profile.noise_scale, gy as f64 * profile.noise_scale);
        let random = hash_unit(gx, gy, self.seed);
        let mut value = profile.shaping.apply(raw, random);
        value += border_falloff(tx as f64, width as f64);
        value += border_falloff(ty as f64, height as f64);
        value.max(profile.min_level)
    }

    /// Fill a whole heightfield for `profile`.
    ///
    /// Blocking pass over every texel. Decimated profiles evaluate noise once
    /// per block and broadcast the value.
    pub fn fill(&self, heightfield: &mut Heightfield, profile: &BiomeProfile) {
        let start = Instant::now();
        let width = heightfield.width();
        let height = heightfield.height();
        let stride = profile.noise_sampling.max(1);
        let min_byte = min_level_byte(profile.min_level);

        let cells_x = width.div_ceil(stride) as i64;
        let cells_y = height.div_ceil(stride) as i64;
        let stride = stride as i64;

        for gy in 0..cells_y {
            for gx in 0..cells_x {
                let (tx, ty) = (gx * stride, gy * stride);
                let value = self.evaluate((gx, gy), stride, (width, height), profile);
                let byte = height_to_byte(value).max(min_byte);

                let max_x = (tx + stride).min(width as i64);
                let max_y = (ty + stride).min(height as i64);
                for y in ty..max_y {
                    for x in tx..max_x {
                        heightfield.set(x, y, byte);
                    }
                }
            }
        }

        log::info!(
            "Generated {}x{} heightfield for {} (seed {}, {} shaping, stride {}) in {:.1}ms",
            width,
            height,
            profile.id,
            self.seed,
            profile.shaping.name(),
            stride,
            start.elapsed().as_secs_f64() * 1000.0
        );
    }
}

/// Height added near the field edges: `exp(-4 * ratio)` where `ratio` runs
/// from 0 at the edge to 1 at the inner end of the margin.
pub fn border_falloff(position: f64, extent: f64) -> f64 {
    let margin = extent * BORDER_MARGIN;
    if margin <= 0.0 {
        return 0.0;
    }
    if position < margin {
        let ratio = position / margin;
        (-ratio * BORDER_STEEPNESS).exp()
    } else if position > extent - margin {
        let ratio = (extent - position) / margin;
        (-ratio * BORDER_STEEPNESS).exp()
    } else {
        0.0
    }
}

/// Deterministic hash of a grid cell to [0, 1)
fn hash_unit(x: i64, y: i64, seed: u32) -> f64 {
    let mut h = seed;
    h ^= x as u32;
    h = h.wrapping_mul(0x45d9f3b);
    h ^= h >> 16;
    h ^= y as u32;
    h = h.wrapping_mul(0x45d9f3b);
    h ^= h >> 16;
    (h & 0xFFFF) as f64 / 65536.0
}
