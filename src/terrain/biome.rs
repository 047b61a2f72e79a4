//! Biome profiles: noise shaping, material thresholds and texture bindings.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

use super::shaping::ShapingCurve;

/// Biome identifier, e.g. `"GREEN_HILLS"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiomeId(Cow<'static, str>);

impl BiomeId {
    pub const GREEN_HILLS: Self = Self(Cow::Borrowed("GREEN_HILLS"));
    pub const DESERT: Self = Self(Cow::Borrowed("DESERT"));
    pub const CAVE: Self = Self(Cow::Borrowed("CAVE"));
    pub const SWAMP: Self = Self(Cow::Borrowed("SWAMP"));

    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BiomeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One of the four materials a biome paints with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureBinding {
    /// Name of the material texture in the renderer's library
    pub material_name: String,
    /// How many times the texture repeats across the terrain
    #[serde(default = "default_tile_factor")]
    pub tile_factor: f64,
}

impl TextureBinding {
    pub fn new(material_name: impl Into<String>, tile_factor: f64) -> Self {
        Self {
            material_name: material_name.into(),
            tile_factor,
        }
    }
}

fn default_tile_factor() -> f64 {
    1.0
}

fn default_height_scale() -> f64 {
    1.0
}

fn default_noise_sampling() -> u32 {
    1
}

fn default_mix_jitter() -> f64 {
    0.05
}

/// Immutable configuration for one terrain style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeProfile {
    pub id: BiomeId,
    /// Noise frequency: texel coordinates are multiplied by this before sampling
    pub noise_scale: f64,
    /// Lowest normalized height any texel may hold
    pub min_level: f64,
    /// Vertical exaggeration applied to the mesh
    #[serde(default = "default_height_scale")]
    pub height_scale: f64,
    /// Decimation stride: noise is sampled once per `n x n` texel block
    #[serde(default = "default_noise_sampling")]
    pub noise_sampling: u32,
    /// Ascending thresholds splitting heights into four material categories
    pub levels: [f64; 3],
    /// Amplitude of the noise term added to heights before full-field classification
    #[serde(default = "default_mix_jitter")]
    pub mix_jitter_amount: f64,
    pub shaping: ShapingCurve,
    pub textures: [TextureBinding; 4],
}

impl BiomeProfile {
    /// Check the invariants generation and classification rely on.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::InvalidProfile {
            id: self.id.to_string(),
            reason,
        };

        if !(self.noise_scale.is_finite() && self.noise_scale > 0.0) {
            return Err(invalid(format!("noise_scale must be positive, got {}", self.noise_scale)));
        }
        if !(0.0..=1.0).contains(&self.min_level) {
            return Err(invalid(format!("min_level must be in [0, 1], got {}", self.min_level)));
        }
        if !(self.height_scale.is_finite() && self.height_scale > 0.0) {
            return Err(invalid(format!("height_scale must be positive, got {}", self.height_scale)));
        }
        if self.noise_sampling == 0 {
            return Err(invalid("noise_sampling must be at least 1".into()));
        }
        let [t0, t1, t2] = self.levels;
        if !(t0 <= t1 && t1 <= t2) || self.levels.iter().any(|l| !l.is_finite()) {
            return Err(invalid(format!("levels must be ascending, got {:?}", self.levels)));
        }
        if !self.mix_jitter_amount.is_finite() || self.mix_jitter_amount < 0.0 {
            return Err(invalid(format!(
                "mix_jitter_amount must be non-negative, got {}",
                self.mix_jitter_amount
            )));
        }
        if let Some(binding) = self.textures.iter().find(|t| !(t.tile_factor.is_finite() && t.tile_factor > 0.0)) {
            return Err(invalid(format!(
                "texture '{}' has non-positive tile factor {}",
                binding.material_name, binding.tile_factor
            )));
        }
        Ok(())
    }

    /// Built-in rolling grassland
    pub fn green_hills() -> Self {
        Self {
            id: BiomeId::GREEN_HILLS,
            noise_scale: 0.007,
            min_level: 0.0,
            height_scale: 2.0,
            noise_sampling: 1,
            levels: [0.25, 0.7, 0.9],
            mix_jitter_amount: 0.2,
            shaping: ShapingCurve::Hills { threshold: 0.5, divisor: 5.0 },
            textures: [
                TextureBinding::new("sand", 1.0),
                TextureBinding::new("grass", 1.0),
                TextureBinding::new("dirt", 1.0),
                TextureBinding::new("rocks", 1.0),
            ],
        }
    }

    /// Built-in desert with mesa cliffs
    pub fn desert() -> Self {
        Self {
            id: BiomeId::DESERT,
            noise_scale: 0.007,
            min_level: 0.0,
            height_scale: 1.25,
            noise_sampling: 1,
            levels: [0.25, 0.4, 0.55],
            mix_jitter_amount: 0.2,
            shaping: ShapingCurve::Cliffs { threshold: 0.55, shift: 0.6, ceiling_jitter: 0.1 },
            textures: [
                TextureBinding::new("dry_ground", 25.0),
                TextureBinding::new("desert_sand", 50.0),
                TextureBinding::new("sand", 25.0),
                TextureBinding::new("mesa", 25.0),
            ],
        }
    }

    /// Built-in cave floor, coarsely sampled
    pub fn cave() -> Self {
        Self {
            id: BiomeId::CAVE,
            noise_scale: 0.02,
            min_level: 0.1,
            height_scale: 2.0,
            noise_sampling: 2,
            levels: [0.3, 0.6, 0.7],
            mix_jitter_amount: 0.2,
            shaping: ShapingCurve::Caverns { offset: 0.9, threshold: 0.65, gain: 1.25 },
            textures: [
                TextureBinding::new("cave_floor", 25.0),
                TextureBinding::new("cave_rock", 50.0),
                TextureBinding::new("cave_rock", 25.0),
                TextureBinding::new("cave_ceiling", 25.0),
            ],
        }
    }

    /// Built-in swamp lowland
    pub fn swamp() -> Self {
        Self {
            id: BiomeId::SWAMP,
            noise_scale: 0.006,
            min_level: 0.0,
            height_scale: 1.25,
            noise_sampling: 1,
            levels: [0.25, 0.6, 0.75],
            mix_jitter_amount: 0.2,
            shaping: ShapingCurve::Sine { offset: 1.0 },
            textures: [
                TextureBinding::new("swamp", 25.0),
                TextureBinding::new("mossy_grass", 50.0),
                TextureBinding::new("mossy_grass", 25.0),
                TextureBinding::new("moss", 25.0),
            ],
        }
    }
}

/// Read-only set of biome profiles, looked up by id.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeTable {
    profiles: Vec<BiomeProfile>,
}

impl BiomeTable {
    /// The four reference biomes
    pub fn builtin() -> Self {
        Self {
            profiles: vec![
                BiomeProfile::green_hills(),
                BiomeProfile::desert(),
                BiomeProfile::cave(),
                BiomeProfile::swamp(),
            ],
        }
    }

    /// Build a table, validating every profile and rejecting duplicate ids.
    pub fn new(profiles: Vec<BiomeProfile>) -> Result<Self> {
        if profiles.is_empty() {
            return Err(Error::Config("biome table is empty".into()));
        }
        let mut seen = HashSet::new();
        for profile in &profiles {
            profile.validate()?;
            if !seen.insert(profile.id.clone()) {
                return Err(Error::InvalidProfile {
                    id: profile.id.to_string(),
                    reason: "duplicate biome id".into(),
                });
            }
        }
        Ok(Self { profiles })
    }

    /// Parse a JSON array of profiles
    pub fn from_json(json: &str) -> Result<Self> {
        let profiles: Vec<BiomeProfile> = serde_json::from_str(json)?;
        Self::new(profiles)
    }

    /// Load a JSON biome table from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let table = Self::from_json(&json)?;
        log::info!("Loaded {} biome profiles from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.profiles)?)
    }

    /// Look up a profile
    pub fn get(&self, id: &BiomeId) -> Result<&BiomeProfile> {
        self.profiles
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| Error::UnknownBiome(id.to_string()))
    }

    pub fn contains(&self, id: &BiomeId) -> bool {
        self.profiles.iter().any(|p| &p.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &BiomeId> {
        self.profiles.iter().map(|p| &p.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BiomeProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for BiomeTable {
    fn default() -> Self {
        Self::builtin()
    }
}
