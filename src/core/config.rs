//! Editor configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::terrain::biome::BiomeId;

/// Configuration for an editing session.
///
/// Every field has a default, so a JSON file only needs to name the values it
/// overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Heightfield / mix-map resolution in texels (width, height).
    pub resolution: [u32; 2],
    /// Edge length of the ground mesh in world units.
    pub map_size: f32,
    /// Ground mesh subdivisions per side.
    pub subdivisions: u32,
    /// Mesh height for a white texel before the biome's height scale is applied.
    pub base_max_height: f32,
    /// RGB weights used to turn a buffer texel into a height.
    pub color_filter: [f32; 3],
    /// Texels with alpha below this are left at the mesh's minimum height.
    pub alpha_filter: f32,
    /// Biome selected when the editor starts.
    pub initial_biome: BiomeId,
    /// Fixed noise seed. `None` draws a fresh seed for every generation.
    pub seed: Option<u32>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            resolution: [512, 512],
            map_size: 20.0,
            subdivisions: 256,
            base_max_height: 2.0,
            color_filter: [0.3, 0.59, 0.11],
            alpha_filter: 0.0,
            initial_biome: BiomeId::GREEN_HILLS,
            seed: None,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Reject configurations the editor cannot run with.
    pub fn validate(&self) -> Result<()> {
        let [width, height] = self.resolution;
        if width == 0 || height == 0 {
            return Err(Error::Dimensions { width, height });
        }
        if self.subdivisions == 0 {
            return Err(Error::Config("subdivisions must be at least 1".into()));
        }
        if !(self.map_size.is_finite() && self.map_size > 0.0) {
            return Err(Error::Config(format!("map_size must be positive, got {}", self.map_size)));
        }
        if !(self.base_max_height.is_finite() && self.base_max_height > 0.0) {
            return Err(Error::Config(format!(
                "base_max_height must be positive, got {}",
                self.base_max_height
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.resolution[0]
    }

    pub fn height(&self) -> u32 {
        self.resolution[1]
    }
}
