//! Procedural terrain: biome profiles, noise synthesis and mix-map
//! classification.

pub mod biome;
pub use biome::{BiomeId, BiomeProfile, BiomeTable, TextureBinding};

pub mod shaping;
pub use shaping::ShapingCurve;

pub mod noise_field;
pub use noise_field::NoiseField;

pub mod classifier;
pub use classifier::{MixCategory, classify, classify_jittered};
