//! Brush editing of the heightfield and mix-map
//!
//! A brush step rewrites a circular region of the heightfield and mirrors the
//! edit into the mix-map, touching only the disk's bounding window.

pub mod stroke;
pub mod engine;

// Re-exports
pub use stroke::{BrushState, FillMode};
pub use engine::{StrokeOutcome, apply_stroke};
