//! Terrapaint - procedural terrain synthesis with material mix-maps and
//! real-time brush editing

pub mod core;
pub mod math;
pub mod raster;
pub mod terrain;
pub mod brush;
pub mod sync;
pub mod render;
pub mod editor;
