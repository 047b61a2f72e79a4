//! Keeping the renderer in step with the terrain buffers.

pub mod invalidator;
pub mod bridge;

pub use invalidator::DirtyRegion;
pub use bridge::{MaterialUpdate, MeshUpdate, SurfaceStatus, TerrainRenderer, TerrainSyncBridge};
