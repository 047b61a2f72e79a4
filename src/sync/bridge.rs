//! Hand-off of terrain buffers to an external renderer.
//!
//! The renderer owns the mesh and material. This side only knows the narrow
//! contract: "rebuild the mesh from this height buffer" and "rebind this mix
//! texture", both fed with the full row-major RGBA8 byte buffers.

use crate::brush::StrokeOutcome;
use crate::math::Rect;
use crate::raster::{Heightfield, MixMap};
use crate::terrain::biome::{BiomeProfile, TextureBinding};

use super::invalidator::DirtyRegion;

/// Result of a refresh request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceStatus {
    /// The surface was rebuilt from the buffer
    Refreshed,
    /// The surface does not exist yet - nothing was done
    Missing,
}

/// Mesh refresh request.
#[derive(Clone, Copy, Debug)]
pub struct MeshUpdate<'a> {
    /// Full heightfield, RGBA8 row-major
    pub height_buffer: &'a [u8],
    pub width: u32,
    pub height: u32,
    /// World height of a 255 texel (`base_max_height * height_scale`)
    pub vertical_scale: f32,
    /// Texels changed since the last refresh; `None` means everything
    pub dirty: Option<Rect>,
}

/// Material refresh request.
#[derive(Clone, Copy, Debug)]
pub struct MaterialUpdate<'a> {
    /// Full mix-map, RGBA8 row-major
    pub mix_buffer: &'a [u8],
    pub width: u32,
    pub height: u32,
    /// Diffuse layers for the four mix categories
    pub textures: &'a [TextureBinding; 4],
    /// Texels changed since the last refresh; `None` means everything
    pub dirty: Option<Rect>,
}

/// Trait for a renderer consuming terrain buffers.
///
/// Implementations return [`SurfaceStatus::Missing`] while their mesh or
/// material has not been created; callers treat that as a silent no-op.
pub trait TerrainRenderer {
    /// Rebuild mesh vertex heights, one sample per vertex, scaled by
    /// `vertical_scale`.
    fn refresh_mesh(&mut self, update: &MeshUpdate<'_>) -> SurfaceStatus;

    /// Rebind the mix texture and the four diffuse layers.
    fn refresh_material(&mut self, update: &MaterialUpdate<'_>) -> SurfaceStatus;
}

/// Accumulates dirty state from edits and pushes both buffers to a
/// [`TerrainRenderer`] on flush.
#[derive(Debug)]
pub struct TerrainSyncBridge {
    dirty: DirtyRegion,
    base_max_height: f32,
}

impl TerrainSyncBridge {
    pub fn new(base_max_height: f32) -> Self {
        Self {
            dirty: DirtyRegion::new(),
            base_max_height,
        }
    }

    /// Record the rect a brush step touched
    pub fn mark_stroke(&mut self, outcome: &StrokeOutcome) {
        self.dirty.mark(outcome.touched);
    }

    /// Record a whole-field change (regeneration, clear, import)
    pub fn mark_full(&mut self) {
        self.dirty.mark_full();
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.has_dirty()
    }

    pub fn generation(&self) -> u64 {
        self.dirty.generation()
    }

    /// Mesh height of a 255 texel for `profile`
    pub fn vertical_scale(&self, profile: &BiomeProfile) -> f32 {
        self.base_max_height * profile.height_scale as f32
    }

    /// Push pending changes to `renderer`.
    ///
    /// Returns true once both surfaces are in sync with the buffers. When a
    /// surface is missing the dirty state is kept for the next flush.
    pub fn flush(
        &mut self,
        heightfield: &Heightfield,
        mixmap: &MixMap,
        profile: &BiomeProfile,
        renderer: &mut dyn TerrainRenderer,
    ) -> bool {
        if !self.dirty.has_dirty() {
            return true;
        }
        let hint = self.dirty.hint();

        let mesh = renderer.refresh_mesh(&MeshUpdate {
            height_buffer: heightfield.as_bytes(),
            width: heightfield.width(),
            height: heightfield.height(),
            vertical_scale: self.vertical_scale(profile),
            dirty: hint,
        });
        let material = renderer.refresh_material(&MaterialUpdate {
            mix_buffer: mixmap.as_bytes(),
            width: mixmap.width(),
            height: mixmap.height(),
            textures: &profile.textures,
            dirty: hint,
        });

        let synced = mesh == SurfaceStatus::Refreshed && material == SurfaceStatus::Refreshed;
        log::debug!(
            "Flush gen {} ({}): mesh {:?}, material {:?}",
            self.dirty.generation(),
            hint.map_or_else(|| "full".to_string(), |r| format!("{}x{} rect", r.width(), r.height())),
            mesh,
            material
        );
        if synced {
            self.dirty.clear();
        }
        synced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        mesh_ready: bool,
        material_ready: bool,
        meshes: Vec<(usize, u32, u32, f32, Option<Rect>)>,
        materials: Vec<(usize, String, Option<Rect>)>,
    }

    impl TerrainRenderer for Recorder {
        fn refresh_mesh(&mut self, update: &MeshUpdate<'_>) -> SurfaceStatus {
            if !self.mesh_ready {
                return SurfaceStatus::Missing;
            }
            self.meshes.push((
                update.height_buffer.len(),
                update.width,
                update.height,
                update.vertical_scale,
                update.dirty,
            ));
            SurfaceStatus::Refreshed
        }

        fn refresh_material(&mut self, update: &MaterialUpdate<'_>) -> SurfaceStatus {
            if !self.material_ready {
                return SurfaceStatus::Missing;
            }
            self.materials.push((
                update.mix_buffer.len(),
                update.textures[0].material_name.clone(),
                update.dirty,
            ));
            SurfaceStatus::Refreshed
        }
    }

    fn ready() -> Recorder {
        Recorder { mesh_ready: true, material_ready: true, ..Default::default() }
    }

    fn buffers() -> (Heightfield, MixMap) {
        (Heightfield::new(8, 6), MixMap::new(8, 6))
    }

    #[test]
    fn test_clean_flush_does_nothing() {
        let (heightfield, mixmap) = buffers();
        let mut bridge = TerrainSyncBridge::new(2.0);
        let mut renderer = ready();

        assert!(bridge.flush(&heightfield, &mixmap, &BiomeProfile::green_hills(), &mut renderer));
        assert!(renderer.meshes.is_empty());
        assert!(renderer.materials.is_empty());
    }

    #[test]
    fn test_full_flush_passes_buffers() {
        let (heightfield, mixmap) = buffers();
        let profile = BiomeProfile::desert();
        let mut bridge = TerrainSyncBridge::new(2.0);
        let mut renderer = ready();

        bridge.mark_full();
        assert!(bridge.flush(&heightfield, &mixmap, &profile, &mut renderer));

        assert_eq!(renderer.meshes, vec![(8 * 6 * 4, 8, 6, 2.5, None)]);
        assert_eq!(renderer.materials.len(), 1);
        assert_eq!(renderer.materials[0].1, profile.textures[0].material_name);
        assert!(!bridge.is_dirty());
    }

    #[test]
    fn test_stroke_hint_is_union() {
        let (heightfield, mixmap) = buffers();
        let mut bridge = TerrainSyncBridge::new(2.0);
        let mut renderer = ready();

        bridge.mark_stroke(&StrokeOutcome { touched: Rect::new(0, 0, 2, 2), texels: 3 });
        bridge.mark_stroke(&StrokeOutcome { touched: Rect::new(4, 1, 6, 5), texels: 5 });
        bridge.flush(&heightfield, &mixmap, &BiomeProfile::swamp(), &mut renderer);

        assert_eq!(renderer.meshes[0].4, Some(Rect::new(0, 0, 6, 5)));
        assert_eq!(renderer.materials[0].2, Some(Rect::new(0, 0, 6, 5)));
    }

    #[test]
    fn test_missing_surface_keeps_dirty() {
        let (heightfield, mixmap) = buffers();
        let profile = BiomeProfile::green_hills();
        let mut bridge = TerrainSyncBridge::new(2.0);
        let mut renderer = Recorder { mesh_ready: true, ..Default::default() };

        bridge.mark_full();
        assert!(!bridge.flush(&heightfield, &mixmap, &profile, &mut renderer));
        assert!(bridge.is_dirty());
        assert_eq!(renderer.meshes.len(), 1);

        renderer.material_ready = true;
        assert!(bridge.flush(&heightfield, &mixmap, &profile, &mut renderer));
        assert!(!bridge.is_dirty());
        assert_eq!(renderer.meshes.len(), 2);
        assert_eq!(renderer.materials.len(), 1);
    }

    #[test]
    fn test_vertical_scale_per_biome() {
        let bridge = TerrainSyncBridge::new(2.0);
        assert_eq!(bridge.vertical_scale(&BiomeProfile::green_hills()), 4.0);
        assert_eq!(bridge.vertical_scale(&BiomeProfile::swamp()), 2.5);
    }
}
