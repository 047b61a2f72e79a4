//! CPU renderer that keeps a ground mesh and blend material in memory.

use crate::raster::RasterBuffer;
use crate::sync::{MaterialUpdate, MeshUpdate, SurfaceStatus, TerrainRenderer};
use crate::terrain::biome::TextureBinding;

use super::ground::{GroundMesh, GroundMeshOptions};
use super::material::{BlendMaterial, MaterialLibrary, bake_diffuse};
use crate::core::Result;

/// [`TerrainRenderer`] without a GPU.
///
/// Surfaces must be attached before refreshes take effect; until then every
/// refresh reports [`SurfaceStatus::Missing`].
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    library: MaterialLibrary,
    ground: Option<GroundMesh>,
    material: Option<BlendMaterial>,
    mesh_refreshes: u64,
    material_refreshes: u64,
}

impl HeadlessRenderer {
    pub fn new(library: MaterialLibrary) -> Self {
        Self {
            library,
            ..Default::default()
        }
    }

    /// Create the flat ground mesh
    pub fn attach_ground(&mut self, options: GroundMeshOptions) -> Result<()> {
        let mesh = GroundMesh::flat(options)?;
        log::info!(
            "Attached ground mesh: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        self.ground = Some(mesh);
        Ok(())
    }

    /// Create the blend material for an initial set of bindings
    pub fn attach_material(&mut self, bindings: &[TextureBinding; 4]) {
        self.material = Some(BlendMaterial::from_bindings(bindings, &self.library));
    }

    /// Drop both surfaces, as on scene teardown
    pub fn detach(&mut self) {
        self.ground = None;
        self.material = None;
    }

    pub fn ground(&self) -> Option<&GroundMesh> {
        self.ground.as_ref()
    }

    pub fn material(&self) -> Option<&BlendMaterial> {
        self.material.as_ref()
    }

    pub fn library(&self) -> &MaterialLibrary {
        &self.library
    }

    pub fn mesh_refreshes(&self) -> u64 {
        self.mesh_refreshes
    }

    pub fn material_refreshes(&self) -> u64 {
        self.material_refreshes
    }

    /// Diffuse color raster of the current material, if one is bound
    pub fn bake_diffuse(&self) -> Option<RasterBuffer> {
        let material = self.material.as_ref()?;
        Some(bake_diffuse(material.mix_texture()?, material))
    }
}

impl TerrainRenderer for HeadlessRenderer {
    fn refresh_mesh(&mut self, update: &MeshUpdate<'_>) -> SurfaceStatus {
        let Some(ground) = self.ground.as_mut() else {
            return SurfaceStatus::Missing;
        };
        match ground.apply_heights(update.height_buffer, update.width, update.height, update.vertical_scale) {
            Ok(()) => {
                self.mesh_refreshes += 1;
                SurfaceStatus::Refreshed
            }
            Err(e) => {
                log::warn!("Ground mesh refresh skipped: {}", e);
                SurfaceStatus::Missing
            }
        }
    }

    fn refresh_material(&mut self, update: &MaterialUpdate<'_>) -> SurfaceStatus {
        let Some(material) = self.material.as_mut() else {
            return SurfaceStatus::Missing;
        };
        if !material.uses_bindings(update.textures) {
            log::info!(
                "Rebinding terrain material: {}",
                update.textures.iter().map(|t| t.material_name.as_str()).collect::<Vec<_>>().join(", ")
            );
            *material = BlendMaterial::from_bindings(update.textures, &self.library);
        }
        // A fresh material has no mix texture yet and takes the whole buffer
        let dirty = material.mix_texture().and(update.dirty);
        match material.set_mix_texture(update.width, update.height, update.mix_buffer, dirty) {
            Ok(()) => {
                self.material_refreshes += 1;
                SurfaceStatus::Refreshed
            }
            Err(e) => {
                log::warn!("Material refresh skipped: {}", e);
                SurfaceStatus::Missing
            }
        }
    }
}
