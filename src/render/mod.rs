//! Reference renderer surfaces: ground mesh, blend material and a headless
//! [`TerrainRenderer`](crate::sync::TerrainRenderer).

pub mod ground;
pub mod material;
pub mod headless;

pub use ground::{GroundMesh, GroundMeshOptions, GroundVertex};
pub use material::{BlendMaterial, DiffuseLayer, MaterialLibrary, MaterialTexture, bake_diffuse, bake_specular};
pub use headless::HeadlessRenderer;
