//! Ground mesh built from a heightmap byte buffer.
//!
//! A `(subdivisions + 1)²` vertex grid centered on the origin in the XZ
//! plane. Row 0 sits at `+z`, matching buffer row 0, and every vertex takes
//! its height from the buffer texel under it.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::core::{EditorConfig, Error, Result};
use crate::raster::CHANNELS;

/// How far below `min_height` vertices rejected by the alpha filter drop.
const ALPHA_CUT_DROP: f32 = 0.001;

/// Mesh construction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundMeshOptions {
    /// World extent along X
    pub width: f32,
    /// World extent along Z
    pub height: f32,
    /// Quads per side
    pub subdivisions: u32,
    pub min_height: f32,
    pub max_height: f32,
    /// Luminance weights turning a texel's RGB into a height gradient
    pub color_filter: Vec3,
    /// Texels with alpha below this (in [0, 1]) are pushed under the mesh
    pub alpha_filter: f32,
}

impl Default for GroundMeshOptions {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 20.0,
            subdivisions: 256,
            min_height: 0.0,
            max_height: 2.0,
            color_filter: Vec3::new(0.3, 0.59, 0.11),
            alpha_filter: 0.0,
        }
    }
}

impl GroundMeshOptions {
    /// Options for the editor's ground plane with a given height span
    pub fn from_config(config: &EditorConfig, max_height: f32) -> Self {
        Self {
            width: config.map_size,
            height: config.map_size,
            subdivisions: config.subdivisions,
            min_height: 0.0,
            max_height,
            color_filter: Vec3::from_array(config.color_filter),
            alpha_filter: config.alpha_filter,
        }
    }

    /// Vertices per side
    pub fn side(&self) -> usize {
        self.subdivisions as usize + 1
    }
}

/// Interleaved vertex layout for upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GroundVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Triangulated ground grid.
#[derive(Clone, Debug)]
pub struct GroundMesh {
    options: GroundMeshOptions,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
}

impl GroundMesh {
    /// Build a flat grid at `min_height`.
    pub fn flat(options: GroundMeshOptions) -> Result<Self> {
        if options.subdivisions == 0 {
            return Err(Error::Config("ground mesh needs at least one subdivision".into()));
        }

        let side = options.side();
        let subdivisions = options.subdivisions as f32;
        let mut positions = Vec::with_capacity(side * side);
        let mut uvs = Vec::with_capacity(side * side);

        for row in 0..side {
            for col in 0..side {
                let u = col as f32 / subdivisions;
                let t = row as f32 / subdivisions;
                positions.push(Vec3::new(
                    u * options.width - options.width * 0.5,
                    options.min_height,
                    (1.0 - t) * options.height - options.height * 0.5,
                ));
                uvs.push(Vec2::new(u, 1.0 - t));
            }
        }

        let mut indices = Vec::with_capacity(options.subdivisions as usize * options.subdivisions as usize * 6);
        for row in 0..options.subdivisions {
            for col in 0..options.subdivisions {
                let stride = options.subdivisions + 1;
                let i1 = (col + 1) + (row + 1) * stride;
                let i2 = (col + 1) + row * stride;
                let i3 = col + row * stride;
                let i4 = col + (row + 1) * stride;
                indices.extend_from_slice(&[i1, i2, i3, i4, i1, i3]);
            }
        }

        let mut mesh = Self {
            options,
            normals: vec![Vec3::Y; positions.len()],
            positions,
            uvs,
            indices,
        };
        mesh.compute_normals();
        Ok(mesh)
    }

    /// Build a grid displaced by an RGBA8 heightmap buffer.
    pub fn from_heightmap(
        options: GroundMeshOptions,
        buffer: &[u8],
        buffer_width: u32,
        buffer_height: u32,
    ) -> Result<Self> {
        let mut mesh = Self::flat(options)?;
        mesh.displace(buffer, buffer_width, buffer_height)?;
        Ok(mesh)
    }

    /// Re-read vertex heights from a buffer with a new height span.
    ///
    /// Grid topology and XZ positions are kept; normals are recomputed.
    pub fn apply_heights(
        &mut self,
        buffer: &[u8],
        buffer_width: u32,
        buffer_height: u32,
        max_height: f32,
    ) -> Result<()> {
        self.options.max_height = max_height;
        self.displace(buffer, buffer_width, buffer_height)
    }

    fn displace(&mut self, buffer: &[u8], buffer_width: u32, buffer_height: u32) -> Result<()> {
        if buffer_width == 0 || buffer_height == 0 {
            return Err(Error::Dimensions { width: buffer_width, height: buffer_height });
        }
        let expected = buffer_width as usize * buffer_height as usize * CHANNELS;
        if buffer.len() != expected {
            return Err(Error::BufferSize { expected, actual: buffer.len() });
        }

        let options = self.options;
        let side = options.side();
        let subdivisions = options.subdivisions as f32;
        let span = options.max_height - options.min_height;

        for row in 0..side {
            for col in 0..side {
                // Truncation picks the texel under the vertex
                let map_x = (col as f32 / subdivisions * (buffer_width - 1) as f32) as usize;
                let map_y = (row as f32 / subdivisions * (buffer_height - 1) as f32) as usize;
                let offset = (map_y * buffer_width as usize + map_x) * CHANNELS;

                let texel = &buffer[offset..offset + CHANNELS];
                let rgb = Vec3::new(texel[0] as f32, texel[1] as f32, texel[2] as f32) / 255.0;
                let alpha = texel[3] as f32 / 255.0;
                let gradient = rgb.dot(options.color_filter);

                self.positions[row * side + col].y = if alpha >= options.alpha_filter {
                    options.min_height + span * gradient
                } else {
                    options.min_height - ALPHA_CUT_DROP
                };
            }
        }

        self.compute_normals();
        Ok(())
    }

    /// Area-weighted vertex normals accumulated from face normals.
    fn compute_normals(&mut self) {
        self.normals.iter_mut().for_each(|n| *n = Vec3::ZERO);

        for face in self.indices.chunks_exact(3) {
            let (a, b, c) = (face[0] as usize, face[1] as usize, face[2] as usize);
            let p1 = self.positions[a];
            let p2 = self.positions[b];
            let p3 = self.positions[c];
            let normal = (p1 - p2).cross(p3 - p2);
            self.normals[a] += normal;
            self.normals[b] += normal;
            self.normals[c] += normal;
        }

        for normal in &mut self.normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }
    }

    pub fn options(&self) -> &GroundMeshOptions {
        &self.options
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex at grid `(col, row)`
    pub fn vertex(&self, col: usize, row: usize) -> Option<Vec3> {
        let side = self.options.side();
        if col >= side || row >= side {
            return None;
        }
        Some(self.positions[row * side + col])
    }

    /// Height range over all vertices
    pub fn height_range(&self) -> (f32, f32) {
        self.positions
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)))
    }

    /// Interleaved vertices
    pub fn vertices(&self) -> Vec<GroundVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| GroundVertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }

    /// Interleaved vertices as raw bytes
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.vertices()).to_vec()
    }
}
