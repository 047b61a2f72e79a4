//! Four-layer blend material driven by the mix-map.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;

use crate::core::{Error, Result};
use crate::math::Rect;
use crate::raster::{CHANNELS, Heightfield, Pixel, RasterBuffer, gray};
use crate::terrain::biome::TextureBinding;

/// Specular intensity of a zero-height texel. Higher ground is less shiny.
const SPECULAR_BASE: u8 = 200;

/// Decoded diffuse texture, RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialTexture {
    raster: RasterBuffer,
}

impl MaterialTexture {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Dimensions { width, height });
        }
        Ok(Self { raster: RasterBuffer::from_rgba(width, height, rgba)? })
    }

    /// 1x1 texture of a single color
    pub fn solid(color: Pixel) -> Self {
        Self { raster: RasterBuffer::filled(1, 1, color) }
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Nearest-texel lookup; coordinates outside [0, 1) repeat.
    pub fn sample(&self, u: f32, v: f32) -> Pixel {
        let width = self.raster.width() as i64;
        let height = self.raster.height() as i64;
        let x = ((u * width as f32).floor() as i64).rem_euclid(width);
        let y = ((v * height as f32).floor() as i64).rem_euclid(height);
        self.raster.get_pixel(x, y)
    }
}

/// Named textures available to materials.
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    textures: HashMap<String, Arc<MaterialTexture>>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, texture: MaterialTexture) {
        self.textures.insert(name.into(), Arc::new(texture));
    }

    pub fn get(&self, name: &str) -> Option<Arc<MaterialTexture>> {
        self.textures.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// One diffuse layer of the blend.
#[derive(Clone, Debug)]
pub struct DiffuseLayer {
    pub binding: TextureBinding,
    /// `None` when the library had no texture for the binding; shades black
    pub texture: Option<Arc<MaterialTexture>>,
}

impl DiffuseLayer {
    /// Layer color at a mesh uv, scaled by the tile factor
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        let tile = self.binding.tile_factor as f32;
        match &self.texture {
            Some(texture) => {
                let [r, g, b, _] = texture.sample(u * tile, v * tile);
                Vec3::new(r as f32, g as f32, b as f32) / 255.0
            }
            None => Vec3::ZERO,
        }
    }
}

/// Terrain material: four diffuse layers selected by a mix texture.
#[derive(Clone, Debug)]
pub struct BlendMaterial {
    layers: [DiffuseLayer; 4],
    mix: Option<RasterBuffer>,
}

impl BlendMaterial {
    /// Resolve four bindings against a library.
    ///
    /// Bindings whose texture is not in the library are kept but shade black.
    pub fn from_bindings(bindings: &[TextureBinding; 4], library: &MaterialLibrary) -> Self {
        let layers = bindings.clone().map(|binding| {
            let texture = library.get(&binding.material_name);
            if texture.is_none() {
                log::warn!("Material texture '{}' not loaded, layer shades black", binding.material_name);
            }
            DiffuseLayer { binding, texture }
        });
        Self { layers, mix: None }
    }

    pub fn layers(&self) -> &[DiffuseLayer; 4] {
        &self.layers
    }

    /// Check if the layers were built from exactly these bindings
    pub fn uses_bindings(&self, bindings: &[TextureBinding; 4]) -> bool {
        self.layers.iter().zip(bindings).all(|(layer, binding)| layer.binding == *binding)
    }

    pub fn mix_texture(&self) -> Option<&RasterBuffer> {
        self.mix.as_ref()
    }

    /// Update the mix texture from an RGBA8 buffer.
    ///
    /// With a `dirty` rect and an existing texture of the same size, only
    /// the texels of that rect are copied.
    pub fn set_mix_texture(&mut self, width: u32, height: u32, rgba: &[u8], dirty: Option<Rect>) -> Result<()> {
        let expected = width as usize * height as usize * CHANNELS;
        if rgba.len() != expected {
            return Err(Error::BufferSize { expected, actual: rgba.len() });
        }

        match (&mut self.mix, dirty) {
            (Some(mix), Some(rect)) if mix.width() == width && mix.height() == height => {
                for (x, y) in rect.clipped(width, height).texels() {
                    let offset = (y as usize * width as usize + x as usize) * CHANNELS;
                    let mut pixel = [0u8; CHANNELS];
                    pixel.copy_from_slice(&rgba[offset..offset + CHANNELS]);
                    mix.set_pixel(x, y, pixel);
                }
            }
            _ => self.mix = Some(RasterBuffer::from_rgba(width, height, rgba.to_vec())?),
        }
        Ok(())
    }

    /// Shade one point from its mix texel and uv.
    ///
    /// `c = d1 * r`, then mix towards `d2` by `g`, towards `d3` by `b` and
    /// towards `d4` by `1 - a`.
    pub fn shade(&self, mix: Pixel, u: f32, v: f32) -> Pixel {
        let [r, g, b, a] = mix.map(|c| c as f32 / 255.0);
        let [d1, d2, d3, d4] = [0, 1, 2, 3].map(|i| self.layers[i].sample(u, v));

        let color = (d1 * r).lerp(d2, g).lerp(d3, b).lerp(d4, 1.0 - a);
        let color = (color * 255.0).round().clamp(Vec3::ZERO, Vec3::splat(255.0));
        [color.x as u8, color.y as u8, color.z as u8, 255]
    }
}

/// Full-resolution diffuse color raster for a mix texture.
pub fn bake_diffuse(mix: &RasterBuffer, material: &BlendMaterial) -> RasterBuffer {
    let width = mix.width();
    let height = mix.height();
    let mut out = RasterBuffer::new(width, height);

    for (x, y) in mix.bounds().texels() {
        let u = (x as f32 + 0.5) / width as f32;
        let v = (y as f32 + 0.5) / height as f32;
        out.set_pixel(x, y, material.shade(mix.get_pixel(x, y), u, v));
    }
    out
}

/// Specular raster: each texel is `200 - height`, saturating at zero.
pub fn bake_specular(heightfield: &Heightfield) -> RasterBuffer {
    let mut out = RasterBuffer::new(heightfield.width(), heightfield.height());
    for (x, y) in out.bounds().texels() {
        out.set_pixel(x, y, gray(SPECULAR_BASE.saturating_sub(heightfield.get(x, y))));
    }
    out
}
