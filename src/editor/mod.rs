//! Terrain editor: owns the buffers and drives generation, brushing and
//! renderer sync.
//!
//! The editor orchestrates:
//! 1. Heightfield synthesis for the selected biome
//! 2. Jittered mix-map classification
//! 3. Brush stroke-steps from pointer input
//! 4. Pushing dirty buffers to a [`TerrainRenderer`]

pub mod session;

pub use session::{PointerEvent, StrokeSession, pick_to_canvas};

use crate::brush::{self, BrushState, StrokeOutcome};
use crate::core::{EditorConfig, Error, Result};
use crate::raster::{CHANNELS, Heightfield, MixMap, min_level_byte};
use crate::sync::{TerrainRenderer, TerrainSyncBridge};
use crate::terrain::biome::{BiomeId, BiomeProfile, BiomeTable};
use crate::terrain::classifier::{classify, classify_jittered};
use crate::terrain::noise_field::NoiseField;

/// Interactive terrain editing state.
///
/// Heightfield and mix-map always share the configured resolution and are
/// edited in lockstep for the active biome profile.
pub struct TerrainEditor {
    config: EditorConfig,
    biomes: BiomeTable,
    profile: BiomeProfile,
    heightfield: Heightfield,
    mixmap: MixMap,
    brush: BrushState,
    session: StrokeSession,
    bridge: TerrainSyncBridge,
    /// Seed of the last generated field; also drives classification jitter
    seed: u32,
    /// Set on biome switch until both surfaces have been refreshed
    strokes_locked: bool,
}

impl TerrainEditor {
    /// Create an editor with blank buffers.
    ///
    /// Strokes stay locked until the first successful [`sync`](Self::sync).
    pub fn new(config: EditorConfig, biomes: BiomeTable) -> Result<Self> {
        config.validate()?;
        let profile = biomes.get(&config.initial_biome)?.clone();
        let (width, height) = (config.width(), config.height());
        let mut bridge = TerrainSyncBridge::new(config.base_max_height);
        bridge.mark_full();

        Ok(Self {
            heightfield: Heightfield::new(width, height),
            mixmap: MixMap::new(width, height),
            brush: BrushState::default(),
            session: StrokeSession::new(),
            bridge,
            seed: config.seed.unwrap_or_default(),
            strokes_locked: true,
            config,
            biomes,
            profile,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn biomes(&self) -> &BiomeTable {
        &self.biomes
    }

    pub fn biome(&self) -> &BiomeId {
        &self.profile.id
    }

    pub fn profile(&self) -> &BiomeProfile {
        &self.profile
    }

    pub fn heightfield(&self) -> &Heightfield {
        &self.heightfield
    }

    pub fn mixmap(&self) -> &MixMap {
        &self.mixmap
    }

    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    /// Brush parameters for subsequent strokes (center is overwritten by
    /// pointer moves)
    pub fn brush_mut(&mut self) -> &mut BrushState {
        &mut self.brush
    }

    pub fn session(&self) -> &StrokeSession {
        &self.session
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn strokes_locked(&self) -> bool {
        self.strokes_locked
    }

    /// Check if buffers hold changes the renderer has not seen
    pub fn needs_sync(&self) -> bool {
        self.bridge.is_dirty()
    }

    /// Synthesize a new heightfield.
    ///
    /// Uses the configured seed, or a fresh random one when none is set.
    pub fn generate_noise(&mut self) {
        let noise = match self.config.seed {
            Some(seed) => NoiseField::new(seed),
            None => NoiseField::with_random_seed(),
        };
        noise.fill(&mut self.heightfield, &self.profile);
        self.seed = noise.seed();
        self.bridge.mark_full();
    }

    /// Re-run full-field classification with jitter from the current seed.
    pub fn generate_mix_map(&mut self) {
        classify_jittered(&self.heightfield, &mut self.mixmap, &self.profile, &NoiseField::new(self.seed));
        self.bridge.mark_full();
    }

    /// Generate heightfield and mix-map, then push both to the renderer.
    pub fn regenerate(&mut self, renderer: &mut dyn TerrainRenderer) -> bool {
        self.generate_noise();
        self.generate_mix_map();
        self.sync(renderer)
    }

    /// Push pending changes. Returns true once the renderer is in sync.
    pub fn sync(&mut self, renderer: &mut dyn TerrainRenderer) -> bool {
        let synced = self.bridge.flush(&self.heightfield, &self.mixmap, &self.profile, renderer);
        if synced && self.strokes_locked {
            self.strokes_locked = false;
            log::info!("Terrain surfaces ready for {}, strokes unlocked", self.profile.id);
        }
        synced
    }

    /// Switch biome and regenerate.
    ///
    /// Strokes are rejected until both surfaces have been refreshed for the
    /// new biome. An unknown id leaves the editor untouched.
    pub fn set_biome(&mut self, id: &BiomeId, renderer: &mut dyn TerrainRenderer) -> Result<bool> {
        self.profile = self.biomes.get(id)?.clone();
        self.strokes_locked = true;
        log::info!("Switched map type to {}", id);
        Ok(self.regenerate(renderer))
    }

    /// Reset every texel to the biome's minimum level.
    pub fn clear(&mut self, renderer: &mut dyn TerrainRenderer) -> bool {
        self.heightfield.fill(min_level_byte(self.profile.min_level));
        classify(&self.heightfield, &mut self.mixmap, &self.profile, None);
        self.bridge.mark_full();
        log::info!("Cleared heightfield for {}", self.profile.id);
        self.sync(renderer)
    }

    /// Replace the heightfield with decoded RGBA8 pixels.
    ///
    /// The pixels must match the editor resolution. Each texel is reduced
    /// to grayscale with the configured color filter.
    pub fn import_heightfield(
        &mut self,
        rgba: Vec<u8>,
        width: u32,
        height: u32,
        renderer: &mut dyn TerrainRenderer,
    ) -> Result<bool> {
        if width != self.config.width() || height != self.config.height() {
            return Err(Error::BufferSize {
                expected: self.config.width() as usize * self.config.height() as usize * CHANNELS,
                actual: width as usize * height as usize * CHANNELS,
            });
        }

        self.heightfield = Heightfield::from_rgba_weighted(
            width,
            height,
            rgba,
            self.config.color_filter,
            min_level_byte(self.profile.min_level),
        )?;
        log::info!("Imported {}x{} heightfield", width, height);
        self.generate_mix_map();
        Ok(self.sync(renderer))
    }

    /// Apply one stroke-step with the current brush and push the result.
    pub fn apply_stroke(&mut self, renderer: &mut dyn TerrainRenderer) -> Result<StrokeOutcome> {
        if self.strokes_locked {
            log::warn!("Stroke rejected: terrain surfaces not refreshed yet");
            return Err(Error::StrokesLocked);
        }
        self.brush.validate()?;

        let outcome = brush::apply_stroke(&mut self.heightfield, &mut self.mixmap, &self.brush, &self.profile);
        self.bridge.mark_stroke(&outcome);
        self.sync(renderer);
        Ok(outcome)
    }

    /// Feed one pointer event.
    ///
    /// Moves while the primary button is held apply a stroke-step at the
    /// picked point. Releasing after at least one move re-runs the full
    /// jittered classification.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        renderer: &mut dyn TerrainRenderer,
    ) -> Result<Option<StrokeOutcome>> {
        match event {
            PointerEvent::Down { primary } => {
                self.session.press(primary);
                Ok(None)
            }
            PointerEvent::Move { pick } => {
                if !self.session.record_move() {
                    return Ok(None);
                }
                let Some(point) = pick else {
                    return Ok(None);
                };
                self.brush.center = pick_to_canvas(point, self.config.map_size, self.config.resolution);
                self.apply_stroke(renderer).map(Some)
            }
            PointerEvent::Up => {
                if self.session.release() {
                    self.generate_mix_map();
                    self.sync(renderer);
                }
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{GroundMeshOptions, HeadlessRenderer};
    use crate::terrain::classifier::MixCategory;
    use glam::Vec3;

    fn config() -> EditorConfig {
        EditorConfig {
            resolution: [32, 32],
            map_size: 16.0,
            subdivisions: 8,
            seed: Some(3),
            ..Default::default()
        }
    }

    fn renderer(editor: &TerrainEditor) -> HeadlessRenderer {
        let mut renderer = HeadlessRenderer::default();
        let max_height = editor.config().base_max_height * editor.profile().height_scale as f32;
        renderer
            .attach_ground(GroundMeshOptions::from_config(editor.config(), max_height))
            .unwrap();
        renderer.attach_material(&editor.profile().textures);
        renderer
    }

    fn ready_editor() -> (TerrainEditor, HeadlessRenderer) {
        let mut editor = TerrainEditor::new(config(), BiomeTable::builtin()).unwrap();
        let mut renderer = renderer(&editor);
        assert!(editor.regenerate(&mut renderer));
        (editor, renderer)
    }

    #[test]
    fn test_new_validates() {
        let bad = EditorConfig { resolution: [0, 32], ..config() };
        assert!(TerrainEditor::new(bad, BiomeTable::builtin()).is_err());

        let unknown = EditorConfig { initial_biome: BiomeId::new("TUNDRA"), ..config() };
        assert!(matches!(
            TerrainEditor::new(unknown, BiomeTable::builtin()),
            Err(Error::UnknownBiome(_))
        ));
    }

    #[test]
    fn test_locked_until_first_sync() {
        let mut editor = TerrainEditor::new(config(), BiomeTable::builtin()).unwrap();
        let mut renderer = renderer(&editor);
        assert!(editor.strokes_locked());
        assert!(matches!(editor.apply_stroke(&mut renderer), Err(Error::StrokesLocked)));

        assert!(editor.regenerate(&mut renderer));
        assert!(!editor.strokes_locked());
        assert!(editor.apply_stroke(&mut renderer).is_ok());
    }

    #[test]
    fn test_sync_without_surfaces_stays_locked() {
        let mut editor = TerrainEditor::new(config(), BiomeTable::builtin()).unwrap();
        assert!(editor.needs_sync());

        let mut detached = HeadlessRenderer::default();
        assert!(!editor.sync(&mut detached));
        assert!(editor.strokes_locked());
        assert!(matches!(editor.apply_stroke(&mut detached), Err(Error::StrokesLocked)));

        let mut attached = renderer(&editor);
        assert!(editor.sync(&mut attached));
        assert!(!editor.strokes_locked());
        assert_eq!(attached.mesh_refreshes(), 1);
        assert_eq!(attached.material_refreshes(), 1);
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let (a, _) = ready_editor();
        let (b, _) = ready_editor();
        assert_eq!(a.seed(), 3);
        assert_eq!(a.heightfield(), b.heightfield());
        assert_eq!(a.mixmap(), b.mixmap());
    }

    #[test]
    fn test_generation_respects_min_level() {
        let mut editor = TerrainEditor::new(config(), BiomeTable::builtin()).unwrap();
        let mut renderer = renderer(&editor);
        editor.set_biome(&BiomeId::CAVE, &mut renderer).unwrap();

        let floor = min_level_byte(editor.profile().min_level);
        assert!(editor.heightfield().raster().pixels().all(|p| p[0] >= floor));
    }

    #[test]
    fn test_unknown_biome_leaves_state() {
        let (mut editor, mut renderer) = ready_editor();
        let before = editor.heightfield().clone();

        let result = editor.set_biome(&BiomeId::new("TUNDRA"), &mut renderer);
        assert!(matches!(result, Err(Error::UnknownBiome(_))));
        assert_eq!(editor.biome(), &BiomeId::GREEN_HILLS);
        assert_eq!(editor.heightfield(), &before);
        assert!(!editor.strokes_locked());
    }

    #[test]
    fn test_biome_switch_locks_until_surfaces_exist() {
        let (mut editor, mut renderer) = ready_editor();
        renderer.detach();

        assert!(!editor.set_biome(&BiomeId::SWAMP, &mut renderer).unwrap());
        assert!(editor.strokes_locked());
        assert!(editor.needs_sync());
        assert!(matches!(editor.apply_stroke(&mut renderer), Err(Error::StrokesLocked)));

        let mut fresh = self::renderer(&editor);
        assert!(editor.sync(&mut fresh));
        assert!(!editor.strokes_locked());
        assert!(fresh.material().unwrap().uses_bindings(&editor.profile().textures));
    }

    #[test]
    fn test_pointer_drag_edits_and_reclassifies() {
        let (mut editor, mut renderer) = ready_editor();
        editor.clear(&mut renderer);
        *editor.brush_mut() = BrushState::add(Default::default(), 4.0, 0.5);
        let center_before = editor.heightfield().get(16, 16);
        let mesh_refreshes = renderer.mesh_refreshes();

        editor.handle_pointer(PointerEvent::Down { primary: true }, &mut renderer).unwrap();
        let outcome = editor
            .handle_pointer(PointerEvent::Move { pick: Some(Vec3::ZERO) }, &mut renderer)
            .unwrap()
            .unwrap();
        assert!(outcome.texels > 0);
        assert!(editor.heightfield().get(16, 16) > center_before);
        assert_eq!(renderer.mesh_refreshes(), mesh_refreshes + 1);

        editor.handle_pointer(PointerEvent::Up, &mut renderer).unwrap();
        assert_eq!(renderer.mesh_refreshes(), mesh_refreshes + 2);
        assert_eq!(editor.session().strokes(), 1);
        assert!(!editor.needs_sync());

        let mut expected = MixMap::new(32, 32);
        classify_jittered(editor.heightfield(), &mut expected, editor.profile(), &NoiseField::new(3));
        assert_eq!(editor.mixmap(), &expected);
    }

    #[test]
    fn test_click_without_drag_does_nothing() {
        let (mut editor, mut renderer) = ready_editor();
        let refreshes = renderer.mesh_refreshes();

        editor.handle_pointer(PointerEvent::Down { primary: true }, &mut renderer).unwrap();
        editor.handle_pointer(PointerEvent::Up, &mut renderer).unwrap();
        assert_eq!(renderer.mesh_refreshes(), refreshes);
        assert_eq!(editor.session().strokes(), 0);
    }

    #[test]
    fn test_moves_without_press_are_ignored() {
        let (mut editor, mut renderer) = ready_editor();
        let before = editor.heightfield().clone();

        let outcome = editor
            .handle_pointer(PointerEvent::Move { pick: Some(Vec3::ZERO) }, &mut renderer)
            .unwrap();
        assert!(outcome.is_none());

        editor.handle_pointer(PointerEvent::Down { primary: false }, &mut renderer).unwrap();
        editor.handle_pointer(PointerEvent::Move { pick: Some(Vec3::ZERO) }, &mut renderer).unwrap();
        assert_eq!(editor.heightfield(), &before);
    }

    #[test]
    fn test_invalid_brush_rejected() {
        let (mut editor, mut renderer) = ready_editor();
        editor.brush_mut().slope = 2.0;
        assert!(matches!(editor.apply_stroke(&mut renderer), Err(Error::InvalidBrush(_))));
    }

    #[test]
    fn test_clear_resets_to_min_level() {
        let (mut editor, mut renderer) = ready_editor();
        editor.set_biome(&BiomeId::CAVE, &mut renderer).unwrap();
        assert!(editor.clear(&mut renderer));

        let floor = min_level_byte(editor.profile().min_level);
        assert_eq!(editor.heightfield().range(), Some((floor, floor)));
        // 26 / 255 is below the first cave level
        assert_eq!(editor.mixmap().histogram(), [32 * 32, 0, 0, 0]);
        assert_eq!(editor.mixmap().category(0, 0), Some(MixCategory::Red));
    }

    #[test]
    fn test_import_heightfield() {
        let (mut editor, mut renderer) = ready_editor();

        let wrong = vec![0u8; 16 * 16 * 4];
        assert!(matches!(
            editor.import_heightfield(wrong, 16, 16, &mut renderer),
            Err(Error::BufferSize { .. })
        ));

        let rgba = [100u8, 100, 100, 255].repeat(32 * 32);
        assert!(editor.import_heightfield(rgba, 32, 32, &mut renderer).unwrap());
        assert_eq!(editor.heightfield().range(), Some((100, 100)));
    }
}
