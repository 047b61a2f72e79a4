//! Incremental brush editing of the heightfield and mix-map.

use crate::math::Rect;
use crate::raster::{Heightfield, MixMap, gray, min_level_byte};
use crate::terrain::biome::BiomeProfile;
use crate::terrain::classifier::MixCategory;

use super::stroke::BrushState;

/// What a stroke-step changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrokeOutcome {
    /// Buffer rect that was read and written back (clipped)
    pub touched: Rect,
    /// Texels inside the disk that were rewritten
    pub texels: usize,
}

impl StrokeOutcome {
    pub fn is_noop(&self) -> bool {
        self.texels == 0
    }
}

/// Apply one brush stroke-step.
///
/// Only the clipped bounding square of the disk is copied out of each buffer,
/// edited and written back, so the cost is proportional to `radius²` and not
/// to the canvas size. Texels outside the disk are written back unchanged.
///
/// New heights are clamped to `[min_level, 255]`. Re-classification inside
/// the disk uses the plain threshold rule without jitter.
pub fn apply_stroke(
    heightfield: &mut Heightfield,
    mixmap: &mut MixMap,
    brush: &BrushState,
    profile: &BiomeProfile,
) -> StrokeOutcome {
    if !(brush.radius.is_finite() && brush.radius > 0.0) || !brush.center.is_finite() {
        return StrokeOutcome::default();
    }

    let rect = Rect::around_circle(brush.center.x, brush.center.y, brush.radius)
        .clipped(heightfield.width(), heightfield.height())
        .clipped(mixmap.width(), mixmap.height());
    if rect.is_empty() {
        return StrokeOutcome::default();
    }

    let mut heights = heightfield.raster().read_window(rect);
    let mut materials = mixmap.raster().read_window(rect);
    let floor = min_level_byte(profile.min_level) as f64;
    let mut texels = 0;

    for ly in 0..heights.height() {
        for lx in 0..heights.width() {
            let (x, y) = heights.to_buffer(lx, ly);
            let distance = brush.distance(x, y);
            if distance > brush.radius {
                continue;
            }

            let old = heights.get(lx, ly)[0];
            let new = brush.apply(old, distance).clamp(floor, 255.0) as u8;
            heights.set(lx, ly, gray(new));

            let category = MixCategory::from_height(new as f64 / 255.0, &profile.levels);
            materials.set(lx, ly, category.color());
            texels += 1;
        }
    }

    heightfield.raster_mut().write_window(&heights);
    mixmap.raster_mut().write_window(&materials);

    log::debug!(
        "Stroke {:?} at ({:.1}, {:.1}) r={:.1}: {} texels in {}x{} window",
        brush.fill_mode,
        brush.center.x,
        brush.center.y,
        brush.radius,
        texels,
        rect.width(),
        rect.height()
    );

    StrokeOutcome { touched: rect, texels }
}
