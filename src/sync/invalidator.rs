//! Dirty-region tracking for terrain buffers after edits.

use crate::math::Rect;

/// Tracks which part of the terrain buffers needs pushing to the renderer.
///
/// Dirty state is kept at two granularities:
/// - A union rectangle of texels touched by brush steps
/// - A full-field flag set by regeneration, clear and import
#[derive(Debug, Default)]
pub struct DirtyRegion {
    /// Union of touched texels since the last clear
    rect: Rect,
    /// Whole buffers changed
    full: bool,
    /// Incremented on every mark, never reset by `clear`
    generation: u64,
}

impl DirtyRegion {
    /// Create a new tracker with empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a rect as dirty and bump the generation counter.
    ///
    /// Empty rects still bump the generation but add no area.
    pub fn mark(&mut self, rect: Rect) {
        self.rect = self.rect.union(&rect);
        self.generation = self.generation.wrapping_add(1);
    }

    /// Mark both buffers as entirely dirty.
    pub fn mark_full(&mut self) {
        self.full = true;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Check if anything needs refreshing.
    pub fn has_dirty(&self) -> bool {
        self.full || !self.rect.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Dirty rect hint for the renderer: `None` means the whole field.
    pub fn hint(&self) -> Option<Rect> {
        if self.full { None } else { Some(self.rect) }
    }

    /// Clear dirty state. The generation counter keeps counting.
    pub fn clear(&mut self) {
        self.rect = Rect::default();
        self.full = false;
    }

    /// Number of marks so far, for cache invalidation and version checks.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
