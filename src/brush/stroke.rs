//! Brush state resolved from user input

use glam::DVec2;

use crate::core::{Error, Result};

/// Height added at the brush center by one Add/Remove step.
pub const PEAK_DELTA: f64 = 10.0;

/// How much of [`PEAK_DELTA`] the rim loses at `slope = 1`.
pub const RIM_FALLOFF: f64 = 9.0;

/// How a brush step rewrites heights inside its disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Set every texel to the brush level (plateau)
    #[default]
    Flat,
    /// Raise texels by a cone-shaped amount
    Add,
    /// Lower texels by a cone-shaped amount
    Remove,
}

/// Brush parameters for one stroke-step, in canvas texel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushState {
    /// Disk center
    pub center: DVec2,
    /// Disk radius in texels
    pub radius: f64,
    pub fill_mode: FillMode,
    /// Absolute height byte painted by Flat, in [0, 255]
    pub level: f64,
    /// Cone steepness for Add/Remove, in [0, 1]
    pub slope: f64,
}

impl Default for BrushState {
    fn default() -> Self {
        Self {
            center: DVec2::ZERO,
            radius: 5.0,
            fill_mode: FillMode::Flat,
            level: 127.5,
            slope: 0.5,
        }
    }
}

impl BrushState {
    /// Create a flat brush painting `level`
    pub fn flat(center: DVec2, radius: f64, level: f64) -> Self {
        Self {
            center,
            radius,
            fill_mode: FillMode::Flat,
            level,
            ..Default::default()
        }
    }

    /// Create a raising brush
    pub fn add(center: DVec2, radius: f64, slope: f64) -> Self {
        Self {
            center,
            radius,
            fill_mode: FillMode::Add,
            slope,
            ..Default::default()
        }
    }

    /// Create a lowering brush
    pub fn remove(center: DVec2, radius: f64, slope: f64) -> Self {
        Self {
            center,
            radius,
            fill_mode: FillMode::Remove,
            slope,
            ..Default::default()
        }
    }

    /// Move the brush (builder pattern)
    pub fn at(mut self, center: DVec2) -> Self {
        self.center = center;
        self
    }

    /// Check the parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !self.center.is_finite() {
            return Err(Error::InvalidBrush(format!("center {} is not finite", self.center)));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(Error::InvalidBrush(format!("radius must be positive, got {}", self.radius)));
        }
        if !(0.0..=255.0).contains(&self.level) {
            return Err(Error::InvalidBrush(format!("level must be in [0, 255], got {}", self.level)));
        }
        if !(0.0..=1.0).contains(&self.slope) {
            return Err(Error::InvalidBrush(format!("slope must be in [0, 1], got {}", self.slope)));
        }
        Ok(())
    }

    /// Check if texel `(x, y)` lies inside the disk
    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.distance(x, y) <= self.radius
    }

    /// Distance from a texel to the brush center
    pub fn distance(&self, x: i64, y: i64) -> f64 {
        (x as f64 - self.center.x).hypot(y as f64 - self.center.y)
    }

    /// New, unclamped height for a texel at `distance` from the center that
    /// currently holds `old`.
    pub fn apply(&self, old: u8, distance: f64) -> f64 {
        match self.fill_mode {
            FillMode::Flat => self.level.round(),
            FillMode::Add => (old as f64 + self.cone(distance)).ceil(),
            FillMode::Remove => (old as f64 - self.cone(distance)).ceil(),
        }
    }

    /// Cone falloff: strongest at the center, weakest at the rim
    fn cone(&self, distance: f64) -> f64 {
        PEAK_DELTA - (distance / self.radius) * RIM_FALLOFF * self.slope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(BrushState::default().validate().is_ok());
        assert_eq!(BrushState::default().fill_mode, FillMode::Flat);
    }

    #[test]
    fn test_validate_ranges() {
        assert!(BrushState::flat(DVec2::ZERO, 0.0, 10.0).validate().is_err());
        assert!(BrushState::flat(DVec2::ZERO, 3.0, 300.0).validate().is_err());
        assert!(BrushState::add(DVec2::ZERO, 3.0, 1.5).validate().is_err());
        assert!(BrushState::add(DVec2::new(f64::NAN, 0.0), 3.0, 0.5).validate().is_err());
        // Off-canvas centers are fine
        assert!(BrushState::remove(DVec2::new(-40.0, 9000.0), 3.0, 0.5).validate().is_ok());
    }

    #[test]
    fn test_contains_disk() {
        let brush = BrushState::flat(DVec2::new(5.0, 5.0), 2.0, 200.0);
        assert!(brush.contains(5, 5));
        assert!(brush.contains(5, 7));
        assert!(!brush.contains(5, 8));
        assert!(!brush.contains(7, 7));
    }

    #[test]
    fn test_add_cone() {
        let brush = BrushState::add(DVec2::new(10.0, 10.0), 10.0, 0.5);
        assert_eq!(brush.apply(100, 0.0), 110.0);
        assert_eq!(brush.apply(100, 10.0), 106.0);
    }

    #[test]
    fn test_remove_cone() {
        let brush = BrushState::remove(DVec2::new(10.0, 10.0), 10.0, 0.5);
        assert_eq!(brush.apply(100, 0.0), 90.0);
        // 100 - 5.5 rounds up
        assert_eq!(brush.apply(100, 10.0), 95.0);
    }

    #[test]
    fn test_flat_ignores_old() {
        let brush = BrushState::flat(DVec2::ZERO, 4.0, 200.0);
        assert_eq!(brush.apply(0, 0.0), 200.0);
        assert_eq!(brush.apply(255, 3.9), 200.0);
    }

    #[test]
    fn test_builder_at() {
        let brush = BrushState::add(DVec2::ZERO, 4.0, 0.2).at(DVec2::new(3.0, 4.0));
        assert_eq!(brush.center, DVec2::new(3.0, 4.0));
        assert_eq!(brush.fill_mode, FillMode::Add);
    }
}
