//! Integer texel rectangle

/// Largest coordinate magnitude produced from floating point input
pub const COORD_LIMIT: f64 = (1u64 << 52) as f64;

/// Half-open rectangle of texels: `min` is inclusive, `max` is exclusive.
///
/// Coordinates are signed so a rectangle may start off-canvas before it is
/// clipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl Rect {
    /// Create rect from min (inclusive) and max (exclusive) corners
    pub fn new(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Create rect from an origin and a size
    pub fn from_origin_size(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self::new(x, y, x + width as i64, y + height as i64)
    }

    /// Rect covering a whole `width x height` buffer
    pub fn full(width: u32, height: u32) -> Self {
        Self::from_origin_size(0, 0, width, height)
    }

    /// Smallest rect holding every texel whose coordinates lie within
    /// `radius` of `(cx, cy)`.
    ///
    /// Bounds saturate at `±COORD_LIMIT`, so huge centers or radii yield a
    /// rect that clips like any other.
    pub fn around_circle(cx: f64, cy: f64, radius: f64) -> Self {
        let bound = |v: f64| v.clamp(-COORD_LIMIT, COORD_LIMIT) as i64;
        Self::new(
            bound((cx - radius).floor()),
            bound((cy - radius).floor()),
            bound((cx + radius).ceil()) + 1,
            bound((cy + radius).ceil()) + 1,
        )
    }

    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y).max(0) as u32
    }

    /// Number of texels covered
    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y
    }

    /// Check if texel is inside rect
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }

    /// Overlap of two rects (empty if they do not touch)
    pub fn intersection(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        }
    }

    /// Clip to the bounds of a `width x height` buffer
    pub fn clipped(&self, width: u32, height: u32) -> Rect {
        self.intersection(&Rect::full(width, height))
    }

    /// Return merged rect containing both. Empty rects are ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Iterate texel coordinates row by row
    pub fn texels(&self) -> impl Iterator<Item = (i64, i64)> + use<> {
        let Rect { min_x, min_y, max_x, max_y } = *self;
        (min_y..max_y).flat_map(move |y| (min_x..max_x).map(move |x| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_and_area() {
        let r = Rect::from_origin_size(2, 3, 4, 5);
        assert_eq!(r.width(), 4);
        assert_eq!(r.height(), 5);
        assert_eq!(r.area(), 20);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_inverted_is_empty() {
        let r = Rect::new(5, 5, 2, 8);
        assert!(r.is_empty());
        assert_eq!(r.width(), 0);
        assert_eq!(r.area(), 0);
    }

    #[test]
    fn test_around_circle_covers_rim() {
        let r = Rect::around_circle(5.0, 5.0, 2.0);
        assert_eq!(r, Rect::new(3, 3, 8, 8));
        assert!(r.contains(7, 5));
        assert!(r.contains(3, 5));
        assert!(!r.contains(8, 5));
    }

    #[test]
    fn test_around_fractional_circle() {
        let r = Rect::around_circle(1.5, 1.5, 1.0);
        assert_eq!(r, Rect::new(0, 0, 4, 4));
    }

    #[test]
    fn test_around_huge_circle_saturates() {
        let far = Rect::around_circle(1e19, 5.0, 2.0);
        assert_eq!(far.min_x, COORD_LIMIT as i64);
        assert!(far.clipped(10, 10).is_empty());

        let wide = Rect::around_circle(5.0, 5.0, 1e300);
        assert_eq!(wide.clipped(10, 10), Rect::full(10, 10));
    }

    #[test]
    fn test_clipped() {
        let r = Rect::new(-3, -3, 4, 4).clipped(10, 2);
        assert_eq!(r, Rect::new(0, 0, 4, 2));

        let outside = Rect::new(20, 20, 25, 25).clipped(10, 10);
        assert!(outside.is_empty());
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(5, 1, 6, 9);
        assert_eq!(a.union(&b), Rect::new(0, 0, 6, 9));
        assert_eq!(Rect::default().union(&b), b);
        assert_eq!(a.union(&Rect::default()), a);
    }

    #[test]
    fn test_texels_row_major() {
        let texels: Vec<_> = Rect::new(0, 0, 2, 2).texels().collect();
        assert_eq!(texels, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }
}
