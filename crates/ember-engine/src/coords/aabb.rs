use core::ops::Mul;

use super::Vec2;

/// Axis-aligned bounding box in virtual units (y up).
///
/// Unlike a screen rect this is stored as `mins`/`maxs`, which is what the camera
/// clamp and the culling test both want.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Aabb2 {
    pub mins: Vec2,
    pub maxs: Vec2,
}

impl Aabb2 {
    /// Bounds that contain every finite point.
    pub const UNBOUNDED: Aabb2 = Aabb2 {
        mins: Vec2::new(-f32::MAX, -f32::MAX),
        maxs: Vec2::MAX,
    };

    #[inline]
    pub const fn new(mins: Vec2, maxs: Vec2) -> Self {
        Self { mins, maxs }
    }

    #[inline]
    pub fn from_center_half_extents(center: Vec2, half: Vec2) -> Self {
        Self::new(center - half, center + half)
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.maxs.x - self.mins.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.maxs.y - self.mins.y
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(
            self.mins.x * 0.5 + self.maxs.x * 0.5,
            self.mins.y * 0.5 + self.maxs.y * 0.5,
        )
    }

    /// Closed containment: edges count as inside.
    #[inline]
    pub fn contains_point(self, p: Vec2) -> bool {
        p.x >= self.mins.x && p.y >= self.mins.y && p.x <= self.maxs.x && p.y <= self.maxs.y
    }

    /// Open containment: points on an edge are outside.
    #[inline]
    pub fn contains_point_strict(self, p: Vec2) -> bool {
        p.x > self.mins.x && p.y > self.mins.y && p.x < self.maxs.x && p.y < self.maxs.y
    }

    #[inline]
    pub fn contains(self, other: Aabb2) -> bool {
        self.contains_point(other.mins) && self.contains_point(other.maxs)
    }

    /// Overlap test. Boxes that only share an edge do not intersect.
    #[inline]
    pub fn intersects(self, other: Aabb2) -> bool {
        self.mins.x < other.maxs.x
            && other.mins.x < self.maxs.x
            && self.mins.y < other.maxs.y
            && other.mins.y < self.maxs.y
    }

    /// Smallest box containing both `self` and `p`.
    #[inline]
    pub fn expanded_to(self, p: Vec2) -> Self {
        Self::new(
            Vec2::new(self.mins.x.min(p.x), self.mins.y.min(p.y)),
            Vec2::new(self.maxs.x.max(p.x), self.maxs.y.max(p.y)),
        )
    }
}

impl Mul<f32> for Aabb2 {
    type Output = Aabb2;
    #[inline]
    fn mul(self, rhs: f32) -> Aabb2 {
        Aabb2::new(self.mins * rhs, self.maxs * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(x0: f32, y0: f32, x1: f32, y1: f32) -> Aabb2 {
        Aabb2::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    // ── containment ───────────────────────────────────────────────────────

    #[test]
    fn contains_point_includes_edges() {
        let r = b(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(Vec2::new(0.0, 0.0)));
        assert!(r.contains_point(Vec2::new(10.0, 10.0)));
        assert!(!r.contains_point(Vec2::new(10.1, 5.0)));
    }

    #[test]
    fn strict_containment_excludes_edges() {
        let r = b(0.0, 0.0, 10.0, 10.0);
        assert!(!r.contains_point_strict(Vec2::new(0.0, 5.0)));
        assert!(r.contains_point_strict(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn unbounded_contains_large_boxes() {
        assert!(Aabb2::UNBOUNDED.contains(b(-1.0e30, -1.0e30, 1.0e30, 1.0e30)));
    }

    // ── intersects ────────────────────────────────────────────────────────

    #[test]
    fn intersects_overlapping() {
        assert!(b(0.0, 0.0, 10.0, 10.0).intersects(b(5.0, 5.0, 15.0, 15.0)));
    }

    #[test]
    fn touching_edge_does_not_intersect() {
        assert!(!b(0.0, 0.0, 10.0, 10.0).intersects(b(10.0, 0.0, 20.0, 10.0)));
    }

    #[test]
    fn disjoint_does_not_intersect() {
        assert!(!b(0.0, 0.0, 5.0, 5.0).intersects(b(20.0, 20.0, 25.0, 25.0)));
    }

    // ── scaling ───────────────────────────────────────────────────────────

    #[test]
    fn scale_multiplies_both_corners() {
        assert_eq!(b(-1.0, -2.0, 3.0, 4.0) * 2.0, b(-2.0, -4.0, 6.0, 8.0));
    }

    #[test]
    fn center_of_unbounded_does_not_overflow() {
        assert_eq!(Aabb2::UNBOUNDED.center(), Vec2::ZERO);
    }
}
