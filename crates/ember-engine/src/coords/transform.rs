use core::ops::Mul;

use super::Vec2;

/// 2D affine transform stored as a 3x3 row-vector matrix.
///
/// Points are transformed as `[x, y, 1] * M`, so `a * b` applies `a` first.
/// Sprite quads compose `scale * rotation * translation`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform2 {
    pub m: [[f32; 3]; 3],
}

impl Transform2 {
    pub const IDENTITY: Transform2 = Transform2 {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub const fn scale(s: Vec2) -> Self {
        Self { m: [[s.x, 0.0, 0.0], [0.0, s.y, 0.0], [0.0, 0.0, 1.0]] }
    }

    /// Counter-clockwise rotation about the forward (z) axis.
    #[inline]
    pub fn rotation_degrees(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self { m: [[c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0]] }
    }

    #[inline]
    pub const fn translation(t: Vec2) -> Self {
        Self { m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [t.x, t.y, 1.0]] }
    }

    /// `scale -> rotation -> translation`, composed once.
    #[inline]
    pub fn from_scale_rotation_translation(scale: Vec2, degrees: f32, translation: Vec2) -> Self {
        Self::scale(scale) * Self::rotation_degrees(degrees) * Self::translation(translation)
    }

    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let m = &self.m;
        Vec2::new(
            p.x * m[0][0] + p.y * m[1][0] + m[2][0],
            p.x * m[0][1] + p.y * m[1][1] + m[2][1],
        )
    }
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform2 {
    type Output = Transform2;

    fn mul(self, rhs: Transform2) -> Transform2 {
        let mut out = [[0.0f32; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[r][k] * rhs.m[k][c]).sum();
            }
        }
        Transform2 { m: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1.0e-5 && (a.y - b.y).abs() < 1.0e-5
    }

    #[test]
    fn rotation_is_counter_clockwise() {
        let p = Transform2::rotation_degrees(90.0).transform_point(Vec2::new(1.0, 0.0));
        assert!(approx(p, Vec2::new(0.0, 1.0)), "{p:?}");
    }

    #[test]
    fn composed_order_scales_then_rotates_then_translates() {
        let t = Transform2::from_scale_rotation_translation(
            Vec2::new(2.0, 1.0),
            90.0,
            Vec2::new(10.0, 0.0),
        );
        // (1, 0) -> scale (2, 0) -> rotate (0, 2) -> translate (10, 2)
        assert!(approx(t.transform_point(Vec2::new(1.0, 0.0)), Vec2::new(10.0, 2.0)));
    }

    #[test]
    fn identity_is_neutral() {
        let t = Transform2::translation(Vec2::new(3.0, 4.0));
        assert_eq!(Transform2::IDENTITY * t, t);
        assert_eq!(t * Transform2::IDENTITY, t);
    }
}
