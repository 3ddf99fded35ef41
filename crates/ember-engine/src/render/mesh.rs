use bytemuck::{Pod, Zeroable};

use crate::coords::{Aabb2, Rgba, Transform2, Vec2};

/// Vertex layout shared by sprites, bar graphs and particles.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl SpriteVertex {
    #[inline]
    pub fn new(position: Vec2, color: Rgba, uv: Vec2) -> Self {
        Self {
            position: [position.x, position.y],
            color: color.to_array(),
            uv: [uv.x, uv.y],
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.position[0], self.position[1])
    }
}

/// Geometry of one textured quad before it is transformed.
///
/// `pivot` is measured from the bottom-left corner of a `size`-sized quad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadSprite {
    pub size: Vec2,
    pub pivot: Vec2,
    pub uv_bounds: Aabb2,
}

impl QuadSprite {
    /// Untransformed corners in the order bottom-left, bottom-right, top-left, top-right.
    #[inline]
    pub fn local_corners(&self) -> [Vec2; 4] {
        let p = self.pivot;
        let s = self.size;
        [
            Vec2::new(-p.x, -p.y),
            Vec2::new(s.x - p.x, -p.y),
            Vec2::new(-p.x, s.y - p.y),
            Vec2::new(s.x - p.x, s.y - p.y),
        ]
    }

    /// UVs matching [`local_corners`](Self::local_corners).
    ///
    /// Textures are stored top row first, so the bottom corners take `maxs.y`.
    #[inline]
    pub fn corner_uvs(&self) -> [Vec2; 4] {
        let lo = self.uv_bounds.mins;
        let hi = self.uv_bounds.maxs;
        [
            Vec2::new(lo.x, hi.y),
            hi,
            lo,
            Vec2::new(hi.x, lo.y),
        ]
    }
}

/// Growable triangle list.
///
/// The builder is rebuilt from scratch every frame by its owner; `clear()` keeps the
/// allocation so steady-state rebuilds do not allocate.
#[derive(Debug, Default, Clone)]
pub struct MeshBuilder {
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_quad_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * 6),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Appends a quad given its four corners (bottom-left, bottom-right, top-left,
    /// top-right) in world space. Two counter-clockwise triangles.
    pub fn push_quad(&mut self, corners: [Vec2; 4], uvs: [Vec2; 4], tint: Rgba) {
        let base = self.vertices.len() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(SpriteVertex::new(corner, tint, uv));
        }
        self.indices.extend_from_slice(&[
            base + 1,
            base + 2,
            base,
            base + 1,
            base + 3,
            base + 2,
        ]);
    }

    /// Appends a sprite quad transformed by `scale -> rotation -> translation`.
    pub fn push_sprite(
        &mut self,
        quad: &QuadSprite,
        position: Vec2,
        rotation_degrees: f32,
        scale: Vec2,
        tint: Rgba,
    ) {
        let transform = Transform2::from_scale_rotation_translation(scale, rotation_degrees, position);
        let corners = quad.local_corners().map(|c| transform.transform_point(c));
        self.push_quad(corners, quad.corner_uvs(), tint);
    }

    /// Appends an axis-aligned, untextured-UV quad covering `bounds`.
    pub fn push_rect(&mut self, bounds: Aabb2, tint: Rgba) {
        let corners = [
            bounds.mins,
            Vec2::new(bounds.maxs.x, bounds.mins.y),
            Vec2::new(bounds.mins.x, bounds.maxs.y),
            bounds.maxs,
        ];
        let uvs = [Vec2::new(0.0, 1.0), Vec2::ONE, Vec2::ZERO, Vec2::new(1.0, 0.0)];
        self.push_quad(corners, uvs, tint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> QuadSprite {
        QuadSprite {
            size: Vec2::new(2.0, 2.0),
            pivot: Vec2::new(1.0, 1.0),
            uv_bounds: Aabb2::new(Vec2::ZERO, Vec2::ONE),
        }
    }

    fn cross_z(a: Vec2, b: Vec2, c: Vec2) -> f32 {
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }

    #[test]
    fn quad_emits_four_vertices_and_two_triangles() {
        let mut mb = MeshBuilder::new();
        mb.push_sprite(&unit_quad(), Vec2::ZERO, 0.0, Vec2::ONE, Rgba::WHITE);
        assert_eq!(mb.vertices().len(), 4);
        assert_eq!(mb.indices(), &[1, 2, 0, 1, 3, 2]);
    }

    #[test]
    fn triangles_share_winding() {
        let mut mb = MeshBuilder::new();
        mb.push_sprite(&unit_quad(), Vec2::new(5.0, 5.0), 33.0, Vec2::new(2.0, 0.5), Rgba::WHITE);
        let v = mb.vertices();
        let i = mb.indices();
        let w0 = cross_z(v[i[0] as usize].position(), v[i[1] as usize].position(), v[i[2] as usize].position());
        let w1 = cross_z(v[i[3] as usize].position(), v[i[4] as usize].position(), v[i[5] as usize].position());
        assert!(w0 > 0.0 && w1 > 0.0, "w0={w0} w1={w1}");
    }

    #[test]
    fn pivot_is_placed_at_position() {
        let mut mb = MeshBuilder::new();
        mb.push_sprite(&unit_quad(), Vec2::new(10.0, 20.0), 0.0, Vec2::ONE, Rgba::WHITE);
        assert_eq!(mb.vertices()[0].position(), Vec2::new(9.0, 19.0));
        assert_eq!(mb.vertices()[3].position(), Vec2::new(11.0, 21.0));
    }

    #[test]
    fn bottom_corners_sample_bottom_of_texture() {
        let mut mb = MeshBuilder::new();
        mb.push_sprite(&unit_quad(), Vec2::ZERO, 0.0, Vec2::ONE, Rgba::WHITE);
        assert_eq!(mb.vertices()[0].uv, [0.0, 1.0]);
        assert_eq!(mb.vertices()[2].uv, [0.0, 0.0]);
    }

    #[test]
    fn indices_offset_for_each_quad() {
        let mut mb = MeshBuilder::new();
        mb.push_rect(Aabb2::new(Vec2::ZERO, Vec2::ONE), Rgba::WHITE);
        mb.push_rect(Aabb2::new(Vec2::ZERO, Vec2::ONE), Rgba::WHITE);
        assert_eq!(mb.quad_count(), 2);
        assert_eq!(&mb.indices()[6..], &[5, 6, 4, 5, 7, 6]);
    }

    #[test]
    fn clear_keeps_nothing_visible() {
        let mut mb = MeshBuilder::new();
        mb.push_rect(Aabb2::new(Vec2::ZERO, Vec2::ONE), Rgba::WHITE);
        mb.clear();
        assert!(mb.is_empty());
        assert_eq!(mb.vertices().len(), 0);
    }
}
