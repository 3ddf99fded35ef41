use std::sync::Arc;

use crate::coords::{Aabb2, Rgba, Transform2, Vec2};
use crate::device::MaterialId;
use crate::render::{MeshBuilder, QuadSprite};

/// Immutable sprite-sheet entry, shared by sprites and particle emitters.
///
/// Loaded once by the asset side and never mutated afterwards, so it is shared
/// through `Arc` without locking.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteResource {
    pub name: String,
    pub material: MaterialId,
    /// Sub-rectangle of the texture, in UV space (top-left origin).
    pub uv_bounds: Aabb2,
    /// Pivot measured from the quad's bottom-left corner, in virtual units.
    pub pivot: Vec2,
    /// Quad size in virtual units.
    pub virtual_size: Vec2,
}

impl SpriteResource {
    /// Whole-texture sprite with a centred pivot.
    pub fn new(name: impl Into<String>, material: MaterialId, virtual_size: Vec2) -> Self {
        Self {
            name: name.into(),
            material,
            uv_bounds: Aabb2::new(Vec2::ZERO, Vec2::ONE),
            pivot: virtual_size * 0.5,
            virtual_size,
        }
    }

    pub fn with_uv_bounds(mut self, uv_bounds: Aabb2) -> Self {
        self.uv_bounds = uv_bounds;
        self
    }

    pub fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = pivot;
        self
    }

    #[inline]
    pub fn quad(&self) -> QuadSprite {
        QuadSprite {
            size: self.virtual_size,
            pivot: self.pivot,
            uv_bounds: self.uv_bounds,
        }
    }
}

/// A single textured quad placed in the world.
#[derive(Debug, Clone)]
pub struct Sprite {
    resource: Arc<SpriteResource>,
    pub position: Vec2,
    pub rotation_degrees: f32,
    pub scale: Vec2,
    pub tint: Rgba,
}

impl Sprite {
    pub fn new(resource: Arc<SpriteResource>) -> Self {
        Self {
            resource,
            position: Vec2::ZERO,
            rotation_degrees: 0.0,
            scale: Vec2::ONE,
            tint: Rgba::WHITE,
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    #[inline]
    pub fn resource(&self) -> &SpriteResource {
        &self.resource
    }

    #[inline]
    pub fn material(&self) -> MaterialId {
        self.resource.material
    }

    /// World-space box around the transformed quad.
    pub fn bounds(&self) -> Aabb2 {
        let transform = Transform2::from_scale_rotation_translation(
            self.scale,
            self.rotation_degrees,
            self.position,
        );
        let [first, rest @ ..] = self.resource.quad().local_corners().map(|c| transform.transform_point(c));
        rest.into_iter()
            .fold(Aabb2::new(first, first), Aabb2::expanded_to)
    }

    pub fn render(&self, out: &mut MeshBuilder) {
        out.push_sprite(
            &self.resource.quad(),
            self.position,
            self.rotation_degrees,
            self.scale,
            self.tint,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource() -> Arc<SpriteResource> {
        Arc::new(SpriteResource::new("crate", MaterialId(3), Vec2::new(2.0, 4.0)))
    }

    #[test]
    fn bounds_follow_position_and_pivot() {
        let sprite = Sprite::new(resource()).at(Vec2::new(10.0, 10.0));
        assert_eq!(
            sprite.bounds(),
            Aabb2::new(Vec2::new(9.0, 8.0), Vec2::new(11.0, 12.0))
        );
    }

    #[test]
    fn bounds_cover_rotated_quad() {
        let mut sprite = Sprite::new(resource());
        sprite.rotation_degrees = 90.0;
        let b = sprite.bounds();
        assert!((b.width() - 4.0).abs() < 1.0e-4, "{b:?}");
        assert!((b.height() - 2.0).abs() < 1.0e-4, "{b:?}");
    }

    #[test]
    fn render_uses_resource_material_and_one_quad() {
        let sprite = Sprite::new(resource());
        let mut mb = MeshBuilder::new();
        sprite.render(&mut mb);
        assert_eq!(mb.quad_count(), 1);
        assert_eq!(sprite.material(), MaterialId(3));
    }
}
