use crate::device::MaterialId;

use super::{LayerId, Renderable, Ring, RingHandle};

/// Post effect registered on a layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerEffect {
    pub material: MaterialId,
    /// Compositor time at registration; also pushed to the material as `gStartTime`.
    pub start_time: f32,
}

/// One draw-order bucket: its renderables, its effect chain and its toggles.
///
/// Renderables live in a [`Ring`]; dead ones are removed lazily by
/// [`clean_up_dead`](Self::clean_up_dead) so update and render never mutate
/// membership mid-walk.
#[derive(Debug)]
pub struct SpriteLayer {
    id: LayerId,
    renderables: Ring<Renderable>,
    enabled: bool,
    effects: Vec<LayerEffect>,
    virtual_scale: f32,
}

impl SpriteLayer {
    pub fn new(id: LayerId) -> Self {
        Self {
            id,
            renderables: Ring::new(),
            enabled: true,
            effects: Vec::new(),
            virtual_scale: 1.0,
        }
    }

    #[inline]
    pub fn id(&self) -> LayerId {
        self.id
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Multiplier on the virtual size this layer is viewed at (parallax, zoomed HUDs).
    #[inline]
    pub fn virtual_scale(&self) -> f32 {
        self.virtual_scale
    }

    pub fn set_virtual_scale(&mut self, scale: f32) {
        debug_assert!(scale > 0.0 && scale.is_finite(), "layer virtual scale must be positive");
        self.virtual_scale = scale;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.renderables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.renderables.is_empty()
    }

    #[inline]
    pub fn renderables(&self) -> &Ring<Renderable> {
        &self.renderables
    }

    /// O(1) insert.
    pub fn add(&mut self, renderable: Renderable) -> RingHandle {
        debug_assert_eq!(renderable.layer(), self.id, "renderable added to a foreign layer");
        self.renderables.insert(renderable)
    }

    /// O(1) unlink; `None` if the handle is stale.
    pub fn remove(&mut self, handle: RingHandle) -> Option<Renderable> {
        self.renderables.remove(handle)
    }

    #[inline]
    pub fn get(&self, handle: RingHandle) -> Option<&Renderable> {
        self.renderables.get(handle)
    }

    #[inline]
    pub fn get_mut(&mut self, handle: RingHandle) -> Option<&mut Renderable> {
        self.renderables.get_mut(handle)
    }

    /// Advances every live renderable.
    pub fn update(&mut self, dt: f32) {
        self.renderables.for_each_mut(|_, r| {
            if !r.is_dead() {
                r.update(dt);
            }
        });
    }

    /// Drops renderables flagged dead, or all of them when `force_all` is set.
    pub fn clean_up_dead(&mut self, force_all: bool) -> usize {
        let removed = self.renderables.retain(|r| !(force_all || r.is_dead()));
        if removed > 0 {
            log::trace!("layer {:?}: cleaned up {removed} renderables", self.id);
        }
        removed
    }

    #[inline]
    pub fn effects(&self) -> &[LayerEffect] {
        &self.effects
    }

    /// Appends to the chain; effects run in registration order.
    pub fn add_effect(&mut self, material: MaterialId, start_time: f32) {
        self.effects.push(LayerEffect { material, start_time });
    }

    /// Removes the first effect using `material`.
    pub fn remove_effect(&mut self, material: MaterialId) -> bool {
        match self.effects.iter().position(|e| e.material == material) {
            Some(i) => {
                self.effects.remove(i);
                true
            }
            None => false,
        }
    }
}

impl Drop for SpriteLayer {
    fn drop(&mut self) {
        self.clean_up_dead(true);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::coords::Vec2;
    use crate::scene::{Sprite, SpriteResource};

    fn sprite(layer: i32) -> Renderable {
        let res = Arc::new(SpriteResource::new("dot", MaterialId::DEFAULT, Vec2::ONE));
        Renderable::sprite(layer, Sprite::new(res))
    }

    #[test]
    fn new_layer_is_enabled_and_empty() {
        let layer = SpriteLayer::new(LayerId(2));
        assert!(layer.is_enabled());
        assert!(layer.is_empty());
        assert_eq!(layer.virtual_scale(), 1.0);
    }

    #[test]
    fn clean_up_removes_only_dead() {
        let mut layer = SpriteLayer::new(LayerId(0));
        let a = layer.add(sprite(0));
        let b = layer.add(sprite(0));
        let c = layer.add(sprite(0));
        layer.get_mut(b).unwrap().kill();

        assert_eq!(layer.clean_up_dead(false), 1);
        assert!(layer.get(a).is_some());
        assert!(layer.get(b).is_none());
        assert!(layer.get(c).is_some());
    }

    #[test]
    fn clean_up_of_dead_head_keeps_ring_walkable() {
        let mut layer = SpriteLayer::new(LayerId(0));
        let a = layer.add(sprite(0));
        let b = layer.add(sprite(0));
        layer.get_mut(a).unwrap().kill();
        layer.clean_up_dead(false);
        assert_eq!(layer.renderables().head(), Some(b));
        assert_eq!(layer.renderables().next(b), Some(b));
    }

    #[test]
    fn forced_clean_up_empties_layer() {
        let mut layer = SpriteLayer::new(LayerId(0));
        for _ in 0..5 {
            layer.add(sprite(0));
        }
        assert_eq!(layer.clean_up_dead(true), 5);
        assert!(layer.is_empty());
    }

    #[test]
    fn effects_keep_registration_order() {
        let mut layer = SpriteLayer::new(LayerId(0));
        layer.add_effect(MaterialId(4), 0.0);
        layer.add_effect(MaterialId(5), 1.0);
        layer.add_effect(MaterialId(4), 2.0);
        assert!(layer.remove_effect(MaterialId(4)));
        let order: Vec<_> = layer.effects().iter().map(|e| e.material).collect();
        assert_eq!(order, vec![MaterialId(5), MaterialId(4)]);
        assert!(!layer.remove_effect(MaterialId(9)));
    }
}
