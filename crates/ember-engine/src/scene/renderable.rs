use crate::coords::Aabb2;
use crate::device::MaterialId;
use crate::render::MeshBuilder;

use super::{BarGraph, LayerId, Sprite};

/// Closed set of drawable kinds.
///
/// Extending the scene:
/// - add the kind's module under `scene::*`
/// - add a variant here and its arms in [`Renderable`]'s dispatch methods
#[derive(Debug, Clone)]
pub enum RenderableKind {
    Sprite(Sprite),
    BarGraph(BarGraph),
}

/// A drawable object owned by exactly one layer collection.
///
/// The layer id is fixed at construction; `kill()` is a soft delete consumed by
/// the layer's next cleanup pass.
#[derive(Debug, Clone)]
pub struct Renderable {
    layer: LayerId,
    dead: bool,
    cullable: bool,
    kind: RenderableKind,
}

impl Renderable {
    /// Sprites are culled against the camera by default.
    pub fn sprite(layer: impl Into<LayerId>, sprite: Sprite) -> Self {
        Self { layer: layer.into(), dead: false, cullable: true, kind: RenderableKind::Sprite(sprite) }
    }

    /// Bar graphs are usually HUD elements and are never culled by default.
    pub fn bar_graph(layer: impl Into<LayerId>, bar: BarGraph) -> Self {
        Self { layer: layer.into(), dead: false, cullable: false, kind: RenderableKind::BarGraph(bar) }
    }

    pub fn with_cullable(mut self, cullable: bool) -> Self {
        self.cullable = cullable;
        self
    }

    #[inline]
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Marks the renderable for removal at the end of the next update.
    #[inline]
    pub fn kill(&mut self) {
        self.dead = true;
    }

    #[inline]
    pub fn is_cullable(&self) -> bool {
        self.cullable
    }

    #[inline]
    pub fn kind(&self) -> &RenderableKind {
        &self.kind
    }

    #[inline]
    pub fn kind_mut(&mut self) -> &mut RenderableKind {
        &mut self.kind
    }

    pub fn update(&mut self, dt: f32) {
        match &mut self.kind {
            RenderableKind::Sprite(_) => {}
            RenderableKind::BarGraph(bar) => bar.update(dt),
        }
    }

    pub fn render(&self, out: &mut MeshBuilder) {
        match &self.kind {
            RenderableKind::Sprite(sprite) => sprite.render(out),
            RenderableKind::BarGraph(bar) => bar.render(out),
        }
    }

    pub fn bounds(&self) -> Aabb2 {
        match &self.kind {
            RenderableKind::Sprite(sprite) => sprite.bounds(),
            RenderableKind::BarGraph(bar) => bar.bounds,
        }
    }

    pub fn material(&self) -> MaterialId {
        match &self.kind {
            RenderableKind::Sprite(sprite) => sprite.material(),
            RenderableKind::BarGraph(_) => MaterialId::DEFAULT,
        }
    }
}
