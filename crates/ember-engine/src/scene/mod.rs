//! Scene storage: draw layers and the renderables they own.
//!
//! Responsibilities:
//! - keep per-layer membership with O(1) insert/remove and lazy deletion
//! - dispatch update/render/bounds over the closed set of renderable kinds
//! - hold each layer's post-effect chain and virtual-scale multiplier

mod bar_graph;
mod layer;
mod layer_id;
mod renderable;
mod ring;
mod sprite;

pub use bar_graph::{BarGraph, BarOrientation};
pub use layer::{LayerEffect, SpriteLayer};
pub use layer_id::LayerId;
pub use renderable::{Renderable, RenderableKind};
pub use ring::{Iter as RingIter, Ring, RingHandle};
pub use sprite::{Sprite, SpriteResource};
