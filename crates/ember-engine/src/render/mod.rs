//! CPU-side mesh building.
//!
//! Renderables and particle emitters build triangle lists here; the device turns
//! them into GPU meshes.
//!
//! Convention:
//! - positions are in virtual units (world space, +Y up)
//! - the orthographic region set by the compositor maps them to the target

mod mesh;

pub use mesh::{MeshBuilder, QuadSprite, SpriteVertex};
