//! Coordinate and geometry types shared by the compositor, scene and particles.
//!
//! Canonical world space:
//! - virtual units (resolution independent)
//! - +X right, +Y up
//!
//! Viewports are the only thing expressed in physical pixels.

mod aabb;
mod color;
mod pixel_rect;
mod transform;
mod vec2;

pub use aabb::Aabb2;
pub use color::Rgba;
pub use pixel_rect::PixelRect;
pub use transform::Transform2;
pub use vec2::Vec2;
