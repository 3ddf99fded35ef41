//! Frame orchestration.
//!
//! The [`Compositor`] owns every layer, the particle system registry, the
//! split-screen viewports and a ping-pong pair of off-screen targets. It turns
//! scene state into [`RenderDevice`](crate::device::RenderDevice) calls:
//!
//! per viewport: bind primary -> clear -> each layer ascending
//! (camera fit, cull, draw, effect chain) -> blit to the viewport rectangle.

mod camera;
mod compositor;
mod config;
mod error;
mod ping_pong;
mod viewport;

pub use camera::VirtualCamera;
pub use compositor::{Compositor, ParticleSystemHandle, RenderableHandle};
pub use config::CompositorConfig;
pub use error::CompositorError;
pub use ping_pong::PingPongTargets;
pub use viewport::{split_screen, ViewportDefinition};
