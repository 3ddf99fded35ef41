//! Ember engine crate.
//!
//! Real-time 2D scene compositor: virtual-resolution cameras with split-screen,
//! ordered sprite layers with chained post effects, and particle simulation,
//! driven through a small [`device::RenderDevice`] interface.

pub mod compositor;
pub mod coords;
pub mod device;
pub mod logging;
pub mod particles;
pub mod render;
pub mod scene;
pub mod time;
