//! Device boundary.
//!
//! The compositor never talks to a graphics API directly. It drives a
//! [`RenderDevice`], a small command interface:
//! - bind / unbind an off-screen target, clear it
//! - open an orthographic region and draw meshes inside it
//! - run full-screen effect materials
//! - blit a target to the presentation surface
//!
//! Two implementations live here: [`WgpuDevice`] renders for real, and
//! [`RecordingDevice`] stores the command stream for headless inspection.

mod error;
mod gpu;
mod recording;
mod wgpu_device;

pub use error::DeviceError;
pub use gpu::{Gpu, GpuInit};
pub use recording::{DeviceCommand, RecordingDevice};
pub use wgpu_device::WgpuDevice;

use crate::coords::{PixelRect, Rgba, Vec2};
use crate::render::SpriteVertex;

/// Handle to an off-screen render target (color + depth).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TargetId(pub u32);

/// Handle to an uploaded mesh.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Handle to a material: a sprite texture or a full-screen effect.
///
/// Material `0` is the device's built-in white texture, so untextured geometry
/// (bar graphs) draws with its vertex tint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct MaterialId(pub u32);

impl MaterialId {
    pub const DEFAULT: MaterialId = MaterialId(0);
}

/// Value accepted by [`RenderDevice::set_uniform`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Color(Rgba),
}

/// Minimal GPU command interface consumed by the compositor.
///
/// All calls happen on the frame thread. Handles are only meaningful to the
/// device that issued them.
pub trait RenderDevice {
    /// Allocates a color + depth target of the given pixel size.
    fn create_target(&mut self, width: u32, height: u32) -> Result<TargetId, DeviceError>;

    fn release_target(&mut self, target: TargetId);

    /// Makes `target` the destination of subsequent clears and draws.
    fn bind_target(&mut self, target: TargetId);

    /// Restores the default (presentation) destination.
    fn unbind(&mut self);

    /// Restricts drawing on the bound target to `rect`'s size.
    fn set_viewport(&mut self, rect: PixelRect);

    fn clear_color(&mut self, color: Rgba);

    fn clear_depth(&mut self);

    /// Opens an orthographic region `size` virtual units wide, centred on `center`.
    fn begin_orthographic(&mut self, size: Vec2, center: Vec2);

    fn end_orthographic(&mut self);

    fn upload_mesh(&mut self, vertices: &[SpriteVertex], indices: &[u32]) -> MeshHandle;

    fn release_mesh(&mut self, mesh: MeshHandle);

    fn draw_mesh(&mut self, mesh: MeshHandle, material: MaterialId);

    fn set_uniform(&mut self, material: MaterialId, name: &str, value: UniformValue);

    /// Binds `target`'s color output as the input texture of an effect material.
    fn set_effect_input(&mut self, material: MaterialId, target: TargetId);

    /// Draws `material` as a full-screen pass into the bound target.
    fn draw_fullscreen(&mut self, material: MaterialId);

    /// Copies the visible part of `target` onto the presentation surface at `dest`.
    fn blit(&mut self, target: TargetId, dest: PixelRect);
}
