use crate::coords::{PixelRect, Rgba, Vec2};
use crate::render::SpriteVertex;

use super::{DeviceError, MaterialId, MeshHandle, RenderDevice, TargetId, UniformValue};

/// One call made against a [`RecordingDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    ReleaseTarget(TargetId),
    BindTarget(TargetId),
    Unbind,
    SetViewport(PixelRect),
    ClearColor(Rgba),
    ClearDepth,
    BeginOrthographic { size: Vec2, center: Vec2 },
    EndOrthographic,
    UploadMesh { mesh: MeshHandle, vertices: usize, indices: usize },
    ReleaseMesh(MeshHandle),
    DrawMesh { mesh: MeshHandle, material: MaterialId },
    SetUniform { material: MaterialId, name: String, value: UniformValue },
    SetEffectInput { material: MaterialId, target: TargetId },
    DrawFullscreen(MaterialId),
    Blit { target: TargetId, dest: PixelRect },
}

/// Headless device that records the command stream.
///
/// Useful for tests and for running the compositor without a GPU. Mesh handles
/// are issued sequentially; live meshes are tracked so leaks are observable.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    commands: Vec<DeviceCommand>,
    next_target: u32,
    next_mesh: u32,
    live_meshes: Vec<MeshHandle>,
    live_targets: Vec<TargetId>,
    /// When set, `create_target` fails; exercises construction error paths.
    pub fail_target_creation: bool,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Drops recorded commands; handle counters keep running.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DeviceCommand::DrawMesh { .. }))
            .count()
    }

    pub fn fullscreen_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DeviceCommand::DrawFullscreen(_)))
            .count()
    }

    pub fn upload_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DeviceCommand::UploadMesh { .. }))
            .count()
    }

    #[inline]
    pub fn live_mesh_count(&self) -> usize {
        self.live_meshes.len()
    }

    #[inline]
    pub fn live_target_count(&self) -> usize {
        self.live_targets.len()
    }
}

impl RenderDevice for RecordingDevice {
    fn create_target(&mut self, width: u32, height: u32) -> Result<TargetId, DeviceError> {
        if self.fail_target_creation {
            return Err(DeviceError::TargetCreation {
                width,
                height,
                reason: "target creation disabled".to_string(),
            });
        }
        let id = TargetId(self.next_target);
        self.next_target += 1;
        self.live_targets.push(id);
        Ok(id)
    }

    fn release_target(&mut self, target: TargetId) {
        self.live_targets.retain(|t| *t != target);
        self.commands.push(DeviceCommand::ReleaseTarget(target));
    }

    fn bind_target(&mut self, target: TargetId) {
        self.commands.push(DeviceCommand::BindTarget(target));
    }

    fn unbind(&mut self) {
        self.commands.push(DeviceCommand::Unbind);
    }

    fn set_viewport(&mut self, rect: PixelRect) {
        self.commands.push(DeviceCommand::SetViewport(rect));
    }

    fn clear_color(&mut self, color: Rgba) {
        self.commands.push(DeviceCommand::ClearColor(color));
    }

    fn clear_depth(&mut self) {
        self.commands.push(DeviceCommand::ClearDepth);
    }

    fn begin_orthographic(&mut self, size: Vec2, center: Vec2) {
        self.commands.push(DeviceCommand::BeginOrthographic { size, center });
    }

    fn end_orthographic(&mut self) {
        self.commands.push(DeviceCommand::EndOrthographic);
    }

    fn upload_mesh(&mut self, vertices: &[SpriteVertex], indices: &[u32]) -> MeshHandle {
        let mesh = MeshHandle(self.next_mesh);
        self.next_mesh += 1;
        self.live_meshes.push(mesh);
        self.commands.push(DeviceCommand::UploadMesh {
            mesh,
            vertices: vertices.len(),
            indices: indices.len(),
        });
        mesh
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        self.live_meshes.retain(|m| *m != mesh);
        self.commands.push(DeviceCommand::ReleaseMesh(mesh));
    }

    fn draw_mesh(&mut self, mesh: MeshHandle, material: MaterialId) {
        self.commands.push(DeviceCommand::DrawMesh { mesh, material });
    }

    fn set_uniform(&mut self, material: MaterialId, name: &str, value: UniformValue) {
        self.commands.push(DeviceCommand::SetUniform {
            material,
            name: name.to_string(),
            value,
        });
    }

    fn set_effect_input(&mut self, material: MaterialId, target: TargetId) {
        self.commands.push(DeviceCommand::SetEffectInput { material, target });
    }

    fn draw_fullscreen(&mut self, material: MaterialId) {
        self.commands.push(DeviceCommand::DrawFullscreen(material));
    }

    fn blit(&mut self, target: TargetId, dest: PixelRect) {
        self.commands.push(DeviceCommand::Blit { target, dest });
    }
}
