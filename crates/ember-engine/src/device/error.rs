use thiserror::Error;

use super::{MaterialId, MeshHandle, TargetId};

/// Failures reported by a [`RenderDevice`](super::RenderDevice) backend.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("render target {width}x{height} could not be created: {reason}")]
    TargetCreation { width: u32, height: u32, reason: String },

    #[error("effect `{label}` could not be created: {reason}")]
    EffectCreation { label: String, reason: String },

    #[error("material texture is {actual} bytes, expected {expected}")]
    TextureSize { expected: usize, actual: usize },

    #[error("unknown render target {0:?}")]
    UnknownTarget(TargetId),

    #[error("unknown mesh {0:?}")]
    UnknownMesh(MeshHandle),

    #[error("unknown material {0:?}")]
    UnknownMaterial(MaterialId),
}
