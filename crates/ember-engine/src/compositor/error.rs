use thiserror::Error;

use crate::device::DeviceError;

#[derive(Debug, Error)]
pub enum CompositorError {
    #[error("screen resolution {width}x{height} has a zero dimension")]
    InvalidResolution { width: u32, height: u32 },

    #[error(transparent)]
    Device(#[from] DeviceError),
}
