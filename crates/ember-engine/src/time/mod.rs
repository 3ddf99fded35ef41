//! Time subsystem.
//!
//! Frame timing for the host loop, decoupled from any windowing runtime:
//! call [`FrameClock::tick`] once per frame and pass `dt` to the compositor.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
