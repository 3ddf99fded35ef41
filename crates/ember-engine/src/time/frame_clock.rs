use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds to advance the simulation by.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

#[derive(Debug, Copy, Clone)]
enum Step {
    /// Measured wall time, clamped to `[min, max]`.
    Measured { min: Duration, max: Duration },
    /// Constant step regardless of wall time.
    Fixed(Duration),
}

/// Produces one [`FrameTime`] per host-loop iteration, fed to `Compositor::update`.
///
/// Measured deltas are clamped so a debugger pause or a stalled frame does not
/// push particles and animations through one enormous step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    step: Step,
}

impl FrameClock {
    /// Measured clock clamped to `[0.1 ms, 250 ms]`.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Measured clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            step: Step::Measured { min: dt_min, max: dt_max },
        }
    }

    /// Deterministic clock for headless runs and replays.
    pub fn fixed(dt: Duration) -> Self {
        Self { last: Instant::now(), frame_index: 0, step: Step::Fixed(dt) }
    }

    /// Resets the baseline, e.g. after a resize or when resuming.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = match self.step {
            Step::Measured { min, max } => now.saturating_duration_since(self.last).clamp(min, max),
            Step::Fixed(dt) => dt,
        };
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
