use crate::device::TargetId;

/// Two off-screen targets whose read/write roles swap after every effect pass.
///
/// The primary target holds the image composed so far; an effect reads it and
/// writes the secondary, then [`swap`](Self::swap) makes its output primary.
#[derive(Debug, Copy, Clone)]
pub struct PingPongTargets {
    targets: [TargetId; 2],
    current: usize,
}

impl PingPongTargets {
    pub fn new(a: TargetId, b: TargetId) -> Self {
        assert_ne!(a, b, "ping-pong targets must be distinct");
        Self { targets: [a, b], current: 0 }
    }

    #[inline]
    pub fn primary(&self) -> TargetId {
        self.targets[self.current]
    }

    #[inline]
    pub fn secondary(&self) -> TargetId {
        self.targets[1 - self.current]
    }

    #[inline]
    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }

    #[inline]
    pub fn both(&self) -> [TargetId; 2] {
        self.targets
    }
}
