use core::cmp::Ordering;
use core::fmt;

/// Draw-order layer key.
///
/// Layers are composited back-to-front in ascending order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct LayerId(pub i32);

impl LayerId {
    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}

impl From<i32> for LayerId {
    #[inline]
    fn from(v: i32) -> Self {
        Self(v)
    }
}

impl Ord for LayerId {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for LayerId {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({})", self.0)
    }
}
