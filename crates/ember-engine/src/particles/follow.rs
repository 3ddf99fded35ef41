use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::coords::Vec2;

/// A position owned by a game object that emitters may follow.
///
/// Cloning shares the same cell.
#[derive(Debug, Clone, Default)]
pub struct TrackedPosition(Rc<Cell<Vec2>>);

impl TrackedPosition {
    pub fn new(position: Vec2) -> Self {
        Self(Rc::new(Cell::new(position)))
    }

    #[inline]
    pub fn get(&self) -> Vec2 {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, position: Vec2) {
        self.0.set(position);
    }

    /// Non-owning reader of this position.
    pub fn follower(&self) -> PositionFollower {
        PositionFollower { source: Rc::downgrade(&self.0), last: self.get() }
    }
}

/// Weak view of a [`TrackedPosition`].
///
/// Once the source is dropped the follower keeps reporting the last position
/// it read.
#[derive(Debug, Clone)]
pub struct PositionFollower {
    source: Weak<Cell<Vec2>>,
    last: Vec2,
}

impl PositionFollower {
    /// Current position of the source, or the last one seen.
    pub fn position(&mut self) -> Vec2 {
        if let Some(cell) = self.source.upgrade() {
            self.last = cell.get();
        }
        self.last
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.source.strong_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follower_reads_current_value() {
        let tracked = TrackedPosition::new(Vec2::new(1.0, 2.0));
        let mut follower = tracked.follower();
        tracked.set(Vec2::new(5.0, 6.0));
        assert_eq!(follower.position(), Vec2::new(5.0, 6.0));
    }

    #[test]
    fn follower_keeps_last_position_after_source_drops() {
        let tracked = TrackedPosition::new(Vec2::ZERO);
        let mut follower = tracked.follower();
        tracked.set(Vec2::new(3.0, 3.0));
        follower.position();
        drop(tracked);
        assert!(!follower.is_attached());
        assert_eq!(follower.position(), Vec2::new(3.0, 3.0));
    }
}
