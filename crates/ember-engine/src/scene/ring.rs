use core::fmt;

const NIL: u32 = u32::MAX;

/// Stable handle into a [`Ring`].
///
/// Carries the slot's generation so a handle to a removed value never aliases the
/// value that later reuses the slot.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct RingHandle {
    idx: u32,
    generation: u32,
}

impl RingHandle {
    /// Raw slot index (diagnostics only).
    #[inline]
    pub const fn index(self) -> u32 {
        self.idx
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for RingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RingHandle({}@gen{})", self.idx, self.generation)
    }
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    generation: u32,
    prev: u32,
    next: u32,
}

/// Circular doubly-linked list stored in an arena.
///
/// Links are slot indices owned by the ring, not by the values, so insert and
/// remove are O(1) and a stale [`RingHandle`] is detected instead of dangling.
///
/// Invariant: either empty (`head == NIL`) or following `next` from any live
/// slot visits every live slot exactly once and returns to it; same for `prev`.
#[derive(Debug)]
pub struct Ring<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    head: u32,
    len: usize,
}

impl<T> Default for Ring<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Ring<T> {
    pub const fn new() -> Self {
        Self { slots: Vec::new(), free: Vec::new(), head: NIL, len: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == NIL
    }

    /// First value in iteration order.
    #[inline]
    pub fn head(&self) -> Option<RingHandle> {
        (self.head != NIL).then(|| self.handle_at(self.head))
    }

    /// Links `value` in just before the head, so iteration follows insertion order.
    pub fn insert(&mut self, value: T) -> RingHandle {
        let idx = match self.free.pop() {
            Some(idx) => {
                let slot = &mut self.slots[idx as usize];
                slot.generation = slot.generation.wrapping_add(1);
                slot.value = Some(value);
                idx
            }
            None => {
                let idx = self.slots.len() as u32;
                self.slots.push(Slot { value: Some(value), generation: 0, prev: NIL, next: NIL });
                idx
            }
        };

        if self.head == NIL {
            let slot = &mut self.slots[idx as usize];
            slot.prev = idx;
            slot.next = idx;
            self.head = idx;
        } else {
            let head = self.head;
            let tail = self.slots[head as usize].prev;
            self.slots[idx as usize].prev = tail;
            self.slots[idx as usize].next = head;
            self.slots[tail as usize].next = idx;
            self.slots[head as usize].prev = idx;
        }

        self.len += 1;
        self.handle_at(idx)
    }

    /// Unlinks and returns the value; `None` for stale handles.
    pub fn remove(&mut self, handle: RingHandle) -> Option<T> {
        if !self.contains(handle) {
            return None;
        }
        Some(self.unlink(handle.idx))
    }

    #[inline]
    pub fn contains(&self, handle: RingHandle) -> bool {
        self.slots
            .get(handle.idx as usize)
            .is_some_and(|s| s.generation == handle.generation && s.value.is_some())
    }

    #[inline]
    pub fn get(&self, handle: RingHandle) -> Option<&T> {
        let slot = self.slots.get(handle.idx as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, handle: RingHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.idx as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    pub fn next(&self, handle: RingHandle) -> Option<RingHandle> {
        self.contains(handle)
            .then(|| self.handle_at(self.slots[handle.idx as usize].next))
    }

    pub fn prev(&self, handle: RingHandle) -> Option<RingHandle> {
        self.contains(handle)
            .then(|| self.handle_at(self.slots[handle.idx as usize].prev))
    }

    /// Walks the ring once from the head.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { ring: self, cursor: self.head, remaining: self.len }
    }

    /// Visits every value once from the head with mutable access.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(RingHandle, &mut T)) {
        let mut idx = self.head;
        for _ in 0..self.len {
            let handle = self.handle_at(idx);
            let slot = &mut self.slots[idx as usize];
            if let Some(value) = slot.value.as_mut() {
                f(handle, value);
            }
            idx = slot.next;
        }
    }

    /// Single pass that unlinks and drops every value for which `keep` is false.
    ///
    /// The successor is captured before a node is freed, so removing the node
    /// being visited (including the head) is safe. Returns the number removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let mut removed = 0;
        let mut idx = self.head;
        for _ in 0..self.len {
            let next = self.slots[idx as usize].next;
            let drop_it = self.slots[idx as usize].value.as_ref().is_some_and(|v| !keep(v));
            if drop_it {
                drop(self.unlink(idx));
                removed += 1;
            }
            idx = next;
        }
        removed
    }

    /// Drops every value.
    pub fn clear(&mut self) -> usize {
        self.retain(|_| false)
    }

    #[inline]
    fn handle_at(&self, idx: u32) -> RingHandle {
        RingHandle { idx, generation: self.slots[idx as usize].generation }
    }

    fn unlink(&mut self, idx: u32) -> T {
        let (prev, next) = {
            let slot = &self.slots[idx as usize];
            (slot.prev, slot.next)
        };

        if next == idx {
            self.head = NIL;
        } else {
            self.slots[prev as usize].next = next;
            self.slots[next as usize].prev = prev;
            if self.head == idx {
                self.head = next;
            }
        }

        let slot = &mut self.slots[idx as usize];
        slot.prev = NIL;
        slot.next = NIL;
        self.free.push(idx);
        self.len -= 1;

        match slot.value.take() {
            Some(v) => v,
            // Callers only unlink occupied slots.
            None => unreachable!("unlinked an empty ring slot"),
        }
    }
}

/// Forward iterator over `(handle, value)` pairs.
pub struct Iter<'a, T> {
    ring: &'a Ring<T>,
    cursor: u32,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (RingHandle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = &self.ring.slots[self.cursor as usize];
        let item = (self.ring.handle_at(self.cursor), slot.value.as_ref()?);
        self.cursor = slot.next;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walks both directions and checks every live value is visited exactly once.
    fn assert_ring_valid<T: PartialEq + fmt::Debug>(ring: &Ring<T>, expected: &[T]) {
        assert_eq!(ring.len(), expected.len());
        let Some(head) = ring.head() else {
            assert!(expected.is_empty(), "empty ring but expected {expected:?}");
            assert!(ring.is_empty());
            return;
        };

        let mut forward = Vec::new();
        let mut h = head;
        loop {
            forward.push(ring.get(h).unwrap());
            h = ring.next(h).unwrap();
            if h == head {
                break;
            }
            assert!(forward.len() <= expected.len(), "forward walk does not close");
        }
        assert_eq!(forward, expected.iter().collect::<Vec<_>>());

        let mut backward = Vec::new();
        let mut h = head;
        loop {
            h = ring.prev(h).unwrap();
            backward.push(ring.get(h).unwrap());
            if h == head {
                break;
            }
            assert!(backward.len() <= expected.len(), "backward walk does not close");
        }
        backward.reverse();
        assert_eq!(backward, expected.iter().collect::<Vec<_>>());
    }

    // ── insert / remove ───────────────────────────────────────────────────

    #[test]
    fn single_node_links_to_itself() {
        let mut ring = Ring::new();
        let h = ring.insert(7);
        assert_eq!(ring.next(h), Some(h));
        assert_eq!(ring.prev(h), Some(h));
        assert_ring_valid(&ring, &[7]);
    }

    #[test]
    fn removing_last_node_empties_ring() {
        let mut ring = Ring::new();
        let h = ring.insert(1);
        assert_eq!(ring.remove(h), Some(1));
        assert!(ring.is_empty());
        assert!(ring.head().is_none());
        assert_ring_valid(&ring, &[]);
    }

    #[test]
    fn mixed_sequence_keeps_ring_valid() {
        let mut ring = Ring::new();
        let mut live: Vec<(RingHandle, i32)> = Vec::new();

        // Deterministic pseudo-random add/remove sequence.
        let mut state = 0x2545_f491_u32;
        for step in 0..400 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if live.is_empty() || state % 3 != 0 {
                live.push((ring.insert(step), step));
            } else {
                let i = (state as usize / 3) % live.len();
                let (h, v) = live.remove(i);
                assert_eq!(ring.remove(h), Some(v));
            }
            let expected: Vec<i32> = live.iter().map(|(_, v)| *v).collect();
            assert_ring_valid(&ring, &expected);
        }
    }

    #[test]
    fn stale_handle_is_rejected_after_slot_reuse() {
        let mut ring = Ring::new();
        let old = ring.insert("a");
        ring.remove(old);
        let new = ring.insert("b");
        assert_eq!(old.index(), new.index());
        assert_eq!(ring.get(old), None);
        assert_eq!(ring.remove(old), None);
        assert_eq!(ring.get(new), Some(&"b"));
    }

    // ── retain ────────────────────────────────────────────────────────────

    #[test]
    fn retain_removes_head_and_neighbours() {
        let mut ring = Ring::new();
        for v in 0..6 {
            ring.insert(v);
        }
        let removed = ring.retain(|v| v % 2 == 1);
        assert_eq!(removed, 3);
        assert_ring_valid(&ring, &[1, 3, 5]);
    }

    #[test]
    fn retain_can_remove_everything() {
        let mut ring = Ring::new();
        for v in 0..4 {
            ring.insert(v);
        }
        assert_eq!(ring.clear(), 4);
        assert_ring_valid(&ring, &[]);
    }

    #[test]
    fn for_each_mut_visits_in_insertion_order() {
        let mut ring = Ring::new();
        for v in [1, 2, 3] {
            ring.insert(v);
        }
        let mut seen = Vec::new();
        ring.for_each_mut(|_, v| {
            *v *= 10;
            seen.push(*v);
        });
        assert_eq!(seen, vec![10, 20, 30]);
        assert_eq!(ring.iter().map(|(_, v)| *v).collect::<Vec<_>>(), seen);
    }
}
