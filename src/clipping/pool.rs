//! Fixed-capacity pool of clipping-plane slots shared by every locator.

use log::trace;

use super::plane::{ClippingPlane, Plane};

/// Index of a slot in a [`ClippingPlanePool`].
///
/// Handles are only minted by [`ClippingPlanePool::allocate`], so the slot
/// order they carry is the pool's first-fit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

/// A fixed array of [`ClippingPlane`] slots.
///
/// Capacity is chosen at construction and never changes. Slot index order
/// is both the allocation order (lowest free slot first) and the render
/// priority when there are more active planes than clip units.
#[derive(Debug, Clone)]
pub struct ClippingPlanePool {
    slots: Box<[ClippingPlane]>,
}

impl ClippingPlanePool {
    /// Creates a pool of `capacity` free, inactive slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![ClippingPlane::default(); capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Claims the lowest-indexed free slot, leaving it inactive and its
    /// plane untouched. Returns `None` when every slot is taken.
    pub fn allocate(&mut self) -> Option<SlotId> {
        let index = self.slots.iter().position(|slot| !slot.is_allocated())?;
        let slot = &mut self.slots[index];
        slot.set_allocated(true);
        slot.set_active(false);
        trace!("allocated clipping plane slot {index}");
        Some(SlotId(index))
    }

    /// Frees a slot. Releasing a free slot does nothing.
    ///
    /// # Panics
    /// Panics if `slot` is out of range for this pool.
    pub fn release(&mut self, slot: SlotId) {
        let capacity = self.capacity();
        let Some(plane) = self.slots.get_mut(slot.0) else {
            panic!("{slot} is out of range for a pool of {capacity}");
        };
        if plane.is_allocated() {
            trace!("released clipping plane {slot}");
        }
        plane.set_allocated(false);
    }

    pub fn get(&self, slot: SlotId) -> &ClippingPlane {
        &self.slots[slot.0]
    }

    /// All slots in index order.
    pub fn slots(&self) -> impl ExactSizeIterator<Item = (SlotId, &ClippingPlane)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (SlotId(index), slot))
    }

    pub fn allocated_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_allocated()).count()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_active()).count()
    }

    pub(crate) fn set_active(&mut self, slot: SlotId, active: bool) {
        self.slots[slot.0].set_active(active);
    }

    pub(crate) fn set_plane(&mut self, slot: SlotId, plane: Plane) {
        self.slots[slot.0].set_plane(plane);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use proptest::prelude::*;

    fn indices(ids: &[Option<SlotId>]) -> Vec<Option<usize>> {
        ids.iter().map(|id| id.map(SlotId::index)).collect()
    }

    #[test]
    fn allocates_in_ascending_order_until_full() {
        let mut pool = ClippingPlanePool::new(6);
        let ids: Vec<_> = (0..7).map(|_| pool.allocate()).collect();
        assert_eq!(
            indices(&ids),
            vec![Some(0), Some(1), Some(2), Some(3), Some(4), Some(5), None]
        );
        assert_eq!(pool.allocated_count(), 6);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn zero_capacity_pool_never_allocates() {
        let mut pool = ClippingPlanePool::new(0);
        assert_eq!(pool.allocate(), None);
    }

    #[test]
    fn released_slot_is_reused_when_lowest_free() {
        let mut pool = ClippingPlanePool::new(4);
        let ids: Vec<_> = (0..4).filter_map(|_| pool.allocate()).collect();
        pool.release(ids[3]);
        pool.release(ids[1]);
        assert_eq!(pool.allocate(), Some(ids[1]));
        assert_eq!(pool.allocate(), Some(ids[3]));
        assert_eq!(pool.allocate(), None);
    }

    #[test]
    fn release_is_idempotent() {
        let mut pool = ClippingPlanePool::new(3);
        let a = pool.allocate().unwrap();
        let _b = pool.allocate().unwrap();
        pool.release(a);
        let before: Vec<_> = pool.slots().map(|(_, s)| *s).collect();
        pool.release(a);
        let after: Vec<_> = pool.slots().map(|(_, s)| *s).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn release_clears_active_flag() {
        let mut pool = ClippingPlanePool::new(2);
        let a = pool.allocate().unwrap();
        pool.set_active(a, true);
        assert_eq!(pool.active_count(), 1);
        pool.release(a);
        assert!(!pool.get(a).is_active());
    }

    #[test]
    fn allocation_leaves_geometry_alone() {
        let mut pool = ClippingPlanePool::new(1);
        let a = pool.allocate().unwrap();
        let plane = Plane::new(Vec3::RIGHT, 2.0);
        pool.set_plane(a, plane);
        pool.release(a);
        let again = pool.allocate().unwrap();
        assert_eq!(pool.get(again).plane(), plane);
    }

    #[test]
    #[should_panic]
    fn releasing_foreign_slot_panics() {
        let mut big = ClippingPlanePool::new(4);
        let ids: Vec<_> = (0..4).filter_map(|_| big.allocate()).collect();
        let mut small = ClippingPlanePool::new(2);
        small.release(ids[3]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Allocate,
        Release(usize),
        Activate(usize, bool),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Allocate),
            (0..8usize).prop_map(Op::Release),
            (0..8usize, any::<bool>()).prop_map(|(i, a)| Op::Activate(i, a)),
        ]
    }

    proptest! {
        #[test]
        fn unallocated_slots_are_never_active(ops in prop::collection::vec(op(), 0..64)) {
            let mut pool = ClippingPlanePool::new(6);
            let mut held: Vec<SlotId> = Vec::new();
            for op in ops {
                match op {
                    Op::Allocate => {
                        let lowest_free = pool.slots().find(|(_, s)| !s.is_allocated()).map(|(id, _)| id);
                        let got = pool.allocate();
                        prop_assert_eq!(got, lowest_free);
                        held.extend(got);
                    }
                    Op::Release(i) if !held.is_empty() => {
                        let id = held.remove(i % held.len());
                        pool.release(id);
                    }
                    Op::Activate(i, active) if !held.is_empty() => {
                        pool.set_active(held[i % held.len()], active);
                    }
                    _ => {}
                }
                prop_assert!(pool.allocated_count() <= pool.capacity());
                for (_, slot) in pool.slots() {
                    prop_assert!(slot.is_allocated() || !slot.is_active());
                }
            }
        }
    }
}
