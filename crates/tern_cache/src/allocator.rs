//! Assignment of disjoint position-space slices.

use std::sync::atomic::{AtomicU64, Ordering};

use tern_source::Pos;

/// A slice `[base, base + extent)` of the position space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// First position of the slice.
    pub base: Pos,
    /// Number of positions reserved.
    pub extent: u64,
}

impl Slot {
    /// Position just past the slice.
    pub fn end(&self) -> Pos {
        self.base.advance(self.extent)
    }
}

/// Hands out position-space slices that never overlap and are never reused.
///
/// Positions start at 1; [`Pos::NONE`] is never allocated.
#[derive(Debug)]
pub struct PositionAllocator {
    next: AtomicU64,
}

impl PositionAllocator {
    /// Creates an allocator whose first slice starts at position 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Extent reserved for a file of `len` bytes on its first parse.
    ///
    /// One unit holds the end-of-file position; `padding` absorbs
    /// positions the parser invents while recovering from errors.
    pub fn initial_extent(len: u64, padding: u64) -> u64 {
        len.saturating_add(1).saturating_add(padding)
    }

    /// Extent for a reparse after a file needed `required` positions but
    /// only had `extent`: the old extent plus twice the deficit.
    pub fn grown_extent(extent: u64, required: u64) -> u64 {
        let deficit = required.saturating_sub(extent);
        extent.saturating_add(deficit.saturating_mul(2))
    }

    /// Reserves one contiguous run holding a slice per extent, in order.
    pub fn allocate(&self, extents: &[u64]) -> Vec<Slot> {
        let total = extents.iter().sum::<u64>();
        let mut base = self.next.fetch_add(total, Ordering::Relaxed);
        extents
            .iter()
            .map(|&extent| {
                let slot = Slot {
                    base: Pos::from_raw(base),
                    extent,
                };
                base += extent;
                slot
            })
            .collect()
    }

    /// The base the next allocation will start at.
    pub fn next_base(&self) -> Pos {
        Pos::from_raw(self.next.load(Ordering::Relaxed))
    }
}

impl Default for PositionAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_after_none() {
        let alloc = PositionAllocator::new();
        let slots = alloc.allocate(&[10]);
        assert_eq!(slots[0].base, Pos::from_raw(1));
        assert!(slots[0].base.is_valid());
    }

    #[test]
    fn slots_are_contiguous_and_increasing() {
        let alloc = PositionAllocator::new();
        let slots = alloc.allocate(&[5, 7, 3]);
        assert_eq!(slots[0].end(), slots[1].base);
        assert_eq!(slots[1].end(), slots[2].base);
        assert_eq!(alloc.next_base(), slots[2].end());
    }

    #[test]
    fn space_is_never_reused() {
        let alloc = PositionAllocator::new();
        let first = alloc.allocate(&[100]);
        let second = alloc.allocate(&[100]);
        assert!(first[0].end() <= second[0].base);
    }

    #[test]
    fn empty_batch_allocates_nothing() {
        let alloc = PositionAllocator::new();
        assert!(alloc.allocate(&[]).is_empty());
        assert_eq!(alloc.next_base(), Pos::from_raw(1));
    }

    #[test]
    fn initial_extent_covers_content_and_padding() {
        assert_eq!(PositionAllocator::initial_extent(0, 0), 1);
        assert_eq!(PositionAllocator::initial_extent(42, 1000), 1043);
    }

    #[test]
    fn growth_doubles_the_deficit() {
        assert_eq!(PositionAllocator::grown_extent(10, 13), 16);
        assert!(PositionAllocator::grown_extent(10, 11) > 10);
        assert_eq!(PositionAllocator::grown_extent(10, 10), 10);
    }

    #[test]
    fn concurrent_allocations_do_not_overlap() {
        use std::sync::Arc;
        use std::thread;

        let alloc = Arc::new(PositionAllocator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let alloc = Arc::clone(&alloc);
                thread::spawn(move || alloc.allocate(&[3, 4, 5]))
            })
            .collect();
        let mut slots: Vec<Slot> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        slots.sort_by_key(|s| s.base);
        for pair in slots.windows(2) {
            assert!(pair[0].end() <= pair[1].base);
        }
    }
}
