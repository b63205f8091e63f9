//! Segment allocators

use crate::layout::Layout;
use crate::memory::Segment;
use std::cell::RefCell;
use std::fmt;

/// Source of zero-initialised native memory
pub trait SegmentAllocator {
    /// Allocate a zeroed segment that lives as long as the allocator borrow
    fn allocate(&self, layout: Layout) -> Segment<'_>;
}

/// Arena allocator; everything it hands out is freed when the arena drops
///
/// Allocations are 8-byte aligned, which covers every native layout the
/// binding layer describes.
#[derive(Default)]
pub struct Arena {
    blocks: RefCell<Vec<Vec<u64>>>,
}

impl Arena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocations made so far
    pub fn allocations(&self) -> usize {
        self.blocks.borrow().len()
    }
}

impl SegmentAllocator for Arena {
    fn allocate(&self, layout: Layout) -> Segment<'_> {
        debug_assert!(
            layout.align() <= std::mem::align_of::<u64>(),
            "arena cannot satisfy alignment {}",
            layout.align()
        );
        let mut block = vec![0u64; layout.size().div_ceil(8).max(1)];
        let ptr = block.as_mut_ptr().cast::<u8>();
        // Moving the Vec keeps its heap buffer in place.
        self.blocks.borrow_mut().push(block);
        // SAFETY: the block is owned by the arena for its whole lifetime and
        // holds at least `layout.size()` bytes
        unsafe { Segment::from_raw_parts(ptr, layout.size()) }
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("allocations", &self.allocations())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocations_are_zeroed() {
        let arena = Arena::new();
        let raw = arena.allocate(Layout::new(32, 8));
        assert_eq!(raw.len(), 32);
        assert!(raw.to_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_allocations_are_distinct() {
        let arena = Arena::new();
        let first = arena.allocate(Layout::new(4, 4));
        let second = arena.allocate(Layout::new(4, 4));
        first.set(0, 1u32);
        second.set(0, 2u32);
        assert_eq!(first.get::<u32>(0), 1);
        assert_eq!(arena.allocations(), 2);
    }

    #[test]
    fn test_allocations_are_aligned() {
        let arena = Arena::new();
        let raw = arena.allocate(Layout::new(3, 1));
        assert_eq!(raw.address().get() % 8, 0);
    }
}
