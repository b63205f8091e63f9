//! The extensible `pNext` chain
//!
//! Chainable native structures start with a common header: a 32-bit
//! structure-type discriminant followed by a pointer-aligned link to the
//! next structure. Writing a chain only threads those link fields; reading
//! one walks the links, dispatching each node to the reader registered for
//! its discriminant. Reading never takes ownership of the nodes.

use crate::alloc::SegmentAllocator;
use crate::error::RawError;
use crate::layout::Layout;
use crate::memory::{Address, Segment};
use std::collections::HashSet;
use std::fmt;
use std::mem;

/// Offset of the link field inside every chainable structure
pub const LINK_OFFSET: usize = if mem::align_of::<usize>() > 4 {
    mem::align_of::<usize>()
} else {
    4
};

/// The header shared by every chainable structure
pub const HEADER: Layout = Layout::new(
    LINK_OFFSET + mem::size_of::<usize>(),
    mem::align_of::<usize>(),
);

/// A value that can be linked into a next chain
pub trait NextStructure: fmt::Debug {
    /// Discriminant written into the native header
    fn structure_type(&self) -> i32;

    /// Copy this value into freshly allocated native memory
    fn allocate_raw<'a>(&self, allocator: &'a dyn SegmentAllocator)
        -> Result<Segment<'a>, RawError>;
}

impl<T: NextStructure + ?Sized> NextStructure for Box<T> {
    fn structure_type(&self) -> i32 {
        (**self).structure_type()
    }

    fn allocate_raw<'a>(
        &self,
        allocator: &'a dyn SegmentAllocator,
    ) -> Result<Segment<'a>, RawError> {
        (**self).allocate_raw(allocator)
    }
}

/// Reads one concrete structure out of a chain
///
/// Readers are registered per chain, keyed by discriminant.
pub struct NextReader<T: ?Sized> {
    /// Discriminant this reader accepts
    pub structure_type: i32,
    /// Layout of the concrete native structure
    pub layout: Layout,
    /// Conversion from native memory
    pub read: fn(Segment<'_>) -> Result<Box<T>, RawError>,
}

impl<T: ?Sized> NextReader<T> {
    /// Create a reader
    pub const fn new(
        structure_type: i32,
        layout: Layout,
        read: fn(Segment<'_>) -> Result<Box<T>, RawError>,
    ) -> Self {
        Self {
            structure_type,
            layout,
            read,
        }
    }
}

impl<T: ?Sized> fmt::Debug for NextReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NextReader")
            .field("structure_type", &self.structure_type)
            .field("layout", &self.layout)
            .finish()
    }
}

/// Point each node's link at its successor and the last node's link at `tail`
///
/// Returns the address the chain now starts at; `tail` when `nodes` is empty.
pub fn thread_links(nodes: &[Segment<'_>], tail: Address) -> Address {
    let mut next = tail;
    for node in nodes.iter().rev() {
        node.set_address(LINK_OFFSET, next);
        next = node.address();
    }
    next
}

/// Convert `items` into native form and link them ahead of `tail`
///
/// For items `[A, B, C]` and an existing chain `H` the result is
/// `A -> B -> C -> H`, and the returned address is `A`'s.
pub fn link_chain<'n, 'a, N>(
    items: impl IntoIterator<Item = &'n N>,
    tail: Address,
    allocator: &'a dyn SegmentAllocator,
) -> Result<Address, RawError>
where
    N: NextStructure + ?Sized + 'n,
{
    let nodes = items
        .into_iter()
        .map(|item| item.allocate_raw(allocator))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(thread_links(&nodes, tail))
}

/// Walk a chain starting at `head`, reading every node with a known reader
///
/// Nodes without a registered reader are skipped. The walk stops at the
/// first null link.
///
/// # Safety
///
/// Every non-null link reachable from `head` must address a live chainable
/// structure at least as large as the layout of the reader chosen for it.
pub unsafe fn read_chain<T: ?Sized>(
    head: Address,
    readers: &[NextReader<T>],
) -> Result<Vec<Box<T>>, RawError> {
    let mut items = Vec::new();
    let mut visited = HashSet::new();
    let mut link = head;
    while !link.is_null() {
        if !visited.insert(link) {
            return Err(RawError::ChainCycle(link));
        }
        // SAFETY: the caller guarantees `link` addresses a chain header
        let header = unsafe { Segment::from_address(link, HEADER.size()) };
        let structure_type = header.get::<i32>(0);
        match readers.iter().find(|r| r.structure_type == structure_type) {
            Some(reader) => {
                // SAFETY: the caller guarantees the node matches its reader's layout
                let node = unsafe { Segment::from_address(link, reader.layout.size()) };
                items.push((reader.read)(node)?);
            }
            None => {
                tracing::debug!(structure_type, "skipping next structure with no reader");
            }
        }
        link = header.get_address(LINK_OFFSET);
    }
    Ok(items)
}
