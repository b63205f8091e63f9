//! Raw memory windows
//!
//! A [`Segment`] is a zero-copy window over native memory that something
//! else owns: an [`Arena`](crate::Arena), a driver, or a caller-provided
//! buffer. Creating a segment from a raw pointer is `unsafe`; every access
//! after that is bounds checked and panics on out-of-range offsets, the same
//! way slice indexing does.

use crate::error::RawError;
use crate::layout::{AddressLayout, Layout, Scalar, ValueLayout};
use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr;
use std::slice;

/// An untyped, pointer-sized native reference
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(usize);

impl Address {
    /// The null address
    pub const NULL: Address = Address(0);

    /// Wrap a raw address value
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// The raw address value
    pub const fn get(self) -> usize {
        self.0
    }

    /// Whether this is the null address
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:#x})", self.0)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// A bounds-checked window over raw memory
#[derive(Clone, Copy)]
pub struct Segment<'a> {
    ptr: *mut u8,
    len: usize,
    _memory: PhantomData<&'a Cell<u8>>,
}

impl Segment<'static> {
    /// The empty segment at the null address
    pub const NULL: Segment<'static> = Segment {
        ptr: ptr::null_mut(),
        len: 0,
        _memory: PhantomData,
    };
}

impl<'a> Segment<'a> {
    /// Create a segment over `len` bytes starting at `ptr`
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `len` bytes for `'a`, and
    /// no Rust reference to that memory may be live while the segment is used.
    pub unsafe fn from_raw_parts(ptr: *mut u8, len: usize) -> Self {
        Self {
            ptr,
            len,
            _memory: PhantomData,
        }
    }

    /// Create a segment over `len` bytes at a native address
    ///
    /// # Safety
    ///
    /// Same contract as [`Segment::from_raw_parts`].
    pub unsafe fn from_address(address: Address, len: usize) -> Self {
        unsafe { Self::from_raw_parts(address.get() as *mut u8, len) }
    }

    /// Address of the first byte
    pub fn address(&self) -> Address {
        Address(self.ptr as usize)
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the segment is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the segment starts at the null address
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    fn check(&self, offset: usize, len: usize) {
        let in_bounds = offset.checked_add(len).is_some_and(|end| end <= self.len);
        assert!(
            in_bounds,
            "segment access out of bounds: {}..{} in a segment of {} bytes",
            offset,
            offset.saturating_add(len),
            self.len
        );
    }

    /// Sub-window of `len` bytes starting at `offset`
    ///
    /// # Panics
    ///
    /// Panics if the range is not inside this segment.
    pub fn slice(&self, offset: usize, len: usize) -> Segment<'a> {
        self.check(offset, len);
        Segment {
            // SAFETY: the range was checked against this segment
            ptr: unsafe { self.ptr.add(offset) },
            len,
            _memory: PhantomData,
        }
    }

    /// Read a scalar at `offset`
    pub fn get<T: Scalar>(&self, offset: usize) -> T {
        self.check(offset, mem::size_of::<T>());
        // SAFETY: bounds checked; scalars are valid for every bit pattern
        unsafe { ptr::read_unaligned(self.ptr.add(offset).cast::<T>()) }
    }

    /// Write a scalar at `offset`
    pub fn set<T: Scalar>(&self, offset: usize, value: T) {
        self.check(offset, mem::size_of::<T>());
        // SAFETY: bounds checked
        unsafe { ptr::write_unaligned(self.ptr.add(offset).cast::<T>(), value) }
    }

    /// Read an address at `offset`
    pub fn get_address(&self, offset: usize) -> Address {
        self.get(offset)
    }

    /// Write an address at `offset`
    pub fn set_address(&self, offset: usize, value: Address) {
        self.set(offset, value)
    }

    /// Consecutive element windows of `layout.size()` bytes
    pub fn elements(&self, layout: Layout) -> Elements<'a> {
        Elements {
            segment: *self,
            stride: layout.size(),
            offset: 0,
        }
    }

    /// Copy a primitive array out of the segment
    pub fn to_vec<T: Scalar>(&self, layout: ValueLayout<T>) -> Vec<T> {
        self.elements(layout.layout())
            .map(|element| element.get(0))
            .collect()
    }

    /// Overwrite the segment with a primitive array of exactly matching length
    pub fn copy_from_values<T: Scalar>(
        &self,
        layout: ValueLayout<T>,
        values: &[T],
    ) -> Result<(), RawError> {
        self.copy_elements(layout.layout(), values)
    }

    /// Copy an array of addresses out of the segment
    pub fn to_addresses(&self, layout: AddressLayout) -> Vec<Address> {
        self.elements(layout.layout())
            .map(|element| element.get_address(0))
            .collect()
    }

    /// Overwrite the segment with an address array of exactly matching length
    pub fn copy_from_addresses(
        &self,
        layout: AddressLayout,
        values: &[Address],
    ) -> Result<(), RawError> {
        self.copy_elements(layout.layout(), values)
    }

    fn copy_elements<T: Scalar>(&self, layout: Layout, values: &[T]) -> Result<(), RawError> {
        let expected = self.elements(layout).count();
        if values.len() != expected {
            return Err(RawError::LengthMismatch {
                expected,
                found: values.len(),
            });
        }
        for (element, value) in self.elements(layout).zip(values) {
            element.set(0, *value);
        }
        Ok(())
    }

    /// Copy the bytes of the segment
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.len == 0 {
            return Vec::new();
        }
        // SAFETY: the constructor contract covers `len` readable bytes
        unsafe { slice::from_raw_parts(self.ptr, self.len) }.to_vec()
    }

    /// Copy `source` into the start of this segment
    ///
    /// # Panics
    ///
    /// Panics if `source` is longer than this segment.
    pub fn copy_from(&self, source: Segment<'_>) {
        self.check(0, source.len);
        if source.len == 0 {
            return;
        }
        // SAFETY: both ranges are valid for `source.len` bytes; `copy` allows overlap
        unsafe { ptr::copy(source.ptr, self.ptr, source.len) }
    }

    /// Decode NUL-terminated UTF-8 text
    ///
    /// A buffer with no terminator is read to its end.
    pub fn read_c_str(&self) -> Result<String, RawError> {
        let mut bytes = self.to_bytes();
        if let Some(end) = bytes.iter().position(|&b| b == 0) {
            bytes.truncate(end);
        }
        String::from_utf8(bytes).map_err(|_| RawError::InvalidText)
    }

    /// Encode text plus a NUL terminator, zero-filling the rest of the buffer
    pub fn write_c_str(&self, text: &str) -> Result<(), RawError> {
        let bytes = text.as_bytes();
        if bytes.contains(&0) {
            return Err(RawError::InteriorNul);
        }
        if bytes.len() >= self.len {
            return Err(RawError::TextTooLong {
                len: bytes.len(),
                capacity: self.len.saturating_sub(1),
            });
        }
        // SAFETY: `bytes.len() < self.len`, checked above
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), self.ptr, bytes.len());
            ptr::write_bytes(self.ptr.add(bytes.len()), 0, self.len - bytes.len());
        }
        Ok(())
    }
}

impl fmt::Debug for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("address", &self.address())
            .field("len", &self.len)
            .finish()
    }
}

/// Iterator over the element windows of a segment
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    segment: Segment<'a>,
    stride: usize,
    offset: usize,
}

impl<'a> Iterator for Elements<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stride == 0 || self.offset + self.stride > self.segment.len {
            return None;
        }
        let element = self.segment.slice(self.offset, self.stride);
        self.offset += self.stride;
        Some(element)
    }
}
