//! Memory layouts
//!
//! A [`Layout`] describes the size and alignment of a native structure.
//! [`ValueLayout`] and [`AddressLayout`] describe the elements of fixed-size
//! native arrays. Binding layers expose one constant per native element type
//! (`uint32_t`, `float`, `VkPhysicalDevice`, ...) and generated code hands
//! those constants to the array conversions on [`Segment`](crate::Segment).

use crate::memory::Address;
use std::fmt;
use std::marker::PhantomData;
use std::mem;

mod private {
    pub trait Sealed {}
}

/// Plain-old-data values that can be read from any bit pattern
///
/// Sealed: implemented for the primitive integers, floats and [`Address`].
pub trait Scalar: Copy + fmt::Debug + private::Sealed + 'static {}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl private::Sealed for $ty {}
            impl Scalar for $ty {}
        )*
    };
}

impl_scalar!(u8, i8, u16, i16, u32, i32, u64, i64, usize, isize, f32, f64, Address);

/// Size and alignment of a native type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout {
    size: usize,
    align: usize,
}

impl Layout {
    /// Create a layout
    pub const fn new(size: usize, align: usize) -> Self {
        Self { size, align }
    }

    /// Layout of a Rust scalar
    pub const fn of<T: Scalar>() -> Self {
        Self::new(mem::size_of::<T>(), mem::align_of::<T>())
    }

    /// Size in bytes
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Alignment in bytes
    pub const fn align(&self) -> usize {
        self.align
    }
}

/// Element layout of a primitive native array
pub struct ValueLayout<T: Scalar> {
    _element: PhantomData<fn() -> T>,
}

impl<T: Scalar> ValueLayout<T> {
    /// Create the layout for `T`
    pub const fn new() -> Self {
        Self {
            _element: PhantomData,
        }
    }

    /// Size and alignment of one element
    pub const fn layout(&self) -> Layout {
        Layout::of::<T>()
    }
}

impl<T: Scalar> Default for ValueLayout<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Clone for ValueLayout<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Scalar> Copy for ValueLayout<T> {}

impl<T: Scalar> fmt::Debug for ValueLayout<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueLayout<{}>", std::any::type_name::<T>())
    }
}

/// Element layout of an array of native handles or pointers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressLayout;

impl AddressLayout {
    /// Size and alignment of one address
    pub const fn layout(&self) -> Layout {
        Layout::of::<Address>()
    }
}

pub const U8: ValueLayout<u8> = ValueLayout::new();
pub const I8: ValueLayout<i8> = ValueLayout::new();
pub const U16: ValueLayout<u16> = ValueLayout::new();
pub const I16: ValueLayout<i16> = ValueLayout::new();
pub const U32: ValueLayout<u32> = ValueLayout::new();
pub const I32: ValueLayout<i32> = ValueLayout::new();
pub const U64: ValueLayout<u64> = ValueLayout::new();
pub const I64: ValueLayout<i64> = ValueLayout::new();
pub const F32: ValueLayout<f32> = ValueLayout::new();
pub const F64: ValueLayout<f64> = ValueLayout::new();
pub const ADDRESS: AddressLayout = AddressLayout;
