//! The conversion contract shared by generated and hand-mapped structures

use crate::alloc::SegmentAllocator;
use crate::error::RawError;
use crate::layout::Layout;
use crate::memory::Segment;

/// A value type that converts to and from a native structure
///
/// Every generated structure implements this trait. Hand-written types that
/// are mapped over a native structure implement it too, so generated members
/// of that type can delegate to them.
pub trait Structure: Sized {
    /// Layout of the native structure
    fn layout() -> Layout;

    /// Read a value out of native memory
    fn of(raw: Segment<'_>) -> Result<Self, RawError>;

    /// Write this value into native memory
    ///
    /// Members that need their own native storage (strings, chains) take it
    /// from `allocator`, so `destination` only stays valid alongside it.
    fn write_raw<'a>(
        &self,
        destination: Segment<'a>,
        allocator: &'a dyn SegmentAllocator,
    ) -> Result<(), RawError>;

    /// Allocate native memory for this value and write it there
    fn as_raw<'a>(&self, allocator: &'a dyn SegmentAllocator) -> Result<Segment<'a>, RawError> {
        let raw = allocator.allocate(Self::layout());
        self.write_raw(raw, allocator)?;
        Ok(raw)
    }
}

/// Provenance attached to every generated type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generated {
    /// Generator that produced the type
    pub generator: &'static str,
    /// RFC 3339 generation timestamp
    pub date: &'static str,
    /// Native name the type was generated from
    pub source: &'static str,
}

/// Read every element of a fixed structure array
pub fn read_elements<T: Structure>(raw: Segment<'_>) -> Result<Vec<T>, RawError> {
    raw.elements(T::layout()).map(T::of).collect()
}

/// Write a fixed structure array; `values` must fill it exactly
pub fn write_elements<'a, T: Structure>(
    destination: Segment<'a>,
    values: &[T],
    allocator: &'a dyn SegmentAllocator,
) -> Result<(), RawError> {
    let expected = destination.elements(T::layout()).count();
    if values.len() != expected {
        return Err(RawError::LengthMismatch {
            expected,
            found: values.len(),
        });
    }
    for (element, value) in destination.elements(T::layout()).zip(values) {
        value.write_raw(element, allocator)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::Arena;

    #[derive(Debug, PartialEq)]
    struct Pair {
        first: u32,
        second: u32,
    }

    impl Structure for Pair {
        fn layout() -> Layout {
            Layout::new(8, 4)
        }

        fn of(raw: Segment<'_>) -> Result<Self, RawError> {
            Ok(Self {
                first: raw.get(0),
                second: raw.get(4),
            })
        }

        fn write_raw<'a>(
            &self,
            destination: Segment<'a>,
            _allocator: &'a dyn SegmentAllocator,
        ) -> Result<(), RawError> {
            destination.set(0, self.first);
            destination.set(4, self.second);
            Ok(())
        }
    }

    #[test]
    fn test_as_raw_allocates_and_writes() {
        let arena = Arena::new();
        let pair = Pair {
            first: 3,
            second: 4,
        };
        let raw = pair.as_raw(&arena).unwrap();
        assert_eq!(raw.len(), 8);
        assert_eq!(Pair::of(raw).unwrap(), pair);
    }

    #[test]
    fn test_elements_round_trip() {
        let arena = Arena::new();
        let raw = arena.allocate(Layout::new(16, 4));
        let pairs = vec![
            Pair {
                first: 1,
                second: 2,
            },
            Pair {
                first: 3,
                second: 4,
            },
        ];
        write_elements(raw, &pairs, &arena).unwrap();
        assert_eq!(read_elements::<Pair>(raw).unwrap(), pairs);

        let err = write_elements(raw, &pairs[..1], &arena).unwrap_err();
        assert_eq!(
            err,
            RawError::LengthMismatch {
                expected: 2,
                found: 1
            }
        );
    }
}
