//! Conversion errors raised by generated code

use crate::memory::Address;
use thiserror::Error;

/// Errors that can occur while converting between raw memory and values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RawError {
    /// Text plus its terminator does not fit the fixed buffer
    #[error("Text of {len} bytes does not fit a buffer holding {capacity}")]
    TextTooLong { len: usize, capacity: usize },

    /// Text contains a NUL byte before its end
    #[error("Text contains an interior NUL byte")]
    InteriorNul,

    /// Native text buffer is not valid UTF-8
    #[error("Native text is not valid UTF-8")]
    InvalidText,

    /// Fixed array written with the wrong number of elements
    #[error("Expected {expected} elements, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Native value with no matching enumerator or flag
    #[error("Unknown {type_name} value: {value}")]
    UnknownValue { type_name: &'static str, value: i64 },

    /// A next chain links back to a node already visited
    #[error("Next chain cycles back to {0:?}")]
    ChainCycle(Address),

    /// A structure placed in a next chain carries a chain of its own
    #[error("Structure type {structure_type} carries its own next chain inside another chain")]
    NestedChain { structure_type: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_value_message() {
        let err = RawError::UnknownValue {
            type_name: "QueueFlag",
            value: 64,
        };
        assert_eq!(err.to_string(), "Unknown QueueFlag value: 64");
    }

    #[test]
    fn test_text_too_long_message() {
        let err = RawError::TextTooLong {
            len: 300,
            capacity: 255,
        };
        assert!(err.to_string().contains("300"));
        assert!(err.to_string().contains("255"));
    }

    #[test]
    fn test_nested_chain_message() {
        let err = RawError::NestedChain {
            structure_type: 1000168000,
        };
        assert!(err.to_string().contains("1000168000"));
    }
}
