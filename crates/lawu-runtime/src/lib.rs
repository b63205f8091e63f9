//! Lawu-Runtime: support library for lawu-weld generated code
//!
//! Generated wrapper types convert between an owned "value" representation
//! and raw native memory. This crate provides the pieces that conversion
//! is built from.
//!
//! # Architecture
//!
//! - `memory`: raw addresses and bounds-checked memory windows
//! - `layout`: sizes, alignments and the named element layouts
//! - `alloc`: segment allocators, including the arena used by `as_raw`
//! - `structure`: the conversion trait every generated structure implements
//! - `flags`: single-bit flags and packed flag sets
//! - `next`: the extensible `pNext` chain
//!
//! # Usage
//!
//! ```rust,ignore
//! use lawu_runtime::{Arena, Structure};
//!
//! let arena = Arena::new();
//! let raw = extent.as_raw(&arena)?;
//! assert_eq!(Extent3d::of(raw)?, extent);
//! ```

pub mod alloc;
pub mod error;
pub mod flags;
pub mod layout;
pub mod memory;
pub mod next;
pub mod structure;

pub use alloc::{Arena, SegmentAllocator};
pub use error::RawError;
pub use flags::{flag_from_bit, BitFlag, FlagSet};
pub use layout::{AddressLayout, Layout, Scalar, ValueLayout};
pub use memory::{Address, Elements, Segment};
pub use next::{link_chain, read_chain, thread_links, NextReader, NextStructure};
pub use structure::{read_elements, write_elements, Generated, Structure};
