//! Proc macros for lawu-weld
//!
//! Provides the attribute that marks an existing type as the Rust
//! representation of a native name. The attribute expands to nothing; the
//! generator finds it by scanning the crate sources in its build script.
//!
//! # Usage
//!
//! ```text
//! use lawu_weld_macro::map_structure;
//!
//! #[map_structure("uint8_t pipelineCacheUUID")]
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub struct PipelineCacheUuid(pub [u8; 16]);
//! ```

use proc_macro::TokenStream;

mod map_structure;

/// Attribute macro mapping a native name to the decorated type
///
/// The key is either a native type name (`"VkExtent3D"`) or a
/// `"<element type> <member>"` pair for one array member
/// (`"uint8_t pipelineCacheUUID"`).
///
/// This macro:
/// 1. Checks that the key is a non-empty string literal
/// 2. Checks that it decorates a struct, enum, type alias or trait
/// 3. Leaves the item unchanged
///
/// # Example
/// ```text
/// #[map_structure("VkExtent3D")]
/// pub struct Extent {
///     pub width: u32,
///     pub height: u32,
///     pub depth: u32,
/// }
/// ```
#[proc_macro_attribute]
pub fn map_structure(attr: TokenStream, item: TokenStream) -> TokenStream {
    map_structure::map_structure_impl(attr.into(), item.into()).into()
}
