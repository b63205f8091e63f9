//! Lawu-Weld: Vulkan structure wrapper generation for build scripts
//!
//! This crate reads a low-level Vulkan binding layer (native structures with
//! raw accessor functions, documented by their C declarations) and generates
//! idiomatic Rust value types with conversions to and from native memory,
//! plus enums and bit-flag enums for the header constants.
//!
//! # Architecture
//!
//! - `parse`: Parser for the C declaration snippets in binding documentation
//! - `binding`: The binding layer and the per-member accessor bindings
//! - `registry`: Native name to existing type or generation request mapping
//! - `classify`: Member shape classification
//! - `codegen`: Structure, enum, flag and index file generation
//! - `build`: Build script utilities
//!
//! # Usage
//!
//! In your crate's `build.rs`:
//!
//! ```rust,ignore
//! use lawu_weld::build::GeneratorBuilder;
//!
//! fn main() {
//!     GeneratorBuilder::new("src/sys.rs")
//!         .header_destination("crate::vk")
//!         .generate_core("crate::sys", "crate::vk")
//!         .scan_existing("src")
//!         .build()
//!         .expect("Failed to generate Vulkan wrappers");
//! }
//! ```
//!
//! And mount the output:
//!
//! ```rust,ignore
//! pub mod vk {
//!     include!(concat!(env!("OUT_DIR"), "/vk/mod.rs"));
//! }
//! ```

pub mod binding;
pub mod build;
pub mod classify;
pub mod codegen;
pub mod diagnostics;
pub mod error;
pub mod naming;
pub mod parse;
pub mod registry;

// Re-export commonly used types
pub use binding::{BindingLayer, NativeType, RustBindings};
pub use build::{GenerationReport, GeneratorBuilder, GeneratorConfig};
pub use classify::{classify_members, ClassifiedMember, MemberShape};
pub use codegen::{Artifact, EnumGenerator, IndexGenerator, StructureGenerator};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, DiagnosticsCollector};
pub use error::{Location, WeldError, WeldResult};
pub use parse::{parse_documentation, Declaration, Declarator, StructMember};
pub use registry::{Destination, GenerationRequest, MappingRegistry, NameMapping, RequestKind};
