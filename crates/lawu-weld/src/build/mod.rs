//! Build utilities for crates that embed generated wrappers
//!
//! This module provides what a build.rs script needs:
//! - `lawu.toml` configuration
//! - Scanning the crate for existing types and `#[map_structure]`
//! - GeneratorBuilder for a complete generator run

pub mod config;
pub mod generator;
pub mod scan;

pub use config::{Directive, GeneratorConfig, HeaderConfig, MappingOverride};
pub use generator::{populate_registry, GenerationReport, Generator, GeneratorBuilder};
pub use scan::{module_path, ExistingTypes, ScannedMapping, MAP_STRUCTURE_ATTRIBUTE};
