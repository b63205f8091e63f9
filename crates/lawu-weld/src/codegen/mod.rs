//! Code generation for lawu wrapper types
//!
//! This module provides generators for:
//! - Structure files (value type, native view, conversions)
//! - Enum and bit-flag files derived from header constants
//! - The per-destination index that mounts every generated file
//!
//! Generators collect every referenced path into an [`ImportTable`] before
//! rendering, so the `use` block is final by the time the body is written.

mod enums;
mod imports;
mod index;
mod structure;

pub use enums::EnumGenerator;
pub use imports::ImportTable;
pub use index::{module_directory, IndexGenerator};
pub use structure::StructureGenerator;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name recorded as the generator in every provenance block
pub const GENERATOR: &str = "lawu-weld";

/// Paths of the runtime items generated code refers to
pub mod runtime {
    pub const ADDRESS: &str = "lawu_runtime::Address";
    pub const BIT_FLAG: &str = "lawu_runtime::BitFlag";
    pub const FLAG_FROM_BIT: &str = "lawu_runtime::flag_from_bit";
    pub const FLAG_SET: &str = "lawu_runtime::FlagSet";
    pub const GENERATED: &str = "lawu_runtime::Generated";
    pub const LAYOUT: &str = "lawu_runtime::Layout";
    pub const LINK_CHAIN: &str = "lawu_runtime::link_chain";
    pub const NEXT_READER: &str = "lawu_runtime::NextReader";
    pub const NEXT_STRUCTURE: &str = "lawu_runtime::NextStructure";
    pub const RAW_ERROR: &str = "lawu_runtime::RawError";
    pub const READ_CHAIN: &str = "lawu_runtime::read_chain";
    pub const READ_ELEMENTS: &str = "lawu_runtime::read_elements";
    pub const SEGMENT: &str = "lawu_runtime::Segment";
    pub const SEGMENT_ALLOCATOR: &str = "lawu_runtime::SegmentAllocator";
    pub const STRUCTURE: &str = "lawu_runtime::Structure";
    pub const WRITE_ELEMENTS: &str = "lawu_runtime::write_elements";

    pub const F32_LAYOUT: &str = "lawu_runtime::layout::F32";
    pub const F64_LAYOUT: &str = "lawu_runtime::layout::F64";

    pub const TRANSMUTE: &str = "std::mem::transmute";
    pub const DISTRIBUTED_SLICE: &str = "linkme::distributed_slice";
}

/// A file written by the generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Native name the file was generated from
    pub native: String,
    /// Module the file belongs to (`crate::vk`)
    pub module: String,
    /// Public names the file declares
    pub exports: Vec<String>,
    pub path: PathBuf,
}

/// First line of every generated file
pub fn generated_header(native: &str) -> String {
    format!("// @generated by {} from {}. Do not edit.\n", GENERATOR, native)
}

/// The `GENERATED` constant, indented for an impl block
pub(crate) fn generated_constant(imports: &ImportTable, date: &str, native: &str) -> String {
    let generated = imports.name(runtime::GENERATED);
    format!(
        "    pub const GENERATED: {generated} = {generated} {{\n        \
             generator: {generator:?},\n        \
             date: {date:?},\n        \
             source: {native:?},\n    \
         }};\n",
        generated = generated,
        generator = GENERATOR,
        date = date,
        native = native,
    )
}

/// Indent every non-empty line after the first by `width` spaces
pub(crate) fn indent_tail(text: &str, width: usize) -> String {
    let padding = " ".repeat(width);
    let mut lines = text.lines();
    let mut output = lines.next().unwrap_or_default().to_string();
    for line in lines {
        output.push('\n');
        if !line.is_empty() {
            output.push_str(&padding);
            output.push_str(line);
        }
    }
    output
}

/// Indent every non-empty line by `width` spaces
pub(crate) fn indent(text: &str, width: usize) -> String {
    let padding = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", padding, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `contents` to `path` all at once
///
/// The text goes to a temporary file in the same directory, which then
/// replaces `path`; a failure leaves any previous file untouched.
pub fn write_atomically(path: &Path, contents: &str) -> io::Result<()> {
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(directory)?;
    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|err| err.error)?;
    tracing::info!(path = %path.display(), "wrote generated file");
    Ok(())
}
