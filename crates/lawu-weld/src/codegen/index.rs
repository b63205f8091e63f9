//! Index file generator
//!
//! The index mounts every file of one destination module, so the consuming
//! crate only needs:
//!
//! ```rust,ignore
//! pub mod vk {
//!     include!(concat!(env!("OUT_DIR"), "/vk/mod.rs"));
//! }
//! ```

use super::{Artifact, GENERATOR};
use std::path::PathBuf;

/// Directory of a destination module inside the output directory
///
/// Every segment after `crate` becomes a directory, so `crate::a::vk` and
/// `crate::b::vk` never share output.
pub fn module_directory(module: &str) -> PathBuf {
    module
        .split("::")
        .skip_while(|segment| *segment == "crate")
        .collect()
}

/// Generator for the `mod.rs` of one destination module
pub struct IndexGenerator<'a> {
    module: &'a str,
    artifacts: Vec<&'a Artifact>,
}

impl<'a> IndexGenerator<'a> {
    /// Index the artifacts that belong to `module`
    pub fn new(module: &'a str, artifacts: &'a [Artifact]) -> Self {
        let mut artifacts: Vec<&Artifact> = artifacts
            .iter()
            .filter(|artifact| artifact.module == module)
            .collect();
        artifacts.sort_by(|a, b| a.path.cmp(&b.path));
        Self { module, artifacts }
    }

    /// Directory of the module inside the output directory
    pub fn directory(&self) -> PathBuf {
        module_directory(self.module)
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Generate the complete index
    pub fn generate(&self) -> String {
        let mut output = format!(
            "// @generated by {} for `{}`. Do not edit.\n",
            GENERATOR, self.module
        );

        for artifact in &self.artifacts {
            let Some(stem) = artifact.path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            output.push('\n');
            output.push_str(&format!(
                "#[path = {:?}]\nmod {};\n",
                artifact.path.display().to_string(),
                stem
            ));
            match artifact.exports.as_slice() {
                [] => {}
                [single] => output.push_str(&format!("pub use self::{}::{};\n", stem, single)),
                exports => output.push_str(&format!(
                    "pub use self::{}::{{{}}};\n",
                    stem,
                    exports.join(", ")
                )),
            }
        }

        output
    }
}
