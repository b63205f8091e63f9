//! `lawu.toml` generator configuration
//!
//! ```toml
//! bindings = "src/sys.rs"
//! bindings_module = "crate::sys"
//! existing_sources = ["src"]
//!
//! [header]
//! module = "vulkan_h"
//! destination = "crate::vk"
//!
//! [[generate]]
//! source = "crate::sys"
//! destination = "crate::vk"
//!
//! [[mapping]]
//! native = "VkExtent3D"
//! target = "crate::extent::Extent"
//! ```

use crate::error::{WeldError, WeldResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default binding module path
pub const DEFAULT_BINDINGS_MODULE: &str = "crate::sys";
/// Default simple name of the header module
pub const DEFAULT_HEADER_MODULE: &str = "vulkan_h";

fn default_bindings_module() -> String {
    DEFAULT_BINDINGS_MODULE.to_string()
}

fn default_header_module() -> String {
    DEFAULT_HEADER_MODULE.to_string()
}

/// Top-level generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Binding source file
    pub bindings: PathBuf,
    #[serde(default = "default_bindings_module")]
    pub bindings_module: String,
    #[serde(default)]
    pub header: HeaderConfig,
    #[serde(default)]
    pub generate: Vec<Directive>,
    #[serde(default)]
    pub mapping: Vec<MappingOverride>,
    /// Roots scanned for existing types and `#[map_structure]` attributes
    #[serde(default)]
    pub existing_sources: Vec<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

/// Where header enums and flags come from and go to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderConfig {
    #[serde(default = "default_header_module")]
    pub module: String,
    /// Destination module; header requests are skipped without one
    pub destination: Option<String>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            module: default_header_module(),
            destination: None,
        }
    }
}

/// "Generate core types from this source module into this destination"
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Directive {
    pub source: String,
    pub destination: String,
}

/// An explicit native name to existing type mapping
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingOverride {
    pub native: String,
    pub target: String,
}

impl GeneratorConfig {
    /// Parse configuration text
    pub fn from_toml(text: &str) -> WeldResult<Self> {
        toml::from_str(text).map_err(|e| WeldError::config(e.to_string()))
    }

    /// Read a configuration file, resolving relative paths against its directory
    pub fn from_file(path: impl AsRef<Path>) -> WeldResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&text)
            .map_err(|e| WeldError::config(format!("{}: {}", path.display(), e)))?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.bindings);
        self.existing_sources.iter_mut().for_each(resolve);
        if let Some(out_dir) = self.out_dir.as_mut() {
            resolve(out_dir);
        }
    }
}
