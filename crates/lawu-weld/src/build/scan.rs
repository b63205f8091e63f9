//! Scan of the consuming crate for existing types
//!
//! Every `.rs` file under a scan root is parsed with `syn`. Public type
//! items are recorded by qualified name, and each `#[map_structure("Key")]`
//! attribute becomes an explicit mapping to the item it decorates.

use crate::error::{Location, WeldError, WeldResult};
use std::fs;
use std::path::{Component, Path, PathBuf};
use syn::spanned::Spanned;
use syn::{Attribute, Item, LitStr, Visibility};
use walkdir::WalkDir;

/// Name of the mapping attribute
pub const MAP_STRUCTURE_ATTRIBUTE: &str = "map_structure";

/// One `#[map_structure]` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedMapping {
    /// Native name, or `"<type> <member>"`
    pub key: String,
    /// Qualified path of the decorated item
    pub path: String,
    pub location: Location,
}

/// Everything found under the scan roots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingTypes {
    /// Qualified names of public types
    pub materialized: Vec<String>,
    pub mappings: Vec<ScannedMapping>,
    /// Files that were read
    pub files: Vec<PathBuf>,
}

impl ExistingTypes {
    /// Scan every root, in order
    pub fn scan(roots: &[PathBuf]) -> WeldResult<Self> {
        let mut existing = Self::default();
        for root in roots {
            existing.scan_root(root)?;
        }
        Ok(existing)
    }

    fn scan_root(&mut self, root: &Path) -> WeldResult<()> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "rs"))
            .collect();
        files.sort();

        for file in files {
            let Some(module) = module_path(root, &file) else {
                tracing::debug!(file = %file.display(), "skipping file outside the module tree");
                continue;
            };
            let source = fs::read_to_string(&file)?;
            self.scan_source(&source, &module, Some(&file))?;
            self.files.push(file);
        }
        Ok(())
    }

    /// Scan one file's source text mounted at `module`
    pub fn scan_source(&mut self, source: &str, module: &str, file: Option<&Path>) -> WeldResult<()> {
        let syntax = syn::parse_file(source).map_err(|e| WeldError::Syn {
            file: file.map(Path::to_path_buf).unwrap_or_default(),
            message: e.to_string(),
        })?;
        self.scan_items(&syntax.items, module, file)
    }

    fn scan_items(&mut self, items: &[Item], module: &str, file: Option<&Path>) -> WeldResult<()> {
        for item in items {
            let (ident, vis, attrs) = match item {
                Item::Struct(item) => (&item.ident, &item.vis, &item.attrs),
                Item::Enum(item) => (&item.ident, &item.vis, &item.attrs),
                Item::Type(item) => (&item.ident, &item.vis, &item.attrs),
                Item::Trait(item) => (&item.ident, &item.vis, &item.attrs),
                Item::Mod(item) => {
                    if let Some((_, content)) = &item.content {
                        let nested = format!("{}::{}", module, item.ident);
                        self.scan_items(content, &nested, file)?;
                    }
                    continue;
                }
                _ => continue,
            };

            let path = format!("{}::{}", module, ident);
            for attr in attrs.iter().filter(|attr| is_map_structure(attr)) {
                let key = attr.parse_args::<LitStr>().map_err(|e| WeldError::Syn {
                    file: file.map(Path::to_path_buf).unwrap_or_default(),
                    message: format!("invalid #[{}] on {}: {}", MAP_STRUCTURE_ATTRIBUTE, path, e),
                })?;
                let start = attr.span().start();
                tracing::debug!(key = %key.value(), path = %path, "found map_structure");
                self.mappings.push(ScannedMapping {
                    key: key.value(),
                    path: path.clone(),
                    location: Location {
                        file: file.map(Path::to_path_buf),
                        line: Some(start.line),
                        column: Some(start.column),
                    },
                });
            }
            if matches!(vis, Visibility::Public(_)) {
                self.materialized.push(path);
            }
        }
        Ok(())
    }
}

fn is_map_structure(attr: &Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == MAP_STRUCTURE_ATTRIBUTE)
}

/// Module path of a file below a crate source root
///
/// `lib.rs` and `main.rs` are the crate root, `a.rs` and `a/mod.rs` are
/// `crate::a`, `a/b.rs` is `crate::a::b`.
pub fn module_path(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_str()?.to_string()),
            _ => return None,
        }
    }

    let last = segments.pop()?;
    let stem = last.strip_suffix(".rs")?;
    let at_root = segments.is_empty();
    match stem {
        "lib" | "main" if at_root => {}
        "mod" if !at_root => {}
        "mod" => return None,
        _ => segments.push(stem.to_string()),
    }

    let mut path = String::from("crate");
    for segment in segments {
        path.push_str("::");
        path.push_str(&segment);
    }
    Some(path)
}
