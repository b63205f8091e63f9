//! The import table of one generated file
//!
//! Paths are collected first and rendered afterwards, so every name used in
//! the body is known before the `use` block is written.

use indexmap::IndexMap;
use std::collections::HashMap;

/// Import group, in rendering order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Group {
    Std,
    External,
    Local,
}

fn group_of(path: &str) -> Group {
    match path.split("::").next() {
        Some("std" | "core" | "alloc") => Group::Std,
        Some("crate" | "super" | "self") => Group::Local,
        _ => Group::External,
    }
}

/// Whether a type string is a plain path that can be imported
fn is_importable(path: &str) -> bool {
    path.contains("::")
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn simple_name(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Imported paths and the simple names they claim
#[derive(Debug, Default)]
pub struct ImportTable {
    /// Imported path to the simple name it is used by
    imported: IndexMap<String, String>,
    /// Simple name to the path (or local item) that owns it
    claimed: HashMap<String, String>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a simple name for an item declared in the file itself
    pub fn reserve(&mut self, local: &str) {
        self.claimed
            .entry(local.to_string())
            .or_insert_with(|| format!("self::{}", local));
    }

    /// Import a path; a simple name already claimed by another path stays qualified
    pub fn require(&mut self, path: &str) {
        if !is_importable(path) || self.imported.contains_key(path) {
            return;
        }
        let name = simple_name(path);
        match self.claimed.get(name) {
            Some(owner) if owner != path => {}
            _ => {
                self.claimed.insert(name.to_string(), path.to_string());
                self.imported.insert(path.to_string(), name.to_string());
            }
        }
    }

    /// How the body refers to a path
    pub fn name(&self, path: &str) -> String {
        match self.imported.get(path) {
            Some(name) => name.clone(),
            None => path.to_string(),
        }
    }

    /// Reference to an item inside an imported module (`vulkan_h::uint32_t`)
    pub fn member(&self, path: &str) -> String {
        match path.rsplit_once("::") {
            Some((module, item)) if self.imported.contains_key(module) => {
                format!("{}::{}", self.name(module), item)
            }
            _ => path.to_string(),
        }
    }

    /// Render the `use` block, grouped, sorted and merged per parent module
    pub fn render(&self) -> String {
        let mut groups: IndexMap<Group, IndexMap<String, Vec<String>>> = IndexMap::new();
        let mut paths: Vec<&String> = self.imported.keys().collect();
        paths.sort();
        paths.dedup();

        for path in paths {
            let Some((parent, item)) = path.rsplit_once("::") else {
                continue;
            };
            groups
                .entry(group_of(path))
                .or_default()
                .entry(parent.to_string())
                .or_default()
                .push(item.to_string());
        }
        groups.sort_keys();

        let mut blocks = Vec::new();
        for (_, parents) in groups {
            let mut lines = Vec::new();
            for (parent, items) in parents {
                match items.as_slice() {
                    [item] => lines.push(format!("use {}::{};", parent, item)),
                    _ => lines.push(format!("use {}::{{{}}};", parent, items.join(", "))),
                }
            }
            blocks.push(lines.join("\n"));
        }
        blocks.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_groups() {
        let mut table = ImportTable::new();
        table.require("lawu_runtime::Segment");
        table.require("crate::sys::VkExtent3D");
        table.require("std::mem::transmute");
        table.require("lawu_runtime::RawError");
        table.require("linkme::distributed_slice");
        table.require("lawu_runtime::Segment");
        table.require("u32");

        assert_eq!(
            table.render(),
            "use std::mem::transmute;\n\n\
             use lawu_runtime::{RawError, Segment};\n\
             use linkme::distributed_slice;\n\n\
             use crate::sys::VkExtent3D;"
        );
        assert_eq!(table.name("lawu_runtime::Segment"), "Segment");
        assert_eq!(table.name("u32"), "u32");
    }

    #[test]
    fn test_collisions_stay_qualified() {
        let mut table = ImportTable::new();
        table.reserve("Extent3d");
        table.require("crate::other::Extent3d");
        table.require("crate::a::Limits");
        table.require("crate::b::Limits");

        assert_eq!(table.name("crate::other::Extent3d"), "crate::other::Extent3d");
        assert_eq!(table.name("crate::a::Limits"), "Limits");
        assert_eq!(table.name("crate::b::Limits"), "crate::b::Limits");
        assert_eq!(table.render(), "use crate::a::Limits;");
    }

    #[test]
    fn test_member_of_imported_module() {
        let mut table = ImportTable::new();
        table.require("crate::sys::vulkan_h");
        assert_eq!(table.member("crate::sys::vulkan_h::uint32_t"), "vulkan_h::uint32_t");
        assert_eq!(table.member("lawu_runtime::layout::F32"), "lawu_runtime::layout::F32");
    }
}
