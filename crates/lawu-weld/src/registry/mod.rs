//! The run-scoped table resolving native names
//!
//! Every native name maps to at most one [`NameMapping`]: an existing type,
//! a function-pointer type, or a pending generation request. The registry is
//! filled during the scan phase and only read afterwards.

mod header;

pub use header::{add_header_requests, variant_names};

use crate::binding::HeaderConstant;
use crate::diagnostics::Diagnostic;
use crate::error::{Location, WeldError, WeldResult};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;

/// Code of the note recorded when a request is skipped or redirected
pub const SKIPPED_REQUEST: &str = "N0001";

/// Where a generated type lands
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    /// Module path (`crate::vk`)
    pub module: String,
    /// Type name (`Extent3d`)
    pub name: String,
}

impl Destination {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    /// `crate::vk::Extent3d`
    pub fn qualified(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)
    }
}

/// Payload of a generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Structure,
    /// Single-bit constants, in header order
    BitFlag {
        flags: Vec<HeaderConstant>,
        value_type: String,
    },
    /// Enumerator constants, in header order
    Enum {
        constants: Vec<HeaderConstant>,
        value_type: String,
    },
}

impl RequestKind {
    fn describe(&self) -> &'static str {
        match self {
            RequestKind::Structure => "structure",
            RequestKind::BitFlag { .. } => "bit-flag",
            RequestKind::Enum { .. } => "enum",
        }
    }
}

/// A pending instruction to emit one generated type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub native: String,
    /// Module the native declaration comes from
    pub source_module: String,
    pub destination: Destination,
    pub kind: RequestKind,
    pub location: Location,
}

/// What a native name resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMapping {
    /// A type that already exists in the crate
    Existing {
        native: String,
        name: String,
        path: String,
    },
    /// An existing type standing in for something the registry held before
    Replacement {
        native: String,
        name: String,
        path: String,
        replaced: Box<NameMapping>,
    },
    /// A native function-pointer type, used as-is
    FunctionPointer { native: String, path: String },
    /// A type to generate
    Request(GenerationRequest),
    /// A `...FlagBits` type read as one flag of the named flags type
    FlagBits { native: String, flags: String },
}

impl NameMapping {
    pub fn native(&self) -> &str {
        match self {
            NameMapping::Existing { native, .. }
            | NameMapping::Replacement { native, .. }
            | NameMapping::FunctionPointer { native, .. }
            | NameMapping::FlagBits { native, .. } => native,
            NameMapping::Request(request) => &request.native,
        }
    }

    /// Qualified path of the existing type this name maps to
    pub fn existing_path(&self) -> Option<&str> {
        match self {
            NameMapping::Existing { path, .. } | NameMapping::Replacement { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }

    /// Qualified path of the structure type this name maps to, existing or generated
    pub fn structure_path(&self) -> Option<String> {
        match self {
            NameMapping::Existing { path, .. } | NameMapping::Replacement { path, .. } => {
                Some(path.clone())
            }
            NameMapping::Request(GenerationRequest {
                kind: RequestKind::Structure,
                destination,
                ..
            }) => Some(destination.qualified()),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            NameMapping::Existing { path, .. } => format!("existing type `{}`", path),
            NameMapping::Replacement { path, .. } => format!("replacement `{}`", path),
            NameMapping::FunctionPointer { path, .. } => format!("function pointer `{}`", path),
            NameMapping::Request(request) => format!(
                "{} request for `{}`",
                request.kind.describe(),
                request.destination
            ),
            NameMapping::FlagBits { flags, .. } => format!("flag bits of `{}`", flags),
        }
    }
}

/// Simple name of a qualified path
fn simple_name(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Native name to mapping, in insertion order
#[derive(Debug, Default)]
pub struct MappingRegistry {
    mappings: IndexMap<String, NameMapping>,
    /// Qualified destination name to the native name that claimed it
    destinations: IndexMap<String, String>,
    /// Qualified names already present in the crate
    materialized: HashSet<String>,
    notes: Vec<Diagnostic>,
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record qualified type names that already exist in the crate
    pub fn with_materialized(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.materialized.extend(names);
        self
    }

    /// Map a native name to an existing type
    ///
    /// A pending structure request or function-pointer entry is replaced; a
    /// pending bit-flag or enum request is dropped in favour of the type.
    pub fn add_mapping(&mut self, native: &str, path: &str) -> WeldResult<()> {
        let name = simple_name(path).to_string();
        let existing = NameMapping::Existing {
            native: native.to_string(),
            name: name.clone(),
            path: path.to_string(),
        };

        let mapping = match self.mappings.shift_remove(native) {
            None => existing,
            Some(
                replaced @ NameMapping::Request(GenerationRequest {
                    kind: RequestKind::Structure,
                    ..
                }),
            ) => {
                self.release_destination(&replaced);
                self.note(format!(
                    "{} is mapped to `{}`; dropping its structure request",
                    native, path
                ));
                NameMapping::Replacement {
                    native: native.to_string(),
                    name,
                    path: path.to_string(),
                    replaced: Box::new(replaced),
                }
            }
            Some(replaced @ NameMapping::FunctionPointer { .. }) => NameMapping::Replacement {
                native: native.to_string(),
                name,
                path: path.to_string(),
                replaced: Box::new(replaced),
            },
            Some(replaced @ NameMapping::Request(_)) => {
                self.release_destination(&replaced);
                self.note(format!(
                    "{} is mapped to `{}`; dropping its {}",
                    native,
                    path,
                    replaced.describe()
                ));
                existing
            }
            Some(other) => {
                let message = format!("already mapped to {}", other.describe());
                self.mappings.insert(native.to_string(), other);
                return Err(WeldError::duplicate_mapping(native, message));
            }
        };

        tracing::debug!(native, path, "registered mapping");
        self.mappings.insert(native.to_string(), mapping);
        Ok(())
    }

    /// Register a native function-pointer type
    pub fn add_function_pointer(&mut self, native: &str, path: &str) -> WeldResult<()> {
        match self.mappings.get(native) {
            None => {
                self.mappings.insert(
                    native.to_string(),
                    NameMapping::FunctionPointer {
                        native: native.to_string(),
                        path: path.to_string(),
                    },
                );
            }
            Some(NameMapping::Existing { name, path: existing, .. }) => {
                let replacement = NameMapping::Replacement {
                    native: native.to_string(),
                    name: name.clone(),
                    path: existing.clone(),
                    replaced: Box::new(NameMapping::FunctionPointer {
                        native: native.to_string(),
                        path: path.to_string(),
                    }),
                };
                self.mappings.insert(native.to_string(), replacement);
            }
            Some(other) => {
                return Err(WeldError::duplicate_mapping(
                    native,
                    format!("already mapped to {}", other.describe()),
                ))
            }
        }
        tracing::debug!(native, path, "registered function pointer");
        Ok(())
    }

    /// Queue a generation request
    ///
    /// A native name that is already mapped to an existing type is skipped
    /// with a note. A destination that already exists in the crate turns
    /// the request into a mapping to it.
    pub fn add_request(&mut self, request: GenerationRequest) -> WeldResult<()> {
        let native = request.native.clone();
        if let Some(mapping) = self.mappings.get(&native) {
            if let Some(path) = mapping.existing_path() {
                let message = format!(
                    "{} is already mapped to `{}`; skipping its {} request",
                    native,
                    path,
                    request.kind.describe()
                );
                self.note(message);
                return Ok(());
            }
            return Err(WeldError::duplicate_mapping(
                &native,
                format!("already mapped to {}", mapping.describe()),
            ));
        }

        let qualified = request.destination.qualified();
        if self.materialized.contains(&qualified) {
            self.note(format!(
                "{} already exists; mapping {} to it instead of generating",
                qualified, native
            ));
            return self.add_mapping(&native, &qualified);
        }

        if let Some(claimed) = self.destinations.get(&qualified) {
            return Err(WeldError::duplicate_mapping(
                &native,
                format!("destination `{}` is already generated from {}", qualified, claimed),
            ));
        }

        tracing::debug!(native = %native, destination = %qualified, "queued {} request", request.kind.describe());
        self.destinations.insert(qualified, native.clone());
        self.mappings.insert(native, NameMapping::Request(request));
        Ok(())
    }

    /// Read a `...FlagBits` type as one flag of `flags`
    pub fn add_flag_bits(&mut self, native: &str, flags: &str) -> WeldResult<()> {
        match self.mappings.get(native) {
            None => {
                self.mappings.insert(
                    native.to_string(),
                    NameMapping::FlagBits {
                        native: native.to_string(),
                        flags: flags.to_string(),
                    },
                );
                Ok(())
            }
            Some(mapping) if mapping.existing_path().is_some() => Ok(()),
            Some(other) => Err(WeldError::duplicate_mapping(
                native,
                format!("already mapped to {}", other.describe()),
            )),
        }
    }

    /// Look up a native name
    pub fn get(&self, native: &str) -> Option<&NameMapping> {
        self.mappings.get(native)
    }

    /// Every mapping, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &NameMapping> {
        self.mappings.values()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Pending requests, in insertion order
    pub fn requests(&self) -> impl Iterator<Item = &GenerationRequest> {
        self.mappings.values().filter_map(|mapping| match mapping {
            NameMapping::Request(request) => Some(request),
            _ => None,
        })
    }

    /// Record a diagnostic to hand to the driver
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.notes.push(diagnostic);
    }

    /// Take the notes recorded so far
    pub fn take_notes(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.notes)
    }

    fn note(&mut self, message: String) {
        self.notes
            .push(Diagnostic::note(message).with_code(SKIPPED_REQUEST));
    }

    fn release_destination(&mut self, mapping: &NameMapping) {
        if let NameMapping::Request(request) = mapping {
            self.destinations.shift_remove(&request.destination.qualified());
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn structure_request(native: &str, name: &str) -> GenerationRequest {
        GenerationRequest {
            native: native.to_string(),
            source_module: "crate::sys".to_string(),
            destination: Destination::new("crate::vk", name),
            kind: RequestKind::Structure,
            location: Location::default(),
        }
    }

    #[test]
    fn test_mapping_over_structure_request_is_replacement() {
        let mut registry = MappingRegistry::new();
        registry.add_request(structure_request("VkExtent3D", "Extent3d")).unwrap();
        registry.add_mapping("VkExtent3D", "crate::extent::Extent").unwrap();

        match registry.get("VkExtent3D").unwrap() {
            NameMapping::Replacement { path, replaced, .. } => {
                assert_eq!(path, "crate::extent::Extent");
                assert!(matches!(**replaced, NameMapping::Request(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(registry.requests().count(), 0);

        let notes = registry.take_notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].code.as_deref(), Some(SKIPPED_REQUEST));
    }

    #[test]
    fn test_request_over_mapping_is_skipped_with_note() {
        let mut registry = MappingRegistry::new();
        registry.add_mapping("VkExtent3D", "crate::extent::Extent").unwrap();
        registry.add_request(structure_request("VkExtent3D", "Extent3d")).unwrap();

        assert!(matches!(registry.get("VkExtent3D"), Some(NameMapping::Existing { .. })));
        assert_eq!(registry.requests().count(), 0);
        assert_eq!(registry.take_notes().len(), 1);
    }

    #[test]
    fn test_duplicate_mapping() {
        let mut registry = MappingRegistry::new();
        registry.add_mapping("VkExtent3D", "crate::a::Extent").unwrap();
        let err = registry.add_mapping("VkExtent3D", "crate::b::Extent").unwrap_err();
        assert!(matches!(err, WeldError::DuplicateMapping { .. }));
        assert_eq!(registry.get("VkExtent3D").unwrap().existing_path(), Some("crate::a::Extent"));
    }

    #[test]
    fn test_duplicate_destination() {
        let mut registry = MappingRegistry::new();
        registry.add_request(structure_request("VkExtent3D", "Extent3d")).unwrap();
        let err = registry
            .add_request(structure_request("VkExtent3DEXT", "Extent3d"))
            .unwrap_err();
        assert!(matches!(err, WeldError::DuplicateMapping { ref name, .. } if name == "VkExtent3DEXT"));
    }

    #[test]
    fn test_function_pointer_promotion() {
        let mut registry = MappingRegistry::new();
        registry
            .add_function_pointer("PFN_vkFreeFunction", "crate::sys::PFN_vkFreeFunction")
            .unwrap();
        registry.add_mapping("PFN_vkFreeFunction", "crate::alloc::Free").unwrap();
        assert!(matches!(
            registry.get("PFN_vkFreeFunction"),
            Some(NameMapping::Replacement { .. })
        ));

        registry.add_mapping("PFN_vkVoidFunction", "crate::alloc::Void").unwrap();
        registry
            .add_function_pointer("PFN_vkVoidFunction", "crate::sys::PFN_vkVoidFunction")
            .unwrap();
        assert_eq!(
            registry.get("PFN_vkVoidFunction").unwrap().existing_path(),
            Some("crate::alloc::Void")
        );
    }

    #[test]
    fn test_materialized_destination_redirects() {
        let mut registry = MappingRegistry::new()
            .with_materialized(["crate::vk::Extent3d".to_string()]);
        registry.add_request(structure_request("VkExtent3D", "Extent3d")).unwrap();

        assert_eq!(
            registry.get("VkExtent3D").unwrap().existing_path(),
            Some("crate::vk::Extent3d")
        );
        assert_eq!(registry.requests().count(), 0);
        assert!(!registry.take_notes().is_empty());
    }

    #[test]
    fn test_structure_path() {
        let mut registry = MappingRegistry::new();
        registry.add_request(structure_request("VkExtent3D", "Extent3d")).unwrap();
        assert_eq!(
            registry.get("VkExtent3D").unwrap().structure_path().as_deref(),
            Some("crate::vk::Extent3d")
        );
    }
}
