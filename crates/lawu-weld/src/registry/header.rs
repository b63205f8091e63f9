//! Bit-flag and enum requests derived from the header constants
//!
//! Every `VK_..._BIT` constant and every `VK_...` enumerator names its owner
//! in its own snippet (`enum VkQueueFlagBits.VK_QUEUE_GRAPHICS_BIT = 1;`).
//! Constants are grouped by that owner and each group becomes one request.

use super::{Destination, GenerationRequest, MappingRegistry, RequestKind};
use crate::binding::{BindingLayer, HeaderConstant};
use crate::diagnostics::Diagnostic;
use crate::error::WeldError;
use crate::naming::{
    constant_member_name, constant_prefix, convert_bit_flags_name, convert_enum_name,
    is_extension_name, to_upper_camel_case, BIT_SUFFIX, CONSTANT_PREFIX,
};
use crate::parse::{extract_snippets, owner_references};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Code of the warning recorded for enumerators sharing a value
pub const DUPLICATE_VALUE: &str = "N0002";

const FLAG_BITS_SUFFIX: &str = "FlagBits";

/// Variant names for a group of constants, in order
pub fn variant_names(constants: &[HeaderConstant], destination: &str, bit_flag: bool) -> Vec<String> {
    let prefix = constant_prefix(destination, bit_flag);
    constants
        .iter()
        .map(|constant| to_upper_camel_case(&constant_member_name(&constant.name, &prefix)))
        .collect()
}

/// The owner a constant's snippets name, e.g. `VkQueueFlagBits`
fn owner_of(constant: &HeaderConstant) -> Result<String, WeldError> {
    let mut owners: Vec<String> = extract_snippets(&constant.documentation)
        .iter()
        .flat_map(|snippet| owner_references(&snippet.text, &constant.name))
        .collect();
    if owners.len() != 1 {
        return Err(WeldError::AmbiguousOwner {
            constant: constant.name.clone(),
            found: owners.len(),
            location: constant.location.clone(),
        });
    }
    Ok(owners.remove(0))
}

fn is_enum_constant(constant: &HeaderConstant) -> bool {
    extract_snippets(&constant.documentation)
        .iter()
        .any(|snippet| snippet.text.trim_start().starts_with("enum "))
}

/// Queue one request per flag and enum group of the header module
///
/// Returns the errors of the groups and constants that were skipped.
pub fn add_header_requests(
    registry: &mut MappingRegistry,
    bindings: &dyn BindingLayer,
    destination_module: &str,
) -> Vec<WeldError> {
    let mut errors = Vec::new();
    let mut flag_groups: IndexMap<String, (String, Vec<HeaderConstant>)> = IndexMap::new();
    let mut enum_groups: IndexMap<String, Vec<HeaderConstant>> = IndexMap::new();

    for constant in bindings.header_constants() {
        if !constant.name.starts_with(CONSTANT_PREFIX) {
            continue;
        }
        let flag = constant.name.ends_with(BIT_SUFFIX);
        if !flag && !is_enum_constant(constant) {
            continue;
        }

        let owner = match owner_of(constant) {
            Ok(owner) => owner,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        if is_extension_name(&owner) {
            tracing::debug!(constant = %constant.name, owner = %owner, "skipping extension constant");
            continue;
        }

        match owner.strip_suffix(FLAG_BITS_SUFFIX) {
            Some(stem) if flag => {
                let flags = format!("{}Flags", stem);
                flag_groups
                    .entry(flags)
                    .or_insert_with(|| (owner.clone(), Vec::new()))
                    .1
                    .push(constant.clone());
            }
            _ => enum_groups.entry(owner).or_default().push(constant.clone()),
        }
    }

    let header = bindings.header_module();
    for (flags, (owner, constants)) in flag_groups {
        let name = convert_bit_flags_name(&flags);
        let destination = Destination::new(destination_module, name);
        let result = group_request(registry, &flags, header, destination, constants, true)
            .and_then(|()| registry.add_flag_bits(&owner, &flags));
        if let Err(err) = result {
            errors.push(err);
        }
    }

    for (owner, constants) in enum_groups {
        let destination = Destination::new(destination_module, convert_enum_name(&owner));
        if let Err(err) = group_request(registry, &owner, header, destination, constants, false) {
            errors.push(err);
        }
    }

    errors
}

fn group_request(
    registry: &mut MappingRegistry,
    native: &str,
    source_module: &str,
    destination: Destination,
    constants: Vec<HeaderConstant>,
    bit_flag: bool,
) -> Result<(), WeldError> {
    {
        let variants = variant_names(&constants, &destination.name, bit_flag);
        let mut seen_names: HashMap<&str, &str> = HashMap::new();
        for (variant, constant) in variants.iter().zip(&constants) {
            if let Some(previous) = seen_names.insert(variant, &constant.name) {
                return Err(WeldError::duplicate_mapping(
                    native,
                    format!(
                        "{} and {} both become variant `{}`",
                        previous, constant.name, variant
                    ),
                ));
            }
        }

        let mut seen_values: HashMap<i64, &str> = HashMap::new();
        for constant in &constants {
            let Some(value) = constant.value else {
                continue;
            };
            match seen_values.get(&value) {
                Some(previous) => registry.push_diagnostic(
                    Diagnostic::warning(format!(
                        "{} and {} share the value {}; the first is used when converting from native",
                        previous, constant.name, value
                    ))
                    .at_location(&constant.location)
                    .with_code(DUPLICATE_VALUE),
                ),
                None => {
                    seen_values.insert(value, &constant.name);
                }
            }
        }
    }

    let value_type = constants
        .first()
        .map(|constant| constant.type_name.clone())
        .unwrap_or_else(|| "i32".to_string());
    let location = constants
        .first()
        .map(|constant| constant.location.clone())
        .unwrap_or_default();
    let kind = if bit_flag {
        RequestKind::BitFlag {
            flags: constants,
            value_type,
        }
    } else {
        RequestKind::Enum {
            constants,
            value_type,
        }
    };

    registry.add_request(GenerationRequest {
        native: native.to_string(),
        source_module: source_module.to_string(),
        destination,
        kind,
        location,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::binding::{ConstantKind, LayoutConstant, NativeType, FunctionPointerType};
    use crate::error::Location;
    use crate::registry::NameMapping;

    #[derive(Default)]
    pub(crate) struct HeaderOnly {
        pub constants: Vec<HeaderConstant>,
    }

    impl BindingLayer for HeaderOnly {
        fn native_types(&self, _module: &str) -> Vec<&NativeType> {
            Vec::new()
        }

        fn function_pointer_types(&self, _module: &str) -> Vec<&FunctionPointerType> {
            Vec::new()
        }

        fn header_constants(&self) -> &[HeaderConstant] {
            &self.constants
        }

        fn header_module(&self) -> &str {
            "crate::sys::vulkan_h"
        }

        fn layout_constant(&self, _type_name: &str) -> Option<&LayoutConstant> {
            None
        }
    }

    pub(crate) fn constant(name: &str, value: i64, snippet: &str) -> HeaderConstant {
        HeaderConstant {
            name: name.to_string(),
            module: "crate::sys::vulkan_h".to_string(),
            type_name: "i32".to_string(),
            value: Some(value),
            documentation: format!("{{@snippet lang=c :\n{}\n}}", snippet),
            kind: ConstantKind::Const,
            location: Location::default(),
        }
    }

    #[test]
    fn test_flag_and_enum_groups() {
        let bindings = HeaderOnly {
            constants: vec![
                constant("VK_QUEUE_GRAPHICS_BIT", 1, "enum VkQueueFlagBits.VK_QUEUE_GRAPHICS_BIT = 1;"),
                constant("VK_QUEUE_COMPUTE_BIT", 2, "enum VkQueueFlagBits.VK_QUEUE_COMPUTE_BIT = 2;"),
                constant(
                    "VK_PHYSICAL_DEVICE_TYPE_OTHER",
                    0,
                    "enum VkPhysicalDeviceType.VK_PHYSICAL_DEVICE_TYPE_OTHER = 0;",
                ),
                constant("VK_MAX_EXTENSION_NAME_SIZE", 256, "#define VK_MAX_EXTENSION_NAME_SIZE 256"),
                constant("VK_DEBUG_REPORT_ERROR_BIT_EXT", 8, "enum VkDebugReportFlagBitsEXT.VK_DEBUG_REPORT_ERROR_BIT_EXT = 8;"),
            ],
        };
        let mut registry = MappingRegistry::new();
        let errors = add_header_requests(&mut registry, &bindings, "crate::vk");
        assert!(errors.is_empty(), "{:?}", errors);

        match registry.get("VkQueueFlags") {
            Some(NameMapping::Request(request)) => {
                assert_eq!(request.destination.qualified(), "crate::vk::QueueFlag");
                assert_eq!(request.source_module, "crate::sys::vulkan_h");
                match &request.kind {
                    RequestKind::BitFlag { flags, .. } => assert_eq!(flags.len(), 2),
                    other => panic!("unexpected {:?}", other),
                }
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            registry.get("VkQueueFlagBits"),
            Some(&NameMapping::FlagBits {
                native: "VkQueueFlagBits".to_string(),
                flags: "VkQueueFlags".to_string(),
            })
        );
        assert!(matches!(
            registry.get("VkPhysicalDeviceType"),
            Some(NameMapping::Request(GenerationRequest { kind: RequestKind::Enum { .. }, .. }))
        ));
        assert_eq!(registry.requests().count(), 2);
    }

    #[test]
    fn test_ambiguous_owner() {
        let bindings = HeaderOnly {
            constants: vec![constant("VK_QUEUE_GRAPHICS_BIT", 1, "VK_QUEUE_GRAPHICS_BIT = 1;")],
        };
        let mut registry = MappingRegistry::new();
        let errors = add_header_requests(&mut registry, &bindings, "crate::vk");
        assert!(matches!(errors[0], WeldError::AmbiguousOwner { found: 0, .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_shared_values_are_kept_with_warning() {
        let bindings = HeaderOnly {
            constants: vec![
                constant(
                    "VK_DIRECT_DRIVER_LOADING_MODE_EXCLUSIVE_LUNARG",
                    0,
                    "enum VkDirectDriverLoadingMode.VK_DIRECT_DRIVER_LOADING_MODE_EXCLUSIVE_LUNARG = 0;",
                ),
                constant(
                    "VK_DIRECT_DRIVER_LOADING_MODE_INCLUSIVE_LUNARG",
                    0,
                    "enum VkDirectDriverLoadingMode.VK_DIRECT_DRIVER_LOADING_MODE_INCLUSIVE_LUNARG = 0;",
                ),
            ],
        };
        let mut registry = MappingRegistry::new();
        assert!(add_header_requests(&mut registry, &bindings, "crate::vk").is_empty());

        match registry.get("VkDirectDriverLoadingMode") {
            Some(NameMapping::Request(GenerationRequest {
                kind: RequestKind::Enum { constants, .. },
                ..
            })) => assert_eq!(constants.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        let notes = registry.take_notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].code.as_deref(), Some(DUPLICATE_VALUE));
    }

    #[test]
    fn test_colliding_variant_names() {
        let bindings = HeaderOnly {
            constants: vec![
                constant("VK_SAMPLE_COUNT_1_BIT", 1, "enum VkSampleCountFlagBits.VK_SAMPLE_COUNT_1_BIT = 1;"),
                constant("VK_SAMPLE_COUNT_ONE_BIT", 2, "enum VkSampleCountFlagBits.VK_SAMPLE_COUNT_ONE_BIT = 2;"),
            ],
        };
        let mut registry = MappingRegistry::new();
        let errors = add_header_requests(&mut registry, &bindings, "crate::vk");
        assert!(matches!(errors[0], WeldError::DuplicateMapping { .. }));
    }

    #[test]
    fn test_variant_names() {
        let constants = vec![
            constant("VK_SAMPLE_COUNT_1_BIT", 1, ""),
            constant("VK_SAMPLE_COUNT_64_BIT", 64, ""),
        ];
        assert_eq!(variant_names(&constants, "SampleCountFlag", true), vec!["One", "SixtyFour"]);
    }
}
