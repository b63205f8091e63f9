//! Member classification
//!
//! Each parsed member is matched against a fixed decision table, earliest
//! rule first:
//!
//! | # | Declarator | Condition | Shape |
//! |---|------------|-----------|-------|
//! | 1 | value | type is a function pointer | `FunctionPointer` |
//! | 2 | value | type maps to a structure | `MappedValue` |
//! | 3 | value | type is a bit-flag request | `FlagSet` |
//! | 4 | value | type is an enum or flag bits | `Enum` |
//! | 5 | value | anything else | `Scalar` |
//! | 6 | `void*` | named `pNext` | `NextChain` |
//! | 7 | pointer or function | | `OpaqueHandle` |
//! | 8 | array | `char` | `Text` |
//! | 9 | array | `float` or `double` | `PrimitiveArray` |
//! | 10 | array | `"<type> <member>"` is mapped | `MappedValue` |
//! | 11 | array | type maps to a structure | `MappedArray` |
//! | 12 | array | address layout constant | `HandleArray` |
//! | 13 | array | value layout constant | `PrimitiveArray` |

mod shape;

pub use shape::{next_slice_name, next_trait_name, EnumKind, MemberShape, Read, ShapeContext};

use crate::binding::{
    setter_name, AccessorKind, ArrayElement, BindingInformation, BindingLayer, NativeType,
};
use crate::codegen::runtime;
use crate::error::{WeldError, WeldResult};
use crate::naming::field_name;
use crate::parse::{Declarator, StructMember};
use crate::registry::{MappingRegistry, NameMapping, RequestKind};
use indexmap::IndexMap;

/// Name of the chain member
pub const NEXT_MEMBER: &str = "pNext";
/// Name of the chain discriminant member
pub const STRUCTURE_TYPE_MEMBER: &str = "sType";

/// Field name of the chain member on value types
const NEXT_FIELD: &str = "next";
/// Names already taken by methods of the native view
const VIEW_METHODS: &[&str] = &["new", "raw", "to_value"];

/// A member with its binding and shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedMember {
    pub member: StructMember,
    pub binding: BindingInformation,
    pub shape: MemberShape,
    /// Rust field name
    pub field: String,
}

/// Rust field name for a member
pub fn member_field_name(member: &str) -> String {
    if member == NEXT_MEMBER {
        return NEXT_FIELD.to_string();
    }
    let field = field_name(member);
    if VIEW_METHODS.contains(&field.as_str()) {
        format!("{}_field", field)
    } else {
        field
    }
}

fn unresolved(native: &NativeType, member: &StructMember) -> WeldError {
    WeldError::UnresolvedMember {
        native: native.name.clone(),
        member: member.name.clone(),
        type_name: member.type_name.clone(),
        declarator: member.declarator.to_string(),
        location: native.documentation_location(member.line, member.column),
    }
}

/// Apply the decision table to one member
pub fn classify_member(
    native: &NativeType,
    member: &StructMember,
    binding: &BindingInformation,
    registry: &MappingRegistry,
    bindings: &dyn BindingLayer,
) -> WeldResult<MemberShape> {
    let type_name = member.type_name.as_str();
    match &member.declarator {
        Declarator::Value => Ok(match registry.get(type_name) {
            Some(NameMapping::FunctionPointer { path, .. }) => MemberShape::FunctionPointer {
                pointer: path.clone(),
            },
            Some(
                mapping @ (NameMapping::Existing { .. }
                | NameMapping::Replacement { .. }
                | NameMapping::Request(_)),
            ) => match mapping {
                NameMapping::Request(request) => match &request.kind {
                    RequestKind::Structure => MemberShape::MappedValue {
                        target: request.destination.qualified(),
                    },
                    RequestKind::BitFlag { .. } => MemberShape::FlagSet {
                        flag: request.destination.qualified(),
                    },
                    RequestKind::Enum { value_type, .. } => MemberShape::Enum {
                        target: request.destination.qualified(),
                        kind: EnumKind::Value {
                            value_type: value_type.clone(),
                        },
                    },
                },
                _ => MemberShape::MappedValue {
                    target: mapping.structure_path().unwrap_or_default(),
                },
            },
            Some(NameMapping::FlagBits { flags, .. }) => {
                let target = match registry.get(flags) {
                    Some(NameMapping::Request(request)) => request.destination.qualified(),
                    Some(mapping) => match mapping.existing_path() {
                        Some(path) => path.to_string(),
                        None => return Err(unresolved(native, member)),
                    },
                    None => return Err(unresolved(native, member)),
                };
                MemberShape::Enum {
                    target,
                    kind: EnumKind::FlagBit,
                }
            }
            None => MemberShape::Scalar {
                raw_type: binding.raw_type.clone(),
            },
        }),
        Declarator::Pointer(inner)
            if **inner == Declarator::Value
                && type_name == "void"
                && member.name == NEXT_MEMBER =>
        {
            Ok(MemberShape::NextChain)
        }
        Declarator::Pointer(_) | Declarator::Function(_) => Ok(MemberShape::OpaqueHandle),
        Declarator::Array(inner) if **inner == Declarator::Value => {
            classify_array(native, member, registry, bindings)
        }
        Declarator::Array(_) => Err(unresolved(native, member)),
    }
}

fn classify_array(
    native: &NativeType,
    member: &StructMember,
    registry: &MappingRegistry,
    bindings: &dyn BindingLayer,
) -> WeldResult<MemberShape> {
    let type_name = member.type_name.as_str();
    match type_name {
        "char" => return Ok(MemberShape::Text),
        "float" => {
            return Ok(MemberShape::PrimitiveArray {
                element: "f32".to_string(),
                layout: runtime::F32_LAYOUT.to_string(),
            })
        }
        "double" => {
            return Ok(MemberShape::PrimitiveArray {
                element: "f64".to_string(),
                layout: runtime::F64_LAYOUT.to_string(),
            })
        }
        _ => {}
    }

    let qualified = format!("{} {}", type_name, member.name);
    if let Some(path) = registry.get(&qualified).and_then(NameMapping::existing_path) {
        return Ok(MemberShape::MappedValue {
            target: path.to_string(),
        });
    }

    if let Some(target) = registry.get(type_name).and_then(NameMapping::structure_path) {
        return Ok(MemberShape::MappedArray { target });
    }

    let Some(layout) = bindings.layout_constant(type_name) else {
        return Err(WeldError::MissingLayoutConstant {
            native: native.name.clone(),
            member: member.name.clone(),
            type_name: type_name.to_string(),
            location: native.documentation_location(member.line, member.column),
        });
    };
    Ok(match bindings.array_element(layout) {
        ArrayElement::Address => MemberShape::HandleArray {
            layout: layout.path.clone(),
        },
        ArrayElement::Value(element) => MemberShape::PrimitiveArray {
            element,
            layout: layout.path.clone(),
        },
    })
}

/// Classify every member and check that its accessors suit its shape
pub fn classify_members(
    native: &NativeType,
    members: &[StructMember],
    resolved: &IndexMap<String, BindingInformation>,
    registry: &MappingRegistry,
    bindings: &dyn BindingLayer,
) -> WeldResult<Vec<ClassifiedMember>> {
    let separator = bindings.separator();
    let mut classified = Vec::with_capacity(members.len());

    for member in members {
        let Some(binding) = resolved.get(&member.name) else {
            return Err(WeldError::MissingBinding {
                native: native.name.clone(),
                member: member.name.clone(),
                message: "no accessor found for member".to_string(),
                location: native.documentation_location(member.line, member.column),
            });
        };
        let shape = classify_member(native, member, binding, registry, bindings)?;

        let expected = shape.accessor_kind();
        if binding.kind != expected {
            return Err(WeldError::MissingBinding {
                native: native.name.clone(),
                member: member.name.clone(),
                message: format!(
                    "expected a `{}` accessor, found `{}`",
                    expected.suffix(),
                    binding.accessor
                ),
                location: binding.location.clone(),
            });
        }
        if expected == AccessorKind::Value {
            let setter = setter_name(&member.name, separator);
            if native.accessor(&setter).is_none() {
                return Err(WeldError::MissingBinding {
                    native: native.name.clone(),
                    member: member.name.clone(),
                    message: format!("no `{}` accessor", setter),
                    location: binding.location.clone(),
                });
            }
        }

        tracing::debug!(
            native = %native.name,
            member = %member.name,
            shape = ?shape,
            "classified member"
        );
        classified.push(ClassifiedMember {
            field: member_field_name(&member.name),
            member: member.clone(),
            binding: binding.clone(),
            shape,
        });
    }
    Ok(classified)
}
