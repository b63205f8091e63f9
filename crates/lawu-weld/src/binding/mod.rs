//! The low-level binding layer and the accessor bindings derived from it
//!
//! The binding layer is treated as a read-only oracle: it lists the native
//! types of a module with their documentation and accessor functions, the
//! header constants, and the named element layouts used by array members.
//! [`RustBindings`] reads all of that from Rust source with `syn`.

mod source;

pub use source::RustBindings;

use crate::error::{Location, WeldError, WeldResult};
use crate::parse::StructMember;
use indexmap::IndexMap;

/// Last path segment of the raw memory window type taken by accessors
const SEGMENT_TYPE: &str = "Segment";

/// One associated function of a native type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    pub name: String,
    /// Parameter types, printed as paths
    pub params: Vec<String>,
    /// Return type, `None` for `()`
    pub return_type: Option<String>,
    pub location: Location,
}

/// A native structure type exposed by the binding layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeType {
    /// Simple name (`VkExtent3D`)
    pub name: String,
    /// Qualified path (`crate::sys::VkExtent3D`)
    pub path: String,
    /// Joined documentation text, one line per doc attribute
    pub documentation: String,
    /// Line of the first documentation line, for mapping snippet positions
    pub documentation_line: usize,
    pub accessors: Vec<Accessor>,
    /// Whether the type declares a `LAYOUT` constant
    pub has_layout: bool,
    pub location: Location,
}

impl NativeType {
    /// Look up an accessor by exact name
    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.name == name)
    }

    /// Map a position inside the documentation text to a source location
    pub fn documentation_location(&self, line: usize, column: usize) -> Location {
        Location {
            file: self.location.file.clone(),
            line: Some(self.documentation_line + line.saturating_sub(1)),
            column: Some(column),
        }
    }
}

/// A native function-pointer type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionPointerType {
    pub name: String,
    pub path: String,
    pub location: Location,
}

/// How a header constant is spelled in the binding layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantKind {
    /// `pub const NAME: T = ...;`
    Const,
    /// `pub fn NAME() -> T`
    Function,
}

/// A constant of the native header module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderConstant {
    pub name: String,
    /// Qualified path of the owning module (`crate::sys::vulkan_h`)
    pub module: String,
    pub type_name: String,
    /// Literal value, when the binding spells one out
    pub value: Option<i64>,
    pub documentation: String,
    pub kind: ConstantKind,
    pub location: Location,
}

impl HeaderConstant {
    /// Expression reading the constant, relative to its module's last segment
    pub fn expression(&self) -> String {
        let module = self.module.rsplit("::").next().unwrap_or(&self.module);
        match self.kind {
            ConstantKind::Const => format!("{}::{}", module, self.name),
            ConstantKind::Function => format!("{}::{}()", module, self.name),
        }
    }
}

/// Element type of an array read through a layout constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayElement {
    /// A primitive element (`u32`, `f32`, ...)
    Value(String),
    /// A pointer-sized handle
    Address,
}

/// A named element layout (`uint32_t`, `VkPhysicalDevice`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConstant {
    /// Native element type name the constant is named after
    pub name: String,
    /// Qualified path of the constant
    pub path: String,
    pub element: ArrayElement,
}

/// Read-only view of the low-level binding layer
pub trait BindingLayer {
    /// Native structure types declared directly in `module`
    fn native_types(&self, module: &str) -> Vec<&NativeType>;

    /// Function-pointer types declared directly in `module`
    fn function_pointer_types(&self, module: &str) -> Vec<&FunctionPointerType>;

    /// Every constant of the header module, in declaration order
    fn header_constants(&self) -> &[HeaderConstant];

    /// Qualified path of the header module
    fn header_module(&self) -> &str;

    /// The layout constant named after a native element type
    fn layout_constant(&self, type_name: &str) -> Option<&LayoutConstant>;

    /// Element type of the array conversion accepting `layout`
    fn array_element(&self, layout: &LayoutConstant) -> ArrayElement {
        layout.element.clone()
    }

    /// Separator between member name and accessor kind
    fn separator(&self) -> char {
        '_'
    }
}

/// Whether a member is read as one value or as a raw memory window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    /// `<member>_get` / `<member>_set`
    Value,
    /// `<member>_slice`
    Slice,
}

impl AccessorKind {
    /// Accessor suffix for this kind
    pub fn suffix(self) -> &'static str {
        match self {
            AccessorKind::Value => "get",
            AccessorKind::Slice => "slice",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "get" => Some(AccessorKind::Value),
            "slice" => Some(AccessorKind::Slice),
            _ => None,
        }
    }
}

/// The accessor bound to one member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingInformation {
    pub kind: AccessorKind,
    /// Type returned by the accessor
    pub raw_type: String,
    /// Accessor function name
    pub accessor: String,
    pub location: Location,
}

/// Split an accessor name at its last separator into member and kind
fn split_accessor(name: &str, separator: char) -> Option<(&str, AccessorKind)> {
    let (member, suffix) = name.rsplit_once(separator)?;
    if member.is_empty() {
        return None;
    }
    Some((member, AccessorKind::from_suffix(suffix)?))
}

fn takes_segment(accessor: &Accessor) -> bool {
    match accessor.params.as_slice() {
        [param] => param.rsplit("::").next() == Some(SEGMENT_TYPE),
        _ => false,
    }
}

/// Collect the `get`/`slice` accessors of a native type, keyed by member
///
/// Accessors that do not take exactly one segment, or whose name does not
/// end in a known kind, are ignored.
pub fn resolve_bindings(
    native: &NativeType,
    separator: char,
) -> WeldResult<IndexMap<String, BindingInformation>> {
    let mut bindings = IndexMap::new();
    for accessor in &native.accessors {
        if !takes_segment(accessor) {
            continue;
        }
        let Some(return_type) = &accessor.return_type else {
            continue;
        };
        let Some((member, kind)) = split_accessor(&accessor.name, separator) else {
            continue;
        };

        if bindings.contains_key(member) {
            return Err(WeldError::DuplicateAccessor {
                native: native.name.clone(),
                member: member.to_string(),
                location: accessor.location.clone(),
            });
        }
        bindings.insert(
            member.to_string(),
            BindingInformation {
                kind,
                raw_type: return_type.clone(),
                accessor: accessor.name.clone(),
                location: accessor.location.clone(),
            },
        );
    }
    Ok(bindings)
}

/// Check that members and bindings correspond one to one
pub fn match_members(
    native: &NativeType,
    members: &[StructMember],
    bindings: &IndexMap<String, BindingInformation>,
) -> WeldResult<()> {
    for member in members {
        if !bindings.contains_key(&member.name) {
            return Err(WeldError::MissingBinding {
                native: native.name.clone(),
                member: member.name.clone(),
                message: "no accessor found for member".to_string(),
                location: native.documentation_location(member.line, member.column),
            });
        }
    }

    for (name, binding) in bindings {
        if !members.iter().any(|m| &m.name == name) {
            return Err(WeldError::MissingBinding {
                native: native.name.clone(),
                member: name.clone(),
                message: format!("accessor `{}` has no declared member", binding.accessor),
                location: binding.location.clone(),
            });
        }
    }
    Ok(())
}

/// Name of the setter paired with a member's `get` accessor
pub fn setter_name(member: &str, separator: char) -> String {
    format!("{}{}set", member, separator)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::parse::Declarator;

    pub(crate) fn accessor(name: &str, params: &[&str], return_type: Option<&str>) -> Accessor {
        Accessor {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            return_type: return_type.map(str::to_string),
            location: Location::default(),
        }
    }

    pub(crate) fn native(name: &str, accessors: Vec<Accessor>) -> NativeType {
        NativeType {
            name: name.to_string(),
            path: format!("crate::sys::{}", name),
            documentation: String::new(),
            documentation_line: 1,
            accessors,
            has_layout: true,
            location: Location::default(),
        }
    }

    fn member(name: &str) -> StructMember {
        StructMember {
            name: name.to_string(),
            type_name: "uint32_t".to_string(),
            declarator: Declarator::Value,
            line: 1,
            column: 0,
        }
    }

    #[test]
    fn test_resolve_splits_at_last_separator() {
        let native = native(
            "VkSample",
            vec![
                accessor("max_count_get", &["Segment"], Some("u32")),
                accessor("max_count_set", &["Segment", "u32"], None),
                accessor("extent_slice", &["lawu_runtime::Segment"], Some("Segment")),
                accessor("sizeof", &[], Some("usize")),
                accessor("weird_kind", &["Segment"], Some("u32")),
            ],
        );
        let bindings = resolve_bindings(&native, '_').unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings["max_count"].kind, AccessorKind::Value);
        assert_eq!(bindings["max_count"].raw_type, "u32");
        assert_eq!(bindings["extent"].kind, AccessorKind::Slice);
    }

    #[test]
    fn test_duplicate_accessor() {
        let native = native(
            "VkSample",
            vec![
                accessor("width_get", &["Segment"], Some("u32")),
                accessor("width_slice", &["Segment"], Some("Segment")),
            ],
        );
        let err = resolve_bindings(&native, '_').unwrap_err();
        assert!(matches!(err, WeldError::DuplicateAccessor { ref member, .. } if member == "width"));
    }

    #[test]
    fn test_match_members_both_ways() {
        let native = native("VkSample", vec![accessor("width_get", &["Segment"], Some("u32"))]);
        let bindings = resolve_bindings(&native, '_').unwrap();

        assert!(match_members(&native, &[member("width")], &bindings).is_ok());

        let err = match_members(&native, &[member("width"), member("height")], &bindings)
            .unwrap_err();
        assert!(matches!(err, WeldError::MissingBinding { ref member, .. } if member == "height"));

        let err = match_members(&native, &[], &bindings).unwrap_err();
        assert!(matches!(err, WeldError::MissingBinding { ref member, .. } if member == "width"));
    }

    #[test]
    fn test_constant_expression() {
        let constant = HeaderConstant {
            name: "VK_QUEUE_GRAPHICS_BIT".to_string(),
            module: "crate::sys::vulkan_h".to_string(),
            type_name: "u32".to_string(),
            value: Some(1),
            documentation: String::new(),
            kind: ConstantKind::Function,
            location: Location::default(),
        };
        assert_eq!(constant.expression(), "vulkan_h::VK_QUEUE_GRAPHICS_BIT()");
    }
}
