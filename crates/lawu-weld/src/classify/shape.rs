//! Member shapes and the code each one contributes

use crate::binding::AccessorKind;
use crate::codegen::{runtime, ImportTable};
use crate::naming::to_screaming_snake_case;

/// How an enum-typed member converts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumKind {
    /// A plain enum read from its value type
    Value { value_type: String },
    /// One flag of a generated flag enum
    FlagBit,
}

/// What a member looks like, decided once per member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberShape {
    /// A native function pointer, stored as an address
    FunctionPointer { pointer: String },
    /// A single value of an existing or generated structure type
    MappedValue { target: String },
    /// A packed set of flags
    FlagSet { flag: String },
    Enum { target: String, kind: EnumKind },
    /// A primitive passed through unchanged
    Scalar { raw_type: String },
    /// The `pNext` chain
    NextChain,
    /// Any other pointer or function
    OpaqueHandle,
    /// A fixed `char` buffer holding NUL-terminated text
    Text,
    /// A fixed array of primitives read through a layout constant
    PrimitiveArray { element: String, layout: String },
    /// A fixed array of structures
    MappedArray { target: String },
    /// A fixed array of handles
    HandleArray { layout: String },
}

/// A read expression and whether it yields a `Result`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read {
    pub expression: String,
    pub fallible: bool,
}

impl Read {
    fn value(expression: String) -> Self {
        Self {
            expression,
            fallible: false,
        }
    }

    fn result(expression: String) -> Self {
        Self {
            expression,
            fallible: true,
        }
    }
}

/// Everything a shape needs to render itself for one member
#[derive(Debug, Clone, Copy)]
pub struct ShapeContext<'a> {
    pub imports: &'a ImportTable,
    /// Rendered name of the native type
    pub native: &'a str,
    /// Native member name, as used in accessor names
    pub member: &'a str,
    /// Rust field name on the value type
    pub field: &'a str,
    /// Type returned by the member's `get` or `slice` accessor
    pub raw_type: &'a str,
    pub separator: char,
    /// Name of the generated structure that owns the member
    pub owner: &'a str,
}

impl ShapeContext<'_> {
    fn call(&self, suffix: &str, args: &str) -> String {
        format!(
            "{}::{}{}{}({})",
            self.native, self.member, self.separator, suffix, args
        )
    }

    fn get(&self, raw: &str) -> String {
        self.call("get", raw)
    }

    fn slice(&self, raw: &str) -> String {
        self.call("slice", raw)
    }

    fn set(&self, destination: &str, value: &str) -> String {
        format!("{};", self.call("set", &format!("{}, {}", destination, value)))
    }

    fn raw(&self) -> String {
        self.imports.name(self.raw_type)
    }
}

/// `expression as to`, unless the types already agree
fn cast(expression: String, from: &str, to: &str) -> String {
    if from == to {
        expression
    } else {
        format!("{} as {}", expression, to)
    }
}

/// Chain trait of a structure with a `pNext` member
pub fn next_trait_name(owner: &str) -> String {
    format!("{}Next", owner)
}

/// Reader slice of a structure with a `pNext` member
pub fn next_slice_name(owner: &str) -> String {
    format!("{}_NEXT", to_screaming_snake_case(owner))
}

/// Module part of a layout constant path
fn layout_module(layout: &str) -> Option<&str> {
    layout.rsplit_once("::").map(|(module, _)| module)
}

impl MemberShape {
    /// The accessor the shape reads through
    pub fn accessor_kind(&self) -> AccessorKind {
        match self {
            MemberShape::FunctionPointer { .. }
            | MemberShape::FlagSet { .. }
            | MemberShape::Enum { .. }
            | MemberShape::Scalar { .. }
            | MemberShape::NextChain
            | MemberShape::OpaqueHandle => AccessorKind::Value,
            MemberShape::MappedValue { .. }
            | MemberShape::Text
            | MemberShape::PrimitiveArray { .. }
            | MemberShape::MappedArray { .. }
            | MemberShape::HandleArray { .. } => AccessorKind::Slice,
        }
    }

    /// Whether writing the member takes storage from the allocator
    pub fn needs_allocator(&self) -> bool {
        matches!(
            self,
            MemberShape::MappedValue { .. } | MemberShape::MappedArray { .. } | MemberShape::NextChain
        )
    }

    /// Whether the value type can derive `Clone` and `PartialEq`
    pub fn is_plain_value(&self) -> bool {
        !matches!(self, MemberShape::NextChain)
    }

    /// Paths the rendered member refers to
    pub fn requirements(&self, raw_type: &str) -> Vec<String> {
        let mut paths = Vec::new();
        match self {
            MemberShape::FunctionPointer { pointer } => {
                paths.push(runtime::ADDRESS.to_string());
                paths.push(pointer.clone());
                paths.push(runtime::TRANSMUTE.to_string());
            }
            MemberShape::MappedValue { target } => paths.push(target.clone()),
            MemberShape::MappedArray { target } => {
                paths.push(target.clone());
                paths.push(runtime::READ_ELEMENTS.to_string());
                paths.push(runtime::WRITE_ELEMENTS.to_string());
            }
            MemberShape::FlagSet { flag } => {
                paths.push(runtime::FLAG_SET.to_string());
                paths.push(flag.clone());
            }
            MemberShape::Enum { target, kind } => {
                paths.push(target.clone());
                if *kind == EnumKind::FlagBit {
                    paths.push(runtime::BIT_FLAG.to_string());
                }
            }
            MemberShape::Scalar { raw_type } => paths.push(raw_type.clone()),
            MemberShape::NextChain => {
                for path in [
                    runtime::LINK_CHAIN,
                    runtime::READ_CHAIN,
                    runtime::NEXT_READER,
                    runtime::NEXT_STRUCTURE,
                    runtime::DISTRIBUTED_SLICE,
                ] {
                    paths.push(path.to_string());
                }
            }
            MemberShape::OpaqueHandle => paths.push(runtime::ADDRESS.to_string()),
            MemberShape::Text => {}
            MemberShape::PrimitiveArray { layout, .. } => {
                paths.extend(layout_module(layout).map(str::to_string));
            }
            MemberShape::HandleArray { layout } => {
                paths.push(runtime::ADDRESS.to_string());
                paths.extend(layout_module(layout).map(str::to_string));
            }
        }
        if *self != MemberShape::NextChain {
            paths.push(raw_type.to_string());
        }
        paths
    }

    /// Type of the field on the value representation
    pub fn value_type(&self, cx: &ShapeContext<'_>) -> String {
        let imports = cx.imports;
        match self {
            MemberShape::FunctionPointer { .. }
            | MemberShape::OpaqueHandle => imports.name(runtime::ADDRESS),
            MemberShape::MappedValue { target } => imports.name(target),
            MemberShape::FlagSet { flag } => {
                format!("{}<{}>", imports.name(runtime::FLAG_SET), imports.name(flag))
            }
            MemberShape::Enum { target, .. } => imports.name(target),
            MemberShape::Scalar { raw_type } => imports.name(raw_type),
            MemberShape::NextChain => format!("Vec<Box<dyn {}>>", next_trait_name(cx.owner)),
            MemberShape::Text => "String".to_string(),
            MemberShape::PrimitiveArray { element, .. } => format!("Vec<{}>", element),
            MemberShape::MappedArray { target } => format!("Vec<{}>", imports.name(target)),
            MemberShape::HandleArray { .. } => format!("Vec<{}>", imports.name(runtime::ADDRESS)),
        }
    }

    /// Expression reading the member out of the segment named `raw`
    pub fn read(&self, cx: &ShapeContext<'_>, raw: &str) -> Read {
        let imports = cx.imports;
        match self {
            MemberShape::FunctionPointer { .. }
            | MemberShape::Scalar { .. }
            | MemberShape::OpaqueHandle => Read::value(cx.get(raw)),
            MemberShape::MappedValue { target } => {
                Read::result(format!("{}::of({})", imports.name(target), cx.slice(raw)))
            }
            MemberShape::FlagSet { .. } => Read::value(format!(
                "{}::from_bits({})",
                imports.name(runtime::FLAG_SET),
                cast(cx.get(raw), cx.raw_type, "u32")
            )),
            MemberShape::Enum {
                target,
                kind: EnumKind::Value { value_type },
            } => Read::result(format!(
                "{}::of({})",
                imports.name(target),
                cast(cx.get(raw), cx.raw_type, value_type)
            )),
            MemberShape::Enum {
                target,
                kind: EnumKind::FlagBit,
            } => Read::result(format!(
                "{}::of_bit({})",
                imports.name(target),
                cast(cx.get(raw), cx.raw_type, "u32")
            )),
            // The link is never followed here; see `chain_walk`
            MemberShape::NextChain => Read::value("Vec::new()".to_string()),
            MemberShape::Text => Read::result(format!("{}.read_c_str()", cx.slice(raw))),
            MemberShape::PrimitiveArray { layout, .. } => Read::value(format!(
                "{}.to_vec({})",
                cx.slice(raw),
                imports.member(layout)
            )),
            MemberShape::MappedArray { target } => Read::result(format!(
                "{}::<{}>({})",
                imports.name(runtime::READ_ELEMENTS),
                imports.name(target),
                cx.slice(raw)
            )),
            MemberShape::HandleArray { layout } => Read::value(format!(
                "{}.to_addresses({})",
                cx.slice(raw),
                imports.member(layout)
            )),
        }
    }

    /// Unsafe call walking the chain linked from the segment named `raw`
    ///
    /// Only chain members have one. The caller has to vouch for every link.
    pub fn chain_walk(&self, cx: &ShapeContext<'_>, raw: &str) -> Option<String> {
        match self {
            MemberShape::NextChain => Some(format!(
                "{}({}, &{})",
                cx.imports.name(runtime::READ_CHAIN),
                cx.get(raw),
                next_slice_name(cx.owner)
            )),
            _ => None,
        }
    }

    /// Statements writing `self.<field>` into the segment named `destination`
    pub fn write(&self, cx: &ShapeContext<'_>, destination: &str, allocator: &str) -> String {
        let imports = cx.imports;
        let value = format!("self.{}", cx.field);
        match self {
            MemberShape::FunctionPointer { .. }
            | MemberShape::Scalar { .. }
            | MemberShape::OpaqueHandle => cx.set(destination, &value),
            MemberShape::MappedValue { .. } => format!(
                "{}.write_raw({}, {})?;",
                value,
                cx.slice(destination),
                allocator
            ),
            MemberShape::FlagSet { .. } => cx.set(
                destination,
                &cast(format!("{}.bits()", value), "u32", &cx.raw()),
            ),
            MemberShape::Enum {
                kind: EnumKind::Value { value_type },
                ..
            } => cx.set(
                destination,
                &cast(format!("{}.value()", value), value_type, &cx.raw()),
            ),
            MemberShape::Enum {
                kind: EnumKind::FlagBit,
                ..
            } => cx.set(
                destination,
                &cast(format!("{}.bit()", value), "u32", &cx.raw()),
            ),
            MemberShape::NextChain => cx.set(
                destination,
                &format!(
                    "{}({}.iter(), {}, {})?",
                    imports.name(runtime::LINK_CHAIN),
                    value,
                    cx.get(destination),
                    allocator
                ),
            ),
            MemberShape::Text => format!("{}.write_c_str(&{})?;", cx.slice(destination), value),
            MemberShape::PrimitiveArray { layout, .. } => format!(
                "{}.copy_from_values({}, &{})?;",
                cx.slice(destination),
                imports.member(layout),
                value
            ),
            MemberShape::MappedArray { .. } => format!(
                "{}({}, &{}, {})?;",
                imports.name(runtime::WRITE_ELEMENTS),
                cx.slice(destination),
                value,
                allocator
            ),
            MemberShape::HandleArray { layout } => format!(
                "{}.copy_from_addresses({}, &{})?;",
                cx.slice(destination),
                imports.member(layout),
                value
            ),
        }
    }

    /// Inherent methods the member adds to the value type
    pub fn extra_methods(&self, cx: &ShapeContext<'_>, method: &str) -> Option<String> {
        match self {
            MemberShape::FunctionPointer { pointer } => {
                let pointer = cx.imports.name(pointer);
                Some(format!(
                    "/// Reinterpret `{field}` as `{pointer}`\n\
                     ///\n\
                     /// # Safety\n\
                     ///\n\
                     /// `{field}` must be null or the address of a function with that signature.\n\
                     pub unsafe fn {method}(&self) -> {pointer} {{\n    \
                         unsafe {{ {transmute}::<usize, {pointer}>(self.{field}.get()) }}\n\
                     }}",
                    field = cx.field,
                    pointer = pointer,
                    method = method,
                    transmute = cx.imports.name(runtime::TRANSMUTE),
                ))
            }
            MemberShape::NextChain => {
                let walk = self.chain_walk(cx, "raw")?;
                Some(format!(
                    "/// Read a value out of native memory, following its next chain\n\
                     ///\n\
                     /// # Safety\n\
                     ///\n\
                     /// Every non-null link reachable from `raw` must address a live chainable\n\
                     /// structure at least as large as the layout registered for its type.\n\
                     pub unsafe fn of_with_chain(raw: {segment}<'_>) -> Result<Self, {raw_error}> {{\n    \
                         let mut value = <Self as {structure}>::of(raw)?;\n    \
                         value.{field} = unsafe {{ {walk} }}?;\n    \
                         Ok(value)\n\
                     }}",
                    segment = cx.imports.name(runtime::SEGMENT),
                    raw_error = cx.imports.name(runtime::RAW_ERROR),
                    structure = cx.imports.name(runtime::STRUCTURE),
                    field = cx.field,
                    walk = walk,
                ))
            }
            _ => None,
        }
    }

    /// Module-level items the member adds to the file
    pub fn extra_items(&self, cx: &ShapeContext<'_>) -> Option<String> {
        match self {
            MemberShape::NextChain => Some(format!(
                "/// Structures that can extend a [`{owner}`] through its next chain\n\
                 pub trait {trait_name}: {next_structure} {{}}\n\
                 \n\
                 /// Readers for every structure registered to extend a [`{owner}`]\n\
                 #[{distributed_slice}]\n\
                 pub static {slice}: [{next_reader}<dyn {trait_name}>];",
                owner = cx.owner,
                trait_name = next_trait_name(cx.owner),
                next_structure = cx.imports.name(runtime::NEXT_STRUCTURE),
                distributed_slice = cx.imports.name(runtime::DISTRIBUTED_SLICE),
                slice = next_slice_name(cx.owner),
                next_reader = cx.imports.name(runtime::NEXT_READER),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>(imports: &'a ImportTable, raw_type: &'a str) -> ShapeContext<'a> {
        ShapeContext {
            imports,
            native: "VkSample",
            member: "value",
            field: "value",
            raw_type,
            separator: '_',
            owner: "Sample",
        }
    }

    #[test]
    fn test_scalar_round_trip_code() {
        let imports = ImportTable::new();
        let shape = MemberShape::Scalar {
            raw_type: "u32".to_string(),
        };
        let cx = context(&imports, "u32");
        assert_eq!(shape.read(&cx, "raw"), Read::value("VkSample::value_get(raw)".to_string()));
        assert_eq!(
            shape.write(&cx, "destination", "allocator"),
            "VkSample::value_set(destination, self.value);"
        );
        assert_eq!(shape.accessor_kind(), AccessorKind::Value);
    }

    #[test]
    fn test_enum_casts_only_when_types_differ() {
        let mut imports = ImportTable::new();
        imports.require("crate::vk::PhysicalDeviceType");
        let shape = MemberShape::Enum {
            target: "crate::vk::PhysicalDeviceType".to_string(),
            kind: EnumKind::Value {
                value_type: "i32".to_string(),
            },
        };

        let cx = context(&imports, "i32");
        assert_eq!(
            shape.read(&cx, "raw").expression,
            "PhysicalDeviceType::of(VkSample::value_get(raw))"
        );

        let cx = context(&imports, "u32");
        assert_eq!(
            shape.read(&cx, "raw").expression,
            "PhysicalDeviceType::of(VkSample::value_get(raw) as i32)"
        );
        assert_eq!(
            shape.write(&cx, "destination", "allocator"),
            "VkSample::value_set(destination, self.value.value() as u32);"
        );
    }

    #[test]
    fn test_layout_member_reference() {
        let mut imports = ImportTable::new();
        let shape = MemberShape::PrimitiveArray {
            element: "u32".to_string(),
            layout: "crate::sys::vulkan_h::uint32_t".to_string(),
        };
        for path in shape.requirements("lawu_runtime::Segment") {
            imports.require(&path);
        }
        let cx = context(&imports, "lawu_runtime::Segment");
        assert_eq!(
            shape.read(&cx, "raw").expression,
            "VkSample::value_slice(raw).to_vec(vulkan_h::uint32_t)"
        );
        assert_eq!(shape.value_type(&cx), "Vec<u32>");
    }

    #[test]
    fn test_next_chain_names() {
        assert_eq!(next_trait_name("PhysicalDeviceProperties2"), "PhysicalDeviceProperties2Next");
        assert_eq!(
            next_slice_name("PhysicalDeviceProperties2"),
            "PHYSICAL_DEVICE_PROPERTIES2_NEXT"
        );
        assert!(!MemberShape::NextChain.is_plain_value());
        assert!(MemberShape::NextChain.needs_allocator());
    }

    #[test]
    fn test_next_chain_is_only_walked_unsafely() {
        let imports = ImportTable::new();
        let cx = ShapeContext {
            member: "pNext",
            field: "next",
            ..context(&imports, "lawu_runtime::Address")
        };
        let shape = MemberShape::NextChain;

        assert_eq!(shape.read(&cx, "raw"), Read::value("Vec::new()".to_string()));
        assert_eq!(
            shape.chain_walk(&cx, "raw").unwrap(),
            "lawu_runtime::read_chain(VkSample::pNext_get(raw), &SAMPLE_NEXT)"
        );
        assert_eq!(MemberShape::Text.chain_walk(&cx, "raw"), None);

        let method = shape.extra_methods(&cx, "next").unwrap();
        assert!(method.contains("pub unsafe fn of_with_chain("));
        assert!(method.contains(
            "    value.next = unsafe { lawu_runtime::read_chain(VkSample::pNext_get(raw), &SAMPLE_NEXT) }?;\n"
        ));
    }
}
