//! Structure file generator
//!
//! One file per structure request, holding the value type, its
//! [`Structure`](lawu_runtime) conversions and the zero-copy native view.

use super::{generated_constant, generated_header, indent, indent_tail, runtime, ImportTable};
use crate::binding::NativeType;
use crate::classify::{
    next_slice_name, next_trait_name, ClassifiedMember, EnumKind, MemberShape, ShapeContext,
    STRUCTURE_TYPE_MEMBER,
};
use crate::naming::function_accessor_name;
use crate::registry::GenerationRequest;

/// Generator for one structure file
pub struct StructureGenerator<'a> {
    native: &'a NativeType,
    request: &'a GenerationRequest,
    members: &'a [ClassifiedMember],
    separator: char,
    date: &'a str,
}

impl<'a> StructureGenerator<'a> {
    /// Create a generator for a classified structure
    pub fn new(
        native: &'a NativeType,
        request: &'a GenerationRequest,
        members: &'a [ClassifiedMember],
        separator: char,
        date: &'a str,
    ) -> Self {
        Self {
            native,
            request,
            members,
            separator,
            date,
        }
    }

    fn name(&self) -> &str {
        &self.request.destination.name
    }

    fn view_name(&self) -> String {
        format!("{}Native", self.name())
    }

    fn has_chain(&self) -> bool {
        self.chain_member().is_some()
    }

    fn chain_member(&self) -> Option<&ClassifiedMember> {
        self.members
            .iter()
            .find(|member| member.shape == MemberShape::NextChain)
    }

    fn structure_type_member(&self) -> Option<&ClassifiedMember> {
        self.members
            .iter()
            .find(|member| member.member.name == STRUCTURE_TYPE_MEMBER)
    }

    /// Public names the file declares
    pub fn exports(&self) -> Vec<String> {
        let mut exports = vec![self.name().to_string(), self.view_name()];
        if self.has_chain() {
            exports.push(next_trait_name(self.name()));
            exports.push(next_slice_name(self.name()));
        }
        exports
    }

    /// Collect every path the file refers to
    fn imports(&self) -> ImportTable {
        let mut imports = ImportTable::new();
        for local in self.exports() {
            imports.reserve(&local);
        }
        imports.require(&self.native.path);
        for path in [
            runtime::GENERATED,
            runtime::LAYOUT,
            runtime::RAW_ERROR,
            runtime::SEGMENT,
            runtime::SEGMENT_ALLOCATOR,
            runtime::STRUCTURE,
        ] {
            imports.require(path);
        }
        for member in self.members {
            for path in member.shape.requirements(&member.binding.raw_type) {
                imports.require(&path);
            }
        }
        imports
    }

    fn context<'c>(
        &'c self,
        imports: &'c ImportTable,
        native: &'c str,
        member: &'c ClassifiedMember,
    ) -> ShapeContext<'c> {
        ShapeContext {
            imports,
            native,
            member: &member.member.name,
            field: &member.field,
            raw_type: &member.binding.raw_type,
            separator: self.separator,
            owner: self.name(),
        }
    }

    /// Generate the complete file
    pub fn generate(&self) -> String {
        let imports = self.imports();
        let native = imports.name(&self.native.path);

        let mut output = generated_header(&self.native.name);
        output.push('\n');
        output.push_str(&imports.render());
        output.push_str("\n\n");

        output.push_str(&self.generate_value_struct(&imports, &native));
        output.push('\n');
        output.push_str(&self.generate_inherent_impl(&imports, &native));
        output.push('\n');
        output.push_str(&self.generate_structure_impl(&imports, &native));
        output.push('\n');
        if let Some(chain) = self.generate_next_structure_impl(&imports) {
            output.push_str(&chain);
            output.push('\n');
        }
        output.push_str(&self.generate_view(&imports, &native));

        for member in self.members {
            let cx = self.context(&imports, &native, member);
            if let Some(items) = member.shape.extra_items(&cx) {
                output.push('\n');
                output.push_str(&items);
                output.push('\n');
            }
        }

        output
    }

    fn generate_value_struct(&self, imports: &ImportTable, native: &str) -> String {
        let derives = if self.members.iter().all(|m| m.shape.is_plain_value()) {
            "Debug, Clone, PartialEq"
        } else {
            "Debug"
        };

        let mut output = format!("/// Value representation of `{}`\n", self.native.name);
        output.push_str(&format!("#[derive({})]\n", derives));
        output.push_str(&format!("pub struct {} {{\n", self.name()));
        for member in self.members {
            let cx = self.context(imports, native, member);
            output.push_str(&format!(
                "    pub {}: {},\n",
                member.field,
                member.shape.value_type(&cx)
            ));
        }
        output.push_str("}\n");
        output
    }

    fn generate_inherent_impl(&self, imports: &ImportTable, native: &str) -> String {
        let mut output = format!("impl {} {{\n", self.name());
        output.push_str(&generated_constant(imports, self.date, &self.native.name));

        for member in self.members {
            let cx = self.context(imports, native, member);
            let method = function_accessor_name(&member.member.name);
            if let Some(extra) = member.shape.extra_methods(&cx, &method) {
                output.push('\n');
                output.push_str(&indent(&extra, 4));
                output.push('\n');
            }
        }

        output.push_str("}\n");
        output
    }

    fn generate_structure_impl(&self, imports: &ImportTable, native: &str) -> String {
        let structure = imports.name(runtime::STRUCTURE);
        let layout = imports.name(runtime::LAYOUT);
        let segment = imports.name(runtime::SEGMENT);
        let raw_error = imports.name(runtime::RAW_ERROR);
        let allocator_trait = imports.name(runtime::SEGMENT_ALLOCATOR);

        let mut output = format!("impl {} for {} {{\n", structure, self.name());
        output.push_str(&format!(
            "    fn layout() -> {} {{\n        {}::LAYOUT\n    }}\n\n",
            layout, native
        ));

        // of
        let raw = if self.members.is_empty() { "_raw" } else { "raw" };
        output.push_str(&format!(
            "    fn of({}: {}<'_>) -> Result<Self, {}> {{\n",
            raw, segment, raw_error
        ));
        output.push_str("        Ok(Self {\n");
        for member in self.members {
            let cx = self.context(imports, native, member);
            let read = member.shape.read(&cx, "raw");
            let question = if read.fallible { "?" } else { "" };
            output.push_str(&format!(
                "            {}: {}{},\n",
                member.field,
                indent_tail(&read.expression, 12),
                question
            ));
        }
        output.push_str("        })\n    }\n\n");

        // write_raw
        let destination = if self.members.is_empty() {
            "_destination"
        } else {
            "destination"
        };
        let allocator = if self.members.iter().any(|m| m.shape.needs_allocator()) {
            "allocator"
        } else {
            "_allocator"
        };
        output.push_str(&format!(
            "    fn write_raw<'a>(\n        &self,\n        {}: {}<'a>,\n        {}: &'a dyn {},\n    ) -> Result<(), {}> {{\n",
            destination, segment, allocator, allocator_trait, raw_error
        ));
        for member in self.members {
            let cx = self.context(imports, native, member);
            let statement = member.shape.write(&cx, "destination", "allocator");
            output.push_str(&indent(&statement, 8));
            output.push('\n');
        }
        output.push_str("        Ok(())\n    }\n}\n");
        output
    }

    /// `NextStructure` for structures that carry a discriminant and a chain
    ///
    /// Only the link of the outermost structure is threaded, so a chained
    /// item that brings a chain of its own is refused.
    fn generate_next_structure_impl(&self, imports: &ImportTable) -> Option<String> {
        let chain = self.chain_member()?;
        let structure_type = self.structure_type_member()?;
        let field = format!("self.{}", structure_type.field);
        let discriminant = match &structure_type.shape {
            MemberShape::Enum {
                kind: EnumKind::Value { value_type },
                ..
            } if value_type == "i32" => format!("{}.value()", field),
            MemberShape::Enum {
                kind: EnumKind::Value { .. },
                ..
            } => format!("{}.value() as i32", field),
            MemberShape::Scalar { raw_type } if raw_type == "i32" => field,
            MemberShape::Scalar { .. } => format!("{} as i32", field),
            _ => return None,
        };

        Some(format!(
            "impl {next_structure} for {name} {{\n    \
                 fn structure_type(&self) -> i32 {{\n        \
                     {discriminant}\n    \
                 }}\n\n    \
                 fn allocate_raw<'a>(\n        \
                     &self,\n        \
                     allocator: &'a dyn {allocator},\n    \
                 ) -> Result<{segment}<'a>, {raw_error}> {{\n        \
                     if !self.{chain}.is_empty() {{\n            \
                         return Err({raw_error}::NestedChain {{\n                \
                             structure_type: self.structure_type(),\n            \
                         }});\n        \
                     }}\n        \
                     self.as_raw(allocator)\n    \
                 }}\n\
             }}\n",
            next_structure = imports.name(runtime::NEXT_STRUCTURE),
            name = self.name(),
            discriminant = discriminant,
            chain = chain.field,
            allocator = imports.name(runtime::SEGMENT_ALLOCATOR),
            segment = imports.name(runtime::SEGMENT),
            raw_error = imports.name(runtime::RAW_ERROR),
        ))
    }

    fn generate_view(&self, imports: &ImportTable, native: &str) -> String {
        let view = self.view_name();
        let segment = imports.name(runtime::SEGMENT);
        let raw_error = imports.name(runtime::RAW_ERROR);

        let mut output = format!(
            "/// Zero-copy view of a native `{}`\n",
            self.native.name
        );
        output.push_str("#[derive(Debug, Clone, Copy)]\n");
        output.push_str(&format!(
            "pub struct {}<'a> {{\n    raw: {}<'a>,\n}}\n\n",
            view, segment
        ));

        output.push_str(&format!("impl<'a> {}<'a> {{\n", view));
        output.push_str(&format!(
            "    /// Wrap native memory holding a `{}`\n    pub fn new(raw: {}<'a>) -> Self {{\n        Self {{ raw }}\n    }}\n\n",
            self.native.name, segment
        ));
        output.push_str(&format!(
            "    pub fn raw(&self) -> {}<'a> {{\n        self.raw\n    }}\n\n",
            segment
        ));
        output.push_str(&format!(
            "    /// Copy the viewed memory into a [`{name}`]\n    pub fn to_value(&self) -> Result<{name}, {raw_error}> {{\n        {name}::of(self.raw)\n    }}\n",
            name = self.name(),
            raw_error = raw_error
        ));

        for member in self.members {
            let cx = self.context(imports, native, member);
            let value_type = member.shape.value_type(&cx);
            if let Some(walk) = member.shape.chain_walk(&cx, "self.raw") {
                output.push_str(&format!(
                    "\n    /// Read the structures chained behind the viewed one\n    \
                     ///\n    \
                     /// # Safety\n    \
                     ///\n    \
                     /// Every non-null link reachable from the viewed memory must address a\n    \
                     /// live chainable structure at least as large as the layout registered\n    \
                     /// for its type.\n    \
                     pub unsafe fn {field}(&self) -> Result<{value_type}, {raw_error}> {{\n        \
                         unsafe {{ {walk} }}\n    \
                     }}\n",
                    field = member.field,
                    value_type = value_type,
                    raw_error = raw_error,
                    walk = walk,
                ));
                continue;
            }
            let read = member.shape.read(&cx, "self.raw");
            let return_type = if read.fallible {
                format!("Result<{}, {}>", value_type, raw_error)
            } else {
                value_type
            };
            output.push_str(&format!(
                "\n    pub fn {}(&self) -> {} {{\n        {}\n    }}\n",
                member.field,
                return_type,
                indent_tail(&read.expression, 8)
            ));
        }

        output.push_str("}\n");
        output
    }
}
