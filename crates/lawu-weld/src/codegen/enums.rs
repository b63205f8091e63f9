//! Enum and bit-flag file generator

use super::{generated_constant, generated_header, runtime, ImportTable};
use crate::binding::HeaderConstant;
use crate::registry::{variant_names, GenerationRequest, RequestKind};

/// Generator for one enum or bit-flag file
pub struct EnumGenerator<'a> {
    request: &'a GenerationRequest,
    date: &'a str,
}

impl<'a> EnumGenerator<'a> {
    /// Create a generator; `None` for structure requests
    pub fn new(request: &'a GenerationRequest, date: &'a str) -> Option<Self> {
        match request.kind {
            RequestKind::Structure => None,
            _ => Some(Self { request, date }),
        }
    }

    fn name(&self) -> &str {
        &self.request.destination.name
    }

    /// Constants, value type and whether this is a flag enum
    fn parts(&self) -> (&[HeaderConstant], &str, bool) {
        match &self.request.kind {
            RequestKind::BitFlag { flags, value_type } => {
                (flags.as_slice(), value_type.as_str(), true)
            }
            RequestKind::Enum {
                constants,
                value_type,
            } => (constants.as_slice(), value_type.as_str(), false),
            RequestKind::Structure => (&[], "i32", false),
        }
    }

    /// Public names the file declares
    pub fn exports(&self) -> Vec<String> {
        vec![self.name().to_string()]
    }

    /// Generate the complete file
    pub fn generate(&self) -> String {
        let (constants, value_type, bit_flag) = self.parts();
        let variants = variant_names(constants, self.name(), bit_flag);

        let mut imports = ImportTable::new();
        imports.reserve(self.name());
        imports.require(runtime::GENERATED);
        imports.require(runtime::RAW_ERROR);
        if bit_flag {
            imports.require(runtime::BIT_FLAG);
            imports.require(runtime::FLAG_FROM_BIT);
        }
        for constant in constants {
            imports.require(&constant.module);
        }

        let mut output = generated_header(&self.request.native);
        output.push('\n');
        output.push_str(&imports.render());
        output.push_str("\n\n");

        output.push_str(&format!("/// Generated from `{}`\n", self.request.native));
        output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\n");
        output.push_str(&format!("pub enum {} {{\n", self.name()));
        for (variant, constant) in variants.iter().zip(constants) {
            output.push_str(&format!("    /// `{}`\n    {},\n", constant.name, variant));
        }
        output.push_str("}\n\n");

        let all = variants
            .iter()
            .map(|variant| format!("Self::{}", variant))
            .collect::<Vec<_>>()
            .join(", ");
        let target = if bit_flag { "u32" } else { value_type };
        let arms = variants
            .iter()
            .zip(constants)
            .map(|(variant, constant)| {
                let mut expression = constant.expression();
                if constant.type_name != target {
                    expression = format!("{} as {}", expression, target);
                }
                format!("            Self::{} => {},\n", variant, expression)
            })
            .collect::<String>();

        output.push_str(&format!("impl {} {{\n", self.name()));
        output.push_str(&generated_constant(&imports, self.date, &self.request.native));

        if bit_flag {
            output.push_str(&format!(
                "\n    /// Flag for an exact bit\n    \
                 pub fn of_bit(bit: u32) -> Result<Self, {raw_error}> {{\n        \
                     {flag_from_bit}(bit, {name:?})\n    \
                 }}\n\
                 }}\n\n\
                 impl {bit_flag} for {name} {{\n    \
                 const ALL: &'static [Self] = &[{all}];\n\n    \
                 fn bit(self) -> u32 {{\n        \
                     match self {{\n{arms}        }}\n    \
                 }}\n\
                 }}\n",
                raw_error = imports.name(runtime::RAW_ERROR),
                flag_from_bit = imports.name(runtime::FLAG_FROM_BIT),
                bit_flag = imports.name(runtime::BIT_FLAG),
                name = self.name(),
                all = all,
                arms = arms,
            ));
        } else {
            output.push_str(&format!(
                "\n    /// Every variant, in declaration order\n    \
                 pub const ALL: &'static [Self] = &[{all}];\n\n    \
                 /// Native value of the variant\n    \
                 pub fn value(self) -> {value_type} {{\n        \
                     match self {{\n{arms}        }}\n    \
                 }}\n\n    \
                 /// Variant for a native value; the first match wins\n    \
                 pub fn of(value: {value_type}) -> Result<Self, {raw_error}> {{\n        \
                     Self::ALL\n            \
                         .iter()\n            \
                         .copied()\n            \
                         .find(|variant| variant.value() == value)\n            \
                         .ok_or({raw_error}::UnknownValue {{\n                \
                             type_name: {name:?},\n                \
                             value: value as i64,\n            \
                         }})\n    \
                 }}\n\
                 }}\n",
                all = all,
                value_type = value_type,
                arms = arms,
                raw_error = imports.name(runtime::RAW_ERROR),
                name = self.name(),
            ));
        }

        output
    }
}
