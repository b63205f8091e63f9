//! Parser for the C declarations embedded in binding documentation
//!
//! The binding layer documents each native type with a fenced snippet of
//! its C declaration:
//!
//! ```text
//! {@snippet :
//! struct VkExtent3D {
//!     uint32_t width;
//!     uint32_t height;
//!     uint32_t depth;
//! };
//! }
//! ```
//!
//! Only the subset of C those snippets use is supported: storage classes
//! (to spot `typedef`), primitive and typedef-name type specifiers, struct
//! and union bodies, and pointer, array and function declarators.

mod lexer;
mod parser;
mod snippet;

pub use snippet::{extract_snippets, owner_references, Snippet};

use std::fmt;
use thiserror::Error;

/// Pointer, array and function wrapping applied to a base type
///
/// Reads outside-in: `Pointer(Function(Value))` is "pointer to function
/// returning the base type".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declarator {
    Value,
    Pointer(Box<Declarator>),
    Array(Box<Declarator>),
    Function(Box<Declarator>),
}

impl Declarator {
    /// Apply a pointer at the innermost position
    pub fn pointer(self) -> Self {
        self.wrap_innermost(Declarator::Pointer)
    }

    /// Apply an array at the innermost position
    pub fn array(self) -> Self {
        self.wrap_innermost(Declarator::Array)
    }

    /// Apply a function at the innermost position
    pub fn function(self) -> Self {
        self.wrap_innermost(Declarator::Function)
    }

    fn wrap_innermost(self, wrap: fn(Box<Declarator>) -> Declarator) -> Self {
        match self {
            Declarator::Value => wrap(Box::new(Declarator::Value)),
            Declarator::Pointer(inner) => Declarator::Pointer(Box::new(inner.wrap_innermost(wrap))),
            Declarator::Array(inner) => Declarator::Array(Box::new(inner.wrap_innermost(wrap))),
            Declarator::Function(inner) => {
                Declarator::Function(Box::new(inner.wrap_innermost(wrap)))
            }
        }
    }

    /// Whether this is `Array(Value)`
    pub fn is_value_array(&self) -> bool {
        matches!(self, Declarator::Array(inner) if **inner == Declarator::Value)
    }

    /// Whether this is `Pointer(Value)`
    pub fn is_value_pointer(&self) -> bool {
        matches!(self, Declarator::Pointer(inner) if **inner == Declarator::Value)
    }
}

impl fmt::Display for Declarator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declarator::Value => write!(f, "Value"),
            Declarator::Pointer(inner) => write!(f, "Pointer({})", inner),
            Declarator::Array(inner) => write!(f, "Array({})", inner),
            Declarator::Function(inner) => write!(f, "Function({})", inner),
        }
    }
}

/// One member of a parsed structure body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructMember {
    /// Member name
    pub name: String,
    /// Raw type keyword (`uint32_t`, `VkExtent3D`, `unsigned int`)
    pub type_name: String,
    /// Declarator wrapping the type
    pub declarator: Declarator,
    /// Line inside the documentation text (1-indexed)
    pub line: usize,
    /// Column inside the documentation text (0-indexed)
    pub column: usize,
}

/// A top-level declaration found in a snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    StructOrUnion {
        name: String,
        members: Vec<StructMember>,
    },
    TypeDefinition {
        name: String,
        alias: String,
    },
}

impl Declaration {
    /// Declared name
    pub fn name(&self) -> &str {
        match self {
            Declaration::StructOrUnion { name, .. } | Declaration::TypeDefinition { name, .. } => {
                name
            }
        }
    }
}

/// Malformed or ambiguous snippet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {line}, column {column})")]
pub struct ParseError {
    pub message: String,
    /// Line inside the documentation text (1-indexed)
    pub line: usize,
    /// Column inside the documentation text (0-indexed)
    pub column: usize,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Parse one snippet into its declarations, in source order
pub fn parse_snippet(snippet: &Snippet) -> Result<Vec<Declaration>, ParseError> {
    let tokens = lexer::tokenize(&snippet.text, snippet.line, snippet.column)?;
    parser::Parser::new(tokens).translation_unit()
}

/// Parse every snippet in a documentation comment
pub fn parse_documentation(documentation: &str) -> Result<Vec<Declaration>, ParseError> {
    let mut declarations = Vec::new();
    for snippet in extract_snippets(documentation) {
        declarations.extend(parse_snippet(&snippet)?);
    }
    Ok(declarations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(declarations: &[Declaration]) -> &[StructMember] {
        match &declarations[0] {
            Declaration::StructOrUnion { members, .. } => members,
            other => panic!("expected a structure, got {:?}", other),
        }
    }

    #[test]
    fn test_fold_applies_innermost() {
        let declarator = Declarator::Value.pointer().function();
        assert_eq!(declarator.to_string(), "Pointer(Function(Value))");
        let declarator = Declarator::Value.array().pointer();
        assert_eq!(declarator.to_string(), "Array(Pointer(Value))");
    }

    #[test]
    fn test_parse_struct() {
        let doc = "{@snippet :\nstruct VkExtent3D {\n    uint32_t width;\n    uint32_t height;\n    uint32_t depth;\n};\n}";
        let declarations = parse_documentation(doc).unwrap();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].name(), "VkExtent3D");
        let members = members(&declarations);
        assert_eq!(members.len(), 3);
        assert_eq!(members[1].name, "height");
        assert_eq!(members[1].type_name, "uint32_t");
        assert_eq!(members[1].declarator, Declarator::Value);
        assert_eq!(members[1].line, 4);
    }

    #[test]
    fn test_parse_declarators() {
        let doc = "{@snippet :
struct VkSample {
    const void* pNext;
    char name[VK_MAX_EXTENSION_NAME_SIZE];
    void (*callback)(int, float);
    const char* const* ppNames;
    float ranges[2];
    unsigned int count;
};
}";
        let declarations = parse_documentation(doc).unwrap();
        let members = members(&declarations);
        assert_eq!(members[0].type_name, "void");
        assert!(members[0].declarator.is_value_pointer());
        assert!(members[1].declarator.is_value_array());
        assert_eq!(members[2].declarator.to_string(), "Pointer(Function(Value))");
        assert_eq!(members[3].declarator.to_string(), "Pointer(Pointer(Value))");
        assert_eq!(members[4].type_name, "float");
        assert_eq!(members[5].type_name, "unsigned int");
    }

    #[test]
    fn test_parse_typedef() {
        let doc = "{@snippet :\ntypedef struct VkExtent2D VkExtent2D;\n}";
        let declarations = parse_documentation(doc).unwrap();
        assert_eq!(
            declarations,
            vec![Declaration::TypeDefinition {
                name: "VkExtent2D".to_string(),
                alias: "VkExtent2D".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_typedef_with_body() {
        let doc = "{@snippet :\ntypedef struct { int x; } Point;\n}";
        let declarations = parse_documentation(doc).unwrap();
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].name(), "Point");
        assert_eq!(members(&declarations)[0].name, "x");
        assert!(matches!(declarations[1], Declaration::TypeDefinition { .. }));
    }

    #[test]
    fn test_duplicate_typedef_names_fail() {
        let doc = "{@snippet :\ntypedef struct A B, C;\n}";
        let err = parse_documentation(doc).unwrap_err();
        assert!(err.message.contains("type-definition name"));
    }

    #[test]
    fn test_two_type_names_fail() {
        let doc = "{@snippet :\nstruct S { uint32_t float x; };\n}";
        let err = parse_documentation(doc).unwrap_err();
        assert!(err.message.contains("Multiple type-names"));
    }

    #[test]
    fn test_missing_semicolon_fails() {
        let doc = "{@snippet :\nstruct S { uint32_t x };\n}";
        let err = parse_documentation(doc).unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_no_snippet_no_declarations() {
        assert!(parse_documentation("Just prose.").unwrap().is_empty());
    }
}
