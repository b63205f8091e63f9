//! Recursive-descent parser over snippet tokens

use super::lexer::{Token, TokenKind};
use super::{Declaration, Declarator, ParseError, StructMember};

const STORAGE_CLASSES: &[&str] = &["extern", "static", "auto", "register", "inline", "_Thread_local"];
const QUALIFIERS: &[&str] = &["const", "volatile", "restrict", "_Atomic"];
const PRIMITIVES: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "_Bool",
    "_Complex",
];

/// The type specifier collected from a specifier list
#[derive(Debug)]
enum TypeSpec {
    Primitive(String),
    Named(String),
    Struct {
        tag: Option<String>,
        members: Option<Vec<StructMember>>,
    },
    Enum(Option<String>),
}

/// Fragments of one declaration, checked for conflicts as they arrive
#[derive(Debug, Default)]
struct Fragments {
    typedef: bool,
    typedef_name: Option<String>,
    type_spec: Option<TypeSpec>,
}

impl Fragments {
    fn set_typedef(&mut self, token: &Token) -> Result<(), ParseError> {
        if self.typedef {
            return Err(error_at("Multiple typedef specifiers found", token));
        }
        self.typedef = true;
        Ok(())
    }

    fn set_typedef_name(&mut self, name: String, token: &Token) -> Result<(), ParseError> {
        if self.typedef_name.is_some() {
            return Err(error_at("Multiple type-definition names found", token));
        }
        self.typedef_name = Some(name);
        Ok(())
    }

    fn set_type(&mut self, spec: TypeSpec, token: &Token) -> Result<(), ParseError> {
        match (&mut self.type_spec, spec) {
            (None, spec) => self.type_spec = Some(spec),
            (Some(TypeSpec::Primitive(words)), TypeSpec::Primitive(word)) => {
                words.push(' ');
                words.push_str(&word);
            }
            (Some(_), _) => return Err(error_at("Multiple type-names found", token)),
        }
        Ok(())
    }

    fn type_keyword(&self) -> String {
        match &self.type_spec {
            Some(TypeSpec::Primitive(name)) | Some(TypeSpec::Named(name)) => name.clone(),
            Some(TypeSpec::Struct { tag, .. }) | Some(TypeSpec::Enum(tag)) => {
                tag.clone().unwrap_or_default()
            }
            None => String::new(),
        }
    }

    fn into_declarations(self, token: &Token) -> Result<Vec<Declaration>, ParseError> {
        let alias = self.type_keyword();
        let (tag, members) = match self.type_spec {
            Some(TypeSpec::Struct { tag, members }) => (tag, members),
            _ => (None, None),
        };

        let mut declarations = Vec::new();
        if self.typedef {
            let name = self
                .typedef_name
                .ok_or_else(|| error_at("Missing type-definition name", token))?;
            if let Some(members) = members {
                declarations.push(Declaration::StructOrUnion {
                    name: tag.unwrap_or_else(|| name.clone()),
                    members,
                });
            }
            let alias = if alias.is_empty() { name.clone() } else { alias };
            declarations.push(Declaration::TypeDefinition { name, alias });
        } else if let (Some(name), Some(members)) = (tag, members) {
            declarations.push(Declaration::StructOrUnion { name, members });
        }
        Ok(declarations)
    }
}

fn error_at(message: impl Into<String>, token: &Token) -> ParseError {
    ParseError::new(message, token.line, token.column)
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_is(&self, c: char) -> bool {
        self.peek().is_some_and(|t| t.is_punct(c))
    }

    fn next(&mut self) -> Result<Token, ParseError> {
        let token = self.tokens.get(self.position).cloned().ok_or_else(|| self.eof())?;
        self.position += 1;
        Ok(token)
    }

    fn eof(&self) -> ParseError {
        match self.tokens.last() {
            Some(last) => error_at("Unexpected end of snippet", last),
            None => ParseError::new("Unexpected end of snippet", 0, 0),
        }
    }

    fn expect(&mut self, c: char) -> Result<Token, ParseError> {
        let token = self.next()?;
        if token.is_punct(c) {
            Ok(token)
        } else {
            Err(error_at(
                format!("Expected `{}`, found {}", c, token.describe()),
                &token,
            ))
        }
    }

    /// Skip a bracketed group whose opening token was just consumed
    fn skip_group(&mut self, open: char, close: char) -> Result<(), ParseError> {
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.next()?;
            if token.is_punct(open) {
                depth += 1;
            } else if token.is_punct(close) {
                depth -= 1;
            }
        }
        Ok(())
    }

    /// Skip a constant expression up to (not including) `,` `;` or `}`
    fn skip_expression(&mut self) -> Result<(), ParseError> {
        while let Some(token) = self.peek() {
            if token.is_punct(',') || token.is_punct(';') || token.is_punct('}') {
                return Ok(());
            }
            let token = self.next()?;
            match token.kind {
                TokenKind::Punct('(') => self.skip_group('(', ')')?,
                TokenKind::Punct('[') => self.skip_group('[', ']')?,
                TokenKind::Punct('{') => self.skip_group('{', '}')?,
                _ => {}
            }
        }
        Err(self.eof())
    }

    pub fn translation_unit(mut self) -> Result<Vec<Declaration>, ParseError> {
        let mut declarations = Vec::new();
        while let Some(token) = self.peek() {
            if token.is_punct(';') {
                self.position += 1;
                continue;
            }
            declarations.extend(self.declaration()?);
        }
        Ok(declarations)
    }

    fn declaration(&mut self) -> Result<Vec<Declaration>, ParseError> {
        let mut fragments = Fragments::default();
        self.specifiers(&mut fragments, true)?;

        if !self.peek_is(';') {
            loop {
                let start = self.peek().cloned().ok_or_else(|| self.eof())?;
                let (name, _) = self.declarator()?;
                if fragments.typedef {
                    fragments.set_typedef_name(name, &start)?;
                }
                if self.peek_is('=') {
                    self.position += 1;
                    self.skip_expression()?;
                }
                if !self.peek_is(',') {
                    break;
                }
                self.position += 1;
            }
        }

        let end = self.expect(';')?;
        fragments.into_declarations(&end)
    }

    fn specifiers(&mut self, fragments: &mut Fragments, top_level: bool) -> Result<(), ParseError> {
        let first = self.peek().cloned().ok_or_else(|| self.eof())?;
        while let Some(token) = self.peek().cloned() {
            let Some(word) = token.ident() else { break };

            if word == "typedef" {
                if !top_level {
                    return Err(error_at("Unexpected typedef in a structure member", &token));
                }
                fragments.set_typedef(&token)?;
                self.position += 1;
            } else if STORAGE_CLASSES.contains(&word) || QUALIFIERS.contains(&word) {
                self.position += 1;
            } else if PRIMITIVES.contains(&word) {
                fragments.set_type(TypeSpec::Primitive(word.to_string()), &token)?;
                self.position += 1;
            } else if word == "struct" || word == "union" {
                self.position += 1;
                let spec = self.struct_or_union()?;
                fragments.set_type(spec, &token)?;
            } else if word == "enum" {
                self.position += 1;
                let spec = self.enum_specifier()?;
                fragments.set_type(spec, &token)?;
            } else if fragments.type_spec.is_none() {
                fragments.set_type(TypeSpec::Named(word.to_string()), &token)?;
                self.position += 1;
            } else {
                break;
            }
        }

        if fragments.type_spec.is_none() {
            return Err(error_at(
                format!("Expected a type specifier, found {}", first.describe()),
                &first,
            ));
        }
        Ok(())
    }

    fn optional_tag(&mut self) -> Option<String> {
        let tag = self.peek().and_then(|t| t.ident()).map(str::to_string)?;
        self.position += 1;
        Some(tag)
    }

    fn struct_or_union(&mut self) -> Result<TypeSpec, ParseError> {
        let tag = self.optional_tag();
        let members = if self.peek_is('{') {
            self.position += 1;
            let mut members = Vec::new();
            while !self.peek_is('}') {
                if self.peek().is_none() {
                    return Err(self.eof());
                }
                self.struct_declaration(&mut members)?;
            }
            self.expect('}')?;
            Some(members)
        } else {
            None
        };
        Ok(TypeSpec::Struct { tag, members })
    }

    fn enum_specifier(&mut self) -> Result<TypeSpec, ParseError> {
        let tag = self.optional_tag();
        if self.peek_is('{') {
            self.position += 1;
            self.skip_group('{', '}')?;
        }
        Ok(TypeSpec::Enum(tag))
    }

    fn struct_declaration(&mut self, members: &mut Vec<StructMember>) -> Result<(), ParseError> {
        let mut fragments = Fragments::default();
        self.specifiers(&mut fragments, false)?;
        let type_name = fragments.type_keyword();

        if !self.peek_is(';') {
            loop {
                if self.peek_is(':') {
                    self.position += 1;
                    self.skip_expression()?;
                } else {
                    let start = self.peek().cloned().ok_or_else(|| self.eof())?;
                    let (name, declarator) = self.declarator()?;
                    if self.peek_is(':') {
                        self.position += 1;
                        self.skip_expression()?;
                    }
                    members.push(StructMember {
                        name,
                        type_name: type_name.clone(),
                        declarator,
                        line: start.line,
                        column: start.column,
                    });
                }
                if !self.peek_is(',') {
                    break;
                }
                self.position += 1;
            }
        }

        self.expect(';')?;
        Ok(())
    }

    fn declarator(&mut self) -> Result<(String, Declarator), ParseError> {
        let mut pointers = 0;
        while self.peek_is('*') {
            self.position += 1;
            pointers += 1;
            while self
                .peek()
                .and_then(|t| t.ident())
                .is_some_and(|word| QUALIFIERS.contains(&word))
            {
                self.position += 1;
            }
        }

        let (name, mut declarator) = self.direct_declarator()?;
        for _ in 0..pointers {
            declarator = declarator.pointer();
        }
        Ok((name, declarator))
    }

    fn direct_declarator(&mut self) -> Result<(String, Declarator), ParseError> {
        let token = self.next()?;
        let (name, mut declarator) = match &token.kind {
            TokenKind::Ident(name) => (name.clone(), Declarator::Value),
            TokenKind::Punct('(') => {
                let inner = self.declarator()?;
                self.expect(')')?;
                inner
            }
            _ => {
                return Err(error_at(
                    format!("Expected a declarator, found {}", token.describe()),
                    &token,
                ))
            }
        };

        loop {
            if self.peek_is('[') {
                self.position += 1;
                self.skip_group('[', ']')?;
                declarator = declarator.array();
            } else if self.peek_is('(') {
                self.position += 1;
                self.skip_group('(', ')')?;
                declarator = declarator.function();
            } else {
                break;
            }
        }
        Ok((name, declarator))
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn parse(text: &str) -> Result<Vec<Declaration>, ParseError> {
        Parser::new(tokenize(text, 1, 0)?).translation_unit()
    }

    #[test]
    fn test_forward_declaration_is_ignored() {
        assert!(parse("struct VkInstance_T;").unwrap().is_empty());
    }

    #[test]
    fn test_handle_typedef() {
        let declarations = parse("typedef struct VkInstance_T* VkInstance;").unwrap();
        assert_eq!(
            declarations,
            vec![Declaration::TypeDefinition {
                name: "VkInstance".to_string(),
                alias: "VkInstance_T".to_string(),
            }]
        );
    }

    #[test]
    fn test_scalar_typedef() {
        let declarations = parse("typedef uint32_t VkFlags;").unwrap();
        assert_eq!(declarations[0].name(), "VkFlags");
    }

    #[test]
    fn test_bitfields_and_enums() {
        let declarations = parse(
            "struct S { uint32_t a : 8; uint32_t : 24; enum Mode { A = 1, B } mode; };",
        )
        .unwrap();
        match &declarations[0] {
            Declaration::StructOrUnion { members, .. } => {
                assert_eq!(members.len(), 2);
                assert_eq!(members[1].type_name, "Mode");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_union_body() {
        let declarations = parse("union VkClearColorValue { float float32[4]; int32_t int32[4]; };")
            .unwrap();
        assert_eq!(declarations[0].name(), "VkClearColorValue");
    }

    #[test]
    fn test_typedef_in_member_fails() {
        assert!(parse("struct S { typedef int x; };").is_err());
    }

    #[test]
    fn test_double_typedef_fails() {
        let err = parse("typedef typedef int x;").unwrap_err();
        assert!(err.message.contains("typedef"));
    }

    #[test]
    fn test_missing_type_fails() {
        let err = parse("struct S { *x; };").unwrap_err();
        assert!(err.message.contains("type specifier"));
    }
}
