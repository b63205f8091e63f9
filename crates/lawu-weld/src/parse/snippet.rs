//! Locating `{@snippet : ...}` blocks and owner references in documentation

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SNIPPET_START: Regex = Regex::new(r"\{@snippet[^:{}]*:").unwrap();
    static ref OWNER_REFERENCE: Regex =
        Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\.([A-Za-z_][A-Za-z0-9_]*)").unwrap();
}

/// Body of one snippet block with its position inside the documentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub text: String,
    /// Line where `text` begins (1-indexed)
    pub line: usize,
    /// Column where `text` begins (0-indexed)
    pub column: usize,
}

/// Find every snippet block, honouring nested braces inside the body
///
/// An unterminated block runs to the end of the documentation.
pub fn extract_snippets(documentation: &str) -> Vec<Snippet> {
    let mut snippets = Vec::new();
    let mut offset = 0;

    while let Some(found) = SNIPPET_START.find_at(documentation, offset) {
        let start = found.end();
        let mut depth = 1usize;
        let mut end = documentation.len();
        for (index, c) in documentation[start..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = start + index;
                        break;
                    }
                }
                _ => {}
            }
        }

        let before = &documentation[..start];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count(),
            None => before.chars().count(),
        };
        snippets.push(Snippet {
            text: documentation[start..end].to_string(),
            line,
            column,
        });
        offset = (end + 1).min(documentation.len());
        if end == documentation.len() {
            break;
        }
    }

    snippets
}

/// Owners referenced as `Owner.CONSTANT` for the given constant name
pub fn owner_references(text: &str, constant: &str) -> Vec<String> {
    OWNER_REFERENCE
        .captures_iter(text)
        .filter(|captures| &captures[2] == constant)
        .map(|captures| captures[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single() {
        let snippets = extract_snippets("Docs.\n{@snippet :\nint x;\n}\nMore.");
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].text, "\nint x;\n");
        assert_eq!(snippets[0].line, 2);
        assert_eq!(snippets[0].column, 11);
    }

    #[test]
    fn test_marker_attributes() {
        let snippets = extract_snippets("{@snippet lang=c : int x; }");
        assert_eq!(snippets[0].text, " int x; ");
    }

    #[test]
    fn test_nested_braces() {
        let snippets = extract_snippets("{@snippet : struct S { int a; }; }");
        assert_eq!(snippets[0].text, " struct S { int a; }; ");
    }

    #[test]
    fn test_multiple_and_unterminated() {
        let snippets = extract_snippets("{@snippet : a } {@snippet:b");
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[1].text, "b");
    }

    #[test]
    fn test_owner_references() {
        let text = "enum VkQueueFlagBits.VK_QUEUE_GRAPHICS_BIT = 1;";
        assert_eq!(
            owner_references(text, "VK_QUEUE_GRAPHICS_BIT"),
            vec!["VkQueueFlagBits".to_string()]
        );
        assert!(owner_references(text, "VK_QUEUE_COMPUTE_BIT").is_empty());
    }
}
