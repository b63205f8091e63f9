//! Tokenizer for declaration snippets

use super::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident(String),
    Number(String),
    Punct(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Ident(name) | TokenKind::Number(name) => format!("`{}`", name),
            TokenKind::Punct(c) => format!("`{}`", c),
        }
    }
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl Cursor<'_> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn take_while(&mut self, first: char, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::from(first);
        while let Some(c) = self.peek().filter(|&c| accept(c)) {
            text.push(c);
            self.bump();
        }
        text
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }
}

/// Split snippet text into tokens
///
/// `line` and `column` give the position of the first character, so token
/// positions refer to the enclosing documentation text. Comments and
/// preprocessor lines are dropped.
pub(crate) fn tokenize(text: &str, line: usize, column: usize) -> Result<Vec<Token>, ParseError> {
    let mut cursor = Cursor {
        chars: text.chars().peekable(),
        line,
        column,
    };
    let mut tokens = Vec::new();
    let mut line_start = true;

    while let Some(c) = cursor.peek() {
        let (line, column) = (cursor.line, cursor.column);

        if c == '\n' {
            cursor.bump();
            line_start = true;
            continue;
        }
        if c.is_whitespace() {
            cursor.bump();
            continue;
        }
        if c == '#' && line_start {
            cursor.skip_line();
            continue;
        }
        line_start = false;
        cursor.bump();

        if c == '/' && cursor.peek() == Some('/') {
            cursor.skip_line();
            continue;
        }
        if c == '/' && cursor.peek() == Some('*') {
            cursor.bump();
            let mut previous = '\0';
            loop {
                match cursor.bump() {
                    Some('/') if previous == '*' => break,
                    Some(next) => previous = next,
                    None => return Err(ParseError::new("Unterminated comment", line, column)),
                }
            }
            continue;
        }

        let kind = if c.is_ascii_alphabetic() || c == '_' {
            TokenKind::Ident(cursor.take_while(c, |c| c.is_ascii_alphanumeric() || c == '_'))
        } else if c.is_ascii_digit() {
            TokenKind::Number(cursor.take_while(c, |c| c.is_ascii_alphanumeric() || c == '.'))
        } else {
            TokenKind::Punct(c)
        };
        tokens.push(Token { kind, line, column });
    }

    Ok(tokens)
}
