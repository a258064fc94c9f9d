use std::fmt;

use crate::position::Position;

/// Structural token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A tag name, an attribute name or value, or a run of free text.
    Ident,
    /// A quoted string, quotes included.
    String,
    /// A verbatim text block; the value is the rest of the line.
    StringFlag,
    Comma,
    Assign,
    NewLine,
    Indent,
    Dedent,
    Eof,
    Error,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Ident => "Ident",
            TokenKind::String => "String",
            TokenKind::StringFlag => "StringFlag",
            TokenKind::Comma => "Comma",
            TokenKind::Assign => "Assign",
            TokenKind::NewLine => "NewLine",
            TokenKind::Indent => "Indent",
            TokenKind::Dedent => "Dedent",
            TokenKind::Eof => "EOF",
            TokenKind::Error => "Error",
        }
    }
}

/// A token produced by the indentation evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub pos: Position,
    /// Whitespace between this token and the previous one on its line,
    /// exactly as written. Empty when they touch.
    pub space: String,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, pos: Position) -> Self {
        Self {
            kind,
            value: value.into(),
            pos,
            space: String::new(),
        }
    }

    /// A token with no text (`Indent`, `Dedent`, `NewLine`, `Eof`).
    pub fn marker(kind: TokenKind, pos: Position) -> Self {
        Self::new(kind, "", pos)
    }

    pub fn with_space(mut self, space: impl Into<String>) -> Self {
        self.space = space.into();
        self
    }

    /// String contents without the surrounding quotes. An unterminated
    /// literal has only its opening quote removed.
    pub fn unquoted(&self) -> &str {
        let mut chars = self.value.chars();
        match chars.next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = chars.as_str();
                inner.strip_suffix(quote).unwrap_or(inner)
            }
            _ => &self.value,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.pos, self.kind.name())?;
        if !self.value.is_empty() {
            write!(f, " {:?}", self.value)?;
        }
        Ok(())
    }
}
