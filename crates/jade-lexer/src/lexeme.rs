use std::fmt;

use crate::position::Position;

/// Classification of a raw lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    Word,
    Int,
    Float,
    String,
    /// The backtick that starts a verbatim text block.
    StringFlag,
    Comment,
    NewLine,
    Whitespace,
    Comma,
    Assign,
    /// Any character the scanner does not classify.
    Null,
    Eof,
    Error,
}

impl LexemeKind {
    pub fn name(self) -> &'static str {
        match self {
            LexemeKind::Word => "Word",
            LexemeKind::Int => "Int",
            LexemeKind::Float => "Float",
            LexemeKind::String => "String",
            LexemeKind::StringFlag => "StringFlag",
            LexemeKind::Comment => "Comment",
            LexemeKind::NewLine => "NewLine",
            LexemeKind::Whitespace => "Whitespace",
            LexemeKind::Comma => "Comma",
            LexemeKind::Assign => "Assign",
            LexemeKind::Null => "Null",
            LexemeKind::Eof => "EOF",
            LexemeKind::Error => "Error",
        }
    }
}

/// A classified span of source text.
///
/// `text` is exactly the consumed substring; it is empty for `Eof`, and holds
/// the diagnostic message for `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub text: String,
    pub pos: Position,
}

impl Lexeme {
    pub fn new(kind: LexemeKind, text: impl Into<String>, pos: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            pos,
        }
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.pos, self.kind.name(), self.text)
    }
}
