use std::fmt;
use std::sync::Arc;

/// A location in source text.
///
/// Lines and columns start at 1. The offset is a byte offset into the source.
/// A position is valid if `line > 0`; `Position::default()` is the invalid one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Position {
    pub name: Option<Arc<str>>,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(name: Option<Arc<str>>, offset: usize, line: usize, column: usize) -> Self {
        Self {
            name,
            offset,
            line,
            column,
        }
    }

    /// Position of the first character of a named (or anonymous) source.
    pub fn start(name: Option<Arc<str>>) -> Self {
        Self::new(name, 0, 1, 1)
    }

    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Position {
    /// `name:line:col`, `line:col` when unnamed, `???` when neither is known.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("");
        match (self.is_valid(), name.is_empty()) {
            (true, false) => write!(f, "{name}:{}:{}", self.line, self.column),
            (true, true) => write!(f, "{}:{}", self.line, self.column),
            (false, false) => f.write_str(name),
            (false, true) => f.write_str("???"),
        }
    }
}
