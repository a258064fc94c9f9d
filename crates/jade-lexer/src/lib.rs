//! jade lexer
//!
//! Reads indentation-sensitive template source and produces the structural
//! token stream the tree builder consumes. Three layers, leaf to root:
//!
//! ```text
//! bytes → Cursor (code points) → Scanner (lexemes) → Evaluator (tokens)
//! ```
//!
//! Lexical errors never abort: each one is counted, collected, and reported
//! through the caller's hook (or `lexer error: ...` on stderr).
//!
//! # Example
//!
//! ```
//! use jade_lexer::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::new("div\n\tp Hello");
//! let kinds: Vec<_> = lexer.tokens().iter().map(|t| t.kind).collect();
//! assert_eq!(kinds[2], TokenKind::Indent);
//! assert_eq!(lexer.error_count(), 0);
//! ```

pub mod cursor;
pub mod diagnostic;
pub mod evaluator;
pub mod lexeme;
pub mod position;
pub mod scanner;
pub mod token;

use std::sync::Arc;

pub use cursor::Cursor;
pub use diagnostic::{Diagnostic, ErrorHook, LexErrorKind};
pub use evaluator::{Evaluator, TAB_WIDTH};
pub use lexeme::{Lexeme, LexemeKind};
pub use position::Position;
pub use scanner::Scanner;
pub use token::{Token, TokenKind};

/// Lexer configuration.
#[derive(Default)]
pub struct LexerOptions {
    /// Source name shown in positions, usually a file path.
    pub name: Option<String>,
    /// Stop with an `Error` token once more than this many errors occurred.
    pub max_errors: Option<usize>,
    /// Error callback; errors go to stderr when unset.
    pub on_error: Option<ErrorHook>,
}

impl LexerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn max_errors(mut self, limit: usize) -> Self {
        self.max_errors = Some(limit);
        self
    }

    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Position, &LexErrorKind) + Send + 'static,
    {
        self.on_error = Some(Box::new(hook));
        self
    }
}

impl std::fmt::Debug for LexerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexerOptions")
            .field("name", &self.name)
            .field("max_errors", &self.max_errors)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// One lexing pass over one document.
///
/// The lexeme and token sequences are computed on first use and cached.
pub struct Lexer<'a> {
    scanner: Scanner<'a>,
    lexemes: Option<Vec<Lexeme>>,
    tokens: Option<Vec<Token>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, LexerOptions::default())
    }

    pub fn with_options(source: &'a str, options: LexerOptions) -> Self {
        Self::from_bytes(source.as_bytes(), options)
    }

    /// Lex raw bytes; invalid UTF-8 is reported and read as U+FFFD.
    pub fn from_bytes(source: &'a [u8], options: LexerOptions) -> Self {
        let name: Option<Arc<str>> = options.name.map(Arc::from);
        let cursor = Cursor::new(source, name, options.on_error);
        Self {
            scanner: Scanner::new(cursor, options.max_errors),
            lexemes: None,
            tokens: None,
        }
    }

    pub fn lexemes(&mut self) -> &[Lexeme] {
        self.lexemes.get_or_insert_with(|| self.scanner.scan_all())
    }

    pub fn tokens(&mut self) -> &[Token] {
        if self.tokens.is_none() {
            let tokens = Evaluator::new(self.lexemes()).run();
            self.tokens = Some(tokens);
        }
        self.tokens.as_deref().unwrap_or_default()
    }

    /// Take ownership of the token stream, scanning first if needed.
    pub fn take_tokens(&mut self) -> Vec<Token> {
        self.tokens();
        self.tokens.take().unwrap_or_default()
    }

    pub fn error_count(&self) -> usize {
        self.scanner.cursor().error_count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.scanner.cursor().diagnostics()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.scanner.into_cursor().into_diagnostics()
    }
}

/// Tokenize a source string with default options.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).take_tokens()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[test]
    fn test_tokens_are_cached() {
        let mut lexer = Lexer::with_options("p 0x", LexerOptions::new().on_error(|_, _| {}));
        let first = lexer.tokens().to_vec();
        let second = lexer.tokens().to_vec();
        assert_eq!(first, second);
        assert_eq!(lexer.error_count(), 1);
    }

    #[test]
    fn test_named_source_positions() {
        let mut lexer = Lexer::with_options("a\n b", LexerOptions::new().name("page.jade"));
        let b = lexer
            .tokens()
            .iter()
            .find(|t| t.value == "b")
            .unwrap()
            .clone();
        assert_eq!(b.pos.to_string(), "page.jade:2:2");
    }

    #[test]
    fn test_hook_and_diagnostics_agree() {
        let seen = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&seen);
        let options = LexerOptions::new().on_error(move |_, _| *counter.lock().unwrap() += 1);
        let mut lexer = Lexer::with_options("p '\\q'\np 09", options);
        lexer.tokens();
        assert_eq!(*seen.lock().unwrap(), 2);
        let kinds: Vec<_> = lexer.diagnostics().iter().map(|d| d.kind.clone()).collect();
        assert_eq!(kinds, vec![LexErrorKind::IllegalEscape, LexErrorKind::IllegalOctal]);
    }

    #[test]
    fn test_from_bytes_reports_invalid_utf8() {
        let mut lexer = Lexer::from_bytes(b"p a\xFFb", LexerOptions::new().on_error(|_, _| {}));
        lexer.tokens();
        assert_eq!(lexer.error_count(), 1);
        assert_eq!(lexer.diagnostics()[0].kind, LexErrorKind::Read);
    }

    #[test]
    fn test_tokenize() {
        let kinds: Vec<_> = tokenize("a").into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::Eof]);
    }
}
