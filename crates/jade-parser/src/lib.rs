//! jade parser
//!
//! Builds the node tree from the lexer's token stream and renders it to a
//! flat HTML string.
//!
//! ```text
//! source → jade_lexer::Lexer → tokens → Builder → html
//! ```
//!
//! # Example
//!
//! ```
//! let out = jade_parser::compile("div\n\tp Hello, World!");
//! assert_eq!(out.html, "<div><p>Hello, World!</p></div>");
//! assert_eq!(out.error_count, 0);
//! ```

pub mod builder;
pub mod tree;

pub use builder::Builder;
pub use tree::{Attribute, Node, NodeId, NodeKind, Tree};

use jade_lexer::{Diagnostic, Lexer, LexerOptions};

/// Result of compiling one document.
///
/// A nonzero `error_count` means the HTML may be unreliable; it is still
/// complete and well nested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub html: String,
    pub error_count: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compile a template with default options.
pub fn compile(source: &str) -> Output {
    compile_with(source, LexerOptions::default())
}

pub fn compile_with(source: &str, options: LexerOptions) -> Output {
    compile_bytes(source.as_bytes(), options)
}

/// Compile raw bytes; invalid UTF-8 is reported and replaced.
pub fn compile_bytes(source: &[u8], options: LexerOptions) -> Output {
    let mut lexer = Lexer::from_bytes(source, options);
    let html = Builder::build(lexer.tokens()).into_html();
    let error_count = lexer.error_count();
    Output {
        html,
        error_count,
        diagnostics: lexer.into_diagnostics(),
    }
}
