//! Lexical error reporting.
//!
//! Errors never abort a pass. Each one is counted, collected, and handed to
//! the caller's hook (or written to stderr when no hook is installed).

use crate::position::Position;

/// What went wrong while reading or scanning the source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    /// A byte sequence that is not valid UTF-8.
    #[error("invalid UTF-8 encoding")]
    Read,
    #[error("illegal hexadecimal number")]
    IllegalHex,
    #[error("illegal octal number")]
    IllegalOctal,
    #[error("illegal char escape")]
    IllegalEscape,
    #[error("literal not terminated")]
    UnterminatedLiteral,
    #[error("comment not terminated")]
    UnterminatedComment,
    /// The configured error limit was exceeded; scanning stops.
    #[error("too many errors")]
    TooManyErrors,
}

/// A lexical error together with the position it was detected at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{position}: {kind}")]
pub struct Diagnostic {
    pub position: Position,
    pub kind: LexErrorKind,
}

/// Caller-supplied error callback.
pub type ErrorHook = Box<dyn FnMut(&Position, &LexErrorKind) + Send>;

/// Single sink every lexical error goes through.
pub(crate) struct Reporter {
    hook: Option<ErrorHook>,
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    pub(crate) fn new(hook: Option<ErrorHook>) -> Self {
        Self {
            hook,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn report(&mut self, position: Position, kind: LexErrorKind) {
        log::debug!("lexer error at {position}: {kind}");
        match self.hook.as_mut() {
            Some(hook) => hook(&position, &kind),
            None => eprintln!("lexer error: {kind}"),
        }
        self.diagnostics.push(Diagnostic { position, kind });
    }

    pub(crate) fn count(&self) -> usize {
        self.diagnostics.len()
    }

    pub(crate) fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("hook", &self.hook.is_some())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_messages() {
        assert_eq!(LexErrorKind::IllegalHex.to_string(), "illegal hexadecimal number");
        assert_eq!(LexErrorKind::IllegalOctal.to_string(), "illegal octal number");
        assert_eq!(LexErrorKind::IllegalEscape.to_string(), "illegal char escape");
        assert_eq!(
            LexErrorKind::UnterminatedLiteral.to_string(),
            "literal not terminated"
        );
        assert_eq!(
            LexErrorKind::UnterminatedComment.to_string(),
            "comment not terminated"
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic {
            position: Position::new(Some("t.jade".into()), 4, 2, 5),
            kind: LexErrorKind::IllegalEscape,
        };
        assert_eq!(diag.to_string(), "t.jade:2:5: illegal char escape");
    }

    #[test]
    fn test_hook_receives_every_error() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut reporter = Reporter::new(Some(Box::new(move |pos: &Position, kind: &LexErrorKind| {
            sink.lock().unwrap().push(format!("{pos} {kind}"));
        })));

        reporter.report(Position::start(None), LexErrorKind::IllegalHex);
        reporter.report(Position::new(None, 9, 2, 1), LexErrorKind::IllegalOctal);

        assert_eq!(reporter.count(), 2);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "1:1 illegal hexadecimal number".to_string(),
                "2:1 illegal octal number".to_string(),
            ]
        );
    }
}
