use std::sync::Arc;

use crate::diagnostic::{Diagnostic, ErrorHook, LexErrorKind, Reporter};
use crate::position::Position;

const BOM: &[u8] = "\u{FEFF}".as_bytes();

/// Pull-based reader of single code points.
///
/// The cursor decodes UTF-8 on the fly. Invalid sequences are reported
/// through the error hook and read as U+FFFD so scanning can continue.
/// `None` from [`peek`](Cursor::peek) / [`advance`](Cursor::advance) is the
/// end-of-input sentinel; a NUL in the source is an ordinary character.
#[derive(Debug)]
pub struct Cursor<'a> {
    src: &'a [u8],
    pos: Position,
    reporter: Reporter,
}

/// One decoded code point: the character, its width in bytes, and whether
/// the bytes were valid.
type Decoded = (char, usize, bool);

impl<'a> Cursor<'a> {
    pub fn new(src: &'a [u8], name: Option<Arc<str>>, hook: Option<ErrorHook>) -> Self {
        let mut pos = Position::start(name);
        if src.starts_with(BOM) {
            pos.offset = BOM.len();
        }
        Self {
            src,
            pos,
            reporter: Reporter::new(hook),
        }
    }

    /// Current lookahead, without consuming it.
    pub fn peek(&self) -> Option<char> {
        decode(self.rest()).map(|(ch, _, _)| ch)
    }

    /// Consume one code point and return it.
    pub fn advance(&mut self) -> Option<char> {
        let (ch, width, valid) = decode(self.rest())?;
        if !valid {
            self.report_at(self.pos.clone(), LexErrorKind::Read);
        }
        self.pos.offset += width;
        self.pos.column += 1;
        Some(ch)
    }

    /// Consume the lookahead if `pred` accepts it.
    pub fn advance_if(&mut self, pred: impl FnOnce(char) -> bool) -> bool {
        match self.peek() {
            Some(ch) if pred(ch) => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    /// Record that a line terminator was just consumed.
    pub fn next_line(&mut self) {
        self.pos.line += 1;
        self.pos.column = 1;
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn offset(&self) -> usize {
        self.pos.offset
    }

    /// Source text between two byte offsets.
    pub fn slice(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.src[start..end]).into_owned()
    }

    /// Report an error at the current position.
    pub fn report(&mut self, kind: LexErrorKind) {
        self.report_at(self.pos.clone(), kind);
    }

    pub fn report_at(&mut self, position: Position, kind: LexErrorKind) {
        self.reporter.report(position, kind);
    }

    pub fn error_count(&self) -> usize {
        self.reporter.count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.reporter.diagnostics()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.reporter.into_diagnostics()
    }

    fn rest(&self) -> &'a [u8] {
        &self.src[self.pos.offset.min(self.src.len())..]
    }
}

fn decode(bytes: &[u8]) -> Option<Decoded> {
    if bytes.is_empty() {
        return None;
    }
    let head = &bytes[..bytes.len().min(4)];
    match std::str::from_utf8(head) {
        Ok(s) => s.chars().next().map(|ch| (ch, ch.len_utf8(), true)),
        Err(err) => {
            let first = std::str::from_utf8(&head[..err.valid_up_to()])
                .ok()
                .and_then(|s| s.chars().next());
            match first {
                Some(ch) => Some((ch, ch.len_utf8(), true)),
                // A truncated sequence at end of input has no error length.
                None => Some((
                    char::REPLACEMENT_CHARACTER,
                    err.error_len().unwrap_or(head.len()),
                    false,
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cursor(src: &str) -> Cursor<'_> {
        Cursor::new(src.as_bytes(), None, Some(Box::new(|_: &Position, _: &LexErrorKind| {})))
    }

    #[test]
    fn test_peek_does_not_consume() {
        let c = cursor("ab");
        assert_eq!(c.peek(), Some('a'));
        assert_eq!(c.peek(), Some('a'));
        assert_eq!(c.offset(), 0);
    }

    #[test]
    fn test_advance_tracks_offset_and_column() {
        let mut c = cursor("aé€");
        assert_eq!(c.advance(), Some('a'));
        assert_eq!(c.advance(), Some('é'));
        assert_eq!(c.position().offset, 3);
        assert_eq!(c.position().column, 3);
        assert_eq!(c.advance(), Some('€'));
        assert_eq!(c.position().offset, 6);
        assert_eq!(c.advance(), None);
        assert_eq!(c.peek(), None);
    }

    #[test]
    fn test_nul_is_not_eof() {
        let mut c = cursor("\0x");
        assert_eq!(c.advance(), Some('\0'));
        assert_eq!(c.advance(), Some('x'));
        assert_eq!(c.advance(), None);
    }

    #[test]
    fn test_next_line_resets_column() {
        let mut c = cursor("a\nb");
        c.advance();
        c.advance();
        c.next_line();
        assert_eq!(c.position().line, 2);
        assert_eq!(c.position().column, 1);
    }

    #[test]
    fn test_bom_is_skipped() {
        let mut c = cursor("\u{FEFF}p");
        assert_eq!(c.position().column, 1);
        assert_eq!(c.advance(), Some('p'));
    }

    #[test]
    fn test_invalid_utf8_is_reported_and_replaced() {
        let bytes = [b'a', 0xFF, b'b'];
        let mut c = Cursor::new(&bytes, None, Some(Box::new(|_: &Position, _: &LexErrorKind| {})));
        assert_eq!(c.advance(), Some('a'));
        assert_eq!(c.advance(), Some(char::REPLACEMENT_CHARACTER));
        assert_eq!(c.advance(), Some('b'));
        assert_eq!(c.error_count(), 1);
        assert_eq!(c.diagnostics()[0].kind, LexErrorKind::Read);
    }

    #[test]
    fn test_truncated_sequence_at_end() {
        let bytes = [b'a', 0xE2, 0x82];
        let mut c = Cursor::new(&bytes, None, Some(Box::new(|_: &Position, _: &LexErrorKind| {})));
        c.advance();
        assert_eq!(c.advance(), Some(char::REPLACEMENT_CHARACTER));
        assert_eq!(c.advance(), None);
        assert_eq!(c.error_count(), 1);
    }
}
