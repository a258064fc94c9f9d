use crate::cursor::Cursor;
use crate::diagnostic::LexErrorKind;
use crate::lexeme::{Lexeme, LexemeKind};

/// Lexeme scanner.
///
/// Groups runs of characters into classified [`Lexeme`]s. Every `scan_*`
/// method starts with the cursor on the first character of its lexeme and
/// leaves it on the first character after it, so the lexeme text is always
/// the exact source slice between the two offsets.
///
/// Lexical errors are reported through the cursor and never stop the scan;
/// the only way to get an `Error` lexeme is to exceed `max_errors`.
pub struct Scanner<'a> {
    cursor: Cursor<'a>,
    max_errors: Option<usize>,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(cursor: Cursor<'a>, max_errors: Option<usize>) -> Self {
        Self {
            cursor,
            max_errors,
            finished: false,
        }
    }

    /// Scan the whole source. The result ends with exactly one `Eof` or
    /// `Error` lexeme.
    pub fn scan_all(&mut self) -> Vec<Lexeme> {
        let mut lexemes = Vec::new();
        loop {
            let lexeme = self.scan();
            let last = matches!(lexeme.kind, LexemeKind::Eof | LexemeKind::Error);
            lexemes.push(lexeme);
            if last {
                return lexemes;
            }
        }
    }

    /// Scan the next lexeme. Once `Eof` or `Error` has been returned, every
    /// further call returns `Eof`.
    pub fn scan(&mut self) -> Lexeme {
        let pos = self.cursor.position().clone();
        if self.finished {
            return Lexeme::new(LexemeKind::Eof, "", pos);
        }
        if self.over_limit() {
            self.finished = true;
            self.cursor.report(LexErrorKind::TooManyErrors);
            return Lexeme::new(
                LexemeKind::Error,
                LexErrorKind::TooManyErrors.to_string(),
                pos,
            );
        }

        let start = self.cursor.offset();
        let Some(ch) = self.cursor.peek() else {
            self.finished = true;
            return Lexeme::new(LexemeKind::Eof, "", pos);
        };

        let kind = match ch {
            c if c.is_alphabetic() || c == '_' => self.scan_word(),
            c if c.is_ascii_digit() => self.scan_number(),
            '=' => self.single(LexemeKind::Assign),
            ',' => self.single(LexemeKind::Comma),
            ' ' | '\t' => self.scan_whitespace(),
            '\n' | '\r' => self.scan_newline(),
            '"' | '\'' => self.scan_string(ch),
            '.' => {
                self.cursor.advance();
                if self.cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_mantissa();
                    self.scan_exponent();
                    LexemeKind::Float
                } else {
                    LexemeKind::Null
                }
            }
            '/' => {
                self.cursor.advance();
                match self.cursor.peek() {
                    Some('/') => self.scan_line_comment(),
                    Some('*') => self.scan_block_comment(),
                    _ => LexemeKind::Null,
                }
            }
            '`' => self.single(LexemeKind::StringFlag),
            _ => self.single(LexemeKind::Null),
        };

        let text = self.cursor.slice(start, self.cursor.offset());
        Lexeme::new(kind, text, pos)
    }

    pub fn cursor(&self) -> &Cursor<'a> {
        &self.cursor
    }

    pub fn into_cursor(self) -> Cursor<'a> {
        self.cursor
    }

    fn over_limit(&self) -> bool {
        self.max_errors
            .is_some_and(|limit| self.cursor.error_count() > limit)
    }

    fn single(&mut self, kind: LexemeKind) -> LexemeKind {
        self.cursor.advance();
        kind
    }

    // --- Scanners ---

    fn scan_word(&mut self) -> LexemeKind {
        self.cursor.advance();
        while self.cursor.advance_if(|c| c.is_alphanumeric() || c == '_') {}
        LexemeKind::Word
    }

    fn scan_whitespace(&mut self) -> LexemeKind {
        while self.cursor.advance_if(|c| c == ' ' || c == '\t') {}
        LexemeKind::Whitespace
    }

    /// `\n`, `\r`, `\r\n` and `\n\r` each end one line.
    fn scan_newline(&mut self) -> LexemeKind {
        let first = self.cursor.advance();
        let pair = match first {
            Some('\n') => '\r',
            _ => '\n',
        };
        self.cursor.advance_if(|c| c == pair);
        self.cursor.next_line();
        LexemeKind::NewLine
    }

    fn scan_number(&mut self) -> LexemeKind {
        if self.cursor.advance() == Some('0') {
            if self.cursor.advance_if(|c| c == 'x' || c == 'X') {
                let mut digits = 0;
                while self.cursor.advance_if(|c| c.is_ascii_hexdigit()) {
                    digits += 1;
                }
                if digits == 0 {
                    self.cursor.report(LexErrorKind::IllegalHex);
                }
                return LexemeKind::Int;
            }

            let mut has_8_or_9 = false;
            while let Some(c) = self.cursor.peek().filter(|c| c.is_ascii_digit()) {
                has_8_or_9 |= c > '7';
                self.cursor.advance();
            }
            if self.scan_fraction_or_exponent() {
                return LexemeKind::Float;
            }
            if has_8_or_9 {
                self.cursor.report(LexErrorKind::IllegalOctal);
            }
            return LexemeKind::Int;
        }

        self.scan_mantissa();
        if self.scan_fraction_or_exponent() {
            LexemeKind::Float
        } else {
            LexemeKind::Int
        }
    }

    fn scan_mantissa(&mut self) {
        while self.cursor.advance_if(|c| c.is_ascii_digit()) {}
    }

    /// Returns whether a fraction or an exponent was present.
    fn scan_fraction_or_exponent(&mut self) -> bool {
        let fraction = self.cursor.advance_if(|c| c == '.');
        if fraction {
            self.scan_mantissa();
        }
        let exponent = self.scan_exponent();
        fraction || exponent
    }

    fn scan_exponent(&mut self) -> bool {
        if !self.cursor.advance_if(|c| c == 'e' || c == 'E') {
            return false;
        }
        self.cursor.advance_if(|c| c == '+' || c == '-');
        self.scan_mantissa();
        true
    }

    /// Scan a quoted string. An unescaped line break or end of input closes
    /// the lexeme early; the line break itself is left for the next lexeme.
    fn scan_string(&mut self, quote: char) -> LexemeKind {
        self.cursor.advance(); // opening quote
        loop {
            match self.cursor.peek() {
                None | Some('\n') | Some('\r') => {
                    self.cursor.report(LexErrorKind::UnterminatedLiteral);
                    break;
                }
                Some(c) if c == quote => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.scan_escape(quote);
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        LexemeKind::String
    }

    fn scan_escape(&mut self, quote: char) {
        match self.cursor.peek() {
            Some(c) if c == quote || "abfnrtv\\".contains(c) => {
                self.cursor.advance();
            }
            Some('0'..='7') => self.scan_digits(8, 1, 3),
            Some('x') => {
                self.cursor.advance();
                self.scan_digits(16, 2, 2);
            }
            Some('u') => {
                self.cursor.advance();
                self.scan_digits(16, 4, 4);
            }
            Some('U') => {
                self.cursor.advance();
                self.scan_digits(16, 8, 8);
            }
            Some(c) => {
                self.cursor.report(LexErrorKind::IllegalEscape);
                if c != '\n' && c != '\r' {
                    self.cursor.advance();
                }
            }
            None => self.cursor.report(LexErrorKind::IllegalEscape),
        }
    }

    fn scan_digits(&mut self, radix: u32, min: usize, max: usize) {
        let mut count = 0;
        while count < max && self.cursor.advance_if(|c| c.is_digit(radix)) {
            count += 1;
        }
        if count < min {
            self.cursor.report(LexErrorKind::IllegalEscape);
        }
    }

    /// `// ...` up to, not including, the line break.
    fn scan_line_comment(&mut self) -> LexemeKind {
        while self.cursor.advance_if(|c| c != '\n' && c != '\r') {}
        LexemeKind::Comment
    }

    /// `/* ... */`, possibly spanning lines.
    fn scan_block_comment(&mut self) -> LexemeKind {
        self.cursor.advance(); // `*`
        loop {
            match self.cursor.advance() {
                None => {
                    self.cursor.report(LexErrorKind::UnterminatedComment);
                    break;
                }
                Some('*') if self.cursor.advance_if(|c| c == '/') => break,
                Some('\n') => self.cursor.next_line(),
                Some('\r') => {
                    self.cursor.advance_if(|c| c == '\n');
                    self.cursor.next_line();
                }
                Some(_) => {}
            }
        }
        LexemeKind::Comment
    }
}
