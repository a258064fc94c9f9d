//! Indentation evaluator.
//!
//! Turns the flat lexeme sequence into the structural token stream consumed
//! by the tree builder:
//!
//! ```text
//! div id=main          Ident(div) Ident(id) Assign Ident(main) NewLine
//!     p Hello, World!  Indent Ident(p) Ident(Hello) Comma Ident(World!)
//! h1 Title             NewLine Dedent Ident(h1) Ident(Title) EOF
//! ```
//!
//! The first word of a line is always its own `Ident`. After it the line is
//! in text mode: words, numbers and stray punctuation fold into one text
//! token until something structural (a string, comma, assign, newline)
//! interrupts the run. Words on either side of an `=` stay separate so the
//! builder can see attribute pairs.

use crate::lexeme::{Lexeme, LexemeKind};
use crate::position::Position;
use crate::token::{Token, TokenKind};

/// Columns a tab advances the indentation width by.
pub const TAB_WIDTH: usize = 8;

/// Text folded from several lexemes, not yet emitted.
struct Pending {
    text: String,
    pos: Position,
    space: String,
    /// Whitespace after the last folded piece; only kept if more text follows.
    gap: String,
}

pub struct Evaluator<'l> {
    lexemes: &'l [Lexeme],
    index: usize,
    tokens: Vec<Token>,
    levels: Vec<usize>,
    /// No token has been produced on this line yet.
    line_start: bool,
    /// The line's leading word has been emitted.
    text_mode: bool,
    /// Indentation width measured so far on this line.
    width: usize,
    /// Only whitespace has been seen on this line so far.
    measuring: bool,
    /// Whitespace since the last emitted token.
    space: String,
    after_assign: bool,
    pending: Option<Pending>,
}

impl<'l> Evaluator<'l> {
    pub fn new(lexemes: &'l [Lexeme]) -> Self {
        Self {
            lexemes,
            index: 0,
            tokens: Vec::new(),
            levels: vec![0],
            line_start: true,
            text_mode: false,
            width: 0,
            measuring: true,
            space: String::new(),
            after_assign: false,
            pending: None,
        }
    }

    /// Evaluate every lexeme. The result always ends with `Eof` or `Error`,
    /// even if the lexemes were cut short.
    pub fn run(mut self) -> Vec<Token> {
        let lexemes = self.lexemes;
        while let Some(lexeme) = lexemes.get(self.index) {
            self.index += 1;
            if !matches!(lexeme.kind, LexemeKind::Whitespace | LexemeKind::NewLine) {
                self.measuring = false;
            }
            match lexeme.kind {
                LexemeKind::Word => self.word(lexeme),
                LexemeKind::Int | LexemeKind::Float => self.number(lexeme),
                LexemeKind::Null => {
                    if self.text_mode {
                        self.fold(lexeme);
                    }
                }
                LexemeKind::String => self.structural(TokenKind::String, lexeme),
                LexemeKind::Comma => self.structural(TokenKind::Comma, lexeme),
                LexemeKind::Assign => self.structural(TokenKind::Assign, lexeme),
                LexemeKind::StringFlag => self.verbatim(lexeme),
                LexemeKind::Whitespace => self.whitespace(lexeme),
                LexemeKind::NewLine => self.newline(lexeme),
                LexemeKind::Comment => {}
                LexemeKind::Eof => {
                    self.close(&lexeme.pos);
                    self.push(Token::marker(TokenKind::Eof, lexeme.pos.clone()));
                    return self.tokens;
                }
                LexemeKind::Error => {
                    self.close(&lexeme.pos);
                    self.push(Token::new(TokenKind::Error, lexeme.text.as_str(), lexeme.pos.clone()));
                    return self.tokens;
                }
            }
            if !matches!(lexeme.kind, LexemeKind::Whitespace | LexemeKind::Comment) {
                self.after_assign = lexeme.kind == LexemeKind::Assign;
            }
        }

        let pos = lexemes.last().map(|l| l.pos.clone()).unwrap_or_default();
        self.close(&pos);
        self.push(Token::marker(TokenKind::Eof, pos));
        self.tokens
    }

    // --- Lexeme handlers ---

    fn word(&mut self, lexeme: &Lexeme) {
        self.begin_content(&lexeme.pos);
        if !self.text_mode {
            self.text_mode = true;
            self.emit(TokenKind::Ident, lexeme);
        } else if self.after_assign || self.next_is_assign() {
            self.emit(TokenKind::Ident, lexeme);
        } else {
            self.fold(lexeme);
        }
    }

    fn number(&mut self, lexeme: &Lexeme) {
        if self.after_assign {
            self.emit(TokenKind::Ident, lexeme);
        } else if self.text_mode {
            self.fold(lexeme);
        }
    }

    fn structural(&mut self, kind: TokenKind, lexeme: &Lexeme) {
        self.begin_content(&lexeme.pos);
        self.emit(kind, lexeme);
    }

    /// A backtick takes the rest of the line verbatim, whatever it lexed as.
    fn verbatim(&mut self, flag: &Lexeme) {
        self.begin_content(&flag.pos);
        let mut text = String::new();
        while let Some(next) = self.lexemes.get(self.index) {
            if matches!(
                next.kind,
                LexemeKind::NewLine | LexemeKind::Eof | LexemeKind::Error
            ) {
                break;
            }
            text.push_str(&next.text);
            self.index += 1;
        }
        self.text_mode = true;
        self.flush();
        let token = Token::new(TokenKind::StringFlag, text.trim(), flag.pos.clone());
        self.push_spaced(token);
    }

    /// Leading whitespace counts toward the indentation width only before
    /// anything else on the line, dropped comments and punctuation included.
    fn whitespace(&mut self, lexeme: &Lexeme) {
        if self.line_start {
            if self.measuring {
                self.width += lexeme
                    .text
                    .chars()
                    .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
                    .sum::<usize>();
            }
            return;
        }
        self.space.push_str(&lexeme.text);
        if let Some(pending) = self.pending.as_mut() {
            pending.gap.push_str(&lexeme.text);
        }
    }

    /// Lines that produced no token (blank, whitespace or comment only) emit
    /// nothing, which also collapses runs of line breaks into one `NewLine`.
    fn newline(&mut self, lexeme: &Lexeme) {
        if !self.line_start {
            self.flush();
            self.push(Token::marker(TokenKind::NewLine, lexeme.pos.clone()));
        }
        self.line_start = true;
        self.text_mode = false;
        self.width = 0;
        self.measuring = true;
        self.space.clear();
    }

    // --- Indentation ---

    fn begin_content(&mut self, pos: &Position) {
        if self.line_start {
            self.line_start = false;
            self.indent_to(self.width, pos);
        }
    }

    fn indent_to(&mut self, width: usize, pos: &Position) {
        if width > self.top() {
            self.levels.push(width);
            self.push(Token::marker(TokenKind::Indent, pos.clone()));
            return;
        }
        while self.levels.len() > 1 && self.top() > width {
            self.levels.pop();
            self.push(Token::marker(TokenKind::Dedent, pos.clone()));
        }
        if self.top() != width {
            log::debug!(
                "{pos}: indentation {width} matches no enclosing level, using {}",
                self.top()
            );
            // Later lines at this column are siblings of this one.
            if let Some(top) = self.levels.last_mut() {
                *top = width;
            }
        }
    }

    /// Flush pending text and unwind every open level.
    fn close(&mut self, pos: &Position) {
        self.flush();
        while self.levels.len() > 1 {
            self.levels.pop();
            self.push(Token::marker(TokenKind::Dedent, pos.clone()));
        }
    }

    fn top(&self) -> usize {
        self.levels.last().copied().unwrap_or(0)
    }

    // --- Text folding ---

    fn fold(&mut self, lexeme: &Lexeme) {
        match self.pending.as_mut() {
            Some(pending) => {
                pending.text.push_str(&pending.gap);
                pending.text.push_str(&lexeme.text);
                pending.gap.clear();
            }
            None => {
                self.pending = Some(Pending {
                    text: lexeme.text.clone(),
                    pos: lexeme.pos.clone(),
                    space: std::mem::take(&mut self.space),
                    gap: String::new(),
                });
            }
        }
        self.space.clear();
    }

    fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            let token = Token::new(TokenKind::Ident, pending.text, pending.pos);
            self.push(token.with_space(pending.space));
        }
    }

    /// Whether the next lexeme other than whitespace is `=`.
    fn next_is_assign(&self) -> bool {
        self.lexemes[self.index..]
            .iter()
            .find(|l| l.kind != LexemeKind::Whitespace)
            .is_some_and(|l| l.kind == LexemeKind::Assign)
    }

    // --- Emission ---

    fn emit(&mut self, kind: TokenKind, lexeme: &Lexeme) {
        self.flush();
        let token = Token::new(kind, lexeme.text.as_str(), lexeme.pos.clone());
        self.push_spaced(token);
    }

    fn push_spaced(&mut self, token: Token) {
        let space = std::mem::take(&mut self.space);
        self.push(token.with_space(space));
    }

    fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }
}
