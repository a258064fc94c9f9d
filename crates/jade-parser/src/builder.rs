//! Tree builder and renderer.
//!
//! Consumes the token stream and renders HTML as it goes. A stack of open
//! nodes mirrors the indentation: `Indent` pushes a child of the current
//! line's node, `Dedent` finalizes and pops, and the first token of an
//! unindented line finalizes the previous line's node and starts a sibling.
//!
//! On a tag line, words after the tag name may be attributes or text:
//!
//! ```text
//! a href=/home class=nav Home     <a href='/home' class='nav'>Home</a>
//! p Hello, World!                 <p>Hello, World!</p>
//! ```
//!
//! A bare word is held as a possible attribute name until the next token
//! decides: `=` commits it, anything else turns it (and the rest of the
//! line) into text.

use jade_lexer::{Token, TokenKind};

use crate::tree::{NodeId, NodeKind, Tree};

/// A word that may still turn out to be an attribute name.
#[derive(Debug)]
struct Held {
    name: String,
    /// Source text since the name, replayed as text if the guess fails.
    raw: String,
    /// Whitespace in front of the name.
    space: String,
}

impl Held {
    fn extend(&mut self, text: &str, space: &str) {
        self.raw.push_str(space);
        self.raw.push_str(text);
    }
}

#[derive(Debug)]
enum AttrState {
    /// Not on a tag line, or the rest of the line is text.
    Off,
    /// Looking for an attribute name. `after_pair` is set right after a
    /// complete `name=value`, where a comma separates attributes.
    Expect { after_pair: bool },
    /// A bare word, uncommitted.
    Named(Held),
    /// `name=` seen, waiting for the value.
    Assigned(Held),
}

#[derive(Debug)]
pub struct Builder {
    tree: Tree,
    stack: Vec<NodeId>,
    output: String,
    attr: AttrState,
    /// A line break was seen and no node has been placed for the new line.
    line_start: bool,
    finished: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        let tree = Tree::new();
        let root = tree.root();
        Self {
            tree,
            stack: vec![root],
            output: String::new(),
            attr: AttrState::Off,
            line_start: true,
            finished: false,
        }
    }

    /// Run a whole token stream through a fresh builder.
    pub fn build(tokens: &[Token]) -> Self {
        let mut builder = Self::new();
        for token in tokens {
            builder.process(token);
        }
        builder.finish();
        builder
    }

    pub fn process(&mut self, token: &Token) {
        log::trace!("token: {token}");
        match token.kind {
            TokenKind::Indent => self.indent(),
            TokenKind::Dedent => self.dedent(),
            TokenKind::NewLine => {
                self.end_line();
                self.line_start = true;
            }
            TokenKind::Eof | TokenKind::Error => self.finish(),
            TokenKind::Ident
            | TokenKind::String
            | TokenKind::StringFlag
            | TokenKind::Comma
            | TokenKind::Assign => {
                let id = self.line_node();
                self.content(id, token);
            }
        }
        if let Some(&top) = self.stack.last() {
            log::trace!("node: {:?} attr: {:?}", self.tree[top], self.attr);
        }
    }

    /// Close every open node, innermost first. Safe to call repeatedly.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.end_line();
        while self.stack.len() > 1 {
            self.pop_finalized();
        }
        let root = self.tree.root();
        let tail = self.tree[root].close_string();
        self.write_close(&tail);
        self.output = self.output.trim().to_string();
        self.finished = true;
    }

    /// HTML rendered so far; complete after [`finish`](Builder::finish).
    pub fn html(&self) -> &str {
        &self.output
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_html(mut self) -> String {
        self.finish();
        self.output
    }

    // --- Structure ---

    fn indent(&mut self) {
        self.end_line();
        let parent = self.current();
        self.write_open(parent);
        let child = self.tree.add_child(parent);
        self.stack.push(child);
        self.line_start = false;
    }

    fn dedent(&mut self) {
        self.end_line();
        if self.stack.len() > 1 {
            self.pop_finalized();
        }
    }

    /// The node this line's content goes into, starting a sibling of the
    /// previous line's node if this is the line's first token.
    fn line_node(&mut self) -> NodeId {
        let root = self.tree.root();
        if self.line_start || self.current() == root {
            self.line_start = false;
            if self.current() != root {
                self.pop_finalized();
            }
            let child = self.tree.add_child(self.current());
            self.stack.push(child);
        }
        self.current()
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.tree.root())
    }

    fn pop_finalized(&mut self) {
        if let Some(id) = self.stack.pop() {
            self.finalize(id);
        }
    }

    fn finalize(&mut self, id: NodeId) {
        self.write_open(id);
        let node = &mut self.tree[id];
        let close = node.close_string();
        if node.kind == NodeKind::Text {
            // Stands in for the line break that ended the text.
            self.output.push(' ');
        }
        self.write_close(&close);
    }

    /// A text node's first output is kept apart from text already written
    /// in front of it.
    fn write_open(&mut self, id: NodeId) {
        let node = &mut self.tree[id];
        let first_text = node.kind == NodeKind::Text && !node.is_opened();
        let open = node.open_string();
        if first_text
            && !open.is_empty()
            && !self.output.is_empty()
            && !self.output.ends_with(|c: char| c.is_whitespace() || c == '>')
        {
            self.output.push(' ');
        }
        self.output.push_str(&open);
    }

    fn write_close(&mut self, close: &str) {
        if close.is_empty() {
            return;
        }
        let trimmed = self.output.trim_end().len();
        self.output.truncate(trimmed);
        self.output.push_str(close);
    }

    // --- Content ---

    fn content(&mut self, id: NodeId, token: &Token) {
        match self.tree[id].kind {
            NodeKind::Pending => self.first_token(id, token),
            NodeKind::Tag => self.attribute(id, token),
            NodeKind::Text | NodeKind::Root => {
                self.tree[id].push_text(&token.value, &token.space);
            }
        }
    }

    fn first_token(&mut self, id: NodeId, token: &Token) {
        let node = &mut self.tree[id];
        if token.kind == TokenKind::Ident {
            node.kind = NodeKind::Tag;
            node.tag = token.value.clone();
            self.attr = AttrState::Expect { after_pair: false };
        } else {
            node.kind = NodeKind::Text;
            node.push_text(&token.value, "");
        }
    }

    /// Attribute disambiguation for one token on a tag line.
    fn attribute(&mut self, id: NodeId, token: &Token) {
        let state = std::mem::replace(&mut self.attr, AttrState::Off);
        let value = token.value.as_str();
        let space = token.space.as_str();
        let kind = token.kind;
        self.attr = match state {
            AttrState::Off => {
                self.text(id, value, space);
                AttrState::Off
            }
            AttrState::Expect { after_pair } => match kind {
                TokenKind::Ident => AttrState::Named(Held {
                    name: value.to_string(),
                    raw: value.to_string(),
                    space: space.to_string(),
                }),
                TokenKind::Comma if after_pair => AttrState::Expect { after_pair: false },
                _ => {
                    self.text(id, value, space);
                    AttrState::Off
                }
            },
            AttrState::Named(mut held) => match kind {
                TokenKind::Assign => {
                    held.extend(value, space);
                    AttrState::Assigned(held)
                }
                _ => {
                    self.text(id, &held.raw, &held.space);
                    self.text(id, value, space);
                    AttrState::Off
                }
            },
            AttrState::Assigned(held) => match kind {
                TokenKind::Ident => {
                    self.tree[id].set_attribute(&held.name, value);
                    AttrState::Expect { after_pair: true }
                }
                TokenKind::String => {
                    self.tree[id].set_attribute(&held.name, token.unquoted());
                    AttrState::Expect { after_pair: true }
                }
                _ => {
                    self.text(id, &held.raw, &held.space);
                    self.text(id, value, space);
                    AttrState::Off
                }
            },
        };
    }

    /// Per-line reset: an unconfirmed attribute guess becomes text.
    fn end_line(&mut self) {
        let state = std::mem::replace(&mut self.attr, AttrState::Off);
        if let AttrState::Named(held) | AttrState::Assigned(held) = state {
            let id = self.current();
            self.text(id, &held.raw, &held.space);
        }
    }

    fn text(&mut self, id: NodeId, text: &str, space: &str) {
        self.tree[id].push_text(text, space);
    }
}
