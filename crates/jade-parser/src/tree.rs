//! Node arena.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. Each node
//! records its parent and its ordered children, so the builder can walk up
//! and across the tree without shared ownership.

use std::ops::{Index, IndexMut};

/// Stable handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The document itself. Has no tag and renders nothing.
    Root,
    /// Created for a new line, not yet told what it is.
    Pending,
    /// An element.
    Tag,
    /// A run of bare text.
    Text,
}

/// An attribute on a tag. Repeated assignments extend `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub tag: String,
    /// In insertion order.
    pub attributes: Vec<Attribute>,
    /// Text accumulated since the last `open_string`.
    text: String,
    /// All text the node ever received.
    content: String,
    opened: bool,
    closed: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            tag: String::new(),
            attributes: Vec::new(),
            text: String::new(),
            content: String::new(),
            opened: false,
            closed: false,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_opened(&self) -> bool {
        self.opened
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Assign an attribute. A second assignment to the same name appends,
    /// separated by a space; values are never overwritten.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => {
                attr.value.push(' ');
                attr.value.push_str(value);
            }
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Append text, preceded by the whitespace that separated it in the
    /// source. The whitespace is dropped in front of the node's first text.
    pub fn push_text(&mut self, text: &str, space: &str) {
        if text.is_empty() {
            return;
        }
        if !self.content.is_empty() && !self.content.ends_with(char::is_whitespace) {
            self.text.push_str(space);
            self.content.push_str(space);
        }
        self.text.push_str(text);
        self.content.push_str(text);
    }

    /// Start tag (first call only) followed by any text accumulated since
    /// the previous call. Empty once the node is closed.
    pub fn open_string(&mut self) -> String {
        if self.closed {
            return String::new();
        }
        let mut out = String::new();
        if self.kind == NodeKind::Tag && !self.opened {
            out.push('<');
            out.push_str(&self.tag);
            for attr in &self.attributes {
                out.push_str(&format!(" {}='{}'", attr.name, escape_attribute(&attr.value)));
            }
            out.push('>');
        }
        self.opened = true;
        out.push_str(&std::mem::take(&mut self.text));
        out
    }

    /// End tag, once. Root, text and pending nodes have none.
    pub fn close_string(&mut self) -> String {
        if self.closed {
            return String::new();
        }
        self.closed = true;
        if self.kind == NodeKind::Tag {
            format!("</{}>", self.tag)
        } else {
            String::new()
        }
    }
}

/// Make a value safe inside a single-quoted attribute.
fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Arena of nodes with a single root.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a fresh `Pending` node as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(NodeKind::Pending, Some(parent)));
        self[parent].children.push(id);
        id
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self[id].parent?;
        self[parent].children.iter().position(|&c| c == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}
