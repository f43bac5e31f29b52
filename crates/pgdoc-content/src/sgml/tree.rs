//! Arena-backed document tree.
//!
//! Nodes live in a single `Vec` and refer to each other through [`NodeId`]
//! handles, so the tree can be walked in either direction and edited in
//! place without reference counting.
//!
//! Tree construction never restructures the input: an element contains
//! exactly what appeared between its start tag and its end tag (or the end
//! of its parent, when the end tag is missing).
//!
//! ```rust
//! use pgdoc_content::sgml::Document;
//!
//! let mut doc = Document::parse(
//!     "<chapter><title>Backup</title><para>Use <xref linkend=\"app-pgdump\"/>.</para></chapter>",
//! );
//! doc.replace_xrefs();
//!
//! let chapter = doc.find(doc.root(), "chapter").unwrap();
//! assert_eq!(doc.text(chapter), "BackupUse app-pgdump.");
//! ```

use super::lexer::{Lexer, Token};

/// HTML void elements and DocBook elements declared EMPTY.
///
/// These never contain content, whether or not they are written with `/>`.
const EMPTY_ELEMENTS: &[&str] = &[
    // HTML
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
    // DocBook
    "xref", "anchor", "co", "colspec", "spanspec", "footnoteref", "sbr", "void",
];

/// Returns true if `name` is an element that never has content.
pub fn is_empty_element(name: &str) -> bool {
    EMPTY_ELEMENTS.contains(&name)
}

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document itself.
    Root,
    /// An element with a lowercased name and its attributes.
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    /// Character data.
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed SGML/HTML document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Parse markup into a document tree.
    ///
    /// Parsing never fails: malformed markup degrades to text, and stray end
    /// tags are ignored.
    pub fn parse(content: &str) -> Self {
        let mut doc = Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        };
        let mut open: Vec<NodeId> = vec![doc.root()];

        for token in Lexer::new(content) {
            let current = open.last().copied().unwrap_or(NodeId(0));
            match token {
                Token::StartTag {
                    name,
                    attrs,
                    self_closing,
                } => {
                    let holds_content = !self_closing && !is_empty_element(&name);
                    let id = doc.push(current, NodeKind::Element { name, attrs });
                    if holds_content {
                        open.push(id);
                    }
                }
                Token::EndTag { name } => {
                    // Skip the root at index 0.
                    let matching = open
                        .iter()
                        .skip(1)
                        .rposition(|&id| doc.name(id) == Some(name.as_str()));
                    if let Some(position) = matching {
                        open.truncate(position + 1);
                    }
                }
                Token::Text(text) => doc.push_text(current, &text),
            }
        }

        doc
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    fn push_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last.0].kind {
                existing.push_str(text);
                return;
            }
        }
        self.push(parent, NodeKind::Text(text.to_string()));
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The kind of a node.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Element name, or `None` for text and root nodes.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns true if `id` is an element called `name`.
    pub fn is_element(&self, id: NodeId, name: &str) -> bool {
        self.name(id) == Some(name)
    }

    /// Attribute value of an element.
    pub fn attr(&self, id: NodeId, attr: &str) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(name, _)| name == attr)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Parent node, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Direct children in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// All descendants of `id` (not `id` itself) in document order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// All descendant elements whose name is in `names`, in document order.
    pub fn find_all(&self, id: NodeId, names: &[&str]) -> Vec<NodeId> {
        self.descendants(id)
            .filter(|&node| self.name(node).is_some_and(|name| names.contains(&name)))
            .collect()
    }

    /// First descendant element called `name`.
    pub fn find(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(id).find(|&node| self.is_element(node, name))
    }

    /// Concatenated text of a node and everything below it.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let NodeKind::Text(text) = &self.nodes[id.0].kind {
            out.push_str(text);
            return;
        }
        for &child in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// Replace a node (and its subtree) with a text node.
    ///
    /// The node keeps its position among its siblings.
    pub fn replace_with_text(&mut self, id: NodeId, text: impl Into<String>) {
        let node = &mut self.nodes[id.0];
        node.kind = NodeKind::Text(text.into());
        node.children.clear();
    }

    /// Replace every `<xref>` with its `linkend` attribute as plain text.
    ///
    /// Cross references have no content of their own, so without this the
    /// target id would vanish from the extracted text. Returns the number of
    /// references replaced.
    pub fn replace_xrefs(&mut self) -> usize {
        let xrefs = self.find_all(self.root(), &["xref"]);
        for &xref in &xrefs {
            let linkend = self.attr(xref, "linkend").unwrap_or_default().to_string();
            self.replace_with_text(xref, linkend);
        }
        xrefs.len()
    }
}

/// Pre-order iterator over a subtree. See [`Document::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}
