//! Rich-text document trees.
//!
//! Module content is stored by the host as a TipTap-style JSON document:
//!
//! ```json
//! {"type": "doc", "content": [
//!   {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Intro"}]},
//!   {"type": "paragraph", "content": [
//!     {"type": "text", "text": "Hello ", "marks": []},
//!     {"type": "text", "text": "world", "marks": [{"type": "bold"}]}
//!   ]}
//! ]}
//! ```
//!
//! [`DocumentNode::from_json`] turns that into an owned tree with a closed
//! set of node kinds. Unknown kinds become [`NodeKind::Container`] so their
//! children still render.

use serde_json::Value;

use crate::error::{Error, Result};

/// Maximum nesting accepted when parsing a document tree.
pub const MAX_DOCUMENT_DEPTH: usize = 64;

/// Kind of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Leaf text run.
    Text,
    Paragraph,
    /// Heading with level 1-6.
    Heading(u8),
    /// Bullet (`ordered == false`) or ordered list.
    List { ordered: bool },
    ListItem,
    /// Document root and any kind the converter does not know.
    Container,
}

/// Inline formatting applied to a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Marks {
    pub fn is_empty(&self) -> bool {
        !(self.bold || self.italic || self.underline)
    }
}

/// A node in a rich-text document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNode {
    pub kind: NodeKind,
    /// Text value, only meaningful for [`NodeKind::Text`].
    pub text: String,
    pub marks: Marks,
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// Create an empty node of the given kind.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: String::new(),
            marks: Marks::default(),
            children: Vec::new(),
        }
    }

    /// Create a text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new(NodeKind::Text)
        }
    }

    /// Builder: set marks.
    pub fn with_marks(mut self, marks: Marks) -> Self {
        self.marks = marks;
        self
    }

    /// Builder: append a child.
    pub fn with_child(mut self, child: DocumentNode) -> Self {
        self.children.push(child);
        self
    }

    /// True when the node renders to nothing.
    pub fn is_empty(&self) -> bool {
        match self.kind {
            NodeKind::Text => self.text.is_empty(),
            _ => self.children.iter().all(DocumentNode::is_empty),
        }
    }

    /// Depth of the deepest path from this node (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DocumentNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Parse a TipTap-style JSON value.
    ///
    /// Fails with [`Error::Generation`] when the tree nests deeper than
    /// [`MAX_DOCUMENT_DEPTH`] or a node is not a JSON object.
    pub fn from_json(value: &Value) -> Result<Self> {
        parse_node(value, 1)
    }
}

fn parse_node(value: &Value, depth: usize) -> Result<DocumentNode> {
    if depth > MAX_DOCUMENT_DEPTH {
        return Err(Error::Generation(format!(
            "document tree exceeds maximum depth of {MAX_DOCUMENT_DEPTH}"
        )));
    }

    let Some(obj) = value.as_object() else {
        return Err(Error::Generation("document node is not an object".into()));
    };

    let kind_name = obj.get("type").and_then(Value::as_str).unwrap_or("");
    let kind = match kind_name {
        "text" => NodeKind::Text,
        "paragraph" => NodeKind::Paragraph,
        "heading" => NodeKind::Heading(heading_level(obj.get("attrs"))),
        "bulletList" => NodeKind::List { ordered: false },
        "orderedList" => NodeKind::List { ordered: true },
        "listItem" => NodeKind::ListItem,
        // doc, blockquote, unknown extensions: keep the children
        _ => NodeKind::Container,
    };

    let mut node = DocumentNode::new(kind);

    if kind == NodeKind::Text {
        node.text = obj
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        node.marks = parse_marks(obj.get("marks"));
    }

    if let Some(children) = obj.get("content").and_then(Value::as_array) {
        node.children = children
            .iter()
            .filter(|child| !child.is_null())
            .map(|child| parse_node(child, depth + 1))
            .collect::<Result<_>>()?;
    }

    Ok(node)
}

fn heading_level(attrs: Option<&Value>) -> u8 {
    attrs
        .and_then(|a| a.get("level"))
        .and_then(Value::as_u64)
        .filter(|&l| l != 0)
        .map(|l| l.min(6) as u8)
        .unwrap_or(2)
}

fn parse_marks(marks: Option<&Value>) -> Marks {
    let mut out = Marks::default();
    let Some(list) = marks.and_then(Value::as_array) else {
        return out;
    };
    for mark in list {
        match mark.get("type").and_then(Value::as_str) {
            Some("bold") => out.bold = true,
            Some("italic") => out.italic = true,
            Some("underline") => out.underline = true,
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_paragraph_with_marks() {
        let doc = json!({"type": "doc", "content": [
            {"type": "paragraph", "content": [
                {"type": "text", "text": "Hi", "marks": [{"type": "italic"}, {"type": "bold"}]}
            ]}
        ]});
        let node = DocumentNode::from_json(&doc).unwrap();
        assert_eq!(node.kind, NodeKind::Container);
        let para = &node.children[0];
        assert_eq!(para.kind, NodeKind::Paragraph);
        let text = &para.children[0];
        assert_eq!(text.text, "Hi");
        assert!(text.marks.bold && text.marks.italic && !text.marks.underline);
    }

    #[test]
    fn test_heading_level_defaults_and_clamps() {
        let h = DocumentNode::from_json(&json!({"type": "heading"})).unwrap();
        assert_eq!(h.kind, NodeKind::Heading(2));
        let h =
            DocumentNode::from_json(&json!({"type": "heading", "attrs": {"level": 9}})).unwrap();
        assert_eq!(h.kind, NodeKind::Heading(6));
        let h =
            DocumentNode::from_json(&json!({"type": "heading", "attrs": {"level": 0}})).unwrap();
        assert_eq!(h.kind, NodeKind::Heading(2));
        let h =
            DocumentNode::from_json(&json!({"type": "heading", "attrs": {"level": 1}})).unwrap();
        assert_eq!(h.kind, NodeKind::Heading(1));
    }

    #[test]
    fn test_unknown_kind_is_container() {
        let n = DocumentNode::from_json(&json!({"type": "callout", "content": [
            {"type": "text", "text": "x"}
        ]}))
        .unwrap();
        assert_eq!(n.kind, NodeKind::Container);
        assert_eq!(n.children.len(), 1);
    }

    #[test]
    fn test_depth_limit() {
        let mut value = json!({"type": "text", "text": "leaf"});
        for _ in 0..MAX_DOCUMENT_DEPTH {
            value = json!({"type": "paragraph", "content": [value]});
        }
        let err = DocumentNode::from_json(&value).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn test_depth_at_limit_is_accepted() {
        let mut value = json!({"type": "text", "text": "leaf"});
        for _ in 1..MAX_DOCUMENT_DEPTH {
            value = json!({"type": "paragraph", "content": [value]});
        }
        let node = DocumentNode::from_json(&value).unwrap();
        assert_eq!(node.depth(), MAX_DOCUMENT_DEPTH);
    }

    #[test]
    fn test_non_object_node_rejected() {
        let err = DocumentNode::from_json(&json!({"type": "doc", "content": [42]})).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn test_is_empty() {
        assert!(DocumentNode::new(NodeKind::Container).is_empty());
        assert!(
            DocumentNode::new(NodeKind::Paragraph)
                .with_child(DocumentNode::text(""))
                .is_empty()
        );
        assert!(!DocumentNode::text("a").is_empty());
    }
}
