//! Rich text → HTML fragments.
//!
//! Walks a [`DocumentNode`] tree and emits HTML. The output depends only on
//! the tree, so identical content always renders byte-identically.
//!
//! # Example
//!
//! ```
//! use scormkit::model::{DocumentNode, Marks, NodeKind};
//! use scormkit::render::render_document;
//!
//! let doc = DocumentNode::new(NodeKind::Paragraph).with_child(
//!     DocumentNode::text("Hi").with_marks(Marks { bold: true, ..Marks::default() }),
//! );
//! assert_eq!(render_document(&doc), "<p><strong>Hi</strong></p>");
//! ```

use std::fmt::Write;

use crate::model::{DocumentNode, MAX_DOCUMENT_DEPTH, Marks, NodeKind};

use super::escape::escape_html;

/// Render a document tree to an HTML fragment.
///
/// Returns an empty string for a tree with no text; callers substitute
/// their own placeholder.
pub fn render_document(root: &DocumentNode) -> String {
    if root.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    walk_node(root, 1, &mut out);
    out
}

/// Render unstructured text as escaped paragraphs.
///
/// Blank lines separate paragraphs; single newlines become `<br>`.
pub fn render_plain_text(text: &str) -> String {
    let mut out = String::new();
    let normalized = text.replace("\r\n", "\n");
    for para in normalized.split("\n\n") {
        let para = para.trim();
        if para.is_empty() {
            continue;
        }
        let lines: Vec<String> = para.lines().map(|l| escape_html(l.trim())).collect();
        write!(out, "<p>{}</p>", lines.join("<br>")).unwrap();
    }
    out
}

fn walk_node(node: &DocumentNode, depth: usize, out: &mut String) {
    // Trees from `DocumentNode::from_json` never get here; hand-built ones might.
    if depth > MAX_DOCUMENT_DEPTH {
        return;
    }

    match node.kind {
        NodeKind::Text => push_text(&node.text, node.marks, out),
        NodeKind::Paragraph => wrap("p", node, depth, out),
        NodeKind::Heading(level) => {
            let tag = heading_tag(level);
            wrap(tag, node, depth, out);
        }
        NodeKind::List { ordered } => wrap(if ordered { "ol" } else { "ul" }, node, depth, out),
        NodeKind::ListItem => wrap("li", node, depth, out),
        NodeKind::Container => walk_children(node, depth, out),
    }
}

fn wrap(tag: &str, node: &DocumentNode, depth: usize, out: &mut String) {
    write!(out, "<{tag}>").unwrap();
    walk_children(node, depth, out);
    write!(out, "</{tag}>").unwrap();
}

fn walk_children(node: &DocumentNode, depth: usize, out: &mut String) {
    for child in &node.children {
        walk_node(child, depth + 1, out);
    }
}

/// Emit a text run; marks nest bold inside italic inside underline.
fn push_text(text: &str, marks: Marks, out: &mut String) {
    if text.is_empty() {
        return;
    }
    if marks.underline {
        out.push_str("<u>");
    }
    if marks.italic {
        out.push_str("<em>");
    }
    if marks.bold {
        out.push_str("<strong>");
    }
    out.push_str(&escape_html(text));
    if marks.bold {
        out.push_str("</strong>");
    }
    if marks.italic {
        out.push_str("</em>");
    }
    if marks.underline {
        out.push_str("</u>");
    }
}

fn heading_tag(level: u8) -> &'static str {
    match level {
        0 | 1 => "h1",
        2 => "h2",
        3 => "h3",
        4 => "h4",
        5 => "h5",
        _ => "h6",
    }
}
