//! Turning a tree back into markup.
//!
//! Two modes:
//!
//! - **compact**: nodes are written back to back with no added whitespace
//! - **pretty**: one node per line, indented per depth, whitespace-only text
//!   skipped, and whitespace-preserving elements written compactly so their
//!   content is never re-indented
//!
//! Text is written as stored. The tokenizer does not decode character
//! references, so writing text back verbatim round-trips the input; only
//! `"` in attribute values is escaped, because values are always written
//! double-quoted.

use crate::{DomTree, ElementData, NodeId, NodeType};

/// XML declaration written before an XML document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Serialization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// One node per line with indentation.
    pub pretty: bool,
    /// Spaces per depth level in pretty mode.
    pub indent: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::compact()
    }
}

impl DecodeOptions {
    /// No inserted whitespace.
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            pretty: false,
            indent: 2,
        }
    }

    /// Indented, two spaces per level.
    #[must_use]
    pub const fn pretty() -> Self {
        Self {
            pretty: true,
            indent: 2,
        }
    }
}

enum Frame {
    Open(NodeId, usize),
    Close(NodeId, usize),
}

impl DomTree {
    /// Serialize the whole document. XML documents start with
    /// [`XML_DECLARATION`] and a newline unless their first node already is
    /// an XML declaration.
    #[must_use]
    pub fn decode(&self, options: DecodeOptions) -> String {
        let mut out = String::new();
        if self.dialect().is_xml() && !self.starts_with_xml_declaration() {
            out.push_str(XML_DECLARATION);
            out.push('\n');
        }
        for &child in self.children(NodeId::ROOT) {
            self.write_node(child, options, &mut out);
        }
        out
    }

    /// Serialize `id` and its subtree (the Document serializes its children).
    #[must_use]
    pub fn decode_node(&self, id: NodeId, options: DecodeOptions) -> String {
        let mut out = String::new();
        if id == NodeId::ROOT {
            for &child in self.children(id) {
                self.write_node(child, options, &mut out);
            }
        } else {
            self.write_node(id, options, &mut out);
        }
        out
    }

    fn starts_with_xml_declaration(&self) -> bool {
        self.first_child(NodeId::ROOT)
            .and_then(|id| self.get(id))
            .is_some_and(|node| match &node.node_type {
                NodeType::ProcessingInstruction(data) => data
                    .strip_prefix("xml")
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace)),
                _ => false,
            })
    }

    fn write_node(&self, root: NodeId, options: DecodeOptions, out: &mut String) {
        let mut stack = vec![Frame::Open(root, 0)];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Open(id, depth) => self.open(id, depth, options, out, &mut stack),
                Frame::Close(id, depth) => {
                    if let Some(data) = self.as_element(id) {
                        if options.pretty {
                            push_indent(out, depth, options.indent);
                        }
                        push_end_tag(out, data);
                        if options.pretty {
                            out.push('\n');
                        }
                    }
                }
            }
        }
    }

    fn open(
        &self,
        id: NodeId,
        depth: usize,
        options: DecodeOptions,
        out: &mut String,
        stack: &mut Vec<Frame>,
    ) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.node_type {
            NodeType::Document => {
                stack.extend(node.children().iter().rev().map(|&c| Frame::Open(c, depth)));
            }
            NodeType::Element(data) => {
                let self_closing = data.is_void()
                    || (self.dialect().is_xml() && node.children().is_empty());
                if options.pretty {
                    push_indent(out, depth, options.indent);
                }
                push_start_tag(out, data, self_closing && self.dialect().is_xml());
                if self_closing {
                    if options.pretty {
                        out.push('\n');
                    }
                } else if options.pretty && data.preserves_whitespace() {
                    // Contents go out exactly as stored, then the end tag.
                    for &child in node.children() {
                        self.write_node(child, DecodeOptions::compact(), out);
                    }
                    push_end_tag(out, data);
                    out.push('\n');
                } else {
                    if options.pretty {
                        out.push('\n');
                    }
                    stack.push(Frame::Close(id, depth));
                    stack.extend(
                        node.children()
                            .iter()
                            .rev()
                            .map(|&c| Frame::Open(c, depth + 1)),
                    );
                }
            }
            NodeType::Text(text) => {
                if !options.pretty {
                    out.push_str(text);
                } else if !text.trim().is_empty() {
                    push_indent(out, depth, options.indent);
                    out.push_str(text.trim());
                    out.push('\n');
                }
            }
            other => {
                if options.pretty {
                    push_indent(out, depth, options.indent);
                }
                push_delimited(out, other);
                if options.pretty {
                    out.push('\n');
                }
            }
        }
    }
}

fn push_indent(out: &mut String, depth: usize, width: usize) {
    out.extend(std::iter::repeat_n(' ', depth * width));
}

fn push_start_tag(out: &mut String, data: &ElementData, xml_empty: bool) {
    out.push('<');
    out.push_str(&data.tag_name);
    for (name, value) in &data.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&value.replace('"', "&quot;"));
        out.push('"');
    }
    out.push_str(if xml_empty { "/>" } else { ">" });
}

fn push_end_tag(out: &mut String, data: &ElementData) {
    out.push_str("</");
    out.push_str(&data.tag_name);
    out.push('>');
}

fn push_delimited(out: &mut String, node_type: &NodeType) {
    let (open, close, value) = match node_type {
        NodeType::Comment(value) => ("<!--", "-->", value),
        NodeType::CData(value) => ("<![CDATA[", "]]>", value),
        NodeType::ProcessingInstruction(value) => ("<?", "?>", value),
        NodeType::Doctype(value) => ("<!DOCTYPE ", ">", value),
        NodeType::Document | NodeType::Element(_) | NodeType::Text(_) => return,
    };
    out.push_str(open);
    out.push_str(value);
    out.push_str(close);
}
