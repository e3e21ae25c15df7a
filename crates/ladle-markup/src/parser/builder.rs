use ladle_common::warning::warn_once;
use ladle_dom::{Dialect, DomTree, NodeId, NodeType};

use crate::tokenizer::{Token, Tokenizer};

/// A recovery decision taken while building the tree.
///
/// Parsing never fails; these describe how malformed input was repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What was repaired.
    pub message: String,
    /// Index into the token stream where this was encountered.
    pub token_index: usize,
    /// Malformed input (`true`) as opposed to a legal but implicit
    /// construct, such as an omitted end tag (`false`).
    pub is_error: bool,
}

/// Settings for a parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Rule set for tokenizing and tree building.
    pub dialect: Dialect,
    /// Report every recovery as an error.
    pub strict_mode: bool,
}

impl ParserOptions {
    /// Default options for `dialect`.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            strict_mode: false,
        }
    }

    /// Enable strict mode: every recorded issue has `is_error` set.
    #[must_use]
    pub const fn with_strict_mode(mut self) -> Self {
        self.strict_mode = true;
        self
    }
}

/// Builds a [`DomTree`] from a token stream.
///
/// Open elements live on an explicit stack whose bottom is the Document.
/// Text is buffered so adjacent text tokens become one node. Every new node
/// is appended as the last child of the stack top, so it always lands at the
/// end of document order, right after the previously created node. That
/// makes each insertion constant time regardless of nesting depth.
pub struct TreeBuilder {
    /// The tree under construction. `NodeId::ROOT` is the Document node.
    tree: DomTree,

    /// Bottom is the Document, top is the current insertion parent.
    stack_of_open_elements: Vec<NodeId>,

    /// Text not yet materialized as a node.
    pending_text: String,

    /// The node most recently added to the tree.
    most_recent_node: NodeId,

    /// Number of open whitespace-preserving elements.
    preserve_whitespace_depth: usize,

    /// XML namespace declarations in scope: `(declaring element, prefix,
    /// namespace)`, innermost last.
    namespace_scopes: Vec<(NodeId, Option<String>, String)>,

    /// Current position in the token stream.
    token_index: usize,

    /// Parse issues (errors and warnings) encountered during parsing.
    issues: Vec<ParseIssue>,

    strict_mode: bool,
}

impl TreeBuilder {
    /// Create a builder with an empty tree for `options.dialect`.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            tree: DomTree::with_dialect(options.dialect),
            stack_of_open_elements: vec![NodeId::ROOT],
            pending_text: String::new(),
            most_recent_node: NodeId::ROOT,
            preserve_whitespace_depth: 0,
            namespace_scopes: Vec::new(),
            token_index: 0,
            issues: Vec::new(),
            strict_mode: options.strict_mode,
        }
    }

    /// Get all parse issues encountered so far.
    #[must_use]
    pub fn get_issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Consume every token from `tokenizer` and return the tree.
    #[must_use]
    pub fn run(self, tokenizer: Tokenizer<'_>) -> DomTree {
        self.run_with_issues(tokenizer).0
    }

    /// Consume every token from `tokenizer` and return the tree together
    /// with the issues recorded by both the tokenizer and the builder.
    #[must_use]
    pub fn run_with_issues(mut self, mut tokenizer: Tokenizer<'_>) -> (DomTree, Vec<ParseIssue>) {
        while let Some(token) = tokenizer.next() {
            for issue in tokenizer.take_issues() {
                self.record(issue.message, true);
            }
            self.process_token(token);
        }
        self.finish()
    }

    /// Feed one token. After [`Token::EndOfFile`] the stack is unwound to
    /// the Document.
    pub fn process_token(&mut self, token: Token) {
        match token {
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                self.flush_pending_text();
                self.close_implicitly(&name);
                let attrs = attributes.into_iter().map(|attr| (attr.name, attr.value));
                match self.tree.create_element_with_attrs(&name, attrs) {
                    Ok(element) => {
                        if self.insert_node(element) {
                            self.resolve_namespace(element);
                            self.push(element);
                            if self_closing || self.tree.dialect().policy().is_void(&name) {
                                self.pop();
                            }
                        }
                    }
                    Err(error) => self.record(error.to_string(), true),
                }
            }
            Token::EndTag { name } => {
                self.flush_pending_text();
                self.close_element(&name);
            }
            Token::Text { data } => self.pending_text.push_str(&data),
            Token::Comment { data } => {
                self.flush_pending_text();
                let node = self.tree.create_comment(data);
                let _ = self.insert_node(node);
            }
            Token::Doctype { data } => {
                self.flush_pending_text();
                let node = self.tree.create_doctype(data);
                let _ = self.insert_node(node);
            }
            Token::CData { data } => {
                self.flush_pending_text();
                let node = self.tree.create_cdata(data);
                let _ = self.insert_node(node);
            }
            Token::ProcessingInstruction { data } => {
                self.flush_pending_text();
                let node = self.tree.create_processing_instruction(data);
                let _ = self.insert_node(node);
            }
            Token::EndOfFile => {
                self.flush_pending_text();
                while let Some(&open) = self.stack_of_open_elements.last() {
                    if open == NodeId::ROOT {
                        break;
                    }
                    let message = format!("`<{}>` left open at end of input", self.name_of(open));
                    self.record(message, false);
                    self.pop();
                }
            }
        }
        self.token_index += 1;
    }

    /// Finish building: anything still open is closed as if the input
    /// ended here.
    #[must_use]
    pub fn finish(mut self) -> (DomTree, Vec<ParseIssue>) {
        if self.stack_of_open_elements.len() > 1 || !self.pending_text.is_empty() {
            self.process_token(Token::EndOfFile);
        }
        (self.tree, self.issues)
    }

    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    fn name_of(&self, id: NodeId) -> &str {
        self.tree.tag_name(id).unwrap_or_default()
    }

    /// Pop open elements that `opening` may not nest inside.
    fn close_implicitly(&mut self, opening: &str) {
        let policy = self.tree.dialect().policy();
        loop {
            let top = self.current_node();
            if top == NodeId::ROOT || !policy.closes_implicitly(opening, self.name_of(top)) {
                break;
            }
            let message = format!("`<{}>` implicitly closed by `<{opening}>`", self.name_of(top));
            self.record(message, false);
            self.pop();
        }
    }

    /// Close the innermost open element named `name`, and everything opened
    /// inside it. An end tag matching nothing is ignored.
    fn close_element(&mut self, name: &str) {
        let matched = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| id != NodeId::ROOT && self.name_of(id).eq_ignore_ascii_case(name));
        let Some(index) = matched else {
            self.record(format!("unmatched end tag `</{name}>` ignored"), true);
            return;
        };
        while self.stack_of_open_elements.len() > index + 1 {
            let top = self.current_node();
            let message = format!("`<{}>` closed by `</{name}>`", self.name_of(top));
            self.record(message, false);
            self.pop();
        }
        self.pop();
    }

    /// Append `node` to the current node, right after the most recent node
    /// in document order. Returns false if the tree refused it.
    fn insert_node(&mut self, node: NodeId) -> bool {
        let parent = self.current_node();
        if let Err(error) = self.tree.append_at_end(parent, node, self.most_recent_node) {
            self.record(error.to_string(), true);
            return false;
        }
        self.most_recent_node = node;
        true
    }

    fn push(&mut self, element: NodeId) {
        if self
            .tree
            .as_element(element)
            .is_some_and(|data| data.preserves_whitespace())
        {
            self.preserve_whitespace_depth += 1;
        }
        self.stack_of_open_elements.push(element);
    }

    fn pop(&mut self) {
        if self.stack_of_open_elements.len() <= 1 {
            return;
        }
        let Some(element) = self.stack_of_open_elements.pop() else {
            return;
        };
        while self
            .namespace_scopes
            .last()
            .is_some_and(|(owner, _, _)| *owner == element)
        {
            let _ = self.namespace_scopes.pop();
        }
        if self
            .tree
            .as_element(element)
            .is_some_and(|data| data.preserves_whitespace())
        {
            self.preserve_whitespace_depth = self.preserve_whitespace_depth.saturating_sub(1);
        }
    }

    /// Materialize buffered text as one Text node. Outside
    /// whitespace-preserving elements, whitespace-only text collapses to a
    /// single newline (if it contained one) or a single space.
    fn flush_pending_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let mut text = std::mem::take(&mut self.pending_text);
        if self.preserve_whitespace_depth == 0 && text.chars().all(Tokenizer::is_whitespace_char) {
            text = if text.contains('\n') { "\n" } else { " " }.to_string();
        }
        let node = self.tree.create_text(text);
        let _ = self.insert_node(node);
    }

    /// Open the element's own `xmlns` declarations as a scope and bind it to
    /// the namespace its prefix resolves to. Scopes close when the element is
    /// popped, so lookups never walk the ancestor chain.
    fn resolve_namespace(&mut self, element: NodeId) {
        if !self.tree.dialect().is_xml() {
            return;
        }
        let Some(data) = self.tree.as_element_mut(element) else {
            return;
        };
        for (name, value) in &data.attrs {
            let prefix = match name.strip_prefix("xmlns") {
                Some("") => None,
                Some(rest) => match rest.strip_prefix(':') {
                    Some(prefix) => Some(prefix.to_string()),
                    None => continue,
                },
                None => continue,
            };
            self.namespace_scopes.push((element, prefix, value.clone()));
        }
        data.namespace = self
            .namespace_scopes
            .iter()
            .rev()
            .find(|(_, prefix, _)| prefix.as_deref() == data.prefix.as_deref())
            .map(|(_, _, namespace)| namespace.clone());
    }

    /// Record a parse issue and report errors through the warning sink.
    fn record(&mut self, message: String, is_error: bool) {
        let is_error = is_error || self.strict_mode;
        if is_error {
            warn_once("Tree Builder", &message);
        }
        self.issues.push(ParseIssue {
            message,
            token_index: self.token_index,
            is_error,
        });
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

/// Render a subtree as an indented outline, one node per line.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    let mut stack = vec![(id, 0usize)];
    while let Some((current, depth)) = stack.pop() {
        let Some(node) = tree.get(current) else {
            continue;
        };
        out.push_str(&"  ".repeat(depth));
        match &node.node_type {
            NodeType::Document => out.push_str("Document"),
            NodeType::Element(data) => {
                out.push('<');
                out.push_str(&data.tag_name);
                for (name, value) in &data.attrs {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str(&format!("=\"{value}\""));
                    }
                }
                out.push('>');
            }
            NodeType::Text(data) => {
                let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
                out.push_str(&format!("\"{display}\""));
            }
            other => out.push_str(&format!("{other}: {}", other.text().unwrap_or_default())),
        }
        out.push('\n');
        stack.extend(node.children().iter().rev().map(|&child| (child, depth + 1)));
    }
    out
}

/// Print a DOM tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", format_tree(tree, id));
}
