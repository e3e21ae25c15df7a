//! DOM tree implementation for the ladle parser.
//!
//! This crate provides an arena-based document tree that keeps two views of
//! the same structure consistent at all times:
//!
//! - the **hierarchical** view: parent, ordered children, previous/next sibling
//! - the **document-order** view: previous/next element, a flat chain that
//!   visits every node of a tree in pre-order depth-first order
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. The arena
//! is the sole owner of every node; parent, sibling and document-order links are
//! plain indices. Detached subtrees live in the same arena until the tree is
//! dropped.
//!
//! Links are only ever rewritten by the mutation operations in [`mutation`],
//! which preserve these invariants:
//!
//! 1. Following `next_element` from a subtree root visits the subtree in
//!    pre-order, and `previous_element` is its exact inverse.
//! 2. Sibling links are inverse of each other and match the parent's child list.
//! 3. Every attached node has exactly one parent; the Document has none.
//! 4. Void elements never have children.
//! 5. A detached subtree is self-consistent and has no outer links.
//!
//! [`DomTree::check_invariants`] verifies all five.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use strum_macros::Display;

pub mod dialect;
pub mod error;
mod invariants;
pub mod mutation;
pub mod search;
pub mod serialize;
pub mod traverse;

pub use dialect::{Dialect, DialectPolicy};
pub use error::TreeError;
pub use search::{AttrMatcher, Matcher, Strainer};
pub use serialize::{DecodeOptions, XML_DECLARATION};
pub use traverse::{Descendants, Link, LinkIterator};

/// Map of attribute names to values for an element.
///
/// Keys are stored lower-cased and keep insertion order, which is also the
/// order they are serialized in.
pub type AttributesMap = IndexMap<String, String>;

/// A type-safe index into the DOM tree.
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the tree: a payload plus the navigation links shared by every
/// kind of node.
///
/// Links are read-only from outside the crate; use the [`DomTree`] mutation
/// methods to change the structure.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is, and its payload.
    pub node_type: NodeType,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    next_sibling: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_element: Option<NodeId>,
    prev_element: Option<NodeId>,
    decomposed: bool,
}

impl Node {
    const fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
            next_element: None,
            prev_element: None,
            decomposed: false,
        }
    }

    /// The owning parent, if attached.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Owned children in order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Next node in the parent's child list.
    #[must_use]
    pub const fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    /// Previous node in the parent's child list.
    #[must_use]
    pub const fn prev_sibling(&self) -> Option<NodeId> {
        self.prev_sibling
    }

    /// Next node in document order.
    #[must_use]
    pub const fn next_element(&self) -> Option<NodeId> {
        self.next_element
    }

    /// Previous node in document order.
    #[must_use]
    pub const fn prev_element(&self) -> Option<NodeId> {
        self.prev_element
    }

    /// True once the node has been destroyed by [`DomTree::decompose`].
    #[must_use]
    pub const fn is_decomposed(&self) -> bool {
        self.decomposed
    }
}

/// The closed set of node kinds.
///
/// Comment, CData, processing instruction and doctype nodes behave like text
/// but are serialized inside fixed delimiters and never escaped.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum NodeType {
    /// The root of a tree. Exactly one per tree, never serialized itself.
    Document,
    /// A tag with attributes and children.
    Element(ElementData),
    /// Character data.
    Text(String),
    /// `<!--...-->`
    Comment(String),
    /// `<![CDATA[...]]>`
    #[strum(serialize = "cdata")]
    CData(String),
    /// `<?...?>`
    ProcessingInstruction(String),
    /// `<!DOCTYPE ...>`
    Doctype(String),
}

impl NodeType {
    /// The string payload of text-like nodes.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s)
            | Self::Comment(s)
            | Self::CData(s)
            | Self::ProcessingInstruction(s)
            | Self::Doctype(s) => Some(s),
            Self::Document | Self::Element(_) => None,
        }
    }

    /// Only the Document and elements own children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Document | Self::Element(_))
    }
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// The qualified tag name as written (lower-cased in HTML).
    pub tag_name: String,
    /// The part of the tag name before the first `:`, if any.
    pub prefix: Option<String>,
    /// Namespace URI resolved from `xmlns` declarations (XML only).
    pub namespace: Option<String>,
    /// Attributes in source order, keys lower-cased.
    pub attrs: AttributesMap,
    is_void: bool,
    preserves_whitespace: bool,
}

impl ElementData {
    /// Build element data, classifying the name with `dialect`'s tables.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidArgument`] if `tag_name` is empty.
    pub fn new(tag_name: &str, dialect: Dialect) -> Result<Self, TreeError> {
        if tag_name.is_empty() {
            return Err(TreeError::InvalidArgument(
                "element tag name must not be empty".to_string(),
            ));
        }
        let policy = dialect.policy();
        let prefix = tag_name
            .split_once(':')
            .map(|(prefix, _)| prefix.to_string())
            .filter(|prefix| !prefix.is_empty());
        Ok(Self {
            tag_name: tag_name.to_string(),
            prefix,
            namespace: None,
            attrs: AttributesMap::new(),
            is_void: policy.is_void(tag_name),
            preserves_whitespace: policy.preserves_whitespace(tag_name),
        })
    }

    /// The tag name without its prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.tag_name
            .split_once(':')
            .map_or(self.tag_name.as_str(), |(_, local)| local)
    }

    /// Void elements never have children.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        self.is_void
    }

    /// Whether the element's text is kept verbatim.
    #[must_use]
    pub const fn preserves_whitespace(&self) -> bool {
        self.preserves_whitespace
    }

    /// Case-insensitive attribute lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .get(name)
            .or_else(|| self.attrs.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    /// Returns the set of class names from the class attribute.
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.get("class")
            .map(|classes| classes.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Arena-based document tree with O(1) node access and traversal.
///
/// All nodes, attached or detached, are stored in one vector. The Document
/// node is always at index 0 ([`NodeId::ROOT`]).
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
    dialect: Dialect,
}

impl DomTree {
    /// Create a new HTML tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dialect(Dialect::Html)
    }

    /// Create a new tree whose elements are classified by `dialect`.
    #[must_use]
    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            nodes: vec![Node::new(NodeType::Document)],
            dialect,
        }
    }

    /// The dialect this tree was built for.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of allocated nodes, including detached and decomposed ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(node_type));
        id
    }

    /// Create a detached element with no attributes.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidArgument`] if `name` is empty.
    pub fn create_element(&mut self, name: &str) -> Result<NodeId, TreeError> {
        let data = ElementData::new(name, self.dialect)?;
        Ok(self.alloc(NodeType::Element(data)))
    }

    /// Create a detached element with the given attributes. Attribute names
    /// are lower-cased; a later duplicate overwrites an earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidArgument`] if `name` or an attribute name
    /// is empty.
    pub fn create_element_with_attrs<I, K, V>(
        &mut self,
        name: &str,
        attrs: I,
    ) -> Result<NodeId, TreeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut data = ElementData::new(name, self.dialect)?;
        for (key, value) in attrs {
            let key = normalize_attr_name(key.as_ref())?;
            let _ = data.attrs.insert(key, value.into());
        }
        Ok(self.alloc(NodeType::Element(data)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Text(value.into()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Comment(value.into()))
    }

    /// Create a detached CDATA section.
    pub fn create_cdata(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeType::CData(value.into()))
    }

    /// Create a detached processing instruction.
    pub fn create_processing_instruction(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeType::ProcessingInstruction(value.into()))
    }

    /// Create a detached doctype node.
    pub fn create_doctype(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Doctype(value.into()))
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Get the next node in document order.
    #[must_use]
    pub fn next_element(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_element)
    }

    /// Get the previous node in document order.
    #[must_use]
    pub fn prev_element(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_element)
    }

    /// Position of `child` in `parent`'s child list.
    #[must_use]
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&id| id == child)
    }

    /// Whether `id` was destroyed by [`DomTree::decompose`].
    #[must_use]
    pub fn is_decomposed(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_decomposed)
    }

    /// The deepest last descendant of `id`: the final node of its subtree in
    /// document order (`id` itself for a leaf).
    #[must_use]
    pub fn last_descendant(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(last) = self.last_child(current) {
            current = last;
        }
        current
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Mutable element data. The tag classification (void, whitespace) is
    /// fixed at creation.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id.0).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|data| data.tag_name.as_str())
    }

    /// Replace the payload of a text-like node.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidArgument`] if `id` is the Document or an
    /// element.
    pub fn set_text(&mut self, id: NodeId, value: impl Into<String>) -> Result<(), TreeError> {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or_else(|| TreeError::InvalidArgument(format!("unknown node {id}")))?;
        match &mut node.node_type {
            NodeType::Text(s)
            | NodeType::Comment(s)
            | NodeType::CData(s)
            | NodeType::ProcessingInstruction(s)
            | NodeType::Doctype(s) => {
                *s = value.into();
                Ok(())
            }
            NodeType::Document | NodeType::Element(_) => Err(TreeError::InvalidArgument(format!(
                "node {id} does not hold text"
            ))),
        }
    }

    /// Case-insensitive attribute read.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id).and_then(|data| data.get(name))
    }

    /// Whether the element carries `name`.
    #[must_use]
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set (or overwrite) an attribute. The name is lower-cased.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidArgument`] if `id` is not an element or the
    /// name is empty.
    pub fn set_attr(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), TreeError> {
        let key = normalize_attr_name(name)?;
        let data = self
            .as_element_mut(id)
            .ok_or_else(|| TreeError::InvalidArgument(format!("node {id} is not an element")))?;
        let _ = data.attrs.insert(key, value.into());
        Ok(())
    }

    /// Remove an attribute, returning its old value.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        let key = name.to_ascii_lowercase();
        self.as_element_mut(id)
            .and_then(|data| data.attrs.shift_remove(&key))
    }

    /// The value of a list attribute (such as `class`) split on whitespace.
    /// Attributes that are not list attributes in this dialect yield their
    /// whole value as a single item.
    #[must_use]
    pub fn attr_list(&self, id: NodeId, name: &str) -> Vec<&str> {
        let Some(data) = self.as_element(id) else {
            return Vec::new();
        };
        let Some(value) = data.get(name) else {
            return Vec::new();
        };
        if self
            .dialect
            .policy()
            .is_list_attribute(&data.tag_name, name)
        {
            value.split_ascii_whitespace().collect()
        } else {
            vec![value]
        }
    }

    /// Resolve the namespace bound to `prefix` (`None` for the default
    /// namespace) at `id`, looking at `xmlns` declarations on `id` and its
    /// ancestors.
    #[must_use]
    pub fn lookup_namespace(&self, id: NodeId, prefix: Option<&str>) -> Option<String> {
        let key = prefix.map_or_else(|| "xmlns".to_string(), |p| format!("xmlns:{p}"));
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find_map(|node| self.attr(node, &key))
            .map(str::to_string)
    }

    /// Concatenated Text and CData values below `id` (or `id`'s own value),
    /// in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        for node in std::iter::once(id).chain(self.descendants(id)) {
            if let Some(Node {
                node_type: NodeType::Text(s) | NodeType::CData(s),
                ..
            }) = self.get(node)
            {
                result.push_str(s);
            }
        }
        result
    }

    /// The single string inside `id`: a text-like node's own value, or the
    /// string of an element's only child. `None` when there are zero or
    /// several children.
    #[must_use]
    pub fn string(&self, id: NodeId) -> Option<&str> {
        let mut current = id;
        loop {
            let node = self.get(current)?;
            if let Some(text) = node.node_type.text() {
                return Some(text);
            }
            match node.children.as_slice() {
                [only] => current = *only,
                _ => return None,
            }
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_attr_name(name: &str) -> Result<String, TreeError> {
    if name.is_empty() {
        return Err(TreeError::InvalidArgument(
            "attribute name must not be empty".to_string(),
        ));
    }
    Ok(name.to_ascii_lowercase())
}
