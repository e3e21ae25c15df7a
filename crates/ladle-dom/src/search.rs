//! Searching the tree with strainers and simple selectors.
//!
//! A [`Strainer`] bundles a tag-name test, attribute tests and an optional
//! text test. The `find*` methods apply one to a traversal: descendants,
//! ancestors, siblings or the document-order chain.
//!
//! [`DomTree::select`] evaluates a small CSS-like language: whitespace
//! separated descendant steps, each an optional tag name (or `*`) followed by
//! any number of `.class` and `#id` filters.

use std::collections::HashSet;

use regex::Regex;

use crate::{DomTree, ElementData, NodeId, NodeType, TreeError};

/// A string test.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Matches anything.
    Any,
    /// Equal to the given string.
    Exact(String),
    /// Equal to one of the given strings.
    OneOf(Vec<String>),
    /// The regular expression finds a match in the string.
    Pattern(Regex),
    /// The function returns true for the string.
    Predicate(fn(&str) -> bool),
}

impl Matcher {
    /// Test `value`, comparing exact strings ASCII case-insensitively when
    /// `ignore_case` is set. Patterns and predicates see the value as is.
    #[must_use]
    pub fn matches(&self, value: &str, ignore_case: bool) -> bool {
        let equal = |wanted: &str| {
            if ignore_case {
                wanted.eq_ignore_ascii_case(value)
            } else {
                wanted == value
            }
        };
        match self {
            Self::Any => true,
            Self::Exact(wanted) => equal(wanted.as_str()),
            Self::OneOf(options) => options.iter().any(|option| equal(option.as_str())),
            Self::Pattern(regex) => regex.is_match(value),
            Self::Predicate(test) => test(value),
        }
    }
}

impl From<&str> for Matcher {
    fn from(value: &str) -> Self {
        Self::Exact(value.to_string())
    }
}

impl From<String> for Matcher {
    fn from(value: String) -> Self {
        Self::Exact(value)
    }
}

impl From<Regex> for Matcher {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

impl From<fn(&str) -> bool> for Matcher {
    fn from(test: fn(&str) -> bool) -> Self {
        Self::Predicate(test)
    }
}

impl From<&[&str]> for Matcher {
    fn from(options: &[&str]) -> Self {
        Self::OneOf(options.iter().map(|s| (*s).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Matcher {
    fn from(options: [&str; N]) -> Self {
        Self::OneOf(options.iter().map(|s| (*s).to_string()).collect())
    }
}

/// An attribute test.
#[derive(Debug, Clone)]
pub enum AttrMatcher {
    /// The attribute exists, whatever its value.
    Present,
    /// The attribute does not exist.
    Absent,
    /// The attribute exists and its value matches. For list attributes such
    /// as `class` the value matches if any whitespace-separated token does,
    /// or the whole value does.
    Value(Matcher),
}

/// Predicate bundle used to filter nodes during a search.
///
/// Only elements and text nodes can match. A strainer with a text test and
/// no name or attribute tests matches Text and CData nodes by value; with a
/// name or attribute test it matches elements whose single string passes.
#[derive(Debug, Clone)]
pub struct Strainer {
    name: Matcher,
    attrs: Vec<(String, AttrMatcher)>,
    text: Option<Matcher>,
}

impl Default for Strainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Strainer {
    /// A strainer that matches every element.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: Matcher::Any,
            attrs: Vec::new(),
            text: None,
        }
    }

    /// A strainer for one tag name (or any of several, or a pattern).
    #[must_use]
    pub fn tag(name: impl Into<Matcher>) -> Self {
        Self::new().name(name)
    }

    /// Set the tag-name test. Exact names compare case-insensitively.
    #[must_use]
    pub fn name(mut self, name: impl Into<Matcher>) -> Self {
        self.name = name.into();
        self
    }

    /// Require `attr` to match `value`.
    #[must_use]
    pub fn attr(mut self, attr: &str, value: impl Into<Matcher>) -> Self {
        self.attrs
            .push((attr.to_ascii_lowercase(), AttrMatcher::Value(value.into())));
        self
    }

    /// Require `attr` to be present.
    #[must_use]
    pub fn has_attr(mut self, attr: &str) -> Self {
        self.attrs.push((attr.to_ascii_lowercase(), AttrMatcher::Present));
        self
    }

    /// Require `attr` to be absent.
    #[must_use]
    pub fn without_attr(mut self, attr: &str) -> Self {
        self.attrs.push((attr.to_ascii_lowercase(), AttrMatcher::Absent));
        self
    }

    /// Shorthand for `.attr("class", class)`.
    #[must_use]
    pub fn class(self, class: impl Into<Matcher>) -> Self {
        self.attr("class", class)
    }

    /// Set the text test.
    #[must_use]
    pub fn text(mut self, text: impl Into<Matcher>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn targets_strings(&self) -> bool {
        self.text.is_some() && matches!(self.name, Matcher::Any) && self.attrs.is_empty()
    }

    /// Test one node.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(node) = tree.get(id) else {
            return false;
        };
        match &node.node_type {
            NodeType::Element(data) => {
                if self.targets_strings() || !self.name.matches(&data.tag_name, true) {
                    return false;
                }
                let policy = tree.dialect().policy();
                let attrs_match = self.attrs.iter().all(|(name, test)| {
                    let is_list = policy.is_list_attribute(&data.tag_name, name);
                    attr_matches(data, name, test, is_list)
                });
                attrs_match
                    && self.text.as_ref().is_none_or(|text| {
                        tree.string(id).is_some_and(|value| text.matches(value, false))
                    })
            }
            NodeType::Text(value) | NodeType::CData(value) => {
                self.targets_strings()
                    && self
                        .text
                        .as_ref()
                        .is_some_and(|text| text.matches(value, false))
            }
            _ => false,
        }
    }
}

fn attr_matches(data: &ElementData, name: &str, test: &AttrMatcher, is_list: bool) -> bool {
    let value = data.get(name);
    match test {
        AttrMatcher::Present => value.is_some(),
        AttrMatcher::Absent => value.is_none(),
        AttrMatcher::Value(matcher) => value.is_some_and(|value| {
            matcher.matches(value, false)
                || (is_list
                    && value
                        .split_ascii_whitespace()
                        .any(|token| matcher.matches(token, false)))
        }),
    }
}

fn collect(
    tree: &DomTree,
    nodes: impl Iterator<Item = NodeId>,
    strainer: &Strainer,
    limit: Option<usize>,
) -> Vec<NodeId> {
    nodes
        .filter(|&id| strainer.matches(tree, id))
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

impl DomTree {
    /// First descendant of `from` (pre-order) that matches.
    #[must_use]
    pub fn find(&self, from: NodeId, strainer: &Strainer) -> Option<NodeId> {
        self.descendants(from).find(|&id| strainer.matches(self, id))
    }

    /// Matching descendants of `from` in document order, at most `limit`.
    #[must_use]
    pub fn find_all(&self, from: NodeId, strainer: &Strainer, limit: Option<usize>) -> Vec<NodeId> {
        collect(self, self.descendants(from), strainer, limit)
    }

    /// Matching children of `from` only.
    #[must_use]
    pub fn find_children(&self, from: NodeId, strainer: &Strainer) -> Vec<NodeId> {
        collect(self, self.children(from).iter().copied(), strainer, None)
    }

    /// Nearest matching ancestor.
    #[must_use]
    pub fn find_parent(&self, from: NodeId, strainer: &Strainer) -> Option<NodeId> {
        self.ancestors(from).find(|&id| strainer.matches(self, id))
    }

    /// All matching ancestors, nearest first.
    #[must_use]
    pub fn find_parents(&self, from: NodeId, strainer: &Strainer) -> Vec<NodeId> {
        collect(self, self.ancestors(from), strainer, None)
    }

    /// Nearest matching following sibling.
    #[must_use]
    pub fn find_next_sibling(&self, from: NodeId, strainer: &Strainer) -> Option<NodeId> {
        self.next_siblings(from).find(|&id| strainer.matches(self, id))
    }

    /// All matching following siblings.
    #[must_use]
    pub fn find_next_siblings(&self, from: NodeId, strainer: &Strainer) -> Vec<NodeId> {
        collect(self, self.next_siblings(from), strainer, None)
    }

    /// Nearest matching preceding sibling.
    #[must_use]
    pub fn find_previous_sibling(&self, from: NodeId, strainer: &Strainer) -> Option<NodeId> {
        self.preceding_siblings(from)
            .find(|&id| strainer.matches(self, id))
    }

    /// All matching preceding siblings, nearest first.
    #[must_use]
    pub fn find_previous_siblings(&self, from: NodeId, strainer: &Strainer) -> Vec<NodeId> {
        collect(self, self.preceding_siblings(from), strainer, None)
    }

    /// First match after `from` in document order.
    #[must_use]
    pub fn find_next(&self, from: NodeId, strainer: &Strainer) -> Option<NodeId> {
        self.next_elements(from).find(|&id| strainer.matches(self, id))
    }

    /// All matches after `from` in document order.
    #[must_use]
    pub fn find_all_next(
        &self,
        from: NodeId,
        strainer: &Strainer,
        limit: Option<usize>,
    ) -> Vec<NodeId> {
        collect(self, self.next_elements(from), strainer, limit)
    }

    /// Nearest match before `from` in document order.
    #[must_use]
    pub fn find_previous(&self, from: NodeId, strainer: &Strainer) -> Option<NodeId> {
        self.previous_elements(from)
            .find(|&id| strainer.matches(self, id))
    }

    /// All matches before `from` in document order, nearest first.
    #[must_use]
    pub fn find_all_previous(
        &self,
        from: NodeId,
        strainer: &Strainer,
        limit: Option<usize>,
    ) -> Vec<NodeId> {
        collect(self, self.previous_elements(from), strainer, limit)
    }

    /// Evaluate a descendant selector such as `div.note p#intro` below `from`.
    ///
    /// Each step filters the descendants of every node the previous step
    /// produced. Results are in document order without duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidArgument`] for an empty selector or a step
    /// with an empty `.` or `#` filter.
    pub fn select(&self, from: NodeId, selector: &str) -> Result<Vec<NodeId>, TreeError> {
        let steps = selector
            .split_whitespace()
            .map(parse_step)
            .collect::<Result<Vec<_>, _>>()?;
        if steps.is_empty() {
            return Err(TreeError::InvalidArgument("empty selector".to_string()));
        }

        let mut current = vec![from];
        for step in &steps {
            let mut seen = HashSet::new();
            let mut next = Vec::new();
            for &scope in &current {
                for id in self.descendants(scope) {
                    if step.matches(self, id) && seen.insert(id) {
                        next.push(id);
                    }
                }
            }
            current = next;
        }
        Ok(current)
    }

    /// First result of [`DomTree::select`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`DomTree::select`].
    pub fn select_one(&self, from: NodeId, selector: &str) -> Result<Option<NodeId>, TreeError> {
        Ok(self.select(from, selector)?.into_iter().next())
    }
}

/// One compound step of a selector.
#[derive(Debug, Default, PartialEq, Eq)]
struct Step {
    tag: Option<String>,
    classes: Vec<String>,
    id: Option<String>,
}

impl Step {
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(data) = tree.as_element(node) else {
            return false;
        };
        self.tag
            .as_ref()
            .is_none_or(|tag| tag.eq_ignore_ascii_case(&data.tag_name))
            && self.id.as_ref().is_none_or(|id| data.id() == Some(id.as_str()))
            && {
                let classes = data.classes();
                self.classes.iter().all(|class| classes.contains(class.as_str()))
            }
    }
}

fn parse_step(text: &str) -> Result<Step, TreeError> {
    let mut step = Step::default();
    let split = text.find(['.', '#']).unwrap_or(text.len());
    let (tag, mut rest) = text.split_at(split);
    if !tag.is_empty() && tag != "*" {
        step.tag = Some(tag.to_string());
    }
    while let Some(marker) = rest.chars().next() {
        let body = &rest[1..];
        let end = body.find(['.', '#']).unwrap_or(body.len());
        let value = &body[..end];
        if value.is_empty() {
            return Err(TreeError::InvalidArgument(format!(
                "empty `{marker}` filter in selector step `{text}`"
            )));
        }
        if marker == '.' {
            step.classes.push(value.to_string());
        } else {
            step.id = Some(value.to_string());
        }
        rest = &body[end..];
    }
    Ok(step)
}
