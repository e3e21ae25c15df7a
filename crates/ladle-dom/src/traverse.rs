//! Read-only traversal over a [`DomTree`].
//!
//! Every walk follows one of the node links directly; descendants are read
//! off the document-order chain rather than by recursion.

use crate::{DomTree, NodeId};

/// Which link a [`LinkIterator`] follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Towards the root.
    Parent,
    /// Forward through the parent's children.
    NextSibling,
    /// Backward through the parent's children.
    PrevSibling,
    /// Forward in document order.
    NextElement,
    /// Backward in document order.
    PrevElement,
}

/// Iterator that repeatedly follows one link, starting after the origin node.
pub struct LinkIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
    link: Link,
}

impl<'a> LinkIterator<'a> {
    fn new(tree: &'a DomTree, origin: NodeId, link: Link) -> Self {
        let mut iter = Self {
            tree,
            current: Some(origin),
            link,
        };
        iter.current = iter.step(origin);
        iter
    }

    fn step(&self, id: NodeId) -> Option<NodeId> {
        let node = self.tree.get(id)?;
        match self.link {
            Link::Parent => node.parent(),
            Link::NextSibling => node.next_sibling(),
            Link::PrevSibling => node.prev_sibling(),
            Link::NextElement => node.next_element(),
            Link::PrevElement => node.prev_element(),
        }
    }
}

impl Iterator for LinkIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.step(id);
        Some(id)
    }
}

/// Pre-order iterator over the strict descendants of a node.
///
/// Walks the `next_element` chain from the node to its deepest last
/// descendant, so it never recurses.
pub struct Descendants<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
    last: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = if id == self.last {
            None
        } else {
            self.tree.next_element(id)
        };
        Some(id)
    }
}

impl DomTree {
    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> LinkIterator<'_> {
        LinkIterator::new(self, id, Link::Parent)
    }

    /// Iterate over following siblings (from immediately after to last child).
    #[must_use]
    pub fn next_siblings(&self, id: NodeId) -> LinkIterator<'_> {
        LinkIterator::new(self, id, Link::NextSibling)
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> LinkIterator<'_> {
        LinkIterator::new(self, id, Link::PrevSibling)
    }

    /// Iterate over every node after `id` in document order, including nodes
    /// outside `id`'s subtree.
    #[must_use]
    pub fn next_elements(&self, id: NodeId) -> LinkIterator<'_> {
        LinkIterator::new(self, id, Link::NextElement)
    }

    /// Iterate over every node before `id` in document order, nearest first.
    #[must_use]
    pub fn previous_elements(&self, id: NodeId) -> LinkIterator<'_> {
        LinkIterator::new(self, id, Link::PrevElement)
    }

    /// Depth-first pre-order iteration over the descendants of `id`.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let last = self.last_descendant(id);
        Descendants {
            tree: self,
            current: if last == id { None } else { self.next_element(id) },
            last,
        }
    }
}
