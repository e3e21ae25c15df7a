//! Structural edits that keep the hierarchical and document-order views of
//! the tree consistent.
//!
//! Everything here reduces to two primitives:
//!
//! - [`DomTree::insert`] splices a whole subtree into a parent's child list
//!   and into the document-order chain at the matching point.
//! - [`DomTree::extract`] unsplices a subtree, leaving it as a detached but
//!   internally consistent tree.
//!
//! A subtree occupies one contiguous run of the document-order chain, entered
//! at its root and exited at its deepest last descendant. Moving it only ever
//! rewrites the four links at the two ends of that run.

use crate::{DomTree, NodeId, NodeType, TreeError};

impl DomTree {
    /// Insert `node` as child number `position` of `parent`.
    ///
    /// `position` is clamped to the child count. A node that is already
    /// attached somewhere is extracted first, so a node is never in two
    /// places; moving a node within the same parent accounts for the slot it
    /// vacates.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidStructure`] if `node` is `parent` or one of
    /// its ancestors, if `node` is the Document, if `parent` cannot own
    /// children (text-like nodes, void elements), or if either node was
    /// decomposed.
    pub fn insert(
        &mut self,
        parent: NodeId,
        position: usize,
        node: NodeId,
    ) -> Result<(), TreeError> {
        self.check_insertable(parent, node)?;

        let mut position = position;
        if let Some(old_parent) = self.parent(node) {
            if old_parent == parent
                && self.index_of(parent, node).is_some_and(|index| index < position)
            {
                position -= 1;
            }
            self.extract(node);
        }
        let position = position.min(self.children(parent).len());

        let prev_sibling = position
            .checked_sub(1)
            .and_then(|index| self.children(parent).get(index).copied());
        let next_sibling = self.children(parent).get(position).copied();

        // Document-order neighbours of the spliced run.
        let predecessor = prev_sibling.map_or(parent, |sibling| self.last_descendant(sibling));
        let successor = next_sibling.or_else(|| self.next_sibling_of_ancestor(parent));
        let exit = self.last_descendant(node);

        // Hierarchical links.
        self.nodes[parent.0].children.insert(position, node);
        let entry = &mut self.nodes[node.0];
        entry.parent = Some(parent);
        entry.prev_sibling = prev_sibling;
        entry.next_sibling = next_sibling;
        if let Some(prev) = prev_sibling {
            self.nodes[prev.0].next_sibling = Some(node);
        }
        if let Some(next) = next_sibling {
            self.nodes[next.0].prev_sibling = Some(node);
        }

        // Document-order links.
        self.nodes[predecessor.0].next_element = Some(node);
        self.nodes[node.0].prev_element = Some(predecessor);
        self.nodes[exit.0].next_element = successor;
        if let Some(next) = successor {
            self.nodes[next.0].prev_element = Some(exit);
        }
        Ok(())
    }

    /// Detach `node` (with its subtree) from its parent.
    ///
    /// The surrounding sibling and document-order chains are closed over the
    /// gap. Links inside the subtree are untouched, so the detached node is a
    /// well-formed standalone tree. Already-detached nodes are left as they
    /// are; check [`DomTree::parent`] first if that matters.
    pub fn extract(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        let exit = self.last_descendant(node);
        let predecessor = self.nodes[node.0].prev_element;
        let successor = self.nodes[exit.0].next_element;

        if let Some(prev) = predecessor {
            self.nodes[prev.0].next_element = successor;
        }
        if let Some(next) = successor {
            self.nodes[next.0].prev_element = predecessor;
        }

        let prev_sibling = self.nodes[node.0].prev_sibling;
        let next_sibling = self.nodes[node.0].next_sibling;
        if let Some(prev) = prev_sibling {
            self.nodes[prev.0].next_sibling = next_sibling;
        }
        if let Some(next) = next_sibling {
            self.nodes[next.0].prev_sibling = prev_sibling;
        }
        self.nodes[parent.0].children.retain(|&child| child != node);

        let entry = &mut self.nodes[node.0];
        entry.parent = None;
        entry.prev_sibling = None;
        entry.next_sibling = None;
        entry.prev_element = None;
        self.nodes[exit.0].next_element = None;
    }

    /// Put `new_node` where `node` is, detaching `node`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NoParent`] if `node` is detached, and
    /// [`TreeError::InvalidStructure`] if `new_node` contains `node`'s parent
    /// or cannot be inserted. The tree is unchanged on error.
    pub fn replace(&mut self, node: NodeId, new_node: NodeId) -> Result<(), TreeError> {
        let parent = self.parent(node).ok_or(TreeError::NoParent(node))?;
        if new_node == node {
            return Ok(());
        }
        self.check_insertable(parent, new_node)?;
        let index = self.index_of(parent, node).unwrap_or_default();
        self.extract(node);
        self.insert(parent, index, new_node)
    }

    /// Destroy `node` and its whole subtree.
    ///
    /// The node is extracted, then every node of the subtree loses its links,
    /// children, attributes and text. Decomposed ids stay allocated but inert;
    /// reading them yields empty collections and inserting them fails.
    ///
    /// Decomposing the Document clears it instead: its children are destroyed
    /// and the root stays usable.
    pub fn decompose(&mut self, node: NodeId) {
        if self.get(node).is_none_or(|n| n.decomposed) {
            return;
        }
        if node == NodeId::ROOT {
            for child in self.children(node).to_vec() {
                self.decompose(child);
            }
            return;
        }

        self.extract(node);
        let mut pending = vec![node];
        while let Some(id) = pending.pop() {
            let entry = &mut self.nodes[id.0];
            pending.extend(std::mem::take(&mut entry.children));
            entry.parent = None;
            entry.prev_sibling = None;
            entry.next_sibling = None;
            entry.prev_element = None;
            entry.next_element = None;
            entry.decomposed = true;
            match &mut entry.node_type {
                NodeType::Element(data) => data.attrs.clear(),
                NodeType::Text(s)
                | NodeType::Comment(s)
                | NodeType::CData(s)
                | NodeType::ProcessingInstruction(s)
                | NodeType::Doctype(s) => s.clear(),
                NodeType::Document => {}
            }
        }
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DomTree::insert`].
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let end = self.children(parent).len();
        self.insert(parent, end, child)
    }

    /// Insert `node` immediately before `reference` under the same parent.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NoParent`] if `reference` is detached and
    /// [`TreeError::InvalidStructure`] if `node` is `reference` or insertion
    /// fails.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) -> Result<(), TreeError> {
        let (parent, index) = self.sibling_slot(reference, node)?;
        self.insert(parent, index, node)
    }

    /// Insert `node` immediately after `reference` under the same parent.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DomTree::insert_before`].
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<(), TreeError> {
        let (parent, index) = self.sibling_slot(reference, node)?;
        self.insert(parent, index + 1, node)
    }

    /// Move every child of `from` to the end of `to`, keeping their order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DomTree::insert`] for each child. Every child is
    /// checked before any is moved, so the tree is unchanged on error.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) -> Result<(), TreeError> {
        let children = self.children(from).to_vec();
        for &child in &children {
            self.check_insertable(to, child)?;
        }
        for child in children {
            self.append_child(to, child)?;
        }
        Ok(())
    }

    /// Append a detached leaf `node` as the last child of `parent`, where
    /// `last` is the final node of the document-order chain.
    ///
    /// This is the constant-time path for builders that only ever add nodes
    /// at the end of the document: `parent` must have no following node in
    /// document order and `last` must be its last descendant (or `parent`
    /// itself). Those two conditions are the caller's to uphold; everything
    /// else is checked.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidStructure`] if `node` is attached, has
    /// children, is the Document or `parent`, if `parent` cannot own
    /// children, if either node was decomposed, or if `last` is followed by
    /// another node.
    pub fn append_at_end(
        &mut self,
        parent: NodeId,
        node: NodeId,
        last: NodeId,
    ) -> Result<(), TreeError> {
        let (Some(parent_node), Some(child_node), Some(last_node)) =
            (self.get(parent), self.get(node), self.get(last))
        else {
            return Err(TreeError::InvalidStructure(format!(
                "cannot append {node} to {parent}: unknown node"
            )));
        };
        if parent_node.decomposed || child_node.decomposed {
            return Err(TreeError::InvalidStructure(
                "decomposed nodes cannot be reused".to_string(),
            ));
        }
        if node == NodeId::ROOT || node == parent {
            return Err(TreeError::InvalidStructure(format!(
                "cannot append {node} to {parent}"
            )));
        }
        if child_node.parent.is_some() || !child_node.children.is_empty() {
            return Err(TreeError::InvalidStructure(format!(
                "node {node} must be a detached leaf"
            )));
        }
        if last_node.next_element.is_some() || parent_node.next_sibling.is_some() {
            return Err(TreeError::InvalidStructure(format!(
                "node {last} does not end the document"
            )));
        }
        if !self.can_have_children(parent) {
            return Err(TreeError::InvalidStructure(format!(
                "node {parent} cannot have children"
            )));
        }

        let prev_sibling = self.last_child(parent);
        self.nodes[parent.0].children.push(node);
        if let Some(prev) = prev_sibling {
            self.nodes[prev.0].next_sibling = Some(node);
        }
        self.nodes[last.0].next_element = Some(node);
        let entry = &mut self.nodes[node.0];
        entry.parent = Some(parent);
        entry.prev_sibling = prev_sibling;
        entry.next_sibling = None;
        entry.prev_element = Some(last);
        entry.next_element = None;
        Ok(())
    }

    /// Replace `node` by its own children, then detach the now empty node.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NoParent`] if `node` is detached.
    pub fn unwrap(&mut self, node: NodeId) -> Result<(), TreeError> {
        if self.parent(node).is_none() {
            return Err(TreeError::NoParent(node));
        }
        for child in self.children(node).to_vec() {
            self.insert_before(node, child)?;
        }
        self.extract(node);
        Ok(())
    }

    /// Put `wrapper` in `node`'s place and move `node` inside it as its last
    /// child.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NoParent`] if `node` is detached and
    /// [`TreeError::InvalidStructure`] if `wrapper` cannot own children.
    pub fn wrap(&mut self, node: NodeId, wrapper: NodeId) -> Result<(), TreeError> {
        if !self.can_have_children(wrapper) {
            return Err(TreeError::InvalidStructure(format!(
                "node {wrapper} cannot wrap other nodes"
            )));
        }
        self.replace(node, wrapper)?;
        self.append_child(wrapper, node)
    }

    /// Detach every child of `node`.
    pub fn clear(&mut self, node: NodeId) {
        for child in self.children(node).to_vec() {
            self.extract(child);
        }
    }

    fn can_have_children(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|node| match &node.node_type {
            NodeType::Document => true,
            NodeType::Element(data) => !data.is_void(),
            _ => false,
        })
    }

    fn check_insertable(&self, parent: NodeId, node: NodeId) -> Result<(), TreeError> {
        let (Some(parent_node), Some(child_node)) = (self.get(parent), self.get(node)) else {
            return Err(TreeError::InvalidStructure(format!(
                "cannot insert {node} into {parent}: unknown node"
            )));
        };
        if parent_node.decomposed || child_node.decomposed {
            return Err(TreeError::InvalidStructure(
                "decomposed nodes cannot be reused".to_string(),
            ));
        }
        if node == NodeId::ROOT {
            return Err(TreeError::InvalidStructure(
                "the document node cannot be inserted".to_string(),
            ));
        }
        if node == parent || self.is_descendant_of(parent, node) {
            return Err(TreeError::InvalidStructure(format!(
                "cannot insert {node} into itself or its own descendant {parent}"
            )));
        }
        if !self.can_have_children(parent) {
            return Err(TreeError::InvalidStructure(format!(
                "node {parent} cannot have children"
            )));
        }
        Ok(())
    }

    fn sibling_slot(&self, reference: NodeId, node: NodeId) -> Result<(NodeId, usize), TreeError> {
        let parent = self
            .parent(reference)
            .ok_or(TreeError::NoParent(reference))?;
        if node == reference {
            return Err(TreeError::InvalidStructure(format!(
                "cannot insert {node} next to itself"
            )));
        }
        let index = self.index_of(parent, reference).unwrap_or_default();
        Ok((parent, index))
    }

    /// Next sibling of the nearest inclusive ancestor of `id` that has one:
    /// where document order continues once `id`'s subtree is exhausted.
    fn next_sibling_of_ancestor(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(next) = self.next_sibling(node) {
                return Some(next);
            }
            current = self.parent(node);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::{DomTree, NodeId, TreeError};

    fn element(tree: &mut DomTree, tag: &str) -> NodeId {
        tree.create_element(tag).unwrap()
    }

    fn order(tree: &DomTree) -> Vec<NodeId> {
        tree.next_elements(NodeId::ROOT).collect()
    }

    #[test]
    fn test_insert_threads_document_order() {
        let mut tree = DomTree::new();
        let div = element(&mut tree, "div");
        let p = element(&mut tree, "p");
        let text = tree.create_text("x");
        let span = element(&mut tree, "span");
        tree.append_child(NodeId::ROOT, div).unwrap();
        tree.append_child(div, p).unwrap();
        tree.append_child(p, text).unwrap();
        tree.append_child(NodeId::ROOT, span).unwrap();

        assert_eq!(order(&tree), vec![div, p, text, span]);
        assert_eq!(tree.prev_element(span), Some(text));
        assert_eq!(tree.next_element(text), Some(span));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_subtree_in_the_middle() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, "a");
        let b = element(&mut tree, "b");
        tree.append_child(NodeId::ROOT, a).unwrap();
        tree.append_child(NodeId::ROOT, b).unwrap();

        // A prebuilt subtree <ul><li/></ul> goes between a and b.
        let ul = element(&mut tree, "ul");
        let li = element(&mut tree, "li");
        tree.append_child(ul, li).unwrap();
        tree.insert(NodeId::ROOT, 1, ul).unwrap();

        assert_eq!(order(&tree), vec![a, ul, li, b]);
        assert_eq!(tree.next_element(li), Some(b));
        assert_eq!(tree.prev_element(b), Some(li));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_position_is_clamped() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, "a");
        tree.insert(NodeId::ROOT, 99, a).unwrap();
        assert_eq!(tree.children(NodeId::ROOT), &[a]);
    }

    #[test]
    fn test_insert_into_own_descendant_fails() {
        let mut tree = DomTree::new();
        let outer = element(&mut tree, "div");
        let inner = element(&mut tree, "span");
        tree.append_child(NodeId::ROOT, outer).unwrap();
        tree.append_child(outer, inner).unwrap();

        assert!(matches!(
            tree.append_child(inner, outer),
            Err(TreeError::InvalidStructure(_))
        ));
        assert!(matches!(
            tree.append_child(outer, outer),
            Err(TreeError::InvalidStructure(_))
        ));
        assert!(matches!(
            tree.append_child(outer, NodeId::ROOT),
            Err(TreeError::InvalidStructure(_))
        ));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_text_and_void_nodes_cannot_have_children() {
        let mut tree = DomTree::new();
        let text = tree.create_text("t");
        let br = element(&mut tree, "br");
        let b = element(&mut tree, "b");
        assert!(tree.append_child(text, b).is_err());
        assert!(tree.append_child(br, b).is_err());
    }

    #[test]
    fn test_move_within_same_parent() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, "a");
        let b = element(&mut tree, "b");
        let c = element(&mut tree, "c");
        for id in [a, b, c] {
            tree.append_child(NodeId::ROOT, id).unwrap();
        }

        // Moving a to index 2 means "before c" in the original list.
        tree.insert(NodeId::ROOT, 2, a).unwrap();
        assert_eq!(tree.children(NodeId::ROOT), &[b, a, c]);

        tree.append_child(NodeId::ROOT, b).unwrap();
        assert_eq!(tree.children(NodeId::ROOT), &[a, c, b]);
        assert_eq!(order(&tree), vec![a, c, b]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_extract_leaves_self_consistent_subtree() {
        let mut tree = DomTree::new();
        let div = element(&mut tree, "div");
        let p = element(&mut tree, "p");
        let text = tree.create_text("x");
        let after = element(&mut tree, "hr");
        tree.append_child(NodeId::ROOT, div).unwrap();
        tree.append_child(div, p).unwrap();
        tree.append_child(p, text).unwrap();
        tree.append_child(NodeId::ROOT, after).unwrap();

        tree.extract(p);

        assert_eq!(tree.parent(p), None);
        assert_eq!(tree.prev_element(p), None);
        assert_eq!(tree.next_element(text), None);
        assert_eq!(tree.next_element(p), Some(text));
        assert_eq!(tree.next_element(div), Some(after));
        assert_eq!(tree.prev_element(after), Some(div));
        assert!(tree.children(div).is_empty());
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_extract_detached_is_noop() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, "a");
        let b = element(&mut tree, "b");
        tree.append_child(a, b).unwrap();
        tree.extract(a);
        assert_eq!(tree.children(a), &[b]);
        assert_eq!(tree.next_element(a), Some(b));
    }

    #[test]
    fn test_replace() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, "a");
        let b = element(&mut tree, "b");
        let c = element(&mut tree, "c");
        tree.append_child(NodeId::ROOT, a).unwrap();
        tree.append_child(NodeId::ROOT, b).unwrap();

        tree.replace(a, c).unwrap();
        assert_eq!(tree.children(NodeId::ROOT), &[c, b]);
        assert_eq!(tree.parent(a), None);

        // Replacing with a later sibling moves it into the vacated slot.
        tree.replace(c, b).unwrap();
        assert_eq!(tree.children(NodeId::ROOT), &[b]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_replace_detached_fails() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, "a");
        let b = element(&mut tree, "b");
        assert_eq!(tree.replace(a, b), Err(TreeError::NoParent(a)));
    }

    #[test]
    fn test_replace_with_ancestor_fails_without_change() {
        let mut tree = DomTree::new();
        let outer = element(&mut tree, "div");
        let inner = element(&mut tree, "p");
        tree.append_child(NodeId::ROOT, outer).unwrap();
        tree.append_child(outer, inner).unwrap();
        assert!(matches!(
            tree.replace(inner, outer),
            Err(TreeError::InvalidStructure(_))
        ));
        assert_eq!(tree.children(outer), &[inner]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut tree = DomTree::new();
        let b = element(&mut tree, "b");
        tree.append_child(NodeId::ROOT, b).unwrap();
        let a = element(&mut tree, "a");
        let c = element(&mut tree, "c");
        tree.insert_before(b, a).unwrap();
        tree.insert_after(b, c).unwrap();
        assert_eq!(tree.children(NodeId::ROOT), &[a, b, c]);

        let loose = element(&mut tree, "x");
        assert_eq!(tree.insert_before(loose, a), Err(TreeError::NoParent(loose)));
        assert!(tree.insert_after(b, b).is_err());
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_decompose_clears_subtree() {
        let mut tree = DomTree::new();
        let div = tree
            .create_element_with_attrs("div", [("class", "gone")])
            .unwrap();
        let p = element(&mut tree, "p");
        let text = tree.create_text("bye");
        tree.append_child(NodeId::ROOT, div).unwrap();
        tree.append_child(div, p).unwrap();
        tree.append_child(p, text).unwrap();

        tree.decompose(div);

        assert!(tree.children(NodeId::ROOT).is_empty());
        assert!(tree.children(div).is_empty());
        assert!(tree.as_element(div).unwrap().attrs.is_empty());
        assert!(tree.is_decomposed(p));
        assert_eq!(tree.get(text).unwrap().node_type.text(), Some(""));
        assert!(tree.append_child(NodeId::ROOT, p).is_err());
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_unwrap_and_wrap() {
        let mut tree = DomTree::new();
        let div = element(&mut tree, "div");
        let b = element(&mut tree, "b");
        let x = tree.create_text("x");
        let y = tree.create_text("y");
        tree.append_child(NodeId::ROOT, div).unwrap();
        tree.append_child(div, x).unwrap();
        tree.append_child(div, b).unwrap();
        tree.append_child(b, y).unwrap();

        tree.unwrap(b).unwrap();
        assert_eq!(tree.children(div), &[x, y]);
        assert_eq!(tree.parent(b), None);

        let em = element(&mut tree, "em");
        tree.wrap(y, em).unwrap();
        assert_eq!(tree.children(div), &[x, em]);
        assert_eq!(tree.children(em), &[y]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_move_children_is_all_or_nothing() {
        let mut tree = DomTree::new();
        let from = element(&mut tree, "div");
        let a = element(&mut tree, "a");
        let b = element(&mut tree, "b");
        let inner = element(&mut tree, "i");
        tree.append_child(NodeId::ROOT, from).unwrap();
        tree.append_child(from, a).unwrap();
        tree.append_child(from, b).unwrap();
        tree.append_child(b, inner).unwrap();

        // `inner` lives under the second child, so that child cannot move there.
        assert!(matches!(
            tree.move_children(from, inner),
            Err(TreeError::InvalidStructure(_))
        ));
        assert_eq!(tree.children(from), &[a, b]);
        assert!(tree.children(inner).is_empty());
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_append_at_end_threads_after_last() {
        let mut tree = DomTree::new();
        let div = element(&mut tree, "div");
        tree.append_at_end(NodeId::ROOT, div, NodeId::ROOT).unwrap();
        let text = tree.create_text("x");
        tree.append_at_end(div, text, div).unwrap();
        // Back at the Document after closing the div.
        let hr = element(&mut tree, "hr");
        tree.append_at_end(NodeId::ROOT, hr, text).unwrap();

        assert_eq!(order(&tree), vec![div, text, hr]);
        assert_eq!(tree.children(NodeId::ROOT), &[div, hr]);
        assert_eq!(tree.prev_sibling(hr), Some(div));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_append_at_end_rejects_misuse() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, "a");
        let b = element(&mut tree, "b");
        tree.append_at_end(NodeId::ROOT, a, NodeId::ROOT).unwrap();

        // `a` is already attached.
        assert!(tree.append_at_end(NodeId::ROOT, a, a).is_err());
        // The Document is followed by `a`, so it does not end the chain.
        assert!(tree.append_at_end(NodeId::ROOT, b, NodeId::ROOT).is_err());
        // Leaves with children take the general path.
        let c = element(&mut tree, "c");
        tree.append_child(b, c).unwrap();
        assert!(tree.append_at_end(NodeId::ROOT, b, a).is_err());

        let text = tree.create_text("t");
        let d = element(&mut tree, "d");
        tree.append_at_end(a, text, a).unwrap();
        assert!(tree.append_at_end(text, d, text).is_err());
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_clear() {
        let mut tree = DomTree::new();
        let div = element(&mut tree, "div");
        let a = element(&mut tree, "a");
        let b = element(&mut tree, "b");
        tree.append_child(NodeId::ROOT, div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();
        tree.clear(div);
        assert!(tree.children(div).is_empty());
        assert_eq!(tree.next_element(div), None);
        tree.check_invariants().unwrap();
    }
}
