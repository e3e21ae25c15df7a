//! Structural self-check for the dual-linkage invariants.

use crate::{DomTree, NodeId, NodeType, TreeError};

fn broken(message: String) -> TreeError {
    TreeError::InvalidStructure(message)
}

impl DomTree {
    /// Verify the document tree invariants over every live node:
    ///
    /// - the `next_element` chain from each subtree root is its pre-order
    ///   traversal, and `prev_element` mirrors it
    /// - sibling links match each parent's child list
    /// - children point back at their parent
    /// - void elements and text-like nodes have no children
    /// - detached roots have no outer links
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidStructure`] describing the first violation.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        for (index, node) in self.nodes.iter().enumerate() {
            let id = NodeId(index);
            if node.decomposed || node.parent.is_some() {
                continue;
            }
            if id == NodeId::ROOT && !matches!(node.node_type, NodeType::Document) {
                return Err(broken("root is not a document node".to_string()));
            }
            if id != NodeId::ROOT && matches!(node.node_type, NodeType::Document) {
                return Err(broken(format!("stray document node {id}")));
            }
            if node.prev_sibling.is_some() || node.next_sibling.is_some() {
                return Err(broken(format!("detached {id} has sibling links")));
            }
            if node.prev_element.is_some() {
                return Err(broken(format!("detached {id} has a previous element")));
            }
            self.check_subtree(id)?;
        }
        Ok(())
    }

    fn check_subtree(&self, root: NodeId) -> Result<(), TreeError> {
        // Pre-order over the child lists, iteratively.
        let mut expected = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            expected.push(id);
            let node = &self.nodes[id.0];
            match &node.node_type {
                NodeType::Element(data) if data.is_void() && !node.children.is_empty() => {
                    return Err(broken(format!("void element {id} has children")));
                }
                NodeType::Document | NodeType::Element(_) => {}
                _ if !node.children.is_empty() => {
                    return Err(broken(format!("text-like node {id} has children")));
                }
                _ => {}
            }
            self.check_children(id)?;
            stack.extend(node.children.iter().rev().copied());
        }

        let mut walked = Vec::with_capacity(expected.len());
        let mut current = Some(root);
        let mut previous = None;
        while let Some(id) = current {
            if walked.len() > expected.len() {
                return Err(broken(format!("document order from {root} does not end")));
            }
            let node = &self.nodes[id.0];
            if id != root && node.prev_element != previous {
                return Err(broken(format!(
                    "{id}.prev_element is {:?}, expected {previous:?}",
                    node.prev_element
                )));
            }
            walked.push(id);
            previous = Some(id);
            current = node.next_element;
        }
        if walked != expected {
            return Err(broken(format!(
                "document order from {root} is {walked:?}, pre-order is {expected:?}"
            )));
        }
        Ok(())
    }

    fn check_children(&self, parent: NodeId) -> Result<(), TreeError> {
        let children = &self.nodes[parent.0].children;
        for (index, &child) in children.iter().enumerate() {
            let node = &self.nodes[child.0];
            if node.parent != Some(parent) {
                return Err(broken(format!("{child} does not point back at {parent}")));
            }
            let prev = index.checked_sub(1).map(|i| children[i]);
            let next = children.get(index + 1).copied();
            if node.prev_sibling != prev || node.next_sibling != next {
                return Err(broken(format!(
                    "sibling links of {child} disagree with the children of {parent}"
                )));
            }
        }
        Ok(())
    }
}
