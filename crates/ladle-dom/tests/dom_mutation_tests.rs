//! Tests for DOM tree mutation methods: extract, insert_before, move_children,
//! replace and decompose, checked against both the sibling and the
//! document-order links.

use ladle_dom::{DomTree, NodeId, TreeError};

/// Helper to create an element node and return its NodeId.
fn element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.create_element(tag).unwrap()
}

/// Helper to build `<div>` under the Document with children `a`, `b`, `c`.
fn three_children(tree: &mut DomTree) -> (NodeId, [NodeId; 3]) {
    let parent = element(tree, "div");
    tree.append_child(NodeId::ROOT, parent).unwrap();
    let a = element(tree, "a");
    let b = element(tree, "b");
    let c = element(tree, "c");
    for child in [a, b, c] {
        tree.append_child(parent, child).unwrap();
    }
    (parent, [a, b, c])
}

// ========== extract ==========

#[test]
fn test_extract_single_child() {
    let mut tree = DomTree::new();
    let parent = element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent).unwrap();

    let child = element(&mut tree, "p");
    tree.append_child(parent, child).unwrap();

    assert_eq!(tree.children(parent).len(), 1);

    tree.extract(child);

    assert_eq!(tree.children(parent).len(), 0);
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
    assert_eq!(tree.next_element(parent), None);
    tree.check_invariants().unwrap();
}

#[test]
fn test_extract_first_of_three() {
    let mut tree = DomTree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);

    tree.extract(a);

    // b is now first child, c is second
    assert_eq!(tree.children(parent), &[b, c]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
    assert_eq!(tree.next_element(parent), Some(b));
    assert_eq!(tree.prev_element(b), Some(parent));
    tree.check_invariants().unwrap();
}

#[test]
fn test_extract_middle_of_three() {
    let mut tree = DomTree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);

    tree.extract(b);

    // a and c are siblings now
    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_eq!(tree.next_element(a), Some(c));
    assert_eq!(tree.prev_element(c), Some(a));
    tree.check_invariants().unwrap();
}

#[test]
fn test_extract_last_of_three() {
    let mut tree = DomTree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);

    tree.extract(c);

    assert_eq!(tree.children(parent), &[a, b]);
    assert_eq!(tree.next_sibling(b), None);
    assert_eq!(tree.next_element(b), None);
    tree.check_invariants().unwrap();
}

#[test]
fn test_extract_nested_subtree_reconnects_outer_chain() {
    let mut tree = DomTree::new();
    let (parent, [a, b, _]) = three_children(&mut tree);
    let inner = element(&mut tree, "i");
    let text = tree.create_text("deep");
    tree.append_child(b, inner).unwrap();
    tree.append_child(inner, text).unwrap();
    let after = element(&mut tree, "footer");
    tree.append_child(NodeId::ROOT, after).unwrap();

    tree.extract(parent);

    assert_eq!(tree.children(NodeId::ROOT), &[after]);
    assert_eq!(tree.next_element(NodeId::ROOT), Some(after));
    assert_eq!(tree.prev_element(after), Some(NodeId::ROOT));
    // The detached subtree still walks itself in order.
    let walk: Vec<NodeId> = tree.descendants(parent).collect();
    assert_eq!(walk.first(), Some(&a));
    assert!(walk.contains(&text));
    tree.check_invariants().unwrap();
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let parent = element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent).unwrap();

    let existing = element(&mut tree, "p");
    tree.append_child(parent, existing).unwrap();

    let new_node = element(&mut tree, "span");
    tree.insert_before(existing, new_node).unwrap();

    assert_eq!(tree.children(parent), &[new_node, existing]);
    assert_eq!(tree.prev_sibling(new_node), None);
    assert_eq!(tree.next_sibling(new_node), Some(existing));
    assert_eq!(tree.prev_sibling(existing), Some(new_node));
    assert_eq!(tree.parent(new_node), Some(parent));
    assert_eq!(tree.next_element(parent), Some(new_node));
    assert_eq!(tree.next_element(new_node), Some(existing));
    tree.check_invariants().unwrap();
}

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let parent = element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent).unwrap();

    let a = element(&mut tree, "a");
    let c = element(&mut tree, "c");
    tree.append_child(parent, a).unwrap();
    tree.append_child(parent, c).unwrap();

    let b = element(&mut tree, "b");
    tree.insert_before(c, b).unwrap();

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
    tree.check_invariants().unwrap();
}

#[test]
fn test_insert_after_deep_sibling_links_past_its_subtree() {
    let mut tree = DomTree::new();
    let (_, [a, b, c]) = three_children(&mut tree);
    let deep = tree.create_text("inside a");
    tree.append_child(a, deep).unwrap();

    let new_node = element(&mut tree, "x");
    tree.insert_after(a, new_node).unwrap();

    // Document order enters x after a's last descendant, then continues to b.
    assert_eq!(tree.prev_element(new_node), Some(deep));
    assert_eq!(tree.next_element(new_node), Some(b));
    assert_eq!(tree.next_sibling(b), Some(c));
    tree.check_invariants().unwrap();
}

#[test]
fn test_insert_relative_to_detached_fails() {
    let mut tree = DomTree::new();
    let loose = element(&mut tree, "p");
    let node = element(&mut tree, "b");
    assert_eq!(tree.insert_before(loose, node), Err(TreeError::NoParent(loose)));
    assert_eq!(tree.insert_after(loose, node), Err(TreeError::NoParent(loose)));
}

#[test]
fn test_insert_moves_node_between_parents() {
    let mut tree = DomTree::new();
    let (first, [a, b, _]) = three_children(&mut tree);
    let second = element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, second).unwrap();

    tree.append_child(second, b).unwrap();

    assert_eq!(tree.children(first).len(), 2);
    assert_eq!(tree.next_sibling(a).map(|id| tree.tag_name(id)), Some(Some("c")));
    assert_eq!(tree.children(second), &[b]);
    assert_eq!(tree.parent(b), Some(second));
    tree.check_invariants().unwrap();
}

// ========== move_children ==========

#[test]
fn test_move_children_basic() {
    let mut tree = DomTree::new();
    let from = element(&mut tree, "div");
    let to = element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, from).unwrap();
    tree.append_child(NodeId::ROOT, to).unwrap();

    let a = element(&mut tree, "a");
    let b = element(&mut tree, "b");
    tree.append_child(from, a).unwrap();
    tree.append_child(from, b).unwrap();

    tree.move_children(from, to).unwrap();

    // from should be empty
    assert_eq!(tree.children(from).len(), 0);
    // to should have both children
    assert_eq!(tree.children(to), &[a, b]);
    assert_eq!(tree.parent(a), Some(to));
    assert_eq!(tree.parent(b), Some(to));
    assert_eq!(tree.next_element(from), Some(to));
    tree.check_invariants().unwrap();
}

#[test]
fn test_move_children_appends_to_existing() {
    let mut tree = DomTree::new();
    let from = element(&mut tree, "div");
    let to = element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, from).unwrap();
    tree.append_child(NodeId::ROOT, to).unwrap();

    let existing = element(&mut tree, "em");
    tree.append_child(to, existing).unwrap();

    let a = element(&mut tree, "a");
    tree.append_child(from, a).unwrap();

    tree.move_children(from, to).unwrap();

    assert_eq!(tree.children(to), &[existing, a]);
    assert_eq!(tree.next_sibling(existing), Some(a));
    assert_eq!(tree.prev_sibling(a), Some(existing));
    tree.check_invariants().unwrap();
}

#[test]
fn test_move_children_empty_source() {
    let mut tree = DomTree::new();
    let from = element(&mut tree, "div");
    let to = element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, from).unwrap();
    tree.append_child(NodeId::ROOT, to).unwrap();

    tree.move_children(from, to).unwrap();

    assert_eq!(tree.children(from).len(), 0);
    assert_eq!(tree.children(to).len(), 0);
}

// ========== replace / decompose ==========

#[test]
fn test_replace_keeps_position_and_order() {
    let mut tree = DomTree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);
    let x = element(&mut tree, "x");
    let y = tree.create_text("y");
    tree.append_child(x, y).unwrap();

    tree.replace(b, x).unwrap();

    assert_eq!(tree.children(parent), &[a, x, c]);
    assert_eq!(tree.next_element(a), Some(x));
    assert_eq!(tree.next_element(y), Some(c));
    assert_eq!(tree.parent(b), None);
    tree.check_invariants().unwrap();
}

#[test]
fn test_decompose_document_clears_it() {
    let mut tree = DomTree::new();
    let (parent, [a, ..]) = three_children(&mut tree);

    tree.decompose(NodeId::ROOT);

    assert!(tree.children(NodeId::ROOT).is_empty());
    assert!(tree.is_decomposed(parent));
    assert!(tree.is_decomposed(a));
    assert!(!tree.is_decomposed(NodeId::ROOT));

    // The document is still usable.
    let fresh = element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, fresh).unwrap();
    assert_eq!(tree.next_element(NodeId::ROOT), Some(fresh));
    tree.check_invariants().unwrap();
}

#[test]
fn test_decomposed_node_cannot_be_reinserted() {
    let mut tree = DomTree::new();
    let (parent, [a, ..]) = three_children(&mut tree);
    tree.decompose(a);
    assert!(matches!(
        tree.append_child(parent, a),
        Err(TreeError::InvalidStructure(_))
    ));
    assert!(matches!(
        tree.append_child(a, parent),
        Err(TreeError::InvalidStructure(_))
    ));
}
