//! Tree traversal
//!
//! Read-only navigation over the arena. Sequences are iterator structs that
//! borrow the tree, so the tree cannot be mutated while one is live; collect
//! into a `Vec` first when the walk feeds a mutation.

use std::cmp::Ordering;

use crate::{DomTree, NodeId, NodeType};

/// Children of a node, first to last
#[derive(Debug, Clone)]
pub struct Children<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Pre-order walk that stops when it would leave `boundary`
#[derive(Debug, Clone)]
pub struct Following<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
    boundary: Option<NodeId>,
}

impl Iterator for Following<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_in_tree_order(current, self.boundary);
        Some(current)
    }
}

/// Reverse pre-order walk; ancestors are included
#[derive(Debug, Clone)]
pub struct Preceding<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
    boundary: Option<NodeId>,
}

impl Iterator for Preceding<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.previous_in_tree_order(current, self.boundary);
        Some(current)
    }
}

/// Sibling chain in one direction
#[derive(Debug, Clone)]
pub struct Siblings<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
    forward: bool,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = if self.forward {
            self.tree.next_sibling(current)
        } else {
            self.tree.previous_sibling(current)
        };
        Some(current)
    }
}

/// Parent chain, nearest first
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// `compareDocumentPosition` bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DocumentPosition(u16);

impl DocumentPosition {
    pub const DISCONNECTED: DocumentPosition = DocumentPosition(0x01);
    pub const PRECEDING: DocumentPosition = DocumentPosition(0x02);
    pub const FOLLOWING: DocumentPosition = DocumentPosition(0x04);
    pub const CONTAINS: DocumentPosition = DocumentPosition(0x08);
    pub const CONTAINED_BY: DocumentPosition = DocumentPosition(0x10);
    pub const IMPLEMENTATION_SPECIFIC: DocumentPosition = DocumentPosition(0x20);

    pub const fn union(self, other: DocumentPosition) -> DocumentPosition {
        DocumentPosition(self.0 | other.0)
    }

    pub const fn contains(self, other: DocumentPosition) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn bits(self) -> u16 {
        self.0
    }
}

impl DomTree {
    /// Next node in tree order, not leaving `boundary`'s subtree
    pub(crate) fn next_in_tree_order(
        &self,
        node: NodeId,
        boundary: Option<NodeId>,
    ) -> Option<NodeId> {
        if let Some(child) = self.first_child(node) {
            return Some(child);
        }
        let mut current = node;
        loop {
            if Some(current) == boundary {
                return None;
            }
            if let Some(sibling) = self.next_sibling(current) {
                return Some(sibling);
            }
            current = self.parent(current)?;
        }
    }

    /// Previous node in tree order; returns none instead of `boundary`
    pub(crate) fn previous_in_tree_order(
        &self,
        node: NodeId,
        boundary: Option<NodeId>,
    ) -> Option<NodeId> {
        if Some(node) == boundary {
            return None;
        }
        match self.previous_sibling(node) {
            Some(sibling) => Some(self.last_inclusive_descendant(sibling)),
            None => self.parent(node).filter(|parent| Some(*parent) != boundary),
        }
    }

    fn last_inclusive_descendant(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(last) = self.last_child(current) {
            current = last;
        }
        current
    }

    pub fn children(&self, node: NodeId) -> Children<'_> {
        Children { tree: self, next: self.first_child(node) }
    }

    /// `childNodes`, as a snapshot
    pub fn child_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node).collect()
    }

    pub fn has_child_nodes(&self, node: NodeId) -> bool {
        self.first_child(node).is_some()
    }

    /// Descendants in pre-order, excluding `node`
    pub fn descendants(&self, node: NodeId) -> Following<'_> {
        Following {
            tree: self,
            next: self.next_in_tree_order(node, Some(node)),
            boundary: Some(node),
        }
    }

    pub fn inclusive_descendants(&self, node: NodeId) -> Following<'_> {
        Following { tree: self, next: Some(node), boundary: Some(node) }
    }

    /// Nodes after `node` in tree order
    pub fn following(&self, node: NodeId) -> Following<'_> {
        self.following_within(node, None)
    }

    /// Nodes after `node` in tree order, stopping exactly at the end of
    /// `boundary`'s subtree
    pub fn following_within(&self, node: NodeId, boundary: Option<NodeId>) -> Following<'_> {
        Following {
            tree: self,
            next: self.next_in_tree_order(node, boundary),
            boundary,
        }
    }

    pub fn inclusive_following(&self, node: NodeId) -> Following<'_> {
        Following { tree: self, next: Some(node), boundary: None }
    }

    /// Nodes before `node` in tree order, nearest first
    pub fn preceding(&self, node: NodeId) -> Preceding<'_> {
        self.preceding_within(node, None)
    }

    /// Like [`preceding`](Self::preceding) but never yields `boundary` or
    /// anything outside it
    pub fn preceding_within(&self, node: NodeId, boundary: Option<NodeId>) -> Preceding<'_> {
        Preceding {
            tree: self,
            next: self.previous_in_tree_order(node, boundary),
            boundary,
        }
    }

    pub fn following_siblings(&self, node: NodeId) -> Siblings<'_> {
        Siblings { tree: self, next: self.next_sibling(node), forward: true }
    }

    pub fn preceding_siblings(&self, node: NodeId) -> Siblings<'_> {
        Siblings { tree: self, next: self.previous_sibling(node), forward: false }
    }

    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors { tree: self, next: self.parent(node) }
    }

    pub fn inclusive_ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors { tree: self, next: Some(node) }
    }

    /// Is `ancestor` a proper ancestor of `node`
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|candidate| candidate == ancestor)
    }

    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.is_ancestor(ancestor, node)
    }

    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.is_ancestor(ancestor, node)
    }

    pub fn is_inclusive_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.is_inclusive_ancestor(ancestor, node)
    }

    /// `contains`: inclusive descendant check
    pub fn contains(&self, node: NodeId, other: NodeId) -> bool {
        self.is_inclusive_ancestor(node, other)
    }

    pub fn is_same_node(&self, node: NodeId, other: NodeId) -> bool {
        node == other
    }

    /// Top of the parent chain
    pub fn root(&self, node: NodeId) -> NodeId {
        self.inclusive_ancestors(node).last().unwrap_or(node)
    }

    /// `getRootNode()`
    pub fn get_root_node(&self, node: NodeId) -> NodeId {
        self.root(node)
    }

    /// Connected nodes have a document as their root
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.node(self.root(node)).is_document()
    }

    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|parent| self.node(*parent).is_element())
    }

    /// Number of preceding siblings
    pub fn index(&self, node: NodeId) -> usize {
        self.preceding_siblings(node).count()
    }

    pub fn node_type(&self, node: NodeId) -> NodeType {
        self.node(node).node_type()
    }

    /// Relative tree order of two nodes; none when they are in different trees
    pub fn tree_order(&self, a: NodeId, b: NodeId) -> Option<Ordering> {
        if a == b {
            return Some(Ordering::Equal);
        }
        let mut path_a: Vec<NodeId> = self.inclusive_ancestors(a).collect();
        let mut path_b: Vec<NodeId> = self.inclusive_ancestors(b).collect();
        path_a.reverse();
        path_b.reverse();
        if path_a.first() != path_b.first() {
            return None;
        }

        let shared = path_a
            .iter()
            .zip(path_b.iter())
            .take_while(|(x, y)| x == y)
            .count();
        if shared == path_a.len() {
            return Some(Ordering::Less);
        }
        if shared == path_b.len() {
            return Some(Ordering::Greater);
        }

        let (branch_a, branch_b) = (path_a[shared], path_b[shared]);
        if self.following_siblings(branch_a).any(|sibling| sibling == branch_b) {
            Some(Ordering::Less)
        } else {
            Some(Ordering::Greater)
        }
    }

    /// `a` comes before `b` in tree order
    pub fn is_preceding(&self, a: NodeId, b: NodeId) -> bool {
        self.tree_order(a, b) == Some(Ordering::Less)
    }

    /// `a` comes after `b` in tree order
    pub fn is_following(&self, a: NodeId, b: NodeId) -> bool {
        self.tree_order(a, b) == Some(Ordering::Greater)
    }

    /// `node.compareDocumentPosition(other)`
    pub fn compare_document_position(&self, node: NodeId, other: NodeId) -> DocumentPosition {
        if node == other {
            return DocumentPosition::default();
        }

        let mut node1 = Some(other);
        let mut node2 = Some(node);
        let mut attr1 = None;
        let mut attr2 = None;

        if let Some(attr) = self.node(other).as_attribute() {
            attr1 = Some(other);
            node1 = attr.element;
        }
        if let Some(attr) = self.node(node).as_attribute() {
            attr2 = Some(node);
            node2 = attr.element;

            if let (Some(a1), Some(n1)) = (attr1, node1) {
                if node2 == Some(n1) {
                    let attributes = self.node(n1).as_element().map(|e| e.attributes.as_slice());
                    for &candidate in attributes.unwrap_or_default() {
                        if candidate == a1 {
                            return DocumentPosition::IMPLEMENTATION_SPECIFIC
                                .union(DocumentPosition::PRECEDING);
                        }
                        if Some(candidate) == attr2 {
                            return DocumentPosition::IMPLEMENTATION_SPECIFIC
                                .union(DocumentPosition::FOLLOWING);
                        }
                    }
                }
            }
        }

        let (Some(node1), Some(node2)) = (node1, node2) else {
            return self.disconnected_position(other, node);
        };
        if self.root(node1) != self.root(node2) {
            return self.disconnected_position(other, node);
        }

        if (self.is_ancestor(node1, node2) && attr1.is_none())
            || (node1 == node2 && attr2.is_some())
        {
            return DocumentPosition::CONTAINS.union(DocumentPosition::PRECEDING);
        }
        if (self.is_ancestor(node2, node1) && attr2.is_none())
            || (node1 == node2 && attr1.is_some())
        {
            return DocumentPosition::CONTAINED_BY.union(DocumentPosition::FOLLOWING);
        }
        if self.is_preceding(node1, node2) {
            return DocumentPosition::PRECEDING;
        }
        DocumentPosition::FOLLOWING
    }

    /// Disconnected nodes get a consistent order from their arena position
    fn disconnected_position(&self, other: NodeId, node: NodeId) -> DocumentPosition {
        let direction = if other < node {
            DocumentPosition::PRECEDING
        } else {
            DocumentPosition::FOLLOWING
        };
        DocumentPosition::DISCONNECTED
            .union(DocumentPosition::IMPLEMENTATION_SPECIFIC)
            .union(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// doc > html > [head, body > [p > "text", div]]
    fn sample() -> (DomTree, [NodeId; 7]) {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let html = tree.create_element(doc, "html", None).unwrap();
        let head = tree.create_element(doc, "head", None).unwrap();
        let body = tree.create_element(doc, "body", None).unwrap();
        let p = tree.create_element(doc, "p", None).unwrap();
        let text = tree.create_text_node(doc, "text");
        let div = tree.create_element(doc, "div", None).unwrap();
        tree.append_child(doc, html).unwrap();
        tree.append_child(html, head).unwrap();
        tree.append_child(html, body).unwrap();
        tree.append_child(body, p).unwrap();
        tree.append_child(p, text).unwrap();
        tree.append_child(body, div).unwrap();
        (tree, [doc, html, head, body, p, text, div])
    }

    #[test]
    fn test_descendants_preorder() {
        let (tree, [doc, html, head, body, p, text, div]) = sample();
        let all: Vec<_> = tree.descendants(doc).collect();
        assert_eq!(all, vec![html, head, body, p, text, div]);

        let inclusive: Vec<_> = tree.inclusive_descendants(body).collect();
        assert_eq!(inclusive, vec![body, p, text, div]);

        assert_eq!(tree.descendants(text).count(), 0);
    }

    #[test]
    fn test_following_stops_at_boundary() {
        let (tree, [_, _, head, body, p, text, div]) = sample();
        let within: Vec<_> = tree.following_within(p, Some(body)).collect();
        assert_eq!(within, vec![text, div]);

        let from_head: Vec<_> = tree.following(head).collect();
        assert_eq!(from_head, vec![body, p, text, div]);

        let bounded: Vec<_> = tree.following_within(text, Some(p)).collect();
        assert!(bounded.is_empty());
    }

    #[test]
    fn test_preceding_reverse_order() {
        let (tree, [doc, html, head, body, p, text, div]) = sample();
        let before: Vec<_> = tree.preceding(div).collect();
        assert_eq!(before, vec![text, p, body, head, html, doc]);

        let within: Vec<_> = tree.preceding_within(div, Some(body)).collect();
        assert_eq!(within, vec![text, p]);
    }

    #[test]
    fn test_siblings_and_ancestors() {
        let (tree, [doc, html, head, body, _, text, _]) = sample();
        assert_eq!(tree.following_siblings(head).collect::<Vec<_>>(), vec![body]);
        assert_eq!(tree.preceding_siblings(body).collect::<Vec<_>>(), vec![head]);
        assert_eq!(tree.following_siblings(body).count(), 0);

        let chain: Vec<_> = tree.ancestors(text).collect();
        assert_eq!(chain[chain.len() - 1], doc);
        assert!(tree.is_ancestor(html, text));
        assert!(!tree.is_ancestor(text, text));
        assert!(tree.is_inclusive_ancestor(text, text));
        assert!(tree.is_descendant(text, doc));
        assert_eq!(tree.root(text), doc);
        assert!(tree.is_connected(text));
    }

    #[test]
    fn test_tree_order() {
        let (tree, [doc, _, head, body, p, text, div]) = sample();
        assert!(tree.is_preceding(head, text));
        assert!(tree.is_preceding(doc, div));
        assert!(tree.is_following(div, p));
        assert_eq!(tree.index(body), 1);

        let mut tree = tree;
        let loose = tree.create_element(doc, "span", None).unwrap();
        assert_eq!(tree.tree_order(loose, head), None);
        assert!(!tree.is_connected(loose));
    }

    #[test]
    fn test_compare_document_position() {
        let (mut tree, [_, html, head, body, p, _, div]) = sample();
        assert_eq!(
            tree.compare_document_position(body, html),
            DocumentPosition::CONTAINS.union(DocumentPosition::PRECEDING)
        );
        assert_eq!(
            tree.compare_document_position(html, p),
            DocumentPosition::CONTAINED_BY.union(DocumentPosition::FOLLOWING)
        );
        assert_eq!(tree.compare_document_position(div, head), DocumentPosition::PRECEDING);
        assert_eq!(tree.compare_document_position(head, div), DocumentPosition::FOLLOWING);
        assert_eq!(tree.compare_document_position(div, div), DocumentPosition::default());

        tree.set_attribute(p, "a", "1").unwrap();
        tree.set_attribute(p, "b", "2").unwrap();
        let a = tree.get_attribute_node(p, "a").unwrap();
        let b = tree.get_attribute_node(p, "b").unwrap();
        let position = tree.compare_document_position(b, a);
        assert!(position.contains(DocumentPosition::PRECEDING));
        assert!(position.contains(DocumentPosition::IMPLEMENTATION_SPECIFIC));
        assert_eq!(
            tree.compare_document_position(p, a),
            DocumentPosition::CONTAINED_BY.union(DocumentPosition::FOLLOWING)
        );

        let doc = tree.node_document(p);
        let loose = tree.create_element(doc, "span", None).unwrap();
        assert!(tree.compare_document_position(p, loose).contains(DocumentPosition::DISCONNECTED));
    }
}
