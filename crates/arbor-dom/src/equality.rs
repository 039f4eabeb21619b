//! Node equality

use crate::{DomTree, NodeData, NodeId};

impl DomTree {
    /// `isEqualNode(other)`: same kind, same per-kind fields, equal children
    /// in order
    pub fn is_equal_node(&self, node: NodeId, other: NodeId) -> bool {
        if node == other {
            return true;
        }
        if !self.shallow_equal(node, other) {
            return false;
        }

        let mut left = self.children(node);
        let mut right = self.children(other);
        loop {
            match (left.next(), right.next()) {
                (Some(a), Some(b)) if self.is_equal_node(a, b) => {}
                (None, None) => return true,
                _ => return false,
            }
        }
    }

    fn shallow_equal(&self, node: NodeId, other: NodeId) -> bool {
        let (a, b) = (self.node(node), self.node(other));
        if a.capabilities() != b.capabilities() {
            return false;
        }

        match (&a.data, &b.data) {
            (NodeData::DocumentType(x), NodeData::DocumentType(y)) => x == y,
            (NodeData::Element(x), NodeData::Element(y)) => {
                x.namespace == y.namespace
                    && x.prefix == y.prefix
                    && x.local_name == y.local_name
                    && x.attributes.len() == y.attributes.len()
                    && x.attributes.iter().all(|&attr| {
                        y.attributes.iter().any(|&candidate| self.attributes_equal(attr, candidate))
                    })
            }
            (NodeData::Attribute(_), NodeData::Attribute(_)) => self.attributes_equal(node, other),
            (
                NodeData::ProcessingInstruction { target: t1, data: d1 },
                NodeData::ProcessingInstruction { target: t2, data: d2 },
            ) => t1 == t2 && d1 == d2,
            (NodeData::Text(x), NodeData::Text(y))
            | (NodeData::CDataSection(x), NodeData::CDataSection(y))
            | (NodeData::Comment(x), NodeData::Comment(y)) => x == y,
            (NodeData::Document(_), NodeData::Document(_))
            | (NodeData::DocumentFragment, NodeData::DocumentFragment) => true,
            _ => false,
        }
    }

    fn attributes_equal(&self, attr: NodeId, other: NodeId) -> bool {
        match (self.node(attr).as_attribute(), self.node(other).as_attribute()) {
            (Some(a), Some(b)) => {
                a.namespace == b.namespace && a.local_name == b.local_name && a.value == b.value
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_equal() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let text = tree.create_text_node(doc, "x");
        assert!(tree.is_equal_node(text, text));
    }

    #[test]
    fn test_attribute_order_is_ignored() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let a = tree.create_element(doc, "e", None).unwrap();
        let b = tree.create_element(doc, "e", None).unwrap();
        tree.set_attribute(a, "x", "1").unwrap();
        tree.set_attribute(a, "y", "2").unwrap();
        tree.set_attribute(b, "y", "2").unwrap();
        tree.set_attribute(b, "x", "1").unwrap();
        assert!(tree.is_equal_node(a, b));

        tree.set_attribute(b, "x", "3").unwrap();
        assert!(!tree.is_equal_node(a, b));
    }

    #[test]
    fn test_kind_and_children_matter() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let text = tree.create_text_node(doc, "same");
        let comment = tree.create_comment(doc, "same");
        assert!(!tree.is_equal_node(text, comment));

        let a = tree.create_element(doc, "e", None).unwrap();
        let b = tree.create_element(doc, "e", None).unwrap();
        let child = tree.create_text_node(doc, "c");
        tree.append_child(a, child).unwrap();
        assert!(!tree.is_equal_node(a, b));

        let other = tree.create_text_node(doc, "c");
        tree.append_child(b, other).unwrap();
        assert!(tree.is_equal_node(a, b));
    }

    #[test]
    fn test_prefix_matters_for_elements() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let ns = Some("urn:x");
        let a = tree.create_element_ns(doc, ns, "p:e", None).unwrap();
        let b = tree.create_element_ns(doc, ns, "q:e", None).unwrap();
        assert!(!tree.is_equal_node(a, b));
    }
}
