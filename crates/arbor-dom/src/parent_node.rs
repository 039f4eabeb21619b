//! ParentNode mixin
//!
//! Element-only views of a parent's children and the variadic
//! `append`/`prepend`/`replaceChildren` insertions.

use crate::child_node::NodeOrText;
use crate::{DomResult, DomTree, NodeId};

impl DomTree {
    /// `children`: element children in order
    pub fn element_children(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).filter(|&c| self.node(c).is_element()).collect()
    }

    pub fn first_element_child(&self, parent: NodeId) -> Option<NodeId> {
        self.children(parent).find(|&c| self.node(c).is_element())
    }

    pub fn last_element_child(&self, parent: NodeId) -> Option<NodeId> {
        let mut child = self.last_child(parent);
        while let Some(c) = child {
            if self.node(c).is_element() {
                return Some(c);
            }
            child = self.previous_sibling(c);
        }
        None
    }

    pub fn child_element_count(&self, parent: NodeId) -> usize {
        self.children(parent).filter(|&c| self.node(c).is_element()).count()
    }

    /// `prepend(...nodes)`
    pub fn prepend_nodes(&mut self, parent: NodeId, nodes: Vec<NodeOrText>) -> DomResult<()> {
        let document = self.node_document(parent);
        let node = self.convert_nodes_into_a_node(document, nodes)?;
        let first = self.first_child(parent);
        self.pre_insert(node, parent, first)?;
        Ok(())
    }

    /// `append(...nodes)`
    pub fn append_nodes(&mut self, parent: NodeId, nodes: Vec<NodeOrText>) -> DomResult<()> {
        let document = self.node_document(parent);
        let node = self.convert_nodes_into_a_node(document, nodes)?;
        self.append(node, parent)?;
        Ok(())
    }

    /// `replaceChildren(...nodes)`
    pub fn replace_children(&mut self, parent: NodeId, nodes: Vec<NodeOrText>) -> DomResult<()> {
        let document = self.node_document(parent);
        let node = self.convert_nodes_into_a_node(document, nodes)?;
        self.ensure_pre_insertion_validity(node, parent, None)?;
        self.replace_all(Some(node), parent);
        Ok(())
    }
}
