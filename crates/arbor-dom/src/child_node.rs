//! ChildNode mixin
//!
//! `before`, `after` and `replaceWith` take a mix of nodes and strings,
//! folded into one node before insertion.

use crate::{DomResult, DomTree, NodeId};

/// Argument of the variadic node methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOrText {
    Node(NodeId),
    Text(String),
}

impl From<NodeId> for NodeOrText {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl From<&str> for NodeOrText {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for NodeOrText {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

fn node_arguments(nodes: &[NodeOrText]) -> Vec<NodeId> {
    nodes
        .iter()
        .filter_map(|n| match n {
            NodeOrText::Node(node) => Some(*node),
            NodeOrText::Text(_) => None,
        })
        .collect()
}

impl DomTree {
    /// `converting nodes into a node`: strings become text nodes; more or
    /// fewer than one argument are gathered in a new fragment
    pub fn convert_nodes_into_a_node(
        &mut self,
        document: NodeId,
        nodes: Vec<NodeOrText>,
    ) -> DomResult<NodeId> {
        let mut converted: Vec<NodeId> = nodes
            .into_iter()
            .map(|n| match n {
                NodeOrText::Node(node) => node,
                NodeOrText::Text(text) => self.create_text_node(document, &text),
            })
            .collect();
        if converted.len() == 1 {
            if let Some(node) = converted.pop() {
                return Ok(node);
            }
        }

        let fragment = self.create_document_fragment(document);
        for node in converted {
            self.append(node, fragment)?;
        }
        Ok(fragment)
    }

    /// `before(...nodes)`
    pub fn before(&mut self, node: NodeId, nodes: Vec<NodeOrText>) -> DomResult<()> {
        let Some(parent) = self.parent(node) else {
            return Ok(());
        };
        let excluded = node_arguments(&nodes);
        let viable_previous = self.preceding_siblings(node).find(|s| !excluded.contains(s));

        let document = self.node_document(node);
        let inserted = self.convert_nodes_into_a_node(document, nodes)?;
        let reference = match viable_previous {
            Some(previous) => self.next_sibling(previous),
            None => self.first_child(parent),
        };
        self.pre_insert(inserted, parent, reference)?;
        Ok(())
    }

    /// `after(...nodes)`
    pub fn after(&mut self, node: NodeId, nodes: Vec<NodeOrText>) -> DomResult<()> {
        let Some(parent) = self.parent(node) else {
            return Ok(());
        };
        let excluded = node_arguments(&nodes);
        let viable_next = self.following_siblings(node).find(|s| !excluded.contains(s));

        let document = self.node_document(node);
        let inserted = self.convert_nodes_into_a_node(document, nodes)?;
        self.pre_insert(inserted, parent, viable_next)?;
        Ok(())
    }

    /// `replaceWith(...nodes)`
    pub fn replace_with(&mut self, node: NodeId, nodes: Vec<NodeOrText>) -> DomResult<()> {
        let Some(parent) = self.parent(node) else {
            return Ok(());
        };
        let excluded = node_arguments(&nodes);
        let viable_next = self.following_siblings(node).find(|s| !excluded.contains(s));

        let document = self.node_document(node);
        let replacement = self.convert_nodes_into_a_node(document, nodes)?;
        if self.parent(node) == Some(parent) {
            self.replace(node, replacement, parent)?;
        } else {
            self.pre_insert(replacement, parent, viable_next)?;
        }
        Ok(())
    }

    pub fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.following_siblings(node).find(|&s| self.node(s).is_element())
    }

    pub fn previous_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.preceding_siblings(node).find(|&s| self.node(s).is_element())
    }
}
