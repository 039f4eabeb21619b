//! DOM Tree (arena-based allocation)
//!
//! `DomTree` is the context object: it owns every node of every document it
//! created, the element resolver consulted on element creation, the custom
//! element registry and the mutation record queue.

use crate::custom_elements::CustomElementRegistry;
use crate::elements::{ElementResolver, HtmlCatalog};
use crate::observer::MutationLog;
use crate::{Node, NodeData, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    resolver: Box<dyn ElementResolver>,
    registry: CustomElementRegistry,
    active_document: Option<NodeId>,
    pub(crate) mutations: MutationLog,
}

impl DomTree {
    /// Create a new empty tree that resolves elements with [`HtmlCatalog`]
    pub fn new() -> Self {
        Self::with_resolver(Box::new(HtmlCatalog))
    }

    /// Create a new empty tree with a custom element resolver
    pub fn with_resolver(resolver: Box<dyn ElementResolver>) -> Self {
        Self {
            nodes: Vec::new(),
            resolver,
            registry: CustomElementRegistry::new(),
            active_document: None,
            mutations: MutationLog::default(),
        }
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Panics if `id` was not allocated by this tree.
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn alloc(&mut self, owner_document: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(owner_document, data));
        id
    }

    /// Allocate a document node, which owns itself
    pub(crate) fn alloc_document(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(id, data));
        if self.active_document.is_none() {
            self.active_document = Some(id);
        }
        id
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[inline]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    #[inline]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    #[inline]
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    #[inline]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// The document a node is associated with; a document is its own
    #[inline]
    pub fn node_document(&self, id: NodeId) -> NodeId {
        self.node(id).owner_document
    }

    /// `ownerDocument`: none for documents
    pub fn owner_document(&self, id: NodeId) -> Option<NodeId> {
        if self.node(id).is_document() {
            None
        } else {
            Some(self.node(id).owner_document)
        }
    }

    pub fn resolver(&self) -> &dyn ElementResolver {
        self.resolver.as_ref()
    }

    pub fn registry(&self) -> &CustomElementRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CustomElementRegistry {
        &mut self.registry
    }

    /// Split borrow used by `define`, which consults the resolver while
    /// mutating the registry
    pub(crate) fn registry_and_resolver(
        &mut self,
    ) -> (&mut CustomElementRegistry, &dyn ElementResolver) {
        (&mut self.registry, self.resolver.as_ref())
    }

    /// The active document: the first document created, unless replaced
    pub fn active_document(&self) -> Option<NodeId> {
        self.active_document
    }

    pub fn set_active_document(&mut self, document: NodeId) {
        if self.node(document).is_document() {
            self.active_document = Some(document);
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_own_themselves() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        assert_eq!(tree.node_document(doc), doc);
        assert_eq!(tree.owner_document(doc), None);
        assert_eq!(tree.active_document(), Some(doc));

        let text = tree.create_text_node(doc, "hi");
        assert_eq!(tree.owner_document(text), Some(doc));
    }

    #[test]
    fn test_active_document_only_moves_explicitly() {
        let mut tree = DomTree::new();
        let first = tree.create_document();
        let second = tree.create_document();
        assert_eq!(tree.active_document(), Some(first));

        tree.set_active_document(second);
        assert_eq!(tree.active_document(), Some(second));
    }
}
