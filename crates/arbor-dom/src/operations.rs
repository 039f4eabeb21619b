//! DOM Node Operations
//!
//! The mutation engine: insert, remove, replace, replace-all and adopt, plus
//! the `appendChild`/`insertBefore`/`removeChild`/`replaceChild` surface.
//! Public entry points validate first; pointer surgery only starts once
//! every check has passed.

use crate::{Capabilities, DomError, DomResult, DomTree, NodeId};

impl DomTree {
    fn is_fragment(&self, node: NodeId) -> bool {
        self.node(node).capabilities().contains(Capabilities::DOCUMENT_FRAGMENT)
    }

    /// Splice `node` into `parent` before `child` (at the end when none)
    fn link_before(&mut self, node: NodeId, parent: NodeId, child: Option<NodeId>) {
        let previous = match child {
            Some(child) => self.previous_sibling(child),
            None => self.last_child(parent),
        };

        let links = self.node_mut(node);
        links.parent = Some(parent);
        links.prev_sibling = previous;
        links.next_sibling = child;

        match previous {
            Some(previous) => self.node_mut(previous).next_sibling = Some(node),
            None => self.node_mut(parent).first_child = Some(node),
        }
        match child {
            Some(child) => self.node_mut(child).prev_sibling = Some(node),
            None => self.node_mut(parent).last_child = Some(node),
        }
    }

    /// Insert without validation. Fragments are flattened; returns the
    /// nodes that were inserted.
    pub(crate) fn insert(
        &mut self,
        node: NodeId,
        parent: NodeId,
        child: Option<NodeId>,
        suppress_observers: bool,
    ) -> Vec<NodeId> {
        let nodes = if self.is_fragment(node) {
            let children = self.child_nodes(node);
            for &c in &children {
                self.detach(c, true);
            }
            self.queue_child_list(node, Vec::new(), children.clone(), None, None);
            children
        } else {
            vec![node]
        };

        if nodes.is_empty() {
            return nodes;
        }

        let previous_sibling = match child {
            Some(child) => self.previous_sibling(child),
            None => self.last_child(parent),
        };
        let document = self.node_document(parent);
        for &n in &nodes {
            self.adopt(n, document);
            self.link_before(n, parent, child);
        }
        tracing::trace!("Inserted {} node(s) into {:?}", nodes.len(), parent);

        if !suppress_observers {
            self.queue_child_list(parent, nodes.clone(), Vec::new(), previous_sibling, child);
        }
        nodes
    }

    /// Unlink `node` from its parent; no-op when parentless
    pub(crate) fn detach(&mut self, node: NodeId, suppress_observers: bool) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        let previous = self.previous_sibling(node);
        let next = self.next_sibling(node);

        match previous {
            Some(previous) => self.node_mut(previous).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev_sibling = previous,
            None => self.node_mut(parent).last_child = previous,
        }

        let links = self.node_mut(node);
        links.parent = None;
        links.prev_sibling = None;
        links.next_sibling = None;
        tracing::trace!("Removed {:?} from {:?}", node, parent);

        if !suppress_observers {
            self.queue_child_list(parent, Vec::new(), vec![node], previous, next);
        }
    }

    /// Remove `node` from its parent, keeping its subtree and owning
    /// document. A parentless node is left alone.
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node, false);
    }

    /// `pre-insert`: validate, then insert `node` into `parent` before `child`
    pub fn pre_insert(
        &mut self,
        node: NodeId,
        parent: NodeId,
        child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.ensure_pre_insertion_validity(node, parent, child)?;

        let reference = if child == Some(node) { self.next_sibling(node) } else { child };
        self.insert(node, parent, reference, false);
        Ok(node)
    }

    /// `append`: pre-insert at the end
    pub fn append(&mut self, node: NodeId, parent: NodeId) -> DomResult<NodeId> {
        self.pre_insert(node, parent, None)
    }

    /// `pre-remove`: `child` must be a child of `parent`
    pub fn pre_remove(&mut self, child: NodeId, parent: NodeId) -> DomResult<NodeId> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotFound("node to remove is not a child of parent"));
        }
        self.detach(child, false);
        Ok(child)
    }

    /// `replace`: put `node` where `child` is; returns `child`
    pub fn replace(&mut self, child: NodeId, node: NodeId, parent: NodeId) -> DomResult<NodeId> {
        self.ensure_replacement_validity(child, node, parent)?;

        let mut reference = self.next_sibling(child);
        if reference == Some(node) {
            reference = self.next_sibling(node);
        }
        let previous_sibling = self.previous_sibling(child);

        let mut removed = Vec::new();
        if self.parent(child).is_some() {
            removed.push(child);
            self.detach(child, true);
        }
        let added = self.insert(node, parent, reference, true);
        self.queue_child_list(parent, added, removed, previous_sibling, reference);
        tracing::trace!("Replaced {:?} with {:?} in {:?}", child, node, parent);

        Ok(child)
    }

    /// `replace all`: drop every child of `parent`, then insert `node`
    pub fn replace_all(&mut self, node: Option<NodeId>, parent: NodeId) {
        let removed = self.child_nodes(parent);
        let added = match node {
            Some(node) if self.is_fragment(node) => self.child_nodes(node),
            Some(node) => vec![node],
            None => Vec::new(),
        };

        for &child in &removed {
            self.detach(child, true);
        }
        if let Some(node) = node {
            self.insert(node, parent, None, true);
        }
        self.queue_child_list(parent, added, removed, None, None);
    }

    /// `adopt`: detach `node` and move its subtree (attributes included)
    /// into `document`
    ///
    /// Documents are never adopted. An attribute owned by an element is
    /// removed from it first.
    pub fn adopt(&mut self, node: NodeId, document: NodeId) {
        if self.node(node).is_document() || !self.node(document).is_document() {
            return;
        }
        let old_document = self.node_document(node);
        if self.parent(node).is_some() {
            self.detach(node, false);
        }
        if let Some(element) = self.node(node).as_attribute().and_then(|attr| attr.element) {
            self.attribute_remove(node, element);
        }
        if old_document == document {
            return;
        }

        let subtree: Vec<NodeId> = self.inclusive_descendants(node).collect();
        for &n in &subtree {
            self.node_mut(n).owner_document = document;
            let attributes = match self.node(n).as_element() {
                Some(element) => element.attributes.clone(),
                None => continue,
            };
            for attr in attributes {
                self.node_mut(attr).owner_document = document;
            }
        }
        tracing::debug!(
            "Adopted {} node(s) from {:?} into {:?}",
            subtree.len(),
            old_document,
            document
        );
    }

    /// `appendChild`
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> DomResult<NodeId> {
        self.append(node, parent)
    }

    /// `insertBefore`
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.pre_insert(node, parent, child)
    }

    /// `removeChild`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.pre_remove(child, parent)
    }

    /// `replaceChild`: returns the replaced child
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        node: NodeId,
        child: NodeId,
    ) -> DomResult<NodeId> {
        self.replace(child, node, parent)
    }
}
