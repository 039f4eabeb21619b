//! Hierarchy validation
//!
//! Pre-conditions checked before any structural change. Nothing here mutates
//! the tree, so a failed check leaves it untouched.

use crate::{Capabilities, DomError, DomResult, DomTree, NodeId};

impl DomTree {
    fn has(&self, node: NodeId, capability: Capabilities) -> bool {
        self.node(node).capabilities().contains(capability)
    }

    /// Checks shared by insertion and replacement, in order: parent kind,
    /// cycles, reference child ownership, node kind, doctype placement
    fn ensure_common_validity(
        &self,
        node: NodeId,
        parent: NodeId,
        child: Option<NodeId>,
    ) -> DomResult<()> {
        if !self.has(parent, Capabilities::PARENT_NODE) {
            return Err(DomError::HierarchyRequest(
                "can only insert into a document, document fragment or element",
            ));
        }

        if self.is_inclusive_ancestor(node, parent) {
            return Err(DomError::HierarchyRequest(
                "cannot insert an ancestor into its descendant",
            ));
        }

        if let Some(child) = child {
            if self.parent(child) != Some(parent) {
                return Err(DomError::NotFound("reference child is not a child of parent"));
            }
        }

        let capabilities = self.node(node).capabilities();
        let insertable = Capabilities::DOCUMENT_FRAGMENT
            .union(Capabilities::DOCUMENT_TYPE)
            .union(Capabilities::ELEMENT)
            .union(Capabilities::CHARACTER_DATA);
        if !capabilities.intersects(insertable) {
            return Err(DomError::HierarchyRequest("cannot insert attributes or documents"));
        }

        if capabilities.contains(Capabilities::DOCUMENT_TYPE)
            && !self.has(parent, Capabilities::DOCUMENT)
        {
            return Err(DomError::HierarchyRequest(
                "a doctype can only be inserted into a document",
            ));
        }

        Ok(())
    }

    /// `ensure pre-insertion validity` of `node` into `parent` before `child`
    pub fn ensure_pre_insertion_validity(
        &self,
        node: NodeId,
        parent: NodeId,
        child: Option<NodeId>,
    ) -> DomResult<()> {
        self.ensure_common_validity(node, parent, child)?;
        if self.node(parent).is_document() {
            self.ensure_document_placement(node, parent, child, None)?;
        }
        Ok(())
    }

    /// Validation for replacing `child` of `parent` with `node`; `child` is
    /// excluded from the document placement scan
    pub fn ensure_replacement_validity(
        &self,
        child: NodeId,
        node: NodeId,
        parent: NodeId,
    ) -> DomResult<()> {
        self.ensure_common_validity(node, parent, Some(child))?;
        if self.node(parent).is_document() {
            let reference = self.next_sibling(child);
            self.ensure_document_placement(node, parent, reference, Some(child))?;
        }
        Ok(())
    }

    /// Document child cardinality: at most one doctype, at most one element,
    /// doctype before element. `node` would land before `reference`;
    /// `replaced` is ignored wherever the document's children are scanned.
    fn ensure_document_placement(
        &self,
        node: NodeId,
        document: NodeId,
        reference: Option<NodeId>,
        replaced: Option<NodeId>,
    ) -> DomResult<()> {
        let others = || self.children(document).filter(move |c| Some(*c) != replaced);
        let has_element_child = others().any(|c| self.node(c).is_element());
        let doctype_at_or_after_reference = reference.is_some_and(|reference| {
            self.following_siblings(reference)
                .chain(std::iter::once(reference))
                .any(|c| Some(c) != replaced && self.node(c).as_doctype().is_some())
        });

        let data = self.node(node);
        if data.capabilities().contains(Capabilities::DOCUMENT_FRAGMENT) {
            let elements = self.children(node).filter(|c| self.node(*c).is_element()).count();
            if elements > 1 {
                return Err(DomError::HierarchyRequest(
                    "a document can only have one element child",
                ));
            }
            if elements == 1 {
                if has_element_child {
                    return Err(DomError::HierarchyRequest(
                        "a document can only have one element child",
                    ));
                }
                if doctype_at_or_after_reference {
                    return Err(DomError::HierarchyRequest(
                        "cannot insert an element before a doctype",
                    ));
                }
            }
        } else if data.is_element() {
            if has_element_child {
                return Err(DomError::HierarchyRequest(
                    "a document can only have one element child",
                ));
            }
            if doctype_at_or_after_reference {
                return Err(DomError::HierarchyRequest(
                    "cannot insert an element before a doctype",
                ));
            }
        } else if data.as_doctype().is_some() {
            if others().any(|c| self.node(c).as_doctype().is_some()) {
                return Err(DomError::HierarchyRequest(
                    "cannot insert multiple doctypes into a document",
                ));
            }
            let element_before_reference = match reference {
                Some(reference) => self
                    .preceding_siblings(reference)
                    .any(|c| Some(c) != replaced && self.node(c).is_element()),
                None => has_element_child,
            };
            if element_before_reference {
                return Err(DomError::HierarchyRequest(
                    "cannot insert a doctype after an element",
                ));
            }
        }

        Ok(())
    }
}
