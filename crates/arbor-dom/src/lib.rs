//! Arbor DOM - Document Object Model
//!
//! Arena-backed document tree. Every node lives in a [`DomTree`] and is
//! addressed by a [`NodeId`]; the tree owns the element resolver, the custom
//! element registry and the mutation record queue, so one `DomTree` is the
//! whole context a set of documents needs.
//!
//! Structural changes go through the mutation engine, which runs the
//! hierarchy validator before touching any link. An error therefore leaves
//! the tree exactly as it was.

mod attributes;
mod child_node;
mod clone;
mod custom_elements;
mod document;
mod element;
mod elements;
mod equality;
mod error;
mod names;
mod namespace;
mod node;
mod observer;
mod operations;
mod parent_node;
mod text;
mod traverse;
mod tree;
mod validate;
mod walker;

pub use child_node::NodeOrText;
pub use custom_elements::{
    CustomElementDefinition, CustomElementOptions, CustomElementRegistry, CustomElementState,
    is_valid_custom_element_name,
};
pub use elements::{ElementBehavior, ElementResolver, HtmlCatalog, HtmlElementKind};
pub use error::{DomError, DomResult};
pub use names::{is_valid_name, is_valid_ncname, is_valid_qname};
pub use namespace::{
    ExtractedName, HTML_NAMESPACE, MATHML_NAMESPACE, SVG_NAMESPACE, XML_NAMESPACE,
    XMLNS_NAMESPACE, validate_and_extract,
};
pub use node::{
    AttrData, Capabilities, DocumentData, DocumentKind, DocumentTypeData, ElementData, Node,
    NodeData, NodeType,
};
pub use observer::{MutationRecord, MutationType};
pub use traverse::{Ancestors, Children, DocumentPosition, Following, Preceding, Siblings};
pub use tree::DomTree;
pub use walker::{FilterResult, NodeFilter, TreeWalker, WhatToShow};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in its tree's arena
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
