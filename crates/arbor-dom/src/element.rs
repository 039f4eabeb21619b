//! Element accessors and queries
//!
//! Name accessors, `id`/`className` reflection and the
//! `getElementBy*`/`getElementsBy*` family. Queries walk the subtree in tree
//! order and return snapshots.

use std::collections::HashSet;

use crate::namespace::HTML_NAMESPACE;
use crate::{DomResult, DomTree, NodeData, NodeId};

impl DomTree {
    /// `nodeName`
    pub fn node_name(&self, node: NodeId) -> String {
        match &self.node(node).data {
            NodeData::Element(_) => self.tag_name(node).unwrap_or_default(),
            NodeData::Attribute(attr) => attr.qualified_name(),
            NodeData::Text(_) => "#text".into(),
            NodeData::CDataSection(_) => "#cdata-section".into(),
            NodeData::ProcessingInstruction { target, .. } => target.clone(),
            NodeData::Comment(_) => "#comment".into(),
            NodeData::Document(_) => "#document".into(),
            NodeData::DocumentType(doctype) => doctype.name.clone(),
            NodeData::DocumentFragment => "#document-fragment".into(),
        }
    }

    /// `tagName`: the qualified name, uppercased for HTML elements in HTML
    /// documents
    pub fn tag_name(&self, element: NodeId) -> Option<String> {
        let name = self.node(element).as_element()?.qualified_name();
        if self.is_html_element_in_html_document(element) {
            Some(name.to_ascii_uppercase())
        } else {
            Some(name)
        }
    }

    /// Qualified name of an element or attribute
    pub fn qualified_name(&self, node: NodeId) -> Option<String> {
        let node = self.node(node);
        node.as_element()
            .map(|e| e.qualified_name())
            .or_else(|| node.as_attribute().map(|a| a.qualified_name()))
    }

    /// Local name of an element or attribute
    pub fn local_name(&self, node: NodeId) -> Option<&str> {
        let node = self.node(node);
        node.as_element()
            .map(|e| e.local_name.as_str())
            .or_else(|| node.as_attribute().map(|a| a.local_name.as_str()))
    }

    /// Namespace of an element or attribute
    pub fn namespace_uri(&self, node: NodeId) -> Option<&str> {
        let node = self.node(node);
        match &node.data {
            NodeData::Element(e) => e.namespace.as_deref(),
            NodeData::Attribute(a) => a.namespace.as_deref(),
            _ => None,
        }
    }

    pub fn prefix(&self, node: NodeId) -> Option<&str> {
        let node = self.node(node);
        match &node.data {
            NodeData::Element(e) => e.prefix.as_deref(),
            NodeData::Attribute(a) => a.prefix.as_deref(),
            _ => None,
        }
    }

    /// `id` attribute, empty when absent
    pub fn id(&self, element: NodeId) -> &str {
        self.get_attribute(element, "id").unwrap_or_default()
    }

    pub fn set_id(&mut self, element: NodeId, id: &str) -> DomResult<()> {
        self.set_attribute(element, "id", id)
    }

    /// `class` attribute, empty when absent
    pub fn class_name(&self, element: NodeId) -> &str {
        self.get_attribute(element, "class").unwrap_or_default()
    }

    pub fn set_class_name(&mut self, element: NodeId, class_name: &str) -> DomResult<()> {
        self.set_attribute(element, "class", class_name)
    }

    /// Customized built-in name the element was created with
    pub fn is_value(&self, element: NodeId) -> Option<&str> {
        self.node(element).as_element()?.is_value.as_deref()
    }

    /// Whether the element's end tag was implied rather than written
    pub fn has_implied_close_tag(&self, element: NodeId) -> bool {
        self.node(element).as_element().is_some_and(|e| e.implied_close)
    }

    pub fn set_implied_close_tag(&mut self, element: NodeId, implied: bool) {
        if let Some(data) = self.node_mut(element).as_element_mut() {
            data.implied_close = implied;
        }
    }

    fn descendant_elements(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(root).filter(|&n| self.node(n).is_element())
    }

    /// `getElementById`: first descendant element with a matching `id`
    pub fn get_element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.descendant_elements(root)
            .find(|&el| self.get_attribute(el, "id") == Some(id))
    }

    /// `getElementsByTagName(qualifiedName)`; `*` matches every element
    pub fn get_elements_by_tag_name(&self, root: NodeId, qualified_name: &str) -> Vec<NodeId> {
        if qualified_name == "*" {
            return self.descendant_elements(root).collect();
        }
        let html_document = self.is_html_document(self.node_document(root));
        let lowered = qualified_name.to_ascii_lowercase();

        self.descendant_elements(root)
            .filter(|&el| {
                let Some(data) = self.node(el).as_element() else {
                    return false;
                };
                let name = data.qualified_name();
                if html_document && data.namespace.as_deref() == Some(HTML_NAMESPACE) {
                    name == lowered
                } else {
                    name == qualified_name
                }
            })
            .collect()
    }

    /// `getElementsByTagNameNS(namespace, localName)`; `*` is a wildcard in
    /// either position
    pub fn get_elements_by_tag_name_ns(
        &self,
        root: NodeId,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Vec<NodeId> {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        self.descendant_elements(root)
            .filter(|&el| {
                let Some(data) = self.node(el).as_element() else {
                    return false;
                };
                let namespace_matches =
                    namespace == Some("*") || data.namespace.as_deref() == namespace;
                let local_matches = local_name == "*" || data.local_name == local_name;
                namespace_matches && local_matches
            })
            .collect()
    }

    /// `getElementsByClassName(classNames)`: elements carrying every class
    /// in the whitespace-separated list
    pub fn get_elements_by_class_name(&self, root: NodeId, class_names: &str) -> Vec<NodeId> {
        let wanted: HashSet<&str> = class_names.split_ascii_whitespace().collect();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.descendant_elements(root)
            .filter(|&el| {
                let classes: HashSet<&str> = self.class_name(el).split_ascii_whitespace().collect();
                wanted.is_subset(&classes)
            })
            .collect()
    }
}
