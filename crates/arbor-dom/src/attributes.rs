//! Element Attributes
//!
//! Attributes are nodes in the arena; an element keeps their ids in
//! insertion order. Keys (namespace, local name) are unique per element and
//! an attribute belongs to at most one element.

use crate::names::is_valid_name;
use crate::namespace::{HTML_NAMESPACE, validate_and_extract};
use crate::{AttrData, DocumentKind, DomError, DomResult, DomTree, NodeData, NodeId};

impl DomTree {
    fn attribute_data(&self, attr: NodeId) -> Option<&AttrData> {
        self.node(attr).as_attribute()
    }

    /// Attribute ids of an element, in order; empty for other nodes
    pub fn attributes(&self, element: NodeId) -> &[NodeId] {
        self.node(element)
            .as_element()
            .map(|e| e.attributes.as_slice())
            .unwrap_or_default()
    }

    pub fn has_attributes(&self, element: NodeId) -> bool {
        !self.attributes(element).is_empty()
    }

    /// HTML elements in HTML documents match attribute and tag names in
    /// lowercase
    pub(crate) fn is_html_element_in_html_document(&self, element: NodeId) -> bool {
        let node = self.node(element);
        let in_html_namespace = node
            .as_element()
            .is_some_and(|e| e.namespace.as_deref() == Some(HTML_NAMESPACE));
        in_html_namespace && self.is_html_document(node.owner_document)
    }

    pub(crate) fn is_html_document(&self, document: NodeId) -> bool {
        self.node(document)
            .as_document()
            .is_some_and(|d| d.kind == DocumentKind::Html)
    }

    fn normalize_attribute_name(&self, element: NodeId, qualified_name: &str) -> String {
        if self.is_html_element_in_html_document(element) {
            qualified_name.to_ascii_lowercase()
        } else {
            qualified_name.to_string()
        }
    }

    /// First attribute whose qualified name matches
    fn find_by_qualified_name(&self, element: NodeId, qualified_name: &str) -> Option<NodeId> {
        let qualified_name = self.normalize_attribute_name(element, qualified_name);
        self.attributes(element).iter().copied().find(|&attr| {
            self.attribute_data(attr)
                .is_some_and(|a| a.qualified_name() == qualified_name)
        })
    }

    fn find_by_namespace(
        &self,
        element: NodeId,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Option<NodeId> {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        self.attributes(element).iter().copied().find(|&attr| {
            self.attribute_data(attr).is_some_and(|a| {
                a.namespace.as_deref() == namespace && a.local_name == local_name
            })
        })
    }

    fn queue_attribute_record(&mut self, attr: NodeId, element: NodeId, old_value: Option<String>) {
        let (local_name, namespace) = match self.attribute_data(attr) {
            Some(a) => (a.local_name.clone(), a.namespace.clone()),
            None => return,
        };
        self.queue_attribute(element, &local_name, namespace.as_deref(), old_value);
    }

    /// `change` an attribute's value
    fn attribute_change(&mut self, attr: NodeId, value: &str) {
        let Some(data) = self.attribute_data(attr) else { return };
        let old_value = data.value.clone();
        if let Some(element) = data.element {
            self.queue_attribute_record(attr, element, Some(old_value));
        }
        if let Some(data) = self.node_mut(attr).as_attribute_mut() {
            data.value = value.to_string();
        }
    }

    /// `append` an attribute to an element
    pub(crate) fn attribute_append(&mut self, attr: NodeId, element: NodeId) {
        self.queue_attribute_record(attr, element, None);
        if let Some(data) = self.node_mut(element).as_element_mut() {
            data.attributes.push(attr);
        }
        if let Some(data) = self.node_mut(attr).as_attribute_mut() {
            data.element = Some(element);
        }
    }

    /// `remove` an attribute from its element
    pub(crate) fn attribute_remove(&mut self, attr: NodeId, element: NodeId) {
        let old_value = self.attribute_data(attr).map(|a| a.value.clone());
        self.queue_attribute_record(attr, element, old_value);
        if let Some(data) = self.node_mut(element).as_element_mut() {
            data.attributes.retain(|&a| a != attr);
        }
        if let Some(data) = self.node_mut(attr).as_attribute_mut() {
            data.element = None;
        }
    }

    /// `replace` `old` with `new` at the same position
    fn attribute_replace(&mut self, old: NodeId, new: NodeId, element: NodeId) {
        let old_value = self.attribute_data(old).map(|a| a.value.clone());
        self.queue_attribute_record(old, element, old_value);
        if let Some(data) = self.node_mut(element).as_element_mut() {
            for slot in data.attributes.iter_mut().filter(|slot| **slot == old) {
                *slot = new;
            }
        }
        if let Some(data) = self.node_mut(new).as_attribute_mut() {
            data.element = Some(element);
        }
        if let Some(data) = self.node_mut(old).as_attribute_mut() {
            data.element = None;
        }
    }

    fn alloc_attribute(
        &mut self,
        document: NodeId,
        namespace: Option<String>,
        prefix: Option<String>,
        local_name: String,
        value: String,
    ) -> NodeId {
        self.alloc(
            document,
            NodeData::Attribute(AttrData { namespace, prefix, local_name, value, element: None }),
        )
    }

    /// `getAttribute(qualifiedName)`
    pub fn get_attribute(&self, element: NodeId, qualified_name: &str) -> Option<&str> {
        let attr = self.find_by_qualified_name(element, qualified_name)?;
        self.attribute_data(attr).map(|a| a.value.as_str())
    }

    /// `getAttributeNS(namespace, localName)`
    pub fn get_attribute_ns(
        &self,
        element: NodeId,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Option<&str> {
        let attr = self.find_by_namespace(element, namespace, local_name)?;
        self.attribute_data(attr).map(|a| a.value.as_str())
    }

    /// `setAttribute(qualifiedName, value)`
    pub fn set_attribute(&mut self, element: NodeId, qualified_name: &str, value: &str) -> DomResult<()> {
        if !is_valid_name(qualified_name) {
            return Err(DomError::InvalidCharacter(qualified_name.to_string()));
        }
        let qualified_name = self.normalize_attribute_name(element, qualified_name);

        match self.find_by_qualified_name(element, &qualified_name) {
            Some(attr) => self.attribute_change(attr, value),
            None => {
                let document = self.node_document(element);
                let attr =
                    self.alloc_attribute(document, None, None, qualified_name, value.to_string());
                self.attribute_append(attr, element);
            }
        }
        Ok(())
    }

    /// `setAttributeNS(namespace, qualifiedName, value)`
    pub fn set_attribute_ns(
        &mut self,
        element: NodeId,
        namespace: Option<&str>,
        qualified_name: &str,
        value: &str,
    ) -> DomResult<()> {
        let name = validate_and_extract(namespace, qualified_name)?;
        self.set_attribute_value(
            element,
            &name.local_name,
            value,
            name.prefix.as_deref(),
            name.namespace.as_deref(),
        );
        Ok(())
    }

    /// `set an attribute value`: change the matching (namespace, local name)
    /// attribute or append a new one
    pub fn set_attribute_value(
        &mut self,
        element: NodeId,
        local_name: &str,
        value: &str,
        prefix: Option<&str>,
        namespace: Option<&str>,
    ) {
        match self.find_by_namespace(element, namespace, local_name) {
            Some(attr) => self.attribute_change(attr, value),
            None => {
                let document = self.node_document(element);
                let attr = self.alloc_attribute(
                    document,
                    namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
                    prefix.map(str::to_string),
                    local_name.to_string(),
                    value.to_string(),
                );
                self.attribute_append(attr, element);
            }
        }
    }

    /// Attribute from markup: first occurrence wins, names are not
    /// validated. Returns false when the name was already present.
    pub fn insert_parsed_attribute(&mut self, element: NodeId, name: &str, value: &str) -> bool {
        if !self.node(element).is_element() || self.find_by_namespace(element, None, name).is_some() {
            return false;
        }
        let document = self.node_document(element);
        let attr = self.alloc_attribute(document, None, None, name.to_string(), value.to_string());
        self.attribute_append(attr, element);
        true
    }

    /// `removeAttribute(qualifiedName)`
    pub fn remove_attribute(&mut self, element: NodeId, qualified_name: &str) -> Option<NodeId> {
        let attr = self.find_by_qualified_name(element, qualified_name)?;
        self.attribute_remove(attr, element);
        Some(attr)
    }

    /// `removeAttributeNS(namespace, localName)`
    pub fn remove_attribute_ns(
        &mut self,
        element: NodeId,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Option<NodeId> {
        let attr = self.find_by_namespace(element, namespace, local_name)?;
        self.attribute_remove(attr, element);
        Some(attr)
    }

    pub fn has_attribute(&self, element: NodeId, qualified_name: &str) -> bool {
        self.find_by_qualified_name(element, qualified_name).is_some()
    }

    pub fn has_attribute_ns(&self, element: NodeId, namespace: Option<&str>, local_name: &str) -> bool {
        self.find_by_namespace(element, namespace, local_name).is_some()
    }

    /// `toggleAttribute(qualifiedName, force)`; returns whether the
    /// attribute is present afterwards
    pub fn toggle_attribute(
        &mut self,
        element: NodeId,
        qualified_name: &str,
        force: Option<bool>,
    ) -> DomResult<bool> {
        if !is_valid_name(qualified_name) {
            return Err(DomError::InvalidCharacter(qualified_name.to_string()));
        }
        let qualified_name = self.normalize_attribute_name(element, qualified_name);

        match self.find_by_qualified_name(element, &qualified_name) {
            None if force == Some(false) => Ok(false),
            None => {
                let document = self.node_document(element);
                let attr = self.alloc_attribute(document, None, None, qualified_name, String::new());
                self.attribute_append(attr, element);
                Ok(true)
            }
            Some(_) if force == Some(true) => Ok(true),
            Some(attr) => {
                self.attribute_remove(attr, element);
                Ok(false)
            }
        }
    }

    pub fn get_attribute_node(&self, element: NodeId, qualified_name: &str) -> Option<NodeId> {
        self.find_by_qualified_name(element, qualified_name)
    }

    pub fn get_attribute_node_ns(
        &self,
        element: NodeId,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Option<NodeId> {
        self.find_by_namespace(element, namespace, local_name)
    }

    /// `setAttributeNode(attr)`: returns the attribute it replaced
    pub fn set_attribute_node(&mut self, element: NodeId, attr: NodeId) -> DomResult<Option<NodeId>> {
        let Some(data) = self.attribute_data(attr) else {
            return Err(DomError::HierarchyRequest("only attributes can be set as attributes"));
        };
        if data.element.is_some_and(|owner| owner != element) {
            return Err(DomError::InUseAttribute("attribute is owned by another element"));
        }
        let (namespace, local_name) = (data.namespace.clone(), data.local_name.clone());

        let old = self.find_by_namespace(element, namespace.as_deref(), &local_name);
        if old == Some(attr) {
            return Ok(Some(attr));
        }

        self.adopt(attr, self.node_document(element));
        match old {
            Some(old) => self.attribute_replace(old, attr, element),
            None => self.attribute_append(attr, element),
        }
        Ok(old)
    }

    /// `removeAttributeNode(attr)`
    pub fn remove_attribute_node(&mut self, element: NodeId, attr: NodeId) -> DomResult<NodeId> {
        if !self.attributes(element).contains(&attr) {
            return Err(DomError::NotFound("attribute is not owned by this element"));
        }
        self.attribute_remove(attr, element);
        Ok(attr)
    }

    /// Qualified names of all attributes, in order
    pub fn attribute_names(&self, element: NodeId) -> Vec<String> {
        self.attributes(element)
            .iter()
            .filter_map(|&attr| self.attribute_data(attr))
            .map(AttrData::qualified_name)
            .collect()
    }

    /// Element an attribute belongs to
    pub fn owner_element(&self, attr: NodeId) -> Option<NodeId> {
        self.attribute_data(attr).and_then(|a| a.element)
    }

    pub fn attr_value(&self, attr: NodeId) -> Option<&str> {
        self.attribute_data(attr).map(|a| a.value.as_str())
    }

    /// Set an attribute node's value, recording the change on its element
    pub fn set_attr_value(&mut self, attr: NodeId, value: &str) {
        self.attribute_change(attr, value);
    }
}
