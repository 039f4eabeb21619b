//! Namespaces
//!
//! Qualified name validation and prefix/namespace lookup. Lookups walk the
//! element and its ancestors, consulting both the element's own
//! namespace/prefix and its `xmlns` declarations.

use crate::names::{is_valid_name, is_valid_qname};
use crate::{DomError, DomResult, DomTree, NodeData, NodeId};

pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Result of [`validate_and_extract`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedName {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub local_name: String,
}

/// Validate `qualified_name` against `namespace` and split it
///
/// An empty namespace is treated as none.
pub fn validate_and_extract(
    namespace: Option<&str>,
    qualified_name: &str,
) -> DomResult<ExtractedName> {
    let namespace = namespace.filter(|ns| !ns.is_empty());

    if !is_valid_qname(qualified_name) {
        // Names like "a:b:c" are still Names, but never qualified names
        return Err(if is_valid_name(qualified_name) {
            DomError::Namespace(format!("{qualified_name:?} is not a qualified name"))
        } else {
            DomError::InvalidCharacter(qualified_name.to_string())
        });
    }

    let (prefix, local_name) = match qualified_name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qualified_name),
    };

    if prefix.is_some() && namespace.is_none() {
        return Err(DomError::Namespace(format!(
            "prefix of {qualified_name:?} requires a namespace"
        )));
    }
    if prefix == Some("xml") && namespace != Some(XML_NAMESPACE) {
        return Err(DomError::Namespace("the xml prefix is bound to the XML namespace".into()));
    }
    let is_xmlns = qualified_name == "xmlns" || prefix == Some("xmlns");
    if is_xmlns && namespace != Some(XMLNS_NAMESPACE) {
        return Err(DomError::Namespace("xmlns is bound to the XMLNS namespace".into()));
    }
    if namespace == Some(XMLNS_NAMESPACE) && !is_xmlns {
        return Err(DomError::Namespace(
            "the XMLNS namespace requires the xmlns prefix or name".into(),
        ));
    }

    Ok(ExtractedName {
        namespace: namespace.map(str::to_string),
        prefix: prefix.map(str::to_string),
        local_name: local_name.to_string(),
    })
}

/// Where a namespace lookup continues for a given node
enum LookupTarget {
    Element(NodeId),
    None,
}

impl DomTree {
    fn lookup_target(&self, node: NodeId) -> LookupTarget {
        let found = match &self.node(node).data {
            NodeData::Element(_) => Some(node),
            NodeData::Document(_) => self.document_element(node),
            NodeData::DocumentType(_) | NodeData::DocumentFragment => None,
            NodeData::Attribute(attr) => attr.element,
            _ => self.parent_element(node),
        };
        found.map_or(LookupTarget::None, LookupTarget::Element)
    }

    /// Namespace bound to `prefix` at `node`
    pub fn locate_namespace(&self, node: NodeId, prefix: Option<&str>) -> Option<String> {
        let LookupTarget::Element(mut element) = self.lookup_target(node) else {
            return None;
        };

        loop {
            let data = self.node(element).as_element()?;
            if data.namespace.is_some() && data.prefix.as_deref() == prefix {
                return data.namespace.clone();
            }

            for &attr in &data.attributes {
                let Some(attr) = self.node(attr).as_attribute() else { continue };
                if attr.namespace.as_deref() != Some(XMLNS_NAMESPACE) {
                    continue;
                }
                let declares = match prefix {
                    Some(prefix) => {
                        attr.prefix.as_deref() == Some("xmlns") && attr.local_name == prefix
                    }
                    None => attr.prefix.is_none() && attr.local_name == "xmlns",
                };
                if declares {
                    return Some(attr.value.clone()).filter(|value| !value.is_empty());
                }
            }

            element = self.parent_element(element)?;
        }
    }

    /// Prefix bound to `namespace` at `element` or one of its ancestors
    pub fn locate_namespace_prefix(&self, element: NodeId, namespace: &str) -> Option<String> {
        let mut current = element;
        loop {
            let data = self.node(current).as_element()?;
            if data.namespace.as_deref() == Some(namespace) && data.prefix.is_some() {
                return data.prefix.clone();
            }

            for &attr in &data.attributes {
                let Some(attr) = self.node(attr).as_attribute() else { continue };
                if attr.prefix.as_deref() == Some("xmlns") && attr.value == namespace {
                    return Some(attr.local_name.clone());
                }
            }

            current = self.parent_element(current)?;
        }
    }

    /// `lookupPrefix(namespace)`
    pub fn lookup_prefix(&self, node: NodeId, namespace: Option<&str>) -> Option<String> {
        let namespace = namespace.filter(|ns| !ns.is_empty())?;
        match self.lookup_target(node) {
            LookupTarget::Element(element) => self.locate_namespace_prefix(element, namespace),
            LookupTarget::None => None,
        }
    }

    /// `lookupNamespaceURI(prefix)`
    pub fn lookup_namespace_uri(&self, node: NodeId, prefix: Option<&str>) -> Option<String> {
        let prefix = prefix.filter(|p| !p.is_empty());
        self.locate_namespace(node, prefix)
    }

    /// `isDefaultNamespace(namespace)`
    pub fn is_default_namespace(&self, node: NodeId, namespace: Option<&str>) -> bool {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        self.locate_namespace(node, None).as_deref() == namespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_and_prefixed() {
        let plain = validate_and_extract(None, "div").unwrap();
        assert_eq!(plain.namespace, None);
        assert_eq!(plain.prefix, None);
        assert_eq!(plain.local_name, "div");

        let svg = validate_and_extract(Some(SVG_NAMESPACE), "svg:rect").unwrap();
        assert_eq!(svg.prefix.as_deref(), Some("svg"));
        assert_eq!(svg.local_name, "rect");
    }

    #[test]
    fn test_prefix_without_namespace() {
        let err = validate_and_extract(None, "ns:tag").unwrap_err();
        assert_eq!(err.name(), "NamespaceError");

        let err = validate_and_extract(Some(""), "ns:tag").unwrap_err();
        assert_eq!(err.name(), "NamespaceError");
    }

    #[test]
    fn test_reserved_prefixes() {
        assert!(validate_and_extract(Some(XML_NAMESPACE), "xml:lang").is_ok());
        assert!(validate_and_extract(Some(HTML_NAMESPACE), "xml:lang").is_err());
        assert!(validate_and_extract(Some(XMLNS_NAMESPACE), "xmlns").is_ok());
        assert!(validate_and_extract(Some(XMLNS_NAMESPACE), "xmlns:svg").is_ok());
        assert!(validate_and_extract(Some(HTML_NAMESPACE), "xmlns").is_err());
        assert!(validate_and_extract(Some(XMLNS_NAMESPACE), "foo").is_err());
    }

    #[test]
    fn test_invalid_names() {
        let err = validate_and_extract(None, "1tag").unwrap_err();
        assert_eq!(err.name(), "InvalidCharacterError");
        let err = validate_and_extract(Some(HTML_NAMESPACE), "a:b:c").unwrap_err();
        assert_eq!(err.name(), "NamespaceError");
    }

    #[test]
    fn test_lookup_through_ancestors() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let root = tree.create_element_ns(doc, Some(SVG_NAMESPACE), "svg:svg", None).unwrap();
        tree.append_child(doc, root).unwrap();
        tree.set_attribute_ns(root, Some(XMLNS_NAMESPACE), "xmlns:m", MATHML_NAMESPACE).unwrap();
        tree.set_attribute_ns(root, Some(XMLNS_NAMESPACE), "xmlns", HTML_NAMESPACE).unwrap();
        let child = tree.create_element(doc, "g", None).unwrap();
        tree.append_child(root, child).unwrap();
        let text = tree.create_text_node(doc, "t");
        tree.append_child(child, text).unwrap();

        assert_eq!(tree.lookup_namespace_uri(text, Some("svg")).as_deref(), Some(SVG_NAMESPACE));
        assert_eq!(tree.lookup_namespace_uri(child, Some("m")).as_deref(), Some(MATHML_NAMESPACE));
        assert_eq!(tree.lookup_namespace_uri(child, None).as_deref(), Some(HTML_NAMESPACE));
        assert!(tree.is_default_namespace(doc, Some(HTML_NAMESPACE)));
        assert_eq!(tree.lookup_prefix(child, Some(MATHML_NAMESPACE)).as_deref(), Some("m"));
        assert_eq!(tree.lookup_prefix(child, Some(SVG_NAMESPACE)).as_deref(), Some("svg"));
        assert_eq!(tree.lookup_prefix(child, Some("urn:none")), None);
        assert_eq!(tree.lookup_prefix(child, Some("")), None);
    }

    #[test]
    fn test_empty_declaration_unbinds() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let outer = tree.create_element_ns(doc, Some("urn:a"), "a:outer", None).unwrap();
        let inner = tree.create_element(doc, "inner", None).unwrap();
        tree.append_child(outer, inner).unwrap();
        tree.set_attribute_ns(inner, Some(XMLNS_NAMESPACE), "xmlns:a", "").unwrap();

        assert_eq!(tree.lookup_namespace_uri(outer, Some("a")).as_deref(), Some("urn:a"));
        assert_eq!(tree.lookup_namespace_uri(inner, Some("a")), None);

        let fragment = tree.create_document_fragment(doc);
        assert_eq!(tree.lookup_namespace_uri(fragment, Some("a")), None);
    }
}
