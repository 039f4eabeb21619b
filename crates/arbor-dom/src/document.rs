//! Documents and node factories
//!
//! `DOMImplementation` and the `Document` factory methods. Every factory
//! binds the new node to a document and leaves it detached.

use url::{Origin, Url};

use crate::custom_elements::{CustomElementState, is_valid_custom_element_name};
use crate::names::{is_valid_name, is_valid_qname};
use crate::namespace::{HTML_NAMESPACE, SVG_NAMESPACE, validate_and_extract};
use crate::{
    AttrData, DocumentData, DocumentKind, DocumentTypeData, DomError, DomResult, DomTree,
    ElementData, NodeData, NodeId,
};

const ABOUT_BLANK: &str = "about:blank";

impl DomTree {
    fn new_document(&mut self, kind: DocumentKind, content_type: &str, origin: Origin) -> NodeId {
        let document = self.alloc_document(NodeData::Document(DocumentData {
            content_type: content_type.to_string(),
            kind,
            url: None,
            origin,
        }));
        tracing::debug!("Created {:?} document {:?} ({})", kind, document, content_type);
        document
    }

    /// Origin new documents inherit: the active document's, else a fresh
    /// opaque one
    fn context_origin(&self) -> Origin {
        self.active_document()
            .and_then(|doc| self.node(doc).as_document())
            .map(|d| d.origin.clone())
            .unwrap_or_else(Origin::new_opaque)
    }

    /// A bare XML document at `about:blank` with an opaque origin
    pub fn create_document(&mut self) -> NodeId {
        self.new_document(DocumentKind::Xml, "application/xml", Origin::new_opaque())
    }

    /// A childless document; parsers build into these
    pub fn create_empty_document(&mut self, kind: DocumentKind, content_type: &str) -> NodeId {
        let origin = self.context_origin();
        self.new_document(kind, content_type, origin)
    }

    /// `createHTMLDocument(title)`: doctype, then `html > [head, body]`
    pub fn create_html_document(&mut self, title: Option<&str>) -> NodeId {
        let origin = self.context_origin();
        let doc = self.new_document(DocumentKind::Html, "text/html", origin);

        let doctype = self.alloc(doc, NodeData::DocumentType(DocumentTypeData {
            name: "html".into(),
            ..Default::default()
        }));
        let html = self.create_an_element(doc, "html", Some(HTML_NAMESPACE), None, None);
        let head = self.create_an_element(doc, "head", Some(HTML_NAMESPACE), None, None);
        self.insert(doctype, doc, None, false);
        self.insert(html, doc, None, false);
        self.insert(head, html, None, false);

        if let Some(title) = title {
            let title_element = self.create_an_element(doc, "title", Some(HTML_NAMESPACE), None, None);
            let text = self.create_text_node(doc, title);
            self.insert(text, title_element, None, false);
            self.insert(title_element, head, None, false);
        }

        let body = self.create_an_element(doc, "body", Some(HTML_NAMESPACE), None, None);
        self.insert(body, html, None, false);
        doc
    }

    /// `createDocument(namespace, qualifiedName, doctype)`: an XML document
    /// with an optional doctype and document element
    pub fn create_xml_document(
        &mut self,
        namespace: Option<&str>,
        qualified_name: &str,
        doctype: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        if let Some(doctype) = doctype {
            if self.node(doctype).as_doctype().is_none() {
                return Err(DomError::HierarchyRequest("doctype argument is not a doctype"));
            }
        }
        let name = if qualified_name.is_empty() {
            None
        } else {
            Some(validate_and_extract(namespace, qualified_name)?)
        };

        let content_type = match namespace {
            Some(HTML_NAMESPACE) => "application/xhtml+xml",
            Some(SVG_NAMESPACE) => "image/svg+xml",
            _ => "application/xml",
        };
        let origin = self.context_origin();
        let doc = self.new_document(DocumentKind::Xml, content_type, origin);

        if let Some(doctype) = doctype {
            self.append(doctype, doc)?;
        }
        if let Some(name) = name {
            let element = self.create_an_element(
                doc,
                &name.local_name,
                name.namespace.as_deref(),
                name.prefix.as_deref(),
                None,
            );
            self.append(element, doc)?;
        }
        Ok(doc)
    }

    /// `create an element`: consults the registry and the resolver (once)
    pub fn create_an_element(
        &mut self,
        document: NodeId,
        local_name: &str,
        namespace: Option<&str>,
        prefix: Option<&str>,
        is: Option<&str>,
    ) -> NodeId {
        let document = self.node_document(document);
        let definition = self.registry().look_up(namespace, local_name, is);
        let (custom_state, is_value) = match definition {
            Some(definition) if definition.is_customized_built_in() => {
                (CustomElementState::Custom, Some(definition.name.clone()))
            }
            Some(_) => (CustomElementState::Custom, None),
            None => {
                let could_be_custom = namespace == Some(HTML_NAMESPACE)
                    && (is_valid_custom_element_name(local_name) || is.is_some());
                let state = if could_be_custom {
                    CustomElementState::Undefined
                } else {
                    CustomElementState::Uncustomized
                };
                (state, is.map(str::to_string))
            }
        };
        let behavior = self.resolver().resolve(local_name, namespace, is);

        self.alloc(document, NodeData::Element(ElementData {
            namespace: namespace.map(str::to_string),
            prefix: prefix.map(str::to_string),
            local_name: local_name.to_string(),
            is_value,
            behavior,
            custom_state,
            attributes: Vec::new(),
            implied_close: false,
        }))
    }

    /// `createElement(localName, { is })`
    pub fn create_element(
        &mut self,
        document: NodeId,
        local_name: &str,
        is: Option<&str>,
    ) -> DomResult<NodeId> {
        if !is_valid_name(local_name) {
            return Err(DomError::InvalidCharacter(local_name.to_string()));
        }
        let document = self.node_document(document);
        let Some(data) = self.node(document).as_document() else {
            return Err(DomError::NotSupported("elements need an owning document".into()));
        };

        let html_document = data.kind == DocumentKind::Html;
        let namespace = (html_document || data.content_type == "application/xhtml+xml")
            .then_some(HTML_NAMESPACE);
        let local_name = if html_document {
            local_name.to_ascii_lowercase()
        } else {
            local_name.to_string()
        };

        Ok(self.create_an_element(document, &local_name, namespace, None, is))
    }

    /// `createElementNS(namespace, qualifiedName, { is })`
    pub fn create_element_ns(
        &mut self,
        document: NodeId,
        namespace: Option<&str>,
        qualified_name: &str,
        is: Option<&str>,
    ) -> DomResult<NodeId> {
        let name = validate_and_extract(namespace, qualified_name)?;
        Ok(self.create_an_element(
            document,
            &name.local_name,
            name.namespace.as_deref(),
            name.prefix.as_deref(),
            is,
        ))
    }

    /// `createAttribute(localName)`
    pub fn create_attribute(&mut self, document: NodeId, local_name: &str) -> DomResult<NodeId> {
        if !is_valid_name(local_name) {
            return Err(DomError::InvalidCharacter(local_name.to_string()));
        }
        let document = self.node_document(document);
        let local_name = if self.is_html_document(document) {
            local_name.to_ascii_lowercase()
        } else {
            local_name.to_string()
        };
        Ok(self.alloc(document, NodeData::Attribute(AttrData {
            namespace: None,
            prefix: None,
            local_name,
            value: String::new(),
            element: None,
        })))
    }

    /// `createAttributeNS(namespace, qualifiedName)`
    pub fn create_attribute_ns(
        &mut self,
        document: NodeId,
        namespace: Option<&str>,
        qualified_name: &str,
    ) -> DomResult<NodeId> {
        let name = validate_and_extract(namespace, qualified_name)?;
        let document = self.node_document(document);
        Ok(self.alloc(document, NodeData::Attribute(AttrData {
            namespace: name.namespace,
            prefix: name.prefix,
            local_name: name.local_name,
            value: String::new(),
            element: None,
        })))
    }

    pub fn create_text_node(&mut self, document: NodeId, data: &str) -> NodeId {
        let document = self.node_document(document);
        self.alloc(document, NodeData::Text(data.to_string()))
    }

    pub fn create_comment(&mut self, document: NodeId, data: &str) -> NodeId {
        let document = self.node_document(document);
        self.alloc(document, NodeData::Comment(data.to_string()))
    }

    /// `createCDATASection(data)`: not available in HTML documents
    pub fn create_cdata_section(&mut self, document: NodeId, data: &str) -> DomResult<NodeId> {
        let document = self.node_document(document);
        if self.is_html_document(document) {
            return Err(DomError::NotSupported("CDATA sections in an HTML document".into()));
        }
        if data.contains("]]>") {
            return Err(DomError::InvalidCharacter(data.to_string()));
        }
        Ok(self.alloc(document, NodeData::CDataSection(data.to_string())))
    }

    /// `createProcessingInstruction(target, data)`
    pub fn create_processing_instruction(
        &mut self,
        document: NodeId,
        target: &str,
        data: &str,
    ) -> DomResult<NodeId> {
        if !is_valid_name(target) {
            return Err(DomError::InvalidCharacter(target.to_string()));
        }
        if data.contains("?>") {
            return Err(DomError::InvalidCharacter(data.to_string()));
        }
        let document = self.node_document(document);
        Ok(self.alloc(document, NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        }))
    }

    pub fn create_document_fragment(&mut self, document: NodeId) -> NodeId {
        let document = self.node_document(document);
        self.alloc(document, NodeData::DocumentFragment)
    }

    /// `createDocumentType(qualifiedName, publicId, systemId)`
    pub fn create_document_type(
        &mut self,
        document: NodeId,
        qualified_name: &str,
        public_id: &str,
        system_id: &str,
    ) -> DomResult<NodeId> {
        if !is_valid_qname(qualified_name) {
            return Err(DomError::InvalidCharacter(qualified_name.to_string()));
        }
        let document = self.node_document(document);
        Ok(self.alloc(document, NodeData::DocumentType(DocumentTypeData {
            name: qualified_name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })))
    }

    /// The document's element child
    pub fn document_element(&self, document: NodeId) -> Option<NodeId> {
        self.children(document).find(|&c| self.node(c).is_element())
    }

    /// The document's doctype child
    pub fn doctype(&self, document: NodeId) -> Option<NodeId> {
        self.children(document).find(|&c| self.node(c).as_doctype().is_some())
    }

    /// Document URL; none for `about:blank`
    pub fn document_url(&self, document: NodeId) -> Option<&Url> {
        self.node(document).as_document().and_then(|d| d.url.as_ref())
    }

    /// `documentURI`
    pub fn document_uri(&self, document: NodeId) -> String {
        self.document_url(document)
            .map_or_else(|| ABOUT_BLANK.to_string(), |url| url.as_str().to_string())
    }

    /// Point the document at `url`; its origin follows
    pub fn set_document_url(&mut self, document: NodeId, url: Url) {
        if let Some(data) = self.node_mut(document).as_document_mut() {
            data.origin = url.origin();
            data.url = Some(url);
        }
    }

    pub fn content_type(&self, document: NodeId) -> Option<&str> {
        self.node(document).as_document().map(|d| d.content_type.as_str())
    }

    pub fn document_kind(&self, document: NodeId) -> Option<DocumentKind> {
        self.node(document).as_document().map(|d| d.kind)
    }

    pub fn origin(&self, document: NodeId) -> Option<&Origin> {
        self.node(document).as_document().map(|d| &d.origin)
    }

    /// `adoptNode(node)`
    pub fn adopt_node(&mut self, document: NodeId, node: NodeId) -> DomResult<NodeId> {
        if self.node(node).is_document() {
            return Err(DomError::NotSupported("documents cannot be adopted".into()));
        }
        let document = self.node_document(document);
        self.adopt(node, document);
        Ok(node)
    }

    /// `importNode(node, deep)`: a clone owned by `document`
    pub fn import_node(&mut self, document: NodeId, node: NodeId, deep: bool) -> DomResult<NodeId> {
        if self.node(node).is_document() {
            return Err(DomError::NotSupported("documents cannot be imported".into()));
        }
        let document = self.node_document(document);
        Ok(self.clone_into(node, Some(document), deep))
    }
}
