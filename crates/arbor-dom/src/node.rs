//! DOM Node
//!
//! One node core (links plus owning document) and a payload enum. Behavior
//! shared between kinds is dispatched on the payload tag or on the node's
//! [`Capabilities`], never through a type hierarchy.

use url::{Origin, Url};

use crate::NodeId;
use crate::custom_elements::CustomElementState;
use crate::elements::ElementBehavior;

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    /// Owning document; a document owns itself
    pub(crate) owner_document: NodeId,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn new(owner_document: NodeId, data: NodeData) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            owner_document,
            data,
        }
    }

    /// Node-specific data
    #[inline]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        self.data.capabilities()
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document(_))
    }

    /// Text or CDATA section
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_) | NodeData::CDataSection(_))
    }

    /// Text but not CDATA section
    #[inline]
    pub fn is_exclusive_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    #[inline]
    pub fn is_character_data(&self) -> bool {
        self.capabilities().contains(Capabilities::CHARACTER_DATA)
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_attribute(&self) -> Option<&AttrData> {
        match &self.data {
            NodeData::Attribute(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn as_attribute_mut(&mut self) -> Option<&mut AttrData> {
        match &mut self.data {
            NodeData::Attribute(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub fn as_document(&self) -> Option<&DocumentData> {
        match &self.data {
            NodeData::Document(d) => Some(d),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn as_document_mut(&mut self) -> Option<&mut DocumentData> {
        match &mut self.data {
            NodeData::Document(d) => Some(d),
            _ => None,
        }
    }

    #[inline]
    pub fn as_doctype(&self) -> Option<&DocumentTypeData> {
        match &self.data {
            NodeData::DocumentType(d) => Some(d),
            _ => None,
        }
    }

    /// Data of a character data node (text, CDATA, comment, processing instruction)
    #[inline]
    pub fn character_data(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(data)
            | NodeData::CDataSection(data)
            | NodeData::Comment(data)
            | NodeData::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn character_data_mut(&mut self) -> Option<&mut String> {
        match &mut self.data {
            NodeData::Text(data)
            | NodeData::CDataSection(data)
            | NodeData::Comment(data)
            | NodeData::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    Document(DocumentData),
    DocumentFragment,
    DocumentType(DocumentTypeData),
    Element(ElementData),
    Attribute(AttrData),
    Text(String),
    CDataSection(String),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Document(_) => NodeType::Document,
            Self::DocumentFragment => NodeType::DocumentFragment,
            Self::DocumentType(_) => NodeType::DocumentType,
            Self::Element(_) => NodeType::Element,
            Self::Attribute(_) => NodeType::Attribute,
            Self::Text(_) => NodeType::Text,
            Self::CDataSection(_) => NodeType::CDataSection,
            Self::Comment(_) => NodeType::Comment,
            Self::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        use Capabilities as C;
        let own = match self {
            Self::Document(_) => C::DOCUMENT.union(C::PARENT_NODE).union(C::NON_ELEMENT_PARENT_NODE),
            Self::DocumentFragment => C::DOCUMENT_FRAGMENT
                .union(C::PARENT_NODE)
                .union(C::NON_ELEMENT_PARENT_NODE),
            Self::DocumentType(_) => C::DOCUMENT_TYPE.union(C::CHILD_NODE),
            Self::Element(_) => C::ELEMENT
                .union(C::PARENT_NODE)
                .union(C::CHILD_NODE)
                .union(C::NON_DOCUMENT_TYPE_CHILD_NODE),
            Self::Attribute(_) => C::ATTR,
            Self::Text(_) => C::CHARACTER_DATA.union(C::TEXT).union(C::LEAF_CHILD),
            Self::CDataSection(_) => C::CHARACTER_DATA
                .union(C::TEXT)
                .union(C::CDATA_SECTION)
                .union(C::LEAF_CHILD),
            Self::Comment(_) => C::CHARACTER_DATA.union(C::COMMENT).union(C::LEAF_CHILD),
            Self::ProcessingInstruction { .. } => C::CHARACTER_DATA
                .union(C::PROCESSING_INSTRUCTION)
                .union(C::LEAF_CHILD),
        };
        C::NODE.union(own)
    }
}

/// Document kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Xml,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentData {
    pub content_type: String,
    pub kind: DocumentKind,
    /// `None` is `about:blank`
    pub url: Option<Url>,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentTypeData {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub local_name: String,
    /// Customized built-in `is` value
    pub is_value: Option<String>,
    /// Behavior picked by the element resolver at creation
    pub behavior: ElementBehavior,
    pub custom_state: CustomElementState,
    /// Attribute nodes in insertion order
    pub attributes: Vec<NodeId>,
    /// Set when the element was closed implicitly during tree construction
    pub implied_close: bool,
}

impl ElementData {
    /// `prefix:localName`, or just the local name
    pub fn qualified_name(&self) -> String {
        qualified(self.prefix.as_deref(), &self.local_name)
    }
}

/// Attribute-specific data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrData {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub local_name: String,
    pub value: String,
    /// Owning element
    pub element: Option<NodeId>,
}

impl AttrData {
    pub fn qualified_name(&self) -> String {
        qualified(self.prefix.as_deref(), &self.local_name)
    }
}

fn qualified(prefix: Option<&str>, local_name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{local_name}"),
        None => local_name.to_string(),
    }
}

/// Node type enumeration, with the DOM numeric codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Element = 1,
    Attribute = 2,
    Text = 3,
    CDataSection = 4,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
}

impl NodeType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            2 => Some(NodeType::Attribute),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CDataSection),
            7 => Some(NodeType::ProcessingInstruction),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            10 => Some(NodeType::DocumentType),
            11 => Some(NodeType::DocumentFragment),
            _ => None,
        }
    }

    pub fn to_u32(self) -> u32 {
        self as u32
    }
}

/// Capability set of a node: its variant plus the cross-cutting mixins
/// (ParentNode, ChildNode, CharacterData, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities(u16);

impl Capabilities {
    pub const NODE: Capabilities = Capabilities(1 << 0);
    pub const DOCUMENT: Capabilities = Capabilities(1 << 1);
    pub const DOCUMENT_FRAGMENT: Capabilities = Capabilities(1 << 2);
    pub const DOCUMENT_TYPE: Capabilities = Capabilities(1 << 3);
    pub const ELEMENT: Capabilities = Capabilities(1 << 4);
    pub const ATTR: Capabilities = Capabilities(1 << 5);
    pub const CHARACTER_DATA: Capabilities = Capabilities(1 << 6);
    pub const TEXT: Capabilities = Capabilities(1 << 7);
    pub const CDATA_SECTION: Capabilities = Capabilities(1 << 8);
    pub const COMMENT: Capabilities = Capabilities(1 << 9);
    pub const PROCESSING_INSTRUCTION: Capabilities = Capabilities(1 << 10);
    pub const PARENT_NODE: Capabilities = Capabilities(1 << 11);
    pub const CHILD_NODE: Capabilities = Capabilities(1 << 12);
    pub const NON_DOCUMENT_TYPE_CHILD_NODE: Capabilities = Capabilities(1 << 13);
    pub const NON_ELEMENT_PARENT_NODE: Capabilities = Capabilities(1 << 14);

    const LEAF_CHILD: Capabilities =
        Capabilities(Self::CHILD_NODE.0 | Self::NON_DOCUMENT_TYPE_CHILD_NODE.0);

    #[inline]
    pub const fn union(self, other: Capabilities) -> Capabilities {
        Capabilities(self.0 | other.0)
    }

    /// True when every capability in `other` is present
    #[inline]
    pub const fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn intersects(self, other: Capabilities) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }
}
