//! DOM exceptions
//!
//! One variant per DOMException name the engine can raise. Messages are
//! prefixed with that name so a formatted error reads like the exception a
//! script would observe.

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Structurally invalid placement
    #[error("HierarchyRequestError: {0}")]
    HierarchyRequest(&'static str),

    /// A reference node does not belong to the stated parent
    #[error("NotFoundError: {0}")]
    NotFound(&'static str),

    /// A name fails lexical validation
    #[error("InvalidCharacterError: {0:?} is not a valid name")]
    InvalidCharacter(String),

    /// Reserved prefix rules violated, or a prefix without a namespace
    #[error("NamespaceError: {0}")]
    Namespace(String),

    /// Reentrant use of an active walker filter
    #[error("InvalidStateError: {0}")]
    InvalidState(&'static str),

    /// Disallowed operation for this kind of node or document
    #[error("NotSupportedError: {0}")]
    NotSupported(String),

    /// Character data offset past the end of the data
    #[error("IndexSizeError: {0}")]
    IndexSize(&'static str),

    /// Attribute already belongs to another element
    #[error("InUseAttributeError: {0}")]
    InUseAttribute(&'static str),

    /// Invalid custom element name
    #[error("SyntaxError: {0}")]
    Syntax(String),
}

impl DomError {
    /// The DOMException name for this error
    pub fn name(&self) -> &'static str {
        match self {
            Self::HierarchyRequest(_) => "HierarchyRequestError",
            Self::NotFound(_) => "NotFoundError",
            Self::InvalidCharacter(_) => "InvalidCharacterError",
            Self::Namespace(_) => "NamespaceError",
            Self::InvalidState(_) => "InvalidStateError",
            Self::NotSupported(_) => "NotSupportedError",
            Self::IndexSize(_) => "IndexSizeError",
            Self::InUseAttribute(_) => "InUseAttributeError",
            Self::Syntax(_) => "SyntaxError",
        }
    }
}
