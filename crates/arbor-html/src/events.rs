//! Tokenizer events
//!
//! The stream a tokenizer hands to [`crate::TreeBuilder`]. Any tokenizer
//! can drive tree construction as long as it produces these.

use serde::{Deserialize, Serialize};

/// How an attribute value was quoted in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteStyle {
    Single,
    Double,
    Unquoted,
}

/// One tokenizer event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEvent {
    /// Start tag; its attributes follow as separate events
    OpenTag { name: String },
    /// Attribute of the most recently opened element
    Attribute {
        name: String,
        value: String,
        /// `None` when the tokenizer does not report quoting
        quote: Option<QuoteStyle>,
    },
    Text(String),
    /// End tag; `implied` when the source never spelled it out
    CloseTag { name: String, implied: bool },
    ProcessingInstruction { target: String, data: String },
    Comment(String),
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Unrecoverable tokenizer failure
    Error(String),
}
