//! Arbor HTML - markup to document trees
//!
//! html5ever's tokenizer produces a [`TokenEvent`] stream and
//! [`TreeBuilder`] turns it into nodes of an [`arbor_dom::DomTree`] through
//! the regular factories and mutation operations, so every structural rule
//! of the tree also holds for parsed markup.

mod builder;
mod events;
mod tokenizer;

use arbor_dom::{DocumentKind, DomError, DomTree, NodeId};
use serde::{Deserialize, Serialize};
use url::Url;

pub use builder::TreeBuilder;
pub use events::{QuoteStyle, TokenEvent};
pub use tokenizer::HtmlTokenizer;

/// Parse an HTML string into a new document
///
/// A document holds one element child, so a second top-level element aborts
/// with [`ParseError::Dom`]. A misplaced doctype is only a diagnostic. Use
/// [`HtmlParser::parse_fragment`] for markup with several top-level elements.
pub fn parse(html: &str) -> Result<ParsedDocument, ParseError> {
    HtmlParser::new().parse(html)
}

pub fn parse_with_options(html: &str, options: &ParseOptions) -> Result<ParsedDocument, ParseError> {
    HtmlParser::with_options(options.clone()).parse(html)
}

/// Parser configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Lowercase element names before creating elements
    pub lower_case_tags: bool,
    /// Lowercase attribute names before inserting them
    pub lower_case_attribute_names: bool,
    /// URL of the parsed document; `about:blank` when unset
    pub document_url: Option<String>,
    /// Ask the tokenizer for detailed error messages
    pub exact_errors: bool,
    /// Tokenizer errors and unbalanced close tags abort the parse
    pub strict: bool,
}

/// A parsed document and the tree that owns it
#[derive(Debug)]
pub struct ParsedDocument {
    pub tree: DomTree,
    pub document: NodeId,
    /// Recoverable problems, in the order they were found
    pub diagnostics: Vec<String>,
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Close tag </{0}> matches no open element")]
    UnbalancedCloseTag(String),

    #[error("Tree construction was aborted by an earlier error")]
    Aborted,

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("Invalid document URL: {0}")]
    Url(#[from] url::ParseError),
}

/// HTML parser
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    options: ParseOptions,
}

impl HtmlParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse into a fresh `text/html` document
    ///
    /// Fails with a HierarchyRequestError on a second top-level element.
    pub fn parse(&self, html: &str) -> Result<ParsedDocument, ParseError> {
        let url = self.options.document_url.as_deref().map(Url::parse).transpose()?;
        tracing::debug!(
            "Parsing HTML document: {}",
            url.as_ref().map_or("about:blank", Url::as_str)
        );

        let mut tree = DomTree::new();
        let document = tree.create_empty_document(DocumentKind::Html, "text/html");
        if let Some(url) = url {
            tree.set_document_url(document, url);
        }
        let diagnostics = self.parse_into(&mut tree, document, html)?;

        tracing::debug!("Parsed {} nodes ({} diagnostics)", tree.len(), diagnostics.len());
        Ok(ParsedDocument { tree, document, diagnostics })
    }

    /// Parse below `root` in an existing tree
    ///
    /// On error the nodes built so far stay in place.
    pub fn parse_into(
        &self,
        tree: &mut DomTree,
        root: NodeId,
        html: &str,
    ) -> Result<Vec<String>, ParseError> {
        let (events, mut diagnostics) = HtmlTokenizer::new(&self.options).tokenize(html);
        let mut builder = TreeBuilder::with_options(tree, root, &self.options);
        for event in events {
            builder.process(event)?;
        }
        let (_, built) = builder.finish()?;
        diagnostics.extend(built);
        Ok(diagnostics)
    }

    /// Parse into a new fragment owned by `document`
    pub fn parse_fragment(
        &self,
        tree: &mut DomTree,
        document: NodeId,
        html: &str,
    ) -> Result<NodeId, ParseError> {
        let fragment = tree.create_document_fragment(document);
        self.parse_into(tree, fragment, html)?;
        Ok(fragment)
    }
}
