//! Tree construction
//!
//! Applies [`TokenEvent`]s to a [`DomTree`] below a root node (a document,
//! fragment or element). Open elements are kept on a stack; a close tag pops
//! back to the nearest open element with the same name.
//!
//! The first error poisons the builder: every later event, and `finish`,
//! report [`ParseError::Aborted`].

use arbor_dom::{DomTree, HTML_NAMESPACE, NodeId};

use crate::{ParseError, ParseOptions, TokenEvent};

/// Consumer of a tokenizer event stream
pub struct TreeBuilder<'a> {
    tree: &'a mut DomTree,
    root: NodeId,
    document: NodeId,
    open_elements: Vec<NodeId>,
    lower_case_tags: bool,
    lower_case_attribute_names: bool,
    strict: bool,
    diagnostics: Vec<String>,
    poisoned: bool,
}

impl<'a> TreeBuilder<'a> {
    /// Build below `root` with default options
    pub fn new(tree: &'a mut DomTree, root: NodeId) -> Self {
        Self::with_options(tree, root, &ParseOptions::default())
    }

    pub fn with_options(tree: &'a mut DomTree, root: NodeId, options: &ParseOptions) -> Self {
        let document = tree.node_document(root);
        Self {
            tree,
            root,
            document,
            open_elements: Vec::new(),
            lower_case_tags: options.lower_case_tags,
            lower_case_attribute_names: options.lower_case_attribute_names,
            strict: options.strict,
            diagnostics: Vec::new(),
            poisoned: false,
        }
    }

    /// Node that receives new children
    fn current(&self) -> NodeId {
        self.open_elements.last().copied().unwrap_or(self.root)
    }

    fn tag_name(&self, name: String) -> String {
        if self.lower_case_tags { name.to_ascii_lowercase() } else { name }
    }

    /// Apply one event
    pub fn process(&mut self, event: TokenEvent) -> Result<(), ParseError> {
        if self.poisoned {
            return Err(ParseError::Aborted);
        }
        let result = self.apply(event);
        if let Err(err) = &result {
            tracing::warn!("Tree construction aborted: {}", err);
            self.poisoned = true;
        }
        result
    }

    fn apply(&mut self, event: TokenEvent) -> Result<(), ParseError> {
        match event {
            TokenEvent::OpenTag { name } => {
                let name = self.tag_name(name);
                let parent = self.current();
                let element = self.tree.create_an_element(
                    self.document,
                    &name,
                    Some(HTML_NAMESPACE),
                    None,
                    None,
                );
                self.tree.append(element, parent)?;
                self.open_elements.push(element);
            }
            TokenEvent::Attribute { name, value, .. } => self.attribute(name, &value),
            TokenEvent::Text(data) => {
                let text = self.tree.create_text_node(self.document, &data);
                let parent = self.current();
                self.tree.append(text, parent)?;
            }
            TokenEvent::CloseTag { name, implied } => self.close(&name, implied)?,
            TokenEvent::ProcessingInstruction { target, data } => {
                let pi = self.tree.create_processing_instruction(self.document, &target, &data)?;
                let parent = self.current();
                self.tree.append(pi, parent)?;
            }
            TokenEvent::Comment(data) => {
                let comment = self.tree.create_comment(self.document, &data);
                let parent = self.current();
                self.tree.append(comment, parent)?;
            }
            TokenEvent::Doctype { name, public_id, system_id } => {
                self.doctype(&name, &public_id, &system_id);
            }
            TokenEvent::Error(message) => return Err(ParseError::Tokenizer(message)),
        }
        Ok(())
    }

    /// First occurrence wins, compared case-insensitively
    fn attribute(&mut self, name: String, value: &str) {
        let Some(&element) = self.open_elements.last() else {
            self.diagnostics.push(format!("attribute {name:?} outside of an element"));
            return;
        };
        let name = if self.lower_case_attribute_names { name.to_ascii_lowercase() } else { name };
        let duplicate = self
            .tree
            .attribute_names(element)
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(&name));
        if duplicate || !self.tree.insert_parsed_attribute(element, &name, value) {
            self.diagnostics.push(format!("duplicate attribute {name:?}"));
        }
    }

    fn close(&mut self, name: &str, implied: bool) -> Result<(), ParseError> {
        let name = self.tag_name(name.to_string());
        let position = self
            .open_elements
            .iter()
            .rposition(|&el| self.tree.local_name(el) == Some(name.as_str()));

        let Some(position) = position else {
            if self.strict {
                return Err(ParseError::UnbalancedCloseTag(name));
            }
            self.diagnostics.push(format!("close tag </{name}> matches no open element"));
            return Ok(());
        };

        // Elements left open inside the matched one close implicitly
        for &element in &self.open_elements[position + 1..] {
            self.tree.set_implied_close_tag(element, true);
        }
        self.tree.set_implied_close_tag(self.open_elements[position], implied);
        self.open_elements.truncate(position);
        Ok(())
    }

    /// Doctypes are only kept where a document accepts them
    fn doctype(&mut self, name: &str, public_id: &str, system_id: &str) {
        let parent = self.current();
        let doctype = match self.tree.create_document_type(self.document, name, public_id, system_id) {
            Ok(doctype) => doctype,
            Err(err) => {
                self.diagnostics.push(format!("ignored doctype: {err}"));
                return;
            }
        };
        if let Err(err) = self.tree.append(doctype, parent) {
            self.diagnostics.push(format!("ignored doctype: {err}"));
        }
    }

    /// Recoverable problems seen so far
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Close whatever is still open and hand back the root
    pub fn finish(mut self) -> Result<(NodeId, Vec<String>), ParseError> {
        if self.poisoned {
            return Err(ParseError::Aborted);
        }
        for &element in &self.open_elements {
            self.tree.set_implied_close_tag(element, true);
        }
        Ok((self.root, self.diagnostics))
    }
}
