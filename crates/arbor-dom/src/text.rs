//! Character data and text
//!
//! Offsets and lengths are in UTF-16 code units. Splitting a surrogate pair
//! leaves U+FFFD in its place.

use crate::walker::{FilterResult, NodeFilter, WhatToShow};
use crate::{DomError, DomResult, DomTree, NodeData, NodeId, NodeType};

/// Accepts Text nodes, skips everything else (CDATA sections included)
struct ExclusiveTextFilter;

impl NodeFilter for ExclusiveTextFilter {
    fn accept_node(&self, tree: &DomTree, node: NodeId) -> DomResult<FilterResult> {
        let text = tree.get(node).is_some_and(|n| n.is_exclusive_text());
        Ok(if text { FilterResult::Accept } else { FilterResult::Skip })
    }
}

fn utf16_len(data: &str) -> usize {
    data.encode_utf16().count()
}

impl DomTree {
    /// `nodeValue`: attribute value or character data
    pub fn node_value(&self, node: NodeId) -> Option<&str> {
        let node = self.node(node);
        match node.as_attribute() {
            Some(attr) => Some(&attr.value),
            None => node.character_data(),
        }
    }

    /// `nodeValue = value`; `None` behaves as the empty string and other
    /// node kinds ignore it
    pub fn set_node_value(&mut self, node: NodeId, value: Option<&str>) -> DomResult<()> {
        let value = value.unwrap_or_default();
        if self.node(node).as_attribute().is_some() {
            self.set_attr_value(node, value);
        } else if self.node(node).is_character_data() {
            self.replace_data(node, 0, self.length(node), value)?;
        }
        Ok(())
    }

    /// `textContent`; `None` for documents and doctypes
    pub fn text_content(&self, node: NodeId) -> Option<String> {
        match &self.node(node).data {
            NodeData::Document(_) | NodeData::DocumentType(_) => None,
            NodeData::Element(_) | NodeData::DocumentFragment => {
                Some(self.descendant_text_content(node))
            }
            NodeData::Attribute(attr) => Some(attr.value.clone()),
            NodeData::Text(data)
            | NodeData::CDataSection(data)
            | NodeData::Comment(data)
            | NodeData::ProcessingInstruction { data, .. } => Some(data.clone()),
        }
    }

    /// `textContent = value`: elements and fragments get their children
    /// replaced by a single text node (none for an empty string)
    pub fn set_text_content(&mut self, node: NodeId, value: Option<&str>) -> DomResult<()> {
        let value = value.unwrap_or_default();
        match self.node_type(node) {
            NodeType::Element | NodeType::DocumentFragment => {
                let text = (!value.is_empty()).then(|| {
                    let document = self.node_document(node);
                    self.create_text_node(document, value)
                });
                self.replace_all(text, node);
            }
            NodeType::Attribute => self.set_attr_value(node, value),
            NodeType::Text
            | NodeType::CDataSection
            | NodeType::Comment
            | NodeType::ProcessingInstruction => {
                self.replace_data(node, 0, self.length(node), value)?;
            }
            NodeType::Document | NodeType::DocumentType => {}
        }
        Ok(())
    }

    /// Concatenated data of every Text descendant, in tree order
    pub fn descendant_text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .filter_map(|n| {
                let n = self.node(n);
                if n.is_text() { n.character_data() } else { None }
            })
            .collect()
    }

    /// DOM `length`: code units for character data, child count otherwise
    pub fn length(&self, node: NodeId) -> usize {
        let data = self.node(node);
        if data.as_doctype().is_some() || data.as_attribute().is_some() {
            return 0;
        }
        match data.character_data() {
            Some(text) => utf16_len(text),
            None => self.children(node).count(),
        }
    }

    fn character_data_of(&self, node: NodeId) -> DomResult<&str> {
        self.node(node)
            .character_data()
            .ok_or_else(|| DomError::NotSupported("not a character data node".into()))
    }

    /// `substringData(offset, count)`
    pub fn substring_data(&self, node: NodeId, offset: usize, count: usize) -> DomResult<String> {
        let units: Vec<u16> = self.character_data_of(node)?.encode_utf16().collect();
        if offset > units.len() {
            return Err(DomError::IndexSize("offset is past the end of the data"));
        }
        let end = offset.saturating_add(count).min(units.len());
        Ok(String::from_utf16_lossy(&units[offset..end]))
    }

    pub fn append_data(&mut self, node: NodeId, data: &str) -> DomResult<()> {
        let length = self.length(node);
        self.replace_data(node, length, 0, data)
    }

    pub fn insert_data(&mut self, node: NodeId, offset: usize, data: &str) -> DomResult<()> {
        self.replace_data(node, offset, 0, data)
    }

    pub fn delete_data(&mut self, node: NodeId, offset: usize, count: usize) -> DomResult<()> {
        self.replace_data(node, offset, count, "")
    }

    /// `replaceData(offset, count, data)`
    pub fn replace_data(
        &mut self,
        node: NodeId,
        offset: usize,
        count: usize,
        data: &str,
    ) -> DomResult<()> {
        let old = self.character_data_of(node)?.to_string();
        let mut units: Vec<u16> = old.encode_utf16().collect();
        if offset > units.len() {
            return Err(DomError::IndexSize("offset is past the end of the data"));
        }
        let end = offset.saturating_add(count).min(units.len());
        units.splice(offset..end, data.encode_utf16());
        let updated = String::from_utf16_lossy(&units);

        self.queue_character_data(node, old);
        if let Some(slot) = self.node_mut(node).character_data_mut() {
            *slot = updated;
        }
        Ok(())
    }

    /// `splitText(offset)`: the tail moves into a new Text node, placed
    /// right after `node` when it has a parent
    pub fn split_text(&mut self, node: NodeId, offset: usize) -> DomResult<NodeId> {
        if !self.node(node).is_text() {
            return Err(DomError::NotSupported("only text nodes can be split".into()));
        }
        let length = self.length(node);
        if offset > length {
            return Err(DomError::IndexSize("offset is past the end of the data"));
        }
        let count = length - offset;
        let tail = self.substring_data(node, offset, count)?;

        let document = self.node_document(node);
        let new_node = self.create_text_node(document, &tail);
        if let Some(parent) = self.parent(node) {
            let next = self.next_sibling(node);
            self.insert(new_node, parent, next, false);
        }
        self.replace_data(node, offset, count, "")?;
        Ok(new_node)
    }

    fn contiguous_run(&self, node: NodeId, is_member: impl Fn(NodeId) -> bool) -> Vec<NodeId> {
        if !is_member(node) {
            return Vec::new();
        }
        let mut run: Vec<NodeId> = self
            .preceding_siblings(node)
            .take_while(|&n| is_member(n))
            .collect();
        run.reverse();
        run.push(node);
        run.extend(self.following_siblings(node).take_while(|&n| is_member(n)));
        run
    }

    /// Text and CDATA siblings adjacent to `node`, itself included, in order
    pub fn contiguous_text_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.contiguous_run(node, |n| self.node(n).is_text())
    }

    /// Like [`DomTree::contiguous_text_nodes`], without CDATA sections
    pub fn contiguous_exclusive_text_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.contiguous_run(node, |n| self.node(n).is_exclusive_text())
    }

    /// `wholeText`
    pub fn whole_text(&self, node: NodeId) -> String {
        self.contiguous_text_nodes(node)
            .into_iter()
            .filter_map(|n| self.node(n).character_data())
            .collect()
    }

    /// `normalize()`: drop empty Text descendants and merge adjacent ones
    pub fn normalize(&mut self, node: NodeId) -> DomResult<()> {
        let walker = self.create_tree_walker(node, WhatToShow::ALL, Some(Box::new(ExclusiveTextFilter)));
        let mut texts = Vec::new();
        while let Some(text) = walker.next_node(self)? {
            texts.push(text);
        }

        for text in texts {
            // Already merged into an earlier node
            if !self.is_descendant(text, node) {
                continue;
            }
            if self.length(text) == 0 {
                self.remove(text);
                continue;
            }

            let following: Vec<NodeId> = self
                .following_siblings(text)
                .take_while(|&n| self.node(n).is_exclusive_text())
                .collect();
            if following.is_empty() {
                continue;
            }
            let merged: String = following
                .iter()
                .filter_map(|&n| self.node(n).character_data())
                .collect();
            let length = self.length(text);
            self.replace_data(text, length, 0, &merged)?;
            for sibling in following {
                self.remove(sibling);
            }
        }
        Ok(())
    }
}
