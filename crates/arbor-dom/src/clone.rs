//! Node cloning

use crate::{AttrData, DomTree, NodeData, NodeId};

impl DomTree {
    /// `cloneNode(deep)`
    pub fn clone_node(&mut self, node: NodeId, deep: bool) -> NodeId {
        self.clone_into(node, None, deep)
    }

    /// `clone` a node into `document` (its own document when `None`)
    ///
    /// The copy is detached. With `clone_children`, descendants are copied in
    /// tree order and attached under the copy of their parent.
    pub fn clone_into(
        &mut self,
        node: NodeId,
        document: Option<NodeId>,
        clone_children: bool,
    ) -> NodeId {
        let document = document.unwrap_or_else(|| self.node_document(node));
        let copy = self.clone_single(node, document);
        if !clone_children {
            return copy;
        }

        // A cloned document owns the copies of its children
        let child_document = if self.node(copy).is_document() { copy } else { document };
        let descendants: Vec<NodeId> = self.descendants(node).collect();

        // (original, copy) pairs along the path from the root to the cursor
        let mut cursor = vec![(node, copy)];
        for original in descendants {
            let parent = self.parent(original);
            while let Some(&(top, _)) = cursor.last() {
                if Some(top) == parent {
                    break;
                }
                cursor.pop();
            }
            let Some(&(_, parent_copy)) = cursor.last() else {
                break;
            };
            let child_copy = self.clone_single(original, child_document);
            self.insert(child_copy, parent_copy, None, true);
            cursor.push((original, child_copy));
        }
        copy
    }

    /// Copy one node without children
    fn clone_single(&mut self, node: NodeId, document: NodeId) -> NodeId {
        match self.node(node).data.clone() {
            NodeData::Document(data) => self.alloc_document(NodeData::Document(data)),
            NodeData::Element(element) => {
                let copy = self.create_an_element(
                    document,
                    &element.local_name,
                    element.namespace.as_deref(),
                    element.prefix.as_deref(),
                    element.is_value.as_deref(),
                );
                let originals: Vec<AttrData> = element
                    .attributes
                    .iter()
                    .filter_map(|&attr| self.node(attr).as_attribute().cloned())
                    .collect();
                let attributes: Vec<NodeId> = originals
                    .into_iter()
                    .map(|attr| {
                        self.alloc(
                            document,
                            NodeData::Attribute(AttrData { element: Some(copy), ..attr }),
                        )
                    })
                    .collect();
                if let Some(data) = self.node_mut(copy).as_element_mut() {
                    data.attributes = attributes;
                    data.implied_close = element.implied_close;
                }
                copy
            }
            NodeData::Attribute(attr) => {
                self.alloc(document, NodeData::Attribute(AttrData { element: None, ..attr }))
            }
            data => self.alloc(document, data),
        }
    }
}
