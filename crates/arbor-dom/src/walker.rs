//! TreeWalker
//!
//! A cursor over the subtree of `root` that only stops at nodes the filter
//! accepts. `Reject` prunes a node's subtree for [`TreeWalker::next_node`]
//! and [`TreeWalker::previous_node`]; `Skip` hides the node but keeps its
//! children reachable.
//!
//! The walker borrows the tree per call rather than holding it, so the tree
//! can be mutated between steps.

use std::cell::Cell;

use crate::{DomError, DomResult, DomTree, NodeId, NodeType};

/// What types of nodes to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhatToShow(u32);

impl WhatToShow {
    pub const ALL: WhatToShow = WhatToShow(0xFFFFFFFF);
    pub const ELEMENT: WhatToShow = WhatToShow(0x1);
    pub const ATTRIBUTE: WhatToShow = WhatToShow(0x2);
    pub const TEXT: WhatToShow = WhatToShow(0x4);
    pub const CDATA_SECTION: WhatToShow = WhatToShow(0x8);
    pub const PROCESSING_INSTRUCTION: WhatToShow = WhatToShow(0x40);
    pub const COMMENT: WhatToShow = WhatToShow(0x80);
    pub const DOCUMENT: WhatToShow = WhatToShow(0x100);
    pub const DOCUMENT_TYPE: WhatToShow = WhatToShow(0x200);
    pub const DOCUMENT_FRAGMENT: WhatToShow = WhatToShow(0x400);

    /// Check if a node type is shown
    pub fn includes(self, node_type: NodeType) -> bool {
        let flag = 1u32 << (node_type.to_u32() - 1);
        (self.0 & flag) != 0
    }

    /// Union of two WhatToShow filters
    pub fn or(self, other: WhatToShow) -> WhatToShow {
        WhatToShow(self.0 | other.0)
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl Default for WhatToShow {
    fn default() -> Self {
        Self::ALL
    }
}

/// Node filter result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// Stop at the node
    Accept,
    /// Hide the node and its descendants
    Reject,
    /// Hide the node but process its children
    Skip,
}

/// Predicate consulted for every node the walker considers
///
/// Closures of shape `Fn(&DomTree, NodeId) -> FilterResult` implement this
/// directly. Implement it by hand when the filter itself can fail.
pub trait NodeFilter {
    fn accept_node(&self, tree: &DomTree, node: NodeId) -> DomResult<FilterResult>;
}

impl<F> NodeFilter for F
where
    F: Fn(&DomTree, NodeId) -> FilterResult,
{
    fn accept_node(&self, tree: &DomTree, node: NodeId) -> DomResult<FilterResult> {
        Ok(self(tree, node))
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

/// TreeWalker for navigating the DOM tree
pub struct TreeWalker {
    root: NodeId,
    what_to_show: WhatToShow,
    filter: Option<Box<dyn NodeFilter>>,
    current: Cell<NodeId>,
    /// Set while the filter runs
    active: Cell<bool>,
}

impl TreeWalker {
    pub fn new(root: NodeId, what_to_show: WhatToShow, filter: Option<Box<dyn NodeFilter>>) -> Self {
        Self {
            root,
            what_to_show,
            filter,
            current: Cell::new(root),
            active: Cell::new(false),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn what_to_show(&self) -> WhatToShow {
        self.what_to_show
    }

    /// Get the current node
    pub fn current_node(&self) -> NodeId {
        self.current.get()
    }

    /// Set the current node
    pub fn set_current_node(&self, node: NodeId) {
        self.current.set(node);
    }

    /// `filter` a node: type mask first, then the predicate
    fn filter(&self, tree: &DomTree, node: NodeId) -> DomResult<FilterResult> {
        if self.active.get() {
            tracing::trace!("Rejected reentrant walker filter call at {:?}", node);
            return Err(DomError::InvalidState("walker filter is already running"));
        }
        if !self.what_to_show.includes(tree.node_type(node)) {
            return Ok(FilterResult::Skip);
        }
        let Some(filter) = &self.filter else {
            return Ok(FilterResult::Accept);
        };

        self.active.set(true);
        let result = filter.accept_node(tree, node);
        self.active.set(false);
        result
    }

    fn accept(&self, node: NodeId) -> DomResult<Option<NodeId>> {
        self.current.set(node);
        Ok(Some(node))
    }

    /// `parentNode()`
    pub fn parent_node(&self, tree: &DomTree) -> DomResult<Option<NodeId>> {
        let mut node = self.current.get();
        while node != self.root {
            let Some(parent) = tree.parent(node) else {
                break;
            };
            node = parent;
            if self.filter(tree, node)? == FilterResult::Accept {
                return self.accept(node);
            }
        }
        Ok(None)
    }

    pub fn first_child(&self, tree: &DomTree) -> DomResult<Option<NodeId>> {
        self.traverse_children(tree, Direction::Forward)
    }

    pub fn last_child(&self, tree: &DomTree) -> DomResult<Option<NodeId>> {
        self.traverse_children(tree, Direction::Backward)
    }

    pub fn next_sibling(&self, tree: &DomTree) -> DomResult<Option<NodeId>> {
        self.traverse_siblings(tree, Direction::Forward)
    }

    pub fn previous_sibling(&self, tree: &DomTree) -> DomResult<Option<NodeId>> {
        self.traverse_siblings(tree, Direction::Backward)
    }

    fn traverse_children(&self, tree: &DomTree, direction: Direction) -> DomResult<Option<NodeId>> {
        let (first, next) = edges(tree, direction);
        let current = self.current.get();
        let mut candidate = first(current);

        while let Some(node) = candidate {
            match self.filter(tree, node)? {
                FilterResult::Accept => return self.accept(node),
                FilterResult::Skip => {
                    if let Some(child) = first(node) {
                        candidate = Some(child);
                        continue;
                    }
                }
                FilterResult::Reject => {}
            }

            // Next sibling of the node or of its closest ancestor below the
            // starting point
            let mut node = node;
            candidate = loop {
                if let Some(sibling) = next(node) {
                    break Some(sibling);
                }
                match tree.parent(node) {
                    Some(parent) if parent != self.root && parent != current => node = parent,
                    _ => return Ok(None),
                }
            };
        }
        Ok(None)
    }

    fn traverse_siblings(&self, tree: &DomTree, direction: Direction) -> DomResult<Option<NodeId>> {
        let (first, next) = edges(tree, direction);
        let mut node = self.current.get();
        if node == self.root {
            return Ok(None);
        }

        loop {
            let mut sibling = next(node);
            while let Some(candidate) = sibling {
                node = candidate;
                let result = self.filter(tree, node)?;
                if result == FilterResult::Accept {
                    return self.accept(node);
                }
                sibling = first(node);
                if result == FilterResult::Reject || sibling.is_none() {
                    sibling = next(node);
                }
            }

            match tree.parent(node) {
                Some(parent) if parent != self.root => node = parent,
                _ => return Ok(None),
            }
            if self.filter(tree, node)? == FilterResult::Accept {
                return Ok(None);
            }
        }
    }

    /// `previousNode()`: reverse tree order, never past `root` and never
    /// `root` itself
    pub fn previous_node(&self, tree: &DomTree) -> DomResult<Option<NodeId>> {
        let mut node = self.current.get();
        while node != self.root {
            let mut sibling = tree.previous_sibling(node);
            while let Some(candidate) = sibling {
                node = candidate;
                let mut result = self.filter(tree, node)?;
                while result != FilterResult::Reject {
                    let Some(last) = tree.last_child(node) else {
                        break;
                    };
                    node = last;
                    result = self.filter(tree, node)?;
                }
                if result == FilterResult::Accept {
                    return self.accept(node);
                }
                sibling = tree.previous_sibling(node);
            }

            match tree.parent(node) {
                Some(parent) if parent != self.root => node = parent,
                _ => return Ok(None),
            }
            if self.filter(tree, node)? == FilterResult::Accept {
                return self.accept(node);
            }
        }
        Ok(None)
    }

    /// `nextNode()`: tree order within `root`, not descending into rejected
    /// nodes
    pub fn next_node(&self, tree: &DomTree) -> DomResult<Option<NodeId>> {
        let mut node = self.current.get();
        let mut result = FilterResult::Accept;

        loop {
            while result != FilterResult::Reject {
                let Some(child) = tree.first_child(node) else {
                    break;
                };
                node = child;
                result = self.filter(tree, node)?;
                if result == FilterResult::Accept {
                    return self.accept(node);
                }
            }

            let mut temporary = Some(node);
            let mut sibling = None;
            while let Some(t) = temporary {
                if t == self.root {
                    return Ok(None);
                }
                sibling = tree.next_sibling(t);
                if sibling.is_some() {
                    break;
                }
                temporary = tree.parent(t);
            }
            let Some(sibling) = sibling else {
                return Ok(None);
            };

            node = sibling;
            result = self.filter(tree, node)?;
            if result == FilterResult::Accept {
                return self.accept(node);
            }
        }
    }
}

/// (first child, next sibling) accessors for a direction
fn edges(
    tree: &DomTree,
    direction: Direction,
) -> (impl Fn(NodeId) -> Option<NodeId> + '_, impl Fn(NodeId) -> Option<NodeId> + '_) {
    let forward = matches!(direction, Direction::Forward);
    (
        move |n: NodeId| if forward { tree.first_child(n) } else { tree.last_child(n) },
        move |n: NodeId| if forward { tree.next_sibling(n) } else { tree.previous_sibling(n) },
    )
}

impl DomTree {
    /// `createTreeWalker(root, whatToShow, filter)`
    pub fn create_tree_walker(
        &self,
        root: NodeId,
        what_to_show: WhatToShow,
        filter: Option<Box<dyn NodeFilter>>,
    ) -> TreeWalker {
        TreeWalker::new(root, what_to_show, filter)
    }
}
