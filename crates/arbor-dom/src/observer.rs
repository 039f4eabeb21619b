//! Mutation records
//!
//! When enabled with [`DomTree::observe_mutations`], every child list,
//! attribute and character data change queues a [`MutationRecord`]. The
//! host drains the queue with [`DomTree::take_mutation_records`] and
//! dispatches to its observers.

use crate::{DomTree, NodeId};

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub attribute_name: Option<String>,
    pub attribute_namespace: Option<String>,
    pub old_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

impl MutationRecord {
    fn new(mutation_type: MutationType, target: NodeId) -> Self {
        Self {
            mutation_type,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: None,
            attribute_namespace: None,
            old_value: None,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct MutationLog {
    enabled: bool,
    records: Vec<MutationRecord>,
}

impl DomTree {
    /// Start or stop queueing mutation records
    pub fn observe_mutations(&mut self, enabled: bool) {
        self.mutations.enabled = enabled;
    }

    /// Drain queued records, oldest first
    pub fn take_mutation_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.mutations.records)
    }

    pub(crate) fn queue_child_list(
        &mut self,
        target: NodeId,
        added_nodes: Vec<NodeId>,
        removed_nodes: Vec<NodeId>,
        previous_sibling: Option<NodeId>,
        next_sibling: Option<NodeId>,
    ) {
        if !self.mutations.enabled || (added_nodes.is_empty() && removed_nodes.is_empty()) {
            return;
        }
        let mut record = MutationRecord::new(MutationType::ChildList, target);
        record.added_nodes = added_nodes;
        record.removed_nodes = removed_nodes;
        record.previous_sibling = previous_sibling;
        record.next_sibling = next_sibling;
        self.mutations.records.push(record);
    }

    pub(crate) fn queue_attribute(
        &mut self,
        target: NodeId,
        local_name: &str,
        namespace: Option<&str>,
        old_value: Option<String>,
    ) {
        if !self.mutations.enabled {
            return;
        }
        let mut record = MutationRecord::new(MutationType::Attributes, target);
        record.attribute_name = Some(local_name.to_string());
        record.attribute_namespace = namespace.map(str::to_string);
        record.old_value = old_value;
        self.mutations.records.push(record);
    }

    pub(crate) fn queue_character_data(&mut self, target: NodeId, old_value: String) {
        if !self.mutations.enabled {
            return;
        }
        let mut record = MutationRecord::new(MutationType::CharacterData, target);
        record.old_value = Some(old_value);
        self.mutations.records.push(record);
    }
}
