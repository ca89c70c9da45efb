//! Selected nodes and the primary selection

use std::collections::BTreeSet;

use crate::graph::NodeId;

/// A set of selected node ids plus the primary one
///
/// The primary is the anchor for dragging and the target of single-node
/// commands. It is always a member of the set, and is absent exactly when the
/// set is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    members: BTreeSet<NodeId>,
    primary: Option<NodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(&self) -> Option<NodeId> {
        self.primary
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members.iter().copied()
    }

    pub fn members(&self) -> &BTreeSet<NodeId> {
        &self.members
    }

    /// Collapse the selection to a single node
    pub fn select_only(&mut self, id: NodeId) {
        self.members.clear();
        self.members.insert(id);
        self.primary = Some(id);
    }

    /// Make an already selected node primary; ignored for non-members
    pub fn set_primary(&mut self, id: NodeId) {
        if self.members.contains(&id) {
            self.primary = Some(id);
        }
    }

    /// Add or remove `id`; returns true when it was added
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if self.members.remove(&id) {
            if self.primary == Some(id) {
                self.primary = self.members.first().copied();
            }
            false
        } else {
            self.members.insert(id);
            self.primary = Some(id);
            true
        }
    }

    /// Replace the selection with `ids`
    pub fn replace<I: IntoIterator<Item = NodeId>>(&mut self, ids: I) {
        self.members = ids.into_iter().collect();
        self.repair_primary();
    }

    /// Add `ids` to the selection
    pub fn extend<I: IntoIterator<Item = NodeId>>(&mut self, ids: I) {
        self.members.extend(ids);
        self.repair_primary();
    }

    /// Drop `id` if selected
    pub fn remove(&mut self, id: NodeId) {
        if self.members.remove(&id) {
            self.repair_primary();
        }
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.primary = None;
    }

    // Keep the primary when it is still a member, otherwise take the smallest id
    fn repair_primary(&mut self) {
        match self.primary {
            Some(id) if self.members.contains(&id) => {}
            _ => self.primary = self.members.first().copied(),
        }
    }
}
