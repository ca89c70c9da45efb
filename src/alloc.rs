//! Node id and variable label allocation
//!
//! Both counters only move forward within a session: deleting a node never
//! frees its id, and labels keep advancing until the diagram is cleared.

use crate::graph::NodeId;

/// Single-letter variable names, handed out in order before falling back to `p1, p2, ...`
pub const VARIABLE_LABELS: [&str; 11] = ["p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z"];

/// Issues unique, monotonically increasing node ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next: NodeId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next id and advance the counter; `None` once ids run out
    pub fn next_id(&mut self) -> Option<NodeId> {
        let id = self.next;
        self.next = id.checked_add(1)?;
        Some(id)
    }

    /// The id the next call to `next_id` will return
    pub fn peek(&self) -> NodeId {
        self.next
    }

    /// Continue after the largest id in `ids` (or from 0 when there are none)
    pub fn reset_after<I: IntoIterator<Item = NodeId>>(&mut self, ids: I) {
        self.next = ids
            .into_iter()
            .max()
            .map(|max| max.saturating_add(1))
            .unwrap_or(0);
    }
}

/// Hands out variable labels `p, q, ..., z, p1, p2, ...`
///
/// Labels are offered with [`propose_label`](Self::propose_label), which does not
/// touch the counter, and taken with [`confirm_label`](Self::confirm_label),
/// which does. A cancelled prompt therefore leaves the sequence where it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelAllocator {
    index: usize,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The label at position `index` of the sequence
    pub fn label_at(index: usize) -> String {
        match VARIABLE_LABELS.get(index) {
            Some(label) => (*label).to_string(),
            None => format!("p{}", index - (VARIABLE_LABELS.len() - 1)),
        }
    }

    /// Return the current label, advancing the counter when `consume` is set
    pub fn next_label(&mut self, consume: bool) -> String {
        let label = Self::label_at(self.index);
        if consume {
            self.index += 1;
        }
        label
    }

    /// Suggest the next label without consuming it
    pub fn propose_label(&self) -> String {
        Self::label_at(self.index)
    }

    /// Consume one label; blank `text` falls back to the proposed label
    pub fn confirm_label(&mut self, text: &str) -> String {
        let proposed = self.next_label(true);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            proposed
        } else {
            trimmed.to_string()
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), Some(0));
        assert_eq!(ids.next_id(), Some(1));
        assert_eq!(ids.peek(), 2);
        assert_eq!(ids.next_id(), Some(2));
    }

    #[test]
    fn test_reset_after_imported_ids() {
        let mut ids = IdAllocator::new();
        ids.reset_after([4, 17, 2]);
        assert_eq!(ids.next_id(), Some(18));

        ids.reset_after(std::iter::empty());
        assert_eq!(ids.next_id(), Some(0));
    }

    #[test]
    fn test_exhausted_ids_never_wrap() {
        let mut ids = IdAllocator::new();
        ids.reset_after([NodeId::MAX - 2]);
        assert_eq!(ids.next_id(), Some(NodeId::MAX - 1));
        assert_eq!(ids.next_id(), None);
        assert_eq!(ids.next_id(), None);

        ids.reset_after([NodeId::MAX]);
        assert_eq!(ids.next_id(), None);
        assert_eq!(ids.peek(), NodeId::MAX);
    }

    #[test]
    fn test_label_sequence() {
        let mut labels = LabelAllocator::new();
        let first: Vec<String> = (0..13).map(|_| labels.next_label(true)).collect();
        assert_eq!(
            first,
            vec!["p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "p1", "p2"]
        );
    }

    #[test]
    fn test_label_at_beyond_letters() {
        assert_eq!(LabelAllocator::label_at(10), "z");
        assert_eq!(LabelAllocator::label_at(11), "p1");
        assert_eq!(LabelAllocator::label_at(25), "p15");
    }

    #[test]
    fn test_propose_does_not_consume() {
        let mut labels = LabelAllocator::new();
        assert_eq!(labels.propose_label(), "p");
        assert_eq!(labels.propose_label(), "p");
        assert_eq!(labels.next_label(false), "p");
        assert_eq!(labels.index(), 0);

        assert_eq!(labels.confirm_label("p"), "p");
        assert_eq!(labels.propose_label(), "q");
    }

    #[test]
    fn test_confirm_label_override_still_advances() {
        let mut labels = LabelAllocator::new();
        assert_eq!(labels.confirm_label("  x3 "), "x3");
        assert_eq!(labels.propose_label(), "q");
    }

    #[test]
    fn test_confirm_blank_uses_proposed() {
        let mut labels = LabelAllocator::new();
        labels.set_index(2);
        assert_eq!(labels.confirm_label("   "), "r");
        assert_eq!(labels.index(), 3);

        labels.reset();
        assert_eq!(labels.propose_label(), "p");
    }
}
