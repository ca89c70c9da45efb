//! The OBDD graph model
//!
//! A [`Graph`] owns every node of one diagram together with the id and label
//! allocators. Edges live on their source node: a decision node has one slot
//! for its `low` edge and one for its `high` edge, and a terminal node has no
//! slots at all.
//!
//! Every public mutation either leaves the graph satisfying all structural
//! invariants or returns an error without touching it:
//!
//! 1. node ids are unique
//! 2. at most one node is the root
//! 3. every edge target exists
//! 4. terminal nodes have no outgoing edges
//! 5. terminals labeled `"0"` and `"1"` exist (checked at construction and import)
//! 6. deleting a node removes every edge pointing at it

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, info, warn};

use crate::alloc::{IdAllocator, LabelAllocator};
use crate::error::{EditorError, Rejection, Result};
use crate::geometry::Point;

/// Node identifier, unique within a graph and never reused in a session
pub type NodeId = u64;

/// The two edge kinds leaving a decision node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// Taken when the node's variable is false (drawn dashed)
    Low,
    /// Taken when the node's variable is true (drawn solid)
    High,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 2] = [EdgeKind::Low, EdgeKind::High];

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Low => "low",
            EdgeKind::High => "high",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing edge slots of a decision node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Branches {
    pub low: Option<NodeId>,
    pub high: Option<NodeId>,
}

impl Branches {
    pub fn get(&self, kind: EdgeKind) -> Option<NodeId> {
        match kind {
            EdgeKind::Low => self.low,
            EdgeKind::High => self.high,
        }
    }

    fn slot_mut(&mut self, kind: EdgeKind) -> &mut Option<NodeId> {
        match kind {
            EdgeKind::Low => &mut self.low,
            EdgeKind::High => &mut self.high,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }
}

/// What a node is, along with the edges that kind may own
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Decision(Branches),
    Terminal,
}

/// Kind tag used when creating nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Decision,
    Terminal,
}

/// A node of the diagram
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    pub position: Point,
    pub is_root: bool,
}

impl Node {
    pub fn new(id: NodeId, node_type: NodeType, label: impl Into<String>, position: Point) -> Self {
        let kind = match node_type {
            NodeType::Decision => NodeKind::Decision(Branches::default()),
            NodeType::Terminal => NodeKind::Terminal,
        };
        Self {
            id,
            label: label.into(),
            kind,
            position,
            is_root: false,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Decision(_) => NodeType::Decision,
            NodeKind::Terminal => NodeType::Terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, NodeKind::Terminal)
    }

    /// Edge slots, or `None` for terminals
    pub fn branches(&self) -> Option<&Branches> {
        match &self.kind {
            NodeKind::Decision(branches) => Some(branches),
            NodeKind::Terminal => None,
        }
    }

    /// Target of the outgoing edge of `kind`, if any
    pub fn edge(&self, kind: EdgeKind) -> Option<NodeId> {
        self.branches().and_then(|b| b.get(kind))
    }

    /// All outgoing edges as `(kind, target)` pairs, low first
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKind, NodeId)> + '_ {
        EdgeKind::ALL
            .into_iter()
            .filter_map(move |kind| self.edge(kind).map(|target| (kind, target)))
    }
}

/// A complete diagram: nodes keyed by id plus the allocators that feed it
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: BTreeMap<NodeId, Node>,
    ids: IdAllocator,
    labels: LabelAllocator,
}

impl Graph {
    /// A fresh diagram holding only the terminals "0" and "1"
    pub fn with_terminals(zero: Point, one: Point) -> Self {
        let mut graph = Self {
            nodes: BTreeMap::new(),
            ids: IdAllocator::new(),
            labels: LabelAllocator::new(),
        };
        for (id, label, position) in [(0, "0", zero), (1, "1", one)] {
            graph
                .nodes
                .insert(id, Node::new(id, NodeType::Terminal, label, position));
        }
        graph.ids.reset_after([0, 1]);
        graph
    }

    /// Assemble a graph from nodes that have already been validated
    ///
    /// Allocators continue after the imported ids and labels.
    pub(crate) fn from_validated(nodes: Vec<Node>) -> Self {
        let mut ids = IdAllocator::new();
        ids.reset_after(nodes.iter().map(|n| n.id));
        let mut labels = LabelAllocator::new();
        labels.set_index(nodes.iter().filter(|n| !n.is_terminal()).count());
        Self {
            nodes: nodes.into_iter().map(|n| (n.id, n)).collect(),
            ids,
            labels,
        }
    }

    // Queries

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Nodes in ascending id order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every edge as `(source, kind, target)`
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, EdgeKind, NodeId)> + '_ {
        self.nodes
            .values()
            .flat_map(|node| node.edges().map(move |(kind, target)| (node.id, kind, target)))
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.nodes.values().find(|n| n.is_root).map(|n| n.id)
    }

    /// The id the next added node will receive
    pub fn next_id(&self) -> NodeId {
        self.ids.peek()
    }

    /// Suggest a label for the next decision node without consuming it
    pub fn propose_label(&self) -> String {
        self.labels.propose_label()
    }

    /// Consume the proposed label; blank `text` keeps the proposal
    pub fn confirm_label(&mut self, text: &str) -> String {
        self.labels.confirm_label(text)
    }

    fn require(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(&id)
            .ok_or_else(|| Rejection::UnknownNode(id).into())
    }

    fn require_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| Rejection::UnknownNode(id).into())
    }

    // Mutations

    /// Add a node with a freshly allocated id
    pub fn add_node(
        &mut self,
        node_type: NodeType,
        label: impl Into<String>,
        position: Point,
    ) -> Result<NodeId> {
        let id = self.ids.next_id().ok_or_else(|| {
            EditorError::InvariantViolation("node ids are exhausted".to_string())
        })?;
        if self.nodes.contains_key(&id) {
            return Err(EditorError::InvariantViolation(format!(
                "node id {} is already in use",
                id
            )));
        }
        let node = Node::new(id, node_type, label, position);
        info!("add node {} '{}' ({:?})", id, node.label, node_type);
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Point the `kind` edge of `source` at `target`, replacing any previous edge
    ///
    /// Returns the target of the replaced edge.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        kind: EdgeKind,
        target: NodeId,
    ) -> Result<Option<NodeId>> {
        self.require(target)?;
        let node = self.require_mut(source)?;
        let NodeKind::Decision(branches) = &mut node.kind else {
            warn!("rejected {} edge from terminal {}", kind, source);
            return Err(Rejection::TerminalSource(node.label.clone()).into());
        };
        let previous = branches.slot_mut(kind).replace(target);
        debug!(
            "edge {} -{}-> {} (replaced {:?})",
            source, kind, target, previous
        );
        Ok(previous)
    }

    /// Remove both outgoing edges of `id`; returns whether any existed
    pub fn clear_edges(&mut self, id: NodeId) -> Result<bool> {
        let node = self.require_mut(id)?;
        match &mut node.kind {
            NodeKind::Decision(branches) => {
                let had_edges = !branches.is_empty();
                *branches = Branches::default();
                debug!("cleared edges of {}", id);
                Ok(had_edges)
            }
            NodeKind::Terminal => Err(Rejection::TerminalSource(node.label.clone()).into()),
        }
    }

    /// Delete a decision node and every edge that targets it
    pub fn delete_node(&mut self, id: NodeId) -> Result<Node> {
        let node = self.require(id)?;
        if node.is_terminal() {
            warn!("rejected delete of terminal {}", id);
            return Err(Rejection::TerminalDelete(node.label.clone()).into());
        }
        let removed = self
            .nodes
            .remove(&id)
            .ok_or_else(|| EditorError::InvariantViolation(format!("node {} vanished", id)))?;
        for other in self.nodes.values_mut() {
            if let NodeKind::Decision(branches) = &mut other.kind {
                for kind in EdgeKind::ALL {
                    let slot = branches.slot_mut(kind);
                    if *slot == Some(id) {
                        *slot = None;
                    }
                }
            }
            if removed.is_root {
                other.is_root = false;
            }
        }
        info!("deleted node {} '{}'", id, removed.label);
        Ok(removed)
    }

    /// Make `id` the only root
    pub fn set_root(&mut self, id: NodeId) -> Result<()> {
        self.require(id)?;
        for node in self.nodes.values_mut() {
            node.is_root = node.id == id;
        }
        info!("root is now {}", id);
        Ok(())
    }

    /// Remove every decision node; terminals stay with no root and no edges
    pub fn clear_all(&mut self) {
        self.nodes.retain(|_, node| node.is_terminal());
        for node in self.nodes.values_mut() {
            node.is_root = false;
        }
        self.labels.reset();
        info!("cleared all decision nodes");
    }

    /// Move the existing nodes among `ids` by `(dx, dy)`
    pub fn translate<'a, I>(&mut self, ids: I, dx: f64, dy: f64)
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        for id in ids {
            if let Some(node) = self.nodes.get_mut(id) {
                node.position = node.position.offset(dx, dy);
            }
        }
    }

    /// Check every structural invariant, reporting the first one broken
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| Err(EditorError::InvariantViolation(msg));
        for (key, node) in &self.nodes {
            if *key != node.id {
                return violation(format!("node {} stored under key {}", node.id, key));
            }
            for (kind, target) in node.edges() {
                if !self.nodes.contains_key(&target) {
                    return violation(format!(
                        "{} edge of {} targets missing node {}",
                        kind, node.id, target
                    ));
                }
            }
        }
        let roots = self.nodes.values().filter(|n| n.is_root).count();
        if roots > 1 {
            return violation(format!("{} nodes are marked root", roots));
        }
        for label in ["0", "1"] {
            if !self.nodes.values().any(|n| n.is_terminal() && n.label == label) {
                return violation(format!("no terminal labeled '{}'", label));
            }
        }
        Ok(())
    }
}

impl Default for Graph {
    fn default() -> Self {
        let canvas = crate::config::CanvasConfig::default();
        let (zero, one) = canvas.terminal_positions();
        Self::with_terminals(zero, one)
    }
}
