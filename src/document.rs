//! JSON persistence for diagrams
//!
//! The on-disk format is a single object:
//!
//! ```json
//! {
//!   "root": 2,
//!   "nodes": [
//!     {"id": 0, "label": "0", "x": 160, "y": 498, "is_terminal": true},
//!     {"id": 2, "label": "p", "x": 400, "y": 200, "is_terminal": false, "low": 0, "high": null}
//!   ]
//! }
//! ```
//!
//! Import is fail-closed: the whole document is validated before a single node
//! is built, so a bad file can never half-replace the graph being edited.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use log::{debug, info};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{EditorError, Result, ValidationError};
use crate::geometry::Point;
use crate::graph::{Branches, EdgeKind, Graph, Node, NodeId, NodeKind};

/// Serializable form of a whole diagram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub root: Option<NodeId>,
    pub nodes: Vec<NodeRecord>,
}

/// One node entry of a [`Document`]
///
/// `low` and `high` are written (possibly as `null`) for decision nodes and
/// left out entirely for terminals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub is_terminal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Option<NodeId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Option<NodeId>>,
}

impl Document {
    /// Pretty-printed JSON with two-space indentation
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Snapshot a graph into its document form, nodes in ascending id order
pub fn to_document(graph: &Graph) -> Document {
    let nodes = graph
        .nodes()
        .map(|node| {
            let (low, high) = match node.branches() {
                Some(b) => (Some(b.low), Some(b.high)),
                None => (None, None),
            };
            NodeRecord {
                id: node.id,
                label: node.label.clone(),
                x: node.position.x,
                y: node.position.y,
                is_terminal: node.is_terminal(),
                low,
                high,
            }
        })
        .collect();
    Document {
        root: graph.root(),
        nodes,
    }
}

/// Node entry after field checks, before cross-references are resolved
struct Entry {
    id: NodeId,
    label: String,
    position: Point,
    is_terminal: bool,
    low: Option<NodeId>,
    high: Option<NodeId>,
}

const REQUIRED_FIELDS: [&str; 5] = ["id", "label", "x", "y", "is_terminal"];

fn field_id(
    obj: &Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<Option<NodeId>, ValidationError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or(ValidationError::InvalidField {
            index,
            field,
            expected: "a non-negative integer node id",
        }),
    }
}

fn parse_entry(index: usize, value: &Value) -> Result<Entry, ValidationError> {
    let obj = value
        .as_object()
        .ok_or(ValidationError::EntryNotObject { index })?;
    if let Some(field) = REQUIRED_FIELDS.iter().find(|f| !obj.contains_key(**f)) {
        return Err(ValidationError::MissingField { index, field });
    }
    let invalid = |field: &'static str, expected: &'static str| ValidationError::InvalidField {
        index,
        field,
        expected,
    };

    let id = field_id(obj, index, "id")?.ok_or(invalid("id", "a non-negative integer node id"))?;
    // The largest id would leave nothing for new nodes
    if id == NodeId::MAX {
        return Err(invalid("id", "an id below 18446744073709551615"));
    }
    let label = obj["label"]
        .as_str()
        .ok_or(invalid("label", "a string"))?
        .to_string();
    let x = obj["x"].as_f64().ok_or(invalid("x", "a number"))?;
    let y = obj["y"].as_f64().ok_or(invalid("y", "a number"))?;
    let is_terminal = obj["is_terminal"]
        .as_bool()
        .ok_or(invalid("is_terminal", "a boolean"))?;

    Ok(Entry {
        id,
        label,
        position: Point::new(x, y),
        is_terminal,
        low: field_id(obj, index, "low")?,
        high: field_id(obj, index, "high")?,
    })
}

/// Validate an untrusted document and build a fresh graph from it
///
/// Rules are checked in order and the first violation is reported:
/// structure, required fields, duplicate ids, terminals "0" and "1",
/// edge targets, root.
pub fn from_document(doc: &Value) -> Result<Graph, ValidationError> {
    let obj = doc.as_object().ok_or(ValidationError::NotAnObject)?;
    let raw_nodes = obj
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or(ValidationError::MissingNodes)?;

    let entries = raw_nodes
        .iter()
        .enumerate()
        .map(|(index, value)| parse_entry(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    let mut ids = HashSet::with_capacity(entries.len());
    for entry in &entries {
        if !ids.insert(entry.id) {
            return Err(ValidationError::DuplicateId(entry.id));
        }
    }

    let terminal_labels: BTreeSet<&str> = entries
        .iter()
        .filter(|e| e.is_terminal)
        .map(|e| e.label.as_str())
        .collect();
    for label in ["0", "1"] {
        if !terminal_labels.contains(label) {
            return Err(ValidationError::MissingTerminal(label));
        }
    }

    for entry in entries.iter().filter(|e| !e.is_terminal) {
        for (kind, target) in [(EdgeKind::Low, entry.low), (EdgeKind::High, entry.high)] {
            if let Some(target) = target {
                if !ids.contains(&target) {
                    return Err(ValidationError::DanglingEdge {
                        source_id: entry.id,
                        kind: kind.as_str(),
                        target,
                    });
                }
            }
        }
    }

    let root = match obj.get("root") {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.as_u64().ok_or(ValidationError::InvalidRoot)?),
    };
    if let Some(root) = root {
        if !ids.contains(&root) {
            return Err(ValidationError::DanglingRoot(root));
        }
    }

    // Everything checks out; only now build nodes
    let nodes = entries
        .into_iter()
        .map(|entry| Node {
            id: entry.id,
            is_root: Some(entry.id) == root,
            kind: if entry.is_terminal {
                NodeKind::Terminal
            } else {
                NodeKind::Decision(Branches {
                    low: entry.low,
                    high: entry.high,
                })
            },
            label: entry.label,
            position: entry.position,
        })
        .collect();
    let graph = Graph::from_validated(nodes);
    debug!(
        "validated document: {} nodes, {} edges",
        graph.len(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Parse and validate JSON text
pub fn from_json(text: &str) -> Result<Graph, ValidationError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ValidationError::Syntax(e.to_string()))?;
    from_document(&value)
}

/// Read and validate a diagram file
pub fn load(path: &Path) -> Result<Graph> {
    let text = std::fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
    let graph = from_json(&text)?;
    info!("loaded {} ({} nodes)", path.display(), graph.len());
    Ok(graph)
}

/// Write a diagram file
pub fn save(graph: &Graph, path: &Path) -> Result<()> {
    let mut text = to_document(graph)
        .to_json()
        .map_err(|e| EditorError::io(path, e.into()))?;
    text.push('\n');
    std::fs::write(path, text).map_err(|e| EditorError::io(path, e))?;
    info!("saved {} ({} nodes)", path.display(), graph.len());
    Ok(())
}
