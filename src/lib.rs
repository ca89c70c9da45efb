//! obdd-editor - Interactive editor for ordered binary decision diagrams
//!
//! Draw decision nodes, wire their low and high edges, pick a root and save
//! the result as JSON.
//!
//! # Overview
//!
//! The editing core is independent of any front end. A [`Graph`] holds the
//! diagram and enforces its structural rules, a [`Controller`] turns pointer
//! events and commands into graph edits, and [`document`] converts diagrams
//! to and from the JSON file format. The [`tui`] module puts a terminal front
//! end on top.
//!
//! # Node Kinds
//!
//! | Kind | Purpose |
//! |------|---------|
//! | decision | Tests one variable; owns a `low` and a `high` edge |
//! | terminal | The constant results `0` and `1`; no outgoing edges |
//!
//! # Quick Start
//!
//! ```no_run
//! use obdd_editor::{document, EdgeKind, Graph, NodeType, Point};
//!
//! let mut graph = Graph::default();
//! let p = graph.add_node(NodeType::Decision, "p", Point::new(400.0, 200.0)).unwrap();
//! graph.add_edge(p, EdgeKind::Low, 0).unwrap();
//! graph.add_edge(p, EdgeKind::High, 1).unwrap();
//! graph.set_root(p).unwrap();
//!
//! document::save(&graph, "diagram.json".as_ref()).unwrap();
//! ```

pub mod alloc;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod export;
pub mod geometry;
pub mod graph;
pub mod launcher;
pub mod logging;
pub mod selection;
pub mod tui;

pub use alloc::{IdAllocator, LabelAllocator, VARIABLE_LABELS};
pub use config::{CanvasConfig, Config, LogConfig};
pub use controller::{Command, Controller, Dialogs, Event, InteractionState};
pub use document::{from_document, from_json, to_document, Document, NodeRecord};
pub use error::{EditorError, Rejection, Result, ValidationError};
pub use export::{graph_to_dot, DotConfig};
pub use geometry::{Geometry, HitTest, Point, Rect};
pub use graph::{Branches, EdgeKind, Graph, Node, NodeId, NodeKind, NodeType};
pub use selection::Selection;
