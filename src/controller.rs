//! Interaction state machine
//!
//! The [`Controller`] turns pointer events and commands into graph edits. It
//! owns the graph, the selection and the current interaction mode, and asks a
//! [`Dialogs`] implementation whenever the user has to confirm something or
//! type text. Front ends translate their own input into [`Event`]s and render
//! whatever the controller exposes; nothing here knows about terminals.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::CanvasConfig;
use crate::document;
use crate::error::{Rejection, Result};
use crate::geometry::{Geometry, HitTest, Point, Rect};
use crate::graph::{EdgeKind, Graph, NodeId, NodeType};
use crate::selection::Selection;

/// Blocking prompts the controller may raise while handling an event
pub trait Dialogs {
    /// Ask a yes/no question
    fn confirm(&mut self, message: &str) -> bool;

    /// Ask for a node label; `None` means the user cancelled
    fn ask_label(&mut self, suggested: &str) -> Option<String>;

    /// Pick a diagram file to import
    fn open_for_import(&mut self, default: Option<&Path>) -> Option<PathBuf>;

    /// Pick where to export the diagram
    fn choose_export_path(&mut self, default: Option<&Path>) -> Option<PathBuf>;
}

/// Editing commands, usually bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddNode,
    SetRoot,
    StartConnect(EdgeKind),
    ClearEdges,
    DeleteNode,
    ClearAll,
    Cancel,
    Import,
    Export,
}

/// Input to the controller, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// `modifier` is the toggle-selection key (Shift or Ctrl)
    PointerDown { point: Point, modifier: bool },
    PointerMove { point: Point },
    PointerUp { point: Point },
    Command(Command),
}

/// What the pointer is currently doing
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging {
        anchor: Point,
        moving: BTreeSet<NodeId>,
    },
    BoxSelecting {
        origin: Point,
        current: Point,
        additive: bool,
    },
    Connecting {
        source: NodeId,
        kind: EdgeKind,
    },
}

impl InteractionState {
    fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Dragging { .. } => "dragging",
            InteractionState::BoxSelecting { .. } => "box selection",
            InteractionState::Connecting { .. } => "connecting",
        }
    }
}

impl fmt::Display for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owns one editing session
#[derive(Debug, Clone)]
pub struct Controller<H: HitTest = Geometry> {
    graph: Graph,
    selection: Selection,
    state: InteractionState,
    canvas: CanvasConfig,
    hit_test: H,
    document_path: Option<PathBuf>,
}

impl Controller<Geometry> {
    /// A session on a fresh two-terminal diagram
    pub fn new(canvas: CanvasConfig) -> Self {
        let hit_test = canvas.geometry();
        Self::with_hit_test(canvas, hit_test)
    }
}

impl<H: HitTest> Controller<H> {
    pub fn with_hit_test(canvas: CanvasConfig, hit_test: H) -> Self {
        let (zero, one) = canvas.terminal_positions();
        Self {
            graph: Graph::with_terminals(zero, one),
            selection: Selection::new(),
            state: InteractionState::Idle,
            canvas,
            hit_test,
            document_path: None,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Path of the last successful import or export
    pub fn document_path(&self) -> Option<&Path> {
        self.document_path.as_deref()
    }

    /// Remember `path` as the default for the next import or export
    pub fn set_document_path(&mut self, path: Option<PathBuf>) {
        self.document_path = path;
    }

    /// Replace the whole session with a validated graph
    pub fn load_graph(&mut self, graph: Graph, path: Option<PathBuf>) {
        self.graph = graph;
        self.selection.clear();
        self.set_state(InteractionState::Idle);
        self.document_path = path;
    }

    /// Short description of the current mode for status bars
    pub fn mode_label(&self) -> String {
        match &self.state {
            InteractionState::Idle => "Ready".to_string(),
            InteractionState::Dragging { moving, .. } => {
                format!("Dragging {} node(s)", moving.len())
            }
            InteractionState::BoxSelecting { .. } => "Box selecting".to_string(),
            InteractionState::Connecting { source, kind } => {
                format!("Connecting {} edge from '{}'", kind, self.label_of(*source))
            }
        }
    }

    /// The rubber band rectangle while box selecting
    pub fn selection_rect(&self) -> Option<Rect> {
        match self.state {
            InteractionState::BoxSelecting {
                origin, current, ..
            } => Some(Rect::from_corners(origin, current)),
            _ => None,
        }
    }

    /// Handle one event to completion, returning a status line for the user
    pub fn handle(&mut self, event: Event, dialogs: &mut dyn Dialogs) -> Result<Option<String>> {
        match event {
            Event::PointerDown { point, modifier } => self.pointer_down(point, modifier),
            Event::PointerMove { point } => {
                self.pointer_move(point);
                Ok(None)
            }
            Event::PointerUp { point } => Ok(self.pointer_up(point)),
            Event::Command(command) => self.command(command, dialogs),
        }
    }

    fn label_of(&self, id: NodeId) -> String {
        self.graph
            .node(id)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn set_state(&mut self, next: InteractionState) {
        if self.state.name() != next.name() {
            debug!("interaction: {} -> {}", self.state, next);
        }
        self.state = next;
    }

    // Pointer handling

    fn pointer_down(&mut self, point: Point, modifier: bool) -> Result<Option<String>> {
        let hit = self.hit_test.find_node_at(&self.graph, point);
        match self.state.clone() {
            InteractionState::Idle => Ok(self.press_idle(point, hit, modifier)),
            InteractionState::Connecting { source, kind } => {
                let Some(target) = hit else {
                    return Ok(None);
                };
                self.set_state(InteractionState::Idle);
                self.graph.add_edge(source, kind, target)?;
                Ok(Some(format!(
                    "Connected {} to {} with {} edge",
                    self.label_of(source),
                    self.label_of(target),
                    kind
                )))
            }
            // A press without a release in between; keep the current gesture
            InteractionState::Dragging { .. } | InteractionState::BoxSelecting { .. } => Ok(None),
        }
    }

    fn press_idle(&mut self, point: Point, hit: Option<NodeId>, modifier: bool) -> Option<String> {
        match (hit, modifier) {
            (Some(id), false) => {
                if self.selection.len() > 1 && self.selection.contains(id) {
                    self.selection.set_primary(id);
                } else {
                    self.selection.select_only(id);
                }
                let moving = self.selection.members().clone();
                self.set_state(InteractionState::Dragging {
                    anchor: point,
                    moving,
                });
                None
            }
            (Some(id), true) => {
                let label = self.label_of(id);
                Some(if self.selection.toggle(id) {
                    format!("Added '{}' to selection", label)
                } else {
                    format!("Removed '{}' from selection", label)
                })
            }
            (None, additive) => {
                if !additive {
                    self.selection.clear();
                }
                self.set_state(InteractionState::BoxSelecting {
                    origin: point,
                    current: point,
                    additive,
                });
                None
            }
        }
    }

    fn pointer_move(&mut self, point: Point) {
        match &mut self.state {
            InteractionState::Dragging { anchor, moving } => {
                let (dx, dy) = point.delta_from(*anchor);
                *anchor = point;
                self.graph.translate(moving.iter(), dx, dy);
            }
            InteractionState::BoxSelecting { current, .. } => *current = point,
            InteractionState::Idle | InteractionState::Connecting { .. } => {}
        }
    }

    fn pointer_up(&mut self, point: Point) -> Option<String> {
        match self.state.clone() {
            InteractionState::Dragging { .. } => {
                self.pointer_move(point);
                self.set_state(InteractionState::Idle);
                None
            }
            InteractionState::BoxSelecting {
                origin, additive, ..
            } => {
                let rect = Rect::from_corners(origin, point);
                let inside: Vec<NodeId> = self
                    .graph
                    .nodes()
                    .filter(|n| rect.contains(n.position))
                    .map(|n| n.id)
                    .collect();
                if additive {
                    self.selection.extend(inside);
                } else {
                    self.selection.replace(inside);
                }
                self.set_state(InteractionState::Idle);
                Some(format!("Selected {} node(s)", self.selection.len()))
            }
            InteractionState::Idle | InteractionState::Connecting { .. } => None,
        }
    }

    // Commands

    fn command(&mut self, command: Command, dialogs: &mut dyn Dialogs) -> Result<Option<String>> {
        if command == Command::Cancel {
            return Ok(self.cancel());
        }
        if matches!(
            self.state,
            InteractionState::Dragging { .. } | InteractionState::BoxSelecting { .. }
        ) {
            warn!("rejected {:?} during {}", command, self.state);
            return Err(Rejection::Busy(self.state.name()).into());
        }

        match command {
            Command::AddNode => self.add_node(dialogs),
            Command::SetRoot => {
                let id = self.require_primary()?;
                self.graph.set_root(id)?;
                Ok(Some(format!("Root set to '{}'", self.label_of(id))))
            }
            Command::StartConnect(kind) => {
                let id = self.require_primary()?;
                if let Some(node) = self.graph.node(id) {
                    if node.is_terminal() {
                        warn!("rejected connect from terminal {}", id);
                        return Err(Rejection::TerminalSource(node.label.clone()).into());
                    }
                }
                self.set_state(InteractionState::Connecting { source: id, kind });
                Ok(Some(format!(
                    "Click the target of the {} edge from '{}' (Esc cancels)",
                    kind,
                    self.label_of(id)
                )))
            }
            Command::ClearEdges => {
                let id = self.require_primary()?;
                let removed = self.graph.clear_edges(id)?;
                let label = self.label_of(id);
                Ok(Some(if removed {
                    format!("Cleared edges of '{}'", label)
                } else {
                    format!("'{}' has no edges", label)
                }))
            }
            Command::DeleteNode => self.delete_node(dialogs),
            Command::ClearAll => {
                if !dialogs.confirm("Delete every decision node?") {
                    return Ok(Some("Clear all cancelled".to_string()));
                }
                self.graph.clear_all();
                self.selection.clear();
                self.set_state(InteractionState::Idle);
                Ok(Some("Cleared all decision nodes".to_string()))
            }
            Command::Import => self.import(dialogs),
            Command::Export => self.export(dialogs),
            Command::Cancel => Ok(self.cancel()),
        }
    }

    fn require_primary(&self) -> Result<NodeId> {
        self.selection
            .primary()
            .ok_or_else(|| Rejection::NoSelection.into())
    }

    fn cancel(&mut self) -> Option<String> {
        let message = match self.state {
            InteractionState::Idle => return None,
            InteractionState::Dragging { .. } => "Drag finished",
            InteractionState::BoxSelecting { .. } => "Box selection cancelled",
            InteractionState::Connecting { .. } => "Connection cancelled",
        };
        self.set_state(InteractionState::Idle);
        Some(message.to_string())
    }

    fn add_node(&mut self, dialogs: &mut dyn Dialogs) -> Result<Option<String>> {
        let position = match self.selection.primary().and_then(|id| self.graph.node(id)) {
            Some(primary) => primary.position.offset(0.0, -self.canvas.new_node_offset),
            None => self.canvas.default_node_position(),
        };
        let proposed = self.graph.propose_label();
        let Some(text) = dialogs.ask_label(&proposed) else {
            return Ok(Some("Add node cancelled".to_string()));
        };
        let label = self.graph.confirm_label(&text);
        self.graph.add_node(NodeType::Decision, label.as_str(), position)?;
        Ok(Some(format!("Added decision node '{}'", label)))
    }

    fn delete_node(&mut self, dialogs: &mut dyn Dialogs) -> Result<Option<String>> {
        let id = self.require_primary()?;
        let label = self.label_of(id);
        if let Some(node) = self.graph.node(id) {
            if node.is_terminal() {
                warn!("rejected delete of terminal {}", id);
                return Err(Rejection::TerminalDelete(label).into());
            }
        }
        if !dialogs.confirm(&format!("Delete node '{}'?", label)) {
            return Ok(Some("Delete cancelled".to_string()));
        }
        self.graph.delete_node(id)?;
        self.selection.clear();
        self.set_state(InteractionState::Idle);
        Ok(Some(format!("Deleted node '{}'", label)))
    }

    fn import(&mut self, dialogs: &mut dyn Dialogs) -> Result<Option<String>> {
        let Some(path) = dialogs.open_for_import(self.document_path.as_deref()) else {
            return Ok(Some("Import cancelled".to_string()));
        };
        let graph = document::load(&path)?;
        let message = format!("Imported {} nodes from {}", graph.len(), path.display());
        info!("{}", message);
        self.load_graph(graph, Some(path));
        Ok(Some(message))
    }

    fn export(&mut self, dialogs: &mut dyn Dialogs) -> Result<Option<String>> {
        let Some(path) = dialogs.choose_export_path(self.document_path.as_deref()) else {
            return Ok(Some("Export cancelled".to_string()));
        };
        document::save(&self.graph, &path)?;
        let message = format!("Exported {} nodes to {}", self.graph.len(), path.display());
        self.document_path = Some(path);
        Ok(Some(message))
    }
}

impl Default for Controller<Geometry> {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}
