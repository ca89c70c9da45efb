//! End-to-end editing sessions driven through the controller
//!
//! Each test plays a short session of pointer events and commands against a
//! scripted set of dialogs, then checks the graph, the selection and the
//! exported document.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use test_log::test;

use obdd_editor::{
    document, Command, Controller, Dialogs, EdgeKind, EditorError, Event, InteractionState, Point,
    Rejection,
};

/// Dialog answers queued up front, consumed in order
#[derive(Default)]
struct Scripted {
    confirms: VecDeque<bool>,
    labels: VecDeque<Option<String>>,
    paths: VecDeque<Option<PathBuf>>,
}

impl Scripted {
    fn label(mut self, text: &str) -> Self {
        self.labels.push_back(Some(text.to_string()));
        self
    }

    fn confirm(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }

    fn path(mut self, path: PathBuf) -> Self {
        self.paths.push_back(Some(path));
        self
    }
}

impl Dialogs for Scripted {
    fn confirm(&mut self, _message: &str) -> bool {
        self.confirms.pop_front().unwrap_or(false)
    }

    fn ask_label(&mut self, _suggested: &str) -> Option<String> {
        self.labels.pop_front().unwrap_or(None)
    }

    fn open_for_import(&mut self, _default: Option<&Path>) -> Option<PathBuf> {
        self.paths.pop_front().unwrap_or(None)
    }

    fn choose_export_path(&mut self, _default: Option<&Path>) -> Option<PathBuf> {
        self.paths.pop_front().unwrap_or(None)
    }
}

struct Session {
    controller: Controller,
    dialogs: Scripted,
}

impl Session {
    fn new(dialogs: Scripted) -> Self {
        Self {
            controller: Controller::default(),
            dialogs,
        }
    }

    fn send(&mut self, event: Event) -> Result<Option<String>, EditorError> {
        let result = self.controller.handle(event, &mut self.dialogs);
        self.controller
            .graph()
            .check_invariants()
            .expect("graph invariants hold after every event");
        result
    }

    fn command(&mut self, command: Command) -> Result<Option<String>, EditorError> {
        self.send(Event::Command(command))
    }

    fn press(&mut self, x: f64, y: f64, modifier: bool) -> Option<String> {
        self.send(Event::PointerDown {
            point: Point::new(x, y),
            modifier,
        })
        .unwrap()
    }

    fn drag_to(&mut self, x: f64, y: f64) {
        self.send(Event::PointerMove {
            point: Point::new(x, y),
        })
        .unwrap();
    }

    fn release(&mut self, x: f64, y: f64) -> Option<String> {
        self.send(Event::PointerUp {
            point: Point::new(x, y),
        })
        .unwrap()
    }

    fn click(&mut self, x: f64, y: f64) -> Option<String> {
        let down = self.press(x, y, false);
        let up = self.release(x, y);
        down.or(up)
    }

    fn position(&self, id: u64) -> Point {
        self.controller.graph().node(id).unwrap().position
    }
}

fn rejection(result: Result<Option<String>, EditorError>) -> Rejection {
    match result {
        Err(EditorError::Rejected(r)) => r,
        other => panic!("expected a rejection, got {:?}", other),
    }
}

// =============================================================================
// Building a diagram
// =============================================================================

#[test]
fn test_build_single_variable_diagram_and_export() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("p.json");
    let mut s = Session::new(Scripted::default().label("").path(out.clone()));

    assert_eq!(
        s.command(Command::AddNode).unwrap().as_deref(),
        Some("Added decision node 'p'")
    );
    assert_eq!(s.position(2), Point::new(400.0, 200.0));

    s.click(400.0, 200.0);
    assert_eq!(s.controller.selection().primary(), Some(2));

    s.command(Command::StartConnect(EdgeKind::Low)).unwrap();
    assert_eq!(
        s.click(160.0, 498.0).as_deref(),
        Some("Connected p to 0 with low edge")
    );
    s.command(Command::StartConnect(EdgeKind::High)).unwrap();
    s.click(640.0, 498.0);
    s.command(Command::SetRoot).unwrap();

    let message = s.command(Command::Export).unwrap().unwrap();
    assert!(message.starts_with("Exported 3 nodes to "));
    assert_eq!(s.controller.document_path(), Some(out.as_path()));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["root"], serde_json::json!(2));
    let nodes = value["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["label"], "0");
    assert_eq!(nodes[0]["is_terminal"], true);
    assert!(nodes[0].get("low").is_none());
    assert_eq!(nodes[2]["label"], "p");
    assert_eq!(nodes[2]["low"], serde_json::json!(0));
    assert_eq!(nodes[2]["high"], serde_json::json!(1));
}

#[test]
fn test_second_node_is_placed_above_primary() {
    let mut s = Session::new(Scripted::default().label("").label("r"));
    s.command(Command::AddNode).unwrap();
    s.click(400.0, 200.0);
    assert_eq!(
        s.command(Command::AddNode).unwrap().as_deref(),
        Some("Added decision node 'r'")
    );
    assert_eq!(s.position(3), Point::new(400.0, 120.0));
}

// =============================================================================
// Selection and dragging
// =============================================================================

#[test]
fn test_box_select_then_drag_group() {
    let mut s = Session::new(Scripted::default().label("").label(""));
    s.command(Command::AddNode).unwrap();
    s.click(400.0, 200.0);
    s.command(Command::AddNode).unwrap();
    assert_eq!(s.position(3), Point::new(400.0, 120.0));

    // Start on empty canvas
    s.press(350.0, 90.0, false);
    assert!(matches!(
        s.controller.state(),
        InteractionState::BoxSelecting { .. }
    ));
    assert!(s.controller.selection().is_empty());
    s.drag_to(450.0, 250.0);
    assert_eq!(s.release(450.0, 250.0).as_deref(), Some("Selected 2 node(s)"));
    assert!(s.controller.selection().contains(2));
    assert!(s.controller.selection().contains(3));

    // Grabbing a member drags the whole group
    s.press(400.0, 120.0, false);
    assert_eq!(s.controller.selection().primary(), Some(3));
    s.drag_to(405.0, 118.0);
    s.drag_to(410.0, 115.0);
    s.release(410.0, 115.0);

    assert_eq!(s.position(2), Point::new(410.0, 195.0));
    assert_eq!(s.position(3), Point::new(410.0, 115.0));
    assert_eq!(s.position(0), Point::new(160.0, 498.0));
    assert_eq!(s.controller.state(), &InteractionState::Idle);
}

#[test]
fn test_box_select_replaces_unless_modifier_held() {
    let mut s = Session::new(Scripted::default());

    // Select terminal 0 alone
    s.click(160.0, 498.0);
    assert_eq!(s.controller.selection().len(), 1);

    // A box around terminal 1 replaces the selection
    s.press(600.0, 450.0, false);
    s.release(680.0, 540.0);
    assert_eq!(s.controller.selection().len(), 1);
    assert!(s.controller.selection().contains(1));

    // With the modifier the box adds to it
    s.press(100.0, 450.0, true);
    s.release(200.0, 540.0);
    assert_eq!(s.controller.selection().len(), 2);
}

#[test]
fn test_modifier_click_toggles_membership() {
    let mut s = Session::new(Scripted::default());

    assert_eq!(
        s.press(160.0, 498.0, true).as_deref(),
        Some("Added '0' to selection")
    );
    assert_eq!(
        s.press(640.0, 498.0, true).as_deref(),
        Some("Added '1' to selection")
    );
    assert_eq!(s.controller.selection().len(), 2);
    assert_eq!(
        s.press(160.0, 498.0, true).as_deref(),
        Some("Removed '0' from selection")
    );
    assert_eq!(s.controller.selection().len(), 1);
    assert_eq!(s.controller.selection().primary(), Some(1));
    assert_eq!(s.controller.state(), &InteractionState::Idle);
}

#[test]
fn test_commands_are_busy_during_gestures() {
    let mut s = Session::new(Scripted::default().label(""));

    s.press(20.0, 20.0, false);
    assert_eq!(
        rejection(s.command(Command::AddNode)),
        Rejection::Busy("box selection")
    );
    assert_eq!(s.controller.graph().len(), 2);

    assert_eq!(
        s.command(Command::Cancel).unwrap().as_deref(),
        Some("Box selection cancelled")
    );
    assert!(s.command(Command::AddNode).is_ok());
    assert_eq!(s.controller.graph().len(), 3);
}

// =============================================================================
// Connecting
// =============================================================================

#[test]
fn test_connect_survives_empty_click_and_cancels() {
    let mut s = Session::new(Scripted::default().label(""));
    s.command(Command::AddNode).unwrap();
    s.click(400.0, 200.0);

    s.command(Command::StartConnect(EdgeKind::High)).unwrap();
    assert_eq!(s.click(20.0, 20.0), None);
    assert!(matches!(
        s.controller.state(),
        InteractionState::Connecting {
            source: 2,
            kind: EdgeKind::High
        }
    ));

    assert_eq!(
        s.command(Command::Cancel).unwrap().as_deref(),
        Some("Connection cancelled")
    );
    assert_eq!(s.controller.state(), &InteractionState::Idle);
    assert_eq!(s.controller.graph().edge_count(), 0);
}

#[test]
fn test_connecting_twice_replaces_edge() {
    let mut s = Session::new(Scripted::default().label(""));
    s.command(Command::AddNode).unwrap();
    s.click(400.0, 200.0);

    for (x, y) in [(160.0, 498.0), (640.0, 498.0)] {
        s.command(Command::StartConnect(EdgeKind::Low)).unwrap();
        s.click(x, y);
    }
    let p = s.controller.graph().node(2).unwrap();
    assert_eq!(p.edge(EdgeKind::Low), Some(1));
    assert_eq!(s.controller.graph().edge_count(), 1);
}

#[test]
fn test_terminal_cannot_start_connection() {
    let mut s = Session::new(Scripted::default());
    s.click(160.0, 498.0);
    assert_eq!(
        rejection(s.command(Command::StartConnect(EdgeKind::Low))),
        Rejection::TerminalSource("0".to_string())
    );
    assert_eq!(s.controller.state(), &InteractionState::Idle);
}

// =============================================================================
// Deleting
// =============================================================================

#[test]
fn test_delete_removes_incoming_edges_and_root() {
    let mut s = Session::new(Scripted::default().label("").label("").confirm(true));
    s.command(Command::AddNode).unwrap();
    s.click(400.0, 200.0);
    s.command(Command::AddNode).unwrap();

    // p -low-> q, q is root
    s.command(Command::StartConnect(EdgeKind::Low)).unwrap();
    s.click(400.0, 120.0);
    assert_eq!(s.controller.graph().node(2).unwrap().edge(EdgeKind::Low), Some(3));
    s.click(400.0, 120.0);
    s.command(Command::SetRoot).unwrap();
    assert_eq!(s.controller.graph().root(), Some(3));

    assert_eq!(
        s.command(Command::DeleteNode).unwrap().as_deref(),
        Some("Deleted node 'q'")
    );
    let graph = s.controller.graph();
    assert!(graph.node(3).is_none());
    assert_eq!(graph.node(2).unwrap().edge(EdgeKind::Low), None);
    assert_eq!(graph.root(), None);
    assert!(s.controller.selection().is_empty());
}

#[test]
fn test_declined_delete_keeps_node() {
    let mut s = Session::new(Scripted::default().label("").confirm(false));
    s.command(Command::AddNode).unwrap();
    s.click(400.0, 200.0);
    assert_eq!(
        s.command(Command::DeleteNode).unwrap().as_deref(),
        Some("Delete cancelled")
    );
    assert!(s.controller.graph().node(2).is_some());
}

#[test]
fn test_clear_all_restarts_labels() {
    let mut s = Session::new(Scripted::default().label("").confirm(true).label(""));
    s.command(Command::AddNode).unwrap();
    s.command(Command::ClearAll).unwrap();
    assert_eq!(s.controller.graph().len(), 2);

    s.command(Command::AddNode).unwrap();
    let added = s.controller.graph().nodes().last().unwrap();
    assert_eq!(added.label, "p");
    assert_eq!(added.id, 3);
}

// =============================================================================
// Import
// =============================================================================

#[test]
fn test_failed_import_leaves_session_untouched() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(
        &bad,
        r#"{"root": 9, "nodes": [
            {"id": 0, "label": "0", "x": 0, "y": 0, "is_terminal": true},
            {"id": 1, "label": "1", "x": 0, "y": 0, "is_terminal": true}
        ]}"#,
    )
    .unwrap();

    let mut s = Session::new(Scripted::default().label("").path(bad));
    s.command(Command::AddNode).unwrap();
    s.click(400.0, 200.0);

    let err = s.command(Command::Import).unwrap_err();
    assert!(matches!(err, EditorError::Validation(_)), "{:?}", err);
    assert!(err.is_recoverable());
    assert_eq!(s.controller.graph().len(), 3);
    assert_eq!(s.controller.selection().primary(), Some(2));
    assert_eq!(s.controller.document_path(), None);
}

#[test]
fn test_import_replaces_graph_and_continues_ids() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.json");
    let mut source = Controller::default();
    let mut d = Scripted::default().label("").label("");
    source.handle(Event::Command(Command::AddNode), &mut d).unwrap();
    source.handle(Event::Command(Command::AddNode), &mut d).unwrap();
    document::save(source.graph(), &path).unwrap();

    let mut s = Session::new(Scripted::default().path(path.clone()).label(""));
    assert_eq!(
        s.command(Command::Import).unwrap(),
        Some(format!("Imported 4 nodes from {}", path.display()))
    );
    assert_eq!(s.controller.document_path(), Some(path.as_path()));

    s.command(Command::AddNode).unwrap();
    let added = s.controller.graph().nodes().last().unwrap();
    assert_eq!(added.id, 4);
    assert_eq!(added.label, "r");
}
