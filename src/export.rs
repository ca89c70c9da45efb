//! Graphviz DOT export for diagrams
//!
//! Decision nodes become circles, terminals become boxes. High edges are
//! solid, low edges dashed and gray, and the root gets an incoming arrow from
//! an invisible point.

use std::collections::BTreeSet;
use std::fmt::{self, Write};

use crate::graph::{EdgeKind, Graph, Node, NodeId};

/// Configuration for DOT export
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Title for the graph
    pub title: Option<String>,
    /// Include node IDs in labels
    pub show_ids: bool,
    /// Orientation: "TB" (top-bottom), "LR" (left-right)
    pub rankdir: String,
    /// Only emit nodes reachable from the root (everything when there is no root)
    pub reachable_only: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            title: None,
            show_ids: false,
            rankdir: "TB".to_string(),
            reachable_only: false,
        }
    }
}

fn node_shape(node: &Node) -> &'static str {
    if node.is_terminal() {
        "box"
    } else {
        "circle"
    }
}

fn node_color(node: &Node) -> &'static str {
    if node.is_terminal() {
        "#F5F5F5" // White smoke
    } else if node.is_root {
        "#FFE4B5" // Moccasin
    } else {
        "#E6E6FA" // Lavender
    }
}

fn edge_attrs(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::High => "style=\"solid\" color=\"#333333\"",
        EdgeKind::Low => "style=\"dashed\" color=\"#808080\"",
    }
}

/// Escape a string for DOT labels
fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Ids of every node reachable from `start` along low and high edges
pub fn reachable_from(graph: &Graph, start: NodeId) -> BTreeSet<NodeId> {
    let mut seen = BTreeSet::new();
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        let Some(node) = graph.node(id) else {
            continue;
        };
        if seen.insert(id) {
            stack.extend(node.edges().map(|(_, target)| target));
        }
    }
    seen
}

/// Convert a diagram to DOT format
pub fn graph_to_dot(graph: &Graph, config: &DotConfig) -> String {
    let mut dot = String::new();
    // Formatting into a String never fails
    let _ = write_dot(&mut dot, graph, config);
    dot
}

fn write_dot(dot: &mut impl Write, graph: &Graph, config: &DotConfig) -> fmt::Result {
    let keep: Option<BTreeSet<NodeId>> = match (config.reachable_only, graph.root()) {
        (true, Some(root)) => Some(reachable_from(graph, root)),
        _ => None,
    };
    let included = |id: NodeId| match &keep {
        Some(k) => k.contains(&id),
        None => true,
    };

    // Graph header
    writeln!(dot, "digraph OBDD {{")?;
    writeln!(dot, "  rankdir={};", config.rankdir)?;
    writeln!(dot, "  node [fontname=\"Arial\" fontsize=10 style=\"filled\"];")?;
    writeln!(dot, "  edge [fontname=\"Arial\" fontsize=9];")?;

    if let Some(title) = &config.title {
        writeln!(dot, "  label=\"{}\";", escape_dot(title))?;
        writeln!(dot, "  labelloc=t;")?;
        writeln!(dot, "  fontsize=14;")?;
    }
    writeln!(dot)?;

    // Nodes
    for node in graph.nodes().filter(|n| included(n.id)) {
        let label = if config.show_ids {
            format!("[{}] {}", node.id, node.label)
        } else {
            node.label.clone()
        };
        writeln!(
            dot,
            "  n{} [label=\"{}\" shape=\"{}\" fillcolor=\"{}\"];",
            node.id,
            escape_dot(&label),
            node_shape(node),
            node_color(node)
        )?;
    }

    // Terminals share the bottom rank
    let terminals: Vec<String> = graph
        .nodes()
        .filter(|n| n.is_terminal() && included(n.id))
        .map(|n| format!("n{}", n.id))
        .collect();
    if !terminals.is_empty() {
        writeln!(dot, "  {{ rank=sink; {}; }}", terminals.join("; "))?;
    }

    writeln!(dot)?;

    if let Some(root) = graph.root() {
        writeln!(dot, "  root [shape=\"point\" style=\"invis\"];")?;
        writeln!(dot, "  root -> n{} [label=\"ROOT\"];", root)?;
    }

    // Edges
    for (source, kind, target) in graph.edges() {
        if !included(source) {
            continue;
        }
        writeln!(dot, "  n{} -> n{} [{}];", source, target, edge_attrs(kind))?;
    }

    writeln!(dot, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::graph::NodeType;

    fn sample_graph() -> Graph {
        let mut graph = Graph::default();
        let p = graph
            .add_node(NodeType::Decision, "p", Point::new(400.0, 200.0))
            .unwrap();
        let q = graph
            .add_node(NodeType::Decision, "q", Point::new(300.0, 300.0))
            .unwrap();
        graph.add_edge(p, EdgeKind::Low, q).unwrap();
        graph.add_edge(p, EdgeKind::High, 1).unwrap();
        graph.add_edge(q, EdgeKind::Low, 0).unwrap();
        graph.set_root(p).unwrap();
        graph
    }

    #[test]
    fn test_graph_to_dot() {
        let dot = graph_to_dot(&sample_graph(), &DotConfig::default());

        assert!(dot.starts_with("digraph OBDD {"));
        assert!(dot.contains("n2 [label=\"p\" shape=\"circle\""));
        assert!(dot.contains("n0 [label=\"0\" shape=\"box\""));
        assert!(dot.contains("n2 -> n3 [style=\"dashed\""));
        assert!(dot.contains("n2 -> n1 [style=\"solid\""));
        assert!(dot.contains("root -> n2 [label=\"ROOT\"]"));
        assert!(dot.contains("{ rank=sink; n0; n1; }"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_title_and_ids() {
        let config = DotConfig {
            title: Some("f = \"p\"".to_string()),
            show_ids: true,
            rankdir: "LR".to_string(),
            ..DotConfig::default()
        };
        let dot = graph_to_dot(&sample_graph(), &config);
        assert!(dot.contains("rankdir=LR;"));
        assert!(dot.contains("label=\"f = \\\"p\\\"\";"));
        assert!(dot.contains("label=\"[2] p\""));
    }

    #[test]
    fn test_no_root_marker_without_root() {
        let dot = graph_to_dot(&Graph::default(), &DotConfig::default());
        assert!(!dot.contains("ROOT"));
        assert!(!dot.contains("->"));
    }

    #[test]
    fn test_reachable_only() {
        let mut graph = sample_graph();
        graph
            .add_node(NodeType::Decision, "r", Point::default())
            .unwrap();

        assert_eq!(
            reachable_from(&graph, 2),
            [0, 1, 2, 3].into_iter().collect::<BTreeSet<_>>()
        );

        let config = DotConfig {
            reachable_only: true,
            ..DotConfig::default()
        };
        let dot = graph_to_dot(&graph, &config);
        assert!(!dot.contains("n4 ["));
        assert!(dot.contains("n3 ["));
    }

    #[test]
    fn test_escape_dot() {
        assert_eq!(escape_dot("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
    }
}
