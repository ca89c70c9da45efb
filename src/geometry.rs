//! Canvas geometry: points, selection rectangles, hit testing
//!
//! Decision nodes are hit as circles and terminal nodes as squares, both
//! centered on the node position. Coordinates follow the canvas convention of
//! x growing right and y growing down.

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, Node, NodeId};

/// A location on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Displacement from `origin` to `self`
    pub fn delta_from(self, origin: Point) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// Axis-aligned rectangle with inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Normalize two opposite corners into a rectangle
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Resolves a canvas point to the node drawn there
pub trait HitTest {
    fn find_node_at(&self, graph: &Graph, point: Point) -> Option<NodeId>;
}

/// Node shapes and sizes used for hit testing and edge clipping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub decision_radius: f64,
    pub terminal_size: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            decision_radius: 25.0,
            terminal_size: 40.0,
        }
    }
}

impl Geometry {
    /// Whether `point` falls inside the node's outline
    pub fn contains(&self, node: &Node, point: Point) -> bool {
        let (dx, dy) = point.delta_from(node.position);
        if node.is_terminal() {
            let half = self.terminal_size / 2.0;
            dx.abs() <= half && dy.abs() <= half
        } else {
            dx * dx + dy * dy <= self.decision_radius * self.decision_radius
        }
    }

    /// Distance from a node's center to its outline along a ray
    pub fn outline_offset(&self, node: &Node) -> f64 {
        if node.is_terminal() {
            self.terminal_size / 2.0
        } else {
            self.decision_radius
        }
    }

    /// Start and end points of an edge, clipped to both node outlines
    ///
    /// Returns `None` when the nodes sit on top of each other.
    pub fn edge_endpoints(&self, from: &Node, to: &Node) -> Option<(Point, Point)> {
        let (dx, dy) = to.position.delta_from(from.position);
        let distance = (dx * dx + dy * dy).sqrt();
        if distance < 1.0 {
            return None;
        }
        let (ux, uy) = (dx / distance, dy / distance);
        let start_offset = self.outline_offset(from);
        let end_offset = self.outline_offset(to);
        Some((
            from.position.offset(ux * start_offset, uy * start_offset),
            to.position.offset(-ux * end_offset, -uy * end_offset),
        ))
    }
}

impl HitTest for Geometry {
    fn find_node_at(&self, graph: &Graph, point: Point) -> Option<NodeId> {
        graph
            .nodes()
            .find(|node| self.contains(node, point))
            .map(|node| node.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeType;

    fn graph_with_decision_at(x: f64, y: f64) -> (Graph, NodeId) {
        let mut graph = Graph::with_terminals(Point::new(0.0, 500.0), Point::new(300.0, 500.0));
        let id = graph
            .add_node(NodeType::Decision, "p", Point::new(x, y))
            .unwrap();
        (graph, id)
    }

    #[test]
    fn test_rect_is_inclusive_and_normalized() {
        let rect = Rect::from_corners(Point::new(10.0, 50.0), Point::new(0.0, 20.0));
        assert_eq!(rect.min, Point::new(0.0, 20.0));
        assert_eq!(rect.max, Point::new(10.0, 50.0));
        assert!(rect.contains(Point::new(0.0, 20.0)));
        assert!(rect.contains(Point::new(10.0, 50.0)));
        assert!(!rect.contains(Point::new(10.1, 30.0)));
        assert_eq!(rect.width(), 10.0);
        assert_eq!(rect.height(), 30.0);
    }

    #[test]
    fn test_hit_decision_circle() {
        let (graph, id) = graph_with_decision_at(100.0, 100.0);
        let geometry = Geometry::default();
        assert_eq!(geometry.find_node_at(&graph, Point::new(100.0, 100.0)), Some(id));
        assert_eq!(geometry.find_node_at(&graph, Point::new(125.0, 100.0)), Some(id));
        // Inside the bounding square but outside the circle
        assert_eq!(geometry.find_node_at(&graph, Point::new(120.0, 120.0)), None);
    }

    #[test]
    fn test_hit_terminal_square() {
        let (graph, _) = graph_with_decision_at(100.0, 100.0);
        let geometry = Geometry::default();
        // Corner of the 40x40 square around terminal "0" at (0, 500)
        assert_eq!(geometry.find_node_at(&graph, Point::new(20.0, 520.0)), Some(0));
        assert_eq!(geometry.find_node_at(&graph, Point::new(21.0, 500.0)), None);
        assert_eq!(geometry.find_node_at(&graph, Point::new(300.0, 480.0)), Some(1));
    }

    #[test]
    fn test_edge_endpoints_are_clipped() {
        let (graph, id) = graph_with_decision_at(0.0, 400.0);
        let geometry = Geometry::default();
        let from = graph.node(id).unwrap();
        let to = graph.node(0).unwrap();
        let (start, end) = geometry.edge_endpoints(from, to).unwrap();
        assert_eq!(start, Point::new(0.0, 425.0));
        assert_eq!(end, Point::new(0.0, 480.0));
    }

    #[test]
    fn test_edge_endpoints_for_overlapping_nodes() {
        let (graph, id) = graph_with_decision_at(0.0, 500.0);
        let geometry = Geometry::default();
        let from = graph.node(id).unwrap();
        let to = graph.node(0).unwrap();
        assert!(geometry.edge_endpoints(from, to).is_none());
    }
}
