//! Canvas view - the editable diagram
//!
//! Model coordinates grow downward like a screen, while ratatui's canvas grows
//! upward, so every y is negated on the way in.

use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Rectangle},
        Block, Borders,
    },
};

use crate::controller::InteractionState;
use crate::geometry::Point;
use crate::graph::{EdgeKind, Node};
use crate::tui::app::App;

/// Model units covered by one terminal column at zoom 1
pub const UNITS_PER_COLUMN: f64 = 10.0;
/// Model units covered by one terminal row at zoom 1 (cells are about twice as tall as wide)
pub const UNITS_PER_ROW: f64 = 20.0;

const MIN_ZOOM: f64 = 0.25;
const MAX_ZOOM: f64 = 4.0;
const ZOOM_STEP: f64 = 1.25;
const DASH: f64 = 8.0;
const ARROW: f64 = 10.0;

/// Which part of the model is visible, and how large
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Model point shown at the top-left corner
    pub origin: Point,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: Point::default(),
            zoom: 1.0,
        }
    }
}

impl Viewport {
    fn column_width(&self) -> f64 {
        UNITS_PER_COLUMN / self.zoom
    }

    fn row_height(&self) -> f64 {
        UNITS_PER_ROW / self.zoom
    }

    pub fn contains_cell(area: Rect, column: u16, row: u16) -> bool {
        area.x <= column && column < area.right() && area.y <= row && row < area.bottom()
    }

    /// Model point at the center of a terminal cell inside `area`
    pub fn cell_to_model(&self, area: Rect, column: u16, row: u16) -> Point {
        let dx = f64::from(column) - f64::from(area.x) + 0.5;
        let dy = f64::from(row) - f64::from(area.y) + 0.5;
        Point::new(
            self.origin.x + dx * self.column_width(),
            self.origin.y + dy * self.row_height(),
        )
    }

    pub fn x_bounds(&self, area: Rect) -> [f64; 2] {
        [
            self.origin.x,
            self.origin.x + f64::from(area.width) * self.column_width(),
        ]
    }

    /// Canvas y bounds, already flipped
    pub fn y_bounds(&self, area: Rect) -> [f64; 2] {
        [
            -(self.origin.y + f64::from(area.height) * self.row_height()),
            -self.origin.y,
        ]
    }

    pub fn pan(&mut self, columns: i16, rows: i16) {
        self.origin = self.origin.offset(
            f64::from(columns) * self.column_width(),
            f64::from(rows) * self.row_height(),
        );
    }

    /// Zoom in (`steps > 0`) or out, keeping the center of `area` in place
    pub fn zoom(&mut self, steps: i32, area: Rect) {
        let [left, right] = self.x_bounds(area);
        let [bottom, top] = self.y_bounds(area);
        let center = Point::new((left + right) / 2.0, -(bottom + top) / 2.0);

        self.zoom = (self.zoom * ZOOM_STEP.powi(steps)).clamp(MIN_ZOOM, MAX_ZOOM);
        self.origin = Point::new(
            center.x - f64::from(area.width) * self.column_width() / 2.0,
            center.y - f64::from(area.height) * self.row_height() / 2.0,
        );
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Split a line into the visible dashes of a dashed stroke
pub fn dashed_segments(a: Point, b: Point, dash: f64) -> Vec<(Point, Point)> {
    let (dx, dy) = b.delta_from(a);
    let length = dx.hypot(dy);
    if length <= dash {
        return vec![(a, b)];
    }
    let (ux, uy) = (dx / length, dy / length);
    let mut segments = Vec::new();
    let mut start = 0.0;
    while start < length {
        let end = (start + dash).min(length);
        segments.push((a.offset(ux * start, uy * start), a.offset(ux * end, uy * end)));
        start += dash * 2.0;
    }
    segments
}

/// The two barbs of an arrow pointing at `tip` from `from`
pub fn arrow_head(from: Point, tip: Point, size: f64) -> [Point; 2] {
    let angle = (tip.y - from.y).atan2(tip.x - from.x);
    let spread = std::f64::consts::PI / 7.0;
    [angle + spread, angle - spread]
        .map(|a| Point::new(tip.x - size * a.cos(), tip.y - size * a.sin()))
}

fn segment(ctx: &mut Context, a: Point, b: Point, color: Color) {
    ctx.draw(&CanvasLine {
        x1: a.x,
        y1: -a.y,
        x2: b.x,
        y2: -b.y,
        color,
    });
}

fn draw_edge(ctx: &mut Context, a: Point, b: Point, kind: EdgeKind) {
    let color = edge_color(kind);
    match kind {
        EdgeKind::High => segment(ctx, a, b, color),
        EdgeKind::Low => {
            for (from, to) in dashed_segments(a, b, DASH) {
                segment(ctx, from, to, color);
            }
        }
    }
    for barb in arrow_head(a, b, ARROW) {
        segment(ctx, barb, b, color);
    }
}

pub fn edge_color(kind: EdgeKind) -> Color {
    match kind {
        EdgeKind::High => Color::White,
        EdgeKind::Low => Color::Gray,
    }
}

fn node_color(app: &App, node: &Node) -> Color {
    let controller = &app.controller;
    if let InteractionState::Connecting { source, .. } = controller.state() {
        if *source == node.id {
            return Color::Green;
        }
    }
    if controller.selection().primary() == Some(node.id) {
        Color::LightYellow
    } else if controller.selection().contains(node.id) {
        Color::Yellow
    } else if node.is_terminal() {
        Color::Cyan
    } else if node.is_root {
        Color::LightMagenta
    } else {
        Color::White
    }
}

/// Draw the canvas view
pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let viewport = app.viewport;
    let block = Block::default()
        .title(format!(
            " Canvas │ zoom: {}% │ [+/-] zoom  [h/j/k/l] pan  [z] reset ",
            (viewport.zoom * 100.0).round() as i32
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let controller = &app.controller;
    let graph = controller.graph();
    let geometry = controller.canvas().geometry();
    let column_width = viewport.column_width();

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds(viewport.x_bounds(inner_area))
        .y_bounds(viewport.y_bounds(inner_area))
        .paint(|ctx| {
            // Edges first so nodes are drawn over them
            for (source, kind, target) in graph.edges() {
                let (Some(from), Some(to)) = (graph.node(source), graph.node(target)) else {
                    continue;
                };
                if source == target {
                    let r = geometry.decision_radius;
                    ctx.draw(&Circle {
                        x: from.position.x + r,
                        y: -(from.position.y - r),
                        radius: r / 2.0,
                        color: edge_color(kind),
                    });
                } else if let Some((a, b)) = geometry.edge_endpoints(from, to) {
                    draw_edge(ctx, a, b, kind);
                }
            }

            for node in graph.nodes() {
                let color = node_color(app, node);
                let p = node.position;
                if node.is_terminal() {
                    let s = geometry.terminal_size;
                    ctx.draw(&Rectangle {
                        x: p.x - s / 2.0,
                        y: -(p.y + s / 2.0),
                        width: s,
                        height: s,
                        color,
                    });
                } else {
                    ctx.draw(&Circle {
                        x: p.x,
                        y: -p.y,
                        radius: geometry.decision_radius,
                        color,
                    });
                }
            }

            if let Some(root) = graph.root().and_then(|id| graph.node(id)) {
                let tip = root.position.offset(0.0, -geometry.outline_offset(root));
                let tail = tip.offset(0.0, -40.0);
                segment(ctx, tail, tip, Color::LightMagenta);
                for barb in arrow_head(tail, tip, ARROW) {
                    segment(ctx, barb, tip, Color::LightMagenta);
                }
                ctx.print(
                    tail.x + column_width,
                    -tail.y,
                    Span::styled("ROOT", Style::default().fg(Color::LightMagenta).bold()),
                );
            }

            if let Some(rect) = controller.selection_rect() {
                ctx.draw(&Rectangle {
                    x: rect.min.x,
                    y: -rect.max.y,
                    width: rect.width(),
                    height: rect.height(),
                    color: Color::Cyan,
                });
            }

            // Labels on top
            ctx.layer();
            for node in graph.nodes() {
                let half = node.label.chars().count() as f64 * column_width / 2.0;
                ctx.print(
                    node.position.x - half,
                    -node.position.y,
                    Span::styled(
                        node.label.clone(),
                        Style::default().fg(node_color(app, node)).bold(),
                    ),
                );
            }
        });

    frame.render_widget(canvas, inner_area);
}
