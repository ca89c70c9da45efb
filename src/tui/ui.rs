//! UI rendering for the TUI

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::app::App;
use super::views::canvas;

/// Screen regions, derived from the terminal size alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub header: Rect,
    pub canvas: Rect,
    /// Canvas area inside its border; mouse cells are mapped against this
    pub canvas_inner: Rect,
    pub side: Rect,
    pub footer: Rect,
}

const SIDE_PANEL_WIDTH: u16 = 32;

pub fn layout(area: Rect) -> AppLayout {
    // Main layout: header, content, footer
    let main_layout = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(5),    // Content
        Constraint::Length(1), // Footer/status
    ])
    .split(area);

    let content_layout = Layout::horizontal([
        Constraint::Min(20),
        Constraint::Length(SIDE_PANEL_WIDTH),
    ])
    .split(main_layout[1]);

    let canvas = content_layout[0];
    AppLayout {
        header: main_layout[0],
        canvas,
        canvas_inner: Block::default().borders(Borders::ALL).inner(canvas),
        side: content_layout[1],
        footer: main_layout[2],
    }
}

/// Main draw function - orchestrates all rendering
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let regions = layout(area);

    draw_header(frame, app, regions.header);
    canvas::draw(frame, app, regions.canvas);
    draw_side_panel(frame, app, regions.side);
    draw_footer(frame, app, regions.footer);

    if app.show_help {
        draw_help_overlay(frame, area);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let graph = app.controller.graph();
    let document = app
        .controller
        .document_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "untitled".to_string());

    let header_text = format!(
        " OBDD Editor │ {} │ [{} nodes] [{} edges]",
        document,
        graph.len(),
        graph.edge_count()
    );

    let header =
        Paragraph::new(header_text).style(Style::default().bg(Color::Blue).fg(Color::White).bold());

    frame.render_widget(header, area);
}

fn section(title: &str) -> Line<'static> {
    Line::styled(
        format!(" {}", title),
        Style::default().fg(Color::Cyan).bold(),
    )
}

fn draw_side_panel(frame: &mut Frame, app: &App, area: Rect) {
    let controller = &app.controller;
    let graph = controller.graph();
    let selection = controller.selection();

    let label = |id| {
        graph
            .node(id)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| "?".to_string())
    };

    let primary = selection
        .primary()
        .map(|id| format!("'{}' (id {})", label(id), id))
        .unwrap_or_else(|| "none".to_string());
    let root = graph
        .root()
        .map(|id| format!("'{}'", label(id)))
        .unwrap_or_else(|| "none".to_string());

    let mut lines = vec![
        section("Mode"),
        Line::from(format!("  {}", controller.mode_label())),
        Line::raw(""),
        section("Selection"),
        Line::from(format!("  {} selected", selection.len())),
        Line::from(format!("  primary: {}", primary)),
        Line::raw(""),
        section("Diagram"),
        Line::from(format!("  root: {}", root)),
        Line::from(format!("  nodes: {}  edges: {}", graph.len(), graph.edge_count())),
        Line::from(format!("  next label: {}", graph.propose_label())),
        Line::raw(""),
        section("Keys"),
    ];

    let keys = [
        ("n", "add node"),
        ("r", "set root"),
        ("1 / 0", "connect high / low"),
        ("d", "clear edges"),
        ("x", "delete node"),
        ("C", "clear all"),
        ("e / i", "export / import"),
        ("Esc", "cancel"),
        ("?", "help"),
        ("q", "quit"),
    ];
    for (key, action) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<7}", key), Style::default().fg(Color::Yellow)),
            Span::raw(action),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("  ──", Style::default().fg(canvas::edge_color(crate::graph::EdgeKind::High))),
        Span::raw(" high   "),
        Span::styled("- -", Style::default().fg(canvas::edge_color(crate::graph::EdgeKind::Low))),
        Span::raw(" low"),
    ]));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(" Info ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(panel, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let keybinds = "click: select  shift/ctrl+click: toggle  drag: move/box  n:add  1/0:connect  ?:help  q:quit";

    // Show status message if present, otherwise show keybinds
    let (footer_text, style) = match &app.status_message {
        Some((msg, _)) if app.status_is_warning => (
            msg.clone(),
            Style::default().bg(Color::Red).fg(Color::White),
        ),
        Some((msg, _)) => (
            msg.clone(),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        None => (
            keybinds.to_string(),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
    };

    let footer = Paragraph::new(format!(" {}", footer_text)).style(style);

    frame.render_widget(footer, area);
}

fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    // Center the help popup
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 34.min(area.height.saturating_sub(2));

    let popup_area = Rect {
        x: (area.width - popup_width) / 2,
        y: (area.height - popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let help_text = r#"
  Editing
  ─────────────────────────────────
  n            Add decision node
  r            Make primary node the root
  1            Connect high edge (click target)
  0            Connect low edge (click target)
  d            Clear edges of primary node
  x, Delete    Delete primary node
  C            Clear all decision nodes
  Esc          Cancel connect / box select

  Mouse
  ─────────────────────────────────
  Click        Select node, drag to move
  Shift/Ctrl   Toggle node in selection
  Drag space   Box select (add with Shift)
  Wheel        Zoom

  View
  ─────────────────────────────────
  h/j/k/l      Pan view
  +/-          Zoom in/out
  z            Reset view

  Files
  ─────────────────────────────────
  e            Export diagram as JSON
  i            Import diagram from JSON
  q            Quit

  Press ? or Esc to close
"#;

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(help, popup_area);
}
