//! Message types for the TUI
//!
//! Terminal input is first translated into a [`Msg`] by pure functions, so
//! key bindings can be tested without a terminal. Messages are named by what
//! the user asked for; [`super::events`] decides what that means.

use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::controller::Command;
use crate::graph::EdgeKind;

/// All possible messages/actions in the TUI
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    // === Editing ===
    /// Forward a command to the controller
    Edit(Command),

    // === Pointer (terminal cell coordinates) ===
    PointerDown { column: u16, row: u16, modifier: bool },
    PointerMove { column: u16, row: u16 },
    PointerUp { column: u16, row: u16 },

    // === View ===
    /// Pan the canvas by whole cells
    Pan { columns: i16, rows: i16 },
    ZoomIn,
    ZoomOut,
    ResetView,
    ToggleHelp,

    // === Lifecycle ===
    Quit,
    Tick,
    Resize(u16, u16),

    /// No operation (for unhandled keys)
    Noop,
}

impl Msg {
    /// Messages that may open a prompt while being handled
    pub fn may_prompt(&self) -> bool {
        matches!(
            self,
            Msg::Edit(
                Command::AddNode
                    | Command::DeleteNode
                    | Command::ClearAll
                    | Command::Import
                    | Command::Export
            )
        )
    }
}

const PAN_STEP: i16 = 4;

/// Convert a key press to a message
pub fn key_to_msg(code: KeyCode, modifiers: KeyModifiers, help_open: bool) -> Msg {
    if help_open {
        return match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Msg::ToggleHelp,
            _ => Msg::Noop,
        };
    }

    match code {
        // Quit
        KeyCode::Char('q') => Msg::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Msg::Quit,

        // Editing
        KeyCode::Char('n') => Msg::Edit(Command::AddNode),
        KeyCode::Char('r') => Msg::Edit(Command::SetRoot),
        KeyCode::Char('1') => Msg::Edit(Command::StartConnect(EdgeKind::High)),
        KeyCode::Char('0') => Msg::Edit(Command::StartConnect(EdgeKind::Low)),
        KeyCode::Char('d') => Msg::Edit(Command::ClearEdges),
        KeyCode::Char('x') | KeyCode::Delete => Msg::Edit(Command::DeleteNode),
        KeyCode::Char('C') => Msg::Edit(Command::ClearAll),
        KeyCode::Char('e') => Msg::Edit(Command::Export),
        KeyCode::Char('i') => Msg::Edit(Command::Import),
        KeyCode::Esc => Msg::Edit(Command::Cancel),

        // View
        KeyCode::Char('h') | KeyCode::Left => Msg::Pan {
            columns: -PAN_STEP,
            rows: 0,
        },
        KeyCode::Char('l') | KeyCode::Right => Msg::Pan {
            columns: PAN_STEP,
            rows: 0,
        },
        KeyCode::Char('k') | KeyCode::Up => Msg::Pan {
            columns: 0,
            rows: -PAN_STEP / 2,
        },
        KeyCode::Char('j') | KeyCode::Down => Msg::Pan {
            columns: 0,
            rows: PAN_STEP / 2,
        },
        KeyCode::Char('+') | KeyCode::Char('=') => Msg::ZoomIn,
        KeyCode::Char('-') => Msg::ZoomOut,
        KeyCode::Char('z') => Msg::ResetView,
        KeyCode::Char('?') => Msg::ToggleHelp,

        _ => Msg::Noop,
    }
}

/// Convert a mouse event to a message; only the left button edits
pub fn mouse_to_msg(mouse: MouseEvent) -> Msg {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Msg::PointerDown {
            column,
            row,
            modifier: mouse
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::CONTROL),
        },
        MouseEventKind::Drag(MouseButton::Left) => Msg::PointerMove { column, row },
        MouseEventKind::Up(MouseButton::Left) => Msg::PointerUp { column, row },
        MouseEventKind::ScrollUp => Msg::ZoomIn,
        MouseEventKind::ScrollDown => Msg::ZoomOut,
        _ => Msg::Noop,
    }
}

/// Check if a message should cause the app to quit
pub fn is_quit(msg: &Msg) -> bool {
    matches!(msg, Msg::Quit)
}
