//! Event handling for the TUI
//!
//! Applies a [`Msg`] to the [`App`]: view messages change the viewport,
//! everything else is forwarded to the controller.

use log::debug;

use crate::controller::{Dialogs, Event};
use crate::error::Result;

use super::app::App;
use super::msg::Msg;

/// Handle a message, returns true if app should quit
pub fn handle_msg(app: &mut App, msg: Msg, dialogs: &mut dyn Dialogs) -> Result<bool> {
    match msg {
        Msg::Quit => return Ok(true),
        Msg::Noop => {}
        Msg::Tick => app.tick(),
        Msg::Resize(width, height) => app.resize(width, height),
        Msg::ToggleHelp => app.show_help = !app.show_help,

        Msg::Pan { columns, rows } => app.viewport.pan(columns, rows),
        Msg::ZoomIn => {
            let area = app.canvas_area();
            app.viewport.zoom(1, area);
        }
        Msg::ZoomOut => {
            let area = app.canvas_area();
            app.viewport.zoom(-1, area);
        }
        Msg::ResetView => app.viewport.reset(),

        Msg::Edit(command) => app.dispatch(Event::Command(command), dialogs)?,

        // Presses only count on the canvas; moves and releases may wander off it
        Msg::PointerDown {
            column,
            row,
            modifier,
        } => {
            if let Some(point) = app.cell_to_model(column, row) {
                debug!("pointer down at ({:.0}, {:.0})", point.x, point.y);
                app.dispatch(Event::PointerDown { point, modifier }, dialogs)?;
            }
        }
        Msg::PointerMove { column, row } => {
            let point = app.cell_to_model_unclamped(column, row);
            app.dispatch(Event::PointerMove { point }, dialogs)?;
        }
        Msg::PointerUp { column, row } => {
            let point = app.cell_to_model_unclamped(column, row);
            app.dispatch(Event::PointerUp { point }, dialogs)?;
        }
    }
    Ok(false)
}
