//! Application state for the TUI

use std::time::Instant;

use log::{error, warn};
use ratatui::layout::Rect;

use crate::controller::{Controller, Dialogs, Event};
use crate::error::{EditorError, Result};
use crate::geometry::Point;

use super::ui;
use super::views::canvas::Viewport;

/// How long a status message stays in the footer
const STATUS_SECS: u64 = 4;

/// Main application state
///
/// Cheap enough to clone, which is how prompts get a frozen backdrop to draw
/// behind themselves.
#[derive(Debug, Clone)]
pub struct App {
    pub controller: Controller,

    // View state
    pub viewport: Viewport,
    pub show_help: bool,

    // Terminal area, kept so mouse cells can be mapped into the canvas
    pub size: Rect,

    // Status message; the flag marks warnings
    pub status_message: Option<(String, Instant)>,
    pub status_is_warning: bool,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            viewport: Viewport::default(),
            show_help: false,
            size: Rect::new(0, 0, 80, 24),
            status_message: None,
            status_is_warning: false,
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
        self.status_is_warning = false;
    }

    pub fn set_warning(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
        self.status_is_warning = true;
    }

    pub fn tick(&mut self) {
        // Clear status message after a few seconds
        if let Some((_, shown_at)) = &self.status_message {
            if shown_at.elapsed().as_secs() >= STATUS_SECS {
                self.status_message = None;
            }
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = Rect::new(0, 0, width, height);
    }

    /// Inner area of the canvas view for the current terminal size
    pub fn canvas_area(&self) -> Rect {
        ui::layout(self.size).canvas_inner
    }

    /// Map a terminal cell to a model point, if it lies on the canvas
    pub fn cell_to_model(&self, column: u16, row: u16) -> Option<Point> {
        let area = self.canvas_area();
        Viewport::contains_cell(area, column, row)
            .then(|| self.viewport.cell_to_model(area, column, row))
    }

    /// Same as [`App::cell_to_model`] but extrapolates outside the canvas
    pub fn cell_to_model_unclamped(&self, column: u16, row: u16) -> Point {
        self.viewport.cell_to_model(self.canvas_area(), column, row)
    }

    /// Run one controller event and report the outcome in the footer
    ///
    /// Recoverable errors become warnings; anything else ends the session.
    pub fn dispatch(&mut self, event: Event, dialogs: &mut dyn Dialogs) -> Result<()> {
        match self.controller.handle(event, dialogs) {
            Ok(Some(message)) => self.set_status(message),
            Ok(None) => {}
            Err(err) if err.is_recoverable() => {
                if let EditorError::Rejected(_) = err {
                    warn!("{}", err);
                } else {
                    error!("{}", err);
                }
                self.set_warning(err.to_string());
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }
}
