//! Terminal implementation of the controller's prompts
//!
//! Each prompt runs its own blocking read loop, redrawing a snapshot of the
//! editor with the prompt on top until the user answers.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use crossterm::event::{read, Event, KeyEventKind};
use log::warn;
use ratatui::prelude::*;

use crate::controller::Dialogs;

use super::app::App;
use super::ui;
use super::widgets::prompt::{self, Prompt, PromptOutcome};

/// Prompts drawn over a frozen copy of the editor
pub struct TerminalDialogs<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    backdrop: &'a App,
}

impl<'a, B: Backend> TerminalDialogs<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>, backdrop: &'a App) -> Self {
        Self { terminal, backdrop }
    }

    fn run(&mut self, mut prompt: Prompt) -> io::Result<PromptOutcome> {
        loop {
            let backdrop = self.backdrop;
            self.terminal.draw(|f| {
                ui::draw(f, backdrop);
                let area = f.area();
                prompt::draw(f, &prompt, area);
            })?;

            if let Event::Key(key) = read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match prompt.handle_key(key) {
                    PromptOutcome::Pending => {}
                    outcome => return Ok(outcome),
                }
            }
        }
    }

    // A broken terminal reads as a cancelled prompt
    fn ask(&mut self, prompt: Prompt) -> PromptOutcome {
        self.run(prompt).unwrap_or_else(|e| {
            warn!("prompt failed: {}", e);
            PromptOutcome::Cancelled
        })
    }

    fn ask_path(&mut self, title: &str, initial: &Path) -> Option<PathBuf> {
        let prompt = Prompt::text(title, "File path:", &initial.display().to_string());
        match self.ask(prompt) {
            PromptOutcome::Submitted(text) if !text.trim().is_empty() => {
                Some(PathBuf::from(text.trim()))
            }
            _ => None,
        }
    }
}

/// Declines every question; for messages that never prompt
pub struct NoPrompts;

impl Dialogs for NoPrompts {
    fn confirm(&mut self, _message: &str) -> bool {
        false
    }

    fn ask_label(&mut self, _suggested: &str) -> Option<String> {
        None
    }

    fn open_for_import(&mut self, _default: Option<&Path>) -> Option<PathBuf> {
        None
    }

    fn choose_export_path(&mut self, _default: Option<&Path>) -> Option<PathBuf> {
        None
    }
}

/// File name offered when the session has no document yet
pub fn default_export_name() -> PathBuf {
    PathBuf::from(format!("obdd-{}.json", Local::now().format("%Y%m%d-%H%M%S")))
}

impl<B: Backend> Dialogs for TerminalDialogs<'_, B> {
    fn confirm(&mut self, message: &str) -> bool {
        matches!(
            self.ask(Prompt::confirm("Confirm", message)),
            PromptOutcome::Confirmed(true)
        )
    }

    fn ask_label(&mut self, suggested: &str) -> Option<String> {
        let prompt = Prompt::text("Add node", "Variable label:", suggested);
        match self.ask(prompt) {
            PromptOutcome::Submitted(text) => Some(text),
            _ => None,
        }
    }

    fn open_for_import(&mut self, default: Option<&Path>) -> Option<PathBuf> {
        self.ask_path("Import", default.unwrap_or_else(|| Path::new("")))
    }

    fn choose_export_path(&mut self, default: Option<&Path>) -> Option<PathBuf> {
        let initial = default
            .map(Path::to_path_buf)
            .unwrap_or_else(default_export_name);
        self.ask_path("Export", &initial)
    }
}
