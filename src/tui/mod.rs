//! Terminal User Interface for the editor
//!
//! Features:
//! - Mouse editing: click to select, drag to move, drag on empty space to box select
//! - Keyboard commands for nodes, edges, root and files
//! - Pan and zoom over the model canvas
//! - Modal prompts for labels, confirmations and file paths

pub mod app;
pub mod dialogs;
pub mod events;
pub mod msg;
pub mod ui;
pub mod views;
pub mod widgets;

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::prelude::*;

use crate::controller::Controller;
use app::App;
use dialogs::{NoPrompts, TerminalDialogs};
use events::handle_msg;
use msg::{key_to_msg, mouse_to_msg, Msg};

/// Run the TUI application
pub fn run(controller: Controller) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app, ensuring cleanup happens even on error
    let result = run_app_inner(&mut terminal, controller);

    // Restore terminal - this MUST run even if app fails
    let _ = disable_raw_mode();
    let _ = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    );
    let _ = terminal.show_cursor();

    result
}

fn run_app_inner<B: Backend>(
    terminal: &mut Terminal<B>,
    controller: Controller,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(controller);
    let size = terminal.size()?;
    app.resize(size.width, size.height);
    info!("editor started ({}x{})", size.width, size.height);

    run_event_loop(terminal, &mut app)?;

    info!("editor closed");
    Ok(())
}

fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        // Draw the UI
        terminal.draw(|f| ui::draw(f, app))?;

        // Handle input with timeout
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if poll(timeout)? {
            let msg = match read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    key_to_msg(key.code, key.modifiers, app.show_help)
                }
                Event::Mouse(mouse) => mouse_to_msg(mouse),
                Event::Resize(width, height) => Msg::Resize(width, height),
                _ => Msg::Noop,
            };

            let quit = if msg.may_prompt() {
                // Prompts draw over a snapshot of the editor as it was before the message
                let backdrop = app.clone();
                handle_msg(app, msg, &mut TerminalDialogs::new(terminal, &backdrop))?
            } else {
                handle_msg(app, msg, &mut NoPrompts)?
            };
            if quit {
                return Ok(()); // Quit signal
            }
        }

        // Tick for status expiry
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }
}
