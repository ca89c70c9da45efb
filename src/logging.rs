//! Logger setup
//!
//! The interactive editor owns the terminal, so it logs to a file. One-shot
//! subcommands log to stderr.

use std::fs::OpenOptions;
use std::path::Path;

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use crate::error::{EditorError, Result};

/// Parse a level name, falling back to `Info` for anything unrecognized
pub fn parse_level(name: &str) -> LevelFilter {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Append log records to `path`
pub fn init_file_logger(level: LevelFilter, path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| EditorError::io(path, e))?;
    // A logger may already be installed (tests, embedding); keep the first one
    let _ = WriteLogger::init(level, Config::default(), file);
    Ok(())
}

/// Log to stderr, colored when attached to a terminal
pub fn init_term_logger(level: LevelFilter) {
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
