//! Checks run before taking over the terminal

use std::io::IsTerminal;

/// Why the interactive editor cannot start here
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalProblem {
    NotATty,
    DumbTerminal,
}

impl TerminalProblem {
    pub fn describe(self) -> &'static str {
        match self {
            TerminalProblem::NotATty => "standard input/output is not an interactive terminal",
            TerminalProblem::DumbTerminal => "TERM=dumb does not support the editor's drawing",
        }
    }
}

/// Decide from the raw facts whether the editor can run
pub fn check(stdin_tty: bool, stdout_tty: bool, term: Option<&str>) -> Result<(), TerminalProblem> {
    if !stdin_tty || !stdout_tty {
        return Err(TerminalProblem::NotATty);
    }
    if term == Some("dumb") {
        return Err(TerminalProblem::DumbTerminal);
    }
    Ok(())
}

/// Check the current process
pub fn check_current() -> Result<(), TerminalProblem> {
    let term = std::env::var("TERM").ok();
    check(
        std::io::stdin().is_terminal(),
        std::io::stdout().is_terminal(),
        term.as_deref(),
    )
}

/// How to start the editor properly on this platform
pub fn platform_hint() -> &'static str {
    if cfg!(target_os = "windows") {
        "Run obdd-editor from Windows Terminal or PowerShell, not from a redirected or piped shell."
    } else if cfg!(target_os = "macos") {
        "Run obdd-editor from Terminal.app or iTerm2 without piping its input or output."
    } else {
        "Run obdd-editor from an interactive terminal emulator (xterm, GNOME Terminal, tmux, ...) without pipes."
    }
}
