//! Modal prompt widget: yes/no confirmation or a single line of text

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Confirm,
    Text { input: String },
}

/// A question shown over the editor until answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
    pub kind: PromptKind,
}

/// Result of feeding one key to a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    Confirmed(bool),
    Submitted(String),
    Cancelled,
}

impl Prompt {
    pub fn confirm(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: PromptKind::Confirm,
        }
    }

    /// A text prompt pre-filled with `initial`
    pub fn text(title: impl Into<String>, message: impl Into<String>, initial: &str) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: PromptKind::Text {
                input: initial.to_string(),
            },
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return PromptOutcome::Cancelled;
        }
        match &mut self.kind {
            PromptKind::Confirm => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    PromptOutcome::Confirmed(true)
                }
                KeyCode::Char('n') | KeyCode::Char('N') => PromptOutcome::Confirmed(false),
                _ => PromptOutcome::Pending,
            },
            PromptKind::Text { input } => match key.code {
                KeyCode::Enter => PromptOutcome::Submitted(input.clone()),
                KeyCode::Backspace => {
                    input.pop();
                    PromptOutcome::Pending
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    input.clear();
                    PromptOutcome::Pending
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    PromptOutcome::Pending
                }
                _ => PromptOutcome::Pending,
            },
        }
    }

    fn hint(&self) -> &'static str {
        match self.kind {
            PromptKind::Confirm => "y: yes  n: no  Esc: cancel",
            PromptKind::Text { .. } => "Enter: accept  Esc: cancel  Ctrl+u: clear",
        }
    }
}

/// Draw the prompt centered over `area`
pub fn draw(frame: &mut Frame, prompt: &Prompt, area: Rect) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 7.min(area.height);

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    // Clear background
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![Line::from(prompt.message.as_str()), Line::raw("")];
    if let PromptKind::Text { input } = &prompt.kind {
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::DarkGray)),
            Span::styled(input.as_str(), Style::default().fg(Color::Cyan)),
            Span::styled("_", Style::default().fg(Color::Cyan).rapid_blink()),
        ]));
    }
    lines.push(Line::styled(
        prompt.hint(),
        Style::default().fg(Color::DarkGray),
    ));

    let block = Block::default()
        .title(format!(" {} ", prompt.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(paragraph, popup_area);
}
