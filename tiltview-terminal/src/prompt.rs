/// One-line text prompts standing in for the file and color dialogs
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::path::PathBuf;
use tiltview_core::{parse_color, ClearColor, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    OpenImage,
    BackgroundColor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromptOutcome {
    Pending,
    Cancelled,
    Submitted(Command),
    /// The text did not parse; the prompt is finished
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct Prompt {
    kind: PromptKind,
    text: String,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            text: String::new(),
        }
    }

    /// Color prompt pre-filled with the current background
    pub fn background(current: ClearColor) -> Self {
        Self {
            kind: PromptKind::BackgroundColor,
            text: current.to_hex(),
        }
    }

    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Prompt line as shown in the status bar
    pub fn line(&self) -> String {
        let label = match self.kind {
            PromptKind::OpenImage => "Open image",
            PromptKind::BackgroundColor => "Background (#rrggbb, name or r,g,b)",
        };
        format!("{}: {}_", label, self.text)
    }

    pub fn key(&mut self, key: &KeyEvent) -> PromptOutcome {
        if key.kind == KeyEventKind::Release {
            return PromptOutcome::Pending;
        }
        match key.code {
            KeyCode::Esc => PromptOutcome::Cancelled,
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.text.pop();
                PromptOutcome::Pending
            }
            KeyCode::Char(c) => {
                self.text.push(c);
                PromptOutcome::Pending
            }
            _ => PromptOutcome::Pending,
        }
    }

    fn submit(&self) -> PromptOutcome {
        let text = self.text.trim();
        if text.is_empty() {
            return PromptOutcome::Cancelled;
        }
        match self.kind {
            PromptKind::OpenImage => PromptOutcome::Submitted(Command::OpenImage(PathBuf::from(text))),
            PromptKind::BackgroundColor => match parse_color(text) {
                Ok(color) => PromptOutcome::Submitted(Command::SetBackgroundColor(color)),
                Err(err) => PromptOutcome::Invalid(err.to_string()),
            },
        }
    }
}
