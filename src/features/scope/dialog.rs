use ratatui::crossterm::event::{KeyCode, KeyEvent};

use crate::scope::ScopeKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDialogData {
    pub current: String,
    pub new: String,
}

/// Asks whether to switch to the scope of the opened resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeConfirmDialog {
    kind: ScopeKind,
    data: ChangeDialogData,
}

impl ChangeConfirmDialog {
    pub fn new(kind: ScopeKind, data: ChangeDialogData) -> Self {
        Self { kind, data }
    }

    pub fn data(&self) -> &ChangeDialogData {
        &self.data
    }

    pub fn title(&self) -> String {
        format!("Change {}", self.kind.title().to_lowercase())
    }

    pub fn message(&self) -> String {
        format!(
            "The resource belongs to {} {}. Switch from {} to {}? [y/n]",
            self.kind.title().to_lowercase(),
            self.data.new,
            self.data.current,
            self.data.new
        )
    }

    /// `Some(true)` when confirmed, `Some(false)` when declined.
    pub fn on_key(&self, ev: &KeyEvent) -> Option<bool> {
        match ev.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
            _ => None,
        }
    }
}
