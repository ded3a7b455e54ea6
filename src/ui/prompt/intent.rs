use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum PromptIntent {
    Open,
    Input(char),
    /// Bracketed paste or several characters at once.
    InsertText(String),
    Backspace,
    /// Esc, or the buffer was taken for submission.
    Close,
}

impl Intent for PromptIntent {}
