use crate::ui::mvi::Intent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelIntent {
    ToggleDelete,
    OpenHistory,
    CloseHistory,
}

impl Intent for PanelIntent {}
