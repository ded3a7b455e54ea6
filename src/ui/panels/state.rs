use crate::session::PanelVisibility;
use crate::ui::mvi::UiState;

/// Panel flags as reducer state.
pub type PanelState = PanelVisibility;

impl UiState for PanelVisibility {}
