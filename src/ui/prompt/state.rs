use crate::ui::mvi::UiState;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PromptState {
    #[default]
    Hidden,
    Editing {
        buffer: String,
    },
}

impl UiState for PromptState {}

impl PromptState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    pub fn buffer(&self) -> Option<&str> {
        match self {
            Self::Editing { buffer } => Some(buffer),
            Self::Hidden => None,
        }
    }
}
