use crate::api::ModelId;

/// Holds the model chosen for the next upload.
///
/// Visible until the first successful upload of the session; hiding is
/// one-way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelector {
    selected: Option<ModelId>,
    visible: bool,
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self {
            selected: None,
            visible: true,
        }
    }
}

impl ModelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the choice; `None` clears the selection.
    pub fn select(&mut self, choice: Option<ModelId>) {
        self.selected = choice;
    }

    pub fn current(&self) -> Option<ModelId> {
        self.selected
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }
}
