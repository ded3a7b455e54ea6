/// Visibility of the history sidebar and the delete panel.
///
/// The two flags are independent; both may be open at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelVisibility {
    pub history_open: bool,
    pub delete_open: bool,
}

impl PanelVisibility {
    pub fn toggle_delete(&mut self) {
        self.delete_open = !self.delete_open;
    }

    pub fn open_history(&mut self) {
        self.history_open = true;
    }

    pub fn close_history(&mut self) {
        self.history_open = false;
    }

    /// Whether any surface that lists history records is on screen.
    pub fn shows_history(&self) -> bool {
        self.history_open || self.delete_open
    }
}
