/// Marker for actions a reducer understands (key presses, prompt edits).
pub trait Intent: Send + 'static {}
