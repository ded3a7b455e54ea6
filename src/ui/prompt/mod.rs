//! Single-line path prompt used to pick the image to upload.

mod intent;
mod reducer;
mod state;

pub use intent::PromptIntent;
pub use reducer::PromptReducer;
pub use state::PromptState;
