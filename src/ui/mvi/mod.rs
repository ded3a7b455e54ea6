//! Model-View-Intent primitives for the terminal front-end.
//!
//! ```text
//! key ──→ Intent ──→ Reducer ──→ State ──→ draw
//!  ↑                                        │
//!  └────────────────────────────────────────┘
//! ```
//!
//! Reducers hold all UI-local transitions. Anything that talks to the
//! network or the session core stays in `App`.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
