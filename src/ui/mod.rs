pub mod app;
pub mod events;
pub mod layout;
pub mod mvi;
pub mod panels;
pub mod prompt;
pub mod render;
pub mod runtime;
pub mod terminal_guard;
pub mod theme;

pub use runtime::run;
