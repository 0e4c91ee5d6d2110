// App module for shoresquad-tui
// Holds application state and the outbound action seam

pub mod actions;
pub mod input;
pub mod state;

pub use actions::AppActions;
pub use input::handle_input;
pub use state::{App, InputState, Section, Severity, Toast};
