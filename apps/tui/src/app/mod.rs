// App module for the ELSA dashboard
// Holds dashboard state, data fetching and key handling

pub mod actions;
pub mod fetch;
pub mod input;
pub mod state;

pub use input::handle_input;
pub use state::{App, Tab};
