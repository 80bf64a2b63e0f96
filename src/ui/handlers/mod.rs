//! Handler modules for managing user input, session state, and history state.

mod game_handler;
mod history_handler;
mod input_handler;

pub use game_handler::GameHandler;
pub use history_handler::HistoryHandler;
pub use input_handler::{InputHandler, cell_at};
