pub mod conversation;
pub mod interpreter;

pub use conversation::{handle_text, Reply};
pub use interpreter::{interpret, Interpretation};
