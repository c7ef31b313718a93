pub mod cursor;
pub mod reader;

pub use cursor::{CursorAction, NotationCursor};
pub use reader::{read_notation, Notation};
