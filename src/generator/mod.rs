pub mod rng;
pub mod score;
pub mod writer;

pub use score::{generate, note_count_from_f64, Clef, GeneratedScore};
