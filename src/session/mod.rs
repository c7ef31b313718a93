pub mod clock;
pub mod matcher;
pub mod midi_input;
pub mod practice;
pub mod stats;
pub mod summary;
pub mod types;

pub use matcher::Matcher;
pub use practice::PracticeSession;
pub use types::{Feedback, InputEvent, Outcome, SessionResult, SessionUpdate, WeakNote};
