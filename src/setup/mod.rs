pub mod config;
pub mod trainings;

pub use config::SetupConfig;
pub use trainings::{find_training, trainings, Training};
