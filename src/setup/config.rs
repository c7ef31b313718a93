use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::generator::{generate, GeneratedScore};
use crate::pitch::{note_names, Pitch};

pub const MIN_TOTAL_NOTES: u32 = 10;
pub const MAX_TOTAL_NOTES: u32 = 5000;
pub const DEFAULT_TOTAL_NOTES: u32 = 100;
pub const DEFAULT_MIN_NOTE: &str = "C4";
pub const DEFAULT_MAX_NOTE: &str = "C5";

pub fn clamp_note_count(value: i64) -> u32 {
    value.clamp(MIN_TOTAL_NOTES as i64, MAX_TOTAL_NOTES as i64) as u32
}

/// Range and length chosen on the setup screen.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct SetupConfig {
    pub min_note: String,
    pub max_note: String,
    pub total_notes: u32,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            min_note: DEFAULT_MIN_NOTE.to_string(),
            max_note: DEFAULT_MAX_NOTE.to_string(),
            total_notes: DEFAULT_TOTAL_NOTES,
        }
    }
}

impl SetupConfig {
    /// Copy with the note count clamped into the allowed bounds.
    pub fn normalized(&self) -> Self {
        Self {
            total_notes: clamp_note_count(self.total_notes as i64),
            ..self.clone()
        }
    }

    pub fn set_total_notes(&mut self, value: i64) {
        self.total_notes = clamp_note_count(value);
    }

    /// Move the lower bound by `delta` natural notes, never past the upper bound.
    pub fn step_min_note(&mut self, delta: i32) {
        let names = note_names();
        let (Some(current), Some(upper)) = (
            index_of(&names, &self.min_note),
            index_of(&names, &self.max_note),
        ) else {
            return;
        };
        let next = (current as i64 + delta as i64).clamp(0, upper as i64) as usize;
        self.min_note = names[next].clone();
    }

    /// Move the upper bound by `delta` natural notes, never below the lower bound.
    pub fn step_max_note(&mut self, delta: i32) {
        let names = note_names();
        let (Some(current), Some(lower)) = (
            index_of(&names, &self.max_note),
            index_of(&names, &self.min_note),
        ) else {
            return;
        };
        let last = names.len() as i64 - 1;
        let next = (current as i64 + delta as i64).clamp(lower as i64, last) as usize;
        self.max_note = names[next].clone();
    }

    pub fn range_label(&self) -> String {
        if self.min_note == "A0" && self.max_note == "C8" {
            "Full piano (A0 - C8)".to_string()
        } else {
            format!("{} - {}", self.min_note, self.max_note)
        }
    }

    /// Check the note names and ordering without generating anything.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        let min = Pitch::parse(&self.min_note)?;
        let max = Pitch::parse(&self.max_note)?;
        if min.midi() > max.midi() {
            return Err(GeneratorError::InvalidParameter(format!(
                "minNote must be <= maxNote. Received: {} > {}.",
                self.min_note, self.max_note
            )));
        }
        Ok(())
    }

    pub fn generate(&self, seed: u32) -> Result<GeneratedScore, GeneratorError> {
        let config = self.normalized();
        generate(&config.min_note, &config.max_note, config.total_notes as i64, seed)
    }
}

fn index_of(names: &[String], name: &str) -> Option<usize> {
    names.iter().position(|n| n == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_note_count() {
        assert_eq!(clamp_note_count(-10), MIN_TOTAL_NOTES);
        assert_eq!(clamp_note_count(0), MIN_TOTAL_NOTES);
        assert_eq!(clamp_note_count(250), 250);
        assert_eq!(clamp_note_count(20_000), MAX_TOTAL_NOTES);
    }

    #[test]
    fn test_defaults() {
        let config = SetupConfig::default();
        assert_eq!(config.min_note, "C4");
        assert_eq!(config.max_note, "C5");
        assert_eq!(config.total_notes, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_step_min_note_stops_at_max() {
        let mut config = SetupConfig::default();
        config.step_min_note(1);
        assert_eq!(config.min_note, "D4");
        config.step_min_note(100);
        assert_eq!(config.min_note, "C5");
        config.step_min_note(-100);
        assert_eq!(config.min_note, "C0");
    }

    #[test]
    fn test_step_max_note_stops_at_min() {
        let mut config = SetupConfig::default();
        config.step_max_note(-100);
        assert_eq!(config.max_note, "C4");
        config.step_max_note(100);
        assert_eq!(config.max_note, "B8");
    }

    #[test]
    fn test_range_label() {
        let mut config = SetupConfig::default();
        assert_eq!(config.range_label(), "C4 - C5");
        config.min_note = "A0".to_string();
        config.max_note = "C8".to_string();
        assert_eq!(config.range_label(), "Full piano (A0 - C8)");
    }

    #[test]
    fn test_generate_clamps_count() {
        let config = SetupConfig {
            total_notes: 3,
            ..SetupConfig::default()
        };
        let score = config.generate(1).unwrap();
        assert_eq!(score.expected_notes.len(), MIN_TOTAL_NOTES as usize);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let config = SetupConfig {
            min_note: "C5".to_string(),
            max_note: "C4".to_string(),
            total_notes: 100,
        };
        assert!(matches!(
            config.validate(),
            Err(GeneratorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_set_total_notes() {
        let mut config = SetupConfig::default();
        config.set_total_notes(9999);
        assert_eq!(config.total_notes, MAX_TOTAL_NOTES);
        config.set_total_notes(42);
        assert_eq!(config.total_notes, 42);
    }

    #[test]
    fn test_partial_setup_object_gets_defaults() {
        let config: SetupConfig = serde_json::from_str(r#"{"min_note":"A0"}"#).unwrap();
        assert_eq!(config.min_note, "A0");
        assert_eq!(config.max_note, DEFAULT_MAX_NOTE);
        assert_eq!(config.total_notes, DEFAULT_TOTAL_NOTES);
    }

    #[test]
    fn test_stepping_an_unknown_name_is_a_no_op() {
        let mut config = SetupConfig {
            min_note: "H9".to_string(),
            ..SetupConfig::default()
        };
        config.step_min_note(1);
        config.step_max_note(1);
        assert_eq!(config.min_note, "H9");
        assert_eq!(config.max_note, DEFAULT_MAX_NOTE);
        assert!(config.validate().is_err());
    }
}
