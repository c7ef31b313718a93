use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pitch::note_label;

use super::types::{Outcome, WeakNote};

/// Running accuracy accounting for one practice session.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SessionStats {
    pub attempts: u32,
    pub correct_attempts: u32,
    pub completed_notes: u32,
    pub total_notes: u32,
    /// Mis-pressed key label ("F#4") -> number of misses.
    pub missed: BTreeMap<String, u32>,
}

impl SessionStats {
    pub fn new(total_notes: u32) -> Self {
        Self {
            total_notes,
            ..Self::default()
        }
    }

    pub fn reset(&mut self, total_notes: u32) {
        *self = Self::new(total_notes);
    }

    /// Account for the outcome of a key press.
    pub fn record_press(&mut self, midi: u8, outcome: Outcome) {
        match outcome {
            Outcome::Correct => {
                self.attempts += 1;
                self.correct_attempts += 1;
            }
            Outcome::Wrong => {
                self.attempts += 1;
                *self.missed.entry(note_label(midi)).or_insert(0) += 1;
            }
            _ => {}
        }
    }

    /// Account for the outcome of a key release.
    pub fn record_release(&mut self, outcome: Outcome) {
        if outcome.advances_cursor() {
            self.completed_notes = (self.completed_notes + 1).min(self.total_notes);
        }
    }

    pub fn accuracy(&self) -> u32 {
        accuracy(self.correct_attempts, self.attempts)
    }

    pub fn completion_percent(&self) -> f64 {
        (self.completed_notes as f64 / self.total_notes.max(1) as f64 * 100.0).min(100.0)
    }

    /// Most-missed notes, descending by misses; ties broken by label.
    pub fn weakest_notes(&self, limit: usize) -> Vec<WeakNote> {
        let mut notes: Vec<WeakNote> = self
            .missed
            .iter()
            .map(|(note, &misses)| WeakNote {
                note: note.clone(),
                misses,
            })
            .collect();
        // BTreeMap iteration is label-ordered and the sort is stable
        notes.sort_by(|a, b| b.misses.cmp(&a.misses));
        notes.truncate(limit);
        notes
    }
}

/// Percentage of correct attempts, rounded; 100 when nothing was attempted.
pub fn accuracy(correct: u32, attempts: u32) -> u32 {
    if attempts == 0 {
        return 100;
    }
    (correct as f64 / attempts as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_formula() {
        assert_eq!(accuracy(0, 0), 100);
        assert_eq!(accuracy(2, 3), 67);
        assert_eq!(accuracy(1, 3), 33);
        assert_eq!(accuracy(1, 2), 50);
        assert_eq!(accuracy(0, 5), 0);
    }

    #[test]
    fn test_record_press() {
        let mut stats = SessionStats::new(3);
        stats.record_press(60, Outcome::Correct);
        stats.record_press(66, Outcome::Wrong);
        stats.record_press(66, Outcome::Wrong);
        stats.record_press(60, Outcome::Complete);
        assert_eq!(stats.attempts, 3);
        assert_eq!(stats.correct_attempts, 1);
        assert_eq!(stats.missed.get("F#4"), Some(&2));
        assert_eq!(stats.accuracy(), 33);
    }

    #[test]
    fn test_completed_notes_capped() {
        let mut stats = SessionStats::new(2);
        stats.record_release(Outcome::Advanced);
        stats.record_release(Outcome::Ignored);
        stats.record_release(Outcome::Complete);
        stats.record_release(Outcome::Complete);
        assert_eq!(stats.completed_notes, 2);
        assert_eq!(stats.completion_percent(), 100.0);
    }

    #[test]
    fn test_weakest_notes() {
        let mut stats = SessionStats::new(10);
        for midi in [62, 62, 62, 65, 64, 64, 65] {
            stats.record_press(midi, Outcome::Wrong);
        }
        let weakest = stats.weakest_notes(2);
        assert_eq!(
            weakest,
            vec![
                WeakNote {
                    note: "D4".to_string(),
                    misses: 3
                },
                WeakNote {
                    note: "E4".to_string(),
                    misses: 2
                },
            ]
        );
    }

    #[test]
    fn test_reset() {
        let mut stats = SessionStats::new(4);
        stats.record_press(61, Outcome::Wrong);
        stats.record_release(Outcome::Advanced);
        stats.reset(8);
        assert_eq!(stats, SessionStats::new(8));
        assert_eq!(stats.accuracy(), 100);
    }
}
