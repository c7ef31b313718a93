use std::collections::BTreeSet;

use super::types::Outcome;

/// Release-gated matching of key presses against the expected note sequence.
///
/// A press of the expected key is classified `Correct` but does not move the
/// cursor; the cursor advances only when that same key is released. Wrong
/// presses never block further attempts.
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    expected: Vec<u8>,
    cursor: usize,
    held: BTreeSet<u8>,
    // Key pressed while it was the expected note and not yet released.
    armed: Option<u8>,
}

impl Matcher {
    pub fn new(expected: Vec<u8>) -> Self {
        Self {
            expected,
            ..Self::default()
        }
    }

    pub fn reset(&mut self, expected: Vec<u8>) {
        self.expected = expected;
        self.cursor = 0;
        self.held.clear();
        self.armed = None;
    }

    pub fn on_note_on(&mut self, midi: u8) -> Outcome {
        let Some(&target) = self.expected.get(self.cursor) else {
            return Outcome::Complete;
        };

        self.held.insert(midi);
        if midi == target {
            self.armed = Some(midi);
            Outcome::Correct
        } else {
            Outcome::Wrong
        }
    }

    pub fn on_note_off(&mut self, midi: u8) -> Outcome {
        self.held.remove(&midi);

        let Some(&target) = self.expected.get(self.cursor) else {
            return Outcome::Ignored;
        };
        if midi != target || self.armed != Some(midi) {
            return Outcome::Ignored;
        }

        self.armed = None;
        self.cursor += 1;
        if self.cursor >= self.expected.len() {
            Outcome::Complete
        } else {
            Outcome::Advanced
        }
    }

    /// All keys reported up at once (device lost or all-notes-off).
    pub fn release_all(&mut self) {
        self.held.clear();
        self.armed = None;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.expected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    pub fn current_expected(&self) -> Option<u8> {
        self.expected.get(self.cursor).copied()
    }

    pub fn expected(&self) -> &[u8] {
        &self.expected
    }

    pub fn held_notes(&self) -> &BTreeSet<u8> {
        &self.held
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.expected.len()
    }
}
