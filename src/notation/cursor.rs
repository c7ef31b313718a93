use serde::{Deserialize, Serialize};

/// What the renderer should do with its highlighted note after an event.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CursorAction {
    None,
    Advance,
    Reset,
}

/// Position of the renderer's highlight over the notated (pitched) notes.
///
/// Mirrors the matcher's expected-note cursor: `advance` on every
/// advanced/complete outcome, `reset` whenever a new score is loaded.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct NotationCursor {
    position: usize,
    note_count: usize,
}

impl NotationCursor {
    pub fn new(note_count: usize) -> Self {
        Self {
            position: 0,
            note_count,
        }
    }

    /// Moves to the next notated note; stays put once past the last one.
    pub fn advance(&mut self) {
        if self.position < self.note_count {
            self.position += 1;
        }
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn apply(&mut self, action: CursorAction) {
        match action {
            CursorAction::None => {}
            CursorAction::Advance => self.advance(),
            CursorAction::Reset => self.reset(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn note_count(&self) -> usize {
        self.note_count
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.note_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::notation::reader::read_notation;

    #[test]
    fn test_advance_saturates() {
        let mut cursor = NotationCursor::new(2);
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_at_end());
        cursor.advance();
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_apply_actions() {
        let mut cursor = NotationCursor::new(5);
        cursor.apply(CursorAction::Advance);
        cursor.apply(CursorAction::None);
        cursor.apply(CursorAction::Advance);
        assert_eq!(cursor.position(), 2);
        cursor.apply(CursorAction::Reset);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_from_generated_notation() {
        let score = generate("C4", "C5", 9, 5).unwrap();
        let notation = read_notation(&score.xml).unwrap();
        let cursor = NotationCursor::new(notation.pitched_notes().len());
        // Rests are skipped by the cursor
        assert_eq!(cursor.note_count(), 9);
        assert!(!cursor.is_at_end());
    }

    #[test]
    fn test_empty_cursor_is_at_end() {
        let cursor = NotationCursor::default();
        assert!(cursor.is_at_end());
    }
}
