//! Raw MIDI packet decoding in front of the matcher.
//!
//! Truncated packets, out-of-range data bytes and non-note messages are
//! dropped here so the matcher only ever sees valid note numbers. Repeated
//! note-on for a key that is already down is suppressed, and an all-notes-off
//! event is emitted every time the held set drains to empty.

use std::collections::BTreeSet;

use super::types::InputEvent;

const COMMAND_MASK: u8 = 0xF0;
const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;

#[derive(Clone, Debug, Default)]
pub struct MidiInput {
    held: BTreeSet<u8>,
}

impl MidiInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one packet into zero or more normalized events.
    pub fn handle_message(&mut self, data: &[u8]) -> Vec<InputEvent> {
        let &[status, note, velocity, ..] = data else {
            log::debug!("Dropping truncated MIDI packet ({} bytes)", data.len());
            return Vec::new();
        };
        if note > 127 || velocity > 127 {
            log::debug!("Dropping MIDI packet with invalid data bytes: {:?}", data);
            return Vec::new();
        }

        match status & COMMAND_MASK {
            NOTE_OFF => self.note_off(note),
            NOTE_ON if velocity == 0 => self.note_off(note),
            NOTE_ON => {
                if self.held.insert(note) {
                    vec![InputEvent::On { note, velocity }]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    fn note_off(&mut self, note: u8) -> Vec<InputEvent> {
        self.held.remove(&note);
        let mut events = vec![InputEvent::Off { note }];
        if self.held.is_empty() {
            events.push(InputEvent::AllNotesOff);
        }
        events
    }

    /// Forget every held key, e.g. when the device is unbound.
    pub fn release_all(&mut self) -> Option<InputEvent> {
        if self.held.is_empty() {
            return None;
        }
        self.held.clear();
        Some(InputEvent::AllNotesOff)
    }

    pub fn held_notes(&self) -> &BTreeSet<u8> {
        &self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_and_off() {
        let mut input = MidiInput::new();
        assert_eq!(
            input.handle_message(&[0x90, 60, 100]),
            vec![InputEvent::On {
                note: 60,
                velocity: 100
            }]
        );
        assert!(input.held_notes().contains(&60));
        assert_eq!(
            input.handle_message(&[0x80, 60, 0]),
            vec![InputEvent::Off { note: 60 }, InputEvent::AllNotesOff]
        );
        assert!(input.held_notes().is_empty());
    }

    #[test]
    fn test_velocity_zero_is_note_off() {
        let mut input = MidiInput::new();
        input.handle_message(&[0x91, 64, 90]);
        assert_eq!(
            input.handle_message(&[0x91, 64, 0]),
            vec![InputEvent::Off { note: 64 }, InputEvent::AllNotesOff]
        );
    }

    #[test]
    fn test_all_notes_off_only_when_empty() {
        let mut input = MidiInput::new();
        input.handle_message(&[0x90, 60, 80]);
        input.handle_message(&[0x90, 64, 80]);
        assert_eq!(
            input.handle_message(&[0x80, 60, 0]),
            vec![InputEvent::Off { note: 60 }]
        );
        assert_eq!(
            input.handle_message(&[0x80, 64, 0]),
            vec![InputEvent::Off { note: 64 }, InputEvent::AllNotesOff]
        );
    }

    #[test]
    fn test_duplicate_note_on_suppressed() {
        let mut input = MidiInput::new();
        assert_eq!(input.handle_message(&[0x90, 60, 80]).len(), 1);
        assert!(input.handle_message(&[0x90, 60, 80]).is_empty());
    }

    #[test]
    fn test_malformed_packets_dropped() {
        let mut input = MidiInput::new();
        assert!(input.handle_message(&[]).is_empty());
        assert!(input.handle_message(&[0x90, 60]).is_empty());
        assert!(input.handle_message(&[0x90, 200, 80]).is_empty());
        // Control change and clock messages are not notes
        assert!(input.handle_message(&[0xB0, 64, 127]).is_empty());
        assert!(input.handle_message(&[0xF8, 0, 0]).is_empty());
        assert!(input.held_notes().is_empty());
    }

    #[test]
    fn test_release_all() {
        let mut input = MidiInput::new();
        assert_eq!(input.release_all(), None);
        input.handle_message(&[0x90, 60, 80]);
        input.handle_message(&[0x90, 62, 80]);
        assert_eq!(input.release_all(), Some(InputEvent::AllNotesOff));
        assert!(input.held_notes().is_empty());
    }
}
