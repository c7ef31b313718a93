use std::collections::BTreeMap;

use crate::generator::GeneratedScore;
use crate::notation::{CursorAction, NotationCursor};
use crate::pitch::note_label;

use super::clock::SessionClock;
use super::matcher::Matcher;
use super::midi_input::MidiInput;
use super::stats::SessionStats;
use super::summary::build_result;
use super::types::{Feedback, InputEvent, Outcome, SessionResult, SessionUpdate};

/// One practice run over a generated score.
///
/// Feeds input into the matcher, keeps stats and the clock in step with the
/// outcomes, mirrors the notation cursor, and finishes exactly once per
/// loaded score.
#[derive(Clone, Debug, Default)]
pub struct PracticeSession {
    matcher: Matcher,
    stats: SessionStats,
    clock: SessionClock,
    cursor: NotationCursor,
    input: MidiInput,
    seed: u32,
    result: Option<SessionResult>,
}

impl PracticeSession {
    pub fn new(score: &GeneratedScore) -> Self {
        let mut session = Self::default();
        session.load(score);
        session
    }

    /// Install a new score, discarding all progress. The renderer should reset
    /// its cursor.
    pub fn load(&mut self, score: &GeneratedScore) -> CursorAction {
        self.load_sequence(score.expected_notes.clone(), score.seed)
    }

    pub fn load_sequence(&mut self, expected: Vec<u8>, seed: u32) -> CursorAction {
        let total = expected.len();
        log::info!("Loading practice session: {} notes, seed {}", total, seed);

        self.matcher.reset(expected);
        self.stats.reset(total as u32);
        self.clock.reset();
        self.cursor = NotationCursor::new(total);
        self.input = MidiInput::new();
        self.seed = seed;
        self.result = None;
        CursorAction::Reset
    }

    pub fn note_on(&mut self, midi: u8, now_ms: f64) -> SessionUpdate {
        if self.result.is_some() {
            return SessionUpdate {
                outcome: Some(Outcome::Complete),
                ..SessionUpdate::idle()
            };
        }

        if !self.clock.is_running() {
            self.clock.start(now_ms);
        }

        let outcome = self.matcher.on_note_on(midi);
        self.stats.record_press(midi, outcome);

        let (feedback, missed_label) = match outcome {
            Outcome::Correct => (Feedback::Correct, None),
            Outcome::Wrong => (Feedback::Wrong, Some(format!("Missed {}", note_label(midi)))),
            _ => (Feedback::Idle, None),
        };

        SessionUpdate {
            outcome: Some(outcome),
            feedback,
            missed_label,
            ..SessionUpdate::idle()
        }
    }

    pub fn note_off(&mut self, midi: u8, now_ms: f64) -> SessionUpdate {
        let outcome = self.matcher.on_note_off(midi);
        if !outcome.advances_cursor() || self.result.is_some() {
            return SessionUpdate {
                outcome: Some(outcome),
                ..SessionUpdate::idle()
            };
        }

        self.stats.record_release(outcome);
        self.cursor.apply(CursorAction::Advance);

        let result = if outcome == Outcome::Complete {
            self.finish(now_ms)
        } else {
            None
        };

        SessionUpdate {
            outcome: Some(outcome),
            cursor: CursorAction::Advance,
            result,
            ..SessionUpdate::idle()
        }
    }

    /// Every key is up: clear the highlight feedback.
    pub fn all_notes_off(&mut self) -> SessionUpdate {
        self.matcher.release_all();
        SessionUpdate::idle()
    }

    /// Decode a raw MIDI packet and feed the resulting events.
    pub fn midi_message(&mut self, data: &[u8], now_ms: f64) -> Vec<SessionUpdate> {
        let events = self.input.handle_message(data);
        events
            .into_iter()
            .map(|event| self.handle_event(event, now_ms))
            .collect()
    }

    pub fn handle_event(&mut self, event: InputEvent, now_ms: f64) -> SessionUpdate {
        match event {
            InputEvent::On { note, .. } => self.note_on(note, now_ms),
            InputEvent::Off { note } => self.note_off(note, now_ms),
            InputEvent::AllNotesOff => self.all_notes_off(),
        }
    }

    /// Input device went away: drop every held key.
    pub fn release_device(&mut self) -> Option<SessionUpdate> {
        self.input
            .release_all()
            .map(|event| self.handle_event(event, 0.0))
    }

    /// End the session: stops the clock and builds the result. Returns `None`
    /// if the session already finished.
    pub fn finish(&mut self, now_ms: f64) -> Option<SessionResult> {
        if self.result.is_some() {
            return None;
        }
        self.clock.stop(now_ms);
        self.matcher.release_all();
        let result = build_result(&self.stats, self.seed, self.clock.elapsed_seconds(now_ms));
        log::info!(
            "Session {} finished: {}/{} notes, accuracy {}%, {} NPM",
            result.session_id,
            result.completed_notes,
            result.total_notes,
            result.accuracy,
            result.speed_npm
        );
        self.result = Some(result.clone());
        Some(result)
    }

    pub fn toggle_clock(&mut self, now_ms: f64) {
        if self.result.is_none() {
            self.clock.toggle(now_ms);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn accuracy(&self) -> u32 {
        self.stats.accuracy()
    }

    pub fn completed_notes(&self) -> u32 {
        self.stats.completed_notes
    }

    pub fn total_notes(&self) -> u32 {
        self.stats.total_notes
    }

    pub fn missed_notes(&self) -> &BTreeMap<String, u32> {
        &self.stats.missed
    }

    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        self.clock.elapsed_ms(now_ms)
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn cursor(&self) -> &NotationCursor {
        &self.cursor
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}
