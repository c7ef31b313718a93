use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

pub const MAX_OCTAVE: u8 = 8;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NoteStep {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteStep {
    pub const ALL: [NoteStep; 7] = [
        NoteStep::C,
        NoteStep::D,
        NoteStep::E,
        NoteStep::F,
        NoteStep::G,
        NoteStep::A,
        NoteStep::B,
    ];

    pub fn semitone_offset(self) -> u8 {
        match self {
            NoteStep::C => 0,
            NoteStep::D => 2,
            NoteStep::E => 4,
            NoteStep::F => 5,
            NoteStep::G => 7,
            NoteStep::A => 9,
            NoteStep::B => 11,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            NoteStep::C => 'C',
            NoteStep::D => 'D',
            NoteStep::E => 'E',
            NoteStep::F => 'F',
            NoteStep::G => 'G',
            NoteStep::A => 'A',
            NoteStep::B => 'B',
        }
    }

    pub fn from_char(c: char) -> Option<NoteStep> {
        match c {
            'C' => Some(NoteStep::C),
            'D' => Some(NoteStep::D),
            'E' => Some(NoteStep::E),
            'F' => Some(NoteStep::F),
            'G' => Some(NoteStep::G),
            'A' => Some(NoteStep::A),
            'B' => Some(NoteStep::B),
            _ => None,
        }
    }
}

/// A natural (unaltered) pitch: letter step plus octave 0-8.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub step: NoteStep,
    pub octave: u8,
}

impl Pitch {
    pub fn new(step: NoteStep, octave: u8) -> Self {
        Pitch { step, octave }
    }

    /// Parse a natural note name like "C4". Exactly `[A-G][0-8]`, nothing else.
    pub fn parse(name: &str) -> Result<Pitch, GeneratorError> {
        let invalid = || {
            GeneratorError::InvalidParameter(format!(
                "Invalid note name \"{}\". Expected natural note like C4.",
                name
            ))
        };

        let mut chars = name.chars();
        let (Some(step_char), Some(octave_char), None) =
            (chars.next(), chars.next(), chars.next())
        else {
            return Err(invalid());
        };

        let step = NoteStep::from_char(step_char).ok_or_else(invalid)?;
        let octave = octave_char
            .to_digit(10)
            .filter(|&o| o <= MAX_OCTAVE as u32)
            .ok_or_else(invalid)? as u8;

        Ok(Pitch { step, octave })
    }

    pub fn midi(self) -> u8 {
        (self.octave + 1) * 12 + self.step.semitone_offset()
    }

    pub fn name(self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Pitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.step.as_char(), self.octave)
    }
}

pub fn midi_from_pitch(step: char, alter: i32, octave: i32) -> i32 {
    let base = NoteStep::from_char(step).map_or(0, |s| s.semitone_offset() as i32);
    (octave + 1) * 12 + base + alter
}

/// Chromatic label for any MIDI number, sharps only ("F#4"). Values above
/// 127 are clamped.
pub fn note_label(midi: u8) -> String {
    let midi = midi.min(127) as i32;
    let name = NOTE_NAMES[midi.rem_euclid(12) as usize];
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", name, octave)
}

/// Round a JS number to a MIDI note number, clamping into 0..=127.
/// NaN maps to 0.
pub fn midi_from_number(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 127.0) as u8
}

/// Every natural pitch C0..B8 in ascending order.
pub fn all_natural_pitches() -> impl Iterator<Item = Pitch> {
    (0..=MAX_OCTAVE).flat_map(|octave| {
        NoteStep::ALL
            .into_iter()
            .map(move |step| Pitch::new(step, octave))
    })
}

/// All natural note names ("C0", "D0", ... "B8"), used for range stepping.
pub fn note_names() -> Vec<String> {
    all_natural_pitches().map(Pitch::name).collect()
}

pub fn natural_pitches_in_range(min_midi: u8, max_midi: u8) -> Vec<Pitch> {
    all_natural_pitches()
        .filter(|p| (min_midi..=max_midi).contains(&p.midi()))
        .collect()
}
