use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::pitch::{natural_pitches_in_range, Pitch};

use super::rng::ScoreRng;
use super::writer::write_score;

pub const NOTES_PER_MEASURE: usize = 4;

/// MIDI number of middle C; ranges centred at or above it are notated in treble.
const MIDDLE_C: u16 = 60;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    Treble,
    Bass,
}

impl Clef {
    pub fn from_range(min_midi: u8, max_midi: u8) -> Clef {
        // midpoint < 60  <=>  min + max < 120
        if (min_midi as u16 + max_midi as u16) < MIDDLE_C * 2 {
            Clef::Bass
        } else {
            Clef::Treble
        }
    }

    pub fn note_staff(self) -> u8 {
        match self {
            Clef::Treble => 1,
            Clef::Bass => 2,
        }
    }

    pub fn rest_staff(self) -> u8 {
        match self {
            Clef::Treble => 2,
            Clef::Bass => 1,
        }
    }
}

/// A generated passage: MusicXML plus the notes the player must play, in order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GeneratedScore {
    pub xml: String,
    pub expected_notes: Vec<u8>,
    pub clef: Clef,
    pub measure_count: u32,
    pub seed: u32,
}

/// Convert a JS number into a note count for [`generate`]. Fractions, NaN,
/// infinities and values outside `i64` are rejected rather than truncated.
pub fn note_count_from_f64(value: f64) -> Result<i64, GeneratorError> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
        return Err(GeneratorError::InvalidParameter(format!(
            "noteCount must be a positive integer. Received: {}",
            value
        )));
    }
    Ok(value as i64)
}

/// Generate a sight-reading passage of `note_count` natural notes drawn
/// uniformly (with replacement) from `[min_note, max_note]`.
///
/// The same arguments always produce the same document and sequence.
pub fn generate(
    min_note: &str,
    max_note: &str,
    note_count: i64,
    seed: u32,
) -> Result<GeneratedScore, GeneratorError> {
    if note_count <= 0 {
        return Err(GeneratorError::InvalidParameter(format!(
            "noteCount must be a positive integer. Received: {}",
            note_count
        )));
    }
    let note_count = note_count as usize;

    let min_midi = Pitch::parse(min_note)?.midi();
    let max_midi = Pitch::parse(max_note)?.midi();

    if min_midi > max_midi {
        return Err(GeneratorError::InvalidParameter(format!(
            "minNote must be <= maxNote. Received: {} > {}.",
            min_note, max_note
        )));
    }

    let pool = natural_pitches_in_range(min_midi, max_midi);
    if pool.is_empty() {
        return Err(GeneratorError::EmptyRange {
            min: min_note.to_string(),
            max: max_note.to_string(),
        });
    }

    let mut rng = ScoreRng::new(seed);
    let clef = Clef::from_range(min_midi, max_midi);

    let drawn: Vec<Pitch> = (0..note_count)
        .map(|_| pool[rng.range_usize(pool.len())])
        .collect();

    let measures: Vec<Vec<Pitch>> = drawn
        .chunks(NOTES_PER_MEASURE)
        .map(|chunk| chunk.to_vec())
        .collect();

    let xml = write_score(&measures, clef)?;
    let expected_notes: Vec<u8> = drawn.iter().map(|p| p.midi()).collect();

    log::debug!(
        "Generated {} notes in {} measures ({}-{}, {:?} clef, seed {})",
        expected_notes.len(),
        measures.len(),
        min_note,
        max_note,
        clef,
        seed
    );

    Ok(GeneratedScore {
        xml,
        expected_notes,
        clef,
        measure_count: measures.len() as u32,
        seed,
    })
}
