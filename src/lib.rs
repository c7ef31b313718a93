use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod generator;
pub mod notation;
pub mod pitch;
pub mod session;
pub mod setup;

use generator::GeneratedScore;
use session::PracticeSession;
use setup::SetupConfig;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Like `to_js`, but maps become plain objects instead of `Map`s.
fn to_js_object<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn setup_from_js(setup_js: JsValue) -> Result<SetupConfig, JsValue> {
    serde_wasm_bindgen::from_value(setup_js).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn count_from_js(value: f64) -> i64 {
    if value.is_nan() {
        setup::config::DEFAULT_TOTAL_NOTES as i64
    } else {
        value as i64
    }
}

/// Generate a sight-reading passage. Without a seed the current time is used,
/// so pass the seed back in to retry the same passage.
#[wasm_bindgen]
pub fn generate_score(
    min_note: &str,
    max_note: &str,
    note_count: f64,
    seed: Option<u32>,
) -> Result<JsValue, JsValue> {
    let seed = seed.unwrap_or_else(|| js_sys::Date::now() as u64 as u32);
    let score = generator::note_count_from_f64(note_count)
        .and_then(|count| generator::generate(min_note, max_note, count, seed))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&score)
}

/// Generate from a setup config object; the note count is clamped first.
#[wasm_bindgen]
pub fn generate_from_setup(setup_js: JsValue, seed: u32) -> Result<JsValue, JsValue> {
    let config = setup_from_js(setup_js)?;
    let score = config
        .generate(seed)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&score)
}

#[wasm_bindgen]
pub fn read_notation(xml: &str) -> Result<JsValue, JsValue> {
    let notation =
        notation::read_notation(xml).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&notation)
}

#[wasm_bindgen]
pub fn note_label(midi: f64) -> String {
    pitch::note_label(pitch::midi_from_number(midi))
}

#[wasm_bindgen]
pub fn note_names() -> Result<JsValue, JsValue> {
    to_js(&pitch::note_names())
}

#[wasm_bindgen]
pub fn format_time(seconds: f64) -> String {
    session::summary::format_time(seconds.max(0.0).floor() as u64)
}

#[wasm_bindgen]
pub fn clamp_note_count(value: f64) -> u32 {
    setup::config::clamp_note_count(count_from_js(value))
}

#[wasm_bindgen]
pub fn default_setup() -> Result<JsValue, JsValue> {
    to_js(&SetupConfig::default())
}

#[wasm_bindgen]
pub fn get_trainings() -> Result<JsValue, JsValue> {
    to_js(&setup::trainings())
}

/// Preset by id, or `undefined` when there is none.
#[wasm_bindgen]
pub fn find_training(id: &str) -> Result<JsValue, JsValue> {
    to_js(&setup::find_training(id))
}

/// Returns a copy of the setup with its lower bound moved `delta` natural notes.
#[wasm_bindgen]
pub fn step_min_note(setup_js: JsValue, delta: i32) -> Result<JsValue, JsValue> {
    let mut config = setup_from_js(setup_js)?;
    config.step_min_note(delta);
    to_js(&config)
}

#[wasm_bindgen]
pub fn step_max_note(setup_js: JsValue, delta: i32) -> Result<JsValue, JsValue> {
    let mut config = setup_from_js(setup_js)?;
    config.step_max_note(delta);
    to_js(&config)
}

#[wasm_bindgen]
pub fn set_total_notes(setup_js: JsValue, value: f64) -> Result<JsValue, JsValue> {
    let mut config = setup_from_js(setup_js)?;
    config.set_total_notes(count_from_js(value));
    to_js(&config)
}

#[wasm_bindgen]
pub fn range_label(setup_js: JsValue) -> Result<String, JsValue> {
    Ok(setup_from_js(setup_js)?.range_label())
}

/// Throws with the generator's message when the range is unusable.
#[wasm_bindgen]
pub fn validate_setup(setup_js: JsValue) -> Result<(), JsValue> {
    setup_from_js(setup_js)?
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Live practice session driven by MIDI events from the page.
#[wasm_bindgen]
#[derive(Default)]
pub struct SightReadingSession {
    inner: PracticeSession,
}

#[wasm_bindgen]
impl SightReadingSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SightReadingSession {
        SightReadingSession::default()
    }

    /// Install a score returned by `generate_score`. Returns the cursor action ("reset").
    pub fn load(&mut self, score_js: JsValue) -> Result<JsValue, JsValue> {
        let score: GeneratedScore = serde_wasm_bindgen::from_value(score_js)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let action = self.inner.load(&score);
        to_js(&action)
    }

    #[wasm_bindgen(js_name = loadSequence)]
    pub fn load_sequence(&mut self, expected: Vec<u8>, seed: u32) -> Result<JsValue, JsValue> {
        let action = self.inner.load_sequence(expected, seed);
        to_js(&action)
    }

    #[wasm_bindgen(js_name = noteOn)]
    pub fn note_on(&mut self, midi: u8, now_ms: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.note_on(midi, now_ms))
    }

    #[wasm_bindgen(js_name = noteOff)]
    pub fn note_off(&mut self, midi: u8, now_ms: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.note_off(midi, now_ms))
    }

    /// Feed a raw MIDI packet (`MIDIMessageEvent.data`); returns an array of updates.
    #[wasm_bindgen(js_name = midiMessage)]
    pub fn midi_message(&mut self, data: &[u8], now_ms: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.midi_message(data, now_ms))
    }

    #[wasm_bindgen(js_name = allNotesOff)]
    pub fn all_notes_off(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.all_notes_off())
    }

    #[wasm_bindgen(js_name = releaseDevice)]
    pub fn release_device(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.release_device())
    }

    /// Finish early. Returns the session result, or null if already finished.
    pub fn finish(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.finish(now_ms))
    }

    #[wasm_bindgen(js_name = toggleClock)]
    pub fn toggle_clock(&mut self, now_ms: f64) {
        self.inner.toggle_clock(now_ms);
    }

    #[wasm_bindgen(getter)]
    pub fn accuracy(&self) -> u32 {
        self.inner.accuracy()
    }

    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> u32 {
        self.inner.stats().attempts
    }

    #[wasm_bindgen(getter, js_name = correctAttempts)]
    pub fn correct_attempts(&self) -> u32 {
        self.inner.stats().correct_attempts
    }

    #[wasm_bindgen(getter, js_name = completedNotes)]
    pub fn completed_notes(&self) -> u32 {
        self.inner.completed_notes()
    }

    #[wasm_bindgen(getter, js_name = totalNotes)]
    pub fn total_notes(&self) -> u32 {
        self.inner.total_notes()
    }

    #[wasm_bindgen(getter, js_name = completionPercent)]
    pub fn completion_percent(&self) -> f64 {
        self.inner.stats().completion_percent()
    }

    #[wasm_bindgen(getter, js_name = clockRunning)]
    pub fn clock_running(&self) -> bool {
        self.inner.is_clock_running()
    }

    #[wasm_bindgen(getter)]
    pub fn finished(&self) -> bool {
        self.inner.is_finished()
    }

    #[wasm_bindgen(getter)]
    pub fn cursor(&self) -> u32 {
        self.inner.cursor().position() as u32
    }

    #[wasm_bindgen(js_name = elapsedMs)]
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        self.inner.elapsed_ms(now_ms)
    }

    #[wasm_bindgen(js_name = missedNotes)]
    pub fn missed_notes(&self) -> Result<JsValue, JsValue> {
        to_js_object(self.inner.missed_notes())
    }

    pub fn result(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.result())
    }
}
