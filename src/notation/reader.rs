use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::NotationError;
use crate::pitch::midi_from_pitch;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NotatedNote {
    /// `None` for rests.
    pub midi: Option<i32>,
    pub duration_divs: u32,
    pub note_type: String,
    pub dotted: bool,
    pub voice: u8,
    pub staff: u8,
}

impl NotatedNote {
    pub fn is_rest(&self) -> bool {
        self.midi.is_none()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NotatedMeasure {
    pub number: u32,
    pub notes: Vec<NotatedNote>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClefInfo {
    pub number: u8,
    pub sign: String,
    pub line: u8,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Notation {
    pub divisions: u32,
    pub key_fifths: i32,
    pub time_sig_num: u8,
    pub time_sig_den: u8,
    pub staves: u8,
    pub clefs: Vec<ClefInfo>,
    pub part_name: Option<String>,
    pub measures: Vec<NotatedMeasure>,
}

impl Notation {
    /// Pitched notes in document order, which is the order the cursor visits them.
    pub fn pitched_notes(&self) -> Vec<i32> {
        self.measures
            .iter()
            .flat_map(|m| m.notes.iter())
            .filter_map(|n| n.midi)
            .collect()
    }
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| std::str::from_utf8(&a.value).ok().map(str::to_string))
}

/// Read a partwise MusicXML document into measures and notes.
pub fn read_notation(xml: &str) -> Result<Notation, NotationError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();

    let mut notation = Notation {
        divisions: 1,
        key_fifths: 0,
        time_sig_num: 4,
        time_sig_den: 4,
        staves: 1,
        clefs: Vec::new(),
        part_name: None,
        measures: Vec::new(),
    };

    let mut current_tag: Option<&'static str> = None;
    let mut current_measure: Option<NotatedMeasure> = None;

    // Note state
    let mut in_note = false;
    let mut in_backup = false;
    let mut note_is_rest = false;
    let mut note_dotted = false;
    let mut note_duration: u32 = 0;
    let mut note_type = String::new();
    let mut note_voice: u8 = 1;
    let mut note_staff: u8 = 1;
    let mut step: Option<char> = None;
    let mut alter: i32 = 0;
    let mut octave: Option<i32> = None;

    // Clef state
    let mut clef: Option<ClefInfo> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"measure" => {
                    if let Some(done) = current_measure.take() {
                        notation.measures.push(done);
                    }
                    let number = attr_value(e, b"number")
                        .and_then(|v| v.parse::<u32>().ok())
                        .unwrap_or(notation.measures.len() as u32 + 1);
                    current_measure = Some(NotatedMeasure {
                        number,
                        notes: Vec::new(),
                    });
                }
                b"note" => {
                    in_note = true;
                    note_is_rest = false;
                    note_dotted = false;
                    note_duration = 0;
                    note_type.clear();
                    note_voice = 1;
                    note_staff = 1;
                    step = None;
                    alter = 0;
                    octave = None;
                }
                b"backup" => in_backup = true,
                b"rest" if in_note => note_is_rest = true,
                b"clef" => {
                    let number = attr_value(e, b"number")
                        .and_then(|v| v.parse::<u8>().ok())
                        .unwrap_or(1);
                    clef = Some(ClefInfo {
                        number,
                        sign: String::new(),
                        line: 0,
                    });
                }
                b"divisions" => current_tag = Some("divisions"),
                b"duration" => current_tag = Some("duration"),
                b"step" => current_tag = Some("step"),
                b"alter" => current_tag = Some("alter"),
                b"octave" => current_tag = Some("octave"),
                b"fifths" => current_tag = Some("fifths"),
                b"beats" => current_tag = Some("beats"),
                b"beat-type" => current_tag = Some("beat-type"),
                b"staves" => current_tag = Some("staves"),
                b"voice" => current_tag = Some("voice"),
                b"staff" => current_tag = Some("staff"),
                b"type" => current_tag = Some("type"),
                b"sign" => current_tag = Some("sign"),
                b"line" => current_tag = Some("line"),
                b"part-name" => current_tag = Some("part-name"),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"rest" if in_note => note_is_rest = true,
                b"dot" if in_note => note_dotted = true,
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let Some(tag) = current_tag.take() {
                    let text = e.unescape()?;
                    match tag {
                        "divisions" => {
                            if let Ok(v) = text.parse::<u32>() {
                                if v > 0 {
                                    notation.divisions = v;
                                }
                            }
                        }
                        "duration" => {
                            // <backup> durations only rewind time; notes keep their own
                            if in_note && !in_backup {
                                note_duration = text.parse().unwrap_or(0);
                            }
                        }
                        "step" => step = text.chars().next(),
                        "alter" => alter = text.parse().unwrap_or(0),
                        "octave" => octave = text.parse().ok(),
                        "fifths" => notation.key_fifths = text.parse().unwrap_or(0),
                        "beats" => notation.time_sig_num = text.parse().unwrap_or(4),
                        "beat-type" => notation.time_sig_den = text.parse().unwrap_or(4),
                        "staves" => notation.staves = text.parse().unwrap_or(1),
                        "voice" => note_voice = text.parse().unwrap_or(1),
                        "staff" => note_staff = text.parse().unwrap_or(1),
                        "type" => {
                            if in_note {
                                note_type = text.to_string();
                            }
                        }
                        "sign" => {
                            if let Some(c) = clef.as_mut() {
                                c.sign = text.to_string();
                            }
                        }
                        "line" => {
                            if let Some(c) = clef.as_mut() {
                                c.line = text.parse().unwrap_or(0);
                            }
                        }
                        "part-name" => {
                            if notation.part_name.is_none() {
                                notation.part_name = Some(text.to_string());
                            }
                        }
                        _ => {}
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"note" if in_note => {
                    let measure_number = current_measure.as_ref().map_or(0, |m| m.number);
                    let midi = if note_is_rest {
                        None
                    } else {
                        let s = step.ok_or(NotationError::MissingPitch {
                            measure: measure_number,
                            field: "step",
                        })?;
                        let o = octave.ok_or(NotationError::MissingPitch {
                            measure: measure_number,
                            field: "octave",
                        })?;
                        Some(midi_from_pitch(s, alter, o))
                    };

                    let note = NotatedNote {
                        midi,
                        duration_divs: note_duration,
                        note_type: if note_type.is_empty() {
                            "quarter".to_string()
                        } else {
                            note_type.clone()
                        },
                        dotted: note_dotted,
                        voice: note_voice,
                        staff: note_staff,
                    };
                    if let Some(m) = current_measure.as_mut() {
                        m.notes.push(note);
                    }
                    in_note = false;
                }
                b"backup" => in_backup = false,
                b"clef" => {
                    if let Some(c) = clef.take() {
                        notation.clefs.push(c);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(NotationError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(done) = current_measure.take() {
        notation.measures.push(done);
    }

    Ok(notation)
}
