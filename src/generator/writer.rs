use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::GeneratorError;
use crate::pitch::Pitch;

use super::score::Clef;

/// Divisions per quarter note.
pub const DIVISIONS: u32 = 4;

const DOCTYPE: &str = r#"score-partwise PUBLIC "-//Recordare//DTD MusicXML 3.1 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd""#;

type XmlResult = Result<(), quick_xml::Error>;

/// Serialize drawn measures into a single-part, two-staff MusicXML document.
///
/// Notes sit on the clef's staff as quarter notes in voice 1. The other staff
/// gets one voice-2 rest spanning the measure's notes so both staves stay
/// aligned. Attributes (divisions, key, time, staves, clefs) are attached to
/// the first measure only.
pub fn write_score(measures: &[Vec<Pitch>], clef: Clef) -> Result<String, GeneratorError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::DocType(BytesText::from_escaped(DOCTYPE)))?;
    writer.write_event(Event::Start(
        BytesStart::new("score-partwise").with_attributes([("version", "3.1")]),
    ))?;

    write_part_list(&mut writer)?;

    writer.write_event(Event::Start(BytesStart::new("part").with_attributes([("id", "P1")])))?;
    for (i, notes) in measures.iter().enumerate() {
        write_measure(&mut writer, i as u32 + 1, notes, clef)?;
    }
    writer.write_event(Event::End(BytesEnd::new("part")))?;
    writer.write_event(Event::End(BytesEnd::new("score-partwise")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_part_list<W: Write>(writer: &mut Writer<W>) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new("part-list")))?;
    writer.write_event(Event::Start(
        BytesStart::new("score-part").with_attributes([("id", "P1")]),
    ))?;
    write_text_element(writer, "part-name", "Music")?;
    writer.write_event(Event::End(BytesEnd::new("score-part")))?;
    writer.write_event(Event::End(BytesEnd::new("part-list")))
}

fn write_measure<W: Write>(
    writer: &mut Writer<W>,
    number: u32,
    notes: &[Pitch],
    clef: Clef,
) -> XmlResult {
    let number_str = number.to_string();
    writer.write_event(Event::Start(
        BytesStart::new("measure").with_attributes([("number", number_str.as_str())]),
    ))?;

    if number == 1 {
        write_attributes(writer)?;
    }

    for pitch in notes {
        write_note(writer, *pitch, clef.note_staff())?;
    }

    let measure_duration = notes.len() as u32 * DIVISIONS;
    writer.write_event(Event::Start(BytesStart::new("backup")))?;
    write_text_element(writer, "duration", &measure_duration.to_string())?;
    writer.write_event(Event::End(BytesEnd::new("backup")))?;

    write_rest(writer, measure_duration, clef.rest_staff())?;

    writer.write_event(Event::End(BytesEnd::new("measure")))
}

fn write_attributes<W: Write>(writer: &mut Writer<W>) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new("attributes")))?;
    write_text_element(writer, "divisions", &DIVISIONS.to_string())?;

    writer.write_event(Event::Start(BytesStart::new("key")))?;
    write_text_element(writer, "fifths", "0")?;
    writer.write_event(Event::End(BytesEnd::new("key")))?;

    writer.write_event(Event::Start(BytesStart::new("time")))?;
    write_text_element(writer, "beats", "4")?;
    write_text_element(writer, "beat-type", "4")?;
    writer.write_event(Event::End(BytesEnd::new("time")))?;

    write_text_element(writer, "staves", "2")?;
    write_clef(writer, "1", "G", "2")?;
    write_clef(writer, "2", "F", "4")?;

    writer.write_event(Event::End(BytesEnd::new("attributes")))
}

fn write_clef<W: Write>(writer: &mut Writer<W>, number: &str, sign: &str, line: &str) -> XmlResult {
    writer.write_event(Event::Start(
        BytesStart::new("clef").with_attributes([("number", number)]),
    ))?;
    write_text_element(writer, "sign", sign)?;
    write_text_element(writer, "line", line)?;
    writer.write_event(Event::End(BytesEnd::new("clef")))
}

fn write_note<W: Write>(writer: &mut Writer<W>, pitch: Pitch, staff: u8) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new("note")))?;

    writer.write_event(Event::Start(BytesStart::new("pitch")))?;
    write_text_element(writer, "step", &pitch.step.as_char().to_string())?;
    write_text_element(writer, "octave", &pitch.octave.to_string())?;
    writer.write_event(Event::End(BytesEnd::new("pitch")))?;

    write_text_element(writer, "voice", "1")?;
    write_text_element(writer, "duration", &DIVISIONS.to_string())?;
    write_text_element(writer, "type", "quarter")?;
    write_text_element(writer, "staff", &staff.to_string())?;

    writer.write_event(Event::End(BytesEnd::new("note")))
}

fn write_rest<W: Write>(writer: &mut Writer<W>, duration: u32, staff: u8) -> XmlResult {
    let (note_type, dotted) = rest_type(duration);

    writer.write_event(Event::Start(BytesStart::new("note")))?;
    writer.write_event(Event::Empty(BytesStart::new("rest")))?;
    write_text_element(writer, "voice", "2")?;
    write_text_element(writer, "duration", &duration.to_string())?;
    write_text_element(writer, "type", note_type)?;
    if dotted {
        writer.write_event(Event::Empty(BytesStart::new("dot")))?;
    }
    write_text_element(writer, "staff", &staff.to_string())?;
    writer.write_event(Event::End(BytesEnd::new("note")))
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))
}

/// Note type (and dot) for a rest spanning `duration` divisions.
fn rest_type(duration: u32) -> (&'static str, bool) {
    match duration / DIVISIONS {
        1 => ("quarter", false),
        2 => ("half", false),
        3 => ("half", true),
        4 => ("whole", false),
        _ => ("quarter", false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::NoteStep;

    fn c4() -> Pitch {
        Pitch::new(NoteStep::C, 4)
    }

    #[test]
    fn test_rest_type() {
        assert_eq!(rest_type(4), ("quarter", false));
        assert_eq!(rest_type(8), ("half", false));
        assert_eq!(rest_type(12), ("half", true));
        assert_eq!(rest_type(16), ("whole", false));
    }

    #[test]
    fn test_header_and_part_list() {
        let xml = write_score(&[vec![c4()]], Clef::Treble).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<!DOCTYPE score-partwise PUBLIC"));
        assert!(xml.contains(r#"<score-partwise version="3.1">"#));
        assert!(xml.contains("<part-name>Music</part-name>"));
        assert!(xml.trim_end().ends_with("</score-partwise>"));
    }

    #[test]
    fn test_attributes_only_on_first_measure() {
        let measures = vec![vec![c4(); 4], vec![c4(); 4], vec![c4(); 2]];
        let xml = write_score(&measures, Clef::Treble).unwrap();
        assert_eq!(xml.matches("<attributes>").count(), 1);
        assert_eq!(xml.matches("<measure ").count(), 3);
        assert!(xml.contains(r#"<measure number="3">"#));
        assert!(xml.contains("<sign>G</sign>"));
        assert!(xml.contains("<sign>F</sign>"));
    }

    #[test]
    fn test_bass_clef_puts_notes_on_second_staff() {
        let xml = write_score(&[vec![Pitch::new(NoteStep::G, 2)]], Clef::Bass).unwrap();
        let note_start = xml.find("<step>G</step>").unwrap();
        let after_note = &xml[note_start..];
        let staff_pos = after_note.find("<staff>").unwrap();
        assert!(after_note[staff_pos..].starts_with("<staff>2</staff>"));
        // The alignment rest sits on the treble staff
        let rest_start = xml.find("<rest/>").unwrap();
        let after_rest = &xml[rest_start..];
        let rest_staff = after_rest.find("<staff>").unwrap();
        assert!(after_rest[rest_staff..].starts_with("<staff>1</staff>"));
    }

    #[test]
    fn test_short_last_measure_rest_is_dotted_half() {
        let xml = write_score(&[vec![c4(); 3]], Clef::Treble).unwrap();
        assert!(xml.contains("<duration>12</duration>"));
        assert!(xml.contains("<dot/>"));
    }
}
