use serde::{Deserialize, Serialize};

use crate::notation::CursorAction;

/// Classification returned by the matcher for each note event.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Wrong,
    Advanced,
    Complete,
    Ignored,
}

impl Outcome {
    /// True for outcomes that move the notation cursor forward.
    pub fn advances_cursor(self) -> bool {
        matches!(self, Outcome::Advanced | Outcome::Complete)
    }
}

/// Normalized event from the input device.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InputEvent {
    On { note: u8, velocity: u8 },
    Off { note: u8 },
    AllNotesOff,
}

/// Cursor highlight feedback shown while a key is down.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Idle,
    Correct,
    Wrong,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WeakNote {
    pub note: String,
    pub misses: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SessionResult {
    pub session_id: String,
    pub accuracy: u32,
    pub speed_npm: u32,
    pub speed_delta: i32,
    pub improvements: Vec<WeakNote>,
    pub duration_seconds: u64,
    pub duration_label: String,
    pub completed_notes: u32,
    pub total_notes: u32,
}

/// Everything the UI needs after feeding one event to a practice session.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SessionUpdate {
    pub outcome: Option<Outcome>,
    pub cursor: CursorAction,
    pub feedback: Feedback,
    pub missed_label: Option<String>,
    pub result: Option<SessionResult>,
}

impl SessionUpdate {
    pub fn idle() -> Self {
        SessionUpdate {
            outcome: None,
            cursor: CursorAction::None,
            feedback: Feedback::Idle,
            missed_label: None,
            result: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_wire_names() {
        let names: Vec<String> = [
            Outcome::Correct,
            Outcome::Wrong,
            Outcome::Advanced,
            Outcome::Complete,
            Outcome::Ignored,
        ]
        .iter()
        .map(|o| serde_json::to_string(o).unwrap())
        .collect();
        assert_eq!(
            names,
            [r#""correct""#, r#""wrong""#, r#""advanced""#, r#""complete""#, r#""ignored""#]
        );
    }

    #[test]
    fn test_outcome_round_trips_from_wire_name() {
        let outcome: Outcome = serde_json::from_str(r#""advanced""#).unwrap();
        assert_eq!(outcome, Outcome::Advanced);
        assert!(outcome.advances_cursor());
        assert!(serde_json::from_str::<Outcome>(r#""Advanced""#).is_err());
    }

    #[test]
    fn test_input_event_tagging() {
        let on = serde_json::to_value(InputEvent::On { note: 60, velocity: 90 }).unwrap();
        assert_eq!(on["kind"], "on");
        assert_eq!(on["note"], 60);
        let all = serde_json::to_value(InputEvent::AllNotesOff).unwrap();
        assert_eq!(all["kind"], "allNotesOff");
    }
}
