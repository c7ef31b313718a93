use serde::Serialize;

use super::config::SetupConfig;

#[derive(Serialize, Clone, Debug)]
pub struct Training {
    pub id: String,
    pub title: String,
    pub min_note: String,
    pub max_note: String,
    pub total_notes: u32,
}

impl Training {
    fn new(id: &str, title: &str, min_note: &str, max_note: &str, total_notes: u32) -> Self {
        Training {
            id: id.to_string(),
            title: title.to_string(),
            min_note: min_note.to_string(),
            max_note: max_note.to_string(),
            total_notes,
        }
    }

    pub fn config(&self) -> SetupConfig {
        SetupConfig {
            min_note: self.min_note.clone(),
            max_note: self.max_note.clone(),
            total_notes: self.total_notes,
        }
        .normalized()
    }
}

/// Built-in preset trainings, from narrow single-staff drills to wide grand-staff ranges.
pub fn trainings() -> Vec<Training> {
    vec![
        Training::new("treble-low", "Treble low", "C4", "C5", 100),
        Training::new("bass-middle", "Bass middle", "C3", "C4", 100),
        Training::new("treble-middle", "Treble middle", "C5", "C6", 100),
        Training::new("grand-staff-narrow", "Grand staff narrow", "C3", "C5", 150),
        Training::new("bass-low-middle", "Bass low–middle", "E2", "E4", 100),
        Training::new("grand-staff-mod", "Grand staff moderate", "E2", "G5", 200),
        Training::new("grand-staff-wide", "Grand staff wide", "C2", "C6", 260),
    ]
}

pub fn find_training(id: &str) -> Option<Training> {
    trainings().into_iter().find(|t| t.id == id)
}
