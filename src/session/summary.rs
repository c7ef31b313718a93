use super::stats::SessionStats;
use super::types::SessionResult;

/// Notes-per-minute figure a session is compared against.
pub const BASELINE_NPM: i32 = 36;

/// Number of weak notes reported in a session result.
pub const FOCUS_NOTE_COUNT: usize = 2;

pub fn speed_npm(completed_notes: u32, duration_seconds: u64) -> u32 {
    (completed_notes as f64 / duration_seconds.max(1) as f64 * 60.0).round() as u32
}

pub fn session_id(seed: u32) -> String {
    format!("#88K-{:04}", seed)
}

/// "MM:SS"; minutes grow past two digits for long sessions.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn build_result(stats: &SessionStats, seed: u32, duration_seconds: u64) -> SessionResult {
    let speed = speed_npm(stats.completed_notes, duration_seconds);
    SessionResult {
        session_id: session_id(seed),
        accuracy: stats.accuracy(),
        speed_npm: speed,
        speed_delta: speed as i32 - BASELINE_NPM,
        improvements: stats.weakest_notes(FOCUS_NOTE_COUNT),
        duration_seconds,
        duration_label: format_time(duration_seconds),
        completed_notes: stats.completed_notes,
        total_notes: stats.total_notes,
    }
}
