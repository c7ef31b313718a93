use serde::{Deserialize, Serialize};

/// Stopwatch for active practice time.
///
/// Timestamps are supplied by the caller in milliseconds (e.g.
/// `performance.now()`), so elapsed time is reproducible in tests.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SessionClock {
    accumulated_ms: f64,
    started_at: Option<f64>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now_ms: f64) {
        if self.started_at.is_none() {
            self.started_at = Some(now_ms);
        }
    }

    pub fn stop(&mut self, now_ms: f64) {
        if let Some(start) = self.started_at.take() {
            self.accumulated_ms += (now_ms - start).max(0.0);
        }
    }

    pub fn toggle(&mut self, now_ms: f64) {
        if self.is_running() {
            self.stop(now_ms);
        } else {
            self.start(now_ms);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        let running = self.started_at.map_or(0.0, |start| (now_ms - start).max(0.0));
        self.accumulated_ms + running
    }

    pub fn elapsed_seconds(&self, now_ms: f64) -> u64 {
        (self.elapsed_ms(now_ms) / 1000.0).floor() as u64
    }
}
