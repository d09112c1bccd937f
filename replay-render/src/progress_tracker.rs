//! Progress tracking with ETA estimation

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Thread-safe progress tracker with ETA estimation.
///
/// Shared by reference across render workers; reports through `tracing`.
pub struct ProgressTracker {
    total: u64,
    processed: AtomicU64,
    start_time: Instant,
    label: String,
}

impl ProgressTracker {
    /// Creates a new progress tracker
    pub fn new(total: u64, label: &str) -> Self {
        Self {
            total,
            processed: AtomicU64::new(0),
            start_time: Instant::now(),
            label: label.to_string(),
        }
    }

    /// Number of items processed so far
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Increments the processed count by one, reporting every
    /// `report_interval` items and on completion
    pub fn increment_and_report(&self, report_interval: u64) {
        let current = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
        if current % report_interval.max(1) == 0 || current == self.total {
            self.report(current);
        }
    }

    fn report(&self, current: u64) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let elapsed_secs = round_tenths(elapsed);

        match self.remaining_secs(current, elapsed) {
            Some(eta) => tracing::info!(
                label = %self.label,
                current,
                total = self.total,
                percent = round_tenths(current as f64 / self.total as f64 * 100.0),
                elapsed_secs,
                eta_secs = round_tenths(eta),
                "progress"
            ),
            None => tracing::info!(label = %self.label, total = self.total, elapsed_secs, "completed"),
        }
    }

    /// Seconds left at the current rate, `None` once everything is processed
    fn remaining_secs(&self, current: u64, elapsed_secs: f64) -> Option<f64> {
        if current >= self.total {
            return None;
        }
        let rate = current as f64 / elapsed_secs.max(f64::EPSILON);
        Some((self.total - current) as f64 / rate)
    }
}

fn round_tenths(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
