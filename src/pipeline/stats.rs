//! Pipeline-wide statistics helpers.
//!
//! This module defines the `PipelineStats` structure used to track classification
//! outcomes and the `StatsManager` helper that coordinates thread-safe updates
//! to these metrics.

use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// Statistics for the classification pipeline.
///
/// Tracks how many images were processed, how they were decided, and the
/// average time spent in the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineStats {
    /// The total number of images processed.
    pub total_processed: usize,
    /// Images the classifier named a variety for.
    pub accepted: usize,
    /// Images rejected as "not a banana".
    pub rejected: usize,
    /// Images that ended in an error (bad input or inference failure).
    pub failed: usize,
    /// The average classification time in milliseconds.
    pub average_inference_time_ms: f64,
}

impl PipelineStats {
    /// Creates a new PipelineStats instance with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the share of images that produced a decision, as a percentage.
    pub fn success_rate(&self) -> f64 {
        self.rate(self.accepted + self.rejected)
    }

    /// Returns the share of images accepted, as a percentage.
    pub fn acceptance_rate(&self) -> f64 {
        self.rate(self.accepted)
    }

    /// Returns the failure rate as a percentage (0.0 to 100.0).
    pub fn failure_rate(&self) -> f64 {
        self.rate(self.failed)
    }

    /// Returns the average processing speed in images per second.
    pub fn images_per_second(&self) -> f64 {
        if self.average_inference_time_ms == 0.0 {
            0.0
        } else {
            1000.0 / self.average_inference_time_ms
        }
    }

    fn rate(&self, count: usize) -> f64 {
        if self.total_processed == 0 {
            0.0
        } else {
            (count as f64 / self.total_processed as f64) * 100.0
        }
    }
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Statistics:")?;
        writeln!(f, "  Total processed: {}", self.total_processed)?;
        writeln!(
            f,
            "  Accepted: {} ({:.1}%)",
            self.accepted,
            self.acceptance_rate()
        )?;
        writeln!(f, "  Rejected: {}", self.rejected)?;
        writeln!(f, "  Failed: {} ({:.1}%)", self.failed, self.failure_rate())?;
        writeln!(
            f,
            "  Average inference time: {:.2} ms",
            self.average_inference_time_ms
        )?;
        writeln!(
            f,
            "  Processing speed: {:.2} images/sec",
            self.images_per_second()
        )?;
        Ok(())
    }
}

/// How a single image ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Rejected,
    Failed,
}

/// Thread-safe manager for updating pipeline statistics.
#[derive(Debug, Default)]
pub struct StatsManager {
    /// Shared statistics state guarded by a mutex.
    stats: Mutex<PipelineStats>,
}

impl StatsManager {
    /// Creates a new `StatsManager` instance with zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    // Counters stay meaningful even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, PipelineStats> {
        self.stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns a copy of the current statistics snapshot.
    pub fn get_stats(&self) -> PipelineStats {
        self.lock().clone()
    }

    /// Records the outcomes of one classifier call.
    ///
    /// `elapsed_ms` covers the whole call and is spread evenly over its images.
    pub fn record(&self, outcomes: &[Outcome], elapsed_ms: f64) {
        if outcomes.is_empty() {
            return;
        }

        let mut stats = self.lock();
        let previous_total = stats.total_processed;
        let previous_average = stats.average_inference_time_ms;
        let new_total = previous_total + outcomes.len();

        for outcome in outcomes {
            match outcome {
                Outcome::Accepted => stats.accepted += 1,
                Outcome::Rejected => stats.rejected += 1,
                Outcome::Failed => stats.failed += 1,
            }
        }
        stats.total_processed = new_total;

        let accumulated_time = previous_average * previous_total as f64;
        stats.average_inference_time_ms = (accumulated_time + elapsed_ms) / new_total as f64;
    }

    /// Resets the tracked statistics to their default state.
    pub fn reset_stats(&self) {
        *self.lock() = PipelineStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{Outcome, PipelineStats, StatsManager};

    #[test]
    fn rates_handle_zero_processed() {
        let stats = PipelineStats::default();
        assert_eq!(stats.success_rate(), 0.0);
        assert_eq!(stats.failure_rate(), 0.0);
        assert_eq!(stats.images_per_second(), 0.0);
    }

    #[test]
    fn rates_compute_percentages() {
        let stats = PipelineStats {
            total_processed: 8,
            accepted: 4,
            rejected: 2,
            failed: 2,
            average_inference_time_ms: 75.0,
        };
        assert_eq!(stats.success_rate(), 75.0);
        assert_eq!(stats.acceptance_rate(), 50.0);
        assert_eq!(stats.failure_rate(), 25.0);
    }

    #[test]
    fn display_formats_metrics() {
        let stats = PipelineStats {
            total_processed: 10,
            accepted: 6,
            rejected: 2,
            failed: 2,
            average_inference_time_ms: 125.0,
        };

        let display = stats.to_string();
        assert!(display.contains("Total processed: 10"));
        assert!(display.contains("Accepted: 6 (60.0%)"));
        assert!(display.contains("Rejected: 2"));
        assert!(display.contains("Failed: 2 (20.0%)"));
        assert!(display.contains("Average inference time: 125.00 ms"));
        assert!(display.contains("Processing speed: 8.00 images/sec"));
    }

    #[test]
    fn stats_manager_updates_counters_and_average() {
        let manager = StatsManager::new();

        manager.record(&[Outcome::Accepted], 100.0);
        let stats = manager.get_stats();
        assert_eq!(stats.total_processed, 1);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.average_inference_time_ms, 100.0);

        manager.record(&[Outcome::Rejected, Outcome::Failed], 200.0);
        let stats = manager.get_stats();
        assert_eq!(stats.total_processed, 3);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.failed, 1);
        assert!((stats.average_inference_time_ms - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_manager_ignores_empty_and_resets() {
        let manager = StatsManager::new();
        manager.record(&[], 50.0);
        assert_eq!(manager.get_stats(), PipelineStats::default());

        manager.record(&[Outcome::Accepted; 4], 500.0);
        manager.reset_stats();
        assert_eq!(manager.get_stats(), PipelineStats::default());
    }
}
