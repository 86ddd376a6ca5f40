//! Progress tracking for sequential batch runs.
//!
//! A batch is anchored to a monotonic start instant; every completed
//! item advances the counter and the derived fraction and ETA follow.

use std::time::Instant;

/// Progress of a fixed-size batch processed one item at a time.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Total number of items in the batch.
    total: usize,

    /// Items finished so far, whatever their outcome.
    done: usize,

    /// The instant the batch started.
    started: Instant,

    /// Wall-clock time at start (RFC 3339).
    started_wall: String,
}

/// Snapshot handed to progress observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    pub done: usize,
    pub total: usize,
    /// Completed fraction [0.0, 1.0].
    pub fraction: f64,
    pub elapsed_secs: f64,
    /// Estimated seconds remaining, 0 until the first item completes.
    pub eta_secs: f64,
}

impl BatchProgress {
    /// Start tracking a batch of `total` items now.
    pub fn start(total: usize) -> Self {
        Self {
            total,
            done: 0,
            started: Instant::now(),
            started_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Mark one more item as finished and return the new snapshot.
    pub fn advance(&mut self) -> ProgressReport {
        self.done = (self.done + 1).min(self.total);
        self.report()
    }

    /// Current snapshot.
    pub fn report(&self) -> ProgressReport {
        let elapsed_secs = self.started.elapsed().as_secs_f64();
        Self::snapshot(self.done, self.total, elapsed_secs)
    }

    /// Wall-clock time the batch started.
    pub fn started_wall(&self) -> &str {
        &self.started_wall
    }

    /// Build a snapshot from raw counters.
    pub fn snapshot(done: usize, total: usize, elapsed_secs: f64) -> ProgressReport {
        let fraction = if total == 0 {
            1.0
        } else {
            done as f64 / total as f64
        };
        let eta_secs = if done == 0 {
            0.0
        } else {
            elapsed_secs / done as f64 * total.saturating_sub(done) as f64
        };
        ProgressReport {
            done,
            total,
            fraction,
            elapsed_secs,
            eta_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_eta() {
        let report = BatchProgress::snapshot(2, 10, 4.0);
        assert!((report.fraction - 0.2).abs() < 1e-9);
        // 2s per item, 8 remaining
        assert!((report.eta_secs - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_before_first_item() {
        let report = BatchProgress::snapshot(0, 5, 1.5);
        assert_eq!(report.fraction, 0.0);
        assert_eq!(report.eta_secs, 0.0);
    }

    #[test]
    fn test_empty_batch_is_complete() {
        let report = BatchProgress::snapshot(0, 0, 0.0);
        assert_eq!(report.fraction, 1.0);
    }

    #[test]
    fn test_advance_saturates_at_total() {
        let mut progress = BatchProgress::start(2);
        progress.advance();
        progress.advance();
        let report = progress.advance();
        assert_eq!(report.done, 2);
        assert!((report.fraction - 1.0).abs() < 1e-9);
        assert!(!progress.started_wall().is_empty());
    }
}
