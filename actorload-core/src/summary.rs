use crate::DriverResult;
use thiserror::Error;

/// Cross-driver view of a finished run.
///
/// Derived from a set of [`DriverResult`]s each time it is reported and never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedSummary {
    pub total_reads: u64,
    pub total_writes: u64,
    pub read_percentage: f64,
    pub min_elapsed_ms: u64,
    pub max_elapsed_ms: u64,
    /// Mean of the per-driver elapsed times, truncated to whole milliseconds.
    pub avg_elapsed_ms: u64,
    /// Operations per second against the slowest driver. `None` when that elapsed time is 0ms.
    pub min_throughput: Option<f64>,
    /// Operations per second against the fastest driver. `None` when that elapsed time is 0ms.
    pub max_throughput: Option<f64>,
    pub avg_throughput: Option<f64>,
}

impl AggregatedSummary {
    pub fn from_results(results: &[DriverResult]) -> Result<Self, AggregateError> {
        if results.is_empty() {
            return Err(AggregateError::NoResults);
        }

        let total_reads: u64 = results.iter().map(|r| r.read.count).sum();
        let total_writes: u64 = results.iter().map(|r| r.write.count).sum();
        let total = total_reads + total_writes;
        if total == 0 {
            return Err(AggregateError::NoOperations);
        }

        let elapsed: Vec<u64> = results.iter().map(DriverResult::elapsed_millis).collect();
        // NOTE: Non-empty checked above
        let min_elapsed_ms = elapsed.iter().copied().min().unwrap_or_default();
        let max_elapsed_ms = elapsed.iter().copied().max().unwrap_or_default();
        let sum: u128 = elapsed.iter().map(|&e| u128::from(e)).sum();
        let avg_elapsed_ms = (sum / elapsed.len() as u128) as u64;

        Ok(Self {
            total_reads,
            total_writes,
            read_percentage: 100.0 * total_reads as f64 / total as f64,
            min_elapsed_ms,
            max_elapsed_ms,
            avg_elapsed_ms,
            // NOTE: The slowest driver bounds throughput from below, the fastest from above.
            min_throughput: throughput(total, max_elapsed_ms),
            max_throughput: throughput(total, min_elapsed_ms),
            avg_throughput: throughput(total, avg_elapsed_ms),
        })
    }

    pub fn total_operations(&self) -> u64 {
        self.total_reads + self.total_writes
    }
}

fn throughput(operations: u64, elapsed_ms: u64) -> Option<f64> {
    if elapsed_ms == 0 {
        None
    } else {
        Some(1000.0 * operations as f64 / elapsed_ms as f64)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("No driver results to aggregate")]
    NoResults,

    #[error("Drivers reported zero operations; read percentage is undefined")]
    NoOperations,
}
