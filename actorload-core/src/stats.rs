#[cfg(feature = "rt")]
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
#[cfg(feature = "rt")]
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

/// Running aggregate for one operation class (reads or writes).
///
/// Owned by exactly one worker while the run is in progress and merged only at join points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "rt", cfg_eval::cfg_eval, serde_as)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize))]
pub struct OperationStats {
    pub count: u64,
    #[cfg_attr(feature = "rt", serde_as(as = "Option<DurationMilliSeconds<u64>>"))]
    pub min_elapsed: Option<Duration>,
    #[cfg_attr(feature = "rt", serde_as(as = "Option<DurationMilliSeconds<u64>>"))]
    pub max_elapsed: Option<Duration>,
}

impl OperationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.count += 1;
        self.min_elapsed = Some(self.min_elapsed.map_or(elapsed, |min| min.min(elapsed)));
        self.max_elapsed = Some(self.max_elapsed.map_or(elapsed, |max| max.max(elapsed)));
    }

    /// Sum of counts, min of mins, max of maxes.
    pub fn merge(&mut self, other: &OperationStats) {
        self.count += other.count;
        self.min_elapsed = match (self.min_elapsed, other.min_elapsed) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_elapsed = match (self.max_elapsed, other.max_elapsed) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    /// Minimum elapsed time in milliseconds, `0` when nothing was recorded.
    pub fn min_millis(&self) -> u64 {
        self.min_elapsed.map_or(0, millis)
    }

    /// Maximum elapsed time in milliseconds, `0` when nothing was recorded.
    pub fn max_millis(&self) -> u64 {
        self.max_elapsed.map_or(0, millis)
    }
}

/// Outcome of one execution context: a local run, or a single remote driver.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "rt", cfg_eval::cfg_eval, serde_as)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize))]
pub struct DriverResult {
    pub driver_id: usize,
    pub read: OperationStats,
    pub write: OperationStats,
    /// Wall-clock span covering every worker of the driver.
    #[cfg_attr(feature = "rt", serde_as(as = "DurationMilliSeconds<u64>"))]
    pub elapsed: Duration,
}

impl DriverResult {
    pub fn total_operations(&self) -> u64 {
        self.read.count + self.write.count
    }

    pub fn elapsed_millis(&self) -> u64 {
        millis(self.elapsed)
    }
}

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
