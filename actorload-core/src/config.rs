use crate::{
    DEFAULT_ACTORS_PER_THREAD, DEFAULT_APPLICATION, DEFAULT_OPERATIONS_PER_ACTOR,
    DEFAULT_OUTSTANDING_OPERATIONS, DEFAULT_READ_TO_WRITE_RATIO, DEFAULT_THREADS,
};
#[cfg(feature = "rt")]
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
#[cfg(feature = "rt")]
use serde_with::{serde_as, DurationMilliSeconds};
use std::num::NonZeroUsize;
use std::time::Duration;
use thiserror::Error;

/// Workload handed to every driver taking part in a run.
///
/// Built once from validated configuration and never mutated afterwards. Workers share it
/// behind an `Arc`; remote drivers receive an identical serialized copy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "rt", cfg_eval::cfg_eval, serde_as)]
#[cfg_attr(feature = "rt", derive(Serialize, Deserialize))]
pub struct TestSpecification {
    /// Identity of the actor application under test.
    pub application: String,
    /// Concurrent workers per driver.
    pub threads: NonZeroUsize,
    pub actors_per_thread: NonZeroUsize,
    pub operations_per_actor: NonZeroUsize,
    /// Upper bound on in-flight operations for a single worker.
    pub outstanding_operations: NonZeroUsize,
    /// Probability in `[0, 1]` that an operation is a read.
    pub read_to_write_ratio: f64,
    /// Fails an operation that has not completed within this duration. Without it a stuck
    /// operation stalls its worker forever.
    #[cfg_attr(feature = "rt", serde_as(as = "Option<DurationMilliSeconds<u64>>"))]
    pub operation_timeout: Option<Duration>,
}

impl Default for TestSpecification {
    fn default() -> Self {
        Self::new(DEFAULT_APPLICATION)
    }
}

impl TestSpecification {
    pub fn new(application: &str) -> Self {
        Self {
            application: application.to_string(),
            threads: DEFAULT_THREADS,
            actors_per_thread: DEFAULT_ACTORS_PER_THREAD,
            operations_per_actor: DEFAULT_OPERATIONS_PER_ACTOR,
            outstanding_operations: DEFAULT_OUTSTANDING_OPERATIONS,
            read_to_write_ratio: DEFAULT_READ_TO_WRITE_RATIO,
            operation_timeout: None,
        }
    }

    pub fn validate(&self) -> Result<(), SpecificationError> {
        if self.application.trim().is_empty() {
            return Err(SpecificationError::EmptyApplication);
        }

        let ratio = self.read_to_write_ratio;
        if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
            return Err(SpecificationError::RatioOutOfRange(ratio));
        }

        if self.operation_timeout == Some(Duration::ZERO) {
            return Err(SpecificationError::ZeroTimeout);
        }

        Ok(())
    }

    /// Operations a single worker performs.
    pub fn operations_per_worker(&self) -> usize {
        self.actors_per_thread.get() * self.operations_per_actor.get()
    }

    /// Operations a single driver performs across all of its workers.
    pub fn operations_per_driver(&self) -> usize {
        self.threads.get() * self.operations_per_worker()
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpecificationError {
    #[error("Application name must not be empty")]
    EmptyApplication,

    #[error("Read-to-write ratio must be within [0, 1], found {0}")]
    RatioOutOfRange(f64),

    #[error("Operation timeout must be greater than zero")]
    ZeroTimeout,
}
