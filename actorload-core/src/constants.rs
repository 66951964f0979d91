use std::num::NonZeroUsize;

/// Application used when none is given: in-process simulated actors.
pub const DEFAULT_APPLICATION: &str = "sim";

pub const DEFAULT_THREADS: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(1) };

pub const DEFAULT_ACTORS_PER_THREAD: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(100) };

pub const DEFAULT_OPERATIONS_PER_ACTOR: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(10) };

pub const DEFAULT_OUTSTANDING_OPERATIONS: NonZeroUsize =
    unsafe { NonZeroUsize::new_unchecked(100) };

/// Probability that a single operation is a read.
pub const DEFAULT_READ_TO_WRITE_RATIO: f64 = 0.7;
