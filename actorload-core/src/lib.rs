//! Shared data model for actorload.
//!
//! Holds the [`TestSpecification`] handed to every driver, the per-driver [`DriverResult`] and
//! the aggregation that turns a set of results into an [`AggregatedSummary`].
mod config;
mod constants;
mod report;
mod stats;
mod summary;

pub use config::*;
pub use constants::*;
pub use report::*;
pub use stats::*;
pub use summary::*;
