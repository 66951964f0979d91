#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod actor;
pub mod coordinator;
mod error;
mod operation;
pub mod runner;
pub mod worker;

#[cfg(test)]
mod testing;

pub use actorload_core;
pub use error::RunError;
pub use operation::OperationKind;

pub mod prelude {
    pub use crate::actor::{timed, ActorApplication, ActorError, ActorHandle, ActorId};
    pub use crate::coordinator::{
        CoordinatorError, DriverEndpoint, DriverResolver, EndpointError, RemoteCoordinator,
        ResolveError,
    };
    pub use crate::runner::LocalRunner;
    pub use crate::RunError;

    pub use actorload_core::{
        AggregatedSummary, DriverResult, OperationStats, Report, TestSpecification,
    };
}
