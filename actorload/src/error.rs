use crate::actor::{ActorError, ActorId};
use crate::operation::OperationKind;
use actorload_core::SpecificationError;
use thiserror::Error;

/// Failure of a worker or of a whole driver run. No partial result accompanies it.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid test specification: {0}")]
    Specification(#[from] SpecificationError),

    #[error("The {kind} operation on actor {actor} failed: {source}")]
    Operation {
        actor: ActorId,
        kind: OperationKind,
        #[source]
        source: ActorError,
    },

    #[error("Worker task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}
