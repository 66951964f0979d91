use crate::actor::{ActorApplication, ActorError, ActorId};
use crate::error::RunError;
use crate::operation::{perform, OperationKind};
use actorload_core::{OperationStats, TestSpecification};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
#[allow(unused)]
use tracing::{debug, error, instrument, trace};

/// Drives one worker's slice of the workload.
///
/// The worker owns `actors_per_thread` virtual actors and issues `operations_per_actor`
/// operations against each, never holding more than `outstanding_operations` in flight.
pub struct WorkerExecutor<A> {
    driver_id: usize,
    worker_id: usize,
    spec: Arc<TestSpecification>,
    application: Arc<A>,
}

/// Statistics a worker hands back to its driver once every operation has completed.
#[derive(Debug, Clone)]
pub struct WorkerResult {
    pub worker_id: usize,
    pub read: OperationStats,
    pub write: OperationStats,
    pub elapsed: Duration,
}

struct Completion {
    actor: ActorId,
    kind: OperationKind,
    res: Result<Duration, ActorError>,
}

impl<A: ActorApplication> WorkerExecutor<A> {
    pub fn new(
        driver_id: usize,
        worker_id: usize,
        spec: Arc<TestSpecification>,
        application: Arc<A>,
    ) -> Self {
        Self {
            driver_id,
            worker_id,
            spec,
            application,
        }
    }

    #[instrument(name = "worker", skip_all, fields(driver = self.driver_id, worker = self.worker_id))]
    pub async fn run(self) -> Result<WorkerResult, RunError> {
        self.spec.validate()?;

        let window = self.spec.outstanding_operations.get();
        let ratio = self.spec.read_to_write_ratio;
        let timeout = self.spec.operation_timeout;

        let mut in_flight = JoinSet::new();
        let mut read = OperationStats::new();
        let mut write = OperationStats::new();

        let start = Instant::now();
        for slot in 0..self.spec.actors_per_thread.get() {
            let id = ActorId::new(self.driver_id, self.worker_id, slot);
            let actor = Arc::new(self.application.actor(id));

            for _ in 0..self.spec.operations_per_actor.get() {
                // NOTE: Slide the window; wait for any one operation rather than the oldest.
                if in_flight.len() >= window {
                    let joined = in_flight.join_next().await;
                    complete(joined, &mut read, &mut write)?;
                }

                let kind = OperationKind::draw(ratio);
                let actor = actor.clone();
                in_flight.spawn(async move {
                    let res = perform(actor.as_ref(), kind, timeout).await;
                    Completion {
                        actor: id,
                        kind,
                        res,
                    }
                });
            }
        }

        while !in_flight.is_empty() {
            let joined = in_flight.join_next().await;
            complete(joined, &mut read, &mut write)?;
        }
        let elapsed = start.elapsed();

        debug!(
            "Worker finished: {} reads, {} writes in {}",
            read.count,
            write.count,
            humantime::format_duration(elapsed)
        );

        Ok(WorkerResult {
            worker_id: self.worker_id,
            read,
            write,
            elapsed,
        })
    }
}

fn complete(
    joined: Option<Result<Completion, JoinError>>,
    read: &mut OperationStats,
    write: &mut OperationStats,
) -> Result<(), RunError> {
    // NOTE: Callers only join on a non-empty set
    let Some(joined) = joined else {
        return Ok(());
    };

    let Completion { actor, kind, res } = joined?;
    match res {
        Ok(elapsed) => {
            trace!("{kind} on {actor} took {elapsed:?}");
            match kind {
                OperationKind::Read => read.record(elapsed),
                OperationKind::Write => write.record(elapsed),
            }
            Ok(())
        }
        Err(source) => {
            error!("{kind} on {actor} failed: {source}");
            Err(RunError::Operation {
                actor,
                kind,
                source,
            })
        }
    }
}
