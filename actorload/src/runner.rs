use crate::actor::ActorApplication;
use crate::error::RunError;
use crate::worker::WorkerExecutor;
use actorload_core::{DriverResult, OperationStats, TestSpecification};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;
#[allow(unused)]
use tracing::{debug, error, info, instrument, Instrument};

/// Runs a whole driver's workload in this process.
///
/// Spawns one [`WorkerExecutor`] per configured thread, waits for every one of them and merges
/// their statistics into a single [`DriverResult`].
pub struct LocalRunner<A> {
    application: Arc<A>,
}

impl<A> Clone for LocalRunner<A> {
    fn clone(&self) -> Self {
        Self {
            application: self.application.clone(),
        }
    }
}

impl<A: ActorApplication> LocalRunner<A> {
    pub fn new(application: A) -> Self {
        Self::from_shared(Arc::new(application))
    }

    pub fn from_shared(application: Arc<A>) -> Self {
        Self { application }
    }

    #[instrument(name = "driver", skip_all, fields(driver = driver_id, application = %spec.application))]
    pub async fn run(
        &self,
        driver_id: usize,
        spec: TestSpecification,
    ) -> Result<DriverResult, RunError> {
        spec.validate()?;
        info!(
            "Running {} workers x {} actors x {} operations",
            spec.threads, spec.actors_per_thread, spec.operations_per_actor
        );

        let spec = Arc::new(spec);
        let mut workers = JoinSet::new();

        let start = Instant::now();
        for worker_id in 0..spec.threads.get() {
            let worker =
                WorkerExecutor::new(driver_id, worker_id, spec.clone(), self.application.clone());
            workers.spawn(worker.run().in_current_span());
        }

        let mut read = OperationStats::new();
        let mut write = OperationStats::new();
        // NOTE: Returning early drops the set, which aborts the remaining workers.
        while let Some(joined) = workers.join_next().await {
            let res = joined??;
            read.merge(&res.read);
            write.merge(&res.write);
        }
        let elapsed = start.elapsed();

        info!(
            "Driver finished {} operations in {}",
            read.count + write.count,
            humantime::format_duration(elapsed)
        );

        Ok(DriverResult {
            driver_id,
            read,
            write,
            elapsed,
        })
    }
}
