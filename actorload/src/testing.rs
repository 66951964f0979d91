//! Actor applications used by the unit tests.
use crate::actor::{ActorApplication, ActorError, ActorHandle, ActorId};
use rand_distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Every call sleeps for a fixed (or uniformly jittered) latency and reports it.
#[derive(Clone)]
pub(crate) struct FixedActors {
    latency: Duration,
    jitter_up_to: Option<Duration>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    issued: Arc<AtomicUsize>,
}

impl FixedActors {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            jitter_up_to: None,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            issued: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn jittered(min: Duration, max: Duration) -> Self {
        Self {
            jitter_up_to: Some(max),
            ..Self::new(min)
        }
    }

    pub fn peak_in_flight(&self) -> Arc<AtomicUsize> {
        self.peak.clone()
    }

    pub fn issued(&self) -> Arc<AtomicUsize> {
        self.issued.clone()
    }

    async fn call(&self) -> Result<Duration, ActorError> {
        self.issued.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let latency = match self.jitter_up_to {
            Some(max) => {
                let millis = Uniform::new_inclusive(
                    self.latency.as_millis() as u64,
                    max.as_millis() as u64,
                )
                .sample(&mut rand::thread_rng());
                Duration::from_millis(millis)
            }
            None => self.latency,
        };
        tokio::time::sleep(latency).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(latency)
    }
}

impl ActorApplication for FixedActors {
    type Actor = FixedActors;

    fn actor(&self, _id: ActorId) -> Self::Actor {
        self.clone()
    }
}

impl ActorHandle for FixedActors {
    async fn read(&self) -> Result<Duration, ActorError> {
        self.call().await
    }

    async fn write(&self) -> Result<Duration, ActorError> {
        self.call().await
    }
}

/// Succeeds until the `fail_at`-th call (1-based), which is rejected.
#[derive(Clone)]
pub(crate) struct FailingActors {
    fail_at: usize,
    issued: Arc<AtomicUsize>,
}

impl FailingActors {
    pub fn new(fail_at: usize) -> Self {
        Self {
            fail_at,
            issued: Arc::new(AtomicUsize::new(0)),
        }
    }

    async fn call(&self) -> Result<Duration, ActorError> {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::task::yield_now().await;
        if n == self.fail_at {
            Err(ActorError::Rejected(format!("call {n} rejected")))
        } else {
            Ok(Duration::from_millis(1))
        }
    }
}

impl ActorApplication for FailingActors {
    type Actor = FailingActors;

    fn actor(&self, _id: ActorId) -> Self::Actor {
        self.clone()
    }
}

impl ActorHandle for FailingActors {
    async fn read(&self) -> Result<Duration, ActorError> {
        self.call().await
    }

    async fn write(&self) -> Result<Duration, ActorError> {
        self.call().await
    }
}

/// Never completes a call.
#[derive(Clone, Copy)]
pub(crate) struct StuckActors;

impl ActorApplication for StuckActors {
    type Actor = StuckActors;

    fn actor(&self, _id: ActorId) -> Self::Actor {
        *self
    }
}

impl ActorHandle for StuckActors {
    async fn read(&self) -> Result<Duration, ActorError> {
        std::future::pending().await
    }

    async fn write(&self) -> Result<Duration, ActorError> {
        std::future::pending().await
    }
}
