//! Seams between the load driver and the actor application under test.
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Stable address of a virtual actor.
///
/// The same driver/worker/slot triple always names the same actor, so two runs with the same
/// specification touch the same set of actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId {
    pub driver: usize,
    pub worker: usize,
    pub slot: usize,
}

impl ActorId {
    pub fn new(driver: usize, worker: usize, slot: usize) -> Self {
        Self {
            driver,
            worker,
            slot,
        }
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.driver, self.worker, self.slot)
    }
}

/// One remote actor. Both operations return the elapsed time the call took.
///
/// Implementations may measure the call themselves (see [`timed`]) or report a latency from
/// elsewhere; the driver records whatever comes back.
pub trait ActorHandle: Send + Sync + 'static {
    fn read(&self) -> impl Future<Output = Result<Duration, ActorError>> + Send;

    fn write(&self) -> impl Future<Output = Result<Duration, ActorError>> + Send;
}

/// The actor application a test targets. Hands out a handle per virtual actor.
pub trait ActorApplication: Send + Sync + 'static {
    type Actor: ActorHandle;

    fn actor(&self, id: ActorId) -> Self::Actor;
}

#[derive(Debug, Error)]
pub enum ActorError {
    #[error("Actor rejected the operation: {0}")]
    Rejected(String),

    #[error("Operation did not complete within {0:?}")]
    TimedOut(Duration),

    #[error("Transport error: {0}")]
    Transport(#[from] Box<dyn StdError + Send + Sync>),
}

impl ActorError {
    pub fn transport<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Transport(Box::new(err))
    }
}

/// Measure how long `fut` takes to resolve successfully.
pub async fn timed<F, T, E>(fut: F) -> Result<Duration, E>
where
    F: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    fut.await?;
    Ok(start.elapsed())
}
