use crate::actor::{ActorError, ActorHandle};
use rand::Rng;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Read,
    Write,
}

impl OperationKind {
    /// Independent draw per call: a read with probability `ratio`, a write otherwise.
    ///
    /// Ratios above 1 always read; ratios below 0 (or NaN) always write.
    pub(crate) fn draw(ratio: f64) -> Self {
        if rand::thread_rng().gen::<f64>() < ratio {
            Self::Read
        } else {
            Self::Write
        }
    }

    #[cfg(feature = "metrics")]
    fn labels(self) -> OperationLabels {
        match self {
            Self::Read => READ_LABELS,
            Self::Write => WRITE_LABELS,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

#[cfg(feature = "metrics")]
#[derive(Copy, Clone)]
struct OperationLabels {
    total: &'static str,
    latency: &'static str,
}

#[cfg(feature = "metrics")]
const READ_LABELS: OperationLabels = OperationLabels {
    total: "actorload_read_total",
    latency: "actorload_read_latency",
};

#[cfg(feature = "metrics")]
const WRITE_LABELS: OperationLabels = OperationLabels {
    total: "actorload_write_total",
    latency: "actorload_write_latency",
};

/// Issue one operation against `actor`, bounded by `timeout` when one is configured.
pub(crate) async fn perform<A>(
    actor: &A,
    kind: OperationKind,
    timeout: Option<Duration>,
) -> Result<Duration, ActorError>
where
    A: ActorHandle,
{
    let res = match (kind, timeout) {
        (OperationKind::Read, None) => actor.read().await,
        (OperationKind::Write, None) => actor.write().await,
        (OperationKind::Read, Some(limit)) => tokio::time::timeout(limit, actor.read())
            .await
            .map_err(|_| ActorError::TimedOut(limit))?,
        (OperationKind::Write, Some(limit)) => tokio::time::timeout(limit, actor.write())
            .await
            .map_err(|_| ActorError::TimedOut(limit))?,
    };

    if let Ok(elapsed) = res {
        record(kind, elapsed);
    }

    res
}

#[cfg(feature = "metrics")]
fn record(kind: OperationKind, elapsed: Duration) {
    let labels = kind.labels();
    // TODO: Describe the histograms once at startup rather than on every call.
    metrics::describe_histogram!(labels.latency, metrics::Unit::Milliseconds, "");
    metrics::histogram!(labels.latency).record(elapsed.as_secs_f64() * 1000.0);
    metrics::counter!(labels.total).increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record(_kind: OperationKind, _elapsed: Duration) {}
