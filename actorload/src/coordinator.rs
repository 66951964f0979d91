//! Fan a test out to a fleet of remote drivers and collect their results.
use crate::actor::ActorApplication;
use crate::error::RunError;
use crate::runner::LocalRunner;
use actorload_core::{DriverResult, SpecificationError, TestSpecification};
use futures_util::future::join_all;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::num::NonZeroUsize;
use thiserror::Error;
#[allow(unused)]
use tracing::{debug, error, info, instrument, warn};

/// Handle to one driver process.
pub trait DriverEndpoint: Send + Sync {
    /// Human readable location, used for logging.
    fn address(&self) -> String;

    /// Lightweight liveness check.
    fn probe(&self) -> impl Future<Output = Result<(), EndpointError>> + Send;

    /// Run the full specification on the driver and wait for its result.
    fn run_test(
        &self,
        driver_id: usize,
        spec: &TestSpecification,
    ) -> impl Future<Output = Result<DriverResult, EndpointError>> + Send;
}

/// Turns a driver service identity into the endpoints currently serving it.
pub trait DriverResolver: Send + Sync {
    type Endpoint: DriverEndpoint;

    fn resolve(
        &self,
        service: &str,
    ) -> impl Future<Output = Result<Vec<Self::Endpoint>, ResolveError>> + Send;
}

/// A [`LocalRunner`] is a driver that happens to live in this process.
impl<A: ActorApplication> DriverEndpoint for LocalRunner<A> {
    fn address(&self) -> String {
        "local".to_string()
    }

    async fn probe(&self) -> Result<(), EndpointError> {
        Ok(())
    }

    async fn run_test(
        &self,
        driver_id: usize,
        spec: &TestSpecification,
    ) -> Result<DriverResult, EndpointError> {
        Ok(self.run(driver_id, spec.clone()).await?)
    }
}

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("Driver rejected the request ({status}): {message}")]
    Driver { status: u16, message: String },

    #[error("Driver run failed: {0}")]
    Run(#[from] RunError),

    #[error("Transport error: {0}")]
    Transport(#[from] Box<dyn StdError + Send + Sync>),
}

impl EndpointError {
    pub fn transport<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Transport(Box::new(err))
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid driver service identity: {0}")]
    InvalidService(String),

    #[error("Unable to resolve driver service {service}: {source}")]
    Lookup {
        service: String,
        #[source]
        source: std::io::Error,
    },
}

/// One driver that did not make it through priming or dispatch.
#[derive(Debug)]
pub struct DriverFailure {
    pub driver_id: usize,
    pub address: String,
    pub error: EndpointError,
}

impl fmt::Display for DriverFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "driver {} at {}: {}",
            self.driver_id, self.address, self.error
        )
    }
}

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Invalid test specification: {0}")]
    Specification(#[from] SpecificationError),

    #[error("Driver resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Could not resolve one or more drivers of service {service}, found {found}, expected {expected}")]
    DriverCountMismatch {
        service: String,
        found: usize,
        expected: usize,
    },

    #[error("{} driver(s) failed priming: {}", .0.len(), list(.0))]
    Prime(Vec<DriverFailure>),

    #[error("{} driver(s) failed the test: {}", .0.len(), list(.0))]
    DriversFailed(Vec<DriverFailure>),
}

impl CoordinatorError {
    /// Whether the run was aborted before any workload was dispatched.
    pub fn before_dispatch(&self) -> bool {
        !matches!(self, Self::DriversFailed(_))
    }
}

fn list(failures: &[DriverFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Runs one specification across a fleet of drivers.
///
/// The fleet must match the expected size exactly and every driver must answer a probe before
/// any work is sent. A single failed driver fails the whole run.
pub struct RemoteCoordinator<R> {
    resolver: R,
    service: String,
    expected_drivers: NonZeroUsize,
}

impl<R: DriverResolver> RemoteCoordinator<R> {
    pub fn new(resolver: R, service: &str, expected_drivers: NonZeroUsize) -> Self {
        Self {
            resolver,
            service: service.to_string(),
            expected_drivers,
        }
    }

    #[instrument(name = "coordinator", skip_all, fields(service = %self.service))]
    pub async fn run(&self, spec: &TestSpecification) -> Result<Vec<DriverResult>, CoordinatorError> {
        spec.validate()?;

        let drivers = self.resolve().await?;
        self.prime(&drivers).await?;
        self.dispatch(&drivers, spec).await
    }

    pub async fn resolve(&self) -> Result<Vec<R::Endpoint>, CoordinatorError> {
        let drivers = self.resolver.resolve(&self.service).await?;
        let expected = self.expected_drivers.get();

        if drivers.len() != expected {
            error!(
                "Found {} drivers for {}, expected {expected}",
                drivers.len(),
                self.service
            );
            return Err(CoordinatorError::DriverCountMismatch {
                service: self.service.clone(),
                found: drivers.len(),
                expected,
            });
        }

        debug!("Resolved {expected} drivers");
        Ok(drivers)
    }

    pub async fn prime(&self, drivers: &[R::Endpoint]) -> Result<(), CoordinatorError> {
        let probes = drivers.iter().map(|driver| driver.probe());
        let failures: Vec<_> = join_all(probes)
            .await
            .into_iter()
            .zip(drivers)
            .enumerate()
            .filter_map(|(driver_id, (res, driver))| match res {
                Ok(()) => {
                    info!("Connected to driver {driver_id} at {}", driver.address());
                    None
                }
                Err(error) => Some(DriverFailure {
                    driver_id,
                    address: driver.address(),
                    error,
                }),
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CoordinatorError::Prime(failures))
        }
    }

    pub async fn dispatch(
        &self,
        drivers: &[R::Endpoint],
        spec: &TestSpecification,
    ) -> Result<Vec<DriverResult>, CoordinatorError> {
        let runs = drivers
            .iter()
            .enumerate()
            .map(|(driver_id, driver)| async move {
                let res = driver.run_test(driver_id, spec).await;
                match &res {
                    Ok(_) => info!("Driver {driver_id} finished."),
                    Err(err) => error!("Driver {driver_id} failed: {err}"),
                }
                res
            });

        let mut results = Vec::with_capacity(drivers.len());
        let mut failures = vec![];
        for (driver_id, (res, driver)) in join_all(runs).await.into_iter().zip(drivers).enumerate() {
            match res {
                Ok(result) => {
                    if result.driver_id != driver_id {
                        warn!(
                            "Driver {driver_id} reported itself as driver {}",
                            result.driver_id
                        );
                    }
                    results.push(result);
                }
                Err(error) => failures.push(DriverFailure {
                    driver_id,
                    address: driver.address(),
                    error,
                }),
            }
        }

        if failures.is_empty() {
            Ok(results)
        } else {
            Err(CoordinatorError::DriversFailed(failures))
        }
    }
}
