//! Command line front end of the `actorload` binary.
use crate::actors::{Application, ApplicationError};
use crate::error::ServerError;
use crate::resolver::{DnsResolver, FleetResolver, StaticResolver};
use crate::runtime::{DriverRuntime, DEFAULT_PORT};
use actorload::actorload_core::{
    AggregateError, SpecificationError, DEFAULT_ACTORS_PER_THREAD, DEFAULT_APPLICATION,
    DEFAULT_OPERATIONS_PER_ACTOR, DEFAULT_OUTSTANDING_OPERATIONS, DEFAULT_READ_TO_WRITE_RATIO,
    DEFAULT_THREADS,
};
use actorload::prelude::*;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::time::Duration;
use thiserror::Error;
#[allow(unused)]
use tracing::{debug, error, info, instrument};

#[derive(Parser, Debug)]
#[command(version, about = "Read/write load tests for virtual actor applications")]
pub struct Cli {
    /// Expose Prometheus metrics on this port.
    #[arg(long, global = true)]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the whole test in this process.
    Local(WorkloadArgs),
    /// Coordinate a test across remote drivers.
    Remote(RemoteArgs),
    /// Serve as a driver for a remote coordinator.
    Driver(DriverArgs),
}

#[derive(Args, Debug, Clone)]
pub struct WorkloadArgs {
    /// Actor application identity: `sim`, `sim:<mean_ms>` or an `http(s)://` base url.
    #[arg(short, long, default_value = DEFAULT_APPLICATION)]
    pub application: String,

    /// Workers per driver.
    #[arg(short = 'T', long, default_value_t = DEFAULT_THREADS)]
    pub threads: NonZeroUsize,

    /// Actors per worker.
    #[arg(short = 'A', long, default_value_t = DEFAULT_ACTORS_PER_THREAD)]
    pub actors: NonZeroUsize,

    /// Operations per actor.
    #[arg(short, long, default_value_t = DEFAULT_OPERATIONS_PER_ACTOR)]
    pub operations: NonZeroUsize,

    /// Operations in flight per worker.
    #[arg(short = 's', long, default_value_t = DEFAULT_OUTSTANDING_OPERATIONS)]
    pub outstanding_operations: NonZeroUsize,

    /// Probability that an operation is a read.
    #[arg(short, long, default_value_t = DEFAULT_READ_TO_WRITE_RATIO)]
    pub ratio: f64,

    /// Fail any operation taking longer than this, e.g. `2s` or `500ms`.
    #[arg(long, value_parser = humantime::parse_duration)]
    pub operation_timeout: Option<Duration>,
}

impl WorkloadArgs {
    pub fn specification(&self) -> TestSpecification {
        TestSpecification {
            application: self.application.clone(),
            threads: self.threads,
            actors_per_thread: self.actors,
            operations_per_actor: self.operations,
            outstanding_operations: self.outstanding_operations,
            read_to_write_ratio: self.ratio,
            operation_timeout: self.operation_timeout,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    #[command(flatten)]
    pub workload: WorkloadArgs,

    /// Number of drivers the service must resolve to.
    #[arg(short, long, default_value = "1")]
    pub drivers: NonZeroUsize,

    /// Driver service `host[:port]`, resolved through DNS.
    #[arg(short = 'u', long, default_value_t = format!("localhost:{DEFAULT_PORT}"))]
    pub driver_service: String,

    /// Explicit driver addresses; replaces DNS resolution.
    #[arg(short = 'n', long)]
    pub peers: Vec<SocketAddr>,
}

#[derive(Args, Debug, Clone)]
pub struct DriverArgs {
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("{0}")]
    Specification(#[from] SpecificationError),

    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Coordinator(#[from] CoordinatorError),

    #[error("{0}")]
    Run(#[from] RunError),

    #[error("Unable to summarize the run: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("Driver server failed: {0}")]
    Server(#[from] ServerError),

    #[error("Unable to install the metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("Unable to build the HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl ConsoleError {
    /// `2` when nothing was run because of configuration or setup, `1` when the run failed.
    pub fn exit_code(&self) -> u8 {
        use ConsoleError::*;
        match self {
            Specification(_) | Application(_) | Metrics(_) | Client(_) => 2,
            Coordinator(err) if err.before_dispatch() => 2,
            Run(RunError::Specification(_)) => 2,
            Coordinator(_) | Run(_) | Aggregate(_) | Server(_) => 1,
        }
    }
}

pub async fn run(cli: Cli) -> Result<(), ConsoleError> {
    if let Some(port) = cli.metrics_port {
        PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], port))
            .install()?;
        info!("Serving metrics on port {port}");
    }

    match cli.command {
        Command::Local(args) => {
            let results = local(&args).await?;
            print_report(&results)
        }
        Command::Remote(args) => {
            let results = remote(&args).await?;
            print_report(&results)
        }
        Command::Driver(args) => Ok(DriverRuntime::new().port(args.port).run().await?),
    }
}

#[instrument(skip_all)]
pub async fn local(args: &WorkloadArgs) -> Result<Vec<DriverResult>, ConsoleError> {
    let spec = args.specification();
    spec.validate()?;
    let application = Application::from_identity(&spec.application)?;

    let res = LocalRunner::new(application).run(0, spec).await?;
    Ok(vec![res])
}

#[instrument(skip_all, fields(drivers = args.drivers.get()))]
pub async fn remote(args: &RemoteArgs) -> Result<Vec<DriverResult>, ConsoleError> {
    let spec = args.workload.specification();
    spec.validate()?;

    let client = reqwest::Client::builder().build()?;
    let resolver = if args.peers.is_empty() {
        FleetResolver::Dns(DnsResolver::new(client))
    } else {
        FleetResolver::Static(StaticResolver::new(client, &args.peers))
    };

    let coordinator = RemoteCoordinator::new(resolver, &args.driver_service, args.drivers);
    Ok(coordinator.run(&spec).await?)
}

fn print_report(results: &[DriverResult]) -> Result<(), ConsoleError> {
    let report = Report::new(results)?;
    println!("{report}");
    Ok(())
}
