//! HTTP transport, driver fleet resolution and actor application adapters for `actorload`.
//!
//! The `actorload` binary built from this crate runs a test locally, coordinates a fleet of
//! remote drivers, or serves as one of those drivers.
pub mod actors;
pub mod console;
pub mod endpoint;
mod error;
mod message;
pub mod resolver;
pub mod runtime;
mod server;

pub use crate::actors::{Application, ApplicationError};
pub use crate::endpoint::HttpEndpoint;
pub use crate::error::ServerError;
pub use crate::message::{DriverInfo, RunRequest};
pub use crate::resolver::{DnsResolver, FleetResolver, StaticResolver};
pub use crate::runtime::{DriverRuntime, DEFAULT_PORT};
