//! Driver service
//!
//! A driver is a long-running HTTP server that waits for a coordinator to hand it a
//! [`TestSpecification`](actorload::prelude::TestSpecification), runs it with a
//! [`LocalRunner`](actorload::prelude::LocalRunner) and replies with the resulting
//! [`DriverResult`](actorload::prelude::DriverResult).
use crate::error::ServerError;
use crate::server::server_task;
use std::net::SocketAddr;
use tokio::net::TcpListener;
#[allow(unused)]
use tracing::{debug, error, info, instrument, Instrument};
use uuid::Uuid;

pub const DEFAULT_PORT: u16 = 7621;

/// Driver runtime.
///
/// # Example
///
/// ```ignore
/// use actorload_runtime::DriverRuntime;
///
/// #[tokio::main]
/// async fn main() {
///     DriverRuntime::new().port(2742).run().await.unwrap();
/// }
/// ```
pub struct DriverRuntime {
    port: u16,
    server_id: Uuid,
}

impl Default for DriverRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverRuntime {
    pub fn new() -> Self {
        DriverRuntime {
            port: DEFAULT_PORT,
            server_id: Uuid::new_v4(),
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn server_id(&self) -> Uuid {
        self.server_id
    }

    /// Bind every interface on the configured port and serve until the process exits.
    #[instrument(name = "actorload", skip_all, fields(port = self.port))]
    pub async fn run(self) -> Result<(), ServerError> {
        let socket_addr: SocketAddr = format!("0.0.0.0:{}", self.port).parse()?;
        let listener = TcpListener::bind(socket_addr).await?;
        info!("Driver {} listening on {socket_addr}", self.server_id);
        server_task(listener, self.server_id).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        server_task(listener, self.server_id)
            .instrument(tracing::info_span!("actorload", server = %self.server_id))
            .await
    }
}
