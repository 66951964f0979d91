use crate::actors::{Application, ApplicationError};
use crate::error::ServerError;
use crate::message::{DriverInfo, RunRequest};
use actorload::actorload_core::SpecificationError;
use actorload::prelude::*;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

pub(crate) async fn server_task(
    listener: TcpListener,
    server_id: Uuid,
) -> Result<(), ServerError> {
    let app = router(ServerState::new(server_id));

    debug!("Axum server starting up on {:?}...", listener.local_addr());
    axum::serve(listener, app).await?;

    Ok(())
}

pub(crate) fn router(state: ServerState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/run", post(run))
        .with_state(Arc::new(state))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

pub(crate) struct ServerState {
    server_id: Uuid,
    busy: AtomicBool,
}

impl ServerState {
    pub(crate) fn new(server_id: Uuid) -> Self {
        Self {
            server_id,
            busy: AtomicBool::new(false),
        }
    }

    /// A driver runs one test at a time.
    fn claim(&self) -> Result<BusyGuard<'_>, HandlerError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| HandlerError::Busy)?;
        Ok(BusyGuard(&self.busy))
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Error, Debug)]
enum HandlerError {
    #[error("Invalid test specification: {0}")]
    Specification(#[from] SpecificationError),

    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("Driver is already running a test")]
    Busy,

    #[error("Run failed: {0}")]
    Run(#[from] RunError),
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        use HandlerError::*;
        let status = match &self {
            Specification(_) => StatusCode::BAD_REQUEST,
            Application(ApplicationError::Unknown(_)) => StatusCode::NOT_FOUND,
            Application(ApplicationError::Client(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Application(_) => StatusCode::BAD_REQUEST,
            Busy => StatusCode::CONFLICT,
            Run(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

async fn ping(State(state): State<Arc<ServerState>>) -> Json<DriverInfo> {
    Json(DriverInfo {
        server_id: state.server_id,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[instrument(skip_all, fields(driver_id = request.driver_id, application = %request.specification.application))]
async fn run(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<RunRequest>,
) -> Result<Json<DriverResult>, HandlerError> {
    let RunRequest {
        driver_id,
        specification,
    } = request;

    specification.validate()?;
    let application = Application::from_identity(&specification.application)?;
    let _guard = state.claim()?;

    info!("Running test as driver {driver_id}.");
    let res = LocalRunner::new(application)
        .run(driver_id, specification)
        .await
        .map_err(|err| {
            error!("Driver run failed: {err}");
            err
        })?;

    Ok(Json(res))
}
