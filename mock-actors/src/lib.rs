//! Toy presence actors served over HTTP.
//!
//! Every actor id exists implicitly and starts offline. `GET /actors/:id/presence` returns the
//! actor's presence, `PUT /actors/:id/presence` replaces it.
use axum::{
    debug_handler,
    extract::{Json, Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
#[allow(unused)]
use metrics::{counter, gauge, histogram};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, PoisonError, RwLock,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Presence body, `{"online": bool}`. Must stay wire compatible with
/// `actorload_runtime::actors::Presence`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presence {
    pub online: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MockConfig {
    /// Added to every request before it is answered.
    pub delay: Duration,
    /// Requests per second served; anything above is answered with `503`.
    pub capacity: Option<NonZeroU32>,
}

pub struct ActorStore {
    actors: RwLock<HashMap<String, Presence>>,
    delay: Duration,
    limiter: Option<DefaultDirectRateLimiter>,
    operations: AtomicU64,
}

impl ActorStore {
    pub fn new(config: MockConfig) -> Self {
        Self {
            actors: RwLock::new(HashMap::new()),
            delay: config.delay,
            limiter: config.capacity.map(rate_limiter),
            operations: AtomicU64::new(0),
        }
    }

    /// Operations served since the last call.
    pub fn take_operations(&self) -> u64 {
        self.operations.swap(0, Ordering::Relaxed)
    }

    pub fn presence(&self, id: &str) -> Presence {
        self.actors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .copied()
            .unwrap_or_default()
    }

    pub fn set_presence(&self, id: String, presence: Presence) {
        self.actors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, presence);
    }

    async fn admit(&self) -> Result<(), StatusCode> {
        self.operations.fetch_add(1, Ordering::Relaxed);
        if let Some(limiter) = &self.limiter {
            if limiter.check().is_err() {
                counter!("mock_actors_rejected_total").increment(1);
                return Err(StatusCode::SERVICE_UNAVAILABLE);
            }
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(())
    }
}

pub fn router(store: Arc<ActorStore>) -> Router {
    Router::new()
        .route(
            "/actors/:id/presence",
            get(get_presence).put(put_presence),
        )
        .with_state(store)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(listener: TcpListener, store: Arc<ActorStore>) -> std::io::Result<()> {
    debug!("Mock actors listening on {:?}", listener.local_addr());
    axum::serve(listener, router(store)).await
}

pub async fn run(addr: SocketAddr, config: MockConfig) -> anyhow::Result<()> {
    let store = Arc::new(ActorStore::new(config));
    tokio::spawn(throughput_task(store.clone()));

    let listener = TcpListener::bind(addr).await?;
    info!("Mock actors listening on {addr}");
    serve(listener, store).await?;
    Ok(())
}

#[debug_handler]
pub async fn get_presence(
    State(store): State<Arc<ActorStore>>,
    Path(id): Path<String>,
) -> Result<Json<Presence>, StatusCode> {
    store.admit().await?;
    counter!("mock_actors_read_total").increment(1);
    Ok(Json(store.presence(&id)))
}

#[debug_handler]
pub async fn put_presence(
    State(store): State<Arc<ActorStore>>,
    Path(id): Path<String>,
    Json(presence): Json<Presence>,
) -> Result<StatusCode, StatusCode> {
    store.admit().await?;
    counter!("mock_actors_write_total").increment(1);
    store.set_presence(id, presence);
    Ok(StatusCode::NO_CONTENT)
}

/** Utils **/

pub fn rate_limiter(per_second: NonZeroU32) -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_second(per_second))
}

/** Throughput printer **/

pub async fn throughput_task(store: Arc<ActorStore>) {
    loop {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let operations = store.take_operations();
        if operations > 0 {
            info!("{operations} operations/s");
        }
    }
}
