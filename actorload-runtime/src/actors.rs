//! Actor applications a driver can target, selected by their identity string.
//!
//! - `sim` / `sim:<mean_ms>`: in-process actors with a normally distributed latency.
//! - `http://...` / `https://...`: presence actors served over HTTP, such as `mock-actors`.
use actorload::prelude::*;
use rand_distr::{Distribution, Normal};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_SIMULATED_MEAN_MS: f64 = 5.0;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Unknown actor application: {0}")]
    Unknown(String),

    #[error("Invalid simulated latency in application {0}")]
    InvalidLatency(String),

    #[error("Invalid actor application url {identity}: {source}")]
    InvalidUrl {
        identity: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Actor application url {0} cannot be used as a base")]
    NotABase(String),

    #[error("Unable to build the HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Every application the console and driver server know how to drive.
#[derive(Debug, Clone)]
pub enum Application {
    Simulated(SimulatedActors),
    Http(HttpActors),
}

impl Application {
    pub fn from_identity(identity: &str) -> Result<Self, ApplicationError> {
        if identity == "sim" {
            return Ok(Self::Simulated(SimulatedActors::new(
                DEFAULT_SIMULATED_MEAN_MS,
            )?));
        }

        if let Some(mean) = identity.strip_prefix("sim:") {
            let mean: f64 = mean
                .parse()
                .map_err(|_| ApplicationError::InvalidLatency(identity.to_string()))?;
            return Ok(Self::Simulated(SimulatedActors::new(mean)?));
        }

        if identity.starts_with("http://") || identity.starts_with("https://") {
            return Ok(Self::Http(HttpActors::new(identity)?));
        }

        Err(ApplicationError::Unknown(identity.to_string()))
    }
}

impl ActorApplication for Application {
    type Actor = ApplicationActor;

    fn actor(&self, id: ActorId) -> ApplicationActor {
        match self {
            Self::Simulated(app) => ApplicationActor::Simulated(app.actor(id)),
            Self::Http(app) => ApplicationActor::Http(app.actor(id)),
        }
    }
}

pub enum ApplicationActor {
    Simulated(SimulatedActor),
    Http(HttpActor),
}

impl ActorHandle for ApplicationActor {
    async fn read(&self) -> Result<Duration, ActorError> {
        match self {
            Self::Simulated(actor) => actor.read().await,
            Self::Http(actor) => actor.read().await,
        }
    }

    async fn write(&self) -> Result<Duration, ActorError> {
        match self {
            Self::Simulated(actor) => actor.write().await,
            Self::Http(actor) => actor.write().await,
        }
    }
}

/// Actors that live nowhere; each operation sleeps for a sampled latency and reports it.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedActors {
    latency: Normal<f64>,
}

impl SimulatedActors {
    /// Latency is drawn from a normal distribution with the given mean (in milliseconds) and a
    /// standard deviation of a quarter of the mean.
    pub fn new(mean_ms: f64) -> Result<Self, ApplicationError> {
        if mean_ms < 0. || Duration::try_from_secs_f64(mean_ms / 1000.).is_err() {
            return Err(ApplicationError::InvalidLatency(format!("sim:{mean_ms}")));
        }
        let latency = Normal::new(mean_ms, mean_ms / 4.)
            .map_err(|_| ApplicationError::InvalidLatency(format!("sim:{mean_ms}")))?;
        Ok(Self { latency })
    }
}

impl ActorApplication for SimulatedActors {
    type Actor = SimulatedActor;

    fn actor(&self, _id: ActorId) -> SimulatedActor {
        SimulatedActor {
            latency: self.latency,
        }
    }
}

pub struct SimulatedActor {
    latency: Normal<f64>,
}

impl SimulatedActor {
    fn sample(&self) -> Result<Duration, ActorError> {
        let ms = self.latency.sample(&mut rand::thread_rng()).max(0.);
        Duration::try_from_secs_f64(ms / 1000.).map_err(ActorError::transport)
    }

    async fn operate(&self) -> Result<Duration, ActorError> {
        let latency = self.sample()?;
        tokio::time::sleep(latency).await;
        Ok(latency)
    }
}

impl ActorHandle for SimulatedActor {
    async fn read(&self) -> Result<Duration, ActorError> {
        self.operate().await
    }

    async fn write(&self) -> Result<Duration, ActorError> {
        self.operate().await
    }
}

/// Body of the presence routes. Mirrors `mock_actors::Presence`; the two are checked against
/// each other in the workspace integration tests.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presence {
    pub online: bool,
}

/// Presence actors served over HTTP under `{base}/actors/{id}/presence`.
#[derive(Debug, Clone)]
pub struct HttpActors {
    client: Client,
    base: Url,
}

impl HttpActors {
    pub fn new(identity: &str) -> Result<Self, ApplicationError> {
        let base = Url::parse(identity).map_err(|source| ApplicationError::InvalidUrl {
            identity: identity.to_string(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(ApplicationError::NotABase(identity.to_string()));
        }

        Ok(Self {
            client: Client::builder().build()?,
            base,
        })
    }
}

impl ActorApplication for HttpActors {
    type Actor = HttpActor;

    fn actor(&self, id: ActorId) -> HttpActor {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["actors", &id.to_string(), "presence"]);
        }

        HttpActor {
            client: self.client.clone(),
            url,
        }
    }
}

pub struct HttpActor {
    client: Client,
    url: Url,
}

impl HttpActor {
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl ActorHandle for HttpActor {
    async fn read(&self) -> Result<Duration, ActorError> {
        timed(async {
            let res = self
                .client
                .get(self.url.clone())
                .send()
                .await
                .map_err(ActorError::transport)?;
            accepted(res).await
        })
        .await
    }

    async fn write(&self) -> Result<Duration, ActorError> {
        let presence = Presence {
            online: rand::random(),
        };
        timed(async {
            let res = self
                .client
                .put(self.url.clone())
                .json(&presence)
                .send()
                .await
                .map_err(ActorError::transport)?;
            accepted(res).await
        })
        .await
    }
}

async fn accepted(res: Response) -> Result<(), ActorError> {
    let status = res.status();
    if status.is_success() {
        return Ok(());
    }
    let body = res.text().await.unwrap_or_default();
    Err(ActorError::Rejected(format!("{status}: {body}")))
}
