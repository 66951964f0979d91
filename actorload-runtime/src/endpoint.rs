use crate::message::{DriverInfo, RunRequest};
use actorload::prelude::*;
use reqwest::{Client, Response};
use std::net::SocketAddr;
use url::Url;
#[allow(unused)]
use tracing::{debug, error, info, instrument};

/// A remote driver reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: Client,
    base: Url,
}

impl HttpEndpoint {
    pub fn new(client: Client, addr: SocketAddr) -> Result<Self, url::ParseError> {
        let base = Url::parse(&format!("http://{addr}/"))?;
        Ok(Self { client, base })
    }

    fn route(&self, path: &str) -> Result<Url, EndpointError> {
        self.base.join(path).map_err(EndpointError::transport)
    }
}

impl DriverEndpoint for HttpEndpoint {
    fn address(&self) -> String {
        self.base.to_string()
    }

    #[instrument(skip_all, fields(driver = %self.base))]
    async fn probe(&self) -> Result<(), EndpointError> {
        let res = self
            .client
            .get(self.route("ping")?)
            .send()
            .await
            .map_err(EndpointError::transport)?;
        let info: DriverInfo = successful(res)
            .await?
            .json()
            .await
            .map_err(EndpointError::transport)?;

        debug!("Driver {} running version {}", info.server_id, info.version);
        Ok(())
    }

    #[instrument(skip_all, fields(driver = %self.base, driver_id = driver_id))]
    async fn run_test(
        &self,
        driver_id: usize,
        spec: &TestSpecification,
    ) -> Result<DriverResult, EndpointError> {
        let request = RunRequest {
            driver_id,
            specification: spec.clone(),
        };
        let res = self
            .client
            .post(self.route("run")?)
            .json(&request)
            .send()
            .await
            .map_err(EndpointError::transport)?;

        successful(res)
            .await?
            .json()
            .await
            .map_err(EndpointError::transport)
    }
}

async fn successful(res: Response) -> Result<Response, EndpointError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let message = res.text().await.unwrap_or_default();
    Err(EndpointError::Driver {
        status: status.as_u16(),
        message,
    })
}
