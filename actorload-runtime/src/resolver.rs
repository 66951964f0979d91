//! Ways of finding the drivers behind a service identity.
use crate::endpoint::HttpEndpoint;
use crate::runtime::DEFAULT_PORT;
use actorload::prelude::*;
use reqwest::Client;
use std::collections::BTreeSet;
use std::net::SocketAddr;
#[allow(unused)]
use tracing::{debug, error, info, instrument};

/// Resolves a `host[:port]` service through DNS. Every distinct address is one driver.
///
/// A name answering with both IPv4 and IPv6 addresses is taken at its IPv4 addresses only, so a
/// dual-stack host counts once.
#[derive(Debug, Clone, Default)]
pub struct DnsResolver {
    client: Client,
}

impl DnsResolver {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl DriverResolver for DnsResolver {
    type Endpoint = HttpEndpoint;

    #[instrument(skip(self))]
    async fn resolve(&self, service: &str) -> Result<Vec<HttpEndpoint>, ResolveError> {
        if service.is_empty() || service.contains("://") {
            return Err(ResolveError::InvalidService(service.to_string()));
        }

        let target = if has_port(service) {
            service.to_string()
        } else {
            format!("{service}:{DEFAULT_PORT}")
        };

        let addrs = tokio::net::lookup_host(target.as_str())
            .await
            .map_err(|source| ResolveError::Lookup {
                service: service.to_string(),
                source,
            })?;
        let addrs = single_family(addrs);
        debug!("Resolved {service} to {addrs:?}");

        endpoints(&self.client, addrs)
    }
}

/// A fixed list of driver addresses. The service identity is ignored.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    client: Client,
    peers: Vec<SocketAddr>,
}

impl StaticResolver {
    pub fn new(client: Client, peers: &[SocketAddr]) -> Self {
        Self {
            client,
            peers: peers.to_vec(),
        }
    }
}

impl DriverResolver for StaticResolver {
    type Endpoint = HttpEndpoint;

    async fn resolve(&self, _service: &str) -> Result<Vec<HttpEndpoint>, ResolveError> {
        // NOTE: Keep the order given on the command line; it decides driver ids.
        let mut seen = BTreeSet::new();
        let peers = self.peers.iter().copied().filter(|addr| seen.insert(*addr));
        endpoints(&self.client, peers)
    }
}

/// Resolver picked at startup by the console.
#[derive(Debug, Clone)]
pub enum FleetResolver {
    Dns(DnsResolver),
    Static(StaticResolver),
}

impl DriverResolver for FleetResolver {
    type Endpoint = HttpEndpoint;

    async fn resolve(&self, service: &str) -> Result<Vec<HttpEndpoint>, ResolveError> {
        match self {
            Self::Dns(resolver) => resolver.resolve(service).await,
            Self::Static(resolver) => resolver.resolve(service).await,
        }
    }
}

fn has_port(service: &str) -> bool {
    service
        .rsplit_once(':')
        .is_some_and(|(_, port)| port.parse::<u16>().is_ok())
}

/// Distinct addresses of one family, IPv4 when the lookup returned any.
fn single_family(addrs: impl IntoIterator<Item = SocketAddr>) -> BTreeSet<SocketAddr> {
    let addrs: BTreeSet<SocketAddr> = addrs.into_iter().collect();
    if addrs.iter().any(SocketAddr::is_ipv4) {
        addrs.into_iter().filter(SocketAddr::is_ipv4).collect()
    } else {
        addrs
    }
}

fn endpoints(
    client: &Client,
    addrs: impl IntoIterator<Item = SocketAddr>,
) -> Result<Vec<HttpEndpoint>, ResolveError> {
    addrs
        .into_iter()
        .map(|addr| {
            HttpEndpoint::new(client.clone(), addr)
                .map_err(|_| ResolveError::InvalidService(addr.to_string()))
        })
        .collect()
}
