use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use mock_actors::MockConfig;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(version, about = "Presence actors for load testing")]
struct MockCli {
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Artificial latency added to every request, in milliseconds.
    #[arg(short, long, default_value_t = 0)]
    delay_ms: u64,

    /// Requests per second served before answering 503.
    #[arg(short, long)]
    capacity: Option<NonZeroU32>,

    #[arg(long)]
    metrics_port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mock_actors=info")),
        )
        .init();

    let args = MockCli::parse();
    if let Some(port) = args.metrics_port {
        PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], port))
            .install()?;
    }

    let config = MockConfig {
        delay: Duration::from_millis(args.delay_ms),
        capacity: args.capacity,
    };
    mock_actors::run(SocketAddr::from(([0, 0, 0, 0], args.port)), config).await
}
