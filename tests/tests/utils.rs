use actorload_runtime::DriverRuntime;
use mock_actors::{ActorStore, MockConfig};
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tokio::net::TcpListener;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        let _ = FmtSubscriber::builder()
            .with_env_filter("actorload=debug,actorload_runtime=debug,mock_actors=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Serve presence actors on an ephemeral port. Returns their base url.
#[allow(unused)]
pub async fn serve_mock_actors(config: MockConfig) -> (String, Arc<ActorStore>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let store = Arc::new(ActorStore::new(config));

    tokio::spawn(mock_actors::serve(listener, store.clone()));
    (format!("http://{addr}/"), store)
}

/// Start `count` driver servers on ephemeral ports.
#[allow(unused)]
pub async fn drivers(count: usize) -> Vec<SocketAddr> {
    let mut addrs = vec![];
    for _ in 0..count {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        addrs.push(listener.local_addr().unwrap());
        tokio::spawn(DriverRuntime::new().serve(listener));
    }
    addrs
}

/// An address nothing listens on.
#[allow(unused)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
