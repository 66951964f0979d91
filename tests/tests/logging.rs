mod utils;
use utils::*;

use actorload::prelude::*;
use actorload_runtime::StaticResolver;
use reqwest::Client;
use std::num::NonZeroUsize;

#[tokio::test]
#[tracing_test::traced_test]
async fn coordinator_logs_each_driver() {
    let peers = drivers(2).await;
    let coordinator = RemoteCoordinator::new(
        StaticResolver::new(Client::new(), &peers),
        "drivers",
        NonZeroUsize::new(2).unwrap(),
    );

    let mut spec = TestSpecification::new("sim:1");
    spec.actors_per_thread = NonZeroUsize::new(2).unwrap();
    coordinator.run(&spec).await.unwrap();

    assert!(logs_contain("Connected to driver 0 at"));
    assert!(logs_contain("Connected to driver 1 at"));
    assert!(logs_contain("Driver 1 finished."));
}
