mod utils;
use utils::*;

use actorload::prelude::*;
use actorload_runtime::{actors, Application};
use mock_actors::MockConfig;
use reqwest::Client;
use std::num::NonZeroUsize;
use std::time::Duration;

fn spec(application: &str, ratio: f64) -> TestSpecification {
    TestSpecification {
        application: application.to_string(),
        threads: NonZeroUsize::new(3).unwrap(),
        actors_per_thread: NonZeroUsize::new(4).unwrap(),
        operations_per_actor: NonZeroUsize::new(5).unwrap(),
        outstanding_operations: NonZeroUsize::new(6).unwrap(),
        read_to_write_ratio: ratio,
        ..Default::default()
    }
}

async fn run_local(spec: TestSpecification) -> Result<DriverResult, RunError> {
    let application = Application::from_identity(&spec.application).unwrap();
    LocalRunner::new(application).run(0, spec).await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn reads_only_leave_actors_untouched() {
    init();
    let (base, store) = serve_mock_actors(MockConfig::default()).await;

    let res = run_local(spec(&base, 1.0)).await.unwrap();

    assert_eq!(res.read.count, 60);
    assert_eq!(res.write.count, 0);
    assert_eq!(store.take_operations(), 60);
    assert!(!store.presence("0-0-0").online);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn writes_only() {
    init();
    let (base, store) = serve_mock_actors(MockConfig::default()).await;

    let res = run_local(spec(&base, 0.0)).await.unwrap();

    assert_eq!(res.read.count, 0);
    assert_eq!(res.write.count, 60);
    assert_eq!(store.take_operations(), 60);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn latency_reflects_actor_delay() {
    init();
    let (base, _store) = serve_mock_actors(MockConfig {
        delay: Duration::from_millis(20),
        ..Default::default()
    })
    .await;

    let res = run_local(spec(&base, 0.5)).await.unwrap();

    let min = res.read.min_millis().min(res.write.min_millis());
    assert!(min >= 20, "{res:?}");
    // NOTE: 20 operations per worker, 6 at a time, 20ms each.
    assert!(res.elapsed >= Duration::from_millis(80), "{res:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn slow_actors_hit_the_operation_timeout() {
    init();
    let (base, _store) = serve_mock_actors(MockConfig {
        delay: Duration::from_millis(500),
        ..Default::default()
    })
    .await;

    let mut spec = spec(&base, 0.5);
    spec.operation_timeout = Some(Duration::from_millis(50));
    let err = run_local(spec).await.unwrap_err();

    assert!(matches!(
        err,
        RunError::Operation {
            source: ActorError::TimedOut(_),
            ..
        }
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn rejected_operation_fails_the_driver() {
    init();
    let (base, _store) = serve_mock_actors(MockConfig {
        capacity: std::num::NonZeroU32::new(1),
        ..Default::default()
    })
    .await;

    let err = run_local(spec(&base, 0.5)).await.unwrap_err();

    match err {
        RunError::Operation {
            source: ActorError::Rejected(message),
            ..
        } => assert!(message.starts_with("503"), "{message}"),
        other => panic!("Expected a rejected operation, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn presence_bodies_agree_on_the_wire() {
    init();
    let (base, store) = serve_mock_actors(MockConfig::default()).await;
    let client = Client::new();
    let url = format!("{base}actors/0-0-1/presence");

    let res = client
        .put(&url)
        .json(&actors::Presence { online: true })
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success(), "{res:?}");
    assert_eq!(store.presence("0-0-1"), mock_actors::Presence { online: true });

    store.set_presence("0-0-2".to_string(), mock_actors::Presence { online: true });
    let presence: actors::Presence = client
        .get(format!("{base}actors/0-0-2/presence"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(presence, actors::Presence { online: true });
}
