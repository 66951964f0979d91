mod utils;
use utils::*;

use actorload::prelude::*;
use actorload_runtime::{DnsResolver, HttpEndpoint, StaticResolver};
use mock_actors::MockConfig;
use reqwest::Client;
use std::num::NonZeroUsize;
use std::time::Duration;

fn spec(application: &str) -> TestSpecification {
    TestSpecification {
        application: application.to_string(),
        threads: NonZeroUsize::new(2).unwrap(),
        actors_per_thread: NonZeroUsize::new(5).unwrap(),
        operations_per_actor: NonZeroUsize::new(4).unwrap(),
        outstanding_operations: NonZeroUsize::new(8).unwrap(),
        read_to_write_ratio: 0.5,
        ..Default::default()
    }
}

fn coordinator(peers: &[std::net::SocketAddr]) -> RemoteCoordinator<StaticResolver> {
    RemoteCoordinator::new(
        StaticResolver::new(Client::new(), peers),
        "drivers",
        NonZeroUsize::new(peers.len()).unwrap(),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn two_drivers_against_mock_actors() {
    init();
    let (base, store) = serve_mock_actors(MockConfig::default()).await;
    let peers = drivers(2).await;

    let results = coordinator(&peers).run(&spec(&base)).await.unwrap();

    assert_eq!(results.len(), 2);
    for (idx, result) in results.iter().enumerate() {
        assert_eq!(result.driver_id, idx);
        assert_eq!(result.total_operations(), 40);
    }

    let summary = AggregatedSummary::from_results(&results).unwrap();
    assert_eq!(summary.total_operations(), 80);
    assert_eq!(summary.total_reads + summary.total_writes, 80);
    assert_eq!(store.take_operations(), 80);

    let report = Report::new(&results).unwrap().to_string();
    assert!(report.contains("Total Operations   = 80"), "{report}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn simulated_actors_on_remote_drivers() {
    init();
    let peers = drivers(3).await;

    let results = coordinator(&peers).run(&spec("sim:2")).await.unwrap();
    let summary = AggregatedSummary::from_results(&results).unwrap();

    assert_eq!(summary.total_operations(), 120);
    assert!(summary.min_elapsed_ms <= summary.max_elapsed_ms);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn overloaded_actors_fail_the_run() {
    init();
    let (base, _store) = serve_mock_actors(MockConfig {
        capacity: std::num::NonZeroU32::new(1),
        ..Default::default()
    })
    .await;
    let peers = drivers(2).await;

    let err = coordinator(&peers).run(&spec(&base)).await.unwrap_err();

    assert!(!err.before_dispatch());
    match err {
        CoordinatorError::DriversFailed(failures) => {
            assert!(!failures.is_empty());
            for failure in failures {
                assert!(matches!(
                    failure.error,
                    EndpointError::Driver { status: 500, .. }
                ));
            }
        }
        other => panic!("Expected failed drivers, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn unreachable_driver_stops_the_run_before_dispatch() {
    init();
    let (base, store) = serve_mock_actors(MockConfig::default()).await;
    let mut peers = drivers(1).await;
    peers.push(closed_port().await);

    let err = coordinator(&peers).run(&spec(&base)).await.unwrap_err();

    assert!(err.before_dispatch());
    match err {
        CoordinatorError::Prime(failures) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].driver_id, 1);
        }
        other => panic!("Expected a priming failure, got {other:?}"),
    }
    assert_eq!(store.take_operations(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn busy_driver_rejects_a_second_test() {
    init();
    let peers = drivers(1).await;
    let driver = HttpEndpoint::new(Client::new(), peers[0]).unwrap();

    let mut slow = spec("sim:200");
    slow.threads = NonZeroUsize::new(1).unwrap();
    slow.actors_per_thread = NonZeroUsize::new(1).unwrap();
    slow.outstanding_operations = NonZeroUsize::new(1).unwrap();

    let first = {
        let driver = driver.clone();
        let slow = slow.clone();
        tokio::spawn(async move { driver.run_test(0, &slow).await })
    };
    tokio::time::sleep(Duration::from_millis(200)).await;

    let second = driver.run_test(1, &slow).await;
    assert!(matches!(
        second,
        Err(EndpointError::Driver { status: 409, .. })
    ));

    let first = first.await.unwrap().unwrap();
    assert_eq!(first.total_operations(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn drivers_found_through_dns() {
    init();
    let peers = drivers(1).await;
    let service = format!("127.0.0.1:{}", peers[0].port());

    let coordinator = RemoteCoordinator::new(
        DnsResolver::default(),
        &service,
        NonZeroUsize::new(1).unwrap(),
    );
    let results = coordinator.run(&spec("sim:1")).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].total_operations(), 40);
}
