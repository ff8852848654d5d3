use std::sync::Arc;
use std::time::Duration;

use mock_server::{MockBehavior, MockSurgeServer};
use simulator::simulation::{Simulator, PRICE_CHECKS_PER_BURST};
use simulator::stats::SurgeStats;

async fn spawn_sim(behavior: MockBehavior, num_drivers: usize) -> (MockSurgeServer, Arc<Simulator>) {
    let (server, base_url) = MockSurgeServer::spawn(behavior)
        .await
        .expect("Failed to spawn mock server");
    (server, Arc::new(Simulator::new(num_drivers, base_url)))
}

#[tokio::test]
async fn driver_burst_counts_every_accepted_update() {
    let (server, sim) = spawn_sim(
        MockBehavior::Accept {
            surge_multiplier: 1.0,
        },
        20,
    )
    .await;

    sim.run_driver_burst().await;

    assert_eq!(sim.counters().driver_updates(), 20);
    assert_eq!(sim.counters().errors(), 0);
    assert_eq!(server.driver_updates_seen(), 20);
}

#[tokio::test]
async fn price_burst_collects_constant_surge() {
    let (server, sim) = spawn_sim(
        MockBehavior::Accept {
            surge_multiplier: 2.5,
        },
        1,
    )
    .await;

    let mut stats = SurgeStats::new();
    sim.run_price_burst(&mut stats).await;

    assert_eq!(stats.len(), PRICE_CHECKS_PER_BURST);
    let avg = stats.average().expect("No average");
    let max = stats.max().expect("No max");
    assert!((avg - 2.5).abs() < 1e-9);
    assert!((max - 2.5).abs() < 1e-9);
    assert_eq!(sim.counters().price_checks(), PRICE_CHECKS_PER_BURST);
    assert_eq!(sim.counters().errors(), 0);
    assert_eq!(server.price_checks_seen(), PRICE_CHECKS_PER_BURST);
}

#[tokio::test]
async fn rejecting_server_turns_every_call_into_an_error() {
    let (_server, sim) = spawn_sim(MockBehavior::Reject, 10).await;

    sim.run_driver_burst().await;
    assert_eq!(sim.counters().driver_updates(), 0);
    assert_eq!(sim.counters().errors(), 10);
    // Every dispatched call lands in exactly one bucket.
    assert_eq!(sim.counters().driver_updates() + sim.counters().errors(), 10);

    let surge = sim.simulate_price_check().await;
    assert_eq!(surge, None);
    assert_eq!(sim.counters().price_checks(), 0);
    assert_eq!(sim.counters().errors(), 11);
}

#[tokio::test]
async fn stalled_server_trips_the_request_timeout() {
    let (_server, sim) = spawn_sim(MockBehavior::Stall(Duration::from_secs(5)), 3).await;

    let burst = tokio::time::timeout(Duration::from_secs(10), sim.run_driver_burst()).await;
    assert!(burst.is_ok(), "Burst did not terminate");
    assert_eq!(sim.counters().driver_updates(), 0);
    assert_eq!(sim.counters().errors(), 3);
}

#[tokio::test]
async fn unreachable_server_counts_a_transport_error() {
    // Bind and drop to find a port with nothing listening on it.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sim = Arc::new(Simulator::new(1, format!("http://{addr}")));
    let surge = sim.simulate_price_check().await;
    assert_eq!(surge, None);
    assert_eq!(sim.counters().price_checks(), 0);
    assert_eq!(sim.counters().errors(), 1);
}

#[tokio::test]
async fn zero_duration_simulation_terminates_promptly() {
    let (_server, sim) = spawn_sim(
        MockBehavior::Accept {
            surge_multiplier: 1.0,
        },
        5,
    )
    .await;

    let run = tokio::time::timeout(
        Duration::from_secs(5),
        Arc::clone(&sim).run_simulation(Duration::ZERO),
    )
    .await;
    assert!(run.is_ok(), "Simulation did not terminate");
    run.unwrap().expect("Simulation failed");

    assert_eq!(sim.counters().driver_updates(), 0);
    assert_eq!(sim.counters().price_checks(), 0);
    assert_eq!(sim.counters().errors(), 0);
}
