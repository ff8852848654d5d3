use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, StatusCode};
use log::{info, warn};
use surge_common::{byte_body, empty_body, DriverLocationUpdate, PriceResponse};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::client::HttpClient;
use crate::location::{random_location, Location};
use crate::stats::{SimulationCounters, SurgeStats};

/// In-flight cap for driver update bursts.
const DRIVER_POOL_SIZE: usize = 50;
/// In-flight cap for price check bursts.
const PRICE_POOL_SIZE: usize = 100;
/// Price checks dispatched per burst.
pub const PRICE_CHECKS_PER_BURST: usize = 100;

const DRIVER_BURST_PAUSE: Duration = Duration::from_secs(5);
// 100 checks per burst at two bursts a second, nominally 200 rps.
const PRICE_BURST_PAUSE: Duration = Duration::from_millis(500);

/// Drives two concurrent load loops against the surge pricing service: driver
/// location updates and rider price checks. Every call is fault-isolated; a
/// failing request is counted and logged, never propagated.
pub struct Simulator {
    num_drivers: usize,
    base_url: String,
    client: HttpClient,
    counters: SimulationCounters,
}

impl Simulator {
    #[must_use]
    pub fn new(num_drivers: usize, base_url: String) -> Self {
        Self {
            num_drivers,
            base_url,
            client: HttpClient::new(),
            counters: SimulationCounters::new(),
        }
    }

    #[must_use]
    pub fn counters(&self) -> &SimulationCounters {
        &self.counters
    }

    /// Posts one randomized position report for `driver_id`. 202 counts as an
    /// update, anything else as an error.
    pub async fn simulate_driver_movement(&self, driver_id: &str) {
        let location = random_location();
        let update = DriverLocationUpdate {
            driver_id: driver_id.to_owned(),
            lat: location.lat,
            lng: location.lng,
            timestamp: epoch_millis(),
        };
        match self.post_driver_update(&update).await {
            Ok(status) if status == StatusCode::ACCEPTED => self.counters.record_driver_update(),
            Ok(status) => {
                self.counters.record_error();
                warn!("Unexpected status {status} updating driver {driver_id}");
            }
            Err(e) => {
                self.counters.record_error();
                warn!("Error updating driver {driver_id}: {e:#}");
            }
        }
    }

    async fn post_driver_update(&self, update: &DriverLocationUpdate) -> Result<StatusCode> {
        let body = serde_json::to_vec(update).context("Failed to serialize driver update")?;
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("{}/driver/location", self.base_url))
            .header(CONTENT_TYPE, "application/json")
            .body(byte_body(body))
            .context("Failed to build driver update request")?;
        let (status, _body) = self.client.send_recv(request).await?;
        Ok(status)
    }

    /// Checks the price at a random location. Returns the observed surge
    /// multiplier, or `None` when the call failed.
    pub async fn simulate_price_check(&self) -> Option<f64> {
        let location = random_location();
        match self.get_price(location).await {
            Ok(surge) => {
                self.counters.record_price_check();
                Some(surge)
            }
            Err(e) => {
                self.counters.record_error();
                warn!("Error checking price: {e:#}");
                None
            }
        }
    }

    async fn get_price(&self, location: Location) -> Result<f64> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(format!(
                "{}/price?lat={}&lng={}",
                self.base_url, location.lat, location.lng
            ))
            .body(empty_body())
            .context("Failed to build price request")?;
        let (status, body) = self.client.send_recv(request).await?;
        if status != StatusCode::OK {
            bail!("Unexpected status {status}");
        }
        let resp: PriceResponse =
            serde_json::from_slice(&body).context("Failed to deserialize price response")?;
        Ok(resp.surge_or_default())
    }

    /// Dispatches one position report per driver and waits for all of them,
    /// at most [`DRIVER_POOL_SIZE`] in flight at once.
    pub async fn run_driver_burst(self: &Arc<Self>) {
        let pool = Arc::new(Semaphore::new(DRIVER_POOL_SIZE));
        let mut burst = Vec::with_capacity(self.num_drivers);
        for i in 0..self.num_drivers {
            let sim = Arc::clone(self);
            let pool = Arc::clone(&pool);
            burst.push(tokio::spawn(async move {
                // Never closed, acquire cannot fail.
                let _permit = pool.acquire_owned().await.expect("worker pool closed");
                let driver_id = format!("driver_{i:04}");
                sim.simulate_driver_movement(&driver_id).await;
            }));
        }
        join_burst(burst).await;
    }

    /// Dispatches [`PRICE_CHECKS_PER_BURST`] concurrent price checks, waits for
    /// all of them and records the observed multipliers.
    pub async fn run_price_burst(self: &Arc<Self>, stats: &mut SurgeStats) {
        let pool = Arc::new(Semaphore::new(PRICE_POOL_SIZE));
        let mut burst = Vec::with_capacity(PRICE_CHECKS_PER_BURST);
        for _ in 0..PRICE_CHECKS_PER_BURST {
            let sim = Arc::clone(self);
            let pool = Arc::clone(&pool);
            burst.push(tokio::spawn(async move {
                // Never closed, acquire cannot fail.
                let _permit = pool.acquire_owned().await.expect("worker pool closed");
                sim.simulate_price_check().await
            }));
        }
        for surge in join_burst(burst).await.into_iter().flatten() {
            stats.record(surge);
        }
    }

    /// Repeats driver bursts until the duration elapses, pausing five seconds
    /// between bursts. Best-effort cadence: burst time plus the pause sets the
    /// actual update rate.
    pub async fn run_driver_updates(self: Arc<Self>, duration: Duration) {
        info!(
            "Starting driver location updates ({} drivers)",
            self.num_drivers
        );
        let deadline = Instant::now() + duration;
        while Instant::now() < deadline {
            self.run_driver_burst().await;
            tokio::time::sleep(DRIVER_BURST_PAUSE).await;
            info!(
                "Driver updates: {}, Errors: {}",
                self.counters.driver_updates(),
                self.counters.errors()
            );
        }
    }

    /// Repeats price-check bursts until the duration elapses, then prints the
    /// observed surge statistics.
    pub async fn run_price_checks(self: Arc<Self>, duration: Duration) -> SurgeStats {
        info!("Starting price checks ({PRICE_CHECKS_PER_BURST} per burst)");
        let deadline = Instant::now() + duration;
        let mut stats = SurgeStats::new();
        while Instant::now() < deadline {
            self.run_price_burst(&mut stats).await;
            tokio::time::sleep(PRICE_BURST_PAUSE).await;
        }
        if let (Some(avg), Some(max)) = (stats.average(), stats.max()) {
            println!("\nSurge stats: Avg={avg:.2}x, Max={max:.2}x");
        }
        stats
    }

    /// Runs both loops concurrently for `duration`, then prints the final
    /// totals and success rate.
    pub async fn run_simulation(self: Arc<Self>, duration: Duration) -> Result<()> {
        println!("{}", "=".repeat(60));
        println!("TRAFFIC SIMULATION STARTING");
        println!("{}", "=".repeat(60));
        println!("Duration: {}s", duration.as_secs());
        println!("Drivers: {}", self.num_drivers);
        println!();

        let driver_loop = tokio::spawn(Arc::clone(&self).run_driver_updates(duration));
        let price_loop = tokio::spawn(Arc::clone(&self).run_price_checks(duration));
        driver_loop
            .await
            .context("Failed to join driver update loop")?;
        price_loop
            .await
            .context("Failed to join price check loop")?;

        println!("\n{}", "=".repeat(60));
        println!("SIMULATION COMPLETE");
        println!("{}", "=".repeat(60));
        println!("Total driver updates: {}", self.counters.driver_updates());
        println!("Total price checks: {}", self.counters.price_checks());
        println!("Total errors: {}", self.counters.errors());
        println!("Success rate: {:.2}%", self.counters.success_rate());
        println!();
        Ok(())
    }
}

async fn join_burst<T>(burst: Vec<JoinHandle<T>>) -> Vec<T> {
    let mut results = Vec::with_capacity(burst.len());
    for task in burst {
        match task.await {
            Ok(v) => results.push(v),
            Err(e) => warn!("Burst worker panicked: {e}"),
        }
    }
    results
}

fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as i64)
}
