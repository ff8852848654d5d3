use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use surge_common::{DriverLocationUpdate, PriceResponse};

const MOCK_BASE_FARE: f64 = 10.0;

/// How the mock answers incoming calls.
#[derive(Debug, Copy, Clone)]
pub enum MockBehavior {
    /// 202 on driver updates, 200 with the given multiplier on price checks.
    Accept { surge_multiplier: f64 },
    /// 500 on everything.
    Reject,
    /// Sleep for the given duration before answering, to trip client timeouts.
    Stall(Duration),
}

/// In-process stand-in for the surge pricing service. Counts what it receives
/// so callers can assert against the traffic that actually arrived.
#[derive(Clone)]
pub struct MockSurgeServer {
    behavior: MockBehavior,
    driver_updates_seen: Arc<AtomicUsize>,
    price_checks_seen: Arc<AtomicUsize>,
}

impl MockSurgeServer {
    #[must_use]
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            driver_updates_seen: Arc::new(AtomicUsize::new(0)),
            price_checks_seen: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[inline]
    #[must_use]
    pub fn driver_updates_seen(&self) -> usize {
        self.driver_updates_seen.load(Ordering::Acquire)
    }

    #[inline]
    #[must_use]
    pub fn price_checks_seen(&self) -> usize {
        self.price_checks_seen.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/driver/location", post(post_driver_location))
            .route("/price", get(get_price))
            .with_state(self.clone())
    }

    /// Binds an ephemeral port and serves in a background task. Returns the
    /// server handle and the base url to point a client at.
    pub async fn spawn(behavior: MockBehavior) -> anyhow::Result<(Self, String)> {
        let server = Self::new(behavior);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind mock server")?;
        let addr = listener
            .local_addr()
            .context("Failed to read mock server address")?;
        let router = server.router();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Ok((server, format!("http://{addr}")))
    }
}

#[derive(Debug, serde::Deserialize)]
struct PriceQuery {
    lat: f64,
    lng: f64,
}

async fn post_driver_location(
    State(server): State<MockSurgeServer>,
    Json(_update): Json<DriverLocationUpdate>,
) -> StatusCode {
    server.driver_updates_seen.fetch_add(1, Ordering::AcqRel);
    match server.behavior {
        MockBehavior::Accept { .. } => StatusCode::ACCEPTED,
        MockBehavior::Reject => StatusCode::INTERNAL_SERVER_ERROR,
        MockBehavior::Stall(delay) => {
            tokio::time::sleep(delay).await;
            StatusCode::ACCEPTED
        }
    }
}

async fn get_price(
    State(server): State<MockSurgeServer>,
    Query(_query): Query<PriceQuery>,
) -> Result<Json<PriceResponse>, StatusCode> {
    server.price_checks_seen.fetch_add(1, Ordering::AcqRel);
    match server.behavior {
        MockBehavior::Accept { surge_multiplier } => Ok(Json(PriceResponse::with_surge(
            MOCK_BASE_FARE,
            surge_multiplier,
        ))),
        MockBehavior::Reject => Err(StatusCode::INTERNAL_SERVER_ERROR),
        MockBehavior::Stall(delay) => {
            tokio::time::sleep(delay).await;
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
