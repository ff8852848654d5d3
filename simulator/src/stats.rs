use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Totals shared between the two load loops. Increments race freely; only the
/// final values are read, after both loops have joined.
#[derive(Clone)]
pub struct SimulationCounters {
    inner: Arc<Counters>,
}

struct Counters {
    driver_updates: AtomicUsize,
    price_checks: AtomicUsize,
    errors: AtomicUsize,
}

impl SimulationCounters {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Counters {
                driver_updates: AtomicUsize::new(0),
                price_checks: AtomicUsize::new(0),
                errors: AtomicUsize::new(0),
            }),
        }
    }

    #[inline]
    pub fn record_driver_update(&self) {
        self.inner.driver_updates.fetch_add(1, Ordering::AcqRel);
    }

    #[inline]
    pub fn record_price_check(&self) {
        self.inner.price_checks.fetch_add(1, Ordering::AcqRel);
    }

    #[inline]
    pub fn record_error(&self) {
        self.inner.errors.fetch_add(1, Ordering::AcqRel);
    }

    #[inline]
    #[must_use]
    pub fn driver_updates(&self) -> usize {
        self.inner.driver_updates.load(Ordering::Acquire)
    }

    #[inline]
    #[must_use]
    pub fn price_checks(&self) -> usize {
        self.inner.price_checks.load(Ordering::Acquire)
    }

    #[inline]
    #[must_use]
    pub fn errors(&self) -> usize {
        self.inner.errors.load(Ordering::Acquire)
    }

    /// `100 × (1 − errors / max(driver_updates + price_checks, 1))`.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        let succeeded = self.driver_updates() + self.price_checks();
        100.0 * (1.0 - self.errors() as f64 / succeeded.max(1) as f64)
    }
}

impl Default for SimulationCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Surge multipliers observed by the price-check loop.
#[derive(Debug, Default)]
pub struct SurgeStats {
    observed: Vec<f64>,
}

impl SurgeStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, multiplier: f64) {
        self.observed.push(multiplier);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    #[must_use]
    pub fn average(&self) -> Option<f64> {
        if self.observed.is_empty() {
            return None;
        }
        Some(self.observed.iter().sum::<f64>() / self.observed.len() as f64)
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.observed
            .iter()
            .copied()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    }
}
