//! Metrics collection for observability
//!
//! Prometheus metrics for the settlement calculator. Every collector owns
//! its registry, so several calculators (or tests) can coexist in one
//! process.
//!
//! # Metrics
//!
//! - `<ns>_calculations_total` - Settlement plans computed
//! - `<ns>_heuristic_failures_total{algorithm}` - Heuristics that returned an error
//! - `<ns>_algorithm_selected_total{algorithm}` - Which heuristic produced the plan
//! - `<ns>_computation_duration_seconds` - Histogram of calculation latency
//! - `<ns>_settlements_per_calculation` - Histogram of plan sizes

use crate::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct SettlementMetrics {
    /// Plans computed
    pub calculations_total: IntCounter,

    /// Heuristic failures by algorithm
    pub heuristic_failures: IntCounterVec,

    /// Selected plans by algorithm
    pub algorithm_selected: IntCounterVec,

    /// Calculation latency histogram
    pub computation_duration: Histogram,

    /// Plan size histogram
    pub settlements_per_calculation: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl SettlementMetrics {
    /// Create new metrics collector
    pub fn new(namespace: &str) -> Result<Self> {
        let registry = Arc::new(Registry::new());

        let calculations_total = IntCounter::with_opts(
            Opts::new("calculations_total", "Settlement plans computed").namespace(namespace),
        )?;
        registry.register(Box::new(calculations_total.clone()))?;

        let heuristic_failures = IntCounterVec::new(
            Opts::new(
                "heuristic_failures_total",
                "Heuristics that returned an error",
            )
            .namespace(namespace),
            &["algorithm"],
        )?;
        registry.register(Box::new(heuristic_failures.clone()))?;

        let algorithm_selected = IntCounterVec::new(
            Opts::new(
                "algorithm_selected_total",
                "Heuristic whose plan was chosen",
            )
            .namespace(namespace),
            &["algorithm"],
        )?;
        registry.register(Box::new(algorithm_selected.clone()))?;

        let computation_duration = Histogram::with_opts(
            HistogramOpts::new(
                "computation_duration_seconds",
                "Histogram of calculation latencies",
            )
            .namespace(namespace)
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.010, 0.050, 0.100, 0.500, 1.0]),
        )?;
        registry.register(Box::new(computation_duration.clone()))?;

        let settlements_per_calculation = Histogram::with_opts(
            HistogramOpts::new(
                "settlements_per_calculation",
                "Histogram of settlement plan sizes",
            )
            .namespace(namespace)
            .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
        )?;
        registry.register(Box::new(settlements_per_calculation.clone()))?;

        Ok(Self {
            calculations_total,
            heuristic_failures,
            algorithm_selected,
            computation_duration,
            settlements_per_calculation,
            registry,
        })
    }

    /// Record a finished calculation
    pub fn record_calculation(&self, algorithm: &str, settlements: usize, duration_seconds: f64) {
        self.calculations_total.inc();
        self.algorithm_selected
            .with_label_values(&[algorithm])
            .inc();
        self.settlements_per_calculation.observe(settlements as f64);
        self.computation_duration.observe(duration_seconds);
    }

    /// Record a discarded heuristic
    pub fn record_heuristic_failure(&self, algorithm: &str) {
        self.heuristic_failures
            .with_label_values(&[algorithm])
            .inc();
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render the registry in Prometheus text format
    pub fn encode(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| crate::Error::Other(e.to_string()))
    }
}

impl std::fmt::Debug for SettlementMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettlementMetrics")
            .field("calculations_total", &self.calculations_total.get())
            .finish_non_exhaustive()
    }
}
