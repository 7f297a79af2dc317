//! Configuration for the settlement optimizer

use crate::strategies::Algorithm;
use crate::types::DEFAULT_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Settlement optimizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Heuristic portfolio configuration
    pub optimizer: OptimizerConfig,

    /// Prometheus metrics configuration
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "smart-settlement".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            optimizer: OptimizerConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

/// Heuristic portfolio configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Balances at or below this magnitude are treated as settled
    pub tolerance: f64,

    /// Heuristics evaluated, in tie-break order
    pub strategies: Vec<Algorithm>,

    /// Evaluate heuristics on worker threads
    pub parallel_evaluation: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            strategies: Algorithm::PORTFOLIO.to_vec(),
            parallel_evaluation: false,
        }
    }
}

/// Prometheus metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Record calculation metrics
    pub enabled: bool,

    /// Metric name prefix
    pub namespace: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            namespace: "smart_settlement".to_string(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(tolerance) = std::env::var("SETTLEMENT_TOLERANCE") {
            config.optimizer.tolerance = tolerance.trim().parse().map_err(|_| {
                crate::Error::Config(format!("SETTLEMENT_TOLERANCE is not a number: {}", tolerance))
            })?;
        }

        if let Ok(strategies) = std::env::var("SETTLEMENT_STRATEGIES") {
            config.optimizer.strategies = strategies
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::parse)
                .collect::<crate::Result<Vec<Algorithm>>>()?;
        }

        if let Ok(parallel) = std::env::var("SETTLEMENT_PARALLEL") {
            config.optimizer.parallel_evaluation = parse_flag("SETTLEMENT_PARALLEL", &parallel)?;
        }

        if let Ok(enabled) = std::env::var("SETTLEMENT_METRICS_ENABLED") {
            config.metrics.enabled = parse_flag("SETTLEMENT_METRICS_ENABLED", &enabled)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the optimizer relies on
    pub fn validate(&self) -> crate::Result<()> {
        let tolerance = self.optimizer.tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(crate::Error::Config(format!(
                "tolerance must be a non-negative number, got {}",
                tolerance
            )));
        }

        if self.optimizer.strategies.is_empty() {
            return Err(crate::Error::Config(
                "at least one settlement strategy is required".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_flag(name: &str, value: &str) -> crate::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(crate::Error::Config(format!(
            "{} must be a boolean, got {}",
            name, other
        ))),
    }
}
