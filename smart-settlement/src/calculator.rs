//! Settlement calculator
//!
//! Entry point tying the pipeline together: normalize balances, run the
//! heuristic portfolio, summarize the chosen plan and record metrics.

use crate::{
    config::Config,
    metrics::SettlementMetrics,
    normalizer,
    optimizer::PortfolioOptimizer,
    request::SettlementRequest,
    strategies::Algorithm,
    summary,
    types::{Member, ParticipantId, SettlementResponse},
    Result,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Settlement calculator
#[derive(Debug, Clone)]
pub struct SettlementCalculator {
    /// Configuration
    config: Config,

    /// Heuristic portfolio
    optimizer: PortfolioOptimizer,

    /// Prometheus collectors, absent when metrics are disabled
    metrics: Option<Arc<SettlementMetrics>>,
}

impl SettlementCalculator {
    /// Create new calculator
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let metrics = if config.metrics.enabled {
            Some(Arc::new(SettlementMetrics::new(&config.metrics.namespace)?))
        } else {
            None
        };

        Ok(Self {
            optimizer: PortfolioOptimizer::new(&config.optimizer),
            metrics,
            config,
        })
    }

    /// Share an existing metrics collector
    pub fn with_metrics(mut self, metrics: Arc<SettlementMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Metrics collector, if enabled
    pub fn metrics(&self) -> Option<&Arc<SettlementMetrics>> {
        self.metrics.as_ref()
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compute a settlement plan for the given net balances
    pub fn calculate(
        &self,
        balances: &BTreeMap<ParticipantId, f64>,
        members: &[Member],
    ) -> Result<SettlementResponse> {
        let calculation_id = Uuid::new_v4();
        let span = tracing::info_span!("settlement_calculation", %calculation_id);
        let _guard = span.enter();

        let started = Instant::now();
        let tolerance = self.config.optimizer.tolerance;

        let participants = normalizer::normalize(balances, members, tolerance)?;
        info!(
            "Starting settlement calculation for {} participants",
            participants.len()
        );
        debug!(
            "Normalized {} balances into {} participants",
            balances.len(),
            participants.len()
        );

        let imbalance = normalizer::imbalance(&participants);
        if imbalance.abs() > tolerance {
            warn!(imbalance, "Balances do not sum to zero");
        }

        let selection = match self.optimizer.optimize(&participants) {
            Ok(selection) => selection,
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_heuristic_failure(Algorithm::SimpleGreedy.name());
                }
                return Err(e);
            }
        };

        let elapsed = started.elapsed();
        let label = selection.label();
        let optimization_info =
            summary::summarize(&participants, &selection.settlements, &label, elapsed);

        let unsettled = summary::residual_balances(&participants, &selection.settlements)
            .into_values()
            .filter(|residual| residual.abs() > tolerance)
            .count();
        if unsettled > 0 {
            warn!(unsettled, "Plan leaves participants with outstanding balances");
        }

        if let Some(metrics) = &self.metrics {
            for algorithm in &selection.failed {
                metrics.record_heuristic_failure(algorithm.name());
            }
            metrics.record_calculation(
                selection.algorithm.name(),
                selection.settlements.len(),
                elapsed.as_secs_f64(),
            );
        }

        info!(
            "Settlement plan: {} transfers via {} ({:.1}% efficiency, {:.2} total) in {:.2}ms",
            selection.settlements.len(),
            label,
            optimization_info.efficiency_percentage,
            optimization_info.total_amount,
            optimization_info.computation_time
        );

        Ok(SettlementResponse {
            settlements: selection.settlements,
            optimization_info,
        })
    }

    /// Parse a wire request and compute its plan
    pub fn calculate_request(&self, request: &SettlementRequest) -> Result<SettlementResponse> {
        let balances = request.parse_balances()?;
        self.calculate(&balances, &request.members)
    }
}

/// Compute a plan with the default configuration and no metrics
pub fn calculate_settlement(
    balances: &BTreeMap<ParticipantId, f64>,
    members: &[Member],
) -> Result<SettlementResponse> {
    let mut config = Config::default();
    config.metrics.enabled = false;
    SettlementCalculator::new(config)?.calculate(balances, members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn calculator() -> SettlementCalculator {
        SettlementCalculator::new(Config::default()).unwrap()
    }

    #[test]
    fn test_single_creditor_two_debtors() {
        let balances: BTreeMap<_, _> = [(1, 100.0), (2, -50.0), (3, -50.0)].into_iter().collect();
        let members = vec![
            Member::new(1, "Alice"),
            Member::new(2, "Bob"),
            Member::new(3, "Charlie"),
        ];

        let response = calculator().calculate(&balances, &members).unwrap();

        assert_eq!(response.settlements.len(), 2);
        for settlement in &response.settlements {
            assert_eq!(settlement.to, 1);
            assert_eq!(settlement.to_name, "Alice");
            assert_eq!(settlement.amount, 50.0);
        }
        assert_eq!(response.optimization_info.algorithm, "Greedy Heap");
        assert_eq!(response.optimization_info.transactions_reduced, 1);
        assert_eq!(response.optimization_info.efficiency_percentage, 33.3);
        assert_eq!(response.optimization_info.total_amount, 100.0);
    }

    #[test]
    fn test_records_metrics() {
        let calc = calculator();
        let balances: BTreeMap<_, _> = [(1, 20.0), (2, -20.0)].into_iter().collect();
        calc.calculate(&balances, &[]).unwrap();

        let metrics = calc.metrics().unwrap();
        assert_eq!(metrics.calculations_total.get(), 1);
        assert_eq!(
            metrics
                .algorithm_selected
                .with_label_values(&[Algorithm::GreedyHeap.name()])
                .get(),
            1
        );
    }

    #[test]
    fn test_shared_metrics_collector() {
        let shared = Arc::new(SettlementMetrics::new("shared").unwrap());
        let mut config = Config::default();
        config.metrics.enabled = false;

        let first = SettlementCalculator::new(config.clone())
            .unwrap()
            .with_metrics(shared.clone());
        let second = SettlementCalculator::new(config).unwrap().with_metrics(shared.clone());

        let balances: BTreeMap<_, _> = [(1, 5.0), (2, -5.0)].into_iter().collect();
        first.calculate(&balances, &[]).unwrap();
        second.calculate(&balances, &[]).unwrap();

        assert_eq!(shared.calculations_total.get(), 2);
        assert!(!shared.registry().gather().is_empty());
    }

    #[test]
    fn test_metrics_disabled() {
        let mut config = Config::default();
        config.metrics.enabled = false;
        let calc = SettlementCalculator::new(config).unwrap();
        assert!(calc.metrics().is_none());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = Config::default();
        config.optimizer.strategies.clear();
        assert!(matches!(SettlementCalculator::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_calculate_request() {
        let request = SettlementRequest::from_json(
            r#"{"balances": {"10": "25", "11": -25}, "members": []}"#,
        )
        .unwrap();

        let response = calculator().calculate_request(&request).unwrap();
        assert_eq!(response.settlements.len(), 1);
        assert_eq!(response.settlements[0].from, 11);
        assert_eq!(response.settlements[0].from_name, "User_11");
        assert_eq!(response.settlements[0].to, 10);
    }

    #[test]
    fn test_invalid_request_is_input_error() {
        let request = SettlementRequest::from_json(r#"{"balances": {"x": 1}}"#).unwrap();
        let err = calculator().calculate_request(&request).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_free_function_matches_calculator() {
        let balances: BTreeMap<_, _> = [(1, 40.0), (2, -15.0), (3, -25.0)].into_iter().collect();
        let direct = calculate_settlement(&balances, &[]).unwrap();
        let via = calculator().calculate(&balances, &[]).unwrap();
        assert_eq!(direct.settlements, via.settlements);
    }
}
