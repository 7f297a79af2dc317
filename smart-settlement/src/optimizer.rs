//! Portfolio optimizer
//!
//! Runs every configured heuristic on its own copy of the participants and
//! keeps the plan with the fewest settlements. Ties go to the heuristic
//! listed first. A heuristic that fails is logged and dropped; when none
//! succeeds (or there is nothing to settle) the simple greedy walk runs on
//! the untouched input instead.

use crate::config::OptimizerConfig;
use crate::strategies::Algorithm;
use crate::types::{Participant, Settlement};
use crate::{Error, Result};
use tracing::{debug, warn};

/// Outcome of one heuristic run
#[derive(Debug)]
pub struct Evaluation {
    /// Heuristic that ran
    pub algorithm: Algorithm,

    /// Plan, or the reason the heuristic gave up
    pub outcome: Result<Vec<Settlement>>,
}

/// Plan chosen by the optimizer
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Heuristic that produced the plan
    pub algorithm: Algorithm,

    /// True when no portfolio heuristic produced a usable plan
    pub fallback: bool,

    /// Chosen settlements
    pub settlements: Vec<Settlement>,

    /// Heuristics that failed during evaluation
    pub failed: Vec<Algorithm>,
}

impl Selection {
    /// Label reported to callers
    pub fn label(&self) -> String {
        if self.fallback {
            format!("{} (Fallback)", self.algorithm.label())
        } else {
            self.algorithm.label().to_string()
        }
    }
}

/// Best-of-N heuristic selector
#[derive(Debug, Clone)]
pub struct PortfolioOptimizer {
    strategies: Vec<Algorithm>,
    tolerance: f64,
    parallel: bool,
}

impl PortfolioOptimizer {
    /// Create optimizer from configuration
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            strategies: config.strategies.clone(),
            tolerance: config.tolerance,
            parallel: config.parallel_evaluation,
        }
    }

    /// Heuristics in evaluation order
    pub fn strategies(&self) -> &[Algorithm] {
        &self.strategies
    }

    /// Run every heuristic; results come back in evaluation order
    pub fn evaluate(&self, participants: &[Participant]) -> Vec<Evaluation> {
        if self.parallel && self.strategies.len() > 1 {
            self.evaluate_parallel(participants)
        } else {
            self.strategies
                .iter()
                .map(|&algorithm| Evaluation {
                    algorithm,
                    outcome: algorithm.run(participants.to_vec(), self.tolerance),
                })
                .collect()
        }
    }

    fn evaluate_parallel(&self, participants: &[Participant]) -> Vec<Evaluation> {
        let tolerance = self.tolerance;

        let joined = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = self
                .strategies
                .iter()
                .map(|&algorithm| {
                    let copy = participants.to_vec();
                    (algorithm, scope.spawn(move |_| algorithm.run(copy, tolerance)))
                })
                .collect();

            handles
                .into_iter()
                .map(|(algorithm, handle)| Evaluation {
                    algorithm,
                    outcome: handle
                        .join()
                        .unwrap_or_else(|_| Err(worker_panicked(algorithm))),
                })
                .collect::<Vec<_>>()
        });

        joined.unwrap_or_else(|_| {
            self.strategies
                .iter()
                .map(|&algorithm| Evaluation {
                    algorithm,
                    outcome: Err(worker_panicked(algorithm)),
                })
                .collect()
        })
    }

    /// Evaluate the portfolio and pick the smallest plan
    pub fn optimize(&self, participants: &[Participant]) -> Result<Selection> {
        if participants.is_empty() {
            return self.fallback(participants, Vec::new());
        }
        self.select(participants, self.evaluate(participants))
    }

    /// Pick the smallest successful plan, falling back to simple greedy on
    /// `participants` when there is none
    pub fn select(
        &self,
        participants: &[Participant],
        evaluations: Vec<Evaluation>,
    ) -> Result<Selection> {
        let mut best: Option<(Algorithm, Vec<Settlement>)> = None;
        let mut failed = Vec::new();

        for Evaluation { algorithm, outcome } in evaluations {
            match outcome {
                Ok(settlements) => {
                    debug!(
                        algorithm = algorithm.name(),
                        settlements = settlements.len(),
                        "Heuristic evaluated"
                    );
                    let improves = best
                        .as_ref()
                        .map_or(true, |(_, current)| settlements.len() < current.len());
                    if improves {
                        best = Some((algorithm, settlements));
                    }
                }
                Err(e) => {
                    warn!("Algorithm {} failed: {}", algorithm, e);
                    failed.push(algorithm);
                }
            }
        }

        match best {
            Some((algorithm, settlements)) => Ok(Selection {
                algorithm,
                fallback: false,
                settlements,
                failed,
            }),
            None => self.fallback(participants, failed),
        }
    }

    fn fallback(&self, participants: &[Participant], failed: Vec<Algorithm>) -> Result<Selection> {
        if !participants.is_empty() {
            warn!(
                "All {} heuristics failed, using simple greedy fallback",
                failed.len()
            );
        }

        let settlements = Algorithm::SimpleGreedy.run(participants.to_vec(), self.tolerance)?;
        Ok(Selection {
            algorithm: Algorithm::SimpleGreedy,
            fallback: true,
            settlements,
            failed,
        })
    }
}

fn worker_panicked(algorithm: Algorithm) -> Error {
    Error::heuristic(algorithm.label(), "worker thread panicked")
}
