//! Settlement heuristics
//!
//! Every heuristic is a pure function from an owned participant list to a
//! list of settlements. Owning the list means a heuristic can mutate balances
//! freely without affecting the input of any other heuristic.
//!
//! | Heuristic            | Pairing rule                                   | Cost       |
//! |----------------------|------------------------------------------------|------------|
//! | Greedy Heap          | largest creditor with largest debtor, re-heaped | O(n log n) |
//! | Min-Max Flow         | sorted once, two pointers                       | O(n log n) |
//! | Balanced Partition   | largest feasible pair, full rescan per round    | O(k³)      |
//! | Simple Greedy        | encounter order, two pointers                   | O(n)       |

pub mod balanced_partition;
pub mod greedy_heap;
pub mod min_max_flow;
pub mod simple_greedy;

use crate::types::{Participant, Settlement};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available settlement heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Max-heaps of creditors and debtors
    GreedyHeap,
    /// Sorted two-pointer walk
    MinMaxFlow,
    /// Largest feasible pair per round
    BalancedPartition,
    /// Unsorted two-pointer walk, used as the fallback
    SimpleGreedy,
}

impl Algorithm {
    /// Default portfolio, in tie-break order
    pub const PORTFOLIO: [Algorithm; 3] = [
        Algorithm::GreedyHeap,
        Algorithm::MinMaxFlow,
        Algorithm::BalancedPartition,
    ];

    /// Human readable label reported in `optimization_info.algorithm`
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::GreedyHeap => "Greedy Heap",
            Algorithm::MinMaxFlow => "Min-Max Flow",
            Algorithm::BalancedPartition => "Balanced Partition",
            Algorithm::SimpleGreedy => "Simple Greedy",
        }
    }

    /// Identifier used in configuration and metric labels
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::GreedyHeap => "greedy-heap",
            Algorithm::MinMaxFlow => "min-max-flow",
            Algorithm::BalancedPartition => "balanced-partition",
            Algorithm::SimpleGreedy => "simple-greedy",
        }
    }

    /// Run the heuristic on its own copy of the participants
    pub fn run(self, participants: Vec<Participant>, tolerance: f64) -> Result<Vec<Settlement>> {
        match self {
            Algorithm::GreedyHeap => greedy_heap::settle(participants, tolerance),
            Algorithm::MinMaxFlow => min_max_flow::settle(participants, tolerance),
            Algorithm::BalancedPartition => balanced_partition::settle(participants, tolerance),
            Algorithm::SimpleGreedy => simple_greedy::settle(participants, tolerance),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy-heap" => Ok(Algorithm::GreedyHeap),
            "min-max-flow" => Ok(Algorithm::MinMaxFlow),
            "balanced-partition" => Ok(Algorithm::BalancedPartition),
            "simple-greedy" => Ok(Algorithm::SimpleGreedy),
            other => Err(Error::Config(format!("unknown settlement strategy: {}", other))),
        }
    }
}

/// Reject balances the pairing arithmetic cannot handle
pub(crate) fn check_balances(algorithm: Algorithm, participants: &[Participant]) -> Result<()> {
    match participants.iter().find(|p| !p.balance.is_finite()) {
        Some(p) => Err(Error::heuristic(
            algorithm.label(),
            format!("participant {} has non-finite balance {}", p.id, p.balance),
        )),
        None => Ok(()),
    }
}

/// Upper bound on settlement rounds.
///
/// Every round zeroes at least one party, so a list of `n` participants
/// never needs more than `n` rounds.
#[derive(Debug)]
pub(crate) struct RoundBudget {
    algorithm: Algorithm,
    remaining: usize,
}

impl RoundBudget {
    pub(crate) fn new(algorithm: Algorithm, participants: usize) -> Self {
        Self {
            algorithm,
            remaining: participants,
        }
    }

    pub(crate) fn spend(&mut self) -> Result<()> {
        if self.remaining == 0 {
            return Err(Error::heuristic(
                self.algorithm.label(),
                "round budget exhausted without settling a participant",
            ));
        }
        self.remaining -= 1;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::participants;
    use super::*;

    #[test]
    fn test_algorithm_names_round_trip() {
        for algorithm in [
            Algorithm::GreedyHeap,
            Algorithm::MinMaxFlow,
            Algorithm::BalancedPartition,
            Algorithm::SimpleGreedy,
        ] {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert!("simplex".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_non_finite_balance_is_a_heuristic_failure() {
        let input = participants(&[(1, f64::INFINITY), (2, -10.0)]);
        for algorithm in Algorithm::PORTFOLIO {
            let err = algorithm.run(input.clone(), 0.01).unwrap_err();
            assert!(matches!(err, Error::Heuristic { .. }), "{}", algorithm);
        }
    }

    #[test]
    fn test_round_budget() {
        let mut budget = RoundBudget::new(Algorithm::MinMaxFlow, 2);
        assert!(budget.spend().is_ok());
        assert!(budget.spend().is_ok());
        assert!(budget.spend().is_err());
    }
}
