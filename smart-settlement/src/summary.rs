//! Summary statistics for a chosen settlement plan

use crate::types::{OptimizationInfo, Participant, ParticipantId, Settlement};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::time::Duration;

/// Derive `OptimizationInfo` for a plan.
///
/// The baseline is one transfer per participant with an outstanding
/// balance. `total_amount` only depends on the input, not on the plan.
pub fn summarize(
    participants: &[Participant],
    settlements: &[Settlement],
    algorithm: &str,
    elapsed: Duration,
) -> OptimizationInfo {
    let total_amount: f64 = participants
        .iter()
        .filter(|p| p.balance > 0.0)
        .map(|p| p.balance)
        .sum();
    let original_transactions = participants.iter().filter(|p| p.balance != 0.0).count();

    let efficiency = if original_transactions == 0 {
        0.0
    } else {
        let ratio = settlements.len() as f64 / original_transactions.max(1) as f64;
        ((1.0 - ratio) * 100.0).max(0.0)
    };

    OptimizationInfo {
        algorithm: algorithm.to_string(),
        computation_time: round_dp(elapsed.as_secs_f64() * 1000.0, 2),
        efficiency_percentage: round_dp(efficiency, 1),
        total_amount: round_dp(total_amount, 2),
        transactions_reduced: original_transactions as i64 - settlements.len() as i64,
    }
}

/// Balance each participant still holds after executing `settlements`
pub fn residual_balances(
    participants: &[Participant],
    settlements: &[Settlement],
) -> BTreeMap<ParticipantId, f64> {
    let mut residual: BTreeMap<ParticipantId, f64> =
        participants.iter().map(|p| (p.id, p.balance)).collect();

    for settlement in settlements {
        *residual.entry(settlement.from).or_insert(0.0) += settlement.amount;
        *residual.entry(settlement.to).or_insert(0.0) -= settlement.amount;
    }

    residual
}

fn round_dp(value: f64, places: u32) -> f64 {
    Decimal::from_f64(value)
        .and_then(|d| d.round_dp(places).to_f64())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice_bob_charlie() -> Vec<Participant> {
        vec![
            Participant::new(1, "Alice", 100.0),
            Participant::new(2, "Bob", -50.0),
            Participant::new(3, "Charlie", -50.0),
        ]
    }

    #[test]
    fn test_summary_for_star_plan() {
        let people = alice_bob_charlie();
        let plan = vec![
            Settlement::between(&people[1], &people[0], 50.0),
            Settlement::between(&people[2], &people[0], 50.0),
        ];

        let info = summarize(&people, &plan, "Greedy Heap", Duration::from_micros(1234));

        assert_eq!(info.algorithm, "Greedy Heap");
        assert_eq!(info.total_amount, 100.0);
        assert_eq!(info.efficiency_percentage, 33.3);
        assert_eq!(info.transactions_reduced, 1);
        assert_eq!(info.computation_time, 1.23);
    }

    #[test]
    fn test_summary_for_empty_input() {
        let info = summarize(&[], &[], "Simple Greedy (Fallback)", Duration::ZERO);

        assert_eq!(info.total_amount, 0.0);
        assert_eq!(info.efficiency_percentage, 0.0);
        assert_eq!(info.transactions_reduced, 0);
        assert_eq!(info.computation_time, 0.0);
    }

    #[test]
    fn test_total_amount_is_rounded_to_cents() {
        let people = vec![
            Participant::new(1, "A", 10.004),
            Participant::new(2, "B", 0.333),
            Participant::new(3, "C", -10.337),
        ];
        let info = summarize(&people, &[], "x", Duration::ZERO);
        assert_eq!(info.total_amount, 10.34);
        assert_eq!(info.efficiency_percentage, 100.0);
    }

    #[test]
    fn test_residual_balances() {
        let people = vec![Participant::new(1, "A", 50.0), Participant::new(2, "B", -30.0)];
        let plan = vec![Settlement::between(&people[1], &people[0], 30.0)];

        let residual = residual_balances(&people, &plan);
        assert_eq!(residual[&1], 20.0);
        assert_eq!(residual[&2], 0.0);
    }

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(33.333333, 1), 33.3);
        assert_eq!(round_dp(66.66666, 1), 66.7);
        assert!(round_dp(f64::NAN, 2).is_nan());
    }
}
