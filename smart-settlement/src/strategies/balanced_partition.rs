//! Balanced partition heuristic
//!
//! Each round scans every unordered creditor/debtor pair among the remaining
//! participants and settles the one that moves the most money. Participants
//! brought within tolerance leave the pool before the next round.
//!
//! The scan runs outer index ascending, inner index ascending, and only a
//! strictly larger amount replaces the current best, so among equal amounts
//! the earliest pair in scan order wins.

use super::{check_balances, Algorithm, RoundBudget};
use crate::types::{Participant, Settlement};
use crate::Result;

/// Best pair found in one scan: (debtor index, creditor index, amount)
type Pairing = (usize, usize, f64);

/// Settle the pair with the largest feasible amount, round after round
pub fn settle(participants: Vec<Participant>, tolerance: f64) -> Result<Vec<Settlement>> {
    check_balances(Algorithm::BalancedPartition, &participants)?;

    let mut pool: Vec<Participant> = participants
        .into_iter()
        .filter(|p| !p.is_settled(tolerance))
        .collect();
    pool.sort_by(|a, b| b.balance.abs().total_cmp(&a.balance.abs()));

    let mut budget = RoundBudget::new(Algorithm::BalancedPartition, pool.len());
    let mut settlements = Vec::new();

    while pool.len() > 1 {
        let Some((debtor, creditor, amount)) = best_pairing(&pool) else {
            break;
        };
        budget.spend()?;

        settlements.push(Settlement::between(&pool[debtor], &pool[creditor], amount));
        pool[debtor].balance += amount;
        pool[creditor].balance -= amount;

        pool.retain(|p| !p.is_settled(tolerance));
    }

    Ok(settlements)
}

fn best_pairing(pool: &[Participant]) -> Option<Pairing> {
    let mut best: Option<Pairing> = None;
    let mut best_amount = 0.0;

    for (i, first) in pool.iter().enumerate() {
        for (offset, second) in pool[i + 1..].iter().enumerate() {
            let j = i + 1 + offset;
            let opposite = (first.balance > 0.0 && second.balance < 0.0)
                || (first.balance < 0.0 && second.balance > 0.0);
            if !opposite {
                continue;
            }

            let amount = first.balance.abs().min(second.balance.abs());
            if amount > best_amount {
                best_amount = amount;
                best = Some(if first.balance > 0.0 {
                    (j, i, amount)
                } else {
                    (i, j, amount)
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::{assert_settles, participants};

    #[test]
    fn test_picks_largest_feasible_pair() {
        let input = participants(&[(1, 40.0), (2, 60.0), (3, -60.0), (4, -40.0)]);
        let settlements = settle(input.clone(), 0.01).unwrap();

        let pairs: Vec<_> = settlements.iter().map(|s| (s.from, s.to, s.amount)).collect();
        assert_eq!(pairs, vec![(3, 2, 60.0), (4, 1, 40.0)]);
        assert_settles(&input, &settlements);
    }

    #[test]
    fn test_equal_amounts_keep_first_pair_in_scan_order() {
        // Sorted pool: [1: 50, 2: -50, 3: -50]; (1, 2) is scanned before (1, 3).
        let input = participants(&[(1, 100.0), (2, -50.0), (3, -50.0)]);
        let settlements = settle(input.clone(), 0.01).unwrap();

        assert_eq!(settlements.len(), 2);
        assert_eq!((settlements[0].from, settlements[0].to), (2, 1));
        assert_eq!((settlements[1].from, settlements[1].to), (3, 1));
        assert_settles(&input, &settlements);
    }

    #[test]
    fn test_each_round_rescans_remaining_pool() {
        // Pool order stays [1, 2, 3, 4, 5]; (1, 3) wins the 50 tie over (2, 3).
        let input = participants(&[(1, 70.0), (2, 50.0), (3, -50.0), (4, -40.0), (5, -30.0)]);
        let settlements = settle(input.clone(), 0.01).unwrap();

        let pairs: Vec<_> = settlements.iter().map(|s| (s.from, s.to, s.amount)).collect();
        assert_eq!(
            pairs,
            vec![(3, 1, 50.0), (4, 2, 40.0), (5, 1, 20.0), (5, 2, 10.0)]
        );
        assert_settles(&input, &settlements);
    }

    #[test]
    fn test_stops_without_opposite_pair() {
        let input = participants(&[(1, 30.0), (2, 20.0)]);
        assert!(settle(input, 0.01).unwrap().is_empty());
        assert!(best_pairing(&participants(&[(1, -5.0), (2, -6.0)])).is_none());
    }
}
