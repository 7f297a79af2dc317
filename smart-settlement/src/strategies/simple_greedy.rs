//! Simple greedy heuristic (fallback)
//!
//! Same two-pointer walk as min-max flow, but over creditors and debtors in
//! the order they were encountered. It has no failure mode beyond malformed
//! balances, which is why the optimizer falls back to it.

use super::{check_balances, Algorithm, RoundBudget};
use crate::types::{Participant, Settlement};
use crate::Result;

/// Settle creditors and debtors front to back in encounter order
pub fn settle(participants: Vec<Participant>, tolerance: f64) -> Result<Vec<Settlement>> {
    check_balances(Algorithm::SimpleGreedy, &participants)?;

    let (mut creditors, mut debtors): (Vec<_>, Vec<_>) = participants
        .into_iter()
        .filter(|p| p.is_creditor(tolerance) || p.is_debtor(tolerance))
        .partition(|p| p.is_creditor(tolerance));

    walk(Algorithm::SimpleGreedy, &mut creditors, &mut debtors, tolerance)
}

/// Two-pointer walk over prepared creditor and debtor lists.
///
/// The creditor pointer moves once its residual is within tolerance, the
/// debtor pointer likewise; an exact match moves both.
pub(crate) fn walk(
    algorithm: Algorithm,
    creditors: &mut [Participant],
    debtors: &mut [Participant],
    tolerance: f64,
) -> Result<Vec<Settlement>> {
    let mut budget = RoundBudget::new(algorithm, creditors.len() + debtors.len());
    let mut settlements = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < creditors.len() && j < debtors.len() {
        budget.spend()?;

        let creditor = &mut creditors[i];
        let debtor = &mut debtors[j];
        let amount = creditor.balance.min(-debtor.balance);

        settlements.push(Settlement::between(debtor, creditor, amount));

        creditor.balance -= amount;
        debtor.balance += amount;

        if creditor.balance <= tolerance {
            i += 1;
        }
        if debtor.balance >= -tolerance {
            j += 1;
        }
    }

    Ok(settlements)
}
