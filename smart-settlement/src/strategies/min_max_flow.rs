//! Min-max two-pointer heuristic
//!
//! Sorts creditors by descending balance and debtors from most negative up,
//! then walks both lists once.

use super::{check_balances, simple_greedy, Algorithm};
use crate::types::{Participant, Settlement};
use crate::Result;

/// Settle the largest remaining creditor against the largest remaining debtor
pub fn settle(participants: Vec<Participant>, tolerance: f64) -> Result<Vec<Settlement>> {
    check_balances(Algorithm::MinMaxFlow, &participants)?;

    let (mut creditors, mut debtors): (Vec<_>, Vec<_>) = participants
        .into_iter()
        .filter(|p| p.is_creditor(tolerance) || p.is_debtor(tolerance))
        .partition(|p| p.is_creditor(tolerance));

    creditors.sort_by(|a, b| b.balance.total_cmp(&a.balance));
    debtors.sort_by(|a, b| a.balance.total_cmp(&b.balance));

    simple_greedy::walk(Algorithm::MinMaxFlow, &mut creditors, &mut debtors, tolerance)
}
