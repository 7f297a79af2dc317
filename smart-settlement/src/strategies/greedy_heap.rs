//! Greedy heap heuristic
//!
//! Keeps creditors and debtors in two max-heaps keyed by outstanding amount.
//! Each round pairs the current largest creditor with the current largest
//! debtor and pushes back whichever side still has something outstanding, so
//! the next round always sees the up-to-date largest parties.

use super::{check_balances, Algorithm, RoundBudget};
use crate::types::{Participant, Settlement};
use crate::Result;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry pointing into the participant list
#[derive(Debug)]
struct Outstanding {
    amount: f64,
    seq: usize,
    index: usize,
}

impl PartialEq for Outstanding {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Outstanding {}

impl PartialOrd for Outstanding {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Outstanding {
    // Larger amount first; on equal amounts the earlier insertion pops first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.amount
            .total_cmp(&other.amount)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Default)]
struct OutstandingHeap {
    heap: BinaryHeap<Outstanding>,
    next_seq: usize,
}

impl OutstandingHeap {
    fn push(&mut self, amount: f64, index: usize) {
        self.heap.push(Outstanding {
            amount,
            seq: self.next_seq,
            index,
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<Outstanding> {
        self.heap.pop()
    }
}

/// Settle by repeatedly pairing the largest creditor with the largest debtor
pub fn settle(mut participants: Vec<Participant>, tolerance: f64) -> Result<Vec<Settlement>> {
    check_balances(Algorithm::GreedyHeap, &participants)?;

    let mut creditors = OutstandingHeap::default();
    let mut debtors = OutstandingHeap::default();

    for (index, person) in participants.iter().enumerate() {
        if person.is_creditor(tolerance) {
            creditors.push(person.balance, index);
        } else if person.is_debtor(tolerance) {
            debtors.push(-person.balance, index);
        }
    }

    let mut budget = RoundBudget::new(Algorithm::GreedyHeap, participants.len());
    let mut settlements = Vec::new();

    loop {
        let (Some(creditor), Some(debtor)) = (creditors.pop(), debtors.pop()) else {
            break;
        };
        budget.spend()?;

        let amount = creditor.amount.min(debtor.amount);
        settlements.push(Settlement::between(
            &participants[debtor.index],
            &participants[creditor.index],
            amount,
        ));

        participants[creditor.index].balance -= amount;
        participants[debtor.index].balance += amount;

        let creditor_left = &participants[creditor.index];
        if creditor_left.is_creditor(tolerance) {
            creditors.push(creditor_left.balance, creditor.index);
        }
        let debtor_left = &participants[debtor.index];
        if debtor_left.is_debtor(tolerance) {
            debtors.push(-debtor_left.balance, debtor.index);
        }
    }

    Ok(settlements)
}
