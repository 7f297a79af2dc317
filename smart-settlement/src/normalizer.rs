//! Participant normalization
//!
//! Turns the raw id → balance mapping into the participant list the
//! heuristics work on: settled balances are dropped and display names are
//! resolved from the roster.

use crate::types::{Member, Participant, ParticipantId};
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};

/// Build participants with an outstanding balance, in ascending id order
pub fn normalize(
    balances: &BTreeMap<ParticipantId, f64>,
    members: &[Member],
    tolerance: f64,
) -> Result<Vec<Participant>> {
    let names: HashMap<ParticipantId, &str> = members
        .iter()
        .map(|m| (m.id, m.username.as_str()))
        .collect();

    let mut participants = Vec::with_capacity(balances.len());
    for (&id, &balance) in balances {
        if !balance.is_finite() {
            return Err(Error::InvalidBalance {
                participant: id.to_string(),
                value: balance.to_string(),
            });
        }
        if balance.abs() <= tolerance {
            continue;
        }

        let name = names
            .get(&id)
            .map(|name| name.to_string())
            .unwrap_or_else(|| fallback_name(id));
        participants.push(Participant::new(id, name, balance));
    }

    Ok(participants)
}

/// Display name for ids missing from the roster
pub fn fallback_name(id: ParticipantId) -> String {
    format!("User_{}", id)
}

/// Net sum of all balances; zero for a consistent ledger
pub fn imbalance(participants: &[Participant]) -> f64 {
    participants.iter().map(|p| p.balance).sum()
}
