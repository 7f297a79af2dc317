//! Core types for the settlement optimizer

use serde::{Deserialize, Serialize};

/// Participant identifier as used by the group roster
pub type ParticipantId = i64;

/// Balance magnitude at or below which a participant counts as settled
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Roster entry supplying a participant's display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Participant id
    pub id: ParticipantId,

    /// Display name
    pub username: String,
}

impl Member {
    /// Create new roster entry
    pub fn new(id: ParticipantId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// Group member with an outstanding net balance
///
/// Positive balance = creditor (is owed money), negative = debtor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant id
    pub id: ParticipantId,

    /// Display name
    pub name: String,

    /// Net balance
    pub balance: f64,
}

impl Participant {
    /// Create new participant
    pub fn new(id: ParticipantId, name: impl Into<String>, balance: f64) -> Self {
        Self {
            id,
            name: name.into(),
            balance,
        }
    }

    /// Owed money by the group beyond the tolerance
    pub fn is_creditor(&self, tolerance: f64) -> bool {
        self.balance > tolerance
    }

    /// Owes money to the group beyond the tolerance
    pub fn is_debtor(&self, tolerance: f64) -> bool {
        self.balance < -tolerance
    }

    /// Settled within the tolerance
    pub fn is_settled(&self, tolerance: f64) -> bool {
        self.balance.abs() <= tolerance
    }
}

/// Directed payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Paying participant (debtor)
    pub from: ParticipantId,

    /// Receiving participant (creditor)
    pub to: ParticipantId,

    /// Debtor display name
    #[serde(rename = "fromName")]
    pub from_name: String,

    /// Creditor display name
    #[serde(rename = "toName")]
    pub to_name: String,

    /// Amount transferred
    pub amount: f64,
}

impl Settlement {
    /// Record a payment of `amount` from `debtor` to `creditor`
    pub fn between(debtor: &Participant, creditor: &Participant, amount: f64) -> Self {
        Self {
            from: debtor.id,
            to: creditor.id,
            from_name: debtor.name.clone(),
            to_name: creditor.name.clone(),
            amount,
        }
    }
}

/// Summary of how the chosen plan was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationInfo {
    /// Label of the heuristic whose plan was chosen
    pub algorithm: String,

    /// Wall-clock time of the calculation (milliseconds)
    pub computation_time: f64,

    /// Reduction in transfers versus one transfer per participant (0 - 100)
    pub efficiency_percentage: f64,

    /// Total credit that has to change hands
    pub total_amount: f64,

    /// Transfers saved versus one transfer per participant
    pub transactions_reduced: i64,
}

/// Settlement plan returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResponse {
    /// Payments to execute
    pub settlements: Vec<Settlement>,

    /// Optimization summary
    pub optimization_info: OptimizationInfo,
}
