//! Request and error payloads exchanged with the I/O layer
//!
//! Balance maps arrive keyed by string-encoded ids and may carry numbers or
//! numeric strings as values. Parsing them is the only place input errors
//! originate.

use crate::types::{Member, ParticipantId};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Balance value as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BalanceValue {
    /// JSON number
    Number(f64),
    /// Numeric string, e.g. `"-12.50"`
    Text(String),
}

impl BalanceValue {
    fn parse(&self, participant: &str) -> Result<f64> {
        let value = match self {
            BalanceValue::Number(value) => Some(*value),
            BalanceValue::Text(text) => text.trim().parse::<f64>().ok(),
        };

        match value {
            Some(value) if value.is_finite() => Ok(value),
            _ => Err(Error::InvalidBalance {
                participant: participant.to_string(),
                value: match self {
                    BalanceValue::Number(value) => value.to_string(),
                    BalanceValue::Text(text) => text.clone(),
                },
            }),
        }
    }
}

impl From<f64> for BalanceValue {
    fn from(value: f64) -> Self {
        BalanceValue::Number(value)
    }
}

/// Settlement request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// Net balance per participant id
    #[serde(default)]
    pub balances: HashMap<String, BalanceValue>,

    /// Group roster
    #[serde(default)]
    pub members: Vec<Member>,
}

impl SettlementRequest {
    /// Parse a request from JSON text
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Coerce ids to integers and balances to finite floats
    pub fn parse_balances(&self) -> Result<BTreeMap<ParticipantId, f64>> {
        let mut parsed = BTreeMap::new();
        for (key, value) in &self.balances {
            let id: ParticipantId = key
                .trim()
                .parse()
                .map_err(|_| Error::InvalidParticipantId(key.clone()))?;
            if parsed.insert(id, value.parse(key)?).is_some() {
                return Err(Error::InvalidParticipantId(key.clone()));
            }
        }
        Ok(parsed)
    }
}

/// Error body returned instead of a settlement plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error category
    pub error: String,

    /// Underlying error text
    pub message: String,
}

impl ErrorResponse {
    /// Body for a malformed request
    pub fn bad_request(err: &Error) -> Self {
        Self {
            error: "Invalid request".to_string(),
            message: err.to_string(),
        }
    }

    /// Body for a failure inside the optimizer
    pub fn internal(err: &Error) -> Self {
        Self {
            error: "Internal server error".to_string(),
            message: err.to_string(),
        }
    }

    /// Pick the body matching the error class
    pub fn from_error(err: &Error) -> Self {
        if err.is_input_error() {
            Self::bad_request(err)
        } else {
            Self::internal(err)
        }
    }
}
