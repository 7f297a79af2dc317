//! Error types for the settlement optimizer

use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Participant id is not an integer
    #[error("Invalid participant id: {0:?}")]
    InvalidParticipantId(String),

    /// Balance is not a finite number
    #[error("Invalid balance for participant {participant}: {value:?}")]
    InvalidBalance {
        /// Participant the balance belongs to
        participant: String,
        /// Raw value as received
        value: String,
    },

    /// A single heuristic could not produce a plan
    #[error("{algorithm} failed: {reason}")]
    Heuristic {
        /// Heuristic label
        algorithm: &'static str,
        /// Failure detail
        reason: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Prometheus registration error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Errors caused by the caller's request rather than by the optimizer
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidParticipantId(_) | Error::InvalidBalance { .. } | Error::Serialization(_)
        )
    }

    pub(crate) fn heuristic(algorithm: &'static str, reason: impl Into<String>) -> Self {
        Error::Heuristic {
            algorithm,
            reason: reason.into(),
        }
    }
}
