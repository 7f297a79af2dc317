//! Smart Settlement
//!
//! Minimum-transaction debt settlement for shared-expense groups.
//!
//! # Architecture
//!
//! - **Normalizer**: Net balances → participants with outstanding amounts
//! - **Portfolio**: Several greedy heuristics run on independent copies
//! - **Selection**: Fewest transfers wins, simple greedy is the safety net
//! - **Summary**: Efficiency and totals reported alongside the plan
//!
//! # Invariants
//!
//! - Every transfer moves money from a debtor to a creditor
//! - Executing the plan leaves every balance within the tolerance
//! - A plan has at most one transfer fewer than its participants
//! - Same input → same plan

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod error;
pub mod config;
pub mod strategies;
pub mod normalizer;
pub mod request;
pub mod summary;
pub mod metrics;
pub mod optimizer;
pub mod calculator;

// Re-exports
pub use error::{Error, Result};
pub use types::{
    Member, OptimizationInfo, Participant, ParticipantId, Settlement, SettlementResponse,
    DEFAULT_TOLERANCE,
};
pub use config::Config;
pub use strategies::Algorithm;
pub use request::{ErrorResponse, SettlementRequest};
pub use calculator::{calculate_settlement, SettlementCalculator};
