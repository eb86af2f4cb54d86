//! Campaign ledger
//!
//! Derived campaign state and the arithmetic that keeps it consistent as
//! donations arrive.
//!
//! # Modules
//!
//! - [`amount`]: 12-digit fixed-point decimal used for AVAX and rates
//! - [`creation`]: validating a campaign draft and fixing its conversion rate
//! - [`donation`]: validating a donation and applying it to campaign totals
//! - [`projection`]: presentation-ready views (progress, days remaining,
//!   milestone vote progress)
//!
//! Everything here is pure. Stores call [`donation::apply_donation`] while
//! holding whatever lock or transaction keeps the read of prior state and
//! the write of the new totals together.

pub mod amount;
pub mod creation;
pub mod donation;
pub mod projection;

use amount::AmountError;

/// Error type for ledger operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Input failed a ledger rule
    #[error("Invalid {field}: {message}")]
    Invalid { field: String, message: String },

    /// Amount arithmetic failed
    #[error(transparent)]
    Amount(#[from] AmountError),
}

impl LedgerError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        LedgerError::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Current time as unix seconds
pub fn now_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}
