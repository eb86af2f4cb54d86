//! Data models for AvaFund
//!
//! # Models
//!
//! - `user`: User accounts and authentication
//! - `campaign`: Campaigns with their fixed conversion rate and running totals
//! - `milestone`: Funded sub-goals of a campaign
//! - `donation`: Append-only donation records
//!
//! Persistence lives behind [`crate::store::LedgerStore`]; these types are
//! plain records plus the `New*`/`Create*` inputs the store accepts.

pub mod campaign;
pub mod donation;
pub mod milestone;
pub mod user;
