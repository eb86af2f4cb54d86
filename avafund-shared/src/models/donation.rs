//! Donation model
//!
//! Donations are append-only: created once when a donation is recorded and
//! never updated or deleted afterwards.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE donations (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     campaign_ref UUID NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
//!     donor VARCHAR(255) NOT NULL,
//!     amount_kes BIGINT NOT NULL,
//!     amount_avax NUMERIC(38, 12) NOT NULL,
//!     donated_at BIGINT NOT NULL,
//!     transaction_hash VARCHAR(66) NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::amount::Amount;

/// Stored donation record
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Donation {
    pub id: Uuid,

    /// Internal ID of the campaign donated to
    pub campaign_ref: Uuid,

    /// Donor wallet address, as submitted
    pub donor: String,

    pub amount_kes: i64,

    /// Converted at the campaign's fixed rate
    #[sqlx(try_from = "String")]
    pub amount_avax: Amount,

    /// Unix seconds
    #[sqlx(rename = "donated_at")]
    pub timestamp: i64,

    /// Placeholder, not an on-chain transaction ID
    pub transaction_hash: String,

    pub created_at: DateTime<Utc>,
}

/// Input for appending a donation
#[derive(Debug, Clone, PartialEq)]
pub struct NewDonation {
    pub campaign_ref: Uuid,
    pub donor: String,
    pub amount_kes: i64,
    pub amount_avax: Amount,
    pub timestamp: i64,
    pub transaction_hash: String,
}
