//! Milestone model
//!
//! Milestones split a campaign goal into funded sub-goals that donors vote
//! on before release. Vote casting and release are not implemented; the
//! counters are read-only here.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE milestones (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     campaign_ref UUID NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
//!     milestone_index INTEGER NOT NULL,
//!     description TEXT NOT NULL,
//!     amount_kes BIGINT NOT NULL,
//!     amount_avax NUMERIC(38, 12) NOT NULL,
//!     released BOOLEAN NOT NULL DEFAULT FALSE,
//!     votes_for INTEGER NOT NULL DEFAULT 0,
//!     votes_against INTEGER NOT NULL DEFAULT 0,
//!     evidence_uri TEXT,
//!     proposed_at BIGINT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     UNIQUE (campaign_ref, milestone_index)
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::amount::Amount;

/// Stored milestone record
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Milestone {
    pub id: Uuid,

    /// Internal ID of the owning campaign
    pub campaign_ref: Uuid,

    /// 0-based position within the campaign
    #[sqlx(rename = "milestone_index")]
    pub index: i32,

    pub description: String,

    pub amount_kes: i64,

    #[sqlx(try_from = "String")]
    pub amount_avax: Amount,

    pub released: bool,

    pub votes_for: i32,

    pub votes_against: i32,

    pub evidence_uri: Option<String>,

    /// Unix seconds
    pub proposed_at: Option<i64>,

    pub created_at: DateTime<Utc>,
}

/// Input for a milestone of a new campaign
#[derive(Debug, Clone, PartialEq)]
pub struct NewMilestone {
    pub description: String,
    pub amount_kes: i64,
    pub amount_avax: Amount,
}
