//! Campaign model
//!
//! A campaign raises a KES-denominated goal, split into milestones. The
//! KES/AVAX conversion rate is fixed when the campaign is created and every
//! AVAX figure on the campaign (goal, running total, milestone amounts,
//! donations) is derived from that one rate.
//!
//! Campaigns carry two identifiers: the internal `id` (UUID, used for
//! foreign keys) and the public, sequential `campaign_id` that appears in
//! URLs.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE campaigns (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     campaign_id BIGINT NOT NULL UNIQUE,
//!     creator_id UUID NOT NULL REFERENCES users(id),
//!     title VARCHAR(200) NOT NULL,
//!     description TEXT NOT NULL,
//!     goal_kes BIGINT NOT NULL,
//!     goal_avax NUMERIC(38, 12) NOT NULL,
//!     conversion_rate NUMERIC(38, 12) NOT NULL,
//!     conversion_timestamp BIGINT NOT NULL,
//!     deadline BIGINT NOT NULL,
//!     total_donations_kes BIGINT NOT NULL DEFAULT 0,
//!     total_donations_avax NUMERIC(38, 12) NOT NULL DEFAULT 0,
//!     donor_count INTEGER NOT NULL DEFAULT 0,
//!     goal_reached BOOLEAN NOT NULL DEFAULT FALSE,
//!     finalized BOOLEAN NOT NULL DEFAULT FALSE,
//!     milestones_count INTEGER NOT NULL DEFAULT 0,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{
    donation::Donation,
    milestone::{Milestone, NewMilestone},
};
use crate::ledger::amount::Amount;

/// Stored campaign record
///
/// Decimal columns are read back as text and parsed into [`Amount`].
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Campaign {
    /// Internal ID
    pub id: Uuid,

    /// Public sequential ID, starting at 0
    pub campaign_id: i64,

    /// User who created the campaign
    pub creator_id: Uuid,

    pub title: String,

    pub description: String,

    /// Target amount in Kenyan Shillings
    pub goal_kes: i64,

    /// Target amount in AVAX, derived once at creation
    #[sqlx(try_from = "String")]
    pub goal_avax: Amount,

    /// KES per AVAX, fixed at creation
    #[sqlx(try_from = "String")]
    pub conversion_rate: Amount,

    /// Unix seconds at which the conversion rate was fixed
    pub conversion_timestamp: i64,

    /// Unix seconds
    pub deadline: i64,

    pub total_donations_kes: i64,

    #[sqlx(try_from = "String")]
    pub total_donations_avax: Amount,

    /// Distinct donor addresses (case-insensitive)
    pub donor_count: i32,

    /// Latched once total donations reach the goal
    pub goal_reached: bool,

    pub finalized: bool,

    pub milestones_count: i32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Campaign joined with its creator's public details
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CampaignWithCreator {
    #[sqlx(flatten)]
    pub campaign: Campaign,

    pub creator_name: String,

    pub creator_wallet: String,
}

/// A campaign with its milestones (index ascending) and donations (newest first)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignDetail {
    pub campaign: CampaignWithCreator,
    pub milestones: Vec<Milestone>,
    pub donations: Vec<Donation>,
}

/// Input for persisting a planned campaign
///
/// Built by [`crate::ledger::creation::plan_campaign`]; the store assigns
/// the sequential `campaign_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCampaign {
    pub creator_id: Uuid,
    pub title: String,
    pub description: String,
    pub goal_kes: i64,
    pub goal_avax: Amount,
    pub conversion_rate: Amount,
    pub conversion_timestamp: i64,
    pub deadline: i64,

    /// Milestones in campaign order; position becomes the index
    pub milestones: Vec<NewMilestone>,
}
