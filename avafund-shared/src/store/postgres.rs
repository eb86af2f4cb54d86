//! PostgreSQL store
//!
//! Decimal columns are `NUMERIC(38, 12)`. They are written as text cast to
//! `numeric` and read back with `::text` so no precision passes through a
//! float.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use avafund_shared::db::pool::{create_pool, DatabaseConfig};
//! use avafund_shared::store::{LedgerStore, PgLedgerStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool(DatabaseConfig {
//!     url: std::env::var("DATABASE_URL")?,
//!     ..Default::default()
//! })
//! .await?;
//!
//! let store: Arc<dyn LedgerStore> = Arc::new(PgLedgerStore::new(pool));
//! let campaigns = store.list_campaigns().await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{LedgerStore, StoreError};
use crate::{
    db::pool::health_check,
    ledger::{
        creation::next_campaign_id,
        donation::{apply_donation, DonationReceipt, PendingDonation},
    },
    models::{
        campaign::{Campaign, CampaignDetail, CampaignWithCreator, NewCampaign},
        donation::Donation,
        milestone::Milestone,
        user::{CreateUser, User},
    },
};

/// Advisory lock key serializing public campaign ID assignment
const CAMPAIGN_ID_LOCK: i64 = 0x4156_4146_554e_4431;

const CAMPAIGN_COLUMNS: &str = r#"
    c.id, c.campaign_id, c.creator_id, c.title, c.description, c.goal_kes,
    c.goal_avax::text AS goal_avax, c.conversion_rate::text AS conversion_rate,
    c.conversion_timestamp, c.deadline, c.total_donations_kes,
    c.total_donations_avax::text AS total_donations_avax, c.donor_count,
    c.goal_reached, c.finalized, c.milestones_count, c.created_at, c.updated_at
"#;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, wallet_address, created_at, updated_at";

const MILESTONE_COLUMNS: &str = r#"
    id, campaign_ref, milestone_index, description, amount_kes,
    amount_avax::text AS amount_avax, released, votes_for, votes_against,
    evidence_uri, proposed_at, created_at
"#;

const DONATION_COLUMNS: &str = r#"
    id, campaign_ref, donor, amount_kes, amount_avax::text AS amount_avax,
    donated_at, transaction_hash, created_at
"#;

/// [`LedgerStore`] over a sqlx PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for migrations and shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO users (name, email, password_hash, wallet_address)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(data.name)
            .bind(data.email)
            .bind(data.password_hash)
            .bind(data.wallet_address)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn list_campaigns(&self) -> Result<Vec<CampaignWithCreator>, StoreError> {
        let sql = format!(
            r#"
            SELECT {CAMPAIGN_COLUMNS},
                   u.name AS creator_name, u.wallet_address AS creator_wallet
            FROM campaigns c
            JOIN users u ON u.id = c.creator_id
            ORDER BY c.campaign_id DESC
            "#
        );

        let campaigns = sqlx::query_as::<_, CampaignWithCreator>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(campaigns)
    }

    async fn find_campaign(&self, campaign_id: i64) -> Result<Option<CampaignDetail>, StoreError> {
        let sql = format!(
            r#"
            SELECT {CAMPAIGN_COLUMNS},
                   u.name AS creator_name, u.wallet_address AS creator_wallet
            FROM campaigns c
            JOIN users u ON u.id = c.creator_id
            WHERE c.campaign_id = $1
            "#
        );

        let Some(campaign) = sqlx::query_as::<_, CampaignWithCreator>(&sql)
            .bind(campaign_id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let sql = format!(
            r#"
            SELECT {MILESTONE_COLUMNS}
            FROM milestones
            WHERE campaign_ref = $1
            ORDER BY milestone_index
            "#
        );
        let milestones = sqlx::query_as::<_, Milestone>(&sql)
            .bind(campaign.campaign.id)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!(
            r#"
            SELECT {DONATION_COLUMNS}
            FROM donations
            WHERE campaign_ref = $1
            ORDER BY donated_at DESC, created_at DESC
            "#
        );
        let donations = sqlx::query_as::<_, Donation>(&sql)
            .bind(campaign.campaign.id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(CampaignDetail {
            campaign,
            milestones,
            donations,
        }))
    }

    async fn create_campaign(&self, data: NewCampaign) -> Result<Campaign, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Released at commit; keeps MAX(campaign_id) + 1 unique under concurrency
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(CAMPAIGN_ID_LOCK)
            .execute(&mut *tx)
            .await?;

        let creator_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(data.creator_id)
                .fetch_one(&mut *tx)
                .await?;
        if !creator_exists {
            return Err(StoreError::NotFound);
        }

        let current_max: Option<i64> = sqlx::query_scalar("SELECT MAX(campaign_id) FROM campaigns")
            .fetch_one(&mut *tx)
            .await?;
        let campaign_id = next_campaign_id(current_max);

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO campaigns (
                campaign_id, creator_id, title, description, goal_kes, goal_avax,
                conversion_rate, conversion_timestamp, deadline, milestones_count
            )
            VALUES ($1, $2, $3, $4, $5, $6::numeric, $7::numeric, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(campaign_id)
        .bind(data.creator_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.goal_kes)
        .bind(data.goal_avax.to_string())
        .bind(data.conversion_rate.to_string())
        .bind(data.conversion_timestamp)
        .bind(data.deadline)
        .bind(data.milestones.len() as i32)
        .fetch_one(&mut *tx)
        .await?;

        for (index, milestone) in data.milestones.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO milestones (
                    campaign_ref, milestone_index, description, amount_kes, amount_avax
                )
                VALUES ($1, $2, $3, $4, $5::numeric)
                "#,
            )
            .bind(id)
            .bind(index as i32)
            .bind(&milestone.description)
            .bind(milestone.amount_kes)
            .bind(milestone.amount_avax.to_string())
            .execute(&mut *tx)
            .await?;
        }

        let sql = format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns c WHERE c.id = $1");
        let campaign = sqlx::query_as::<_, Campaign>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(campaign_id, "Campaign persisted");
        Ok(campaign)
    }

    async fn record_donation(
        &self,
        campaign_id: i64,
        pending: PendingDonation,
    ) -> Result<DonationReceipt, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Row lock held until commit; concurrent donations to this campaign queue here
        let sql = format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns c WHERE c.campaign_id = $1 FOR UPDATE"
        );
        let campaign = sqlx::query_as::<_, Campaign>(&sql)
            .bind(campaign_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound)?;

        let donated_before: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM donations
                WHERE campaign_ref = $1 AND LOWER(donor) = LOWER($2)
            )
            "#,
        )
        .bind(campaign.id)
        .bind(&pending.donor)
        .fetch_one(&mut *tx)
        .await?;

        let outcome = apply_donation(&campaign, &pending, !donated_before)?;

        let sql = format!(
            r#"
            INSERT INTO donations (
                campaign_ref, donor, amount_kes, amount_avax, donated_at, transaction_hash
            )
            VALUES ($1, $2, $3, $4::numeric, $5, $6)
            RETURNING {DONATION_COLUMNS}
            "#
        );
        let donation = sqlx::query_as::<_, Donation>(&sql)
            .bind(outcome.donation.campaign_ref)
            .bind(&outcome.donation.donor)
            .bind(outcome.donation.amount_kes)
            .bind(outcome.donation.amount_avax.to_string())
            .bind(outcome.donation.timestamp)
            .bind(&outcome.donation.transaction_hash)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE campaigns
            SET total_donations_kes = $2,
                total_donations_avax = $3::numeric,
                donor_count = $4,
                goal_reached = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(campaign.id)
        .bind(outcome.totals.total_donations_kes)
        .bind(outcome.totals.total_donations_avax.to_string())
        .bind(outcome.totals.donor_count)
        .bind(outcome.totals.goal_reached)
        .execute(&mut *tx)
        .await?;

        let sql = format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns c WHERE c.id = $1");
        let campaign = sqlx::query_as::<_, Campaign>(&sql)
            .bind(campaign.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(DonationReceipt { donation, campaign })
    }
}
