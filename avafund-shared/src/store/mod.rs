//! Persistence behind a repository interface
//!
//! HTTP handlers and tests receive an `Arc<dyn LedgerStore>` instead of
//! reaching for a global database client.
//!
//! # Implementations
//!
//! - [`postgres::PgLedgerStore`]: sqlx over PostgreSQL
//! - [`memory::InMemoryStore`]: process-local, for development and tests
//!
//! # Donation atomicity
//!
//! [`LedgerStore::record_donation`] must read the campaign's prior totals,
//! check the donor's history and write both the donation and the new totals
//! as one unit. Two donations to the same campaign never interleave.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    ledger::{
        donation::{DonationReceipt, PendingDonation},
        LedgerError,
    },
    models::{
        campaign::{Campaign, CampaignDetail, CampaignWithCreator, NewCampaign},
        user::{CreateUser, User},
    },
};

pub use memory::InMemoryStore;
pub use postgres::PgLedgerStore;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The addressed record does not exist
    #[error("Record not found")]
    NotFound,

    /// A unique constraint rejected the write
    #[error("Duplicate value violates {constraint}")]
    Duplicate { constraint: String },

    /// Ledger arithmetic rejected the update
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Duplicate {
                constraint: db_err.constraint().unwrap_or("unique").to_string(),
            },
            other => StoreError::Database(other),
        }
    }
}

/// Constraint name reported for duplicate emails
pub const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// Repository for users, campaigns, milestones and donations
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Short backend name for health reporting
    fn backend(&self) -> &'static str;

    /// Verifies the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// Inserts a user; a taken email yields [`StoreError::Duplicate`]
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError>;

    /// Looks up a user by email, case-insensitively
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// All campaigns with their creators, newest first
    async fn list_campaigns(&self) -> Result<Vec<CampaignWithCreator>, StoreError>;

    /// One campaign by public ID with milestones (index ascending) and
    /// donations (newest first)
    async fn find_campaign(&self, campaign_id: i64) -> Result<Option<CampaignDetail>, StoreError>;

    /// Persists a planned campaign under the next sequential public ID
    async fn create_campaign(&self, data: NewCampaign) -> Result<Campaign, StoreError>;

    /// Applies a donation to a campaign atomically
    ///
    /// Returns [`StoreError::NotFound`] if no campaign has `campaign_id`.
    async fn record_donation(
        &self,
        campaign_id: i64,
        pending: PendingDonation,
    ) -> Result<DonationReceipt, StoreError>;
}
