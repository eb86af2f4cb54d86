//! In-memory store
//!
//! Keeps everything in process behind one `tokio::sync::RwLock`. Used when
//! no `DATABASE_URL` is configured and by the test suites. Data is lost on
//! restart.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{LedgerStore, StoreError, USERS_EMAIL_CONSTRAINT};
use crate::{
    ledger::{
        creation::next_campaign_id,
        donation::{apply_donation, fold_case, same_donor, DonationReceipt, PendingDonation},
    },
    models::{
        campaign::{Campaign, CampaignDetail, CampaignWithCreator, NewCampaign},
        donation::Donation,
        milestone::Milestone,
        user::{CreateUser, User},
    },
};

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,

    /// Insertion order is creation order
    campaigns: Vec<Campaign>,

    milestones: Vec<Milestone>,

    /// Insertion order is donation order
    donations: Vec<Donation>,
}

impl MemoryState {
    fn with_creator(&self, campaign: &Campaign) -> Result<CampaignWithCreator, StoreError> {
        let creator = self
            .users
            .iter()
            .find(|user| user.id == campaign.creator_id)
            .ok_or(StoreError::NotFound)?;

        Ok(CampaignWithCreator {
            campaign: campaign.clone(),
            creator_name: creator.name.clone(),
            creator_wallet: creator.wallet_address.clone(),
        })
    }
}

/// Process-local [`LedgerStore`]
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        let email = fold_case(&data.email);
        if state.users.iter().any(|user| fold_case(&user.email) == email) {
            return Err(StoreError::Duplicate {
                constraint: USERS_EMAIL_CONSTRAINT.to_string(),
            });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            wallet_address: data.wallet_address,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = fold_case(email);
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|user| fold_case(&user.email) == email)
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|user| user.id == id).cloned())
    }

    async fn list_campaigns(&self) -> Result<Vec<CampaignWithCreator>, StoreError> {
        let state = self.state.read().await;
        state
            .campaigns
            .iter()
            .rev()
            .map(|campaign| state.with_creator(campaign))
            .collect()
    }

    async fn find_campaign(&self, campaign_id: i64) -> Result<Option<CampaignDetail>, StoreError> {
        let state = self.state.read().await;

        let Some(campaign) = state
            .campaigns
            .iter()
            .find(|campaign| campaign.campaign_id == campaign_id)
        else {
            return Ok(None);
        };

        let mut milestones: Vec<Milestone> = state
            .milestones
            .iter()
            .filter(|milestone| milestone.campaign_ref == campaign.id)
            .cloned()
            .collect();
        milestones.sort_by_key(|milestone| milestone.index);

        let donations: Vec<Donation> = state
            .donations
            .iter()
            .rev()
            .filter(|donation| donation.campaign_ref == campaign.id)
            .cloned()
            .collect();

        Ok(Some(CampaignDetail {
            campaign: state.with_creator(campaign)?,
            milestones,
            donations,
        }))
    }

    async fn create_campaign(&self, data: NewCampaign) -> Result<Campaign, StoreError> {
        let mut state = self.state.write().await;

        if !state.users.iter().any(|user| user.id == data.creator_id) {
            return Err(StoreError::NotFound);
        }

        let current_max = state.campaigns.iter().map(|c| c.campaign_id).max();
        let now = Utc::now();
        let campaign = Campaign {
            id: Uuid::new_v4(),
            campaign_id: next_campaign_id(current_max),
            creator_id: data.creator_id,
            title: data.title,
            description: data.description,
            goal_kes: data.goal_kes,
            goal_avax: data.goal_avax,
            conversion_rate: data.conversion_rate,
            conversion_timestamp: data.conversion_timestamp,
            deadline: data.deadline,
            total_donations_kes: 0,
            total_donations_avax: Default::default(),
            donor_count: 0,
            goal_reached: false,
            finalized: false,
            milestones_count: data.milestones.len() as i32,
            created_at: now,
            updated_at: now,
        };

        for (index, milestone) in data.milestones.into_iter().enumerate() {
            state.milestones.push(Milestone {
                id: Uuid::new_v4(),
                campaign_ref: campaign.id,
                index: index as i32,
                description: milestone.description,
                amount_kes: milestone.amount_kes,
                amount_avax: milestone.amount_avax,
                released: false,
                votes_for: 0,
                votes_against: 0,
                evidence_uri: None,
                proposed_at: None,
                created_at: now,
            });
        }
        state.campaigns.push(campaign.clone());

        Ok(campaign)
    }

    async fn record_donation(
        &self,
        campaign_id: i64,
        pending: PendingDonation,
    ) -> Result<DonationReceipt, StoreError> {
        // One write guard spans the read of prior state and both writes
        let mut state = self.state.write().await;

        let position = state
            .campaigns
            .iter()
            .position(|campaign| campaign.campaign_id == campaign_id)
            .ok_or(StoreError::NotFound)?;
        let campaign_ref = state.campaigns[position].id;

        let donor_is_new = !state
            .donations
            .iter()
            .any(|d| d.campaign_ref == campaign_ref && same_donor(&d.donor, &pending.donor));

        let outcome = apply_donation(&state.campaigns[position], &pending, donor_is_new)?;

        let now = Utc::now();
        let donation = Donation {
            id: Uuid::new_v4(),
            campaign_ref: outcome.donation.campaign_ref,
            donor: outcome.donation.donor,
            amount_kes: outcome.donation.amount_kes,
            amount_avax: outcome.donation.amount_avax,
            timestamp: outcome.donation.timestamp,
            transaction_hash: outcome.donation.transaction_hash,
            created_at: now,
        };
        state.donations.push(donation.clone());

        let campaign = &mut state.campaigns[position];
        campaign.total_donations_kes = outcome.totals.total_donations_kes;
        campaign.total_donations_avax = outcome.totals.total_donations_avax;
        campaign.donor_count = outcome.totals.donor_count;
        campaign.goal_reached = outcome.totals.goal_reached;
        campaign.updated_at = now;

        Ok(DonationReceipt {
            donation,
            campaign: campaign.clone(),
        })
    }
}
