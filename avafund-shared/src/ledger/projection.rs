//! Presentation-ready campaign views
//!
//! Pure functions of stored fields plus the current time. Wire names follow
//! the client's camelCase contract (`goalKES`, `totalDonationsAVAX`, ...).

use serde::Serialize;

use super::{amount::Amount, donation::DonationReceipt};
use crate::models::{
    campaign::CampaignWithCreator, donation::Donation, milestone::Milestone,
};

const SECONDS_PER_DAY: i64 = 86_400;

/// Funding progress as a percentage rounded to 2 decimal places
///
/// Returns 0 when the goal is 0.
///
/// # Example
///
/// ```
/// use avafund_shared::ledger::projection::progress_percent;
///
/// assert_eq!(progress_percent(1100, 1000), 110.0);
/// assert_eq!(progress_percent(1, 3), 33.33);
/// assert_eq!(progress_percent(500, 0), 0.0);
/// ```
pub fn progress_percent(total_kes: i64, goal_kes: i64) -> f64 {
    if goal_kes == 0 {
        return 0.0;
    }

    let progress = total_kes as f64 / goal_kes as f64 * 100.0;
    (progress * 100.0).round() / 100.0
}

/// Whole days left until the deadline, rounded up, never negative
pub fn days_remaining(deadline: i64, now: i64) -> i64 {
    let remaining = deadline - now;
    if remaining <= 0 {
        0
    } else {
        (remaining + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
    }
}

/// Campaign as listed to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignProjection {
    pub campaign_id: i64,

    /// Creator wallet address
    pub creator: String,

    pub creator_name: String,
    pub title: String,
    pub description: String,

    #[serde(rename = "goalKES")]
    pub goal_kes: i64,

    #[serde(rename = "goalAVAX")]
    pub goal_avax: Amount,

    #[serde(rename = "totalDonationsAVAX")]
    pub total_donations_avax: Amount,

    #[serde(rename = "totalDonationsKES")]
    pub total_donations_kes: i64,

    /// KES per AVAX, without trailing zeros
    pub conversion_rate: String,

    pub conversion_timestamp: i64,
    pub deadline: i64,
    pub goal_reached: bool,
    pub finalized: bool,
    pub donor_count: i32,
    pub milestones_count: i32,
    pub progress: f64,
    pub days_remaining: i64,
}

impl CampaignProjection {
    pub fn project(record: &CampaignWithCreator, now: i64) -> Self {
        let campaign = &record.campaign;
        Self {
            campaign_id: campaign.campaign_id,
            creator: record.creator_wallet.clone(),
            creator_name: record.creator_name.clone(),
            title: campaign.title.clone(),
            description: campaign.description.clone(),
            goal_kes: campaign.goal_kes,
            goal_avax: campaign.goal_avax,
            total_donations_avax: campaign.total_donations_avax,
            total_donations_kes: campaign.total_donations_kes,
            conversion_rate: campaign.conversion_rate.to_plain_string(),
            conversion_timestamp: campaign.conversion_timestamp,
            deadline: campaign.deadline,
            goal_reached: campaign.goal_reached,
            finalized: campaign.finalized,
            donor_count: campaign.donor_count,
            milestones_count: campaign.milestones_count,
            progress: progress_percent(campaign.total_donations_kes, campaign.goal_kes),
            days_remaining: days_remaining(campaign.deadline, now),
        }
    }
}

/// Vote tally of a milestone
///
/// Vote casting is not implemented, so this only reflects stored counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteProgress {
    pub total_votes: i64,
    pub quorum_reached: bool,
    pub approval_percent: f64,
    pub can_finalize: bool,
}

impl VoteProgress {
    pub fn of(milestone: &Milestone) -> Self {
        let votes_for = i64::from(milestone.votes_for);
        let votes_against = i64::from(milestone.votes_against);
        let total_votes = votes_for + votes_against;

        let approval_percent = if total_votes > 0 {
            votes_for as f64 / total_votes as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_votes,
            quorum_reached: total_votes > 0,
            approval_percent,
            can_finalize: votes_for > votes_against && !milestone.released,
        }
    }
}

/// Milestone as shown on the campaign page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneView {
    pub index: i32,
    pub description: String,

    #[serde(rename = "amountKES")]
    pub amount_kes: i64,

    #[serde(rename = "amountAVAX")]
    pub amount_avax: Amount,

    pub released: bool,
    pub votes_for: i32,
    pub votes_against: i32,

    /// Empty when no evidence has been submitted
    #[serde(rename = "evidenceURI")]
    pub evidence_uri: String,

    pub proposed_at: Option<i64>,
    pub vote_progress: VoteProgress,
}

impl From<&Milestone> for MilestoneView {
    fn from(milestone: &Milestone) -> Self {
        Self {
            index: milestone.index,
            description: milestone.description.clone(),
            amount_kes: milestone.amount_kes,
            amount_avax: milestone.amount_avax,
            released: milestone.released,
            votes_for: milestone.votes_for,
            votes_against: milestone.votes_against,
            evidence_uri: milestone.evidence_uri.clone().unwrap_or_default(),
            proposed_at: milestone.proposed_at,
            vote_progress: VoteProgress::of(milestone),
        }
    }
}

/// Donation as shown on the campaign page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationView {
    pub donor: String,

    #[serde(rename = "amountAVAX")]
    pub amount_avax: Amount,

    #[serde(rename = "amountKES")]
    pub amount_kes: i64,

    pub timestamp: i64,
    pub transaction_hash: String,
}

impl From<&Donation> for DonationView {
    fn from(donation: &Donation) -> Self {
        Self {
            donor: donation.donor.clone(),
            amount_avax: donation.amount_avax,
            amount_kes: donation.amount_kes,
            timestamp: donation.timestamp,
            transaction_hash: donation.transaction_hash.clone(),
        }
    }
}

/// Result of recording a donation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationResult {
    pub campaign_id: i64,
    pub donor: String,

    #[serde(rename = "amountKES")]
    pub amount_kes: i64,

    #[serde(rename = "amountAVAX")]
    pub amount_avax: Amount,

    pub timestamp: i64,
    pub transaction_hash: String,

    #[serde(rename = "totalDonationsKES")]
    pub total_donations_kes: i64,

    #[serde(rename = "totalDonationsAVAX")]
    pub total_donations_avax: Amount,

    pub donor_count: i32,
    pub goal_reached: bool,
    pub progress: f64,
}

impl From<&DonationReceipt> for DonationResult {
    fn from(receipt: &DonationReceipt) -> Self {
        let campaign = &receipt.campaign;
        let donation = &receipt.donation;
        Self {
            campaign_id: campaign.campaign_id,
            donor: donation.donor.clone(),
            amount_kes: donation.amount_kes,
            amount_avax: donation.amount_avax,
            timestamp: donation.timestamp,
            transaction_hash: donation.transaction_hash.clone(),
            total_donations_kes: campaign.total_donations_kes,
            total_donations_avax: campaign.total_donations_avax,
            donor_count: campaign.donor_count,
            goal_reached: campaign.goal_reached,
            progress: progress_percent(campaign.total_donations_kes, campaign.goal_kes),
        }
    }
}
