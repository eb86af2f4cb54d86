//! Donation recording
//!
//! Recording a donation is a read-modify-write of campaign totals:
//!
//! ```text
//! prepare_donation ──> (store locks campaign) ──> apply_donation ──> store writes
//!   validate input       read prior totals +        new Donation +
//!   stamp time + hash    "has donated before?"      new totals
//! ```
//!
//! [`apply_donation`] only sees state handed to it by the store, so the
//! store decides what "a single consistent read" means (a row lock in
//! Postgres, a write lock in memory).

use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::{
    amount::{kes_to_avax, Amount, AmountError},
    LedgerError,
};
use crate::models::{
    campaign::Campaign,
    donation::{Donation, NewDonation},
};

/// A validated donation waiting to be applied to a campaign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDonation {
    /// Trimmed donor address
    pub donor: String,

    pub amount_kes: i64,

    /// Unix seconds
    pub timestamp: i64,

    /// Placeholder transaction identifier
    pub transaction_hash: String,
}

/// Campaign totals after a donation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignTotals {
    pub total_donations_kes: i64,
    pub total_donations_avax: Amount,
    pub donor_count: i32,
    pub goal_reached: bool,
}

/// Everything a store must write for one donation
#[derive(Debug, Clone, PartialEq)]
pub struct DonationOutcome {
    pub donation: NewDonation,
    pub totals: CampaignTotals,
}

/// What a store returns after recording a donation
#[derive(Debug, Clone, PartialEq)]
pub struct DonationReceipt {
    /// The appended donation
    pub donation: Donation,

    /// The campaign with its updated totals
    pub campaign: Campaign,
}

/// Validates donation input and stamps it
///
/// # Errors
///
/// Returns [`LedgerError::Invalid`] if the donor is blank or the amount is
/// not positive.
pub fn prepare_donation(
    campaign_id: i64,
    donor: &str,
    amount_kes: i64,
    now: i64,
) -> Result<PendingDonation, LedgerError> {
    let donor = donor.trim();
    if donor.is_empty() {
        return Err(LedgerError::invalid("donor", "Donor address is required"));
    }

    if amount_kes <= 0 {
        return Err(LedgerError::invalid(
            "amountKES",
            "Donation amount must be greater than zero",
        ));
    }

    Ok(PendingDonation {
        donor: donor.to_string(),
        amount_kes,
        timestamp: now,
        transaction_hash: placeholder_transaction_hash(campaign_id, donor, amount_kes, now),
    })
}

/// Applies a pending donation to the campaign's prior state
///
/// `donor_is_new` must be true only when the campaign has no earlier
/// donation from the same address (compare with [`same_donor`]).
///
/// # Errors
///
/// Returns [`LedgerError::Amount`] if a running total overflows.
pub fn apply_donation(
    campaign: &Campaign,
    pending: &PendingDonation,
    donor_is_new: bool,
) -> Result<DonationOutcome, LedgerError> {
    let amount_avax = kes_to_avax(pending.amount_kes, campaign.conversion_rate)?;

    let total_donations_kes = campaign
        .total_donations_kes
        .checked_add(pending.amount_kes)
        .ok_or(AmountError::Overflow)?;
    let total_donations_avax = campaign.total_donations_avax.checked_add(amount_avax)?;

    let donor_count = if donor_is_new {
        campaign.donor_count.saturating_add(1)
    } else {
        campaign.donor_count
    };

    let goal_reached = campaign.goal_reached || total_donations_kes >= campaign.goal_kes;

    Ok(DonationOutcome {
        donation: NewDonation {
            campaign_ref: campaign.id,
            donor: pending.donor.clone(),
            amount_kes: pending.amount_kes,
            amount_avax,
            timestamp: pending.timestamp,
            transaction_hash: pending.transaction_hash.clone(),
        },
        totals: CampaignTotals {
            total_donations_kes,
            total_donations_avax,
            donor_count,
            goal_reached,
        },
    })
}

/// Donor addresses match ignoring surrounding whitespace and letter case
///
/// Case folding is Unicode lowercasing, the same rule as Postgres `LOWER()`.
pub fn same_donor(a: &str, b: &str) -> bool {
    fold_case(a.trim()) == fold_case(b.trim())
}

/// Lowercases for case-insensitive comparison of donors and emails
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Builds a `0x`-prefixed, 64 hex digit stand-in for an on-chain hash
///
/// Stub until donations settle on chain: a SHA-256 over the donation
/// fields and a random nonce. It identifies nothing outside this service.
pub fn placeholder_transaction_hash(
    campaign_id: i64,
    donor: &str,
    amount_kes: i64,
    timestamp: i64,
) -> String {
    let nonce: u64 = rand::thread_rng().gen();

    let mut hasher = Sha256::new();
    hasher.update(campaign_id.to_be_bytes());
    hasher.update(donor.as_bytes());
    hasher.update(amount_kes.to_be_bytes());
    hasher.update(timestamp.to_be_bytes());
    hasher.update(nonce.to_be_bytes());

    format!("0x{}", hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    const NOW: i64 = 1_760_000_000;

    fn campaign(goal_kes: i64, total_kes: i64, donor_count: i32) -> Campaign {
        let rate = Amount::from_whole(146_500);
        Campaign {
            id: Uuid::new_v4(),
            campaign_id: 3,
            creator_id: Uuid::new_v4(),
            title: "Maize mill".to_string(),
            description: "Community maize mill".to_string(),
            goal_kes,
            goal_avax: kes_to_avax(goal_kes, rate).unwrap(),
            conversion_rate: rate,
            conversion_timestamp: NOW - 86_400,
            deadline: NOW + 86_400,
            total_donations_kes: total_kes,
            total_donations_avax: kes_to_avax(total_kes, rate).unwrap(),
            donor_count,
            goal_reached: total_kes >= goal_kes,
            finalized: false,
            milestones_count: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_prepare_rejects_bad_input() {
        let err = prepare_donation(0, "   ", 100, NOW).unwrap_err();
        assert!(matches!(err, LedgerError::Invalid { ref field, .. } if field == "donor"));

        let err = prepare_donation(0, "0xabc", 0, NOW).unwrap_err();
        assert!(matches!(err, LedgerError::Invalid { ref field, .. } if field == "amountKES"));

        let err = prepare_donation(0, "0xabc", -5, NOW).unwrap_err();
        assert!(matches!(err, LedgerError::Invalid { ref field, .. } if field == "amountKES"));
    }

    #[test]
    fn test_prepare_trims_and_stamps() {
        let pending = prepare_donation(7, "  0xAbC  ", 250, NOW).unwrap();
        assert_eq!(pending.donor, "0xAbC");
        assert_eq!(pending.amount_kes, 250);
        assert_eq!(pending.timestamp, NOW);
        assert!(pending.transaction_hash.starts_with("0x"));
        assert_eq!(pending.transaction_hash.len(), 66);
    }

    #[test]
    fn test_donation_crossing_goal() {
        let campaign = campaign(1000, 600, 2);
        assert!(!campaign.goal_reached);

        let pending = prepare_donation(3, "0xdonor", 500, NOW).unwrap();
        let outcome = apply_donation(&campaign, &pending, true).unwrap();

        assert_eq!(outcome.totals.total_donations_kes, 1100);
        assert!(outcome.totals.goal_reached);
        assert_eq!(outcome.totals.donor_count, 3);
        assert_eq!(outcome.donation.campaign_ref, campaign.id);
        assert_eq!(outcome.donation.amount_avax.to_string(), "0.003412969283");
        assert_eq!(
            outcome.totals.total_donations_avax,
            campaign
                .total_donations_avax
                .checked_add(outcome.donation.amount_avax)
                .unwrap()
        );
    }

    #[test]
    fn test_goal_reached_exactly_at_goal() {
        let campaign = campaign(1000, 999, 1);
        let pending = prepare_donation(3, "0xdonor", 1, NOW).unwrap();
        let outcome = apply_donation(&campaign, &pending, false).unwrap();
        assert!(outcome.totals.goal_reached);

        let campaign = self::campaign(1000, 998, 1);
        let outcome = apply_donation(&campaign, &pending, false).unwrap();
        assert!(!outcome.totals.goal_reached);
    }

    #[test]
    fn test_goal_reached_never_reverts() {
        let mut campaign = campaign(1000, 0, 0);
        // Latched flag survives even if the stored total were below the goal
        campaign.goal_reached = true;
        let pending = prepare_donation(3, "0xdonor", 1, NOW).unwrap();
        let outcome = apply_donation(&campaign, &pending, true).unwrap();
        assert!(outcome.totals.goal_reached);
    }

    #[test]
    fn test_repeat_donor_does_not_increment_count() {
        let campaign = campaign(1000, 100, 4);
        let pending = prepare_donation(3, "0xdonor", 10, NOW).unwrap();
        let outcome = apply_donation(&campaign, &pending, false).unwrap();
        assert_eq!(outcome.totals.donor_count, 4);
    }

    #[test]
    fn test_total_overflow_is_reported() {
        let mut campaign = campaign(1000, 0, 0);
        campaign.total_donations_kes = i64::MAX;
        let pending = prepare_donation(3, "0xdonor", 1, NOW).unwrap();
        assert!(matches!(
            apply_donation(&campaign, &pending, true),
            Err(LedgerError::Amount(_))
        ));
    }

    #[test]
    fn test_same_donor_ignores_case() {
        assert!(same_donor("0xABCdef", "0xabcDEF"));
        assert!(same_donor(" 0xabc", "0xABC "));
        assert!(!same_donor("0xabc", "0xabd"));
    }

    #[test]
    fn test_same_donor_folds_non_ascii() {
        assert!(same_donor("ÄLVSJÖ", "älvsjö"));
        assert!(same_donor("Ωmega", "ωMEGA"));
    }

    #[test]
    fn test_placeholder_hashes_differ() {
        let a = placeholder_transaction_hash(1, "0xabc", 100, NOW);
        let b = placeholder_transaction_hash(1, "0xabc", 100, NOW);
        assert_ne!(a, b);
        assert!(a[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
