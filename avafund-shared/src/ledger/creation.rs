//! Campaign creation
//!
//! Turns a creator's draft into a [`NewCampaign`] ready for the store:
//! validates the draft, fixes the conversion rate at this instant and
//! derives every AVAX figure from it. The rate is never revisited later.

use uuid::Uuid;

use super::{
    amount::{kes_to_avax, Amount},
    LedgerError,
};
use crate::models::{campaign::NewCampaign, milestone::NewMilestone};

/// Allowed gap between the milestone sum and the goal, in KES
pub const MILESTONE_SUM_TOLERANCE_KES: i64 = 1;

/// A campaign as submitted by its creator
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignDraft {
    pub title: String,
    pub description: String,
    pub goal_kes: i64,

    /// Unix seconds
    pub deadline: i64,

    /// In campaign order
    pub milestones: Vec<MilestoneDraft>,
}

/// A milestone as submitted by the campaign creator
#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneDraft {
    pub description: String,
    pub amount_kes: i64,
}

/// Validates a draft and prices it at `rate` KES per AVAX
///
/// # Rules
///
/// - title and description are non-blank
/// - goal is positive and the deadline is after `now`
/// - at least one milestone, each with a description and a positive amount
/// - milestone amounts sum to the goal within [`MILESTONE_SUM_TOLERANCE_KES`]
///
/// # Errors
///
/// Returns [`LedgerError::Invalid`] naming the first field that breaks a
/// rule, or [`LedgerError::Amount`] if the conversion fails.
pub fn plan_campaign(
    creator_id: Uuid,
    draft: CampaignDraft,
    rate: Amount,
    now: i64,
) -> Result<NewCampaign, LedgerError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(LedgerError::invalid("title", "Title is required"));
    }

    let description = draft.description.trim();
    if description.is_empty() {
        return Err(LedgerError::invalid("description", "Description is required"));
    }

    if draft.goal_kes <= 0 {
        return Err(LedgerError::invalid("goalKES", "Goal must be greater than zero"));
    }

    if draft.deadline <= now {
        return Err(LedgerError::invalid("deadline", "Deadline must be in the future"));
    }

    if draft.milestones.is_empty() {
        return Err(LedgerError::invalid(
            "milestones",
            "At least one milestone is required",
        ));
    }

    let mut milestone_sum: i128 = 0;
    for (index, milestone) in draft.milestones.iter().enumerate() {
        if milestone.description.trim().is_empty() {
            return Err(LedgerError::invalid(
                &format!("milestones[{}].description", index),
                "Milestone description is required",
            ));
        }
        if milestone.amount_kes <= 0 {
            return Err(LedgerError::invalid(
                &format!("milestones[{}].amountKES", index),
                "Milestone amount must be greater than zero",
            ));
        }
        milestone_sum += i128::from(milestone.amount_kes);
    }

    let gap = (milestone_sum - i128::from(draft.goal_kes)).abs();
    if gap > i128::from(MILESTONE_SUM_TOLERANCE_KES) {
        return Err(LedgerError::invalid(
            "milestones",
            format!(
                "Milestone amounts sum to {} KES but the goal is {} KES",
                milestone_sum, draft.goal_kes
            ),
        ));
    }

    let goal_avax = kes_to_avax(draft.goal_kes, rate)?;
    let milestones = draft
        .milestones
        .iter()
        .map(|milestone| {
            Ok(NewMilestone {
                description: milestone.description.trim().to_string(),
                amount_kes: milestone.amount_kes,
                amount_avax: kes_to_avax(milestone.amount_kes, rate)?,
            })
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    Ok(NewCampaign {
        creator_id,
        title: title.to_string(),
        description: description.to_string(),
        goal_kes: draft.goal_kes,
        goal_avax,
        conversion_rate: rate,
        conversion_timestamp: now,
        deadline: draft.deadline,
        milestones,
    })
}

/// Next public campaign ID: max(existing) + 1, or 0 for the first campaign
pub fn next_campaign_id(current_max: Option<i64>) -> i64 {
    current_max.map_or(0, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::amount::AmountError;

    const NOW: i64 = 1_760_000_000;

    fn rate() -> Amount {
        Amount::from_whole(146_500)
    }

    fn draft(goal_kes: i64, amounts: &[i64]) -> CampaignDraft {
        CampaignDraft {
            title: "Borehole for Kibera school".to_string(),
            description: "Clean water for 400 pupils".to_string(),
            goal_kes,
            deadline: NOW + 30 * 86_400,
            milestones: amounts
                .iter()
                .enumerate()
                .map(|(i, amount)| MilestoneDraft {
                    description: format!("Phase {}", i + 1),
                    amount_kes: *amount,
                })
                .collect(),
        }
    }

    fn invalid_field(err: LedgerError) -> String {
        match err {
            LedgerError::Invalid { field, .. } => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_fixes_rate_and_derives_avax() {
        let creator = Uuid::new_v4();
        let plan = plan_campaign(creator, draft(1000, &[600, 400]), rate(), NOW).unwrap();

        assert_eq!(plan.creator_id, creator);
        assert_eq!(plan.goal_avax.to_string(), "0.006825938567");
        assert_eq!(plan.conversion_rate, rate());
        assert_eq!(plan.conversion_timestamp, NOW);
        assert_eq!(plan.milestones.len(), 2);
        assert_eq!(plan.milestones[0].description, "Phase 1");
        assert_eq!(plan.milestones[0].amount_kes, 600);
        assert_eq!(plan.milestones[0].amount_avax.to_string(), "0.004095563140");
        assert_eq!(plan.milestones[1].amount_avax.to_string(), "0.002730375427");
    }

    #[test]
    fn test_milestone_sum_within_one_kes_is_accepted() {
        assert!(plan_campaign(Uuid::new_v4(), draft(1000, &[333, 333, 333]), rate(), NOW).is_ok());
        assert!(plan_campaign(Uuid::new_v4(), draft(1000, &[500, 501]), rate(), NOW).is_ok());
    }

    #[test]
    fn test_milestone_sum_mismatch_is_rejected() {
        let err = plan_campaign(Uuid::new_v4(), draft(1000, &[500, 498]), rate(), NOW).unwrap_err();
        assert_eq!(invalid_field(err), "milestones");

        let err = plan_campaign(Uuid::new_v4(), draft(1000, &[500, 502]), rate(), NOW).unwrap_err();
        assert_eq!(invalid_field(err), "milestones");
    }

    #[test]
    fn test_empty_milestones_rejected() {
        let err = plan_campaign(Uuid::new_v4(), draft(1000, &[]), rate(), NOW).unwrap_err();
        assert_eq!(invalid_field(err), "milestones");
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut blank_title = draft(1000, &[1000]);
        blank_title.title = "   ".to_string();
        let err = plan_campaign(Uuid::new_v4(), blank_title, rate(), NOW).unwrap_err();
        assert_eq!(invalid_field(err), "title");

        let mut blank_description = draft(1000, &[1000]);
        blank_description.description = String::new();
        let err = plan_campaign(Uuid::new_v4(), blank_description, rate(), NOW).unwrap_err();
        assert_eq!(invalid_field(err), "description");

        let mut blank_milestone = draft(1000, &[1000]);
        blank_milestone.milestones[0].description = " ".to_string();
        let err = plan_campaign(Uuid::new_v4(), blank_milestone, rate(), NOW).unwrap_err();
        assert_eq!(invalid_field(err), "milestones[0].description");
    }

    #[test]
    fn test_goal_and_deadline_rules() {
        let err = plan_campaign(Uuid::new_v4(), draft(0, &[0]), rate(), NOW).unwrap_err();
        assert_eq!(invalid_field(err), "goalKES");

        let mut past = draft(1000, &[1000]);
        past.deadline = NOW;
        let err = plan_campaign(Uuid::new_v4(), past, rate(), NOW).unwrap_err();
        assert_eq!(invalid_field(err), "deadline");

        let err =
            plan_campaign(Uuid::new_v4(), draft(1000, &[1200, -200]), rate(), NOW).unwrap_err();
        assert_eq!(invalid_field(err), "milestones[1].amountKES");
    }

    #[test]
    fn test_zero_rate_is_an_amount_error() {
        let err =
            plan_campaign(Uuid::new_v4(), draft(1000, &[1000]), Amount::ZERO, NOW).unwrap_err();
        assert_eq!(err, LedgerError::Amount(AmountError::NonPositiveRate));
    }

    #[test]
    fn test_next_campaign_id() {
        assert_eq!(next_campaign_id(None), 0);
        assert_eq!(next_campaign_id(Some(0)), 1);
        assert_eq!(next_campaign_id(Some(41)), 42);
    }
}
