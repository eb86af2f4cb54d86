//! Campaign endpoints
//!
//! - `GET /api/campaigns` - List campaigns, newest first
//! - `GET /api/campaigns/:id` - Campaign with milestones and donations
//! - `POST /api/campaigns` - Create a campaign (bearer token)
//! - `POST /api/campaigns/:id/donate` - Record a donation (bearer token)
//!
//! Campaigns are addressed by their sequential public `campaignId`, not the
//! row UUID.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    response::ApiResponse,
};
use avafund_shared::{
    auth::middleware::AuthContext,
    ledger::{
        creation::{plan_campaign, CampaignDraft, MilestoneDraft},
        donation::prepare_donation,
        now_seconds,
        projection::{CampaignProjection, DonationResult, DonationView, MilestoneView},
    },
    store::StoreError,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

const CAMPAIGN_NOT_FOUND: &str = "Campaign not found";

/// Create campaign request
///
/// Amounts are whole KES; `deadline` is unix seconds.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[serde(rename = "goalKES")]
    pub goal_kes: i64,

    pub deadline: i64,

    #[validate(length(min = 1, message = "At least one milestone is required"))]
    pub milestones: Vec<MilestoneRequest>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MilestoneRequest {
    pub description: String,

    #[serde(rename = "amountKES")]
    pub amount_kes: i64,
}

/// Donation request
#[derive(Debug, Deserialize, Validate)]
pub struct DonateRequest {
    /// Donor wallet address
    #[validate(length(min = 1, max = 255, message = "Donor must be 1 to 255 characters"))]
    pub donor: String,

    #[serde(rename = "amountKES")]
    pub amount_kes: i64,
}

#[derive(Debug, Serialize)]
pub struct CampaignListResponse {
    pub campaigns: Vec<CampaignProjection>,
}

#[derive(Debug, Serialize)]
pub struct CampaignDetailResponse {
    pub campaign: CampaignProjection,
    pub milestones: Vec<MilestoneView>,
    pub donations: Vec<DonationView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignResponse {
    pub campaign_id: i64,
}

/// Parses a path segment as a public campaign ID
///
/// Anything other than a non-negative integer is `INVALID_ID`.
fn parse_campaign_id(raw: &str) -> ApiResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 0 => Ok(id),
        _ => Err(ApiError::InvalidId(format!("Invalid campaign ID: {}", raw))),
    }
}

/// List all campaigns
///
/// # Endpoint
///
/// ```text
/// GET /api/campaigns
/// ```
pub async fn list_campaigns(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<CampaignListResponse>> {
    let now = now_seconds();
    let campaigns = state
        .store
        .list_campaigns()
        .await?
        .iter()
        .map(|record| CampaignProjection::project(record, now))
        .collect();

    Ok(ApiResponse::ok(CampaignListResponse { campaigns }))
}

/// Get a campaign with its milestones and donations
///
/// # Endpoint
///
/// ```text
/// GET /api/campaigns/:id
/// ```
///
/// # Errors
///
/// - `400 INVALID_ID`: `id` is not a campaign ID
/// - `404 NOT_FOUND`: no campaign has that ID
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<CampaignDetailResponse>> {
    let campaign_id = parse_campaign_id(&id)?;

    let detail = state
        .store
        .find_campaign(campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(CAMPAIGN_NOT_FOUND.to_string()))?;

    Ok(ApiResponse::ok(CampaignDetailResponse {
        campaign: CampaignProjection::project(&detail.campaign, now_seconds()),
        milestones: detail.milestones.iter().map(MilestoneView::from).collect(),
        donations: detail.donations.iter().map(DonationView::from).collect(),
    }))
}

/// Create a campaign owned by the authenticated user
///
/// The configured KES per AVAX rate is fixed onto the campaign; every AVAX
/// figure of the campaign is derived from it from now on.
///
/// # Endpoint
///
/// ```text
/// POST /api/campaigns
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "title": "Clean water for Kibera",
///   "description": "Two boreholes and a storage tank",
///   "goalKES": 1000,
///   "deadline": 1767225600,
///   "milestones": [
///     { "description": "Drill borehole", "amountKES": 600 },
///     { "description": "Install tank", "amountKES": 400 }
///   ]
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// { "success": true, "data": { "campaignId": 0 } }
/// ```
///
/// # Errors
///
/// - `400 VALIDATION_ERROR`: missing fields, non-positive amounts, a past
///   deadline, or milestones that do not sum to the goal
pub async fn create_campaign(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateCampaignRequest>,
) -> ApiResult<(StatusCode, ApiResponse<CreateCampaignResponse>)> {
    let draft = CampaignDraft {
        title: req.title,
        description: req.description,
        goal_kes: req.goal_kes,
        deadline: req.deadline,
        milestones: req
            .milestones
            .into_iter()
            .map(|milestone| MilestoneDraft {
                description: milestone.description,
                amount_kes: milestone.amount_kes,
            })
            .collect(),
    };

    let new_campaign = plan_campaign(
        auth.user_id,
        draft,
        state.config.pricing.fallback_kes_per_avax,
        now_seconds(),
    )?;

    let campaign = state
        .store
        .create_campaign(new_campaign)
        .await
        .map_err(|err| match err {
            // The token outlived its user
            StoreError::NotFound => ApiError::Unauthorized("User no longer exists".to_string()),
            other => other.into(),
        })?;

    tracing::info!(
        campaign_id = campaign.campaign_id,
        creator_id = %auth.user_id,
        goal_kes = campaign.goal_kes,
        "Campaign created"
    );

    Ok(ApiResponse::created(CreateCampaignResponse {
        campaign_id: campaign.campaign_id,
    }))
}

/// Record a donation to a campaign
///
/// # Endpoint
///
/// ```text
/// POST /api/campaigns/:id/donate
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "donor": "0x52908400098527886E0F7030069857D2E4169EE7", "amountKES": 500 }
/// ```
///
/// # Errors
///
/// - `400 INVALID_ID`: `id` is not a campaign ID
/// - `400 VALIDATION_ERROR`: blank donor or non-positive amount
/// - `404 NOT_FOUND`: no campaign has that ID
pub async fn donate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<DonateRequest>,
) -> ApiResult<ApiResponse<DonationResult>> {
    let campaign_id = parse_campaign_id(&id)?;
    let pending = prepare_donation(campaign_id, &req.donor, req.amount_kes, now_seconds())?;

    let receipt = state
        .store
        .record_donation(campaign_id, pending)
        .await
        .map_err(|err| match err {
            StoreError::NotFound => ApiError::NotFound(CAMPAIGN_NOT_FOUND.to_string()),
            other => other.into(),
        })?;

    tracing::info!(
        campaign_id,
        amount_kes = receipt.donation.amount_kes,
        total_donations_kes = receipt.campaign.total_donations_kes,
        goal_reached = receipt.campaign.goal_reached,
        "Donation recorded"
    );

    Ok(ApiResponse::ok(DonationResult::from(&receipt)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_campaign_id() {
        assert_eq!(parse_campaign_id("0").unwrap(), 0);
        assert_eq!(parse_campaign_id("42").unwrap(), 42);

        for raw in ["abc", "-1", "1.5", ""] {
            assert!(matches!(parse_campaign_id(raw), Err(ApiError::InvalidId(_))));
        }
    }

    #[test]
    fn test_create_request_wire_names() {
        let req: CreateCampaignRequest = serde_json::from_value(serde_json::json!({
            "title": "Clean water",
            "description": "Boreholes",
            "goalKES": 1000,
            "deadline": 1_900_000_000,
            "milestones": [{ "description": "Drill", "amountKES": 1000 }],
        }))
        .unwrap();

        assert_eq!(req.goal_kes, 1000);
        assert_eq!(req.milestones[0].amount_kes, 1000);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_length_limits_match_columns() {
        let req = CreateCampaignRequest {
            title: "t".repeat(201),
            description: "Boreholes".to_string(),
            goal_kes: 1000,
            deadline: 1_900_000_000,
            milestones: vec![MilestoneRequest {
                description: "Drill".to_string(),
                amount_kes: 1000,
            }],
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));

        let donate = DonateRequest {
            donor: "d".repeat(256),
            amount_kes: 100,
        };
        assert!(donate.validate().is_err());

        let donate = DonateRequest {
            donor: "d".repeat(255),
            amount_kes: 100,
        };
        assert!(donate.validate().is_ok());
    }

    #[test]
    fn test_create_request_requires_milestones() {
        let req = CreateCampaignRequest {
            title: "Clean water".to_string(),
            description: "Boreholes".to_string(),
            goal_kes: 1000,
            deadline: 1_900_000_000,
            milestones: vec![],
        };
        assert!(req.validate().is_err());
    }
}
