//! Ledger behaviour through the in-memory store
//!
//! Exercises the full create-campaign / donate / read-back cycle the API
//! performs, without a database.

use std::sync::Arc;

use avafund_shared::{
    ledger::{
        amount::Amount,
        creation::{plan_campaign, CampaignDraft, MilestoneDraft},
        donation::prepare_donation,
        projection::{CampaignProjection, DonationResult},
    },
    models::user::CreateUser,
    store::{InMemoryStore, LedgerStore, StoreError},
};
use uuid::Uuid;

const NOW: i64 = 1_760_000_000;

async fn store_with_creator() -> (Arc<dyn LedgerStore>, Uuid) {
    let store: Arc<dyn LedgerStore> = Arc::new(InMemoryStore::new());
    let user = store
        .create_user(CreateUser {
            name: "Achieng Odhiambo".to_string(),
            email: "achieng@example.com".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            wallet_address: "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01".to_string(),
        })
        .await
        .unwrap();
    (store, user.id)
}

fn draft(goal_kes: i64, milestones: &[(&str, i64)]) -> CampaignDraft {
    CampaignDraft {
        title: "School desks".to_string(),
        description: "Forty desks for Standard 4".to_string(),
        goal_kes,
        deadline: NOW + 14 * 86_400,
        milestones: milestones
            .iter()
            .map(|(description, amount_kes)| MilestoneDraft {
                description: description.to_string(),
                amount_kes: *amount_kes,
            })
            .collect(),
    }
}

#[tokio::test]
async fn test_campaign_lifecycle() {
    let (store, creator) = store_with_creator().await;
    let rate = Amount::from_whole(146_500);

    let draft = draft(1000, &[("Timber", 600), ("Labour", 400)]);
    let plan = plan_campaign(creator, draft, rate, NOW).unwrap();
    let created = store.create_campaign(plan).await.unwrap();
    assert_eq!(created.campaign_id, 0);
    assert_eq!(created.goal_avax.to_string(), "0.006825938567");
    assert_eq!(created.milestones_count, 2);

    let pending = prepare_donation(0, "0xDonorOne", 600, NOW + 10).unwrap();
    let receipt = store.record_donation(0, pending).await.unwrap();
    let result = DonationResult::from(&receipt);
    assert_eq!(result.total_donations_kes, 600);
    assert_eq!(result.donor_count, 1);
    assert!(!result.goal_reached);
    assert_eq!(result.progress, 60.0);

    // Same donor, different case: donor count unchanged
    let pending = prepare_donation(0, "0xdonorone", 400, NOW + 20).unwrap();
    let receipt = store.record_donation(0, pending).await.unwrap();
    assert_eq!(receipt.campaign.donor_count, 1);
    assert!(receipt.campaign.goal_reached);
    assert_eq!(receipt.campaign.total_donations_kes, 1000);

    let detail = store.find_campaign(0).await.unwrap().unwrap();
    assert_eq!(detail.milestones.len(), 2);
    assert_eq!(detail.milestones[0].index, 0);
    assert_eq!(detail.milestones[0].description, "Timber");
    assert_eq!(detail.donations.len(), 2);
    assert_eq!(detail.donations[0].timestamp, NOW + 20);

    let projection = CampaignProjection::project(&detail.campaign, NOW + 30);
    assert_eq!(projection.creator_name, "Achieng Odhiambo");
    assert_eq!(projection.progress, 100.0);
    assert!(projection.goal_reached);
    assert_eq!(projection.donor_count, 1);
    assert_eq!(
        projection.total_donations_avax,
        receipt.campaign.total_donations_avax
    );
}

#[tokio::test]
async fn test_rate_is_fixed_per_campaign() {
    let (store, creator) = store_with_creator().await;

    let single = || draft(1000, &[("All", 1000)]);
    let first = plan_campaign(creator, single(), Amount::from_whole(146_500), NOW).unwrap();
    let second = plan_campaign(creator, single(), Amount::from_whole(100_000), NOW).unwrap();
    store.create_campaign(first).await.unwrap();
    store.create_campaign(second).await.unwrap();

    let a = store
        .record_donation(0, prepare_donation(0, "0xd", 1000, NOW).unwrap())
        .await
        .unwrap();
    let b = store
        .record_donation(1, prepare_donation(1, "0xd", 1000, NOW).unwrap())
        .await
        .unwrap();

    assert_eq!(a.donation.amount_avax.to_string(), "0.006825938567");
    assert_eq!(b.donation.amount_avax.to_string(), "0.010000000000");
}

#[tokio::test]
async fn test_unknown_campaign_and_creator() {
    let (store, _) = store_with_creator().await;

    assert!(store.find_campaign(42).await.unwrap().is_none());

    let rate = Amount::from_whole(146_500);
    let plan = plan_campaign(Uuid::new_v4(), draft(500, &[("All", 500)]), rate, NOW).unwrap();
    assert!(matches!(store.create_campaign(plan).await, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn test_backend_reports_memory() {
    let (store, _) = store_with_creator().await;
    assert_eq!(store.backend(), "memory");
    assert!(store.ping().await.is_ok());
}
