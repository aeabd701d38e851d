use chrono::Utc;

use crate::database::Database;
use crate::error::Error;
use crate::identity::AdvertiserId;

use super::{Campaign, CampaignId};

#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: &dyn Database,
    advertiser_id: AdvertiserId,
    name: String,
) -> Result<Campaign, Error> {
    let now = Utc::now();
    let campaign = Campaign {
        id: CampaignId::new(),
        advertiser_id,
        name,
        created_at: now,
        modified_at: now,
    };

    db.campaigns().insert_campaign(&campaign).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns_by_advertiser(
    db: &dyn Database,
    advertiser_id: AdvertiserId,
) -> Result<Vec<Campaign>, Error> {
    let campaigns = db
        .campaigns()
        .fetch_campaigns_by_advertiser(advertiser_id)
        .await?;

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignDoesNotExist { campaign_id })?;

    Ok(campaign)
}

/// Resolves the campaign and verifies the requesting advertiser owns it.
/// Existence is checked before ownership; campaign ids are not secret.
#[tracing::instrument(skip(db))]
pub async fn assert_campaign_owned(
    db: &dyn Database,
    campaign_id: CampaignId,
    advertiser_id: AdvertiserId,
) -> Result<Campaign, Error> {
    let campaign = get_campaign_by_id(db, campaign_id).await?;

    if campaign.advertiser_id != advertiser_id {
        return Err(Error::CampaignNotOwnedByAdvertiser {
            campaign_id,
            advertiser_id,
        });
    }

    Ok(campaign)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::database::test::MockDatabase;

    #[tokio::test]
    async fn can_create_campaign() {
        let mut db = MockDatabase::new();
        let advertiser_id = AdvertiserId::new();
        let called_insert = Arc::new(Mutex::new(false));
        let called_insert_clone = Arc::clone(&called_insert);
        db.campaigns.on_insert_campaign = Box::new(move |campaign| {
            *called_insert_clone.lock().unwrap() = true;
            assert_eq!(campaign.name, "Summer Fleet Push".to_string());
            assert_eq!(campaign.created_at, campaign.modified_at);
            Ok(())
        });

        let campaign = create_campaign(&db, advertiser_id, "Summer Fleet Push".into())
            .await
            .unwrap();

        assert_eq!(campaign.advertiser_id, advertiser_id);
        assert_eq!(campaign.name, "Summer Fleet Push".to_string());
        assert!(
            *called_insert.lock().unwrap(),
            "db.insert_campaign was not called"
        );
    }

    #[tokio::test]
    async fn get_campaign_by_id_returns_error_if_doesnt_exist() {
        let mut db = MockDatabase::new();
        let test_campaign_id = CampaignId::new();
        db.campaigns.on_fetch_campaign_by_id = Box::new(move |campaign_id| {
            assert_eq!(campaign_id, test_campaign_id);
            Ok(None)
        });

        let result = get_campaign_by_id(&db, test_campaign_id).await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampaignDoesNotExist {
                campaign_id: test_campaign_id
            }
        );
    }

    #[tokio::test]
    async fn assert_campaign_owned_rejects_other_advertisers() {
        let mut db = MockDatabase::new();
        let test_campaign_id = CampaignId::new();
        let owner_id = AdvertiserId::new();
        let intruder_id = AdvertiserId::new();
        db.campaigns.on_fetch_campaign_by_id = Box::new(move |campaign_id| {
            let now = Utc::now();
            Ok(Some(Campaign {
                id: campaign_id,
                advertiser_id: owner_id,
                name: "Winter Wraps".to_string(),
                created_at: now,
                modified_at: now,
            }))
        });

        let result = assert_campaign_owned(&db, test_campaign_id, intruder_id).await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampaignNotOwnedByAdvertiser {
                campaign_id: test_campaign_id,
                advertiser_id: intruder_id,
            }
        );
    }

    #[tokio::test]
    async fn assert_campaign_owned_accepts_the_owner() {
        let mut db = MockDatabase::new();
        let test_campaign_id = CampaignId::new();
        let owner_id = AdvertiserId::new();
        db.campaigns.on_fetch_campaign_by_id = Box::new(move |campaign_id| {
            let now = Utc::now();
            Ok(Some(Campaign {
                id: campaign_id,
                advertiser_id: owner_id,
                name: "Winter Wraps".to_string(),
                created_at: now,
                modified_at: now,
            }))
        });

        let campaign = assert_campaign_owned(&db, test_campaign_id, owner_id)
            .await
            .unwrap();

        assert_eq!(campaign.id, test_campaign_id);
    }
}
