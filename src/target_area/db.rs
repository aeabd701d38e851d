use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson;
use mongodb::error::{ErrorKind, WriteFailure};

use crate::campaign::CampaignId;
use crate::database::MongoTargetAreaStore;
use crate::district::DistrictId;
use crate::error::Error;

use super::{TargetArea, TargetAreaId};

// mongodb duplicate-key write error
const DUPLICATE_KEY_CODE: i32 = 11000;

#[async_trait]
pub trait TargetAreaStore {
    async fn insert_target_area(&self, target_area: &TargetArea) -> Result<(), Error>;

    async fn fetch_target_areas_by_campaign(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<TargetArea>, Error>;

    async fn fetch_target_area_by_id(
        &self,
        target_area_id: TargetAreaId,
    ) -> Result<Option<TargetArea>, Error>;

    async fn fetch_target_area_by_campaign_and_district(
        &self,
        campaign_id: CampaignId,
        district_id: DistrictId,
    ) -> Result<Option<TargetArea>, Error>;

    async fn update_target_area_priority(
        &self,
        target_area_id: TargetAreaId,
        priority_level: i32,
    ) -> Result<(), Error>;

    async fn delete_target_area(&self, target_area_id: TargetAreaId) -> Result<(), Error>;
}

#[async_trait]
impl TargetAreaStore for MongoTargetAreaStore {
    #[tracing::instrument(skip(self))]
    async fn insert_target_area(&self, target_area: &TargetArea) -> Result<(), Error> {
        // the unique (campaign_id, district_id) index is the backstop for
        // concurrent identical inserts; its violation is not a generic failure
        match self.insert_one(target_area, None).await {
            Ok(_) => Ok(()),
            Err(error) => {
                if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = &*error.kind {
                    if write_error.code == DUPLICATE_KEY_CODE {
                        return Err(Error::TargetAreaAlreadyExists {
                            campaign_id: target_area.campaign_id,
                            district_id: target_area.district_id,
                        });
                    }
                }
                Err(error.into())
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_target_areas_by_campaign(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<TargetArea>, Error> {
        let target_areas: Vec<TargetArea> = self
            .find(bson::doc! { "campaign_id": campaign_id }, None)
            .await?
            .try_collect()
            .await?;

        Ok(target_areas)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_target_area_by_id(
        &self,
        target_area_id: TargetAreaId,
    ) -> Result<Option<TargetArea>, Error> {
        let target_area: Option<TargetArea> = self
            .find_one(bson::doc! { "_id": target_area_id }, None)
            .await?;

        Ok(target_area)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_target_area_by_campaign_and_district(
        &self,
        campaign_id: CampaignId,
        district_id: DistrictId,
    ) -> Result<Option<TargetArea>, Error> {
        let target_area: Option<TargetArea> = self
            .find_one(
                bson::doc! { "campaign_id": campaign_id, "district_id": district_id },
                None,
            )
            .await?;

        Ok(target_area)
    }

    #[tracing::instrument(skip(self))]
    async fn update_target_area_priority(
        &self,
        target_area_id: TargetAreaId,
        priority_level: i32,
    ) -> Result<(), Error> {
        let result = self
            .update_one(
                bson::doc! { "_id": target_area_id },
                bson::doc! { "$set": { "priority_level": priority_level } },
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(Error::TargetAreaDoesNotExist { target_area_id });
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_target_area(&self, target_area_id: TargetAreaId) -> Result<(), Error> {
        self.delete_one(bson::doc! { "_id": target_area_id }, None)
            .await?;

        Ok(())
    }
}
