use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson;

use crate::database::MongoDistrictStore;
use crate::error::Error;

use super::{District, DistrictFilter, DistrictId};

#[async_trait]
pub trait DistrictStore {
    async fn insert_district(&self, district: &District) -> Result<(), Error>;

    async fn fetch_districts(&self, filter: &DistrictFilter) -> Result<Vec<District>, Error>;

    async fn fetch_district_by_id(
        &self,
        district_id: DistrictId,
    ) -> Result<Option<District>, Error>;
}

#[async_trait]
impl DistrictStore for MongoDistrictStore {
    #[tracing::instrument(skip(self))]
    async fn insert_district(&self, district: &District) -> Result<(), Error> {
        self.insert_one(district, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_districts(&self, filter: &DistrictFilter) -> Result<Vec<District>, Error> {
        let mut query = bson::Document::new();
        if let Some(city) = &filter.city {
            query.insert("city", city);
        }
        if let Some(region) = &filter.region {
            query.insert("region", region);
        }
        if let Some(active) = filter.active {
            query.insert("is_active", active);
        }

        let districts: Vec<District> = self.find(query, None).await?.try_collect().await?;

        Ok(districts)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_district_by_id(
        &self,
        district_id: DistrictId,
    ) -> Result<Option<District>, Error> {
        let district: Option<District> =
            self.find_one(bson::doc! { "_id": district_id }, None).await?;

        Ok(district)
    }
}
