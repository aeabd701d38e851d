use async_trait::async_trait;
use mongodb::bson;
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};

use crate::campaign::db::CampaignStore;
use crate::campaign::Campaign;
use crate::district::db::DistrictStore;
use crate::district::District;
use crate::error::Error;
use crate::target_area::db::TargetAreaStore;
use crate::target_area::TargetArea;

pub type MongoCampaignStore = Collection<Campaign>;
pub type MongoDistrictStore = Collection<District>;
pub type MongoTargetAreaStore = Collection<TargetArea>;

/// Storage facade handed to the managers. Managers only ever see this trait,
/// so they can be exercised against [`test::MockDatabase`].
#[async_trait]
pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;
    fn districts(&self) -> &dyn DistrictStore;
    fn target_areas(&self) -> &dyn TargetAreaStore;

    async fn drop(&self) -> Result<(), Error>;
}

#[derive(Clone, Debug)]
pub struct MongoDatabase {
    campaigns: Collection<Campaign>,
    districts: Collection<District>,
    target_areas: Collection<TargetArea>,
    db: mongodb::Database,
}

impl MongoDatabase {
    pub fn new(db: mongodb::Database) -> MongoDatabase {
        MongoDatabase {
            campaigns: db.collection("campaigns"),
            districts: db.collection("districts"),
            target_areas: db.collection("target_areas"),
            db,
        }
    }

    /// Creates the unique (campaign_id, district_id) index that backstops the
    /// duplicate-target-area check against concurrent inserts. Run after any
    /// seeding that drops the database.
    pub async fn create_indexes(&self) -> Result<(), Error> {
        let index = IndexModel::builder()
            .keys(bson::doc! { "campaign_id": 1, "district_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.target_areas.create_index(index, None).await?;

        Ok(())
    }
}

#[async_trait]
impl Database for MongoDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    fn districts(&self) -> &dyn DistrictStore {
        &self.districts
    }

    fn target_areas(&self) -> &dyn TargetAreaStore {
        &self.target_areas
    }

    async fn drop(&self) -> Result<(), Error> {
        self.db.drop(None).await?;
        Ok(())
    }
}
