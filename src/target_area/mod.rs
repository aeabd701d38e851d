use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::campaign::CampaignId;
use crate::district::{District, DistrictId};
use crate::error::Error;
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type TargetAreaId = TypedId<TargetArea>;

pub const PRIORITY_MIN: i32 = 1;
pub const PRIORITY_MAX: i32 = 10;
pub const PRIORITY_DEFAULT: i32 = 5;

/// An advertiser-weighted assignment of a district to a campaign. The pair
/// (campaign_id, district_id) is unique; a compound index backs that up
/// against concurrent inserts.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TargetArea {
    #[serde(rename = "_id")]
    pub id: TargetAreaId,
    pub campaign_id: CampaignId,
    pub district_id: DistrictId,
    pub priority_level: i32,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl TypedIdMarker for TargetArea {
    fn tag() -> &'static str {
        "TGT"
    }
}

/// A target area joined with its district, as served back to callers.
#[derive(Clone, Debug)]
pub struct TargetAreaView {
    pub target_area: TargetArea,
    pub district: District,
}

pub fn validate_priority(priority_level: i32) -> Result<(), Error> {
    if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&priority_level) {
        return Err(Error::PriorityLevelOutOfRange { priority_level });
    }

    Ok(())
}
