use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type DistrictId = TypedId<District>;

/// A named geographic region owned by the platform. The polygon is held as
/// canonical text and only crosses the API boundary through the codec.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct District {
    #[serde(rename = "_id")]
    pub id: DistrictId,
    pub name: String,
    pub city: String,
    pub region: String,
    pub population: i64,
    pub area_km2: f64,
    pub is_active: bool,
    pub polygon: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl TypedIdMarker for District {
    fn tag() -> &'static str {
        "DST"
    }
}

/// Typed filter options for district listing; absent fields do not constrain
/// the result set.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DistrictFilter {
    pub city: Option<String>,
    pub region: Option<String>,
    pub active: Option<bool>,
}

/// Read-only per-city aggregate over active districts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CityAggregate {
    pub city: String,
    pub district_count: usize,
    pub total_population: i64,
    pub total_area_km2: f64,
}
