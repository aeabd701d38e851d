use actix_web::web::{Data, Json, Path, Query};
use actix_web::{get, post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::MongoDatabase;
use crate::error::Error;
use crate::geometry::codec;
use crate::geometry::{CoordinatePair, GeoJsonPolygon};

use super::{manager, CityAggregate, District, DistrictFilter, DistrictId};

#[derive(Clone, Debug, Serialize)]
pub struct DistrictBody {
    pub id: DistrictId,
    pub name: String,
    pub city: String,
    pub region: String,
    pub population: i64,
    pub area_km2: f64,
    pub is_active: bool,
    pub coordinates: Vec<CoordinatePair>,
    pub geo_json: GeoJsonPolygon,
    pub created_at: DateTime<Utc>,
}

impl DistrictBody {
    pub fn render(district: District) -> Result<DistrictBody, Error> {
        let coordinates = codec::decode_polygon(&district.polygon)?;
        let geo_json = codec::to_geojson(&coordinates);

        Ok(DistrictBody {
            id: district.id,
            name: district.name,
            city: district.city,
            region: district.region,
            population: district.population,
            area_km2: district.area_km2,
            is_active: district.is_active,
            coordinates,
            geo_json,
            created_at: district.created_at,
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CheckPointBody {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct PointBody {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct DistrictMatchBody {
    pub id: DistrictId,
    pub name: String,
    pub city: String,
    pub population: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct DistrictCheckPointResponse {
    pub found: bool,
    pub district: Option<DistrictMatchBody>,
    pub point: PointBody,
}

#[get("/districts")]
#[tracing::instrument(skip(db))]
async fn get_districts(
    db: Data<MongoDatabase>,
    filter: Query<DistrictFilter>,
) -> Result<Json<Vec<DistrictBody>>, Error> {
    let districts = manager::list_districts(db.get_ref(), &filter.into_inner()).await?;

    let body = districts
        .into_iter()
        .map(DistrictBody::render)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(body))
}

#[get("/districts/by-city")]
#[tracing::instrument(skip(db))]
async fn get_districts_by_city(
    db: Data<MongoDatabase>,
) -> Result<Json<Vec<CityAggregate>>, Error> {
    let cities = manager::group_by_city(db.get_ref()).await?;

    Ok(Json(cities))
}

#[get("/districts/{district_id}")]
#[tracing::instrument(skip(db))]
async fn get_district_by_id(
    db: Data<MongoDatabase>,
    params: Path<DistrictId>,
) -> Result<Json<DistrictBody>, Error> {
    let district_id = params.into_inner();

    let district = manager::get_district_by_id(db.get_ref(), district_id).await?;

    Ok(Json(DistrictBody::render(district)?))
}

#[post("/districts/check-point")]
#[tracing::instrument(skip(db))]
async fn check_point_in_district(
    db: Data<MongoDatabase>,
    body: Json<CheckPointBody>,
) -> Result<Json<DistrictCheckPointResponse>, Error> {
    let body = body.into_inner();

    let matched =
        manager::find_containing_district(db.get_ref(), body.latitude, body.longitude).await?;

    let district = matched.into_iter().next().map(|district| DistrictMatchBody {
        id: district.id,
        name: district.name,
        city: district.city,
        population: district.population,
    });

    Ok(Json(DistrictCheckPointResponse {
        found: district.is_some(),
        district,
        point: PointBody {
            latitude: body.latitude,
            longitude: body.longitude,
        },
    }))
}
