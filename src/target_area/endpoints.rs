use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::campaign::CampaignId;
use crate::database::MongoDatabase;
use crate::district::{CheckPointBody, DistrictId, PointBody};
use crate::error::Error;
use crate::geometry::codec;
use crate::geometry::{CoordinatePair, GeoJsonPolygon};
use crate::identity::AdvertiserId;

use super::{manager, TargetAreaId, TargetAreaView};

#[derive(Clone, Debug, Deserialize)]
pub struct CreateTargetAreaBody {
    pub district_id: DistrictId,
    pub priority_level: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateTargetAreaBody {
    pub priority_level: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct TargetAreaBody {
    pub id: TargetAreaId,
    pub campaign_id: CampaignId,
    pub district_id: DistrictId,
    pub district_name: String,
    pub city: String,
    pub region: String,
    pub population: i64,
    pub area_km2: f64,
    pub priority_level: i32,
    pub coordinates: Vec<CoordinatePair>,
    pub geo_json: GeoJsonPolygon,
    pub created_at: DateTime<Utc>,
}

impl TargetAreaBody {
    pub fn render(view: TargetAreaView) -> Result<TargetAreaBody, Error> {
        let coordinates = codec::decode_polygon(&view.district.polygon)?;
        let geo_json = codec::to_geojson(&coordinates);

        Ok(TargetAreaBody {
            id: view.target_area.id,
            campaign_id: view.target_area.campaign_id,
            district_id: view.target_area.district_id,
            district_name: view.district.name,
            city: view.district.city,
            region: view.district.region,
            population: view.district.population,
            area_km2: view.district.area_km2,
            priority_level: view.target_area.priority_level,
            coordinates,
            geo_json,
            created_at: view.target_area.created_at,
        })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TargetAreaMatchBody {
    pub id: TargetAreaId,
    pub district_name: String,
    pub priority_level: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct TargetAreaCheckPointResponse {
    pub found: bool,
    pub matched_areas: Vec<TargetAreaMatchBody>,
    pub point: PointBody,
}

#[post("/campaigns/{campaign_id}/target-areas")]
#[tracing::instrument(skip(db))]
async fn create_target_area(
    db: Data<MongoDatabase>,
    advertiser_id: AdvertiserId,
    params: Path<CampaignId>,
    body: Json<CreateTargetAreaBody>,
) -> Result<Json<TargetAreaBody>, Error> {
    let campaign_id = params.into_inner();
    let body = body.into_inner();

    let view = manager::add_target_area(
        db.get_ref(),
        campaign_id,
        body.district_id,
        body.priority_level,
        advertiser_id,
    )
    .await?;

    Ok(Json(TargetAreaBody::render(view)?))
}

#[get("/campaigns/{campaign_id}/target-areas")]
#[tracing::instrument(skip(db))]
async fn get_target_areas_in_campaign(
    db: Data<MongoDatabase>,
    params: Path<CampaignId>,
) -> Result<Json<Vec<TargetAreaBody>>, Error> {
    let campaign_id = params.into_inner();

    let views = manager::list_target_areas(db.get_ref(), campaign_id).await?;

    let body = views
        .into_iter()
        .map(TargetAreaBody::render)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(body))
}

#[post("/campaigns/{campaign_id}/target-areas/check-point")]
#[tracing::instrument(skip(db))]
async fn check_point_in_target_areas(
    db: Data<MongoDatabase>,
    params: Path<CampaignId>,
    body: Json<CheckPointBody>,
) -> Result<Json<TargetAreaCheckPointResponse>, Error> {
    let campaign_id = params.into_inner();
    let body = body.into_inner();

    let views = manager::check_point_in_target_areas(
        db.get_ref(),
        campaign_id,
        body.latitude,
        body.longitude,
    )
    .await?;

    let matched_areas = views
        .into_iter()
        .map(|view| TargetAreaMatchBody {
            id: view.target_area.id,
            district_name: view.district.name,
            priority_level: view.target_area.priority_level,
        })
        .collect::<Vec<_>>();

    Ok(Json(TargetAreaCheckPointResponse {
        found: !matched_areas.is_empty(),
        matched_areas,
        point: PointBody {
            latitude: body.latitude,
            longitude: body.longitude,
        },
    }))
}

#[get("/target-areas/{target_area_id}")]
#[tracing::instrument(skip(db))]
async fn get_target_area_by_id(
    db: Data<MongoDatabase>,
    params: Path<TargetAreaId>,
) -> Result<Json<TargetAreaBody>, Error> {
    let target_area_id = params.into_inner();

    let view = manager::get_target_area(db.get_ref(), target_area_id).await?;

    Ok(Json(TargetAreaBody::render(view)?))
}

#[put("/target-areas/{target_area_id}")]
#[tracing::instrument(skip(db))]
async fn update_target_area(
    db: Data<MongoDatabase>,
    advertiser_id: AdvertiserId,
    params: Path<TargetAreaId>,
    body: Json<UpdateTargetAreaBody>,
) -> Result<Json<TargetAreaBody>, Error> {
    let target_area_id = params.into_inner();
    let body = body.into_inner();

    let view = manager::update_target_area(
        db.get_ref(),
        target_area_id,
        body.priority_level,
        advertiser_id,
    )
    .await?;

    Ok(Json(TargetAreaBody::render(view)?))
}

#[delete("/target-areas/{target_area_id}")]
#[tracing::instrument(skip(db))]
async fn delete_target_area(
    db: Data<MongoDatabase>,
    advertiser_id: AdvertiserId,
    params: Path<TargetAreaId>,
) -> Result<HttpResponse, Error> {
    let target_area_id = params.into_inner();

    manager::delete_target_area(db.get_ref(), target_area_id, advertiser_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
