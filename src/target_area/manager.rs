use chrono::Utc;

use crate::campaign::{manager as campaign_manager, CampaignId};
use crate::database::Database;
use crate::district::{District, DistrictId};
use crate::error::Error;
use crate::geometry::codec;
use crate::geometry::spatial::{self, Point};
use crate::identity::AdvertiserId;

use super::{
    validate_priority, TargetArea, TargetAreaId, TargetAreaView, PRIORITY_DEFAULT,
};

/// Adds a district to a campaign's target areas.
///
/// Checks run in order: campaign existence, campaign ownership, priority
/// range, district existence, district active, pair uniqueness. Nothing is
/// written until every check has passed.
#[tracing::instrument(skip(db))]
pub async fn add_target_area(
    db: &dyn Database,
    campaign_id: CampaignId,
    district_id: DistrictId,
    priority_level: Option<i32>,
    advertiser_id: AdvertiserId,
) -> Result<TargetAreaView, Error> {
    campaign_manager::assert_campaign_owned(db, campaign_id, advertiser_id).await?;

    let priority_level = priority_level.unwrap_or(PRIORITY_DEFAULT);
    validate_priority(priority_level)?;

    let district = db
        .districts()
        .fetch_district_by_id(district_id)
        .await?
        .ok_or(Error::DistrictDoesNotExist { district_id })?;

    if !district.is_active {
        return Err(Error::DistrictNotActive { district_id });
    }

    let existing = db
        .target_areas()
        .fetch_target_area_by_campaign_and_district(campaign_id, district_id)
        .await?;
    if existing.is_some() {
        return Err(Error::TargetAreaAlreadyExists {
            campaign_id,
            district_id,
        });
    }

    let target_area = TargetArea {
        id: TargetAreaId::new(),
        campaign_id,
        district_id,
        priority_level,
        created_at: Utc::now(),
    };

    // the unique index converts a concurrent identical insert into
    // TargetAreaAlreadyExists inside the store
    db.target_areas().insert_target_area(&target_area).await?;

    Ok(TargetAreaView {
        target_area,
        district,
    })
}

/// Lists a campaign's target areas joined with their districts, highest
/// priority first and most recently added first within equal priorities.
/// Downstream single-match consumers rely on this order.
#[tracing::instrument(skip(db))]
pub async fn list_target_areas(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Vec<TargetAreaView>, Error> {
    campaign_manager::get_campaign_by_id(db, campaign_id).await?;

    let mut target_areas = db
        .target_areas()
        .fetch_target_areas_by_campaign(campaign_id)
        .await?;
    sort_by_priority(&mut target_areas);

    let mut views = Vec::with_capacity(target_areas.len());
    for target_area in target_areas {
        let district = fetch_district_for(db, &target_area).await?;
        views.push(TargetAreaView {
            target_area,
            district,
        });
    }

    Ok(views)
}

#[tracing::instrument(skip(db))]
pub async fn get_target_area(
    db: &dyn Database,
    target_area_id: TargetAreaId,
) -> Result<TargetAreaView, Error> {
    let target_area = db
        .target_areas()
        .fetch_target_area_by_id(target_area_id)
        .await?
        .ok_or(Error::TargetAreaDoesNotExist { target_area_id })?;

    let district = fetch_district_for(db, &target_area).await?;

    Ok(TargetAreaView {
        target_area,
        district,
    })
}

/// Updates the priority level, the only mutable field. Ownership is
/// re-verified by walking target area → campaign → advertiser.
#[tracing::instrument(skip(db))]
pub async fn update_target_area(
    db: &dyn Database,
    target_area_id: TargetAreaId,
    priority_level: i32,
    advertiser_id: AdvertiserId,
) -> Result<TargetAreaView, Error> {
    let mut target_area = db
        .target_areas()
        .fetch_target_area_by_id(target_area_id)
        .await?
        .ok_or(Error::TargetAreaDoesNotExist { target_area_id })?;

    campaign_manager::assert_campaign_owned(db, target_area.campaign_id, advertiser_id).await?;

    validate_priority(priority_level)?;

    db.target_areas()
        .update_target_area_priority(target_area_id, priority_level)
        .await?;
    target_area.priority_level = priority_level;

    let district = fetch_district_for(db, &target_area).await?;

    Ok(TargetAreaView {
        target_area,
        district,
    })
}

#[tracing::instrument(skip(db))]
pub async fn delete_target_area(
    db: &dyn Database,
    target_area_id: TargetAreaId,
    advertiser_id: AdvertiserId,
) -> Result<(), Error> {
    let target_area = db
        .target_areas()
        .fetch_target_area_by_id(target_area_id)
        .await?
        .ok_or(Error::TargetAreaDoesNotExist { target_area_id })?;

    campaign_manager::assert_campaign_owned(db, target_area.campaign_id, advertiser_id).await?;

    db.target_areas().delete_target_area(target_area_id).await?;

    Ok(())
}

/// Returns the campaign's target areas containing the point, in the same
/// priority-then-recency order as [`list_target_areas`]. The point is
/// validated before any fetch; a corrupt stored polygon aborts the check.
#[tracing::instrument(skip(db))]
pub async fn check_point_in_target_areas(
    db: &dyn Database,
    campaign_id: CampaignId,
    latitude: f64,
    longitude: f64,
) -> Result<Vec<TargetAreaView>, Error> {
    let point = Point::new(latitude, longitude)?;

    campaign_manager::get_campaign_by_id(db, campaign_id).await?;

    let mut target_areas = db
        .target_areas()
        .fetch_target_areas_by_campaign(campaign_id)
        .await?;
    sort_by_priority(&mut target_areas);

    let mut candidates = Vec::with_capacity(target_areas.len());
    for target_area in target_areas {
        let district = fetch_district_for(db, &target_area).await?;
        let ring = codec::decode_polygon(&district.polygon)?;
        candidates.push((
            TargetAreaView {
                target_area,
                district,
            },
            ring,
        ));
    }

    Ok(spatial::find_containing(point, candidates))
}

fn sort_by_priority(target_areas: &mut Vec<TargetArea>) {
    target_areas.sort_by(|a, b| {
        b.priority_level
            .cmp(&a.priority_level)
            .then(b.created_at.cmp(&a.created_at))
    });
}

/// A target area referencing a missing district means a broken cascade; it is
/// surfaced rather than dropped so a campaign never silently loses coverage.
async fn fetch_district_for(
    db: &dyn Database,
    target_area: &TargetArea,
) -> Result<District, Error> {
    let district_id = target_area.district_id;
    db.districts()
        .fetch_district_by_id(district_id)
        .await?
        .ok_or(Error::DistrictDoesNotExist { district_id })
}
