use chrono::Utc;

use crate::campaign::Campaign;
use crate::database::Database;
use crate::district::{District, DistrictId};
use crate::error::Error;
use crate::geometry::codec;
use crate::geometry::CoordinatePair;
use crate::target_area::TargetArea;

/// Drops and repopulates the database with the Auckland district catalog and
/// one demo campaign. All geometry enters through the codec so the closed-ring
/// invariant holds for every stored polygon.
pub async fn seed(db: &dyn Database) -> Result<(), Error> {
    db.drop().await?;

    let advertiser_id = "ADV-9B05A4C7-3E6F-4A2B-8D91-0C47225E81F3".parse().unwrap();
    let campaign_id = "CPN-16E77539-8873-4C8A-BCA3-2036010474AD".parse().unwrap();
    let cbd_id: DistrictId = "DST-5EA81D0A-9788-4B8A-82D9-1A0D636B53CE".parse().unwrap();
    let ponsonby_id: DistrictId = "DST-5C903E93-2524-4876-B4C8-816B98D0C77B".parse().unwrap();

    let now = Utc::now();
    let campaign = Campaign {
        id: campaign_id,
        advertiser_id,
        name: "City Coffee Wraps".to_string(),
        created_at: now,
        modified_at: now,
    };
    db.campaigns().insert_campaign(&campaign).await?;

    let districts = vec![
        district(
            cbd_id,
            "Auckland CBD",
            55000,
            2.5,
            &[
                [174.758, -36.84],
                [174.772, -36.84],
                [174.772, -36.852],
                [174.758, -36.852],
            ],
        )?,
        district(
            DistrictId::new(),
            "Parnell",
            18000,
            3.2,
            &[
                [174.772, -36.845],
                [174.79, -36.845],
                [174.79, -36.86],
                [174.772, -36.86],
            ],
        )?,
        district(
            DistrictId::new(),
            "Newmarket",
            8500,
            1.8,
            &[
                [174.775, -36.865],
                [174.79, -36.865],
                [174.79, -36.875],
                [174.775, -36.875],
            ],
        )?,
        district(
            ponsonby_id,
            "Ponsonby",
            12000,
            2.1,
            &[
                [174.74, -36.85],
                [174.755, -36.85],
                [174.755, -36.862],
                [174.74, -36.862],
            ],
        )?,
        district(
            DistrictId::new(),
            "Grey Lynn",
            9500,
            1.6,
            &[
                [174.735, -36.86],
                [174.75, -36.86],
                [174.75, -36.87],
                [174.735, -36.87],
            ],
        )?,
        district(
            DistrictId::new(),
            "Mount Eden",
            15000,
            4.5,
            &[
                [174.755, -36.875],
                [174.775, -36.875],
                [174.775, -36.895],
                [174.755, -36.895],
            ],
        )?,
        district(
            DistrictId::new(),
            "Epsom",
            16000,
            5.2,
            &[
                [174.775, -36.885],
                [174.795, -36.885],
                [174.795, -36.905],
                [174.775, -36.905],
            ],
        )?,
        district(
            DistrictId::new(),
            "Remuera",
            23000,
            7.8,
            &[
                [174.795, -36.87],
                [174.82, -36.87],
                [174.82, -36.895],
                [174.795, -36.895],
            ],
        )?,
        district(
            DistrictId::new(),
            "Mission Bay",
            5500,
            1.2,
            &[
                [174.83, -36.85],
                [174.845, -36.85],
                [174.845, -36.86],
                [174.83, -36.86],
            ],
        )?,
        district(
            DistrictId::new(),
            "Takapuna",
            11000,
            3.1,
            &[
                [174.77, -36.79],
                [174.79, -36.79],
                [174.79, -36.805],
                [174.77, -36.805],
            ],
        )?,
    ];

    for district in &districts {
        db.districts().insert_district(district).await?;
    }

    let target_areas = vec![
        TargetArea {
            id: "TGT-33957EB6-0EE7-487F-A087-E55C335BD63C".parse().unwrap(),
            campaign_id,
            district_id: cbd_id,
            priority_level: 8,
            created_at: Utc::now(),
        },
        TargetArea {
            id: "TGT-DE3168FD-2730-47A2-BFE0-E53C79DD57A0".parse().unwrap(),
            campaign_id,
            district_id: ponsonby_id,
            priority_level: 5,
            created_at: Utc::now(),
        },
    ];

    for target_area in &target_areas {
        db.target_areas().insert_target_area(target_area).await?;
    }

    Ok(())
}

fn district(
    id: DistrictId,
    name: &str,
    population: i64,
    area_km2: f64,
    ring: &[CoordinatePair],
) -> Result<District, Error> {
    Ok(District {
        id,
        name: name.to_string(),
        city: "Auckland".to_string(),
        region: "Auckland".to_string(),
        population,
        area_km2,
        is_active: true,
        polygon: codec::encode_polygon(ring)?,
        created_at: Utc::now(),
    })
}
