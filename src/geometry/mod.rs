use serde::Serialize;

pub mod codec;
pub mod spatial;

/// A coordinate pair in `[longitude, latitude]` axis order, matching the order
/// used by map-rendering clients and the canonical polygon text.
pub type CoordinatePair = [f64; 2];

/// GeoJSON-style wrapper around a single polygon ring, returned alongside the
/// flat coordinate array on every geometry read path.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeoJsonPolygon {
    #[serde(rename = "type")]
    pub polygon_type: &'static str,
    pub coordinates: Vec<Vec<CoordinatePair>>,
}

impl GeoJsonPolygon {
    pub fn new(ring: Vec<CoordinatePair>) -> GeoJsonPolygon {
        GeoJsonPolygon {
            polygon_type: "Polygon",
            coordinates: vec![ring],
        }
    }
}
