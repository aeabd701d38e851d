//! Conversion between coordinate arrays and the canonical polygon text stored
//! in the database: `POLYGON((lng1 lat1, lng2 lat2, ..., lng1 lat1))`.
//!
//! Only simple single-ring polygons are supported; interior rings do not occur
//! in this domain and are rejected by the decoder.

use crate::error::Error;

use super::{CoordinatePair, GeoJsonPolygon};

/// Encodes an ordered `[lng, lat]` sequence into canonical polygon text.
///
/// The ring is auto-closed when the first and last pairs differ. At least 3
/// distinct in-range pairs are required; coordinate values are written exactly
/// as given.
pub fn encode_polygon(coordinates: &[CoordinatePair]) -> Result<String, Error> {
    for pair in coordinates {
        let (lng, lat) = (pair[0], pair[1]);
        if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidPoint {
                latitude: lat,
                longitude: lng,
            });
        }
    }

    let distinct_points = count_distinct(coordinates);
    if distinct_points < 3 {
        return Err(Error::InvalidGeometry { distinct_points });
    }

    let mut ring: Vec<CoordinatePair> = coordinates.to_vec();
    if ring.first() != ring.last() {
        ring.push(ring[0]);
    }

    let points = ring
        .iter()
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("POLYGON(({}))", points))
}

/// Decodes canonical polygon text back into its ordered `[lng, lat]` pairs,
/// including the closing duplicate.
///
/// The grammar is strict: exactly one pair of double parentheses wrapping
/// comma-separated numeric pairs. Anything else is treated as stored-data
/// corruption and surfaced as `MalformedGeometry`, never as an empty ring.
pub fn decode_polygon(text: &str) -> Result<Vec<CoordinatePair>, Error> {
    let malformed = || Error::MalformedGeometry {
        detail: text.to_string(),
    };

    let inner = text
        .strip_prefix("POLYGON((")
        .and_then(|rest| rest.strip_suffix("))"))
        .ok_or_else(malformed)?;

    // interior parentheses would mean nested rings, which are unsupported
    if inner.contains('(') || inner.contains(')') {
        return Err(malformed());
    }

    let mut ring = Vec::new();
    for entry in inner.split(',') {
        let mut numbers = entry.split_whitespace();
        let lng = numbers.next().ok_or_else(malformed)?;
        let lat = numbers.next().ok_or_else(malformed)?;
        if numbers.next().is_some() {
            return Err(malformed());
        }

        let lng: f64 = lng.parse().map_err(|_| malformed())?;
        let lat: f64 = lat.parse().map_err(|_| malformed())?;
        ring.push([lng, lat]);
    }

    Ok(ring)
}

/// Wraps a decoded ring as a GeoJSON polygon for API responses.
pub fn to_geojson(ring: &[CoordinatePair]) -> GeoJsonPolygon {
    GeoJsonPolygon::new(ring.to_vec())
}

fn count_distinct(coordinates: &[CoordinatePair]) -> usize {
    let mut distinct: Vec<CoordinatePair> = Vec::with_capacity(coordinates.len());
    for pair in coordinates {
        if !distinct.contains(pair) {
            distinct.push(*pair);
        }
    }
    distinct.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_closes_an_open_ring() {
        let encoded = encode_polygon(&[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]]).unwrap();

        assert_eq!(encoded, "POLYGON((0 0, 0 1, 1 1, 1 0, 0 0))");
    }

    #[test]
    fn encode_keeps_a_closed_ring_unchanged() {
        let ring = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

        let encoded = encode_polygon(&ring).unwrap();

        assert_eq!(encoded, "POLYGON((0 0, 0 1, 1 1, 1 0, 0 0))");
    }

    #[test]
    fn round_trip_preserves_coordinate_values() {
        let ring = [
            [174.758, -36.84],
            [174.772, -36.84],
            [174.772, -36.852],
            [174.758, -36.852],
        ];

        let decoded = decode_polygon(&encode_polygon(&ring).unwrap()).unwrap();

        assert_eq!(
            decoded,
            vec![
                [174.758, -36.84],
                [174.772, -36.84],
                [174.772, -36.852],
                [174.758, -36.852],
                [174.758, -36.84],
            ]
        );
    }

    #[test]
    fn encode_is_idempotent_on_its_own_output() {
        let ring = [[174.758, -36.84], [174.772, -36.84], [174.772, -36.852]];

        let first = encode_polygon(&ring).unwrap();
        let second = encode_polygon(&decode_polygon(&first).unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn encode_rejects_too_few_distinct_points() {
        let result = encode_polygon(&[[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidGeometry { distinct_points: 2 }
        );
    }

    #[test]
    fn encode_rejects_out_of_range_coordinates() {
        let result = encode_polygon(&[[200.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidPoint {
                latitude: 0.0,
                longitude: 200.0,
            }
        );
    }

    #[test]
    fn decode_rejects_text_without_polygon_wrapper() {
        let result = decode_polygon("LINESTRING(0 0, 1 1)");

        assert!(matches!(
            result.unwrap_err(),
            Error::MalformedGeometry { .. }
        ));
    }

    #[test]
    fn decode_rejects_nested_rings() {
        let result = decode_polygon("POLYGON((0 0, 0 1, 1 1, 0 0), (0 0, 0 1, 1 1, 0 0))");

        assert!(matches!(
            result.unwrap_err(),
            Error::MalformedGeometry { .. }
        ));
    }

    #[test]
    fn decode_rejects_non_numeric_pairs() {
        let result = decode_polygon("POLYGON((0 0, east west, 1 1, 0 0))");

        assert!(matches!(
            result.unwrap_err(),
            Error::MalformedGeometry { .. }
        ));
    }

    #[test]
    fn decode_rejects_triples_within_a_pair() {
        let result = decode_polygon("POLYGON((0 0 0, 0 1 0, 1 1 0, 0 0 0))");

        assert!(matches!(
            result.unwrap_err(),
            Error::MalformedGeometry { .. }
        ));
    }

    #[test]
    fn to_geojson_wraps_the_ring() {
        let ring = vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]];

        let geojson = to_geojson(&ring);

        assert_eq!(geojson.polygon_type, "Polygon");
        assert_eq!(geojson.coordinates, vec![ring]);
    }
}
