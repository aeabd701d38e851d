//! Point-in-polygon evaluation against decoded coordinate rings.
//!
//! Districts span single-digit to tens of kilometers, so containment is
//! evaluated on the planar (lng, lat) projection without geodesic correction.

use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::CoordinatePair;

/// A validated query point. Construction fails fast on out-of-range values so
/// no geometry is ever evaluated against an invalid point.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Result<Point, Error> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidPoint {
                latitude,
                longitude,
            });
        }

        Ok(Point {
            latitude,
            longitude,
        })
    }
}

/// Even-odd ray-casting containment test for a simple closed ring.
///
/// A point exactly on an edge is classified by the raw parity test (strict
/// comparisons), which is deterministic for a fixed ring and point but makes
/// no inside/outside guarantee on the boundary itself.
pub fn ring_contains(ring: &[CoordinatePair], point: Point) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let (x, y) = (point.longitude, point.latitude);
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i][0], ring[i][1]);
        let (xj, yj) = (ring[j][0], ring[j][1]);
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Filters candidates down to those whose ring contains the point, preserving
/// candidate order. Callers supply candidates in their documented sort order,
/// so taking the first result is a deterministic single-match pick.
pub fn find_containing<T>(
    point: Point,
    candidates: Vec<(T, Vec<CoordinatePair>)>,
) -> Vec<T> {
    candidates
        .into_iter()
        .filter(|(_, ring)| ring_contains(ring, point))
        .map(|(id, _)| id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<CoordinatePair> {
        vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]
    }

    #[test]
    fn point_inside_square_is_contained() {
        let point = Point::new(0.5, 0.5).unwrap();

        assert!(ring_contains(&unit_square(), point));
    }

    #[test]
    fn point_outside_square_is_not_contained() {
        let point = Point::new(2.0, 2.0).unwrap();

        assert!(!ring_contains(&unit_square(), point));
    }

    #[test]
    fn auckland_cbd_contains_queen_street() {
        let ring = vec![
            [174.758, -36.84],
            [174.772, -36.84],
            [174.772, -36.852],
            [174.758, -36.852],
            [174.758, -36.84],
        ];

        let inside = Point::new(-36.845, 174.765).unwrap();
        let outside = Point::new(-36.9, 174.9).unwrap();

        assert!(ring_contains(&ring, inside));
        assert!(!ring_contains(&ring, outside));
    }

    #[test]
    fn degenerate_ring_contains_nothing() {
        let point = Point::new(0.0, 0.0).unwrap();

        assert!(!ring_contains(&[[0.0, 0.0], [1.0, 1.0]], point));
    }

    #[test]
    fn point_validation_rejects_out_of_range_latitude() {
        let result = Point::new(91.0, 0.0);

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidPoint {
                latitude: 91.0,
                longitude: 0.0,
            }
        );
    }

    #[test]
    fn point_validation_rejects_out_of_range_longitude() {
        let result = Point::new(0.0, -180.5);

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidPoint {
                latitude: 0.0,
                longitude: -180.5,
            }
        );
    }

    #[test]
    fn find_containing_preserves_candidate_order() {
        let big = vec![[0.0, 0.0], [0.0, 4.0], [4.0, 4.0], [4.0, 0.0], [0.0, 0.0]];
        let small = unit_square();
        let far = vec![
            [10.0, 10.0],
            [10.0, 11.0],
            [11.0, 11.0],
            [11.0, 10.0],
            [10.0, 10.0],
        ];
        let point = Point::new(0.5, 0.5).unwrap();

        let matched = find_containing(point, vec![("big", big), ("far", far), ("small", small)]);

        assert_eq!(matched, vec!["big", "small"]);
    }
}
