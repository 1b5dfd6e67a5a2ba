//! Bounding boxes for leaderboard queries.
//!
//! Boxes arrive as `"west,south,east,north"` text and are rejected when inverted,
//! non-finite or larger than [`MAX_BBOX_AREA_DEG2`].

use geo::{coord, Intersects, Rect};

use crate::{Coordinate, LeaderboardError};

/// Largest accepted bbox, in square degrees.
pub const MAX_BBOX_AREA_DEG2: f64 = 50.0;

/// Axis-aligned bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bbox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Bbox {
    /// Parse and validate a `"west,south,east,north"` string.
    ///
    /// # Example
    /// ```
    /// use officer_leaderboard::{Bbox, Coordinate};
    ///
    /// let bbox = Bbox::parse("-0.2, 51.45, -0.05, 51.55").unwrap();
    /// assert!(bbox.contains(&Coordinate::new(51.5, -0.12)));
    /// assert!(Bbox::parse("-0.05,51.45,-0.2,51.55").is_err()); // west > east
    /// ```
    pub fn parse(raw: &str) -> Result<Self, LeaderboardError> {
        let segments: Vec<f64> = raw
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| LeaderboardError::invalid_bbox("bbox must contain four comma-separated numbers"))?;

        let [west, south, east, north] = segments[..] else {
            return Err(LeaderboardError::invalid_bbox(
                "bbox must contain four comma-separated numbers",
            ));
        };

        Self::new(west, south, east, north)
    }

    /// Build a bbox from its edges, applying the same checks as [`Bbox::parse`].
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, LeaderboardError> {
        if ![west, south, east, north].iter().all(|v| v.is_finite()) {
            return Err(LeaderboardError::invalid_bbox("bbox coordinates must be finite numbers"));
        }

        if west > east || south > north {
            return Err(LeaderboardError::invalid_bbox(
                "bbox coordinates are invalid: west must be <= east and south <= north",
            ));
        }

        let bbox = Self { west, south, east, north };
        let area = bbox.area();
        if area > MAX_BBOX_AREA_DEG2 {
            return Err(LeaderboardError::BboxTooLarge { area });
        }

        Ok(bbox)
    }

    /// Area in square degrees.
    pub fn area(&self) -> f64 {
        self.rect().width() * self.rect().height()
    }

    /// Check if a coordinate lies inside the box. Edges count as inside.
    pub fn contains(&self, c: &Coordinate) -> bool {
        self.rect().intersects(&coord! { x: c.lon, y: c.lat })
    }

    fn rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.west, y: self.south },
            coord! { x: self.east, y: self.north },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let bbox = Bbox::parse("-0.2,51.45,-0.05,51.55").unwrap();
        assert_eq!(bbox, Bbox { west: -0.2, south: 51.45, east: -0.05, north: 51.55 });
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(Bbox::parse(" -0.2 , 51.45 ,-0.05,  51.55 ").is_ok());
    }

    #[test]
    fn test_parse_wrong_segment_count() {
        assert!(matches!(Bbox::parse("1,2,3"), Err(LeaderboardError::InvalidBbox { .. })));
        assert!(matches!(Bbox::parse("1,2,3,4,5"), Err(LeaderboardError::InvalidBbox { .. })));
    }

    #[test]
    fn test_parse_not_numbers() {
        assert!(matches!(Bbox::parse("a,b,c,d"), Err(LeaderboardError::InvalidBbox { .. })));
        assert!(matches!(Bbox::parse(""), Err(LeaderboardError::InvalidBbox { .. })));
    }

    #[test]
    fn test_parse_non_finite() {
        assert!(matches!(Bbox::parse("NaN,0,1,1"), Err(LeaderboardError::InvalidBbox { .. })));
        assert!(matches!(Bbox::parse("0,0,inf,1"), Err(LeaderboardError::InvalidBbox { .. })));
    }

    #[test]
    fn test_parse_inverted() {
        assert!(Bbox::parse("1,0,0,1").is_err());
        assert!(Bbox::parse("0,1,1,0").is_err());
    }

    #[test]
    fn test_area_limit() {
        // 5 x 10 = 50 is allowed, anything bigger is not
        assert!(Bbox::parse("0,0,5,10").is_ok());
        match Bbox::parse("0,0,5,10.5") {
            Err(LeaderboardError::BboxTooLarge { area }) => assert!((area - 52.5).abs() < 1e-9),
            other => panic!("expected BboxTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_contains_is_edge_inclusive() {
        let bbox = Bbox::new(-1.0, 50.0, 1.0, 52.0).unwrap();
        assert!(bbox.contains(&Coordinate::new(51.0, 0.0)));
        assert!(bbox.contains(&Coordinate::new(50.0, -1.0)));
        assert!(bbox.contains(&Coordinate::new(52.0, 1.0)));
        assert!(!bbox.contains(&Coordinate::new(52.001, 0.0)));
        assert!(!bbox.contains(&Coordinate::new(51.0, -1.001)));
    }
}
