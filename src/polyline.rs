//! Polyline representation for route geometries.
//!
//! Routing services ship geometries in the compact encoded polyline format.
//! Decoding happens once at that boundary; everything inside the crate works
//! with the decoded coordinate sequence.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coordinate::{Coordinate, ParseError};

/// Precision used by OSRM's `geometries=polyline` output.
pub const DEFAULT_PRECISION: u32 = 5;

/// A route geometry as an ordered sequence of coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

/// Smallest latitude/longitude rectangle containing a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolylineError {
    #[error("encoded polyline ends in the middle of a value")]
    Truncated,

    #[error("invalid character {character:?} at byte {position} of encoded polyline")]
    InvalidCharacter { character: char, position: usize },

    #[error("encoded polyline value is too long")]
    Overflow,

    #[error("encoded polyline decodes to an invalid coordinate: {0}")]
    InvalidCoordinate(#[from] ParseError),
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline string with the given precision
    /// (number of decimal digits, 5 for OSRM and Google).
    pub fn decode(encoded: &str, precision: u32) -> Result<Self, PolylineError> {
        let factor = 10_f64.powi(precision as i32);
        let bytes = encoded.as_bytes();
        let mut index = 0;
        let mut lat: i64 = 0;
        let mut lon: i64 = 0;
        let mut points = Vec::new();

        while index < bytes.len() {
            lat += decode_value(bytes, &mut index)?;
            lon += decode_value(bytes, &mut index)?;
            points.push(Coordinate::new(lat as f64 / factor, lon as f64 / factor)?);
        }

        Ok(Self { points })
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of all points, or `None` for an empty polyline.
    pub fn bounds(&self) -> Option<BoundingBox> {
        let first = *self.points.first()?;
        let bounds = self.points.iter().fold(
            BoundingBox {
                south_west: first,
                north_east: first,
            },
            |mut acc, point| {
                acc.south_west.lat = acc.south_west.lat.min(point.lat);
                acc.south_west.lon = acc.south_west.lon.min(point.lon);
                acc.north_east.lat = acc.north_east.lat.max(point.lat);
                acc.north_east.lon = acc.north_east.lon.max(point.lon);
                acc
            },
        );
        Some(bounds)
    }
}

/// Reads one zig-zag encoded, 5-bit chunked signed value.
fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes.get(*index).ok_or(PolylineError::Truncated)?;
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                character: char::from(byte),
                position: *index,
            });
        }
        if shift > 60 {
            return Err(PolylineError::Overflow);
        }
        *index += 1;

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    if result & 1 == 1 {
        Ok(!(result >> 1))
    } else {
        Ok(result >> 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    #[test]
    fn test_new_and_points() {
        let points = vec![coord(38.5, -120.2), coord(40.7, -120.95), coord(43.252, -126.453)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.points(), &points[..]);
    }

    #[test]
    fn test_into_points() {
        let points = vec![coord(38.5, -120.2), coord(40.7, -120.95)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.into_points(), points);
    }

    #[test]
    fn test_empty_polyline() {
        let polyline = Polyline::new(vec![]);
        assert!(polyline.is_empty());
        assert_eq!(polyline.bounds(), None);
    }

    #[test]
    fn test_decode_reference_polyline() {
        let polyline =
            Polyline::decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@", DEFAULT_PRECISION).expect("decode");
        assert_eq!(
            polyline.points(),
            &[coord(38.5, -120.2), coord(40.7, -120.95), coord(43.252, -126.453)]
        );
    }

    #[test]
    fn test_decode_empty_string() {
        let polyline = Polyline::decode("", DEFAULT_PRECISION).expect("decode");
        assert!(polyline.is_empty());
    }

    #[test]
    fn test_decode_truncated() {
        // Drop the final character so the last longitude is incomplete.
        let err = Polyline::decode("_p~iF~ps|U_ulLnnqC_mqNvxq", DEFAULT_PRECISION)
            .expect_err("should fail");
        assert_eq!(err, PolylineError::Truncated);
    }

    #[test]
    fn test_decode_invalid_character() {
        let err = Polyline::decode("_p~iF ps|U", DEFAULT_PRECISION).expect_err("should fail");
        assert_eq!(
            err,
            PolylineError::InvalidCharacter {
                character: ' ',
                position: 5
            }
        );
    }

    #[test]
    fn test_bounds() {
        let polyline = Polyline::new(vec![coord(25.30, 82.97), coord(25.35, 82.90), coord(25.32, 82.99)]);
        let bounds = polyline.bounds().expect("non-empty");
        assert_eq!(bounds.south_west, coord(25.30, 82.90));
        assert_eq!(bounds.north_east, coord(25.35, 82.99));
    }

    #[test]
    fn test_partial_eq() {
        let p1 = Polyline::new(vec![coord(1.0, 2.0)]);
        let p2 = Polyline::new(vec![coord(1.0, 2.0)]);
        let p3 = Polyline::new(vec![coord(1.0, 2.1)]);
        assert_eq!(p1, p2);
        assert_ne!(p1, p3);
    }
}
