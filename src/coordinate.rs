//! Latitude/longitude pairs and the free-text parser that produces them.
//!
//! Input is the `latitude,longitude` text a user types into a form field.
//! Parsing is strict: a value that would not survive the trip to a routing
//! service is rejected here with a [`ParseError`] rather than travelling
//! onwards as `NaN`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Creates a coordinate, validating that both components are finite and
    /// within the WGS84 ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, ParseError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(ParseError::NonFinite { lat, lon });
        }
        if !(-MAX_LATITUDE..=MAX_LATITUDE).contains(&lat) {
            return Err(ParseError::LatitudeOutOfRange(lat));
        }
        if !(-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&lon) {
            return Err(ParseError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Parses `"lat,lon"` text.
    ///
    /// Exactly two comma-separated tokens are required. Surrounding
    /// whitespace around each token is ignored.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = text.split(',').map(str::trim).collect();
        let [lat, lon] = tokens.as_slice() else {
            return Err(ParseError::TokenCount {
                input: text.to_string(),
                found: tokens.len(),
            });
        };

        Self::new(parse_component(lat)?, parse_component(lon)?)
    }

    /// Returns the point as a `(lat, lon)` tuple.
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

fn parse_component(token: &str) -> Result<f64, ParseError> {
    if token.is_empty() {
        return Err(ParseError::EmptyToken);
    }
    token.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
        token: token.to_string(),
    })
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

impl FromStr for Coordinate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Malformed coordinate text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected \"latitude,longitude\" but found {found} comma-separated value(s) in {input:?}")]
    TokenCount { input: String, found: usize },

    #[error("coordinate has an empty component")]
    EmptyToken,

    #[error("{token:?} is not a number")]
    InvalidNumber { token: String },

    #[error("coordinate ({lat}, {lon}) is not finite")]
    NonFinite { lat: f64, lon: f64 },

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}
