//! Route requests, provider candidates and the chosen result.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::polyline::Polyline;

/// An immutable routing request: origin, stops in visiting order, destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    origin: Coordinate,
    destination: Coordinate,
    waypoints: Vec<Coordinate>,
}

impl RouteRequest {
    pub fn new(origin: Coordinate, destination: Coordinate, waypoints: Vec<Coordinate>) -> Self {
        Self {
            origin,
            destination,
            waypoints,
        }
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    pub fn waypoints(&self) -> &[Coordinate] {
        &self.waypoints
    }

    /// All points in travel order. Waypoints are never reordered.
    pub fn points(&self) -> Vec<Coordinate> {
        let mut points = Vec::with_capacity(self.waypoints.len() + 2);
        points.push(self.origin);
        points.extend_from_slice(&self.waypoints);
        points.push(self.destination);
        points
    }
}

/// One ranked route alternative as reported by a routing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub geometry: Polyline,
    /// Total distance in meters.
    pub distance_m: f64,
    /// Estimated travel time in seconds, when the provider reports one.
    pub duration_s: Option<f64>,
}

/// The route chosen for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub geometry: Polyline,
    pub total_distance_m: f64,
}

impl RouteResult {
    /// Formatted total distance, see [`format_distance_km`].
    pub fn display_distance(&self) -> String {
        format_distance_km(self.total_distance_m)
    }
}

impl From<RouteCandidate> for RouteResult {
    fn from(candidate: RouteCandidate) -> Self {
        Self {
            geometry: candidate.geometry,
            total_distance_m: candidate.distance_m,
        }
    }
}

/// Formats a distance in meters as kilometers with two decimals, e.g.
/// `"2.35 km"`.
///
/// The kilometer value is rounded as a binary float, so an exact half
/// meter count such as 1005 m can round down. Sub-kilometer routes stay in km.
pub fn format_distance_km(meters: f64) -> String {
    format!("{:.2} km", meters.max(0.0) / 1000.0)
}
