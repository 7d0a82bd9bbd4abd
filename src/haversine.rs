//! Haversine routing provider (fallback when no routing service is reachable).
//!
//! Uses great-circle distance between consecutive points. Less accurate than
//! OSRM (ignores roads) but always available.

use async_trait::async_trait;

use crate::coordinate::Coordinate;
use crate::error::RoutingProviderError;
use crate::polyline::Polyline;
use crate::route::{RouteCandidate, RouteRequest};
use crate::traits::RoutingProvider;

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Straight-line routing provider.
///
/// Returns a single candidate whose geometry is the request points joined in
/// order and whose distance is the sum of the great-circle legs.
#[derive(Debug, Clone)]
pub struct HaversineRouter {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineRouter {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineRouter {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Calculate haversine distance between two points in kilometers.
    pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
        let lat1_rad = from.lat.to_radians();
        let lat2_rad = to.lat.to_radians();
        let delta_lat = (to.lat - from.lat).to_radians();
        let delta_lng = (to.lon - from.lon).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Convert distance in km to travel time in seconds.
    fn km_to_seconds(&self, km: f64) -> f64 {
        (km / self.speed_kmh * 3600.0).round()
    }
}

#[async_trait]
impl RoutingProvider for HaversineRouter {
    async fn route(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<RouteCandidate>, RoutingProviderError> {
        let points = request.points();
        let km: f64 = points
            .windows(2)
            .map(|leg| Self::haversine_km(leg[0], leg[1]))
            .sum();
        tracing::debug!(legs = points.len() - 1, km, "estimated straight-line route");

        let duration_s = (self.speed_kmh > 0.0).then(|| self.km_to_seconds(km));
        Ok(vec![RouteCandidate {
            geometry: Polyline::new(points),
            distance_m: km * 1000.0,
            duration_s,
        }])
    }
}
