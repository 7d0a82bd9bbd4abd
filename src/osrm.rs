//! OSRM HTTP adapter for route calculation.
//!
//! Talks to the OSRM Route service:
//! `{base_url}/route/v1/{profile}/{lon,lat;lon,lat;...}`. Alternatives are
//! never requested; the full-resolution geometry comes back as an encoded
//! polyline and is decoded here.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::RoutingProviderError;
use crate::polyline::{DEFAULT_PRECISION, Polyline};
use crate::route::{RouteCandidate, RouteRequest};
use crate::traits::RoutingProvider;

/// Public OSRM demo server, the default backend of common web routing widgets.
pub const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

const DEFAULT_PROFILE: &str = "driving";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("waypoint-router/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OsrmConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, RoutingProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| RoutingProviderError::Build {
                message: err.to_string(),
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    /// Builds the Route service URL. OSRM expects `lon,lat` order.
    fn build_route_url(&self, request: &RouteRequest) -> String {
        let coords = request
            .points()
            .iter()
            .map(|point| format!("{:.6},{:.6}", point.lon, point.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=polyline&alternatives=false&steps=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RoutingProviderError {
        if error.is_timeout() {
            return RoutingProviderError::Timeout {
                after: Duration::from_secs(self.config.timeout_secs),
            };
        }

        RoutingProviderError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Interprets a raw response body together with its HTTP status.
    ///
    /// OSRM reports routing failures such as `NoRoute` as JSON with a 4xx
    /// status, so the body is inspected before the status.
    fn interpret_body(
        &self,
        url: &str,
        status: reqwest::StatusCode,
        body: &str,
    ) -> Result<Vec<RouteCandidate>, RoutingProviderError> {
        match serde_json::from_str::<OsrmRouteResponse>(body) {
            Ok(response) => self.convert_response(response),
            Err(err) if status.is_success() => Err(RoutingProviderError::Decode {
                message: err.to_string(),
            }),
            Err(_) => Err(RoutingProviderError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            }),
        }
    }

    fn convert_response(
        &self,
        response: OsrmRouteResponse,
    ) -> Result<Vec<RouteCandidate>, RoutingProviderError> {
        if !response.is_ok() {
            if response.code == "NoRoute" {
                return Err(RoutingProviderError::NoRoute);
            }
            return Err(RoutingProviderError::Service {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        response
            .routes
            .into_iter()
            .map(|route| {
                if !route.distance.is_finite() || route.distance < 0.0 {
                    return Err(RoutingProviderError::Decode {
                        message: format!("invalid route distance {}", route.distance),
                    });
                }
                let geometry = Polyline::decode(&route.geometry, DEFAULT_PRECISION).map_err(
                    |err| RoutingProviderError::Decode {
                        message: err.to_string(),
                    },
                )?;
                Ok(RouteCandidate {
                    geometry,
                    distance_m: route.distance,
                    duration_s: route.duration,
                })
            })
            .collect()
    }
}

#[async_trait]
impl RoutingProvider for OsrmClient {
    async fn route(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<RouteCandidate>, RoutingProviderError> {
        let url = self.build_route_url(request);
        tracing::debug!(url = %url, points = request.points().len(), "calling OSRM route service");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        self.interpret_body(&url, status, &body)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

impl OsrmRouteResponse {
    fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
    distance: f64,
    duration: Option<f64>,
}
