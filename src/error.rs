//! Error types for routing providers and route calculation.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::coordinate::ParseError;

/// Failures reported by a [`crate::traits::RoutingProvider`].
///
/// All variants are recoverable; the caller can retry the same request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingProviderError {
    /// The provider did not answer within the allotted time.
    #[error("routing request timed out after {after:?}")]
    Timeout { after: Duration },

    /// The request never reached the provider or the connection dropped.
    #[error("network error calling {url}: {message}")]
    Network { url: String, message: String },

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
    },

    /// The provider answered but reported a failure of its own.
    #[error("routing service error {code}: {message}")]
    Service { code: String, message: String },

    /// The provider found no route through the requested points.
    #[error("no route found between the requested points")]
    NoRoute,

    /// The provider's answer could not be decoded.
    #[error("failed to decode routing response: {message}")]
    Decode { message: String },

    /// The provider could not be constructed.
    #[error("failed to build routing provider: {message}")]
    Build { message: String },
}

impl RoutingProviderError {
    /// Whether retrying the identical request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            Self::Service { .. } | Self::NoRoute | Self::Decode { .. } | Self::Build { .. } => {
                false
            }
        }
    }
}

/// Which end of the route is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Origin => f.write_str("origin"),
            Self::Destination => f.write_str("destination"),
        }
    }
}

/// Errors from [`crate::orchestrator::RouteOrchestrator::calculate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("invalid coordinate: {0}")]
    Parse(#[from] ParseError),

    #[error("{0} is required before a route can be calculated")]
    MissingEndpoint(Endpoint),

    #[error(transparent)]
    Provider(#[from] RoutingProviderError),

    /// A newer calculation started before this one finished; its result was
    /// discarded.
    #[error("route request #{seq} was superseded by request #{latest}")]
    Superseded { seq: u64, latest: u64 },
}
