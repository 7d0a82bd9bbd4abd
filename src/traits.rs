//! Seams to the external collaborators.
//!
//! Route computation and map drawing both live outside this crate. These
//! traits are the whole contract the rest of the crate relies on; concrete
//! adapters implement them.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RoutingProviderError;
use crate::presentation::MapScene;
use crate::route::{RouteCandidate, RouteRequest};

/// Computes road routes through an ordered list of points.
///
/// One call is one request: it resolves exactly once, either with ranked
/// candidates (best first) or with an error.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn route(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<RouteCandidate>, RoutingProviderError>;
}

#[async_trait]
impl<P: RoutingProvider + ?Sized> RoutingProvider for Box<P> {
    async fn route(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<RouteCandidate>, RoutingProviderError> {
        (**self).route(request).await
    }
}

#[async_trait]
impl<P: RoutingProvider + ?Sized> RoutingProvider for Arc<P> {
    async fn route(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<RouteCandidate>, RoutingProviderError> {
        (**self).route(request).await
    }
}

/// Draws a map viewport with markers and a route overlay.
pub trait MapRenderer {
    type Error;

    fn draw(&mut self, scene: &MapScene) -> Result<(), Self::Error>;
}
