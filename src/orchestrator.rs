//! Turns a "calculate" action into one routing request and applies its
//! outcome to the [`StateStore`].
//!
//! A calculation:
//!
//! 1. validates the endpoints, commits any pending stop text and starts a new
//!    request in a single store transition;
//! 2. calls the [`RoutingProvider`], bounded by a timeout and retried on
//!    transient failures;
//! 3. applies the provider's first-ranked route, or records the failure while
//!    keeping the last good result.
//!
//! Requests are latest-wins. Starting a new calculation (or resetting the
//! store) cancels the in-flight provider call of the previous one, and a
//! stale result is never applied over a newer request.

use std::time::Duration;

use tokio::sync::watch;

use crate::error::{RouteError, RoutingProviderError};
use crate::route::{RouteCandidate, RouteRequest, RouteResult};
use crate::state::{ApplicationState, StateStore};
use crate::traits::RoutingProvider;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_ATTEMPTS: u32 = 2;
const DEFAULT_RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorOptions {
    /// Upper bound for a single provider call.
    pub timeout: Duration,
    /// Total attempts per calculation, including the first. Only transient
    /// failures are retried.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub retry_delay: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

pub struct RouteOrchestrator<P> {
    provider: P,
    store: StateStore,
    options: OrchestratorOptions,
}

impl<P: RoutingProvider> RouteOrchestrator<P> {
    pub fn new(provider: P, store: StateStore) -> Self {
        Self {
            provider,
            store,
            options: OrchestratorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: OrchestratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Calculates the route for the current form state.
    ///
    /// Returns the applied result. Nothing is submitted when an endpoint is
    /// missing or the pending stop text is malformed.
    pub async fn calculate(&self) -> Result<RouteResult, RouteError> {
        let (seq, request) = self.store.prepare_request()?;
        tracing::debug!(
            seq,
            waypoints = request.waypoints().len(),
            "submitting route request"
        );

        let mut updates = self.store.subscribe();
        let outcome = tokio::select! {
            outcome = self.request_with_retry(&request) => outcome,
            latest = superseded(&mut updates, seq) => {
                tracing::debug!(seq, latest, "route request superseded while in flight");
                return Err(RouteError::Superseded { seq, latest });
            }
        };

        match outcome.and_then(select_first) {
            Ok(result) => {
                self.store
                    .apply_route_result(seq, result.clone())
                    .inspect_err(|err| tracing::warn!(error = %err, "discarding stale route"))?;
                tracing::info!(
                    seq,
                    distance = %result.display_distance(),
                    points = result.geometry.points().len(),
                    "route applied"
                );
                Ok(result)
            }
            Err(error) => {
                let error = RouteError::Provider(error);
                tracing::warn!(seq, error = %error, "route calculation failed");
                self.store.apply_route_error(seq, &error)?;
                Err(error)
            }
        }
    }

    async fn request_with_retry(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<RouteCandidate>, RoutingProviderError> {
        let max_attempts = self.options.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome =
                match tokio::time::timeout(self.options.timeout, self.provider.route(request)).await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(RoutingProviderError::Timeout {
                        after: self.options.timeout,
                    }),
                };

            match outcome {
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    tracing::warn!(attempt, max_attempts, error = %err, "transient routing failure, retrying");
                    attempt += 1;
                    tokio::time::sleep(self.options.retry_delay).await;
                }
                other => return other,
            }
        }
    }
}

/// The provider's first-ranked candidate is authoritative.
fn select_first(candidates: Vec<RouteCandidate>) -> Result<RouteResult, RoutingProviderError> {
    candidates
        .into_iter()
        .next()
        .map(RouteResult::from)
        .ok_or(RoutingProviderError::NoRoute)
}

/// Resolves with the newer sequence number once `seq` stops being the latest
/// request. Never resolves if the store goes away.
async fn superseded(updates: &mut watch::Receiver<ApplicationState>, seq: u64) -> u64 {
    let latest = updates
        .wait_for(|state| state.request_seq != seq)
        .await
        .map(|state| state.request_seq);
    match latest {
        Ok(latest) => latest,
        Err(_) => std::future::pending().await,
    }
}
