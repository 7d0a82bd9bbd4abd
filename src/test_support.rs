//! Test doubles for the routing and rendering seams.
//!
//! [`StubRoutingProvider`] answers from a script instead of a routing
//! service and records every request it receives. [`RecordingRenderer`]
//! keeps every scene it is asked to draw.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::RoutingProviderError;
use crate::polyline::Polyline;
use crate::presentation::MapScene;
use crate::route::{RouteCandidate, RouteRequest};
use crate::traits::{MapRenderer, RoutingProvider};

type Reply = Result<Vec<RouteCandidate>, RoutingProviderError>;

/// Scripted `RoutingProvider`.
///
/// Replies are consumed in order; the last one repeats once the script runs
/// out. Clones share the same script and request log.
#[derive(Debug, Clone)]
pub struct StubRoutingProvider {
    inner: Arc<Mutex<StubState>>,
}

#[derive(Debug)]
struct StubState {
    replies: VecDeque<StubReply>,
    requests: Vec<RouteRequest>,
}

#[derive(Debug, Clone)]
enum StubReply {
    /// One straight-line candidate through the request points.
    Distance(f64),
    Fixed(Reply),
}

impl StubReply {
    fn resolve(&self, request: &RouteRequest) -> Reply {
        match self {
            Self::Distance(meters) => Ok(vec![RouteCandidate {
                geometry: Polyline::new(request.points()),
                distance_m: *meters,
                duration_s: None,
            }]),
            Self::Fixed(reply) => reply.clone(),
        }
    }
}

/// A provider paired with a per-call delay.
#[derive(Debug, Clone)]
pub struct DelayedProvider<P> {
    provider: P,
    delay: Duration,
}

impl StubRoutingProvider {
    fn from_replies(replies: impl IntoIterator<Item = StubReply>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StubState {
                replies: replies.into_iter().collect(),
                requests: Vec::new(),
            })),
        }
    }

    /// Always answers with one candidate of the given length whose geometry
    /// is the requested points.
    pub fn with_distance(meters: f64) -> Self {
        Self::from_replies([StubReply::Distance(meters)])
    }

    /// Answers with one candidate per distance, per call, in order.
    pub fn with_distances(meters: impl IntoIterator<Item = f64>) -> Self {
        Self::from_replies(meters.into_iter().map(StubReply::Distance))
    }

    /// Always answers with the given candidates.
    pub fn with_candidates(candidates: Vec<RouteCandidate>) -> Self {
        Self::from_replies([StubReply::Fixed(Ok(candidates))])
    }

    /// Always fails with the given error.
    pub fn with_error(error: RoutingProviderError) -> Self {
        Self::from_replies([StubReply::Fixed(Err(error))])
    }

    /// Answers with each reply in turn.
    pub fn scripted(replies: Vec<Reply>) -> Self {
        Self::from_replies(replies.into_iter().map(StubReply::Fixed))
    }

    /// Wraps the provider so every call waits `delay` before answering.
    pub fn delayed(self, delay: Duration) -> DelayedProvider<Self> {
        DelayedProvider {
            provider: self,
            delay,
        }
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<RouteRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StubState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_reply(&self, request: &RouteRequest) -> Reply {
        let mut state = self.lock();
        state.requests.push(request.clone());
        let reply = if state.replies.len() > 1 {
            state.replies.pop_front()
        } else {
            state.replies.front().cloned()
        };
        match reply {
            Some(reply) => reply.resolve(request),
            None => Err(RoutingProviderError::NoRoute),
        }
    }
}

#[async_trait]
impl RoutingProvider for StubRoutingProvider {
    async fn route(&self, request: &RouteRequest) -> Reply {
        self.next_reply(request)
    }
}

impl<P> DelayedProvider<P> {
    pub fn inner(&self) -> &P {
        &self.provider
    }
}

impl DelayedProvider<StubRoutingProvider> {
    pub fn requests(&self) -> Vec<RouteRequest> {
        self.provider.requests()
    }
}

#[async_trait]
impl<P: RoutingProvider> RoutingProvider for DelayedProvider<P> {
    async fn route(&self, request: &RouteRequest) -> Reply {
        // Resolve first so the request is logged even if the call is
        // cancelled while sleeping.
        let reply = self.provider.route(request).await;
        tokio::time::sleep(self.delay).await;
        reply
    }
}

/// `MapRenderer` that keeps every scene it draws.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub scenes: Vec<MapScene>,
}

impl MapRenderer for RecordingRenderer {
    type Error = Infallible;

    fn draw(&mut self, scene: &MapScene) -> Result<(), Self::Error> {
        self.scenes.push(scene.clone());
        Ok(())
    }
}
