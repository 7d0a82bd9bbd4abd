//! Application state and the store that owns it.
//!
//! Every transition runs inside a single `watch` update, so observers never
//! see a half-applied change: the route result and its formatted distance are
//! always replaced together. Observers can [`StateStore::subscribe`] and
//! re-render whenever a transition lands.

use std::sync::Arc;

use tokio::sync::watch;

use crate::coordinate::{Coordinate, ParseError};
use crate::error::{Endpoint, RouteError};
use crate::route::{RouteRequest, RouteResult, format_distance_km};
use crate::waypoints::WaypointList;

/// Snapshot of everything the form shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationState {
    pub origin: Option<Coordinate>,
    pub destination: Option<Coordinate>,
    pub waypoints: WaypointList,
    /// Stop text typed but not yet added to the waypoint list.
    pub pending_stop: String,
    pub result: Option<RouteResult>,
    /// Formatted distance of `result`, empty until a route has been applied.
    pub display_distance: String,
    /// Message of the latest failed calculation, cleared on success.
    pub last_error: Option<String>,
    /// Sequence number of the most recently started route request.
    pub request_seq: u64,
}

/// Shared handle to the single [`ApplicationState`] of a session.
#[derive(Debug, Clone)]
pub struct StateStore {
    tx: Arc<watch::Sender<ApplicationState>>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ApplicationState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> ApplicationState {
        self.tx.borrow().clone()
    }

    /// Receiver notified after every transition.
    pub fn subscribe(&self) -> watch::Receiver<ApplicationState> {
        self.tx.subscribe()
    }

    /// Sets the origin from form text. Blank text clears it.
    pub fn set_origin(&self, text: &str) -> Result<(), ParseError> {
        let origin = parse_optional(text)?;
        self.tx.send_if_modified(|state| replace(&mut state.origin, origin));
        Ok(())
    }

    /// Sets the destination from form text. Blank text clears it.
    pub fn set_destination(&self, text: &str) -> Result<(), ParseError> {
        let destination = parse_optional(text)?;
        self.tx
            .send_if_modified(|state| replace(&mut state.destination, destination));
        Ok(())
    }

    /// Records stop text that has been typed but not yet added.
    pub fn set_pending_stop(&self, text: &str) {
        self.tx.send_if_modified(|state| {
            if state.pending_stop == text {
                return false;
            }
            state.pending_stop = text.to_string();
            true
        });
    }

    /// Parses `text` and appends it to the waypoints, clearing the pending
    /// stop input on success. Blank text does nothing.
    pub fn add_stop(&self, text: &str) -> Result<Option<Coordinate>, ParseError> {
        let mut outcome = Ok(None);
        self.tx.send_if_modified(|state| {
            outcome = state.waypoints.add_stop(text);
            match outcome {
                Ok(Some(_)) => {
                    state.pending_stop.clear();
                    true
                }
                _ => false,
            }
        });
        outcome
    }

    /// Adds whatever is in the pending stop input, see [`Self::add_stop`].
    pub fn commit_pending_stop(&self) -> Result<Option<Coordinate>, ParseError> {
        let mut outcome = Ok(None);
        self.tx.send_if_modified(|state| {
            outcome = commit_pending(state);
            matches!(outcome, Ok(Some(_)))
        });
        outcome
    }

    pub fn clear_waypoints(&self) {
        self.tx.send_if_modified(|state| {
            if state.waypoints.is_empty() {
                return false;
            }
            state.waypoints.clear();
            true
        });
    }

    /// Returns to the initial empty form. The request counter keeps
    /// increasing so that in-flight requests are treated as stale.
    pub fn reset(&self) {
        self.tx.send_modify(|state| {
            let request_seq = state.request_seq + 1;
            *state = ApplicationState {
                request_seq,
                ..ApplicationState::default()
            };
        });
    }

    /// Validates the endpoints, commits the pending stop and starts a new
    /// request, all in one transition.
    ///
    /// On error nothing changes.
    pub fn prepare_request(&self) -> Result<(u64, RouteRequest), RouteError> {
        let mut outcome = Err(RouteError::MissingEndpoint(Endpoint::Origin));
        self.tx.send_if_modified(|state| {
            outcome = begin_request(state);
            outcome.is_ok()
        });
        outcome
    }

    /// Applies a successful result if `seq` is still the latest request.
    ///
    /// The result and its formatted distance are replaced together.
    pub fn apply_route_result(&self, seq: u64, result: RouteResult) -> Result<(), RouteError> {
        let mut outcome = Ok(());
        self.tx.send_if_modified(|state| {
            if state.request_seq != seq {
                outcome = Err(RouteError::Superseded {
                    seq,
                    latest: state.request_seq,
                });
                return false;
            }
            state.display_distance = format_distance_km(result.total_distance_m);
            state.result = Some(result);
            state.last_error = None;
            true
        });
        outcome
    }

    /// Records a failed request if `seq` is still the latest. The previous
    /// result and distance are kept.
    pub fn apply_route_error(&self, seq: u64, error: &RouteError) -> Result<(), RouteError> {
        let mut outcome = Ok(());
        self.tx.send_if_modified(|state| {
            if state.request_seq != seq {
                outcome = Err(RouteError::Superseded {
                    seq,
                    latest: state.request_seq,
                });
                return false;
            }
            state.last_error = Some(error.to_string());
            true
        });
        outcome
    }
}

fn parse_optional(text: &str) -> Result<Option<Coordinate>, ParseError> {
    if text.trim().is_empty() {
        Ok(None)
    } else {
        Coordinate::parse(text).map(Some)
    }
}

fn replace(slot: &mut Option<Coordinate>, value: Option<Coordinate>) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn commit_pending(state: &mut ApplicationState) -> Result<Option<Coordinate>, ParseError> {
    let added = state.waypoints.add_stop(&state.pending_stop)?;
    if added.is_some() {
        state.pending_stop.clear();
    }
    Ok(added)
}

fn begin_request(state: &mut ApplicationState) -> Result<(u64, RouteRequest), RouteError> {
    let origin = state
        .origin
        .ok_or(RouteError::MissingEndpoint(Endpoint::Origin))?;
    let destination = state
        .destination
        .ok_or(RouteError::MissingEndpoint(Endpoint::Destination))?;

    commit_pending(state)?;
    state.request_seq += 1;

    let request = RouteRequest::new(origin, destination, state.waypoints.as_slice().to_vec());
    Ok((state.request_seq, request))
}
