//! waypoint-router core
//!
//! Point-to-point route distance with optional intermediate stops: coordinate
//! parsing, a state store for the form, an orchestrator that asks a routing
//! provider for the route, and the presentation derived from the state.

pub mod coordinate;
pub mod waypoints;
pub mod route;
pub mod polyline;
pub mod error;
pub mod traits;
pub mod osrm;
pub mod haversine;
pub mod state;
pub mod orchestrator;
pub mod presentation;
pub mod config;
pub mod logging;

#[doc(hidden)]
pub mod test_support;
