//! Test fixtures for waypoint-router.
//!
//! Provides real Varanasi locations and helpers for building a ready form.

#![allow(dead_code)]

pub mod varanasi_locations;

pub use varanasi_locations::*;

use waypoint_router::state::StateStore;

/// A store with origin and destination already filled in.
pub fn ready_store(origin: &Location, destination: &Location) -> StateStore {
    let store = StateStore::new();
    store.set_origin(&origin.text()).expect("valid origin");
    store
        .set_destination(&destination.text())
        .expect("valid destination");
    store
}
