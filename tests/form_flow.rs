//! End-to-end form flows: state store, orchestrator and presentation wired
//! together with a scripted routing provider.

mod fixtures;

use std::time::Duration;

use rstest::rstest;

use waypoint_router::coordinate::Coordinate;
use waypoint_router::error::{Endpoint, RouteError, RoutingProviderError};
use waypoint_router::haversine::HaversineRouter;
use waypoint_router::orchestrator::{OrchestratorOptions, RouteOrchestrator};
use waypoint_router::presentation::{MapConfig, MarkerKind, View};
use waypoint_router::state::StateStore;
use waypoint_router::test_support::{RecordingRenderer, StubRoutingProvider};
use waypoint_router::traits::MapRenderer;

use fixtures::{BHU_MAIN_GATE, CANTONMENT_STATION, DASHASHWAMEDH_GHAT, Location, STOPS, ready_store};

fn coord(location: &Location) -> Coordinate {
    Coordinate {
        lat: location.lat,
        lon: location.lon,
    }
}

#[tokio::test]
async fn route_distance_is_shown_with_two_decimals() {
    let store = ready_store(&CANTONMENT_STATION, &DASHASHWAMEDH_GHAT);
    let orchestrator = RouteOrchestrator::new(StubRoutingProvider::with_distance(2345.0), store.clone());

    let result = orchestrator.calculate().await.expect("route");

    assert_eq!(result.total_distance_m, 2345.0);
    let view = View::from_state(&store.snapshot(), &MapConfig::default());
    assert_eq!(view.distance, "2.35 km");
    assert_eq!(
        view.summary.as_deref(),
        Some("The distance between 25.327,82.987 and 25.3068,83.0104 via the selected route is 2.35 km.")
    );
    assert_eq!(view.error, None);
}

#[tokio::test]
async fn missing_destination_sends_no_request() {
    let provider = StubRoutingProvider::with_distance(2345.0);
    let store = StateStore::new();
    store.set_origin(&CANTONMENT_STATION.text()).expect("valid origin");
    let orchestrator = RouteOrchestrator::new(provider.clone(), store.clone());

    let err = orchestrator.calculate().await.expect_err("incomplete form");

    assert_eq!(err, RouteError::MissingEndpoint(Endpoint::Destination));
    assert!(provider.requests().is_empty());
    assert!(store.snapshot().display_distance.is_empty());
}

#[tokio::test]
async fn typed_stop_is_committed_before_the_request() {
    let provider = StubRoutingProvider::with_distance(5000.0);
    let store = ready_store(&CANTONMENT_STATION, &DASHASHWAMEDH_GHAT);
    store.set_pending_stop("25.31,82.98");
    let orchestrator = RouteOrchestrator::new(provider.clone(), store.clone());

    orchestrator.calculate().await.expect("route");

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].points(),
        vec![
            coord(&CANTONMENT_STATION),
            Coordinate { lat: 25.31, lon: 82.98 },
            coord(&DASHASHWAMEDH_GHAT),
        ]
    );
    let state = store.snapshot();
    assert!(state.pending_stop.is_empty());
    assert_eq!(state.waypoints.len(), 1);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(4)]
#[tokio::test]
async fn stops_are_routed_in_the_order_added(#[case] count: usize) {
    let provider = StubRoutingProvider::with_distance(1000.0);
    let store = ready_store(&CANTONMENT_STATION, &BHU_MAIN_GATE);
    for stop in &STOPS[..count] {
        store.add_stop(&stop.text()).expect("valid stop");
    }
    let orchestrator = RouteOrchestrator::new(provider.clone(), store);

    orchestrator.calculate().await.expect("route");

    let points = provider.requests()[0].points();
    assert_eq!(points.len(), count + 2);
    assert_eq!(points[0], coord(&CANTONMENT_STATION));
    assert_eq!(points[count + 1], coord(&BHU_MAIN_GATE));
    let middle: Vec<Coordinate> = STOPS[..count].iter().map(coord).collect();
    assert_eq!(&points[1..=count], middle.as_slice());
}

#[tokio::test]
async fn failed_calculation_keeps_previous_distance() {
    let provider = StubRoutingProvider::scripted(vec![
        Ok(vec![]),
        Err(RoutingProviderError::NoRoute),
    ]);
    let store = ready_store(&CANTONMENT_STATION, &DASHASHWAMEDH_GHAT);
    let first = RouteOrchestrator::new(StubRoutingProvider::with_distance(2345.0), store.clone());
    first.calculate().await.expect("route");
    let second = RouteOrchestrator::new(provider, store.clone());

    // Empty candidates then an explicit failure: both are errors.
    assert!(second.calculate().await.is_err());
    assert!(second.calculate().await.is_err());

    let state = store.snapshot();
    assert_eq!(state.display_distance, "2.35 km");
    assert!(state.result.is_some());
    assert!(state.last_error.is_some());
}

#[tokio::test]
async fn recalculating_unchanged_form_is_idempotent() {
    let store = ready_store(&CANTONMENT_STATION, &DASHASHWAMEDH_GHAT);
    store.add_stop(&STOPS[0].text()).expect("valid stop");
    let orchestrator = RouteOrchestrator::new(HaversineRouter::default(), store.clone());

    let first = orchestrator.calculate().await.expect("route");
    let distance = store.snapshot().display_distance;
    let second = orchestrator.calculate().await.expect("route");

    assert_eq!(first, second);
    assert_eq!(store.snapshot().display_distance, distance);
    assert_eq!(store.snapshot().waypoints.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn newer_calculation_supersedes_in_flight_one() {
    let provider = StubRoutingProvider::with_distances([1000.0, 2000.0]).delayed(Duration::from_secs(10));
    let store = ready_store(&CANTONMENT_STATION, &DASHASHWAMEDH_GHAT);
    let orchestrator = RouteOrchestrator::new(provider.clone(), store.clone());

    let (first, second) = tokio::join!(orchestrator.calculate(), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        orchestrator.calculate().await
    });

    assert_eq!(first, Err(RouteError::Superseded { seq: 1, latest: 2 }));
    assert_eq!(second.expect("latest wins").total_distance_m, 2000.0);
    assert_eq!(store.snapshot().display_distance, "2.00 km");
    assert_eq!(provider.requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn retries_are_bounded_by_max_attempts() {
    let provider = StubRoutingProvider::with_error(RoutingProviderError::Http {
        url: "http://osrm.test/route".to_string(),
        status: 503,
        message: "unavailable".to_string(),
    });
    let store = ready_store(&CANTONMENT_STATION, &DASHASHWAMEDH_GHAT);
    let orchestrator = RouteOrchestrator::new(provider.clone(), store).with_options(OrchestratorOptions {
        max_attempts: 3,
        ..OrchestratorOptions::default()
    });

    let err = orchestrator.calculate().await.expect_err("service down");

    assert!(matches!(
        err,
        RouteError::Provider(RoutingProviderError::Http { status: 503, .. })
    ));
    assert_eq!(provider.requests().len(), 3);
}

#[tokio::test]
async fn observers_see_result_and_distance_together() {
    let store = ready_store(&CANTONMENT_STATION, &DASHASHWAMEDH_GHAT);
    let mut updates = store.subscribe();
    let orchestrator = RouteOrchestrator::new(StubRoutingProvider::with_distance(2345.0), store.clone());

    orchestrator.calculate().await.expect("route");

    assert!(updates.has_changed().expect("store alive"));
    let seen = updates.borrow_and_update().clone();
    assert!(seen.result.is_some());
    assert_eq!(seen.display_distance, "2.35 km");
}

#[tokio::test]
async fn renderer_receives_markers_and_route_line() {
    let store = ready_store(&CANTONMENT_STATION, &BHU_MAIN_GATE);
    store.add_stop(&STOPS[2].text()).expect("valid stop");
    let orchestrator = RouteOrchestrator::new(StubRoutingProvider::with_distance(6100.0), store.clone());
    let mut renderer = RecordingRenderer::default();

    let config = MapConfig::default();
    let Ok(()) = renderer.draw(&View::from_state(&store.snapshot(), &config).scene);
    orchestrator.calculate().await.expect("route");
    let Ok(()) = renderer.draw(&View::from_state(&store.snapshot(), &config).scene);

    assert_eq!(renderer.scenes.len(), 2);
    assert_eq!(renderer.scenes[0].markers.len(), 1);
    assert!(renderer.scenes[0].route.is_none());

    let scene = &renderer.scenes[1];
    let kinds: Vec<MarkerKind> = scene.markers.iter().map(|marker| marker.kind).collect();
    assert_eq!(
        kinds,
        vec![MarkerKind::Center, MarkerKind::Origin, MarkerKind::Destination, MarkerKind::Stop(0)]
    );
    let route = scene.route.as_ref().expect("route line");
    assert_eq!(route.geometry.points().len(), 3);
    let bounds = scene.fit_bounds.expect("fit to route");
    assert_eq!(bounds.south_west.lat, BHU_MAIN_GATE.lat);
    assert_eq!(bounds.north_east.lat, CANTONMENT_STATION.lat);
}

#[tokio::test]
async fn reset_returns_to_an_empty_form() {
    let store = ready_store(&CANTONMENT_STATION, &DASHASHWAMEDH_GHAT);
    let orchestrator = RouteOrchestrator::new(StubRoutingProvider::with_distance(2345.0), store.clone());
    orchestrator.calculate().await.expect("route");

    store.reset();

    let view = View::from_state(&store.snapshot(), &MapConfig::default());
    assert!(view.origin.is_empty());
    assert!(view.distance.is_empty());
    assert_eq!(view.summary, None);
    assert!(view.scene.route.is_none());
}
