//! What the form shows, derived from a state snapshot.
//!
//! [`View`] holds the text parts (field values, stop list, distance, summary
//! sentence) and a [`MapScene`] describing what the map collaborator should
//! draw. Nothing here computes routes; it only formats and decides what is
//! visible.

use std::convert::Infallible;
use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};

use crate::coordinate::Coordinate;
use crate::polyline::{BoundingBox, Polyline};
use crate::state::ApplicationState;
use crate::traits::MapRenderer;

/// Map center used before any route is shown.
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 25.3176,
    lon: 82.9739,
};
pub const DEFAULT_ZOOM: u8 = 13;
pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

const ROUTE_COLOR: &str = "#6FA1EC";
const ROUTE_WEIGHT: u32 = 4;

/// Static map settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub center: Coordinate,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub route_style: LineStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            tile_url: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            route_style: LineStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub weight: u32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: ROUTE_COLOR.to_string(),
            weight: ROUTE_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "lowercase")]
pub enum MarkerKind {
    Center,
    Origin,
    Destination,
    /// Zero-based position in the waypoint list.
    Stop(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Coordinate,
    pub kind: MarkerKind,
}

/// The route line drawn over the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub geometry: Polyline,
    pub style: LineStyle,
}

/// Everything the map collaborator needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub center: Coordinate,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub markers: Vec<Marker>,
    pub route: Option<Overlay>,
    /// Viewport to fit so the whole route is visible.
    pub fit_bounds: Option<BoundingBox>,
}

impl MapScene {
    /// Endpoint and stop markers appear only once a route has been applied;
    /// the center marker is always present.
    pub fn from_state(state: &ApplicationState, config: &MapConfig) -> Self {
        let mut markers = vec![Marker {
            position: config.center,
            kind: MarkerKind::Center,
        }];
        let mut route = None;
        let mut fit_bounds = None;

        if let Some(result) = &state.result {
            markers.extend(state.origin.map(|position| Marker {
                position,
                kind: MarkerKind::Origin,
            }));
            markers.extend(state.destination.map(|position| Marker {
                position,
                kind: MarkerKind::Destination,
            }));
            markers.extend(state.waypoints.iter().enumerate().map(|(index, &position)| {
                Marker {
                    position,
                    kind: MarkerKind::Stop(index),
                }
            }));

            if !result.geometry.is_empty() {
                fit_bounds = result.geometry.bounds();
                route = Some(Overlay {
                    geometry: result.geometry.clone(),
                    style: config.route_style.clone(),
                });
            }
        }

        Self {
            center: config.center,
            zoom: config.zoom,
            tile_url: config.tile_url.clone(),
            attribution: config.attribution.clone(),
            markers,
            route,
            fit_bounds,
        }
    }
}

/// Text content of the form plus the map scene.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub origin: String,
    pub destination: String,
    pub pending_stop: String,
    pub waypoints: Vec<String>,
    pub distance: String,
    pub summary: Option<String>,
    pub error: Option<String>,
    pub scene: MapScene,
}

impl View {
    pub fn from_state(state: &ApplicationState, config: &MapConfig) -> Self {
        Self {
            origin: label(state.origin),
            destination: label(state.destination),
            pending_stop: state.pending_stop.clone(),
            waypoints: state.waypoints.iter().map(ToString::to_string).collect(),
            distance: state.display_distance.clone(),
            summary: summary_sentence(state),
            error: state.last_error.clone(),
            scene: MapScene::from_state(state, config),
        }
    }
}

fn label(coordinate: Option<Coordinate>) -> String {
    coordinate.map(|c| c.to_string()).unwrap_or_default()
}

/// The sentence shown under the distance once origin, destination and
/// distance are all known.
pub fn summary_sentence(state: &ApplicationState) -> Option<String> {
    let origin = state.origin?;
    let destination = state.destination?;
    if state.display_distance.is_empty() {
        return None;
    }
    Some(format!(
        "The distance between {origin} and {destination} via the selected route is {}.",
        state.display_distance
    ))
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Origin:      {}", self.origin)?;
        if self.waypoints.is_empty() {
            writeln!(f, "Stops:       -")?;
        } else {
            for (index, stop) in self.waypoints.iter().enumerate() {
                let heading = if index == 0 { "Stops:" } else { "" };
                writeln!(f, "{heading:<12} {}. {stop}", index + 1)?;
            }
        }
        if !self.pending_stop.is_empty() {
            writeln!(f, "Stop input:  {}", self.pending_stop)?;
        }
        writeln!(f, "Destination: {}", self.destination)?;
        write!(f, "Distance:    {}", self.distance)?;
        if let Some(summary) = &self.summary {
            write!(f, "\n{summary}")?;
        }
        if let Some(error) = &self.error {
            write!(f, "\nError: {error}")?;
        }
        Ok(())
    }
}

/// Plain-text form summary for the terminal.
pub fn render_text(view: &View) -> String {
    view.to_string()
}

/// Renders scenes as a GeoJSON `FeatureCollection`.
///
/// Markers become `Point` features, the route a `LineString` carrying its
/// style. Only the most recent scene is kept.
#[derive(Debug, Clone, Default)]
pub struct GeoJsonRenderer {
    collection: Option<Value>,
}

impl GeoJsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last drawn scene, if any.
    pub fn collection(&self) -> Option<&Value> {
        self.collection.as_ref()
    }

    pub fn into_collection(self) -> Option<Value> {
        self.collection
    }
}

impl MapRenderer for GeoJsonRenderer {
    type Error = Infallible;

    fn draw(&mut self, scene: &MapScene) -> Result<(), Self::Error> {
        self.collection = Some(scene_to_geojson(scene));
        Ok(())
    }
}

fn position(coordinate: Coordinate) -> Value {
    json!([coordinate.lon, coordinate.lat])
}

fn scene_to_geojson(scene: &MapScene) -> Value {
    let mut features: Vec<Value> = scene
        .markers
        .iter()
        .map(|marker| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": position(marker.position) },
                "properties": { "marker": marker.kind },
            })
        })
        .collect();

    if let Some(route) = &scene.route {
        let coordinates: Vec<Value> = route.geometry.points().iter().copied().map(position).collect();
        features.push(json!({
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": coordinates },
            "properties": { "stroke": route.style.color, "stroke-width": route.style.weight },
        }));
    }

    let mut collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    if let Some(bounds) = scene.fit_bounds {
        collection["bbox"] = json!([
            bounds.south_west.lon,
            bounds.south_west.lat,
            bounds.north_east.lon,
            bounds.north_east.lat
        ]);
    }
    collection
}
