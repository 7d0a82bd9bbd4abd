//! Real Varanasi locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    /// Form text as a user would type it.
    pub fn text(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

pub const CANTONMENT_STATION: Location = Location::new("Varanasi Junction", 25.3270, 82.9870);
pub const DASHASHWAMEDH_GHAT: Location = Location::new("Dashashwamedh Ghat", 25.3068, 83.0104);
pub const BHU_MAIN_GATE: Location = Location::new("BHU Lanka Gate", 25.2775, 82.9995);

pub const STOPS: &[Location] = &[
    Location::new("Godowlia Chowk", 25.3095, 83.0057),
    Location::new("Kashi Vishwanath", 25.3109, 83.0107),
    Location::new("Assi Ghat", 25.2890, 83.0065),
    Location::new("Durga Temple", 25.2887, 82.9999),
];
