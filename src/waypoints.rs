//! Ordered intermediate stops.

use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, ParseError};

/// Intermediate stops in the order the user entered them.
///
/// Order defines the visiting order along the route and is never changed;
/// stops are only ever appended, or dropped all at once with [`clear`].
///
/// [`clear`]: WaypointList::clear
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointList {
    stops: Vec<Coordinate>,
}

impl WaypointList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `text` and appends it as the last stop.
    ///
    /// Blank text is ignored and returns `Ok(None)`. Malformed text leaves
    /// the list untouched.
    pub fn add_stop(&mut self, text: &str) -> Result<Option<Coordinate>, ParseError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let stop = Coordinate::parse(text)?;
        self.stops.push(stop);
        Ok(Some(stop))
    }

    pub fn push(&mut self, stop: Coordinate) {
        self.stops.push(stop);
    }

    pub fn clear(&mut self) {
        self.stops.clear();
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.stops.iter()
    }

    pub fn as_slice(&self) -> &[Coordinate] {
        &self.stops
    }
}

impl<'a> IntoIterator for &'a WaypointList {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
