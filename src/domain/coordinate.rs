// Coordinate domain model
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latitude of India's centroid, the map focus before anything is resolved
pub const DEFAULT_LATITUDE: f64 = 20.5937;
/// Longitude of India's centroid
pub const DEFAULT_LONGITUDE: f64 = 78.9629;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Text used for the location field when no address could be found
    pub fn to_location_text(&self) -> String {
        self.to_string()
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lat: {}, Lng: {}",
            unsigned_zero(self.latitude),
            unsigned_zero(self.longitude)
        )
    }
}

/// Negative zero prints as `0`
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_india_centroid() {
        let center = Coordinate::default();
        assert_eq!(center.latitude, 20.5937);
        assert_eq!(center.longitude, 78.9629);
    }

    #[test]
    fn test_location_text() {
        let coord = Coordinate::new(12.9716, 77.5946);
        assert_eq!(coord.to_location_text(), "Lat: 12.9716, Lng: 77.5946");

        let coord = Coordinate::new(-33.0, 151.25);
        assert_eq!(coord.to_location_text(), "Lat: -33, Lng: 151.25");
    }

    #[test]
    fn test_location_text_drops_zero_sign() {
        let coord = Coordinate::new(-0.0, 0.5);
        assert_eq!(coord.to_location_text(), "Lat: 0, Lng: 0.5");
    }
}
