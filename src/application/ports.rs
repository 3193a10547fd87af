// Capability traits for the collaborators the page provides
use crate::domain::coordinate::Coordinate;
use crate::domain::report::ReportRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MapHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AutocompleteHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    pub zoom: u8,
    pub gesture_handling: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            zoom: 14,
            gesture_handling: "greedy".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaceGeometry {
    pub location: Coordinate,
}

/// A suggestion picked from the address autocomplete
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    #[serde(default)]
    pub formatted_address: Option<String>,
    /// Absent when the user pressed enter without picking a real suggestion
    #[serde(default)]
    pub geometry: Option<PlaceGeometry>,
}

/// Map widget rendering the current focus and its marker
pub trait MapDisplay: Send + Sync {
    fn create(&self, center: Coordinate, options: &MapOptions) -> anyhow::Result<MapHandle>;

    fn set_center(&self, map: MapHandle, center: Coordinate) -> anyhow::Result<()>;

    fn create_marker(&self, map: MapHandle, position: Coordinate) -> anyhow::Result<MarkerHandle>;

    fn set_marker_position(&self, marker: MarkerHandle, position: Coordinate) -> anyhow::Result<()>;

    /// Tell the widget its container changed size
    fn trigger_resize(&self, map: MapHandle) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AddressAutocomplete: Send + Sync {
    /// Bind suggestions to an input field, restricted to one country (ISO 3166-1 alpha-2)
    fn attach(&self, input_field: &str, country: &str) -> anyhow::Result<AutocompleteHandle>;

    /// Suggestions for what the user has typed so far
    async fn suggest(&self, handle: AutocompleteHandle, query: &str) -> anyhow::Result<Vec<PlaceResult>>;
}

/// Single-shot device position read
#[async_trait]
pub trait GeolocationSensor: Send + Sync {
    /// `client` is the address of the device asking, when known
    async fn current_position(&self, client: Option<IpAddr>) -> anyhow::Result<Coordinate>;
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Formatted address for a coordinate, `None` when nothing matched
    async fn lookup(&self, coordinate: Coordinate) -> anyhow::Result<Option<String>>;
}

/// Where accepted reports go
#[async_trait]
pub trait ReportPublisher: Send + Sync {
    async fn publish(&self, record: &ReportRecord) -> anyhow::Result<()>;
}
