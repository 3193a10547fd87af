// In-memory collaborators for service tests
use crate::application::ports::{
    AddressAutocomplete, AutocompleteHandle, GeolocationSensor, MapDisplay, MapHandle, MapOptions,
    MarkerHandle, PlaceGeometry, PlaceResult, ReportPublisher, ReverseGeocoder,
};
use crate::domain::coordinate::Coordinate;
use crate::domain::report::ReportRecord;
use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingMap {
    state: Mutex<MapCalls>,
}

#[derive(Default)]
struct MapCalls {
    options: Option<MapOptions>,
    center: Option<Coordinate>,
    marker: Option<Coordinate>,
    resizes: usize,
}

impl RecordingMap {
    pub fn options(&self) -> Option<MapOptions> {
        self.state.lock().unwrap().options.clone()
    }

    pub fn center(&self) -> Option<Coordinate> {
        self.state.lock().unwrap().center
    }

    pub fn marker(&self) -> Option<Coordinate> {
        self.state.lock().unwrap().marker
    }

    pub fn resizes(&self) -> usize {
        self.state.lock().unwrap().resizes
    }
}

impl MapDisplay for RecordingMap {
    fn create(&self, center: Coordinate, options: &MapOptions) -> anyhow::Result<MapHandle> {
        let mut state = self.state.lock().unwrap();
        state.center = Some(center);
        state.options = Some(options.clone());
        Ok(MapHandle(1))
    }

    fn set_center(&self, _map: MapHandle, center: Coordinate) -> anyhow::Result<()> {
        self.state.lock().unwrap().center = Some(center);
        Ok(())
    }

    fn create_marker(&self, _map: MapHandle, position: Coordinate) -> anyhow::Result<MarkerHandle> {
        self.state.lock().unwrap().marker = Some(position);
        Ok(MarkerHandle(1))
    }

    fn set_marker_position(&self, _marker: MarkerHandle, position: Coordinate) -> anyhow::Result<()> {
        self.state.lock().unwrap().marker = Some(position);
        Ok(())
    }

    fn trigger_resize(&self, _map: MapHandle) -> anyhow::Result<()> {
        self.state.lock().unwrap().resizes += 1;
        Ok(())
    }
}

pub enum FakeSensor {
    At(Coordinate),
    Fails,
}

#[async_trait]
impl GeolocationSensor for FakeSensor {
    async fn current_position(&self, _client: Option<IpAddr>) -> anyhow::Result<Coordinate> {
        match self {
            FakeSensor::At(coordinate) => Ok(*coordinate),
            FakeSensor::Fails => anyhow::bail!("User denied Geolocation"),
        }
    }
}

pub enum FakeGeocoder {
    Address(String),
    NoMatch,
    Fails,
}

#[async_trait]
impl ReverseGeocoder for FakeGeocoder {
    async fn lookup(&self, _coordinate: Coordinate) -> anyhow::Result<Option<String>> {
        match self {
            FakeGeocoder::Address(address) => Ok(Some(address.clone())),
            FakeGeocoder::NoMatch => Ok(None),
            FakeGeocoder::Fails => anyhow::bail!("ZERO_RESULTS"),
        }
    }
}

#[derive(Default)]
pub struct FakeAutocomplete {
    attached: Mutex<Option<(String, String)>>,
}

impl FakeAutocomplete {
    pub fn attached(&self) -> Option<(String, String)> {
        self.attached.lock().unwrap().clone()
    }
}

#[async_trait]
impl AddressAutocomplete for FakeAutocomplete {
    fn attach(&self, input_field: &str, country: &str) -> anyhow::Result<AutocompleteHandle> {
        *self.attached.lock().unwrap() = Some((input_field.to_string(), country.to_string()));
        Ok(AutocompleteHandle(7))
    }

    async fn suggest(&self, _handle: AutocompleteHandle, query: &str) -> anyhow::Result<Vec<PlaceResult>> {
        Ok(vec![PlaceResult {
            formatted_address: Some(format!("{}, India", query)),
            geometry: Some(PlaceGeometry {
                location: Coordinate::new(15.2993, 74.124),
            }),
        }])
    }
}

#[derive(Default)]
pub struct CollectingPublisher {
    pub published: Mutex<Vec<ReportRecord>>,
    pub fail: bool,
}

#[async_trait]
impl ReportPublisher for CollectingPublisher {
    async fn publish(&self, record: &ReportRecord) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("endpoint unavailable");
        }
        self.published.lock().unwrap().push(record.clone());
        Ok(())
    }
}
