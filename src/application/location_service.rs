// Location service - Keeps the map focus in sync with the resolved location
use crate::application::errors::ReportError;
use crate::application::page_session::PageSession;
use crate::application::ports::{
    AddressAutocomplete, AutocompleteHandle, GeolocationSensor, MapDisplay, MapHandle, MapOptions,
    MarkerHandle, PlaceResult, ReverseGeocoder,
};
use crate::domain::coordinate::Coordinate;
use crate::domain::form::ids;
use crate::domain::status::{self, StatusMessage};
use anyhow::Context;
use serde::Serialize;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Progress of the last live location request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectPhase {
    #[default]
    Idle,
    Detecting,
    Resolved,
    Denied,
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapView {
    pub map: MapHandle,
    pub marker: MarkerHandle,
}

pub struct LocationResolver {
    center: Mutex<Coordinate>,
    view: Mutex<Option<MapView>>,
    autocomplete_handle: Mutex<Option<AutocompleteHandle>>,
    phase: Mutex<DetectPhase>,
    session: PageSession,
    geocoder: Arc<dyn ReverseGeocoder>,
    display: Option<Arc<dyn MapDisplay>>,
    autocomplete: Option<Arc<dyn AddressAutocomplete>>,
    sensor: Option<Arc<dyn GeolocationSensor>>,
    map_options: MapOptions,
    country: String,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LocationResolver {
    pub fn new(session: PageSession, geocoder: Arc<dyn ReverseGeocoder>, center: Coordinate) -> Self {
        Self {
            center: Mutex::new(center),
            view: Mutex::new(None),
            autocomplete_handle: Mutex::new(None),
            phase: Mutex::new(DetectPhase::Idle),
            session,
            geocoder,
            display: None,
            autocomplete: None,
            sensor: None,
            map_options: MapOptions::default(),
            country: "in".to_string(),
        }
    }

    pub fn with_display(mut self, display: Arc<dyn MapDisplay>, options: MapOptions) -> Self {
        self.display = Some(display);
        self.map_options = options;
        self
    }

    pub fn with_autocomplete(mut self, autocomplete: Arc<dyn AddressAutocomplete>, country: &str) -> Self {
        self.autocomplete = Some(autocomplete);
        self.country = country.to_string();
        self
    }

    pub fn with_sensor(mut self, sensor: Arc<dyn GeolocationSensor>) -> Self {
        self.sensor = Some(sensor);
        self
    }

    pub fn current(&self) -> Coordinate {
        *lock(&self.center)
    }

    pub fn phase(&self) -> DetectPhase {
        *lock(&self.phase)
    }

    pub fn map_view(&self) -> Option<MapView> {
        *lock(&self.view)
    }

    /// Create the map and its marker at the current focus and bind autocomplete
    /// to the location field. Does nothing for a capability that isn't there.
    pub fn initialize_display(&self) -> anyhow::Result<()> {
        match &self.display {
            Some(display) => {
                let center = self.current();
                let map = display
                    .create(center, &self.map_options)
                    .context("Failed to create map")?;
                let marker = display
                    .create_marker(map, center)
                    .context("Failed to create map marker")?;
                *lock(&self.view) = Some(MapView { map, marker });
                tracing::info!(
                    "Map ready at {}, {} (zoom {})",
                    center.latitude,
                    center.longitude,
                    self.map_options.zoom
                );
            }
            None => tracing::debug!("No map surface, skipping map setup"),
        }

        if let Some(autocomplete) = &self.autocomplete {
            let handle = autocomplete
                .attach(ids::LOCATION, &self.country)
                .context("Failed to attach address autocomplete")?;
            *lock(&self.autocomplete_handle) = Some(handle);
            tracing::info!("Address autocomplete attached, country={}", self.country);
        }

        Ok(())
    }

    /// Move the focus. The caller guarantees a valid latitude/longitude.
    pub fn set_location(&self, latitude: f64, longitude: f64) {
        let center = Coordinate::new(latitude, longitude);
        *lock(&self.center) = center;

        let (Some(display), Some(view)) = (self.display.as_ref(), self.map_view()) else {
            return;
        };
        if let Err(e) = display.set_center(view.map, center) {
            tracing::warn!("Failed to re-center map: {:#}", e);
        }
        if let Err(e) = display.set_marker_position(view.marker, center) {
            tracing::warn!("Failed to move marker: {:#}", e);
        }
    }

    /// Returns whether the focus moved
    pub fn on_address_chosen(&self, place: &PlaceResult) -> bool {
        self.reset_phase();
        let Some(geometry) = place.geometry else {
            tracing::debug!("Chosen place has no geometry, ignoring");
            return false;
        };

        let location = geometry.location;
        self.set_location(location.latitude, location.longitude);
        true
    }

    pub async fn suggest_places(&self, query: &str) -> anyhow::Result<Vec<PlaceResult>> {
        let handle = *lock(&self.autocomplete_handle);
        match (&self.autocomplete, handle) {
            (Some(autocomplete), Some(handle)) => autocomplete.suggest(handle, query).await,
            _ => Ok(Vec::new()),
        }
    }

    /// Container resized: let the map relayout and keep the focus centered
    pub fn on_resize(&self) {
        self.reset_phase();
        let (Some(display), Some(view)) = (self.display.as_ref(), self.map_view()) else {
            return;
        };
        if let Err(e) = display.trigger_resize(view.map) {
            tracing::warn!("Map resize failed: {:#}", e);
        }
        if let Err(e) = display.set_center(view.map, self.current()) {
            tracing::warn!("Failed to re-center map: {:#}", e);
        }
    }

    /// Read the device position, move the map there and fill the location field
    /// with its address, or with the raw coordinate when no address is found.
    pub async fn detect_live_location(&self, client: Option<IpAddr>) -> Result<Coordinate, ReportError> {
        self.set_phase(DetectPhase::Detecting);
        self.session.set_status(StatusMessage::info(status::DETECTING));

        let Some(sensor) = self.sensor.as_ref() else {
            return Err(self.fail_detection(ReportError::GeolocationUnsupported, DetectPhase::Unsupported));
        };

        let position = match sensor.current_position(client).await {
            Ok(position) => position,
            Err(e) => {
                tracing::warn!("Position request failed: {:#}", e);
                return Err(self.fail_detection(ReportError::GeolocationDenied, DetectPhase::Denied));
            }
        };

        self.set_location(position.latitude, position.longitude);

        let location_text = match self.geocoder.lookup(position).await {
            Ok(Some(address)) if !address.trim().is_empty() => address,
            Ok(_) => {
                tracing::debug!("No address found for {}", position);
                position.to_location_text()
            }
            Err(e) => {
                let err = ReportError::GeocodeLookupFailed(format!("{:#}", e));
                tracing::warn!("{}", err);
                position.to_location_text()
            }
        };

        self.session.set_location_text(location_text);
        self.session.set_status(StatusMessage::info(status::DETECTED));
        self.set_phase(DetectPhase::Resolved);

        Ok(position)
    }

    /// Any user action after a finished detection starts from idle again
    pub fn reset_phase(&self) {
        self.set_phase(DetectPhase::Idle);
    }

    fn set_phase(&self, phase: DetectPhase) {
        *lock(&self.phase) = phase;
    }

    fn fail_detection(&self, err: ReportError, phase: DetectPhase) -> ReportError {
        self.session.set_status(StatusMessage::error(err.status_text()));
        self.set_phase(phase);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fakes::{FakeAutocomplete, FakeGeocoder, FakeSensor, RecordingMap};
    use crate::domain::form::FormFields;
    use crate::domain::status::StatusColor;
    use crate::application::ports::PlaceGeometry;

    fn resolver_with_map(geocoder: FakeGeocoder) -> (LocationResolver, Arc<RecordingMap>, PageSession) {
        let session = PageSession::new(FormFields::new("", "", None));
        let map = Arc::new(RecordingMap::default());
        let resolver = LocationResolver::new(session.clone(), Arc::new(geocoder), Coordinate::default())
            .with_display(map.clone(), MapOptions::default());
        resolver.initialize_display().unwrap();
        (resolver, map, session)
    }

    #[test]
    fn test_initialize_creates_map_and_marker_at_default() {
        let (resolver, map, _) = resolver_with_map(FakeGeocoder::NoMatch);

        assert!(resolver.map_view().is_some());
        assert_eq!(map.center(), Some(Coordinate::default()));
        assert_eq!(map.marker(), Some(Coordinate::default()));
        assert_eq!(map.options(), Some(MapOptions::default()));
    }

    #[test]
    fn test_initialize_without_surface_is_noop() {
        let resolver = LocationResolver::new(
            PageSession::default(),
            Arc::new(FakeGeocoder::NoMatch),
            Coordinate::default(),
        );

        resolver.initialize_display().unwrap();

        assert!(resolver.map_view().is_none());
        resolver.set_location(10.0, 20.0);
        assert_eq!(resolver.current(), Coordinate::new(10.0, 20.0));
    }

    #[test]
    fn test_set_location_round_trips_and_moves_map() {
        let (resolver, map, _) = resolver_with_map(FakeGeocoder::NoMatch);

        for (lat, lng) in [(0.0, 0.0), (-90.0, 180.0), (90.0, -180.0), (28.6139, 77.209)] {
            resolver.set_location(lat, lng);
            assert_eq!(resolver.current(), Coordinate::new(lat, lng));
            assert_eq!(map.center(), Some(Coordinate::new(lat, lng)));
            assert_eq!(map.marker(), Some(Coordinate::new(lat, lng)));
        }
    }

    #[test]
    fn test_address_without_geometry_is_ignored() {
        let (resolver, map, _) = resolver_with_map(FakeGeocoder::NoMatch);
        let place = PlaceResult {
            formatted_address: Some("Somewhere".to_string()),
            geometry: None,
        };

        assert!(!resolver.on_address_chosen(&place));
        assert_eq!(resolver.current(), Coordinate::default());
        assert_eq!(map.center(), Some(Coordinate::default()));
    }

    #[test]
    fn test_address_with_geometry_moves_focus() {
        let (resolver, map, _) = resolver_with_map(FakeGeocoder::NoMatch);
        let place = PlaceResult {
            formatted_address: Some("Mumbai, Maharashtra, India".to_string()),
            geometry: Some(PlaceGeometry {
                location: Coordinate::new(19.076, 72.8777),
            }),
        };

        assert!(resolver.on_address_chosen(&place));
        assert_eq!(resolver.current(), Coordinate::new(19.076, 72.8777));
        assert_eq!(map.marker(), Some(Coordinate::new(19.076, 72.8777)));
    }

    #[test]
    fn test_resize_recenters_on_current() {
        let (resolver, map, _) = resolver_with_map(FakeGeocoder::NoMatch);
        resolver.set_location(12.0, 77.0);

        resolver.on_resize();

        assert_eq!(map.resizes(), 1);
        assert_eq!(map.center(), Some(Coordinate::new(12.0, 77.0)));
    }

    #[tokio::test]
    async fn test_detect_without_sensor_is_unsupported() {
        let (resolver, _, session) = resolver_with_map(FakeGeocoder::NoMatch);

        let err = resolver.detect_live_location(None).await.unwrap_err();

        assert_eq!(err, ReportError::GeolocationUnsupported);
        assert_eq!(resolver.phase(), DetectPhase::Unsupported);
        assert_eq!(resolver.current(), Coordinate::default());
        assert_eq!(session.status().text, "Geolocation not supported ❌");
        assert_eq!(session.status().color, StatusColor::Error);
        assert!(session.form().location.is_empty());
    }

    #[tokio::test]
    async fn test_detect_sensor_failure_is_denied() {
        let (resolver, map, session) = resolver_with_map(FakeGeocoder::Address("unused".to_string()));
        let resolver = resolver.with_sensor(Arc::new(FakeSensor::Fails));

        let err = resolver.detect_live_location(None).await.unwrap_err();

        assert_eq!(err, ReportError::GeolocationDenied);
        assert_eq!(resolver.phase(), DetectPhase::Denied);
        assert_eq!(resolver.current(), Coordinate::default());
        assert_eq!(map.center(), Some(Coordinate::default()));
        assert_eq!(session.status().text, "Location permission denied ❌");
        assert!(session.form().location.is_empty());
    }

    #[tokio::test]
    async fn test_detect_fills_address() {
        let (resolver, map, session) =
            resolver_with_map(FakeGeocoder::Address("Connaught Place, New Delhi".to_string()));
        let resolver = resolver.with_sensor(Arc::new(FakeSensor::At(Coordinate::new(28.6315, 77.2167))));

        let position = resolver.detect_live_location(None).await.unwrap();

        assert_eq!(position, Coordinate::new(28.6315, 77.2167));
        assert_eq!(resolver.current(), position);
        assert_eq!(map.marker(), Some(position));
        assert_eq!(resolver.phase(), DetectPhase::Resolved);
        assert_eq!(session.form().location, "Connaught Place, New Delhi");
        assert_eq!(session.status(), StatusMessage::info("Live location detected ✅"));
    }

    #[tokio::test]
    async fn test_detect_geocoder_failure_falls_back_to_coordinates() {
        let (resolver, _, session) = resolver_with_map(FakeGeocoder::Fails);
        let resolver = resolver.with_sensor(Arc::new(FakeSensor::At(Coordinate::new(13.0827, 80.2707))));

        resolver.detect_live_location(None).await.unwrap();

        assert_eq!(session.form().location, "Lat: 13.0827, Lng: 80.2707");
        assert_eq!(resolver.phase(), DetectPhase::Resolved);
    }

    #[tokio::test]
    async fn test_detect_empty_address_falls_back_to_coordinates() {
        let (resolver, _, session) = resolver_with_map(FakeGeocoder::Address("  ".to_string()));
        let resolver = resolver.with_sensor(Arc::new(FakeSensor::At(Coordinate::new(22.5, 88.25))));

        resolver.detect_live_location(None).await.unwrap();

        assert_eq!(session.form().location, "Lat: 22.5, Lng: 88.25");
    }

    #[tokio::test]
    async fn test_place_choice_after_denial_returns_to_idle() {
        let (resolver, _, _) = resolver_with_map(FakeGeocoder::NoMatch);
        let resolver = resolver.with_sensor(Arc::new(FakeSensor::Fails));
        resolver.detect_live_location(None).await.unwrap_err();
        assert_eq!(resolver.phase(), DetectPhase::Denied);

        let place = PlaceResult {
            formatted_address: None,
            geometry: Some(PlaceGeometry {
                location: Coordinate::new(23.0225, 72.5714),
            }),
        };
        resolver.on_address_chosen(&place);

        assert_eq!(resolver.phase(), DetectPhase::Idle);
    }

    #[tokio::test]
    async fn test_resize_after_resolve_returns_to_idle() {
        let (resolver, _, _) = resolver_with_map(FakeGeocoder::NoMatch);
        let resolver = resolver.with_sensor(Arc::new(FakeSensor::At(Coordinate::new(9.9312, 76.2673))));
        resolver.detect_live_location(None).await.unwrap();
        assert_eq!(resolver.phase(), DetectPhase::Resolved);

        resolver.on_resize();

        assert_eq!(resolver.phase(), DetectPhase::Idle);
    }

    #[tokio::test]
    async fn test_geocoder_failure_text_drops_zero_sign() {
        let (resolver, _, session) = resolver_with_map(FakeGeocoder::Fails);
        let resolver = resolver.with_sensor(Arc::new(FakeSensor::At(Coordinate::new(-0.0, 80.25))));

        resolver.detect_live_location(None).await.unwrap();

        assert_eq!(session.form().location, "Lat: 0, Lng: 80.25");
    }

    #[tokio::test]
    async fn test_suggestions_need_attached_autocomplete() {
        let session = PageSession::default();
        let resolver = LocationResolver::new(session, Arc::new(FakeGeocoder::NoMatch), Coordinate::default());
        assert!(resolver.suggest_places("Goa").await.unwrap().is_empty());

        let autocomplete = Arc::new(FakeAutocomplete::default());
        let resolver = resolver.with_autocomplete(autocomplete.clone(), "in");
        resolver.initialize_display().unwrap();

        let places = resolver.suggest_places("Goa").await.unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(autocomplete.attached(), Some(("location".to_string(), "in".to_string())));
    }
}
