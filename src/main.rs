// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::location_service::LocationResolver;
use crate::application::page_session::PageSession;
use crate::application::ports::MapOptions;
use crate::application::report_service::ReportSubmitter;
use crate::domain::coordinate::Coordinate;
use crate::domain::form::FormFields;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::headless_map::HeadlessMap;
use crate::infrastructure::ip_sensor::IpLocationSensor;
use crate::infrastructure::log_publisher::LogPublisher;
use crate::infrastructure::nominatim::NominatimClient;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    choose_place, get_map, get_page, health_check, locate, put_form, resize, submit,
    suggest_places,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config().context("Failed to load configuration")?;

    // Create adapters (infrastructure layer)
    let geocoder = Arc::new(NominatimClient::new(
        config.geocoder.base_url.clone(),
        config.geocoder.user_agent.clone(),
    ));

    // Create services (application layer)
    let session = PageSession::new(FormFields::new("", "", None));
    let center = Coordinate::new(config.map.default_latitude, config.map.default_longitude);
    let mut resolver = LocationResolver::new(session.clone(), geocoder, center);

    let map = if config.map.enabled {
        let map = Arc::new(HeadlessMap::new());
        let options = MapOptions {
            zoom: config.map.zoom,
            gesture_handling: config.map.gesture_handling.clone(),
        };
        resolver = resolver.with_display(map.clone(), options);
        Some(map)
    } else {
        None
    };

    if config.autocomplete.enabled {
        let autocomplete = Arc::new(NominatimClient::new(
            config.autocomplete.base_url.clone(),
            config.geocoder.user_agent.clone(),
        ));
        resolver = resolver.with_autocomplete(autocomplete, &config.autocomplete.country);
    }

    if config.sensor.enabled {
        resolver = resolver.with_sensor(Arc::new(IpLocationSensor::new(config.sensor.base_url.clone())));
    }

    resolver.initialize_display()?;
    let resolver = Arc::new(resolver);

    let submitter = ReportSubmitter::new(
        session.clone(),
        resolver.clone(),
        Arc::new(LogPublisher),
        Duration::from_millis(config.report.reset_delay_ms),
    );

    // Create application state
    let state = Arc::new(AppState {
        session,
        resolver,
        submitter,
        map,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/page", get(get_page))
        .route("/map", get(get_map))
        .route("/form", put(put_form))
        .route("/places", get(suggest_places))
        .route("/actions/locate", post(locate))
        .route("/actions/place", post(choose_place))
        .route("/actions/resize", post(resize))
        .route("/actions/submit", post(submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting issue-reporter service on {}", addr);

    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
