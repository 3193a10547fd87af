// HTTP request handlers - One per page action
use crate::application::errors::ReportError;
use crate::application::location_service::{DetectPhase, MapView};
use crate::application::page_session::PageState;
use crate::application::ports::PlaceResult;
use crate::domain::coordinate::Coordinate;
use crate::domain::form::FormFields;
use crate::domain::report::ReportRecord;
use crate::infrastructure::headless_map::MapSnapshot;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct PlaceQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct PageView {
    pub coordinate: Coordinate,
    pub phase: DetectPhase,
    pub view: Option<MapView>,
    #[serde(flatten)]
    pub page: PageState,
}

#[derive(Debug, Serialize)]
pub struct PlaceChosen {
    pub moved: bool,
    pub coordinate: Coordinate,
}

/// Public address of the caller: first `X-Forwarded-For` hop, else the peer.
/// Loopback and private addresses share the server's public address, so they map to `None`.
fn client_address(headers: &HeaderMap, peer: SocketAddr) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|hop| hop.trim().parse::<IpAddr>().ok());

    let ip = forwarded.unwrap_or(peer.ip());
    let local = match ip {
        IpAddr::V4(v4) => v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified(),
        IpAddr::V6(v6) => v6.is_loopback() || v6.is_unspecified(),
    };
    (!local).then_some(ip)
}

fn page_view(state: &AppState) -> PageView {
    PageView {
        coordinate: state.resolver.current(),
        phase: state.resolver.phase(),
        view: state.resolver.map_view(),
        page: state.session.snapshot(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_page(State(state): State<Arc<AppState>>) -> Json<PageView> {
    Json(page_view(&state))
}

pub async fn get_map(State(state): State<Arc<AppState>>) -> Json<Vec<MapSnapshot>> {
    let maps = state.map.as_ref().map(|m| m.snapshot()).unwrap_or_default();
    Json(maps)
}

/// Replace the fields as the user has filled them in
pub async fn put_form(
    State(state): State<Arc<AppState>>,
    Json(form): Json<FormFields>,
) -> Json<PageView> {
    state.resolver.reset_phase();
    state.session.replace_form(form);
    Json(page_view(&state))
}

pub async fn locate(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PageView>, ReportError> {
    let client = client_address(&headers, peer);
    state.resolver.detect_live_location(client).await?;
    Ok(Json(page_view(&state)))
}

pub async fn choose_place(
    State(state): State<Arc<AppState>>,
    Json(place): Json<PlaceResult>,
) -> Json<PlaceChosen> {
    let moved = state.resolver.on_address_chosen(&place);
    Json(PlaceChosen {
        moved,
        coordinate: state.resolver.current(),
    })
}

pub async fn suggest_places(
    Query(query): Query<PlaceQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlaceResult>>, StatusCode> {
    match state.resolver.suggest_places(&query.q).await {
        Ok(places) => Ok(Json(places)),
        Err(e) => {
            tracing::error!("Error fetching place suggestions: {:#}", e);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

pub async fn resize(State(state): State<Arc<AppState>>) -> StatusCode {
    state.resolver.on_resize();
    StatusCode::NO_CONTENT
}

pub async fn submit(State(state): State<Arc<AppState>>) -> Result<Json<ReportRecord>, ReportError> {
    let record = state.submitter.submit().await?;
    Ok(Json(record))
}
