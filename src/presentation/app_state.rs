// Application state for HTTP handlers
use crate::application::location_service::LocationResolver;
use crate::application::page_session::PageSession;
use crate::application::report_service::ReportSubmitter;
use crate::infrastructure::headless_map::HeadlessMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub session: PageSession,
    pub resolver: Arc<LocationResolver>,
    pub submitter: ReportSubmitter,
    /// `None` when the page has no map surface
    pub map: Option<Arc<HeadlessMap>>,
}
