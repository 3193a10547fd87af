// Report record assembled at submission time
use super::coordinate::Coordinate;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    pub issue: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image: String,
    pub timestamp: String,
}

impl ReportRecord {
    pub fn new(
        issue: String,
        location: String,
        coordinate: Coordinate,
        image: String,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            issue,
            location,
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            image,
            timestamp: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
