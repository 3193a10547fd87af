// Errors surfaced to the user through the status line
use crate::domain::form::FormField;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    #[error("Missing required field: {0}")]
    MissingField(FormField),

    #[error("Geolocation not supported")]
    GeolocationUnsupported,

    #[error("Location permission denied")]
    GeolocationDenied,

    #[error("Reverse geocode lookup failed: {0}")]
    GeocodeLookupFailed(String),

    #[error("Report could not be published: {0}")]
    PublishFailed(String),
}

impl ReportError {
    /// Text shown in the status line
    pub fn status_text(&self) -> &'static str {
        match self {
            ReportError::MissingField(FormField::Description) => "Please describe the issue ❗",
            ReportError::MissingField(FormField::Image) => "Please upload an image ❗",
            ReportError::MissingField(FormField::Location) => "Please provide location ❗",
            ReportError::GeolocationUnsupported => "Geolocation not supported ❌",
            ReportError::GeolocationDenied => "Location permission denied ❌",
            ReportError::GeocodeLookupFailed(_) => "Address lookup failed",
            ReportError::PublishFailed(_) => "Report could not be sent ❌",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::MissingField(_) => "missing_field",
            ReportError::GeolocationUnsupported => "geolocation_unsupported",
            ReportError::GeolocationDenied => "geolocation_denied",
            ReportError::GeocodeLookupFailed(_) => "geocode_lookup_failed",
            ReportError::PublishFailed(_) => "publish_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_messages() {
        assert_eq!(
            ReportError::MissingField(FormField::Description).status_text(),
            "Please describe the issue ❗"
        );
        assert_eq!(
            ReportError::MissingField(FormField::Image).to_string(),
            "Missing required field: image"
        );
    }
}
