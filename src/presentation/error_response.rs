// Mapping of report errors onto HTTP responses
use crate::application::errors::ReportError;
use crate::domain::form::FormField;
use crate::domain::status::StatusMessage;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<FormField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<&'static str>,
    pub status: StatusMessage,
    pub detail: String,
}

impl From<&ReportError> for ErrorBody {
    fn from(err: &ReportError) -> Self {
        let field = match err {
            ReportError::MissingField(field) => Some(*field),
            _ => None,
        };
        Self {
            error: err.kind(),
            field,
            element: field.map(|f| f.element_id()),
            status: StatusMessage::error(err.status_text()),
            detail: err.to_string(),
        }
    }
}

pub fn status_code(err: &ReportError) -> StatusCode {
    match err {
        ReportError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReportError::GeolocationUnsupported => StatusCode::NOT_IMPLEMENTED,
        ReportError::GeolocationDenied => StatusCode::FORBIDDEN,
        ReportError::GeocodeLookupFailed(_) | ReportError::PublishFailed(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        (status_code(&self), Json(ErrorBody::from(&self))).into_response()
    }
}
