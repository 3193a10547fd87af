// Report service - Use case for validating and submitting an issue report
use crate::application::errors::ReportError;
use crate::application::location_service::LocationResolver;
use crate::application::page_session::PageSession;
use crate::application::ports::ReportPublisher;
use crate::domain::form::{FormField, FormFields, ImageRef};
use crate::domain::report::ReportRecord;
use crate::domain::status::{self, StatusMessage};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(2000);

#[derive(Clone)]
pub struct ReportSubmitter {
    session: PageSession,
    resolver: Arc<LocationResolver>,
    publisher: Arc<dyn ReportPublisher>,
    reset_delay: Duration,
}

impl ReportSubmitter {
    pub fn new(
        session: PageSession,
        resolver: Arc<LocationResolver>,
        publisher: Arc<dyn ReportPublisher>,
        reset_delay: Duration,
    ) -> Self {
        Self {
            session,
            resolver,
            publisher,
            reset_delay,
        }
    }

    /// Validate the form, publish the report and clear the page after the reset delay
    pub async fn submit(&self) -> Result<ReportRecord, ReportError> {
        self.resolver.reset_phase();
        let form = self.session.form();

        let (description, image, location) = match validate(&form) {
            Ok(fields) => fields,
            Err(err) => {
                self.session.set_status(StatusMessage::error(err.status_text()));
                return Err(err);
            }
        };

        let record = ReportRecord::new(
            description.to_string(),
            location.to_string(),
            self.resolver.current(),
            image.file_name.clone(),
            Utc::now(),
        );

        if let Err(e) = self.publisher.publish(&record).await {
            let err = ReportError::PublishFailed(format!("{:#}", e));
            tracing::error!("{}", err);
            self.session.set_status(StatusMessage::error(err.status_text()));
            return Err(err);
        }

        self.session.set_status(StatusMessage::info(status::SUBMITTED));

        let session = self.session.clone();
        let delay = self.reset_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            session.reset();
            tracing::debug!("Form cleared after submission");
        });

        Ok(record)
    }
}

/// Checks description, image and location in that order. The first missing one wins.
fn validate(form: &FormFields) -> Result<(&str, &ImageRef, &str), ReportError> {
    let description = form
        .primary_description()
        .filter(|d| !d.trim().is_empty())
        .ok_or(ReportError::MissingField(FormField::Description))?;

    let image = form
        .image
        .as_ref()
        .filter(|i| !i.file_name.is_empty())
        .ok_or(ReportError::MissingField(FormField::Image))?;

    if form.location.trim().is_empty() {
        return Err(ReportError::MissingField(FormField::Location));
    }

    Ok((description, image, form.location.as_str()))
}
