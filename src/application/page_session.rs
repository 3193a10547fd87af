// Page session - Form fields and status line shared by the services
use crate::domain::form::FormFields;
use crate::domain::status::StatusMessage;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageState {
    pub form: FormFields,
    pub status: StatusMessage,
}

/// Handle to the page state. Clones share the same fields.
#[derive(Debug, Clone, Default)]
pub struct PageSession {
    state: Arc<Mutex<PageState>>,
}

impl PageSession {
    pub fn new(form: FormFields) -> Self {
        Self {
            state: Arc::new(Mutex::new(PageState {
                form,
                status: StatusMessage::default(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> PageState {
        self.lock().clone()
    }

    pub fn form(&self) -> FormFields {
        self.lock().form.clone()
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusMessage {
        self.lock().status.clone()
    }

    /// Replace what the user has typed or picked
    pub fn replace_form(&self, form: FormFields) {
        self.lock().form = form;
    }

    pub fn set_location_text(&self, text: String) {
        self.lock().form.location = text;
    }

    pub fn set_status(&self, status: StatusMessage) {
        tracing::debug!("Status: {:?} {}", status.color, status.text);
        self.lock().status = status;
    }

    /// Empty every field and the status text
    pub fn reset(&self) {
        let mut state = self.lock();
        state.form.clear();
        state.status.text.clear();
    }
}
