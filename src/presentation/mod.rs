// Presentation layer - HTTP surface dispatching page actions
pub mod app_state;
pub mod error_response;
pub mod handlers;
