// Application layer - Use cases driving the report page
pub mod errors;
pub mod location_service;
pub mod page_session;
pub mod ports;
pub mod report_service;

#[cfg(test)]
pub mod fakes;
