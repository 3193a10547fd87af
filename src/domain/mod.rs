// Domain layer - Plain data carried between the page and the services
pub mod coordinate;
pub mod form;
pub mod report;
pub mod status;
