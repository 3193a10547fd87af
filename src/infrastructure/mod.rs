// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod headless_map;
pub mod ip_sensor;
pub mod log_publisher;
pub mod nominatim;
