use crate::application::report_service::DEFAULT_RESET_DELAY;
use serde::Deserialize;

const ENV_PREFIX: &str = "ISSUE_REPORTER";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub map: MapSettings,
    pub autocomplete: AutocompleteSettings,
    pub geocoder: GeocoderSettings,
    pub sensor: SensorSettings,
    pub report: ReportSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapSettings {
    /// Whether the page has a map surface at all
    pub enabled: bool,
    pub zoom: u8,
    pub gesture_handling: String,
    pub default_latitude: f64,
    pub default_longitude: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AutocompleteSettings {
    pub enabled: bool,
    pub country: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderSettings {
    pub base_url: String,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorSettings {
    pub enabled: bool,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    pub reset_delay_ms: u64,
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("map.enabled", true)?
        .set_default("map.zoom", 14)?
        .set_default("map.gesture_handling", "greedy")?
        .set_default("map.default_latitude", 20.5937)?
        .set_default("map.default_longitude", 78.9629)?
        .set_default("autocomplete.enabled", true)?
        .set_default("autocomplete.country", "in")?
        .set_default("autocomplete.base_url", "https://nominatim.openstreetmap.org")?
        .set_default("geocoder.base_url", "https://nominatim.openstreetmap.org")?
        .set_default("geocoder.user_agent", "issue-reporter/0.1")?
        .set_default("sensor.enabled", true)?
        .set_default("sensor.base_url", "http://ip-api.com/json")?
        .set_default("report.reset_delay_ms", DEFAULT_RESET_DELAY.as_millis() as i64)?)
}

/// Defaults, then `config/app.*` if present, then `ISSUE_REPORTER__SECTION__KEY` variables
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = builder()?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> AppConfig {
        builder()
            .unwrap()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = from_toml("");

        assert_eq!(cfg.server.bind, "0.0.0.0:8080");
        assert!(cfg.map.enabled);
        assert_eq!(cfg.map.zoom, 14);
        assert_eq!(cfg.map.gesture_handling, "greedy");
        assert_eq!(cfg.map.default_latitude, 20.5937);
        assert_eq!(cfg.autocomplete.country, "in");
        assert_eq!(cfg.report.reset_delay_ms, 2000);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let cfg = from_toml(
            r#"
            [map]
            enabled = false
            zoom = 10

            [autocomplete]
            country = "np"

            [sensor]
            enabled = false
            "#,
        );

        assert!(!cfg.map.enabled);
        assert_eq!(cfg.map.zoom, 10);
        assert_eq!(cfg.map.gesture_handling, "greedy");
        assert_eq!(cfg.autocomplete.country, "np");
        assert!(!cfg.sensor.enabled);
    }
}
