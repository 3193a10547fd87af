// Position sensor backed by an IP geolocation lookup
use crate::application::ports::GeolocationSensor;
use crate::domain::coordinate::Coordinate;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::net::IpAddr;

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl IpLookupResponse {
    fn into_coordinate(self) -> Result<Coordinate> {
        if self.status != "success" {
            anyhow::bail!(
                "Position lookup failed: {}",
                self.message.unwrap_or_else(|| self.status.clone())
            );
        }
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinate::new(lat, lon)),
            _ => anyhow::bail!("Position lookup returned no coordinates"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IpLocationSensor {
    url: String,
    client: reqwest::Client,
}

impl IpLocationSensor {
    pub fn new(url: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Lookup URL for the client, or for the server's own address when unknown
    fn lookup_url(&self, client: Option<IpAddr>) -> String {
        match client {
            Some(ip) => format!("{}/{}", self.url, ip),
            None => self.url.clone(),
        }
    }
}

#[async_trait]
impl GeolocationSensor for IpLocationSensor {
    async fn current_position(&self, client: Option<IpAddr>) -> Result<Coordinate> {
        let response = self
            .client
            .get(self.lookup_url(client))
            .send()
            .await
            .context("Failed to reach position service")?
            .error_for_status()
            .context("Position service returned an error")?
            .json::<IpLookupResponse>()
            .await
            .context("Failed to parse position response")?;

        response.into_coordinate()
    }
}
