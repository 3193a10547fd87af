// Nominatim adapter - Reverse geocoding and address suggestions over HTTP
use crate::application::ports::{
    AddressAutocomplete, AutocompleteHandle, PlaceGeometry, PlaceResult, ReverseGeocoder,
};
use crate::domain::coordinate::Coordinate;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::{Mutex, PoisonError};

const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    display_name: String,
    lat: String,
    lon: String,
}

#[derive(Debug, Clone)]
struct Binding {
    input_field: String,
    country: String,
}

#[derive(Debug)]
pub struct NominatimClient {
    base_url: String,
    user_agent: String,
    client: reqwest::Client,
    bindings: Mutex<Vec<Binding>>,
}

impl NominatimClient {
    pub fn new(base_url: String, user_agent: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent,
            client: reqwest::Client::new(),
            bindings: Mutex::new(Vec::new()),
        }
    }

    fn reverse_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/reverse?format=jsonv2&lat={}&lon={}",
            self.base_url, coordinate.latitude, coordinate.longitude
        )
    }

    fn search_url(&self, query: &str, country: &str) -> String {
        format!(
            "{}/search?format=jsonv2&limit={}&countrycodes={}&q={}",
            self.base_url,
            SUGGESTION_LIMIT,
            urlencoding::encode(country),
            urlencoding::encode(query)
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to Nominatim")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Nominatim request failed with status {}: {}", status, body);
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse Nominatim response")
    }
}

fn address_from_reverse(response: ReverseResponse) -> Option<String> {
    if let Some(error) = response.error {
        tracing::debug!("Nominatim reverse lookup: {}", error);
        return None;
    }
    response.display_name.filter(|name| !name.trim().is_empty())
}

fn place_from_hit(hit: SearchHit) -> PlaceResult {
    let geometry = match (hit.lat.parse::<f64>(), hit.lon.parse::<f64>()) {
        (Ok(lat), Ok(lon)) => Some(PlaceGeometry {
            location: Coordinate::new(lat, lon),
        }),
        _ => None,
    };

    PlaceResult {
        formatted_address: Some(hit.display_name),
        geometry,
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn lookup(&self, coordinate: Coordinate) -> Result<Option<String>> {
        let response: ReverseResponse = self.get_json(&self.reverse_url(coordinate)).await?;
        Ok(address_from_reverse(response))
    }
}

#[async_trait]
impl AddressAutocomplete for NominatimClient {
    fn attach(&self, input_field: &str, country: &str) -> Result<AutocompleteHandle> {
        let mut bindings = self.bindings.lock().unwrap_or_else(PoisonError::into_inner);
        bindings.push(Binding {
            input_field: input_field.to_string(),
            country: country.to_lowercase(),
        });
        Ok(AutocompleteHandle(bindings.len() as u64 - 1))
    }

    async fn suggest(&self, handle: AutocompleteHandle, query: &str) -> Result<Vec<PlaceResult>> {
        let binding = self
            .bindings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(handle.0 as usize)
            .cloned()
            .with_context(|| format!("Unknown autocomplete handle {}", handle.0))?;

        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(
            "Suggesting places for {} (country={})",
            binding.input_field,
            binding.country
        );
        let hits: Vec<SearchHit> = self.get_json(&self.search_url(query, &binding.country)).await?;
        Ok(hits.into_iter().map(place_from_hit).collect())
    }
}
