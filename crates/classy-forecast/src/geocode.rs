//! Forward geocoding: free-text place name to coordinates and timezone.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use classy_core::{ApiConfig, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::http::{build_client, get_json};
use crate::types::ResolvedLocation;

/// `results` is absent (not empty) when nothing matches
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<ResolvedLocation>>,
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    client: Client,
    search_url: String,
}

impl LocationResolver {
    pub fn new(api: &ApiConfig) -> Result<Self, WeatherError> {
        Ok(Self::with_client(build_client(api)?, &api.geocoding_url))
    }

    pub fn with_client(client: Client, search_url: &str) -> Self {
        Self {
            client,
            search_url: search_url.to_string(),
        }
    }

    /// Resolve `query` to its first geocoding match.
    ///
    /// Fails with `LocationNotFound` when there is no candidate, and with
    /// `Cancelled` if `cancel` fires before the response is in.
    #[instrument(skip(self, cancel), level = "debug")]
    pub async fn resolve(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<ResolvedLocation, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::LocationNotFound(String::new()));
        }

        let request = self.client.get(&self.search_url).query(&[("name", query)]);
        let body: GeocodingResponse = get_json(request, cancel).await?;

        let location = body
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| WeatherError::LocationNotFound(query.to_string()))?;

        tracing::debug!(
            "Resolved {:?} to {} ({}, {})",
            query,
            location.name,
            location.latitude,
            location.longitude
        );
        Ok(location)
    }
}
