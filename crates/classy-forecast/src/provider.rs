//! Daily forecast retrieval from the Open-Meteo forecast API.

use classy_core::{ApiConfig, TemperatureUnit, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::http::{build_client, get_json};
use crate::types::{ForecastResult, ResolvedLocation};

const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    weathercode: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct ForecastFetcher {
    client: Client,
    forecast_url: String,
    unit: TemperatureUnit,
}

impl ForecastFetcher {
    pub fn new(api: &ApiConfig, unit: TemperatureUnit) -> Result<Self, WeatherError> {
        Ok(Self::with_client(build_client(api)?, &api.forecast_url, unit))
    }

    pub fn with_client(client: Client, forecast_url: &str, unit: TemperatureUnit) -> Self {
        Self {
            client,
            forecast_url: forecast_url.to_string(),
            unit,
        }
    }

    /// Fetch the daily forecast for `location`.
    ///
    /// The result's display location is `"{name} {flag}"`.
    #[instrument(skip(self, cancel), level = "debug")]
    pub async fn fetch(
        &self,
        location: &ResolvedLocation,
        cancel: &CancellationToken,
    ) -> Result<ForecastResult, WeatherError> {
        let mut params = vec![
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("timezone", location.timezone.clone()),
            ("daily", DAILY_FIELDS.to_string()),
        ];
        if self.unit == TemperatureUnit::Fahrenheit {
            params.push(("temperature_unit", "fahrenheit".to_string()));
        }

        let request = self.client.get(&self.forecast_url).query(&params);
        let body: ForecastResponse = get_json(request, cancel).await?;
        let daily = body.daily;

        let forecast = ForecastResult::new(
            daily.time,
            daily.weathercode,
            daily.temperature_2m_min,
            daily.temperature_2m_max,
            location.display_name(),
        )?;

        tracing::debug!(
            "Fetched {} forecast days for {}",
            forecast.len(),
            forecast.display_location()
        );
        Ok(forecast)
    }
}
