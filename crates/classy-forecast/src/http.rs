//! Shared HTTP plumbing for the Open-Meteo endpoints.
//!
//! Every await on the network is raced against the lookup's cancellation
//! token, so a superseded lookup stops at its next resume point.

use std::future::Future;
use std::time::Duration;

use classy_core::{ApiConfig, NetworkError, ReqwestErrorExt, WeatherError};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

const USER_AGENT: &str = concat!("classy-weather/", env!("CARGO_PKG_VERSION"));

/// Open-Meteo error body, e.g. `{"error": true, "reason": "..."}`
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    reason: Option<String>,
}

/// Build the client shared by the resolver and the fetcher.
pub fn build_client(api: &ApiConfig) -> Result<Client, WeatherError> {
    Client::builder()
        .timeout(Duration::from_secs(api.timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| WeatherError::Network(e.into_network_error()))
}

/// Await `fut` unless `cancel` fires first.
pub(crate) async fn unless_cancelled<F>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, WeatherError>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(WeatherError::Cancelled),
        out = fut => Ok(out),
    }
}

/// Send `request` and decode a JSON body, mapping non-2xx to `ServerError`.
pub(crate) async fn get_json<T>(
    request: RequestBuilder,
    cancel: &CancellationToken,
) -> Result<T, WeatherError>
where
    T: DeserializeOwned,
{
    let response = unless_cancelled(cancel, request.send())
        .await?
        .map_err(ReqwestErrorExt::into_network_error)?;

    let status = response.status();
    let body = unless_cancelled(cancel, response.text())
        .await?
        .map_err(ReqwestErrorExt::into_network_error)?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.reason)
            .unwrap_or(body);
        return Err(NetworkError::ServerError {
            status: status.as_u16(),
            message,
        }
        .into());
    }

    serde_json::from_str(&body).map_err(|e| WeatherError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancelled_token_wins() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = unless_cancelled(&cancel, async { 42 }).await;
        assert!(matches!(result, Err(WeatherError::Cancelled)));
    }

    #[tokio::test]
    async fn test_live_token_passes_output_through() {
        let cancel = CancellationToken::new();
        let result = unless_cancelled(&cancel, async { 42 }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_build_client_from_default_config() {
        assert!(build_client(&ApiConfig::default()).is_ok());
    }
}
