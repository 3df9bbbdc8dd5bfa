//! Centralized error types for Classy Weather.
//!
//! This module provides the typed error hierarchy shared by the crates:
//! - Network failures classified from `reqwest` errors
//! - The lookup taxonomy (location not found, network, bad payload, cancelled)
//! - Configuration loading and validation failures

use thiserror::Error;

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },
}

/// Errors produced by a location + forecast lookup.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The lookup was superseded or aborted. Never reported to the user.
    #[error("Lookup cancelled")]
    Cancelled,
}

impl WeatherError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WeatherError::Cancelled)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration: {0}")]
    Read(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_conversion() {
        let weather_err: WeatherError = NetworkError::Timeout.into();
        assert!(matches!(
            weather_err,
            WeatherError::Network(NetworkError::Timeout)
        ));
    }

    #[test]
    fn test_only_cancelled_is_cancelled() {
        assert!(WeatherError::Cancelled.is_cancelled());
        assert!(!WeatherError::LocationNotFound("Atlantis".into()).is_cancelled());
        assert!(!WeatherError::InvalidResponse("truncated".into()).is_cancelled());
        assert!(!WeatherError::Network(NetworkError::Timeout).is_cancelled());
    }

    #[test]
    fn test_display_messages() {
        let err = WeatherError::LocationNotFound("Atlantis".into());
        assert_eq!(err.to_string(), "Location not found: Atlantis");

        let err = WeatherError::Network(NetworkError::ServerError {
            status: 400,
            message: "Parameter 'latitude' is out of range".into(),
        });
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_io_error_becomes_read_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ConfigError = io.into();
        assert!(matches!(err, ConfigError::Read(_)));
    }
}
