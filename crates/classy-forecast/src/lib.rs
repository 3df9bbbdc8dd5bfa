//! Weather lookup for Classy Weather
//!
//! Resolves a free-text place via Open-Meteo geocoding, fetches its daily
//! forecast, and orchestrates cancellable lookups so that only the latest
//! query ever publishes a result.

pub mod geocode;
pub mod http;
pub mod lookup;
pub mod phase;
pub mod provider;
pub mod types;

pub use geocode::LocationResolver;
pub use lookup::{LookupController, LookupMessage, LookupState};
pub use phase::LookupPhase;
pub use provider::ForecastFetcher;
pub use types::*;
