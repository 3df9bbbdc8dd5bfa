//! Lookup orchestration: one resolve-then-fetch chain per query change.
//!
//! Each chain runs as a task and reports back over an mpsc channel. The
//! controller is the only writer of the published [`LookupState`]; messages
//! from a superseded chain are recognised by their generation and dropped.

use std::sync::Arc;

use classy_core::{Config, WeatherError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::geocode::LocationResolver;
use crate::http::build_client;
use crate::phase::LookupPhase;
use crate::provider::ForecastFetcher;
use crate::types::{ForecastResult, ResolvedLocation};

/// What the renderer sees
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LookupState {
    /// No query has been entered yet
    #[default]
    Idle,
    /// A lookup was started but nothing has been published
    Empty,
    Ready(ForecastResult),
}

impl LookupState {
    pub fn forecast(&self) -> Option<&ForecastResult> {
        match self {
            LookupState::Ready(forecast) => Some(forecast),
            _ => None,
        }
    }
}

/// Progress reported by a lookup task
#[derive(Debug)]
pub enum LookupMessage {
    Resolved {
        generation: u64,
        location: ResolvedLocation,
    },
    Finished {
        generation: u64,
        result: Result<ForecastResult, WeatherError>,
    },
}

impl LookupMessage {
    pub fn generation(&self) -> u64 {
        match self {
            LookupMessage::Resolved { generation, .. } => *generation,
            LookupMessage::Finished { generation, .. } => *generation,
        }
    }
}

pub struct LookupController {
    resolver: Arc<LocationResolver>,
    fetcher: Arc<ForecastFetcher>,
    state: LookupState,
    phase: LookupPhase,
    query: String,
    generation: u64,
    cancel: Option<CancellationToken>,
    location: Option<ResolvedLocation>,
    last_error: Option<WeatherError>,
    tx: mpsc::UnboundedSender<LookupMessage>,
    rx: mpsc::UnboundedReceiver<LookupMessage>,
}

impl LookupController {
    pub fn new(resolver: LocationResolver, fetcher: ForecastFetcher) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            resolver: Arc::new(resolver),
            fetcher: Arc::new(fetcher),
            state: LookupState::default(),
            phase: LookupPhase::default(),
            query: String::new(),
            generation: 0,
            cancel: None,
            location: None,
            last_error: None,
            tx,
            rx,
        }
    }

    /// Resolver and fetcher sharing one HTTP client built from `config`.
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let client = build_client(&config.api)?;
        let resolver = LocationResolver::with_client(client.clone(), &config.api.geocoding_url);
        let fetcher = ForecastFetcher::with_client(
            client,
            &config.api.forecast_url,
            config.display.temperature_unit,
        );
        Ok(Self::new(resolver, fetcher))
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn phase(&self) -> LookupPhase {
        self.phase
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Location of the current lookup, once resolved
    pub fn location(&self) -> Option<&ResolvedLocation> {
        self.location.as_ref()
    }

    /// Diagnostic for the current lookup. Cancellation never lands here.
    pub fn last_error(&self) -> Option<&WeatherError> {
        self.last_error.as_ref()
    }

    /// Invalidate any outstanding lookup and start one for `query`.
    ///
    /// Must be called from within a tokio runtime. An empty query only
    /// cancels; the published state is left as is.
    pub fn set_query(&mut self, query: &str) {
        self.abort_in_flight();
        self.generation += 1;
        self.query = query.trim().to_string();
        self.location = None;
        self.last_error = None;

        if self.query.is_empty() {
            self.phase = LookupPhase::Idle;
            return;
        }

        if self.state == LookupState::Idle {
            self.state = LookupState::Empty;
        }
        self.phase = self.phase.on_query_changed();

        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());

        tracing::debug!(
            "Starting lookup #{} for {:?}",
            self.generation,
            self.query
        );
        tokio::spawn(run_lookup(
            self.resolver.clone(),
            self.fetcher.clone(),
            self.query.clone(),
            self.generation,
            cancel,
            self.tx.clone(),
        ));
    }

    /// Abort the in-flight lookup without starting another.
    pub fn cancel(&mut self) {
        self.abort_in_flight();
        self.generation += 1;
    }

    fn abort_in_flight(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        if self.phase.is_in_flight() {
            tracing::debug!("Lookup #{} for {:?} cancelled", self.generation, self.query);
            self.phase = self.phase.on_cancelled();
        }
    }

    /// Apply one task message. Returns true when the published state changed.
    pub fn handle_message(&mut self, msg: LookupMessage) -> bool {
        if msg.generation() != self.generation {
            tracing::debug!(
                "Discarding message from stale lookup #{} (current #{})",
                msg.generation(),
                self.generation
            );
            return false;
        }

        match msg {
            LookupMessage::Resolved { location, .. } => {
                self.phase = self.phase.on_resolved();
                self.location = Some(location);
                false
            }
            LookupMessage::Finished {
                result: Ok(forecast),
                ..
            } => {
                let next = self.phase.on_forecast_ready();
                if next != LookupPhase::Ready {
                    return false;
                }
                tracing::info!(
                    "Forecast ready for {} ({} days)",
                    forecast.display_location(),
                    forecast.len()
                );
                self.phase = next;
                self.cancel = None;
                self.state = LookupState::Ready(forecast);
                true
            }
            LookupMessage::Finished { result: Err(e), .. } if e.is_cancelled() => {
                self.phase = self.phase.on_cancelled();
                self.cancel = None;
                false
            }
            LookupMessage::Finished { result: Err(e), .. } => {
                tracing::warn!("Lookup for {:?} failed: {}", self.query, e);
                self.phase = self.phase.on_failed();
                self.cancel = None;
                self.last_error = Some(e);
                false
            }
        }
    }

    /// Wait for the next task message.
    pub async fn next_message(&mut self) -> Option<LookupMessage> {
        self.rx.recv().await
    }

    /// Apply messages until the current lookup is no longer in flight.
    pub async fn settle(&mut self) -> bool {
        let mut changed = false;
        while self.phase.is_in_flight() {
            match self.rx.recv().await {
                Some(msg) => changed |= self.handle_message(msg),
                None => break,
            }
        }
        changed
    }

    /// Apply whatever messages are already queued, without waiting.
    pub fn process_pending(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            changed |= self.handle_message(msg);
        }
        changed
    }
}

impl Drop for LookupController {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }
}

/// One resolve-then-fetch chain. Checks `cancel` at every resume point and
/// sends nothing once it has fired.
async fn run_lookup(
    resolver: Arc<LocationResolver>,
    fetcher: Arc<ForecastFetcher>,
    query: String,
    generation: u64,
    cancel: CancellationToken,
    tx: mpsc::UnboundedSender<LookupMessage>,
) {
    let resolved = resolver.resolve(&query, &cancel).await;
    if cancel.is_cancelled() {
        tracing::debug!("Lookup #{} dropped after geocoding", generation);
        return;
    }

    let location = match resolved {
        Ok(location) => location,
        Err(e) => {
            let _ = tx.send(LookupMessage::Finished {
                generation,
                result: Err(e),
            });
            return;
        }
    };

    let _ = tx.send(LookupMessage::Resolved {
        generation,
        location: location.clone(),
    });

    let result = fetcher.fetch(&location, &cancel).await;
    if cancel.is_cancelled() {
        tracing::debug!("Lookup #{} dropped after forecast", generation);
        return;
    }

    let _ = tx.send(LookupMessage::Finished { generation, result });
}
