//! Terminal front end: each stdin line is a new query.
//!
//! Runs on a single task. Input and lookup progress are multiplexed with
//! `select!`; the controller is the only writer of the published state and
//! the renderer only reads it.

use std::io::Write;

use anyhow::{Context, Result};
use classy_core::Config;
use classy_forecast::{LookupController, LookupMessage};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::render;

const PROMPT: &str = "Search for a location: ";

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Looked up before any input is read
    pub initial_query: Option<String>,
    /// Look up `initial_query`, print, and return
    pub once: bool,
}

enum Event {
    Line(Option<String>),
    Lookup(LookupMessage),
}

/// Run the front end. Returns whether a forecast was shown.
pub async fn run(config: &Config, options: RunOptions) -> Result<bool> {
    let mut controller =
        LookupController::from_config(config).context("Failed to create weather client")?;

    if options.once {
        let query = options
            .initial_query
            .as_deref()
            .context("--once needs a location to look up")?;
        return Ok(lookup_once(&mut controller, query, &mut std::io::stdout()).await?);
    }

    interactive(&mut controller, options.initial_query.as_deref()).await
}

/// Single lookup for `query`, written to `out`.
pub async fn lookup_once<W: Write>(
    controller: &mut LookupController,
    query: &str,
    out: &mut W,
) -> std::io::Result<bool> {
    controller.set_query(query);
    let published = controller.settle().await;
    write!(out, "{}", render(controller.state()))?;
    out.flush()?;
    Ok(published)
}

async fn interactive(
    controller: &mut LookupController,
    initial_query: Option<&str>,
) -> Result<bool> {
    let mut stdout = std::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = false;

    if let Some(query) = initial_query {
        controller.set_query(query);
    }
    prompt(&mut stdout)?;

    loop {
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line.context("Failed to read input")?),
            Some(msg) = controller.next_message() => Event::Lookup(msg),
        };

        match event {
            Event::Line(Some(line)) => controller.set_query(&line),
            Event::Line(None) => {
                tracing::info!("Input closed, exiting");
                break;
            }
            Event::Lookup(msg) => {
                if controller.handle_message(msg) {
                    writeln!(stdout)?;
                    write!(stdout, "{}", render(controller.state()))?;
                    prompt(&mut stdout)?;
                    shown = true;
                }
            }
        }
    }

    controller.cancel();
    Ok(shown)
}

fn prompt<W: Write>(out: &mut W) -> std::io::Result<()> {
    write!(out, "{}", PROMPT)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use classy_core::ApiConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Config {
        Config {
            api: ApiConfig {
                geocoding_url: format!("{}/v1/search", server.uri()),
                forecast_url: format!("{}/v1/forecast", server.uri()),
                timeout_secs: 5,
            },
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_lookup_once_prints_forecast() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Berlin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{
                    "latitude": 52.52,
                    "longitude": 13.41,
                    "timezone": "Europe/Berlin",
                    "name": "Berlin",
                    "country_code": "DE"
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": {
                    "time": ["2026-10-18", "2026-10-19"],
                    "weathercode": [0, 2],
                    "temperature_2m_max": [15.0, 13.5],
                    "temperature_2m_min": [7.0, 6.5]
                }
            })))
            .mount(&server)
            .await;

        let mut controller = LookupController::from_config(&config_for(&server)).unwrap();
        let mut out = Vec::new();
        let shown = lookup_once(&mut controller, "Berlin", &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(shown);
        assert!(text.starts_with("Weather in Berlin 🇩🇪\n"));
        assert!(text.contains("Today"));
        assert!(text.contains("⛅️  Mon"));
    }

    #[tokio::test]
    async fn test_lookup_once_prints_nothing_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let mut controller = LookupController::from_config(&config_for(&server)).unwrap();
        let mut out = Vec::new();
        let shown = lookup_once(&mut controller, "Qwzxv", &mut out).await.unwrap();

        assert!(!shown);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_once_without_query_is_an_error() {
        let options = RunOptions {
            initial_query: None,
            once: true,
        };
        assert!(run(&Config::default(), options).await.is_err());
    }
}
