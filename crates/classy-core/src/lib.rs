pub mod config;
pub mod error;

pub use config::{ApiConfig, Config, DisplayConfig, TemperatureUnit, ValidationResult};
pub use error::{ConfigError, NetworkError, ReqwestErrorExt, WeatherError};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

/// Handle to the installed log filter
#[derive(Clone)]
pub struct LogFilter {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogFilter {
    /// Switch to `level`, unless `RUST_LOG` chose the filter.
    pub fn apply(&self, level: &str) {
        if self.from_env {
            return;
        }
        let level = match level.trim() {
            "" => config::DEFAULT_LOG_LEVEL,
            level => level,
        };
        match EnvFilter::try_new(level) {
            Ok(filter) => {
                if let Err(e) = self.handle.reload(filter) {
                    tracing::debug!("Log filter not reloaded: {}", e);
                }
            }
            Err(e) => tracing::warn!("Invalid log level '{}': {}", level, e),
        }
    }
}

fn subscriber<W>(
    filter: EnvFilter,
    writer: W,
) -> (
    impl tracing::Subscriber + Send + Sync + 'static,
    reload::Handle<EnvFilter, Registry>,
)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer));
    (subscriber, handle)
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the default level applies until
/// [`LogFilter::apply`] switches it. Output goes to stderr.
pub fn init() -> LogFilter {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let filter = env_filter.unwrap_or_else(|| EnvFilter::new(config::DEFAULT_LOG_LEVEL));

    let (subscriber, handle) = subscriber(filter, std::io::stderr);
    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = subscriber.try_init();

    tracing::info!("Classy Weather core initialized");
    LogFilter { handle, from_env }
}
