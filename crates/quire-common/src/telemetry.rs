//! Log output for the quire binary.
//!
//! Progress lines for the user go to stdout, so every tracing event is
//! written to stderr. `RUST_LOG` overrides the default level.
//!
//! ```ignore
//! quire_common::telemetry::init(LogSettings::for_app("quire"));
//! ```

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Reported once the subscriber is live
    pub app: String,
    /// Used when `RUST_LOG` is unset or unparsable
    pub default_level: Level,
}

impl LogSettings {
    /// `info` for debug builds, `warn` for release builds
    pub fn for_app(app: impl Into<String>) -> Self {
        let default_level = match cfg!(debug_assertions) {
            true => Level::INFO,
            false => Level::WARN,
        };
        Self {
            app: app.into(),
            default_level,
        }
    }

    pub fn with_default_level(self, default_level: Level) -> Self {
        Self {
            default_level,
            ..self
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_level.as_str().to_lowercase()))
    }
}

/// Install the stderr subscriber. Later calls are ignored.
pub fn init(settings: LogSettings) {
    let stderr = tracing_subscriber::fmt::layer()
        .compact()
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(settings.filter());

    if tracing_subscriber::registry().with(stderr).try_init().is_ok() {
        tracing::debug!(app = %settings.app, level = %settings.default_level, "logging ready");
    }
}
