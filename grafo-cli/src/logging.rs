//! Structured logging for the grafo CLI.
//!
//! Installs one global `tracing` subscriber writing to stderr, filtered by
//! `RUST_LOG` (default `info`) and formatted according to `GRAFO_LOG_FORMAT`.
//! Records emitted through the `log` facade are bridged into `tracing`.

use std::{env, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing::warn;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "GRAFO_LOG_FORMAT";

const DEFAULT_DIRECTIVE: &str = "info";

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Errors raised while initialising structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Environment variable contained invalid UTF-8 data.
    #[error("environment variable `{name}` contained invalid UTF-8")]
    InvalidUnicode {
        /// Name of the offending environment variable.
        name: &'static str,
    },
    /// Unsupported log format requested via `GRAFO_LOG_FORMAT`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Raw value supplied by the user.
        provided: String,
    },
}

/// Rendering of log lines.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Human-readable single-line records.
    #[default]
    Human,
    /// One JSON object per record, including the active span list.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

impl LogFormat {
    /// Resolves the format from an environment lookup; an unset variable
    /// selects [`LogFormat::Human`].
    ///
    /// # Errors
    /// Returns [`LoggingError`] when the value is not Unicode or names an
    /// unknown format.
    ///
    /// # Examples
    /// ```
    /// use std::env::VarError;
    /// use grafo_cli::logging::LogFormat;
    ///
    /// let format = LogFormat::from_lookup(|_| Ok(" JSON ".to_owned()))?;
    /// assert_eq!(format, LogFormat::Json);
    /// assert_eq!(LogFormat::from_lookup(|_| Err(VarError::NotPresent))?, LogFormat::Human);
    /// # Ok::<(), grafo_cli::logging::LoggingError>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoggingError>
    where
        F: FnOnce(&str) -> Result<String, env::VarError>,
    {
        match lookup(LOG_FORMAT_ENV) {
            Ok(raw) => raw.parse(),
            Err(env::VarError::NotPresent) => Ok(Self::Human),
            Err(env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
            }),
        }
    }
}

/// Installs global structured logging unless this process already did.
///
/// When another subscriber already owns the global slot the existing one is
/// kept and a warning is logged through it.
///
/// # Errors
/// Returns [`LoggingError`] if `GRAFO_LOG_FORMAT` is malformed.
pub fn init_logging() -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }
    let format = LogFormat::from_lookup(|name| env::var(name))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let layer = match format {
        LogFormat::Human => layer.boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // Another logger may already own the `log` slot; keep it.
    let _ = LogTracer::init();
    if let Err(source) = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
    {
        warn!(%source, "structured logging already configured elsewhere");
    }
    let _ = INITIALISED.set(());
    Ok(())
}
