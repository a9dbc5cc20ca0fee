//! Logging utilities
//!
//! Thin wrapper over `tracing-subscriber`; the library itself only emits
//! `tracing` events.

use crate::utils::error::Error;
use std::env;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted when no level is given explicitly
pub const LOG_LEVEL_ENV: &str = "LLM_FANOUT_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(Error::config(format!("Invalid log level: {}", s))),
        }
    }
}

pub struct LoggingUtils;

impl LoggingUtils {
    /// Install the global subscriber.
    ///
    /// `RUST_LOG` wins when set; otherwise the crate logs at `log_level`
    /// and dependencies at `warn`.
    pub fn init_logger(log_level: Option<LogLevel>) -> Result<(), Error> {
        let level = log_level.unwrap_or_else(Self::get_log_level_from_env);
        let directive = format!(
            "warn,llm_fanout={}",
            Level::from(level).as_str().to_lowercase()
        );

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&directive))
            .map_err(|e| Error::config(format!("Invalid log filter: {}", e)))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| Error::config(format!("Failed to initialise logger: {}", e)))
    }

    pub fn get_log_level_from_env() -> LogLevel {
        env::var(LOG_LEVEL_ENV)
            .unwrap_or_else(|_| "INFO".to_string())
            .parse()
            .unwrap_or(LogLevel::Info)
    }

    pub fn format_duration(duration: Duration) -> String {
        let total_ms = duration.as_millis();

        if total_ms < 1000 {
            format!("{}ms", total_ms)
        } else if total_ms < 60_000 {
            format!("{:.2}s", total_ms as f64 / 1000.0)
        } else {
            let minutes = total_ms / 60_000;
            let seconds = (total_ms % 60_000) as f64 / 1000.0;
            format!("{}m {:.2}s", minutes, seconds)
        }
    }
}
