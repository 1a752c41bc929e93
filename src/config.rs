//! Process configuration, read once at startup.

use crate::cache::{MemoryStore, DEFAULT_TABLE};
use crate::logging::LogFormat;
use crate::{Error, ErrorContext, Result};
use std::time::Duration;

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast?latitude={lat}&longitude={lon}&daily=temperature_2m_max,uv_index_max,precipitation_probability_max&timezone=auto";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Provider URL template, see [`crate::provider::OpenMeteoProvider`].
    pub forecast_url: String,
    /// Store table the records are written to.
    pub table_name: String,
    pub ttl_minutes: u64,
    pub http_timeout: Duration,
    /// Upper bound on concurrent cache writes after a fetch.
    pub max_concurrent_writes: usize,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            table_name: DEFAULT_TABLE.to_string(),
            ttl_minutes: 10,
            http_timeout: Duration::from_secs(30),
            max_concurrent_writes: 8,
            log_format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// - `OPEN_METEO_URL` (required)
    /// - `CACHE_TABLE` (default `WeatherCache`)
    /// - `TTL_MINUTES` (default 10)
    /// - `HTTP_TIMEOUT_SECS` (default 30)
    /// - `CACHE_WRITE_CONCURRENCY` (default 8)
    /// - `LOG_FORMAT` (`json` | `pretty`, default `json`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`AppConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let forecast_url = get("OPEN_METEO_URL").ok_or_else(|| {
            Error::configuration_with_context(
                "missing required variable",
                ErrorContext::new()
                    .with_field_path("OPEN_METEO_URL")
                    .with_source("config"),
            )
        })?;

        let ttl_minutes = match get("TTL_MINUTES") {
            Some(v) => {
                let minutes = parse_positive("TTL_MINUTES", &v)?;
                if minutes.checked_mul(60).is_none() {
                    return Err(Error::configuration_with_context(
                        "invalid value",
                        ErrorContext::new()
                            .with_field_path("TTL_MINUTES")
                            .with_details(format!("{minutes} minutes does not fit in seconds"))
                            .with_source("config"),
                    ));
                }
                minutes
            }
            None => defaults.ttl_minutes,
        };
        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_positive("HTTP_TIMEOUT_SECS", &v)?),
            None => defaults.http_timeout,
        };
        let max_concurrent_writes = match get("CACHE_WRITE_CONCURRENCY") {
            Some(v) => parse_positive("CACHE_WRITE_CONCURRENCY", &v)? as usize,
            None => defaults.max_concurrent_writes,
        };
        let log_format = match get("LOG_FORMAT") {
            Some(v) => v.parse::<LogFormat>().map_err(|e| {
                Error::configuration_with_context(
                    "invalid value",
                    ErrorContext::new()
                        .with_field_path("LOG_FORMAT")
                        .with_details(e)
                        .with_source("config"),
                )
            })?,
            None => defaults.log_format,
        };

        Ok(Self {
            forecast_url,
            table_name: get("CACHE_TABLE").unwrap_or(defaults.table_name),
            ttl_minutes,
            http_timeout,
            max_concurrent_writes,
            log_format,
        })
    }

    pub fn with_forecast_url(mut self, url: impl Into<String>) -> Self {
        self.forecast_url = url.into();
        self
    }

    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    pub fn with_ttl_minutes(mut self, minutes: u64) -> Self {
        self.ttl_minutes = minutes;
        self
    }

    pub fn with_max_concurrent_writes(mut self, n: usize) -> Self {
        self.max_concurrent_writes = n.max(1);
        self
    }

    /// In-process store writing to the configured table.
    pub fn memory_store(&self, max_entries: usize) -> MemoryStore {
        MemoryStore::new(max_entries).with_table(self.table_name.clone())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }
}

fn parse_positive(name: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::configuration_with_context(
            "invalid value",
            ErrorContext::new()
                .with_field_path(name)
                .with_details(format!("expected a positive integer, got '{value}'"))
                .with_source("config"),
        )),
    }
}
