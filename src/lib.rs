//! # weather-forecast-cache
//!
//! 读穿式天气预报缓存：先查缓存，未命中时从外部预报源获取多日预报并回填所有日期。
//!
//! Read-through forecast cache answering "what will the weather be at
//! (lat, lon) on date D".
//!
//! ## Overview
//!
//! A lookup first consults a per-day cache keyed by `<lat>_<lon>_<date>`. On a
//! miss the provider is asked for the whole forecast window (typically seven
//! days) and every returned day is written back, so one provider call serves
//! the following requests for the same location.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weather_forecast_cache::cache::MemoryStore;
//! use weather_forecast_cache::config::AppConfig;
//! use weather_forecast_cache::service::{ForecastQuery, WeatherService};
//!
//! #[tokio::main]
//! async fn main() -> weather_forecast_cache::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let service = WeatherService::from_config(&config, Arc::new(MemoryStore::new(10_000)))?;
//!
//!     let response = service
//!         .handle_request(ForecastQuery::new("42.0", "23.0"))
//!         .await;
//!     println!("{} {}", response.status, response.body);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`service`] | Request orchestration, validation, response shaping |
//! | [`cache`] | Cache key codec, store boundary, TTL-aware cache adapter |
//! | [`provider`] | Forecast provider trait and Open-Meteo client |
//! | [`batch`] | Bounded best-effort execution of the cache write pass |
//! | [`transport`] | HTTP transport |
//! | [`config`] | Environment configuration |
//! | [`logging`] | Subscriber setup and correlation ids |
//! | [`clock`] | Injectable time source |

pub mod batch;
pub mod cache;
pub mod clock;
pub mod config;
pub mod logging;
pub mod provider;
pub mod service;
pub mod transport;

pub use cache::{CacheKey, CachedRecord, ForecastCache, KeyValueStore};
pub use provider::{DailyForecast, ForecastMap, ForecastProvider, ProviderError};
pub use service::{ForecastQuery, ServiceResponse, WeatherResponse, WeatherService};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
