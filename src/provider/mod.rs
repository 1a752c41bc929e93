//! 预报源模块：从外部 HTTP 天气服务获取多日预报并规范化为按日期索引的映射。
//!
//! # Forecast Provider Module
//!
//! A provider returns the whole forecast window (typically 7 days starting
//! today) for one location in a single call. Every date present in the raw
//! response is preserved; coordinates are normalized to 4 decimal places.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ForecastProvider`] | Trait for forecast sources |
//! | [`OpenMeteoProvider`] | Open-Meteo daily forecast client |
//! | [`DailyForecast`] | One normalized day |
//! | [`ForecastMap`] | Window keyed by `YYYY-MM-DD` |

mod open_meteo;
mod types;

pub use open_meteo::{normalize, OpenMeteoProvider};
pub use types::{DailyForecast, ForecastMap, OpenMeteoDaily, OpenMeteoResponse};

use crate::transport::TransportError;
use async_trait::async_trait;

#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_forecast(&self, lat: &str, lon: &str) -> Result<ForecastMap, ProviderError>;
    fn name(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Malformed forecast response: {0}")]
    Shape(String),

    #[error("Invalid forecast URL: {0}")]
    InvalidUrl(String),
}
