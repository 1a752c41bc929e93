use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized forecast for one calendar day at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Provider-resolved latitude, 4 decimal places.
    pub latitude: String,
    /// Provider-resolved longitude, 4 decimal places.
    pub longitude: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub temp_max: f64,
    pub uv_index: f64,
    pub rain_probability: f64,
}

/// Forecast window keyed by `YYYY-MM-DD`.
pub type ForecastMap = BTreeMap<String, DailyForecast>;

/// Open-Meteo `/v1/forecast` response, daily aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenMeteoResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub daily: OpenMeteoDaily,
}

/// Parallel, index-aligned arrays; one slot per day.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenMeteoDaily {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub uv_index_max: Vec<Option<f64>>,
    pub precipitation_probability_max: Vec<Option<f64>>,
}
