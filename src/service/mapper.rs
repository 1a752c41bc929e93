//! Conversions between cached records, provider forecasts and the public payload.

use super::response::WeatherResponse;
use crate::cache::{CacheKey, CachePayload, CachedRecord};
use crate::provider::DailyForecast;
use crate::Result;

/// Location and date come from the record's key, not from stored fields.
pub fn cached_record_to_response(record: &CachedRecord) -> Result<WeatherResponse> {
    let parts = CacheKey::from(record.key.as_str()).parse()?;
    Ok(WeatherResponse {
        date: parts.date,
        latitude: parts.latitude,
        longitude: parts.longitude,
        temperature: record.temp_max,
        uv_index: record.uv_index,
        rain_probability: record.rain_probability,
    })
}

pub fn forecast_to_response(date: &str, forecast: &DailyForecast) -> WeatherResponse {
    WeatherResponse {
        date: date.to_string(),
        latitude: forecast.latitude.clone(),
        longitude: forecast.longitude.clone(),
        temperature: forecast.temp_max,
        uv_index: forecast.uv_index,
        rain_probability: forecast.rain_probability,
    }
}

pub fn forecast_to_payload(forecast: &DailyForecast) -> CachePayload {
    CachePayload {
        temp_max: forecast.temp_max,
        uv_index: forecast.uv_index,
        rain_probability: forecast.rain_probability,
    }
}
