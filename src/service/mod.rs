//! 天气服务模块：校验请求、查询缓存、回源获取预报并回填整个预报窗口。
//!
//! # Weather Service
//!
//! [`WeatherService`] answers "weather at (lat, lon) on date D":
//!
//! 1. validate the query and check the date lies in `[today, today + 7]`
//! 2. look the day up in the [`ForecastCache`]; any cache failure counts as a miss
//! 3. on a miss, fetch the whole forecast window from the [`ForecastProvider`]
//! 4. write every returned day back to the cache (bounded concurrency, best effort,
//!    all writes awaited before returning)
//! 5. answer with the requested day as JSON
//!
//! | Status | When |
//! |--------|------|
//! | 200 | forecast found (cache or provider) |
//! | 400 | missing/invalid lat, lon or date; date outside the window; response encoding failed |
//! | 404 | provider answered without the requested date |
//! | 502 | provider fetch failed |
//!
//! Non-validation failures are logged under a correlation id which is echoed
//! in the body as `[<id>] <message>`.

mod mapper;
mod request;
mod response;

pub use mapper::{cached_record_to_response, forecast_to_payload, forecast_to_response};
pub use request::{
    ForecastQuery, ValidatedQuery, DATE_FORMAT, FORECAST_WINDOW_DAYS, MSG_DATE_IN_PAST,
    MSG_DATE_TOO_FAR, MSG_INVALID_COORDINATES, MSG_INVALID_DATE, MSG_MISSING_COORDINATES,
};
pub use response::{ServiceResponse, WeatherResponse, CONTENT_TYPE_JSON};

use crate::batch::{BatchExecutor, BatchStrategy};
use crate::cache::{CacheKey, ForecastCache, KeyValueStore};
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::logging::log_error;
use crate::provider::{DailyForecast, ForecastMap, ForecastProvider, OpenMeteoProvider};
use crate::transport::HttpTransport;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

pub const MSG_PROVIDER_FAILED: &str = "Weather api error";
pub const MSG_DATE_NOT_FOUND: &str = "Weather forecast not found for this date";
pub const MSG_ENCODING_FAILED: &str = "Error while generating response";

pub struct WeatherService {
    provider: Arc<dyn ForecastProvider>,
    cache: Arc<ForecastCache>,
    clock: Arc<dyn Clock>,
    writer: BatchExecutor,
}

impl WeatherService {
    pub fn new(
        provider: Arc<dyn ForecastProvider>,
        cache: Arc<ForecastCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            cache,
            clock,
            writer: BatchExecutor::default(),
        }
    }

    /// Wires the Open-Meteo provider and a cache over `store` from `config`.
    pub fn from_config(config: &AppConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let transport = HttpTransport::new(config.http_timeout).map_err(|e| {
            Error::configuration_with_context(
                "failed to build HTTP client",
                crate::ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("http_transport"),
            )
        })?;
        let provider = Arc::new(OpenMeteoProvider::new(transport, config.forecast_url.clone()));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache = Arc::new(ForecastCache::new(store, config.ttl(), clock.clone()));
        Ok(Self::new(provider, cache, clock).with_write_strategy(BatchStrategy::Concurrent {
            max_concurrency: config.max_concurrent_writes,
        }))
    }

    /// How the post-fetch cache writes are scheduled.
    pub fn with_write_strategy(mut self, strategy: BatchStrategy) -> Self {
        self.writer = BatchExecutor::new(strategy);
        self
    }

    pub fn cache(&self) -> &ForecastCache {
        &self.cache
    }

    pub async fn handle_request(&self, query: ForecastQuery) -> ServiceResponse {
        let span = info_span!("weather_request", request_id = %Uuid::new_v4());
        self.handle(query).instrument(span).await
    }

    async fn handle(&self, query: ForecastQuery) -> ServiceResponse {
        info!(
            lat = %query.latitude,
            lon = %query.longitude,
            date = query.date.as_deref().unwrap_or(""),
            "Going to handle request"
        );

        let query = match query.validate(self.clock.today()) {
            Ok(q) => q,
            Err(Error::Validation { message }) => return ServiceResponse::text(400, message),
            Err(e) => return ServiceResponse::text(e.status_code(), e.to_string()),
        };
        let date = query.date_string();
        let key = CacheKey::build(&query.latitude, &query.longitude, &date);

        if let Some(response) = self.lookup(&key).await {
            info!(key = %key, "Got weather from cache");
            return respond(&response);
        }

        info!(key = %key, "Did not find weather in cache, will fetch from provider");
        let forecasts = match self
            .provider
            .fetch_forecast(&query.latitude, &query.longitude)
            .await
        {
            Ok(f) => f,
            Err(e) => {
                let err = Error::from(e);
                let id = log_error(
                    &err,
                    &[("lat", &query.latitude), ("lon", &query.longitude)],
                );
                return ServiceResponse::correlated(err.status_code(), &id, MSG_PROVIDER_FAILED);
            }
        };

        let response = match forecasts.get(&date) {
            Some(forecast) => forecast_to_response(&date, forecast),
            None => {
                let err = Error::NotFound { date: date.clone() };
                let id = log_error(
                    &err,
                    &[
                        ("lat", &query.latitude),
                        ("lon", &query.longitude),
                        ("date", &date),
                    ],
                );
                return ServiceResponse::correlated(err.status_code(), &id, MSG_DATE_NOT_FOUND);
            }
        };

        self.populate(forecasts).await;
        respond(&response)
    }

    /// Cache read; every failure degrades to a miss.
    async fn lookup(&self, key: &CacheKey) -> Option<WeatherResponse> {
        let record = match self.cache.get(key).await {
            Ok(r) => r?,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache lookup failed, treating as miss");
                return None;
            }
        };
        match cached_record_to_response(&record) {
            Ok(r) => Some(r),
            Err(e) => {
                log_error(&e, &[("key", key)]);
                None
            }
        }
    }

    /// Writes every day of the fetched window; failures are logged individually.
    async fn populate(&self, forecasts: ForecastMap) {
        let items: Vec<(String, DailyForecast)> = forecasts.into_iter().collect();
        let cache = &self.cache;
        let outcome = self
            .writer
            .execute(items, |(date, forecast)| async move {
                let key = CacheKey::build(&forecast.latitude, &forecast.longitude, &date);
                match cache.put(&key, forecast_to_payload(&forecast)).await {
                    Ok(()) => Ok(key),
                    Err(e) => Err((key, e)),
                }
            })
            .await;

        for (_, (key, err)) in &outcome.failures {
            log_error(err, &[("key", key)]);
        }
        info!(
            written = outcome.success_count(),
            failed = outcome.failure_count(),
            elapsed_ms = outcome.execution_time.as_millis() as u64,
            "Populated forecast cache"
        );
    }
}

fn respond(response: &WeatherResponse) -> ServiceResponse {
    match response.to_json() {
        Ok(body) => ServiceResponse::json(200, body),
        Err(e) => {
            let err = Error::Serialization(e);
            let id = log_error(&err, &[("date", &response.date)]);
            ServiceResponse::correlated(err.status_code(), &id, MSG_ENCODING_FAILED)
        }
    }
}
