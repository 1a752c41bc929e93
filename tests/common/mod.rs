//! Test doubles for the store and provider boundaries.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use weather_forecast_cache::cache::{CachedRecord, ForecastCache, KeyValueStore, MemoryStore};
use weather_forecast_cache::clock::{Clock, FixedClock};
use weather_forecast_cache::provider::{
    DailyForecast, ForecastMap, ForecastProvider, ProviderError,
};
use weather_forecast_cache::service::WeatherService;
use weather_forecast_cache::{Error, Result};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 10).unwrap()
}

pub fn day(offset: i64) -> String {
    (today() + chrono::Duration::days(offset))
        .format("%Y-%m-%d")
        .to_string()
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::on(today()))
}

/// Memory store that records traffic and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    inner: Option<MemoryStore>,
    pub gets: AtomicUsize,
    pub puts: Mutex<Vec<String>>,
    pub fail_get: bool,
    pub fail_put_keys: HashSet<String>,
    /// Key reported on every record read back, whatever key was stored.
    pub read_key: Option<String>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: Some(MemoryStore::new(1024)),
            ..Default::default()
        }
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_get: true,
            ..Self::new()
        }
    }

    pub fn failing_writes_for(keys: &[&str]) -> Self {
        Self {
            fail_put_keys: keys.iter().map(|k| k.to_string()).collect(),
            ..Self::new()
        }
    }

    pub fn reading_back_key(key: &str) -> Self {
        Self {
            read_key: Some(key.to_string()),
            ..Self::new()
        }
    }

    pub fn put_keys(&self) -> Vec<String> {
        let mut keys = self.puts.lock().unwrap().clone();
        keys.sort();
        keys
    }

    pub async fn seed(&self, record: CachedRecord) {
        self.inner.as_ref().unwrap().put(record).await.unwrap();
    }

    pub async fn peek(&self, key: &str) -> Option<CachedRecord> {
        self.inner.as_ref().unwrap().get(key).await.unwrap()
    }
}

#[async_trait]
impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<CachedRecord>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_get {
            return Err(Error::cache_unavailable("store offline"));
        }
        let record = self.inner.as_ref().unwrap().get(key).await?;
        Ok(match &self.read_key {
            Some(k) => record.map(|r| CachedRecord { key: k.clone(), ..r }),
            None => record,
        })
    }

    async fn put(&self, record: CachedRecord) -> Result<()> {
        self.puts.lock().unwrap().push(record.key.clone());
        if self.fail_put_keys.contains(&record.key) {
            return Err(Error::cache_unavailable("throughput exceeded"));
        }
        self.inner.as_ref().unwrap().put(record).await
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Provider returning a canned window, or failing.
pub struct StubProvider {
    response: Mutex<Option<ForecastMap>>,
    pub calls: AtomicUsize,
}

impl StubProvider {
    pub fn returning(map: ForecastMap) -> Self {
        Self {
            response: Mutex::new(Some(map)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForecastProvider for StubProvider {
    async fn fetch_forecast(&self, _lat: &str, _lon: &str) -> std::result::Result<ForecastMap, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ProviderError::Shape("some error".into()))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

pub fn forecast(lat: &str, lon: &str, date: &str, temp: f64, uv: f64, rain: f64) -> DailyForecast {
    DailyForecast {
        latitude: lat.into(),
        longitude: lon.into(),
        date: date.into(),
        temp_max: temp,
        uv_index: uv,
        rain_probability: rain,
    }
}

pub fn window(lat: &str, lon: &str, days: i64) -> ForecastMap {
    (0..days)
        .map(|i| {
            let date = day(i);
            let f = forecast(lat, lon, &date, 20.0 + i as f64, 3.0, 10.0 * i as f64);
            (date, f)
        })
        .collect()
}

pub fn service(provider: Arc<StubProvider>, store: Arc<RecordingStore>) -> WeatherService {
    let clock: Arc<dyn Clock> = clock();
    let cache = Arc::new(ForecastCache::new(store, Duration::from_secs(600), clock.clone()));
    WeatherService::new(provider, cache, clock)
}
