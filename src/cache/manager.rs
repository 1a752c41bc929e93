//! Forecast cache adapter: TTL stamping on write, soft expiry on read.

use super::backend::{CachedRecord, KeyValueStore};
use super::key::CacheKey;
use crate::clock::Clock;
use crate::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Values written for one forecast day; key and expiry are added by [`ForecastCache::put`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachePayload {
    pub temp_max: f64,
    pub uv_index: f64,
    pub rain_probability: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub writes: u64,
    pub errors: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
    writes: AtomicU64,
    errors: AtomicU64,
}
impl AtomicStats {
    fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

pub struct ForecastCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    stats: AtomicStats,
}

impl ForecastCache {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            ttl,
            clock,
            stats: AtomicStats::new(),
        }
    }

    /// Looks up `key`. Records whose expiry lies strictly in the past are reported as absent.
    pub async fn get(&self, key: &CacheKey) -> Result<Option<CachedRecord>> {
        if key.is_empty() {
            return Err(Error::InvalidKey);
        }
        info!(key = %key, store = self.store.name(), "Going to get a weather from cache");

        let record = match self.store.get(key.as_str()).await {
            Ok(r) => r,
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                return Err(into_unavailable(e));
            }
        };

        match record {
            Some(r) if r.is_expired_at(self.clock.now_epoch_seconds()) => {
                debug!(key = %key, expires_at = r.expires_at_epoch_seconds, "Ignoring expired cache record");
                self.stats.expired.fetch_add(1, Ordering::Relaxed);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
            Some(r) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(r))
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    /// Writes `payload` under `key`, stamping expiry as now + TTL.
    pub async fn put(&self, key: &CacheKey, payload: CachePayload) -> Result<()> {
        if key.is_empty() {
            return Err(Error::InvalidKey);
        }
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let record = CachedRecord {
            key: key.as_str().to_string(),
            temp_max: payload.temp_max,
            uv_index: payload.uv_index,
            rain_probability: payload.rain_probability,
            expires_at_epoch_seconds: self.clock.now_epoch_seconds().saturating_add(ttl),
        };
        match self.store.put(record).await {
            Ok(()) => {
                self.stats.writes.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                Err(into_unavailable(e))
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

fn into_unavailable(e: Error) -> Error {
    match e {
        Error::CacheUnavailable { .. } => e,
        other => Error::cache_unavailable(other.to_string()),
    }
}
