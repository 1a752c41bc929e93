//! 预报缓存模块：按天缓存天气预报，写入时标记 TTL，读取时执行软过期。
//!
//! # Forecast Cache Module
//!
//! Per-day forecast records keyed by location and date, stored behind a
//! pluggable key-value boundary.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ForecastCache`] | Adapter adding TTL stamping, soft expiry and statistics |
//! | [`KeyValueStore`] | Trait for the backing store (two operations: get, put) |
//! | [`MemoryStore`] | Bounded in-process store, namespaced by table |
//! | [`NullStore`] | No-op store for disabling caching |
//! | [`CacheKey`] | `<lat>_<lon>_<date>` key codec |
//!
//! ## Expiry
//!
//! Each record carries an absolute expiry (`TTL`, epoch seconds) stamped at
//! write time. [`ForecastCache::get`] reports records past their expiry as
//! absent even when the store still holds them; stores with native TTL
//! eviction may drop them earlier.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use weather_forecast_cache::cache::{ForecastCache, MemoryStore};
//! use weather_forecast_cache::clock::SystemClock;
//!
//! let cache = ForecastCache::new(
//!     Arc::new(MemoryStore::new(10_000)),
//!     Duration::from_secs(10 * 60),
//!     Arc::new(SystemClock),
//! );
//! assert_eq!(cache.ttl().as_secs(), 600);
//! ```

mod backend;
mod key;
mod manager;

pub use backend::{CachedRecord, KeyValueStore, MemoryStore, NullStore, DEFAULT_TABLE};
pub use key::{CacheKey, KeyParts, KEY_SEPARATOR};
pub use manager::{CachePayload, CacheStats, ForecastCache};
