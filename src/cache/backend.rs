//! Key-value store boundary and in-process store implementations.

use crate::clock::{Clock, SystemClock};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// One day's forecast as persisted in the store.
///
/// Field names match the item attributes of the deployed table, so an adapter
/// for a remote store can persist the serialized form unchanged. `TTL` doubles
/// as the attribute a store's native expiry mechanism can key on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRecord {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "TempMax")]
    pub temp_max: f64,
    #[serde(rename = "UVIndex")]
    pub uv_index: f64,
    #[serde(rename = "RainProb")]
    pub rain_probability: f64,
    #[serde(rename = "TTL")]
    pub expires_at_epoch_seconds: i64,
}

impl CachedRecord {
    pub fn is_expired_at(&self, now_epoch_seconds: i64) -> bool {
        self.expires_at_epoch_seconds < now_epoch_seconds
    }
}

/// Table used when none is configured.
pub const DEFAULT_TABLE: &str = "WeatherCache";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CachedRecord>>;
    async fn put(&self, record: CachedRecord) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Bounded in-memory store.
///
/// Records live under a table name; stores created with [`MemoryStore::table`]
/// share capacity with their parent but never see each other's keys.
/// Expired items are kept until space is needed; on overflow they are evicted
/// first, then the entry with the earliest expiry.
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, CachedRecord>>>,
    table: String,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            table: DEFAULT_TABLE.to_string(),
            max_entries: max_entries.max(1),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Time source used to decide which entries are expired on overflow.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Another table over the same backing map.
    pub fn table(&self, table: impl Into<String>) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            table: table.into(),
            max_entries: self.max_entries,
            clock: Arc::clone(&self.clock),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Entries across every table sharing this store's map.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &str) -> String {
        format!("{}/{}", self.table, key)
    }

    fn evict_if_needed(&self, entries: &mut HashMap<String, CachedRecord>, incoming: &str) {
        if entries.contains_key(incoming) || entries.len() < self.max_entries {
            return;
        }
        let now = self.clock.now_epoch_seconds();
        entries.retain(|_, r| !r.is_expired_at(now));
        while entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, r)| r.expires_at_epoch_seconds)
                .map(|(k, _)| k.clone());
            if let Some(k) = oldest {
                entries.remove(&k);
            } else {
                break;
            }
        }
    }
}

fn poisoned() -> Error {
    Error::cache_unavailable("memory store lock poisoned")
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CachedRecord>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(&self.slot(key)).cloned())
    }

    async fn put(&self, record: CachedRecord) -> Result<()> {
        let slot = self.slot(&record.key);
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        self.evict_if_needed(&mut entries, &slot);
        entries.insert(slot, record);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Store that keeps nothing; every lookup misses.
pub struct NullStore;
impl NullStore {
    pub fn new() -> Self {
        Self
    }
}
impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for NullStore {
    async fn get(&self, _: &str) -> Result<Option<CachedRecord>> {
        Ok(None)
    }
    async fn put(&self, _: CachedRecord) -> Result<()> {
        Ok(())
    }
    fn name(&self) -> &'static str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    const NOW: i64 = 1_752_105_600;

    fn record(key: &str, expires: i64) -> CachedRecord {
        CachedRecord {
            key: key.to_string(),
            temp_max: 30.5,
            uv_index: 7.8,
            rain_probability: 40.0,
            expires_at_epoch_seconds: expires,
        }
    }

    #[tokio::test]
    async fn test_memory_store_put_then_get() {
        let store = MemoryStore::new(10);
        store.put(record("42.0_23.0_2025-07-10", 123)).await.unwrap();
        let got = store.get("42.0_23.0_2025-07-10").await.unwrap();
        assert_eq!(got, Some(record("42.0_23.0_2025-07-10", 123)));
        assert!(store.get("42.0_23.0_2025-07-11").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_overwrites_same_key() {
        let store = MemoryStore::new(10);
        store.put(record("k_k_k", 1)).await.unwrap();
        let mut newer = record("k_k_k", 2);
        newer.temp_max = 12.0;
        store.put(newer.clone()).await.unwrap();
        assert_eq!(store.get("k_k_k").await.unwrap(), Some(newer));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_evicts_when_full() {
        let store = MemoryStore::new(2).with_clock(Arc::new(FixedClock::at_epoch(NOW)));
        store.put(record("a_a_a", NOW - 1)).await.unwrap();
        store.put(record("b_b_b", NOW + 3600)).await.unwrap();
        store.put(record("c_c_c", NOW + 3601)).await.unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get("a_a_a").await.unwrap().is_none());
        assert!(store.get("b_b_b").await.unwrap().is_some());
        assert!(store.get("c_c_c").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_memory_store_eviction_uses_injected_clock() {
        // Both entries are live by wall time but expired at the injected instant.
        let clock = Arc::new(FixedClock::at_epoch(i64::MAX));
        let store = MemoryStore::new(2).with_clock(clock);
        store.put(record("a_a_a", NOW + 10)).await.unwrap();
        store.put(record("b_b_b", NOW + 20)).await.unwrap();
        store.put(record("c_c_c", NOW + 5)).await.unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get("c_c_c").await.unwrap().is_some());
        assert!(store.get("b_b_b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_tables_are_isolated() {
        let forecasts = MemoryStore::new(10).with_table("Forecasts");
        let archive = forecasts.table("Archive");
        assert_eq!(forecasts.table_name(), "Forecasts");
        assert_eq!(MemoryStore::new(1).table_name(), DEFAULT_TABLE);

        forecasts.put(record("42.0_23.0_2025-07-10", 1)).await.unwrap();
        assert!(archive.get("42.0_23.0_2025-07-10").await.unwrap().is_none());

        archive.put(record("42.0_23.0_2025-07-10", 2)).await.unwrap();
        assert_eq!(
            forecasts.get("42.0_23.0_2025-07-10").await.unwrap().unwrap().expires_at_epoch_seconds,
            1
        );
        assert_eq!(forecasts.len(), 2);
    }

    #[tokio::test]
    async fn test_null_store_never_hits() {
        let store = NullStore::new();
        store.put(record("a_a_a", i64::MAX)).await.unwrap();
        assert!(store.get("a_a_a").await.unwrap().is_none());
        assert_eq!(store.name(), "null");
    }

    #[test]
    fn test_record_serializes_with_item_attribute_names() {
        let json = serde_json::to_value(record("42.0_23.0_2025-07-10", 5)).unwrap();
        assert_eq!(json["Key"], "42.0_23.0_2025-07-10");
        assert_eq!(json["UVIndex"], 7.8);
        assert_eq!(json["RainProb"], 40.0);
        assert_eq!(json["TTL"], 5);
    }
}
