//! Time source shared by the cache adapter and the orchestrator.

use chrono::{NaiveDate, Utc};

/// Source of "now" for TTL stamping, expiry checks and the date window.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> i64;
    /// Current calendar date (UTC).
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    epoch_seconds: i64,
}

impl FixedClock {
    pub fn at_epoch(epoch_seconds: i64) -> Self {
        Self { epoch_seconds }
    }

    /// Midnight UTC of `date`.
    pub fn on(date: NaiveDate) -> Self {
        let epoch_seconds = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default();
        Self { epoch_seconds }
    }
}

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> i64 {
        self.epoch_seconds
    }

    fn today(&self) -> NaiveDate {
        chrono::DateTime::from_timestamp(self.epoch_seconds, 0)
            .map(|dt| dt.date_naive())
            .unwrap_or(NaiveDate::MIN)
    }
}
