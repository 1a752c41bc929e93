use crate::cache::KEY_SEPARATOR;
use crate::{Error, Result};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Days past today a forecast may be requested for.
pub const FORECAST_WINDOW_DAYS: i64 = 7;

pub const MSG_MISSING_COORDINATES: &str = "Missing lat/lon";
pub const MSG_INVALID_COORDINATES: &str = "Invalid lat/lon";
pub const MSG_INVALID_DATE: &str = "Invalid date";
pub const MSG_DATE_IN_PAST: &str = "Invalid date: Date could not be older than today";
pub const MSG_DATE_TOO_FAR: &str = "Invalid date: Date could not be 7 day from today";

/// Raw inbound query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastQuery {
    pub latitude: String,
    pub longitude: String,
    pub date: Option<String>,
}

/// A query that passed validation; `date` is always set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub latitude: String,
    pub longitude: String,
    pub date: NaiveDate,
}

impl ValidatedQuery {
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

impl ForecastQuery {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            date: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Reads `lat`, `lon` and the optional `date` query parameters.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            latitude: params.get("lat").cloned().unwrap_or_default(),
            longitude: params.get("lon").cloned().unwrap_or_default(),
            date: params.get("date").filter(|d| !d.is_empty()).cloned(),
        }
    }

    /// Checks presence and shape of every field and that the date lies in
    /// `[today, today + 7]`. An omitted date defaults to `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidatedQuery> {
        let latitude = self.latitude.trim();
        let longitude = self.longitude.trim();
        if latitude.is_empty() || longitude.is_empty() {
            return Err(Error::validation(MSG_MISSING_COORDINATES));
        }
        // Coordinates end up as key components.
        if latitude.contains(KEY_SEPARATOR) || longitude.contains(KEY_SEPARATOR) {
            return Err(Error::validation(MSG_INVALID_COORDINATES));
        }

        let date = match self.date.as_deref() {
            None => today,
            Some(raw) => parse_date(raw)?,
        };

        if date < today {
            return Err(Error::validation(MSG_DATE_IN_PAST));
        }
        if date > today + Duration::days(FORECAST_WINDOW_DAYS) {
            return Err(Error::validation(MSG_DATE_TOO_FAR));
        }

        Ok(ValidatedQuery {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            date,
        })
    }
}

/// Strict `YYYY-MM-DD`: zero-padded, no surrounding text.
fn parse_date(raw: &str) -> Result<NaiveDate> {
    if raw.len() != 10 {
        return Err(Error::validation(MSG_INVALID_DATE));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| Error::validation(MSG_INVALID_DATE))
}
