use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Public success payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherResponse {
    pub date: String,
    pub latitude: String,
    pub longitude: String,
    #[serde(serialize_with = "compact_number")]
    pub temperature: f64,
    #[serde(serialize_with = "compact_number")]
    pub uv_index: f64,
    #[serde(serialize_with = "compact_number")]
    pub rain_probability: f64,
}

impl WeatherResponse {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Integral values as JSON integers (`23`, not `23.0`); non-finite values are rejected.
fn compact_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !value.is_finite() {
        return Err(serde::ser::Error::custom(format!(
            "cannot encode non-finite number {value}"
        )));
    }
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Transport-neutral response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ServiceResponse {
    pub fn json(status: u16, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string());
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// `[<correlation id>] <message>`
    pub fn correlated(status: u16, correlation_id: &str, message: &str) -> Self {
        Self::text(status, format!("[{correlation_id}] {message}"))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
