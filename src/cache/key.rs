//! Cache key codec: `<lat>_<lon>_<date>`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const KEY_SEPARATOR: char = '_';

/// Composite key of one day's forecast at one location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

/// Components recovered from a [`CacheKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParts {
    pub latitude: String,
    pub longitude: String,
    pub date: String,
}

impl CacheKey {
    /// Joins the three components with `_`. Callers guarantee none of them contains `_`.
    pub fn build(latitude: &str, longitude: &str, date: &str) -> Self {
        Self(format!(
            "{latitude}{KEY_SEPARATOR}{longitude}{KEY_SEPARATOR}{date}"
        ))
    }

    pub fn parse(&self) -> Result<KeyParts> {
        let mut parts = self.0.split(KEY_SEPARATOR);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(latitude), Some(longitude), Some(date), None) => Ok(KeyParts {
                latitude: latitude.to_string(),
                longitude: longitude.to_string(),
                date: date.to_string(),
            }),
            _ => Err(Error::MalformedKey {
                key: self.0.clone(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}
