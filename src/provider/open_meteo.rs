use super::types::{DailyForecast, ForecastMap, OpenMeteoResponse};
use super::{ForecastProvider, ProviderError};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use tracing::info;

/// Forecast source backed by the Open-Meteo daily forecast API.
///
/// `url_template` carries the full request URL with `{lat}` and `{lon}`
/// placeholders (positional `%s` placeholders are also accepted, latitude
/// first). A template without placeholders gets `latitude`/`longitude`
/// query parameters appended.
pub struct OpenMeteoProvider {
    transport: HttpTransport,
    url_template: String,
}

impl OpenMeteoProvider {
    pub fn new(transport: HttpTransport, url_template: impl Into<String>) -> Self {
        Self {
            transport,
            url_template: url_template.into(),
        }
    }

    pub fn request_url(&self, lat: &str, lon: &str) -> Result<String, ProviderError> {
        let template = &self.url_template;
        if template.contains("{lat}") || template.contains("{lon}") {
            let (lat, lon) = (encode(lat), encode(lon));
            return Ok(template.replace("{lat}", &lat).replace("{lon}", &lon));
        }
        if template.contains("%s") {
            let (lat, lon) = (encode(lat), encode(lon));
            return Ok(template.replacen("%s", &lat, 1).replacen("%s", &lon, 1));
        }
        let mut url = url::Url::parse(template)
            .map_err(|e| ProviderError::InvalidUrl(format!("{template}: {e}")))?;
        url.query_pairs_mut()
            .append_pair("latitude", lat)
            .append_pair("longitude", lon);
        Ok(url.into())
    }
}

/// Query-component encoding, so a coordinate can never add parameters.
fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn fetch_forecast(&self, lat: &str, lon: &str) -> Result<ForecastMap, ProviderError> {
        info!(lat = %lat, lon = %lon, "Going to get forecast from Open-Meteo");
        let url = self.request_url(lat, lon)?;
        let response: OpenMeteoResponse = self.transport.get_json(&url).await?;
        normalize(response)
    }

    fn name(&self) -> &'static str {
        "open-meteo"
    }
}

/// Flattens the parallel daily arrays into one entry per date.
pub fn normalize(response: OpenMeteoResponse) -> Result<ForecastMap, ProviderError> {
    let daily = response.daily;
    let days = daily.time.len();
    for (field, len) in [
        ("temperature_2m_max", daily.temperature_2m_max.len()),
        ("uv_index_max", daily.uv_index_max.len()),
        ("precipitation_probability_max", daily.precipitation_probability_max.len()),
    ] {
        if len != days {
            return Err(ProviderError::Shape(format!(
                "daily.{field} has {len} entries, daily.time has {days}"
            )));
        }
    }

    let latitude = format!("{:.4}", response.latitude);
    let longitude = format!("{:.4}", response.longitude);

    let forecasts = daily
        .time
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let forecast = DailyForecast {
                latitude: latitude.clone(),
                longitude: longitude.clone(),
                date: date.clone(),
                // Missing values decode as zero.
                temp_max: daily.temperature_2m_max[i].unwrap_or_default(),
                uv_index: daily.uv_index_max[i].unwrap_or_default(),
                rain_probability: daily.precipitation_probability_max[i].unwrap_or_default(),
            };
            (date, forecast)
        })
        .collect();
    Ok(forecasts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider(template: &str) -> OpenMeteoProvider {
        OpenMeteoProvider::new(
            HttpTransport::with_client(reqwest::Client::new()),
            template,
        )
    }

    #[test]
    fn test_request_url_named_placeholders() {
        let p = provider("https://api.open-meteo.com/v1/forecast?latitude={lat}&longitude={lon}&daily=uv_index_max");
        assert_eq!(
            p.request_url("42.0", "23.0").unwrap(),
            "https://api.open-meteo.com/v1/forecast?latitude=42.0&longitude=23.0&daily=uv_index_max"
        );
    }

    #[test]
    fn test_request_url_positional_placeholders() {
        let p = provider("https://host/v1/forecast?latitude=%s&longitude=%s&timezone=auto");
        assert_eq!(
            p.request_url("1.5", "-2.5").unwrap(),
            "https://host/v1/forecast?latitude=1.5&longitude=-2.5&timezone=auto"
        );
    }

    #[test]
    fn test_request_url_encodes_coordinates() {
        let p = provider("https://host/v1/forecast?latitude={lat}&longitude={lon}&timezone=auto");
        assert_eq!(
            p.request_url("42.0&timezone=Pacific/Kiritimati", "23.0#").unwrap(),
            "https://host/v1/forecast?latitude=42.0%26timezone%3DPacific%2FKiritimati&longitude=23.0%23&timezone=auto"
        );

        let p = provider("https://host/v1/forecast?latitude=%s&longitude=%s");
        assert_eq!(
            p.request_url("1.5&x=1", "2.5").unwrap(),
            "https://host/v1/forecast?latitude=1.5%26x%3D1&longitude=2.5"
        );
    }

    #[test]
    fn test_request_url_appends_query() {
        let p = provider("https://host/v1/forecast?timezone=auto");
        assert_eq!(
            p.request_url("1.5", "2.5").unwrap(),
            "https://host/v1/forecast?timezone=auto&latitude=1.5&longitude=2.5"
        );
        assert!(matches!(
            provider("not a url").request_url("1", "2"),
            Err(ProviderError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_normalize_keeps_every_day() {
        let raw: OpenMeteoResponse = serde_json::from_value(json!({
            "latitude": 42.0,
            "longitude": 23.000_04,
            "daily": {
                "time": ["2025-07-10", "2025-07-11", "2025-07-12"],
                "temperature_2m_max": [30.5, 28.1, null],
                "uv_index_max": [7.8, 6.0, 5.5],
                "precipitation_probability_max": [40, 10, 0]
            }
        }))
        .unwrap();

        let map = normalize(raw).unwrap();
        assert_eq!(map.len(), 3);
        let first = &map["2025-07-10"];
        assert_eq!(first.latitude, "42.0000");
        assert_eq!(first.longitude, "23.0000");
        assert_eq!(first.temp_max, 30.5);
        assert_eq!(first.rain_probability, 40.0);
        assert_eq!(map["2025-07-12"].temp_max, 0.0);
        assert_eq!(map["2025-07-11"].date, "2025-07-11");
    }

    #[test]
    fn test_normalize_rejects_misaligned_arrays() {
        let raw: OpenMeteoResponse = serde_json::from_value(json!({
            "latitude": 1.0,
            "longitude": 2.0,
            "daily": {
                "time": ["2025-07-10", "2025-07-11"],
                "temperature_2m_max": [30.5],
                "uv_index_max": [7.8, 6.0],
                "precipitation_probability_max": [40, 10]
            }
        }))
        .unwrap();
        assert!(matches!(normalize(raw), Err(ProviderError::Shape(_))));
    }
}
