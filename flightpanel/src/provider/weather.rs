//! Destination weather provider client.
//!
//! The [`WeatherClient`] trait abstracts the weather source. The
//! [`OpenWeatherClient`] implementation queries an OpenWeatherMap-style
//! current-conditions endpoint by coordinates, in imperial units.

use std::future::Future;

use serde::Deserialize;
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::ProviderError;
use crate::status::WeatherReport;

/// Trait for fetching current conditions at a location.
pub trait WeatherClient: Send + Sync {
    /// Fetch current weather for the given coordinates.
    fn query(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<WeatherReport, ProviderError>> + Send;
}

/// Current-conditions endpoint response.
#[derive(Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    weather: Vec<WeatherCondition>,
    main: WeatherMain,
}

#[derive(Deserialize)]
struct WeatherCondition {
    main: String,
}

#[derive(Deserialize)]
struct WeatherMain {
    temp: f64,
}

/// Weather client for an OpenWeatherMap-style API.
pub struct OpenWeatherClient<H: AsyncHttpClient> {
    http: H,
    api_key: String,
    weather_url: String,
}

impl<H: AsyncHttpClient> OpenWeatherClient<H> {
    /// Create a client for the given endpoint and API key.
    pub fn new(http: H, api_key: String, weather_url: String) -> Self {
        Self {
            http,
            api_key,
            weather_url,
        }
    }
}

impl<H: AsyncHttpClient> WeatherClient for OpenWeatherClient<H> {
    async fn query(&self, latitude: f64, longitude: f64) -> Result<WeatherReport, ProviderError> {
        let url = format!(
            "{}?lat={}&lon={}&appid={}&units=imperial",
            self.weather_url, latitude, longitude, self.api_key
        );

        let body = self.http.get(&url).await?;

        let parsed: WeatherResponse =
            serde_json::from_slice(&body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let condition = parsed
            .weather
            .first()
            .map(|w| w.main.clone())
            .ok_or_else(|| ProviderError::Malformed("empty weather array".to_string()))?;

        let report = WeatherReport {
            condition,
            temperature_f: parsed.main.temp.round() as i32,
        };
        debug!(
            condition = %report.condition,
            temperature_f = report.temperature_f,
            "weather provider responded"
        );

        Ok(report)
    }
}
