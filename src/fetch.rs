use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clouds {
    pub all: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locale {
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Current conditions as reported by the upstream `/weather` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: String,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub main: Metrics,
    pub wind: Wind,
    pub clouds: Clouds,
    pub sys: Locale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: Metrics,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub wind: Wind,
    pub clouds: Clouds,
    pub dt_txt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub country: String,
}

/// Chronological forecast as reported by the upstream `/forecast` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub list: Vec<ForecastEntry>,
    pub city: City,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Error: upstream: status {0}")]
    UpstreamStatus(u16),
    #[error("Error: upstream: unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("Error: upstream: decode failed: {0}")]
    Decode(String),
}

#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    weather_url: Url,
    forecast_url: Url,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base: &Url, api_key: String) -> Result<Self, ConfigError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let weather_url = base
            .join("weather")
            .map_err(|e| ConfigError::Invalid(format!("invalid base url: {}", e)))?;
        let forecast_url = base
            .join("forecast")
            .map_err(|e| ConfigError::Invalid(format!("invalid base url: {}", e)))?;

        Ok(Self {
            client: Client::new(),
            weather_url,
            forecast_url,
            api_key,
        })
    }

    pub async fn current_by_city(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        self.request(&self.weather_url, &[("q", city)]).await
    }

    pub async fn current_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherSnapshot, FetchError> {
        let lat = lat.to_string();
        let lon = lon.to_string();
        self.request(&self.weather_url, &[("lat", lat.as_str()), ("lon", lon.as_str())])
            .await
    }

    pub async fn forecast_by_city(&self, city: &str) -> Result<ForecastSeries, FetchError> {
        self.request(&self.forecast_url, &[("q", city)]).await
    }

    // Single attempt, no retry. Callers decide what a failure means.
    async fn request<T: DeserializeOwned>(
        &self,
        url: &Url,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .query(params)
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
