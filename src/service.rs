use std::sync::Arc;

use rmcp::{
    ErrorData, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    schemars::{self, JsonSchema},
    serde_json::json,
    tool, tool_handler, tool_router,
};
use serde::Deserialize;
use tracing::warn;

use crate::cache;
use crate::fetch::OpenWeatherClient;
use crate::format;
use crate::store::{Store, StoreError};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CityRequest {
    #[schemars(description = "City name, optionally with country code, e.g. \"London\" or \"London,uk\"")]
    pub city: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CoordinatesRequest {
    #[schemars(description = "Latitude in decimal degrees")]
    pub latitude: f64,
    #[schemars(description = "Longitude in decimal degrees")]
    pub longitude: f64,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ClearCacheRequest {
    #[serde(default)]
    #[schemars(description = "City whose cached entries should be removed; omit to clear the whole weather cache")]
    pub city: Option<String>,
}

#[derive(Clone)]
pub struct WeatherService {
    tool_router: ToolRouter<Self>,
    fetcher: OpenWeatherClient,
    store: Arc<dyn Store>,
    cache_ttl: u64,
}

impl WeatherService {
    pub fn new(fetcher: OpenWeatherClient, store: Arc<dyn Store>, cache_ttl: u64) -> Self {
        Self {
            tool_router: Self::tool_router(),
            fetcher,
            store,
            cache_ttl,
        }
    }

    fn require_city(raw: &str) -> Result<String, ErrorData> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ErrorData::invalid_params(
                "Error: city: required",
                Some(json!({"city": raw})),
            ));
        }
        Ok(trimmed.to_string())
    }

    async fn clear_all(&self) -> Result<usize, StoreError> {
        let keys = self.store.keys_matching("weather:*").await?;
        if keys.is_empty() {
            return Ok(0);
        }
        self.store.delete(&keys).await
    }
}

#[tool_router]
impl WeatherService {
    #[tool(description = "Get current weather conditions for a city")]
    pub async fn get_current_weather(
        &self,
        Parameters(request): Parameters<CityRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let city = Self::require_city(&request.city)?;
        let key = format!("weather:current:{}", city);

        let fetcher = self.fetcher.clone();
        let lookup = city.clone();
        let snapshot = cache::get_or_fetch(
            self.store.as_ref(),
            &key,
            self.cache_ttl,
            move || async move {
                match fetcher.current_by_city(&lookup).await {
                    Ok(snapshot) => Some(snapshot),
                    Err(e) => {
                        warn!(city = %lookup, error = %e, "current weather fetch failed");
                        None
                    }
                }
            },
        )
        .await;

        let text = match snapshot {
            Some(snapshot) => format::format_snapshot(&snapshot),
            None => format!(
                "Failed to retrieve weather data for {}. Please check the city name and try again.",
                city
            ),
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Get a 5-day weather forecast for a city")]
    pub async fn get_weather_forecast(
        &self,
        Parameters(request): Parameters<CityRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let city = Self::require_city(&request.city)?;
        let key = format!("weather:forecast:{}", city);

        let fetcher = self.fetcher.clone();
        let lookup = city.clone();
        let series = cache::get_or_fetch(
            self.store.as_ref(),
            &key,
            self.cache_ttl,
            move || async move {
                match fetcher.forecast_by_city(&lookup).await {
                    Ok(series) => Some(series),
                    Err(e) => {
                        warn!(city = %lookup, error = %e, "forecast fetch failed");
                        None
                    }
                }
            },
        )
        .await;

        let text = match series {
            Some(series) => format::format_forecast(&series),
            None => format!(
                "Failed to retrieve forecast data for {}. Please check the city name and try again.",
                city
            ),
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Get current weather conditions for a latitude/longitude pair")]
    pub async fn get_weather_by_coordinates(
        &self,
        Parameters(request): Parameters<CoordinatesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let (lat, lon) = (request.latitude, request.longitude);
        let key = format!("weather:current:{},{}", lat, lon);

        let fetcher = self.fetcher.clone();
        let snapshot = cache::get_or_fetch(
            self.store.as_ref(),
            &key,
            self.cache_ttl,
            move || async move {
                match fetcher.current_by_coords(lat, lon).await {
                    Ok(snapshot) => Some(snapshot),
                    Err(e) => {
                        warn!(lat, lon, error = %e, "coordinate weather fetch failed");
                        None
                    }
                }
            },
        )
        .await;

        let text = match snapshot {
            Some(snapshot) => format::format_snapshot(&snapshot),
            None => format!(
                "Failed to retrieve weather data for coordinates ({}, {}).",
                lat, lon
            ),
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Clear cached weather data, for one city or for everything")]
    pub async fn clear_weather_cache(
        &self,
        Parameters(request): Parameters<ClearCacheRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let city = request
            .city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty());

        let text = match city {
            Some(city) => {
                let keys = vec![
                    format!("weather:current:{}", city),
                    format!("weather:forecast:{}", city),
                ];
                match self.store.delete(&keys).await {
                    Ok(_) => format!("Cache cleared for {}.", city),
                    Err(e) => format!("Error clearing cache: {}", e),
                }
            }
            None => match self.clear_all().await {
                Ok(count) => format!("All weather cache cleared. Removed {} entries.", count),
                Err(e) => format!("Error clearing cache: {}", e),
            },
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for WeatherService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Weather MCP server backed by OpenWeatherMap with a Redis read-through cache. \
                 Use get_current_weather or get_weather_forecast with a city name, \
                 get_weather_by_coordinates with a latitude/longitude pair, and \
                 clear_weather_cache to drop cached entries."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_CRATE_NAME").to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
