use std::error::Error;
use std::sync::Arc;

use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing_subscriber::EnvFilter;

use openweather_mcp::config::{CACHE_TTL_SECONDS, Config};
use openweather_mcp::fetch::OpenWeatherClient;
use openweather_mcp::service::WeatherService;
use openweather_mcp::store::RedisStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr; stdout carries the MCP transport.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let store = Arc::new(RedisStore::connect(&config.redis_url()).await);
    if !store.is_connected() {
        tracing::warn!("running without cache store");
    }

    let fetcher = OpenWeatherClient::new(&config.api_base, config.api_key.clone())?;
    let service = WeatherService::new(fetcher, store, CACHE_TTL_SECONDS);

    tracing::info!("start server, connect to standard input/output");

    let service = service.serve(stdio()).await?;
    let reason = service.waiting().await?;
    tracing::info!(?reason, "MCP server stopped");

    Ok(())
}
