pub mod cache;
pub mod config;
pub mod fetch;
pub mod format;
pub mod service;
pub mod store;

pub use service::WeatherService;

// Re-export types needed for testing
pub use service::{CityRequest, ClearCacheRequest, CoordinatesRequest};
