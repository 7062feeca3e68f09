use std::fmt::Write;

use chrono::DateTime;

use crate::fetch::{ForecastSeries, WeatherSnapshot};

const FORECAST_ENTRY_LIMIT: usize = 5;

pub fn format_snapshot(snapshot: &WeatherSnapshot) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Current weather for {}, {}:",
        snapshot.name, snapshot.sys.country
    );
    let _ = writeln!(
        buffer,
        "Temperature: {}°C (feels like {}°C)",
        snapshot.main.temp, snapshot.main.feels_like
    );
    if let Some(condition) = snapshot.weather.first() {
        let _ = writeln!(
            buffer,
            "Conditions: {} - {}",
            condition.main, condition.description
        );
    }
    let _ = writeln!(buffer, "Humidity: {}%", snapshot.main.humidity);
    let _ = writeln!(
        buffer,
        "Wind: {} m/s, direction: {}°",
        snapshot.wind.speed, snapshot.wind.deg
    );
    let _ = writeln!(buffer, "Sunrise: {}", format_time(snapshot.sys.sunrise));
    let _ = write!(buffer, "Sunset: {}", format_time(snapshot.sys.sunset));
    buffer
}

pub fn format_forecast(series: &ForecastSeries) -> String {
    let mut buffer = format!(
        "5-day forecast for {}, {}:\n\n",
        series.city.name, series.city.country
    );

    let blocks: Vec<String> = series
        .list
        .iter()
        .take(FORECAST_ENTRY_LIMIT)
        .map(|entry| {
            let mut block = String::new();
            let _ = writeln!(block, "{}:", entry.dt_txt);
            let _ = writeln!(
                block,
                "Temperature: {}°C (feels like {}°C)",
                entry.main.temp, entry.main.feels_like
            );
            if let Some(condition) = entry.weather.first() {
                let _ = writeln!(
                    block,
                    "Conditions: {} - {}",
                    condition.main, condition.description
                );
            }
            let _ = writeln!(block, "Humidity: {}%", entry.main.humidity);
            let _ = write!(block, "Wind: {} m/s", entry.wind.speed);
            block
        })
        .collect();

    buffer.push_str(&blocks.join("\n\n"));
    buffer
}

fn format_time(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
