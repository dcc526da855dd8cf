//! OpenWeatherMap client
//!
//! Uses the 5 day / 3 hour forecast endpoint and folds the 3-hourly readings
//! into one [`ForecastDay`] per local calendar day.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Timelike};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::provider::ForecastProvider;
use crate::config::WeatherConfig;
use crate::models::{ForecastDay, Location};
use crate::{RambleError, Result};

/// Async client for the OpenWeatherMap forecast API
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// Create a client from configuration; fails without an API key
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| RambleError::config("No OpenWeatherMap API key configured"))?;

        Self::with_base_url(
            &config.base_url,
            api_key,
            Duration::from_secs(config.timeout_seconds.into()),
        )
    }

    pub fn with_base_url(base_url: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("Ramble66/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RambleError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherClient {
    #[instrument(skip(self, location), fields(city = %location.display_name()))]
    async fn daily_forecast(&self, location: &Location) -> Result<Vec<ForecastDay>> {
        let start_time = Instant::now();
        // the key is part of the query string, so the URL is never logged
        let url = format!(
            "{}/forecast?lat={:.4}&lon={:.4}&units=imperial&appid={}",
            self.base_url, location.latitude, location.longitude, self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RambleError::api(format!("Weather request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "OpenWeatherMap rejected forecast request");
            return Err(RambleError::api(format!(
                "OpenWeatherMap returned HTTP {status}"
            )));
        }

        let body: ForecastResponse = response.json().await.map_err(|e| {
            RambleError::api(format!("Invalid forecast response: {}", e.without_url()))
        })?;

        let days = fold_daily(&body);
        info!(
            days = days.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Fetched forecast"
        );
        Ok(days)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
    city: Option<CityInfo>,
}

#[derive(Debug, Deserialize)]
struct CityInfo {
    /// Offset from UTC in seconds
    #[serde(default)]
    timezone: i64,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    /// Unix timestamp in UTC
    dt: i64,
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
    wind: Option<Wind>,
    /// Probability of precipitation, 0.0 to 1.0
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

/// Group 3-hourly readings by local day, taking the reading nearest noon as
/// the representative temperature and description
fn fold_daily(response: &ForecastResponse) -> Vec<ForecastDay> {
    let offset = response.city.as_ref().map_or(0, |c| c.timezone);
    let mut by_day: BTreeMap<NaiveDate, Vec<(u32, &ForecastEntry)>> = BTreeMap::new();

    for entry in &response.list {
        let Some(local) = DateTime::from_timestamp(entry.dt + offset, 0) else {
            debug!(dt = entry.dt, "Skipping forecast entry with invalid timestamp");
            continue;
        };
        by_day
            .entry(local.date_naive())
            .or_default()
            .push((local.hour(), entry));
    }

    by_day
        .into_iter()
        .filter_map(|(date, entries)| {
            let (_, midday) = entries
                .iter()
                .min_by_key(|(hour, _)| hour.abs_diff(12))?;

            let high = entries
                .iter()
                .map(|(_, e)| e.main.temp_max)
                .fold(f64::MIN, f64::max);
            let low = entries
                .iter()
                .map(|(_, e)| e.main.temp_min)
                .fold(f64::MAX, f64::min);
            let pop = entries.iter().map(|(_, e)| e.pop).fold(0.0, f64::max);
            let count = entries.len() as f64;
            let wind = entries
                .iter()
                .map(|(_, e)| e.wind.as_ref().map_or(0.0, |w| w.speed))
                .sum::<f64>()
                / count;
            let humidity = entries
                .iter()
                .map(|(_, e)| f64::from(e.main.humidity))
                .sum::<f64>()
                / count;

            let condition = midday.weather.first();
            Some(ForecastDay {
                date_string: date.format("%Y-%m-%d").to_string(),
                temperature: midday.main.temp,
                high_temp: Some(high),
                low_temp: Some(low),
                description: condition
                    .map_or_else(|| "Unknown".to_string(), |c| c.description.clone()),
                icon: condition.and_then(|c| c.icon.clone()),
                precipitation_chance: (pop * 100.0).round().clamp(0.0, 100.0) as u8,
                wind_speed: (wind * 10.0).round() / 10.0,
                humidity: humidity.round().clamp(0.0, 100.0) as u8,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-06-01 00:00 UTC
    const JUNE_FIRST: i64 = 1_780_272_000;

    fn entry(dt: i64, temp: f64, pop: f64, description: &str) -> serde_json::Value {
        serde_json::json!({
            "dt": dt,
            "main": { "temp": temp, "temp_min": temp - 3.0, "temp_max": temp + 3.0, "humidity": 40 },
            "weather": [{ "description": description, "icon": "01d" }],
            "wind": { "speed": 10.0 },
            "pop": pop
        })
    }

    #[test]
    fn test_fold_daily_groups_by_local_day() {
        let hour = 3_600;
        let json = serde_json::json!({
            "list": [
                entry(JUNE_FIRST + 15 * hour, 70.0, 0.0, "clear sky"),
                entry(JUNE_FIRST + 18 * hour, 80.0, 0.2, "few clouds"),
                entry(JUNE_FIRST + 21 * hour, 85.0, 0.6, "light rain"),
                entry(JUNE_FIRST + 39 * hour, 75.0, 0.0, "clear sky"),
            ],
            "city": { "name": "Albuquerque", "timezone": -6 * hour }
        });
        let response: ForecastResponse = serde_json::from_value(json).unwrap();

        let days = fold_daily(&response);
        assert_eq!(days.len(), 2);

        let first = &days[0];
        assert_eq!(first.date_string, "2026-06-01");
        // 18:00 UTC is noon in Albuquerque
        assert_eq!(first.temperature, 80.0);
        assert_eq!(first.description, "few clouds");
        assert_eq!(first.high_temp, Some(88.0));
        assert_eq!(first.low_temp, Some(67.0));
        assert_eq!(first.precipitation_chance, 60);
        assert_eq!(first.humidity, 40);
        assert_eq!(first.wind_speed, 10.0);

        assert_eq!(days[1].date_string, "2026-06-02");
    }

    #[test]
    fn test_fold_daily_empty_list() {
        let response: ForecastResponse = serde_json::from_str(r#"{"list": []}"#).unwrap();
        assert!(fold_daily(&response).is_empty());
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = WeatherConfig::default();
        assert!(matches!(
            OpenWeatherClient::new(&config),
            Err(RambleError::Config { .. })
        ));
    }
}
