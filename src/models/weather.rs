//! Weather models: forecast days, date matches and the weather payload

use serde::{Deserialize, Serialize};

/// Source tag of a payload that came from a live forecast call
pub const SOURCE_LIVE_FORECAST: &str = "live_forecast";
/// Source tag of a payload built from monthly climate normals
pub const SOURCE_HISTORICAL: &str = "historical_fallback";
/// Date-match source when the forecast day equals the requested day
pub const MATCH_SOURCE_API_FORECAST: &str = "api-forecast";
/// Date-match source when a neighbouring forecast day stands in
pub const MATCH_SOURCE_ENHANCED_FALLBACK: &str = "enhanced-fallback";

/// One day of forecast as produced by the weather adapter
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    /// Calendar date as `YYYY-MM-DD`
    pub date_string: String,
    /// Representative temperature in Fahrenheit
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub high_temp: Option<f64>,
    #[serde(default)]
    pub low_temp: Option<f64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    /// Chance of precipitation (0-100)
    #[serde(default)]
    pub precipitation_chance: u8,
    /// Wind speed in mph
    #[serde(default)]
    pub wind_speed: f64,
    /// Relative humidity (0-100)
    #[serde(default)]
    pub humidity: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Closest,
    None,
}

/// Outcome of matching a target date against a list of forecast days
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub matched_forecast: Option<ForecastDay>,
    pub requested_date: String,
    pub matched_date: Option<String>,
    pub match_type: MatchType,
    /// Signed offset of the matched day from the requested day, -1 when unmatched
    pub days_offset: i64,
}

impl MatchResult {
    #[must_use]
    pub fn none(requested_date: &str) -> Self {
        Self {
            matched_forecast: None,
            requested_date: requested_date.to_string(),
            matched_date: None,
            match_type: MatchType::None,
            days_offset: -1,
        }
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        self.matched_forecast.is_some()
    }
}

/// How a payload's forecast day relates to the requested date
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DateMatchInfo {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub requested_date: Option<String>,
    #[serde(default)]
    pub matched_date: Option<String>,
    #[serde(default)]
    pub match_type: Option<MatchType>,
    #[serde(default)]
    pub days_offset: Option<i64>,
}

impl DateMatchInfo {
    /// Describe a successful match, tagging exact and neighbouring days differently
    #[must_use]
    pub fn from_match(result: &MatchResult) -> Self {
        let source = match result.match_type {
            MatchType::Exact => Some(MATCH_SOURCE_API_FORECAST.to_string()),
            MatchType::Closest => Some(MATCH_SOURCE_ENHANCED_FALLBACK.to_string()),
            MatchType::None => None,
        };
        Self {
            source,
            requested_date: Some(result.requested_date.clone()),
            matched_date: result.matched_date.clone(),
            match_type: Some(result.match_type),
            days_offset: Some(result.days_offset),
        }
    }
}

/// Weather for one city and date as exchanged with the UI
///
/// Every field is optional on input; validators decide what is usable.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeatherPayload {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub high_temp: Option<f64>,
    #[serde(default)]
    pub low_temp: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub is_actual_forecast: Option<bool>,
    #[serde(default)]
    pub date_match_info: Option<DateMatchInfo>,
    #[serde(default)]
    pub precipitation_chance: Option<u8>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
}

impl WeatherPayload {
    /// Build a live payload for `city_name` from a successful date match
    #[must_use]
    pub fn from_match(city_name: &str, result: &MatchResult) -> Option<Self> {
        let forecast = result.matched_forecast.as_ref()?;
        Some(Self {
            temperature: Some(forecast.temperature),
            high_temp: forecast.high_temp,
            low_temp: forecast.low_temp,
            description: Some(forecast.description.clone()),
            city_name: Some(city_name.to_string()),
            source: Some(SOURCE_LIVE_FORECAST.to_string()),
            is_actual_forecast: Some(true),
            date_match_info: Some(DateMatchInfo::from_match(result)),
            precipitation_chance: Some(forecast.precipitation_chance),
            wind_speed: Some(forecast.wind_speed),
            humidity: Some(forecast.humidity),
        })
    }

    #[must_use]
    pub fn date_match_source(&self) -> Option<&str> {
        self.date_match_info.as_ref()?.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecast(date: &str) -> ForecastDay {
        ForecastDay {
            date_string: date.to_string(),
            temperature: 71.0,
            high_temp: Some(78.0),
            low_temp: Some(55.0),
            description: "clear sky".to_string(),
            icon: Some("01d".to_string()),
            precipitation_chance: 10,
            wind_speed: 8.5,
            humidity: 30,
        }
    }

    #[test]
    fn test_payload_uses_camel_case_on_the_wire() {
        let json = r#"{
            "temperature": 64.0,
            "description": "scattered clouds",
            "cityName": "Gallup",
            "source": "live_forecast",
            "isActualForecast": true,
            "dateMatchInfo": { "source": "api-forecast" }
        }"#;
        let payload: WeatherPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.city_name.as_deref(), Some("Gallup"));
        assert_eq!(payload.is_actual_forecast, Some(true));
        assert_eq!(payload.date_match_source(), Some("api-forecast"));
        assert!(payload.humidity.is_none());
    }

    #[test]
    fn test_payload_from_closest_match() {
        let result = MatchResult {
            matched_forecast: Some(forecast("2026-06-03")),
            requested_date: "2026-06-01".to_string(),
            matched_date: Some("2026-06-03".to_string()),
            match_type: MatchType::Closest,
            days_offset: 2,
        };

        let payload = WeatherPayload::from_match("Flagstaff", &result).unwrap();
        assert_eq!(payload.source.as_deref(), Some(SOURCE_LIVE_FORECAST));
        assert_eq!(payload.date_match_source(), Some(MATCH_SOURCE_ENHANCED_FALLBACK));
        assert_eq!(
            payload.date_match_info.as_ref().unwrap().days_offset,
            Some(2)
        );
    }

    #[test]
    fn test_payload_from_unmatched_result() {
        assert!(WeatherPayload::from_match("Needles", &MatchResult::none("2026-06-01")).is_none());
    }

    #[test]
    fn test_forecast_day_needs_only_a_date() {
        let day: ForecastDay = serde_json::from_str(r#"{"dateString":"2026-01-01"}"#).unwrap();
        assert_eq!(day.date_string, "2026-01-01");
        assert_eq!(day.temperature, 0.0);
        assert!(day.description.is_empty());
        assert_eq!(day.high_temp, None);
    }
}
