//! Decides whether a weather payload counts as a live forecast
//!
//! Nothing here returns an error. Callers branch on the booleans or on
//! [`WeatherQuality`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::WeatherConfig;
use crate::models::WeatherPayload;
use crate::models::weather::{
    MATCH_SOURCE_API_FORECAST, MATCH_SOURCE_ENHANCED_FALLBACK, SOURCE_LIVE_FORECAST,
};

/// Sane Fahrenheit range for a surface temperature
pub const MIN_TEMPERATURE_F: f64 = -50.0;
pub const MAX_TEMPERATURE_F: f64 = 150.0;

const LIVE_MATCH_SOURCES: [&str; 2] = [MATCH_SOURCE_API_FORECAST, MATCH_SOURCE_ENHANCED_FALLBACK];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherQuality {
    /// Fresh forecast from the weather API
    Live,
    /// Structurally sound but estimated (historical normals, stale data)
    Estimated,
    /// Missing fields or out-of-range values
    Invalid,
}

/// Gates live forecast lookups by forecast horizon and credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherSourceValidator {
    /// Last day offset a forecast is trusted for
    pub live_forecast_days: i64,
}

impl Default for WeatherSourceValidator {
    fn default() -> Self {
        Self {
            live_forecast_days: 5,
        }
    }
}

impl From<&WeatherConfig> for WeatherSourceValidator {
    fn from(config: &WeatherConfig) -> Self {
        Self {
            live_forecast_days: i64::from(config.live_forecast_days),
        }
    }
}

impl WeatherSourceValidator {
    /// A live lookup is only worth it with an API key and a date inside the horizon
    #[must_use]
    pub fn should_attempt_live_forecast(&self, days_from_now: i64, has_api_key: bool) -> bool {
        has_api_key && (0..=self.live_forecast_days).contains(&days_from_now)
    }

    /// The payload must be flagged as an actual forecast and carry an API match source
    #[must_use]
    pub fn is_valid_live_forecast(&self, payload: &WeatherPayload, days_from_now: i64) -> bool {
        let flagged = payload.is_actual_forecast == Some(true);
        let match_source = payload.date_match_source();
        let sourced = match_source.is_some_and(|s| LIVE_MATCH_SOURCES.contains(&s));

        debug!(
            days_from_now,
            flagged,
            match_source = match_source.unwrap_or("none"),
            "Checked live forecast markers"
        );
        flagged && sourced
    }

    #[must_use]
    pub fn classify(&self, payload: &WeatherPayload, days_from_now: i64) -> WeatherQuality {
        if !validate_weather_data(payload) {
            WeatherQuality::Invalid
        } else if is_live_weather_data(payload) && self.is_valid_live_forecast(payload, days_from_now)
        {
            WeatherQuality::Live
        } else {
            WeatherQuality::Estimated
        }
    }
}

/// Canonicalise the live markers of a payload that already claims live origin
/// through either its source or its forecast flag. Other payloads pass through.
#[must_use]
pub fn ensure_live_weather_marking(mut payload: WeatherPayload) -> WeatherPayload {
    let claims_live = payload.source.as_deref() == Some(SOURCE_LIVE_FORECAST)
        || payload.is_actual_forecast == Some(true);

    if claims_live {
        payload.source = Some(SOURCE_LIVE_FORECAST.to_string());
        payload.is_actual_forecast = Some(true);
    }
    payload
}

/// Temperature, description, city and source must be present and the
/// temperature must lie in [-50, 150] °F
#[must_use]
pub fn validate_weather_data(payload: &WeatherPayload) -> bool {
    let has_text = |value: &Option<String>| value.as_deref().is_some_and(|s| !s.trim().is_empty());

    let temperature_ok = payload
        .temperature
        .is_some_and(|t| (MIN_TEMPERATURE_F..=MAX_TEMPERATURE_F).contains(&t));

    temperature_ok
        && has_text(&payload.description)
        && has_text(&payload.city_name)
        && has_text(&payload.source)
}

/// Live markers and structural validity must both hold
#[must_use]
pub fn is_live_weather_data(payload: &WeatherPayload) -> bool {
    let live_marked = payload.source.as_deref() == Some(SOURCE_LIVE_FORECAST)
        && payload.is_actual_forecast == Some(true);

    live_marked && validate_weather_data(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateMatchInfo;
    use crate::models::weather::SOURCE_HISTORICAL;
    use rstest::rstest;

    fn live_payload() -> WeatherPayload {
        WeatherPayload {
            temperature: Some(72.0),
            high_temp: Some(80.0),
            low_temp: Some(60.0),
            description: Some("clear sky".to_string()),
            city_name: Some("Kingman".to_string()),
            source: Some(SOURCE_LIVE_FORECAST.to_string()),
            is_actual_forecast: Some(true),
            date_match_info: Some(DateMatchInfo {
                source: Some(MATCH_SOURCE_API_FORECAST.to_string()),
                ..DateMatchInfo::default()
            }),
            precipitation_chance: Some(0),
            wind_speed: Some(6.0),
            humidity: Some(15),
        }
    }

    #[rstest]
    #[case::today(0, true, true)]
    #[case::horizon(5, true, true)]
    #[case::past(-1, true, false)]
    #[case::too_far(6, true, false)]
    #[case::no_key(2, false, false)]
    fn test_should_attempt_live_forecast(
        #[case] days: i64,
        #[case] has_key: bool,
        #[case] expected: bool,
    ) {
        let validator = WeatherSourceValidator::default();
        assert_eq!(validator.should_attempt_live_forecast(days, has_key), expected);
    }

    #[test]
    fn test_is_valid_live_forecast() {
        let validator = WeatherSourceValidator::default();
        let mut payload = WeatherPayload {
            is_actual_forecast: Some(true),
            date_match_info: Some(DateMatchInfo {
                source: Some("api-forecast".to_string()),
                ..DateMatchInfo::default()
            }),
            ..WeatherPayload::default()
        };
        assert!(validator.is_valid_live_forecast(&payload, 2));

        payload.date_match_info.as_mut().unwrap().source = Some("enhanced-fallback".to_string());
        assert!(validator.is_valid_live_forecast(&payload, 2));

        payload.date_match_info.as_mut().unwrap().source = Some("other".to_string());
        assert!(!validator.is_valid_live_forecast(&payload, 2));

        payload.date_match_info = None;
        assert!(!validator.is_valid_live_forecast(&payload, 2));
    }

    #[test]
    fn test_is_valid_live_forecast_requires_flag() {
        let validator = WeatherSourceValidator::default();
        let mut payload = live_payload();
        payload.is_actual_forecast = None;
        assert!(!validator.is_valid_live_forecast(&payload, 1));
        payload.is_actual_forecast = Some(false);
        assert!(!validator.is_valid_live_forecast(&payload, 1));
    }

    #[test]
    fn test_ensure_live_weather_marking() {
        let by_flag = ensure_live_weather_marking(WeatherPayload {
            source: Some("openweathermap".to_string()),
            is_actual_forecast: Some(true),
            ..WeatherPayload::default()
        });
        assert_eq!(by_flag.source.as_deref(), Some(SOURCE_LIVE_FORECAST));

        let by_source = ensure_live_weather_marking(WeatherPayload {
            source: Some(SOURCE_LIVE_FORECAST.to_string()),
            ..WeatherPayload::default()
        });
        assert_eq!(by_source.is_actual_forecast, Some(true));

        let historical = WeatherPayload {
            source: Some(SOURCE_HISTORICAL.to_string()),
            is_actual_forecast: Some(false),
            ..WeatherPayload::default()
        };
        assert_eq!(ensure_live_weather_marking(historical.clone()), historical);
    }

    #[rstest]
    #[case::too_hot(Some(200.0), false)]
    #[case::too_cold(Some(-60.0), false)]
    #[case::upper_edge(Some(150.0), true)]
    #[case::lower_edge(Some(-50.0), true)]
    #[case::missing(None, false)]
    fn test_validate_weather_temperature(#[case] temperature: Option<f64>, #[case] valid: bool) {
        let payload = WeatherPayload {
            temperature,
            ..live_payload()
        };
        assert_eq!(validate_weather_data(&payload), valid);
    }

    #[test]
    fn test_validate_weather_requires_fields() {
        let mut payload = live_payload();
        payload.city_name = None;
        assert!(!validate_weather_data(&payload));

        let mut payload = live_payload();
        payload.description = Some("  ".to_string());
        assert!(!validate_weather_data(&payload));

        let mut payload = live_payload();
        payload.source = None;
        assert!(!validate_weather_data(&payload));
    }

    #[test]
    fn test_is_live_weather_data_is_a_conjunction() {
        assert!(is_live_weather_data(&live_payload()));

        let mut broken = live_payload();
        broken.temperature = Some(200.0);
        assert!(!is_live_weather_data(&broken));

        let mut estimated = live_payload();
        estimated.is_actual_forecast = Some(false);
        assert!(!is_live_weather_data(&estimated));
    }

    #[test]
    fn test_classify() {
        let validator = WeatherSourceValidator::default();
        assert_eq!(validator.classify(&live_payload(), 1), WeatherQuality::Live);

        let historical = WeatherPayload {
            source: Some(SOURCE_HISTORICAL.to_string()),
            is_actual_forecast: Some(false),
            date_match_info: None,
            ..live_payload()
        };
        assert_eq!(validator.classify(&historical, 20), WeatherQuality::Estimated);

        let broken = WeatherPayload::default();
        assert_eq!(validator.classify(&broken, 1), WeatherQuality::Invalid);
    }
}
