//! Historical estimate used when no live forecast applies

use chrono::{Datelike, NaiveDate};

use crate::models::weather::SOURCE_HISTORICAL;
use crate::models::{DateMatchInfo, Location, WeatherPayload};

struct MonthlyNormal {
    high: f64,
    low: f64,
    precipitation_chance: u8,
    description: &'static str,
}

const fn normal(high: f64, low: f64, precipitation_chance: u8, description: &'static str) -> MonthlyNormal {
    MonthlyNormal {
        high,
        low,
        precipitation_chance,
        description,
    }
}

/// Rough monthly normals averaged along the corridor, °F
const MONTHLY_NORMALS: [MonthlyNormal; 12] = [
    normal(47.0, 24.0, 15, "Cold mornings, mild afternoons"),
    normal(52.0, 27.0, 15, "Cold mornings, mild afternoons"),
    normal(61.0, 34.0, 20, "Breezy and variable"),
    normal(70.0, 42.0, 25, "Mild with spring winds"),
    normal(79.0, 52.0, 30, "Warm with scattered storms"),
    normal(89.0, 61.0, 30, "Hot and mostly sunny"),
    normal(93.0, 66.0, 35, "Hot with afternoon thunderstorms"),
    normal(91.0, 65.0, 35, "Hot with afternoon thunderstorms"),
    normal(84.0, 57.0, 25, "Warm and mostly sunny"),
    normal(72.0, 45.0, 20, "Pleasant and dry"),
    normal(58.0, 33.0, 15, "Cool and dry"),
    normal(48.0, 25.0, 15, "Cold mornings, mild afternoons"),
];

/// Typical weather for `location` in the month of `date`
#[must_use]
pub fn estimate(location: &Location, date: NaiveDate) -> WeatherPayload {
    let normal = &MONTHLY_NORMALS[date.month0() as usize];
    let date_string = date.format("%Y-%m-%d").to_string();

    WeatherPayload {
        temperature: Some(((normal.high + normal.low) / 2.0).round()),
        high_temp: Some(normal.high),
        low_temp: Some(normal.low),
        description: Some(normal.description.to_string()),
        city_name: Some(location.name.clone()),
        source: Some(SOURCE_HISTORICAL.to_string()),
        is_actual_forecast: Some(false),
        date_match_info: Some(DateMatchInfo {
            source: Some(SOURCE_HISTORICAL.to_string()),
            requested_date: Some(date_string),
            ..DateMatchInfo::default()
        }),
        precipitation_chance: Some(normal.precipitation_chance),
        wind_speed: None,
        humidity: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::validation::{is_live_weather_data, validate_weather_data};

    #[test]
    fn test_estimate_is_valid_but_not_live() {
        let location = Location::with_state(35.222, -101.8313, "Amarillo", "TX");
        let payload = estimate(&location, NaiveDate::from_ymd_opt(2026, 7, 4).unwrap());

        assert!(validate_weather_data(&payload));
        assert!(!is_live_weather_data(&payload));
        assert_eq!(payload.high_temp, Some(93.0));
        assert_eq!(payload.city_name.as_deref(), Some("Amarillo"));
        assert_eq!(
            payload.date_match_info.unwrap().requested_date.as_deref(),
            Some("2026-07-04")
        );
    }

    #[test]
    fn test_winter_is_colder_than_summer() {
        let location = Location::new(35.0844, -106.6504, "Albuquerque");
        let january = estimate(&location, NaiveDate::from_ymd_opt(2027, 1, 15).unwrap());
        let july = estimate(&location, NaiveDate::from_ymd_opt(2027, 7, 15).unwrap());
        assert!(january.temperature < july.temperature);
    }
}
