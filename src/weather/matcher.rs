//! Picks the forecast day that best answers a requested date

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{ForecastDay, MatchResult, MatchType};

/// Furthest a neighbouring forecast day may be from the requested date
pub const MAX_MATCH_OFFSET_DAYS: i64 = 2;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Find the forecast for `target_date`.
///
/// An entry whose `date_string` equals `target_date_string` wins outright.
/// Otherwise the nearest entry within two days is returned with its signed
/// offset (`forecast - target`); the first of equally near entries wins.
/// Offsets are whole calendar days, so time zones cannot shift them.
#[must_use]
pub fn find_best_match(
    forecasts: &[ForecastDay],
    target_date: NaiveDate,
    target_date_string: &str,
) -> MatchResult {
    if forecasts.is_empty() {
        return MatchResult::none(target_date_string);
    }

    if let Some(exact) = forecasts
        .iter()
        .find(|f| f.date_string == target_date_string)
    {
        return MatchResult {
            matched_forecast: Some(exact.clone()),
            requested_date: target_date_string.to_string(),
            matched_date: Some(exact.date_string.clone()),
            match_type: MatchType::Exact,
            days_offset: 0,
        };
    }

    let mut best: Option<(&ForecastDay, i64)> = None;
    for forecast in forecasts {
        let Ok(date) = NaiveDate::parse_from_str(&forecast.date_string, DATE_FORMAT) else {
            debug!(date = %forecast.date_string, "Skipping forecast with unparseable date");
            continue;
        };

        let offset = (date - target_date).num_days();
        if offset.abs() > MAX_MATCH_OFFSET_DAYS {
            continue;
        }
        if best.is_none_or(|(_, current)| offset.abs() < current.abs()) {
            best = Some((forecast, offset));
        }
    }

    match best {
        Some((forecast, offset)) => MatchResult {
            matched_forecast: Some(forecast.clone()),
            requested_date: target_date_string.to_string(),
            matched_date: Some(forecast.date_string.clone()),
            match_type: MatchType::Closest,
            days_offset: offset,
        },
        None => MatchResult::none(target_date_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(date: &str, temperature: f64) -> ForecastDay {
        ForecastDay {
            date_string: date.to_string(),
            temperature,
            high_temp: None,
            low_temp: None,
            description: "clear sky".to_string(),
            icon: None,
            precipitation_chance: 0,
            wind_speed: 5.0,
            humidity: 20,
        }
    }

    fn target() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn test_empty_list() {
        let result = find_best_match(&[], target(), "2026-01-01");
        assert_eq!(result.match_type, MatchType::None);
        assert_eq!(result.days_offset, -1);
        assert!(result.matched_forecast.is_none());
        assert_eq!(result.requested_date, "2026-01-01");
    }

    #[test]
    fn test_exact_match() {
        let result = find_best_match(&[day("2026-01-01", 40.0)], target(), "2026-01-01");
        assert_eq!(result.match_type, MatchType::Exact);
        assert_eq!(result.days_offset, 0);
        assert_eq!(result.matched_date.as_deref(), Some("2026-01-01"));
    }

    #[rstest]
    #[case::two_after("2026-01-03", MatchType::Closest, 2)]
    #[case::one_before("2025-12-31", MatchType::Closest, -1)]
    #[case::two_before("2025-12-30", MatchType::Closest, -2)]
    #[case::three_after("2026-01-04", MatchType::None, -1)]
    #[case::garbage("next tuesday", MatchType::None, -1)]
    fn test_single_entry(
        #[case] date: &str,
        #[case] expected_type: MatchType,
        #[case] expected_offset: i64,
    ) {
        let result = find_best_match(&[day(date, 40.0)], target(), "2026-01-01");
        assert_eq!(result.match_type, expected_type);
        assert_eq!(result.days_offset, expected_offset);
        assert!(result.days_offset.abs() <= MAX_MATCH_OFFSET_DAYS);
    }

    #[test]
    fn test_exact_beats_earlier_close_entry() {
        let forecasts = [day("2026-01-02", 1.0), day("2026-01-01", 2.0)];
        let result = find_best_match(&forecasts, target(), "2026-01-01");
        assert_eq!(result.match_type, MatchType::Exact);
        assert_eq!(result.matched_forecast.unwrap().temperature, 2.0);
    }

    #[test]
    fn test_nearest_wins_and_ties_keep_list_order() {
        let forecasts = [
            day("2026-01-03", 1.0),
            day("2026-01-02", 2.0),
            day("2025-12-31", 3.0),
        ];
        let result = find_best_match(&forecasts, target(), "2026-01-01");
        assert_eq!(result.match_type, MatchType::Closest);
        assert_eq!(result.days_offset, 1);
        assert_eq!(result.matched_forecast.unwrap().temperature, 2.0);
    }
}
