//! Trip form and client preference models

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{RambleError, Result};

/// Longest trip the planner accepts
pub const MAX_TRAVEL_DAYS: u32 = 60;
/// Longest daily driving limit the planner accepts
pub const MAX_DAILY_DRIVING_HOURS: f64 = 16.0;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TripStyle {
    Leisurely,
    #[default]
    Balanced,
    Express,
}

/// What the user typed into the trip form
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripFormData {
    pub start_location: String,
    pub end_location: String,
    pub travel_days: u32,
    pub daily_driving_limit_hours: f64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub trip_style: TripStyle,
}

impl Default for TripFormData {
    fn default() -> Self {
        Self {
            start_location: "Chicago, IL".to_string(),
            end_location: "Santa Monica, CA".to_string(),
            travel_days: 14,
            daily_driving_limit_hours: 8.0,
            start_date: None,
            trip_style: TripStyle::Balanced,
        }
    }
}

impl TripFormData {
    pub fn validate(&self) -> Result<()> {
        if self.start_location.trim().is_empty() || self.end_location.trim().is_empty() {
            return Err(RambleError::validation(
                "Start and end locations cannot be empty",
            ));
        }

        if self
            .start_location
            .trim()
            .eq_ignore_ascii_case(self.end_location.trim())
        {
            return Err(RambleError::validation(
                "Start and end locations must be different",
            ));
        }

        if self.travel_days == 0 || self.travel_days > MAX_TRAVEL_DAYS {
            return Err(RambleError::validation(format!(
                "Travel days must be between 1 and {MAX_TRAVEL_DAYS}"
            )));
        }

        if !(self.daily_driving_limit_hours > 0.0
            && self.daily_driving_limit_hours <= MAX_DAILY_DRIVING_HOURS)
        {
            return Err(RambleError::validation(format!(
                "Daily driving limit must be more than 0 and at most {MAX_DAILY_DRIVING_HOURS} hours"
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Imperial,
    Metric,
}

impl UnitPreference {
    /// Convert a mileage into the preferred unit
    #[must_use]
    pub fn distance(self, miles: f64) -> f64 {
        match self {
            UnitPreference::Imperial => miles,
            UnitPreference::Metric => miles * 1.609_344,
        }
    }

    /// Convert a Fahrenheit temperature into the preferred unit
    #[must_use]
    pub fn temperature(self, fahrenheit: f64) -> f64 {
        match self {
            UnitPreference::Imperial => fahrenheit,
            UnitPreference::Metric => (fahrenheit - 32.0) * 5.0 / 9.0,
        }
    }
}

/// Which attractions the map shows
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MapFilters {
    /// Hidden categories; empty shows everything
    #[serde(default)]
    pub hidden_categories: BTreeSet<String>,
    #[serde(default)]
    pub historic_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_form_is_valid() {
        assert!(TripFormData::default().validate().is_ok());
    }

    #[rstest]
    #[case::zero_days(0, 8.0)]
    #[case::too_many_days(61, 8.0)]
    #[case::no_driving(10, 0.0)]
    #[case::too_much_driving(10, 18.0)]
    #[case::nan_driving(10, f64::NAN)]
    fn test_invalid_form_values(#[case] days: u32, #[case] hours: f64) {
        let form = TripFormData {
            travel_days: days,
            daily_driving_limit_hours: hours,
            ..TripFormData::default()
        };
        assert!(matches!(
            form.validate(),
            Err(RambleError::Validation { .. })
        ));
    }

    #[test]
    fn test_same_start_and_end_rejected() {
        let form = TripFormData {
            start_location: "Tulsa".to_string(),
            end_location: " tulsa ".to_string(),
            ..TripFormData::default()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_form_json_shape() {
        let json = r#"{
            "startLocation": "Chicago",
            "endLocation": "Amarillo",
            "travelDays": 5,
            "dailyDrivingLimitHours": 7.5,
            "startDate": "2026-05-01",
            "tripStyle": "leisurely"
        }"#;
        let form: TripFormData = serde_json::from_str(json).unwrap();
        assert_eq!(form.trip_style, TripStyle::Leisurely);
        assert_eq!(form.start_date, NaiveDate::from_ymd_opt(2026, 5, 1));
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(UnitPreference::Imperial.distance(100.0), 100.0);
        assert!((UnitPreference::Metric.distance(100.0) - 160.9344).abs() < 1e-9);
        assert!((UnitPreference::Metric.temperature(212.0) - 100.0).abs() < 1e-9);
    }
}
