//! Trip length adjustment based on daily mileage

use std::num::NonZeroU32;

use tracing::debug;

use crate::config::TripConfig;

/// Daily mileage above which a trip gets more days
pub const MAX_MILES_PER_DAY: f64 = 500.0;
/// Daily mileage used when recomputing the number of days
pub const COMFORTABLE_MILES_PER_DAY: f64 = 300.0;

/// Decides whether a requested trip length keeps daily driving comfortable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripDayCalculator {
    pub max_miles_per_day: f64,
    pub comfortable_miles_per_day: f64,
}

impl Default for TripDayCalculator {
    fn default() -> Self {
        Self {
            max_miles_per_day: MAX_MILES_PER_DAY,
            comfortable_miles_per_day: COMFORTABLE_MILES_PER_DAY,
        }
    }
}

impl From<&TripConfig> for TripDayCalculator {
    fn from(config: &TripConfig) -> Self {
        Self {
            max_miles_per_day: config.max_miles_per_day,
            comfortable_miles_per_day: config.comfortable_miles_per_day,
        }
    }
}

impl TripDayCalculator {
    /// Number of days to plan for `total_distance_miles`.
    ///
    /// Returns `requested_days` unless that would mean more than
    /// `max_miles_per_day`, in which case the trip is re-spread at
    /// `comfortable_miles_per_day`. Never returns fewer days than requested.
    #[must_use]
    pub fn calculate(&self, total_distance_miles: f64, requested_days: NonZeroU32) -> u32 {
        let requested = requested_days.get();
        let miles_per_day = total_distance_miles / f64::from(requested);

        if miles_per_day <= self.max_miles_per_day {
            return requested;
        }

        let suggested = (total_distance_miles / self.comfortable_miles_per_day).ceil();
        let suggested = if suggested >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            suggested as u32
        };

        debug!(
            total_distance_miles,
            requested, suggested, "Daily mileage {miles_per_day:.0} too high, extending trip"
        );
        suggested.max(requested)
    }

    #[must_use]
    pub fn miles_per_day(total_distance_miles: f64, days: NonZeroU32) -> f64 {
        total_distance_miles / f64::from(days.get())
    }
}

/// [`TripDayCalculator::calculate`] with the default 500 / 300 mile thresholds
#[must_use]
pub fn calculate_optimal_trip_days(total_distance_miles: f64, requested_days: NonZeroU32) -> u32 {
    TripDayCalculator::default().calculate(total_distance_miles, requested_days)
}
