//! Splits a trip along the route into daily driving segments

use std::num::NonZeroU32;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::attractions::Attraction;
use super::days::TripDayCalculator;
use super::recommendation::{DisplayContext, RecommendationConfig, ScoredStop};
use crate::config::TripConfig;
use crate::models::{Location, TripFormData};
use crate::route::{RouteStats, cumulative_distances, find_waypoint};
use crate::{RambleError, Result};

/// Knobs the planner takes from configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerSettings {
    pub calculator: TripDayCalculator,
    pub average_speed_mph: f64,
    pub recommendations: RecommendationConfig,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self::from(&TripConfig::default())
    }
}

impl From<&TripConfig> for PlannerSettings {
    fn from(config: &TripConfig) -> Self {
        Self {
            calculator: TripDayCalculator::from(config),
            average_speed_mph: config.average_speed_mph,
            recommendations: RecommendationConfig::default(),
        }
    }
}

/// One day's driving leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySegment {
    pub day: u32,
    pub date: Option<NaiveDate>,
    pub start_city: String,
    pub end_city: String,
    pub distance_miles: f64,
    pub estimated_drive_hours: f64,
    pub over_driving_limit: bool,
    pub recommended_stops: Vec<ScoredStop>,
}

impl DaySegment {
    /// A day that stays in the same town
    #[must_use]
    pub fn is_rest_day(&self) -> bool {
        self.distance_miles == 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    pub requested_days: u32,
    pub days: u32,
    /// True when the trip was lengthened to keep daily mileage down
    pub extended: bool,
    pub total_distance_miles: f64,
    pub average_miles_per_day: f64,
    pub segments: Vec<DaySegment>,
    pub stats: RouteStats,
}

/// Plan `form` along `waypoints`, suggesting stops from `attractions`.
///
/// Day `d` of `n` ends at the waypoint whose running distance is closest to
/// `d / n` of the total, never moving backwards. The last day always ends at
/// the destination.
#[instrument(skip_all, fields(start = %form.start_location, end = %form.end_location, days = form.travel_days))]
pub fn plan_trip(
    form: &TripFormData,
    waypoints: &[Location],
    attractions: &[Attraction],
    settings: &PlannerSettings,
) -> Result<TripPlan> {
    form.validate()?;

    let (start_idx, _) = find_waypoint(waypoints, &form.start_location).ok_or_else(|| {
        RambleError::not_found(format!("'{}' is not a Route 66 stop", form.start_location))
    })?;
    let (end_idx, _) = find_waypoint(waypoints, &form.end_location).ok_or_else(|| {
        RambleError::not_found(format!("'{}' is not a Route 66 stop", form.end_location))
    })?;

    if start_idx == end_idx {
        return Err(RambleError::validation(
            "Start and end locations resolve to the same stop",
        ));
    }

    let route: Vec<Location> = if start_idx < end_idx {
        waypoints[start_idx..=end_idx].to_vec()
    } else {
        waypoints[end_idx..=start_idx].iter().rev().cloned().collect()
    };

    let cumulative = cumulative_distances(&route);
    let total = cumulative.last().copied().unwrap_or(0.0);

    let requested = NonZeroU32::new(form.travel_days)
        .ok_or_else(|| RambleError::validation("Travel days must be at least 1"))?;
    let days = settings.calculator.calculate(total, requested);

    let ends = day_end_indices(&cumulative, days);
    let mut segments = Vec::with_capacity(ends.len());
    let mut start = 0;

    for (day_idx, &end) in ends.iter().enumerate() {
        let day = day_idx as u32 + 1;
        let distance_miles = cumulative[end] - cumulative[start];
        let estimated_drive_hours = if settings.average_speed_mph > 0.0 {
            distance_miles / settings.average_speed_mph
        } else {
            0.0
        };

        let visited = visited_cities(&route, start, end, day == 1);
        let candidates: Vec<Attraction> = attractions
            .iter()
            .filter(|a| visited.iter().any(|city| city.matches_name(&a.city)))
            .cloned()
            .collect();
        let overnight = route[end].display_name();
        let recommended_stops = settings.recommendations.select_stops(
            &candidates,
            form.trip_style,
            DisplayContext::DayCard,
            Some(&overnight),
        );

        segments.push(DaySegment {
            day,
            date: form
                .start_date
                .and_then(|d| d.checked_add_days(Days::new(u64::from(day - 1)))),
            start_city: route[start].display_name(),
            end_city: overnight,
            distance_miles,
            estimated_drive_hours,
            over_driving_limit: estimated_drive_hours > form.daily_driving_limit_hours,
            recommended_stops,
        });
        start = end;
    }

    let stats = RouteStats::compute(&route, segments.len());
    info!(
        total_miles = total,
        requested = requested.get(),
        days,
        "Planned trip"
    );

    Ok(TripPlan {
        requested_days: requested.get(),
        days,
        extended: days > requested.get(),
        total_distance_miles: total,
        average_miles_per_day: TripDayCalculator::miles_per_day(
            total,
            NonZeroU32::new(days).unwrap_or(requested),
        ),
        segments,
        stats,
    })
}

/// Index of the waypoint each day ends at
fn day_end_indices(cumulative: &[f64], days: u32) -> Vec<usize> {
    let last = cumulative.len().saturating_sub(1);
    let total = cumulative.last().copied().unwrap_or(0.0);
    let mut ends = Vec::with_capacity(days as usize);
    let mut previous = 0;

    for day in 1..=days {
        let end = if day == days {
            last
        } else {
            let target = total * f64::from(day) / f64::from(days);
            let mut best = previous;
            for idx in previous..=last {
                if (cumulative[idx] - target).abs() < (cumulative[best] - target).abs() {
                    best = idx;
                }
            }
            best
        };
        ends.push(end);
        previous = end;
    }

    ends
}

/// Towns passed through on a leg; the departure town only counts on day one
fn visited_cities(route: &[Location], start: usize, end: usize, first_day: bool) -> &[Location] {
    if first_day || start == end {
        &route[start..=end]
    } else {
        &route[start + 1..=end]
    }
}
