//! The Route 66 corridor: ordered waypoints, distances and route statistics

use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Serialize};

use crate::models::Location;

/// Major towns along the historic alignment, east to west
const ROUTE_66: &[(&str, &str, f64, f64)] = &[
    ("Chicago", "IL", 41.8781, -87.6298),
    ("Joliet", "IL", 41.5250, -88.0817),
    ("Springfield", "IL", 39.7817, -89.6501),
    ("St. Louis", "MO", 38.6270, -90.1994),
    ("Springfield", "MO", 37.2090, -93.2923),
    ("Joplin", "MO", 37.0842, -94.5133),
    ("Tulsa", "OK", 36.1540, -95.9928),
    ("Oklahoma City", "OK", 35.4676, -97.5164),
    ("Clinton", "OK", 35.5156, -98.9673),
    ("Amarillo", "TX", 35.2220, -101.8313),
    ("Tucumcari", "NM", 35.1717, -103.7250),
    ("Santa Rosa", "NM", 34.9387, -104.6825),
    ("Albuquerque", "NM", 35.0844, -106.6504),
    ("Gallup", "NM", 35.5281, -108.7426),
    ("Holbrook", "AZ", 34.9022, -110.1582),
    ("Flagstaff", "AZ", 35.1983, -111.6513),
    ("Williams", "AZ", 35.2495, -112.1910),
    ("Kingman", "AZ", 35.1894, -114.0530),
    ("Needles", "CA", 34.8481, -114.6141),
    ("Barstow", "CA", 34.8958, -117.0173),
    ("San Bernardino", "CA", 34.1083, -117.2898),
    ("Santa Monica", "CA", 34.0195, -118.4912),
];

/// Route 66 waypoints in driving order from Chicago to Santa Monica
#[must_use]
pub fn route66_waypoints() -> Vec<Location> {
    ROUTE_66
        .iter()
        .map(|&(name, state, lat, lon)| Location::with_state(lat, lon, name, state))
        .collect()
}

/// Find a waypoint by "City" or "City, ST"; the first town of that name wins
#[must_use]
pub fn find_waypoint<'a>(waypoints: &'a [Location], name: &str) -> Option<(usize, &'a Location)> {
    waypoints
        .iter()
        .enumerate()
        .find(|(_, point)| point.matches_name(name))
}

/// Great-circle distance in statute miles
#[must_use]
pub fn distance_miles(from: &Location, to: &Location) -> f64 {
    let from = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from, to, Units::Miles)
}

/// Running distance from the first point to each point
#[must_use]
pub fn cumulative_distances(points: &[Location]) -> Vec<f64> {
    let mut total = 0.0;
    let mut out = Vec::with_capacity(points.len());
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += distance_miles(&points[i - 1], point);
        }
        out.push(total);
    }
    out
}

/// Aggregate counters shown next to the route map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    pub point_count: usize,
    pub total_distance_miles: f64,
    pub segment_count: usize,
    pub average_points_per_segment: f64,
}

impl RouteStats {
    #[must_use]
    pub fn compute(points: &[Location], segment_count: usize) -> Self {
        let total_distance_miles = cumulative_distances(points).last().copied().unwrap_or(0.0);
        let average_points_per_segment = if segment_count == 0 {
            0.0
        } else {
            points.len() as f64 / segment_count as f64
        };

        Self {
            point_count: points.len(),
            total_distance_miles,
            segment_count,
            average_points_per_segment,
        }
    }
}
