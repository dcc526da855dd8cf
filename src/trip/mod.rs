//! Trip planning
//!
//! - Day calculation: lengthen trips whose daily mileage is too high
//! - Recommendation: score and cap the attractions shown for each day
//! - Planner: split the route into daily driving segments

pub mod attractions;
pub mod days;
pub mod planner;
pub mod recommendation;

pub use attractions::{Attraction, AttractionCategory, route66_attractions};
pub use days::{TripDayCalculator, calculate_optimal_trip_days};
pub use planner::{DaySegment, PlannerSettings, TripPlan, plan_trip};
pub use recommendation::{DisplayContext, RecommendationConfig, ScoredStop};
