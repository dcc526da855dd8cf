//! Ramble 66 - Route 66 road trip planning
//!
//! This library provides trip-length and daily segment planning along the
//! historic route, stop recommendations, and weather lookups that prefer a
//! live forecast and fall back to historical estimates.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod route;
pub mod storage;
pub mod trip;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::RambleConfig;
pub use error::RambleError;
pub use models::{ForecastDay, Location, MatchResult, MatchType, TripFormData, WeatherPayload};
pub use trip::{TripPlan, calculate_optimal_trip_days, plan_trip};
pub use weather::{RequestDeduplicator, WeatherService, find_best_match};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RambleError>;
