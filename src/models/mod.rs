//! Data models for the Ramble 66 planner
//!
//! This module contains the core domain models organized by concern:
//! - Location: route cities and their coordinates
//! - Weather: forecast days, match results and the weather payload
//! - Trip: the persisted trip form and client preferences

pub mod location;
pub mod trip;
pub mod weather;

// Re-export all public types for convenient access
pub use location::Location;
pub use trip::{MapFilters, TripFormData, TripStyle, UnitPreference};
pub use weather::{DateMatchInfo, ForecastDay, MatchResult, MatchType, WeatherPayload};
