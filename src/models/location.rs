//! Location model for route cities

use serde::{Deserialize, Serialize};

/// A named point with coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// City name
    pub name: String,
    /// US state code (two letters)
    pub state: Option<String>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
            state: None,
        }
    }

    /// Create location with a state code
    #[must_use]
    pub fn with_state(
        latitude: f64,
        longitude: f64,
        name: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
            state: Some(state.into()),
        }
    }

    /// "City, ST" when the state is known, otherwise the bare name
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {state}", self.name),
            None => self.name.clone(),
        }
    }

    /// Lowercase, dash separated form of the display name for request keys
    #[must_use]
    pub fn slug(&self) -> String {
        self.display_name()
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// True when `query` names this location, either "City" or "City, ST"
    #[must_use]
    pub fn matches_name(&self, query: &str) -> bool {
        let query = query.trim();
        query.eq_ignore_ascii_case(&self.name) || query.eq_ignore_ascii_case(&self.display_name())
    }
}
