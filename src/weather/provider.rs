use async_trait::async_trait;

use crate::Result;
use crate::models::{ForecastDay, Location};

/// Source of day-by-day forecasts for a location
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Forecast days starting today, one entry per calendar day
    async fn daily_forecast(&self, location: &Location) -> Result<Vec<ForecastDay>>;
}
