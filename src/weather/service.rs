//! Live-or-estimated weather for a route city and date

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use super::dedup::RequestDeduplicator;
use super::historical;
use super::matcher::find_best_match;
use super::provider::ForecastProvider;
use super::validation::{WeatherSourceValidator, ensure_live_weather_marking, is_live_weather_data};
use crate::Result;
use crate::config::RambleConfig;
use crate::models::{Location, WeatherPayload};

/// Looks up weather for trip days
///
/// Without a provider (no API key) every answer is a historical estimate.
pub struct WeatherService {
    provider: Option<Arc<dyn ForecastProvider>>,
    dedup: Arc<RequestDeduplicator<Option<WeatherPayload>>>,
    validator: WeatherSourceValidator,
    request_timeout: Duration,
}

impl WeatherService {
    #[must_use]
    pub fn new(
        provider: Option<Arc<dyn ForecastProvider>>,
        dedup: Arc<RequestDeduplicator<Option<WeatherPayload>>>,
        validator: WeatherSourceValidator,
        request_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            dedup,
            validator,
            request_timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &RambleConfig, provider: Option<Arc<dyn ForecastProvider>>) -> Self {
        Self::new(
            provider,
            Arc::new(RequestDeduplicator::from_config(&config.dedup)),
            WeatherSourceValidator::from(&config.weather),
            config.dedup.request_timeout(),
        )
    }

    #[must_use]
    pub fn has_live_source(&self) -> bool {
        self.provider.is_some()
    }

    /// Drop coalesced lookups so the next request goes upstream again
    pub fn clear_cache(&self) {
        self.dedup.clear_cache();
    }

    /// Weather for `location` on `target`, as seen on `today`.
    ///
    /// Provider errors and timeouts are returned to the caller; a forecast
    /// that has no day near `target` or fails validation falls back to the
    /// historical estimate.
    #[instrument(skip(self, location), fields(city = %location.display_name()))]
    pub async fn weather_for_date(
        &self,
        location: &Location,
        target: NaiveDate,
        today: NaiveDate,
    ) -> Result<WeatherPayload> {
        let days_from_now = (target - today).num_days();

        let provider = self
            .provider
            .as_ref()
            .filter(|_| self.validator.should_attempt_live_forecast(days_from_now, true));

        if let Some(provider) = provider {
            let key = format!("{}-{}", location.slug(), target.format("%Y-%m-%d"));
            let provider = Arc::clone(provider);
            let city = location.clone();

            let live = self
                .dedup
                .deduplicate(
                    &key,
                    move || fetch_live(provider, city, target),
                    self.request_timeout,
                )
                .await?;

            if let Some(payload) = live {
                if is_live_weather_data(&payload)
                    && self.validator.is_valid_live_forecast(&payload, days_from_now)
                {
                    info!(days_from_now, "Using live forecast");
                    return Ok(payload);
                }
                debug!("Live payload failed validation");
            }
        }

        debug!(days_from_now, "Using historical estimate");
        Ok(historical::estimate(location, target))
    }
}

async fn fetch_live(
    provider: Arc<dyn ForecastProvider>,
    location: Location,
    target: NaiveDate,
) -> Result<Option<WeatherPayload>> {
    let forecasts = provider.daily_forecast(&location).await?;
    let target_string = target.format("%Y-%m-%d").to_string();
    let result = find_best_match(&forecasts, target, &target_string);
    if !result.is_match() {
        debug!(days = forecasts.len(), "No forecast day near the requested date");
        return Ok(None);
    }

    Ok(WeatherPayload::from_match(&location.name, &result).map(ensure_live_weather_marking))
}
