//! Weather for a route city on a trip date
//!
//! A live forecast is only attempted close to the travel date. Forecast days
//! are matched to the requested date, checked, and otherwise replaced by a
//! historical estimate.

pub mod dedup;
pub mod historical;
pub mod matcher;
pub mod open_weather;
pub mod provider;
pub mod service;
pub mod validation;

pub use dedup::RequestDeduplicator;
pub use matcher::find_best_match;
pub use open_weather::OpenWeatherClient;
pub use provider::ForecastProvider;
pub use service::WeatherService;
pub use validation::{WeatherQuality, WeatherSourceValidator};
