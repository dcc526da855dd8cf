//! JSON API served under `/api`

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    Router,
    extract::{
        FromRequest, FromRequestParts, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::RambleError;
use crate::config::RambleConfig;
use crate::models::{ForecastDay, Location, MapFilters, MatchResult, TripFormData, UnitPreference, WeatherPayload};
use crate::route::{RouteStats, find_waypoint, route66_waypoints};
use crate::storage::{ClientState, InMemoryStore, KeyValueStore};
use crate::trip::{Attraction, PlannerSettings, TripPlan, plan_trip, route66_attractions};
use crate::weather::{
    ForecastProvider, OpenWeatherClient, WeatherQuality, WeatherService, WeatherSourceValidator,
    find_best_match,
};

/// Everything the handlers share
pub struct AppState {
    pub weather: WeatherService,
    pub validator: WeatherSourceValidator,
    pub planner: PlannerSettings,
    pub waypoints: Vec<Location>,
    pub attractions: Vec<Attraction>,
    pub client_state: ClientState<Arc<dyn KeyValueStore>>,
}

impl AppState {
    /// Build state from configuration, with a live OpenWeatherMap provider
    /// when an API key is present
    pub fn from_config(config: &RambleConfig, store: Arc<dyn KeyValueStore>) -> crate::Result<Self> {
        let provider: Option<Arc<dyn ForecastProvider>> = if config.weather.has_api_key() {
            Some(Arc::new(OpenWeatherClient::new(&config.weather)?))
        } else {
            warn!("No weather API key set; serving historical estimates only");
            None
        };
        Ok(Self::with_provider(config, provider, store))
    }

    #[must_use]
    pub fn with_provider(
        config: &RambleConfig,
        provider: Option<Arc<dyn ForecastProvider>>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            weather: WeatherService::from_config(config, provider),
            validator: WeatherSourceValidator::from(&config.weather),
            planner: PlannerSettings::from(&config.trip),
            waypoints: route66_waypoints(),
            attractions: route66_attractions(),
            client_state: ClientState::new(store),
        }
    }

    /// Config defaults, no live weather, state kept in memory
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_provider(&RambleConfig::default(), None, Arc::new(InMemoryStore::new()))
    }
}

/// Maps domain errors to HTTP responses
pub struct ApiError(RambleError);

impl From<RambleError> for ApiError {
    fn from(err: RambleError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(RambleError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(RambleError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RambleError::Validation { .. } => StatusCode::BAD_REQUEST,
            RambleError::NotFound { .. } => StatusCode::NOT_FOUND,
            RambleError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            RambleError::Api { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        let body = serde_json::json!({ "error": self.0.user_message() });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// JSON body extractor whose rejections use the API error body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
struct ApiJson<T>(T);

/// Query string extractor whose rejections use the API error body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
struct ApiQuery<T>(T);

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/route", get(get_route))
        .route("/trip/days", post(calculate_days))
        .route("/trip/plan", post(create_plan))
        .route("/weather", get(get_weather))
        .route("/weather/match", post(match_forecast))
        .route("/weather/cache/clear", post(clear_weather_cache))
        .route("/state/trip-form", get(get_trip_form).put(put_trip_form).delete(delete_trip_form))
        .route("/state/units", get(get_units).put(put_units))
        .route("/state/map-filters", get(get_map_filters).put(put_map_filters))
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteResponse {
    waypoints: Vec<Location>,
    attractions: Vec<Attraction>,
    stats: RouteStats,
    units: UnitPreference,
    /// Route length in the preferred distance unit
    total_distance: f64,
}

async fn get_route(State(state): State<Arc<AppState>>) -> ApiResult<Json<RouteResponse>> {
    let units = state.client_state.unit_preference().await?;
    let stats = RouteStats::compute(&state.waypoints, state.waypoints.len().saturating_sub(1));
    Ok(Json(RouteResponse {
        waypoints: state.waypoints.clone(),
        attractions: state.attractions.clone(),
        total_distance: units.distance(stats.total_distance_miles),
        stats,
        units,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DaysRequest {
    total_distance_miles: f64,
    requested_days: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DaysResponse {
    days: u32,
    requested_days: u32,
    miles_per_day: f64,
    extended: bool,
}

async fn calculate_days(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<DaysRequest>,
) -> ApiResult<Json<DaysResponse>> {
    let requested = NonZeroU32::new(request.requested_days)
        .ok_or_else(|| RambleError::validation("Requested days must be at least 1"))?;
    if !request.total_distance_miles.is_finite() || request.total_distance_miles < 0.0 {
        return Err(RambleError::validation("Total distance must be a non-negative number").into());
    }

    let days = state
        .planner
        .calculator
        .calculate(request.total_distance_miles, requested);
    let miles_per_day = request.total_distance_miles / f64::from(days);

    Ok(Json(DaysResponse {
        days,
        requested_days: request.requested_days,
        miles_per_day,
        extended: days > request.requested_days,
    }))
}

async fn create_plan(
    State(state): State<Arc<AppState>>,
    ApiJson(form): ApiJson<TripFormData>,
) -> ApiResult<Json<TripPlan>> {
    let plan = plan_trip(&form, &state.waypoints, &state.attractions, &state.planner)?;
    Ok(Json(plan))
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    city: String,
    date: NaiveDate,
}

#[derive(Debug, Serialize)]
struct WeatherResponse {
    quality: WeatherQuality,
    weather: WeatherPayload,
    display: DisplayReadings,
}

/// Temperatures converted to the preferred unit
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DisplayReadings {
    units: UnitPreference,
    temperature: Option<f64>,
    high_temp: Option<f64>,
    low_temp: Option<f64>,
}

impl DisplayReadings {
    fn new(units: UnitPreference, weather: &WeatherPayload) -> Self {
        Self {
            units,
            temperature: weather.temperature.map(|t| units.temperature(t)),
            high_temp: weather.high_temp.map(|t| units.temperature(t)),
            low_temp: weather.low_temp.map(|t| units.temperature(t)),
        }
    }
}

async fn get_weather(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<WeatherQuery>,
) -> ApiResult<Json<WeatherResponse>> {
    let (_, location) = find_waypoint(&state.waypoints, &query.city)
        .ok_or_else(|| RambleError::not_found(format!("'{}' is not a Route 66 stop", query.city)))?;

    let today = Utc::now().date_naive();
    let weather = state
        .weather
        .weather_for_date(location, query.date, today)
        .await?;
    let days_from_now = (query.date - today).num_days();
    let units = state.client_state.unit_preference().await?;

    Ok(Json(WeatherResponse {
        quality: state.validator.classify(&weather, days_from_now),
        display: DisplayReadings::new(units, &weather),
        weather,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchRequest {
    forecasts: Vec<ForecastDay>,
    target_date: NaiveDate,
}

async fn match_forecast(ApiJson(request): ApiJson<MatchRequest>) -> Json<MatchResult> {
    let target_string = request.target_date.format("%Y-%m-%d").to_string();
    Json(find_best_match(&request.forecasts, request.target_date, &target_string))
}

async fn clear_weather_cache(State(state): State<Arc<AppState>>) -> StatusCode {
    state.weather.clear_cache();
    StatusCode::NO_CONTENT
}

async fn get_trip_form(State(state): State<Arc<AppState>>) -> ApiResult<Json<TripFormData>> {
    Ok(Json(state.client_state.trip_form().await?))
}

async fn put_trip_form(
    State(state): State<Arc<AppState>>,
    ApiJson(form): ApiJson<TripFormData>,
) -> ApiResult<StatusCode> {
    form.validate()?;
    state.client_state.save_trip_form(&form).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_trip_form(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    state.client_state.clear_trip_form().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_units(State(state): State<Arc<AppState>>) -> ApiResult<Json<UnitPreference>> {
    Ok(Json(state.client_state.unit_preference().await?))
}

async fn put_units(
    State(state): State<Arc<AppState>>,
    ApiJson(units): ApiJson<UnitPreference>,
) -> ApiResult<StatusCode> {
    state.client_state.save_unit_preference(units).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_map_filters(State(state): State<Arc<AppState>>) -> ApiResult<Json<MapFilters>> {
    Ok(Json(state.client_state.map_filters().await?))
}

async fn put_map_filters(
    State(state): State<Arc<AppState>>,
    ApiJson(filters): ApiJson<MapFilters>,
) -> ApiResult<StatusCode> {
    state.client_state.save_map_filters(&filters).await?;
    Ok(StatusCode::NO_CONTENT)
}
