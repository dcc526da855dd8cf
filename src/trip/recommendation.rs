//! Attraction scoring weights and per-context stop limits

use serde::{Deserialize, Serialize};

use super::attractions::{Attraction, AttractionCategory};
use crate::models::TripStyle;

/// Where a list of stops is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayContext {
    DayCard,
    MapView,
    PrintView,
}

/// Weights of the scoring factors; they sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub category_affinity: f64,
    pub popularity: f64,
    pub historic: f64,
    pub overnight_city: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            category_affinity: 0.35,
            popularity: 0.30,
            historic: 0.20,
            overnight_city: 0.15,
        }
    }
}

/// Maximum number of stops per display context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopLimits {
    pub day_card: usize,
    pub map_view: usize,
    pub print_view: usize,
}

impl Default for StopLimits {
    fn default() -> Self {
        Self {
            day_card: 3,
            map_view: 10,
            print_view: 5,
        }
    }
}

impl StopLimits {
    #[must_use]
    pub fn for_context(&self, context: DisplayContext) -> usize {
        match context {
            DisplayContext::DayCard => self.day_card,
            DisplayContext::MapView => self.map_view,
            DisplayContext::PrintView => self.print_view,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredStop {
    pub attraction: Attraction,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecommendationConfig {
    pub weights: ScoringWeights,
    pub limits: StopLimits,
}

/// How much a trip style favours a category, 0.0 to 1.0
#[must_use]
pub fn category_affinity(style: TripStyle, category: AttractionCategory) -> f64 {
    use AttractionCategory::*;

    match (style, category) {
        (TripStyle::Leisurely, Museum | Nature) => 1.0,
        (TripStyle::Leisurely, Landmark | Lodging | Dining) => 0.8,
        (TripStyle::Leisurely, Roadside) => 0.6,
        (TripStyle::Balanced, Landmark | Roadside) => 0.9,
        (TripStyle::Balanced, Nature | Museum) => 0.7,
        (TripStyle::Balanced, Lodging | Dining) => 0.6,
        // quick photo stops suit a tight schedule
        (TripStyle::Express, Roadside | Landmark) => 1.0,
        (TripStyle::Express, Dining) => 0.6,
        (TripStyle::Express, Nature | Lodging) => 0.3,
        (TripStyle::Express, Museum) => 0.2,
    }
}

impl RecommendationConfig {
    /// Weighted score in [0, 1]
    #[must_use]
    pub fn score(&self, attraction: &Attraction, style: TripStyle, overnight_city: bool) -> f64 {
        let w = &self.weights;
        let historic = if attraction.historic { 1.0 } else { 0.0 };
        let overnight = if overnight_city { 1.0 } else { 0.0 };

        w.category_affinity * category_affinity(style, attraction.category)
            + w.popularity * attraction.popularity.clamp(0.0, 1.0)
            + w.historic * historic
            + w.overnight_city * overnight
    }

    /// Best stops for `context`, highest score first.
    ///
    /// Candidates in `overnight_city` get the overnight bonus. Equal scores
    /// keep their input order.
    #[must_use]
    pub fn select_stops(
        &self,
        candidates: &[Attraction],
        style: TripStyle,
        context: DisplayContext,
        overnight_city: Option<&str>,
    ) -> Vec<ScoredStop> {
        let mut scored: Vec<ScoredStop> = candidates
            .iter()
            .map(|attraction| {
                let overnight = overnight_city
                    .is_some_and(|city| city.eq_ignore_ascii_case(&attraction.city));
                ScoredStop {
                    attraction: attraction.clone(),
                    score: self.score(attraction, style, overnight),
                }
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.limits.for_context(context));
        scored
    }
}
