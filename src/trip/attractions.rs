//! Built-in list of well-known Route 66 stops

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttractionCategory {
    Landmark,
    Museum,
    Roadside,
    Nature,
    Lodging,
    Dining,
}

impl AttractionCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AttractionCategory::Landmark => "landmark",
            AttractionCategory::Museum => "museum",
            AttractionCategory::Roadside => "roadside",
            AttractionCategory::Nature => "nature",
            AttractionCategory::Lodging => "lodging",
            AttractionCategory::Dining => "dining",
        }
    }
}

/// A stop worth showing on a day card or the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub name: String,
    /// Route city the stop is closest to ("City, ST")
    pub city: String,
    pub category: AttractionCategory,
    /// Relative popularity, 0.0 to 1.0
    pub popularity: f64,
    pub historic: bool,
}

impl Attraction {
    fn new(
        name: &str,
        city: &str,
        category: AttractionCategory,
        popularity: f64,
        historic: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            city: city.to_string(),
            category,
            popularity,
            historic,
        }
    }
}

#[must_use]
pub fn route66_attractions() -> Vec<Attraction> {
    use AttractionCategory::*;

    vec![
        Attraction::new("Route 66 Begin Sign", "Chicago, IL", Landmark, 0.80, true),
        Attraction::new("Lou Mitchell's", "Chicago, IL", Dining, 0.70, true),
        Attraction::new("Gemini Giant", "Joliet, IL", Roadside, 0.65, true),
        Attraction::new("Lincoln Home", "Springfield, IL", Museum, 0.60, true),
        Attraction::new("Chain of Rocks Bridge", "St. Louis, MO", Landmark, 0.70, true),
        Attraction::new("Ted Drewes Frozen Custard", "St. Louis, MO", Dining, 0.75, true),
        Attraction::new("Blue Whale of Catoosa", "Tulsa, OK", Roadside, 0.85, true),
        Attraction::new("Oklahoma Route 66 Museum", "Clinton, OK", Museum, 0.65, true),
        Attraction::new("Cadillac Ranch", "Amarillo, TX", Roadside, 0.95, false),
        Attraction::new("Big Texan Steak Ranch", "Amarillo, TX", Dining, 0.80, false),
        Attraction::new("Blue Swallow Motel", "Tucumcari, NM", Lodging, 0.75, true),
        Attraction::new("Blue Hole", "Santa Rosa, NM", Nature, 0.55, false),
        Attraction::new("Old Town Albuquerque", "Albuquerque, NM", Landmark, 0.70, true),
        Attraction::new("El Rancho Hotel", "Gallup, NM", Lodging, 0.60, true),
        Attraction::new("Petrified Forest National Park", "Holbrook, AZ", Nature, 0.90, false),
        Attraction::new("Wigwam Motel", "Holbrook, AZ", Lodging, 0.80, true),
        Attraction::new("Meteor Crater", "Flagstaff, AZ", Nature, 0.80, false),
        Attraction::new("Grand Canyon Railway", "Williams, AZ", Landmark, 0.75, true),
        Attraction::new("Oatman Burros", "Kingman, AZ", Roadside, 0.70, true),
        Attraction::new("Route 66 Mother Road Museum", "Barstow, CA", Museum, 0.50, true),
        Attraction::new("Elmer's Bottle Tree Ranch", "Barstow, CA", Roadside, 0.60, false),
        Attraction::new("Santa Monica Pier", "Santa Monica, CA", Landmark, 0.95, true),
    ]
}
