//! Area market statistics.

use serde::Serialize;

use super::{Level, MarketRepository};

/// Statistics for one property type within a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMetrics {
    pub average_price: u64,
    pub price_per_sq_ft: u32,
    /// Percent change over the last 12 months.
    pub price_change_12_months: f64,
    /// Gross rental yield, percent.
    pub rent_yield: f64,
    pub average_days_on_market: u32,
    pub demand_level: Level,
    pub supply_level: Level,
    pub trending_amenities: Vec<String>,
}

/// Market data for one location, property types in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationMarket {
    pub location: String,
    pub overview: String,
    pub property_types: Vec<(String, TypeMetrics)>,
}

impl LocationMarket {
    /// Metrics for a lowercase property type key.
    pub fn property_type(&self, key: &str) -> Option<&TypeMetrics> {
        self.property_types
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, metrics)| metrics)
    }

    /// Property type keys in catalog order.
    pub fn type_names(&self) -> Vec<String> {
        self.property_types.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn metrics(&self) -> impl Iterator<Item = &TypeMetrics> {
        self.property_types.iter().map(|(_, metrics)| metrics)
    }
}

/// Comparable-sales profile for valuing a single property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketComparison {
    pub average_price_per_sq_ft: u32,
    pub price_change_12_months: f64,
    pub average_days_on_market: u32,
    pub demand_level: Level,
    /// Used for proposal financials, not part of the analysis payload.
    #[serde(skip)]
    pub rental_yield: f64,
}

/// In-memory market store keyed by lowercase location.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarket {
    locations: Vec<LocationMarket>,
}

impl InMemoryMarket {
    pub fn new(locations: Vec<LocationMarket>) -> Self {
        Self { locations }
    }

    /// Store holding the demo market data.
    pub fn seeded() -> Self {
        Self::new(seed_locations())
    }
}

impl MarketRepository for InMemoryMarket {
    fn lookup_location(&self, location: &str) -> Option<LocationMarket> {
        let key = location.to_lowercase();
        self.locations
            .iter()
            .find(|m| m.location.to_lowercase() == key)
            .cloned()
    }

    fn location_names(&self) -> Vec<String> {
        self.locations.iter().map(|m| m.location.clone()).collect()
    }

    fn comparison_for(&self, location: &str) -> MarketComparison {
        if location == "Downtown Dubai" {
            MarketComparison {
                average_price_per_sq_ft: 2200,
                price_change_12_months: 5.2,
                average_days_on_market: 45,
                demand_level: Level::High,
                rental_yield: 5.1,
            }
        } else {
            MarketComparison {
                average_price_per_sq_ft: 1650,
                price_change_12_months: 3.8,
                average_days_on_market: 60,
                demand_level: Level::Medium,
                rental_yield: 4.5,
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn metrics(
    average_price: u64,
    price_per_sq_ft: u32,
    price_change_12_months: f64,
    rent_yield: f64,
    average_days_on_market: u32,
    demand_level: Level,
    supply_level: Level,
    trending_amenities: &[&str],
) -> TypeMetrics {
    TypeMetrics {
        average_price,
        price_per_sq_ft,
        price_change_12_months,
        rent_yield,
        average_days_on_market,
        demand_level,
        supply_level,
        trending_amenities: trending_amenities.iter().map(|s| s.to_string()).collect(),
    }
}

fn seed_locations() -> Vec<LocationMarket> {
    vec![
        LocationMarket {
            location: "Downtown Dubai".to_string(),
            overview: "Premium central district with high demand".to_string(),
            property_types: vec![
                (
                    "apartment".to_string(),
                    metrics(
                        2_200_000,
                        2200,
                        5.2,
                        5.1,
                        45,
                        Level::High,
                        Level::Moderate,
                        &["Smart Home Features", "Concierge", "EV Charging"],
                    ),
                ),
                (
                    "villa".to_string(),
                    metrics(
                        12_500_000,
                        2800,
                        6.5,
                        4.2,
                        60,
                        Level::High,
                        Level::Low,
                        &["Private Pool", "Smart Home", "Home Office"],
                    ),
                ),
            ],
        },
        LocationMarket {
            location: "Dubai Marina".to_string(),
            overview: "Popular waterfront community with luxury high-rises".to_string(),
            property_types: vec![(
                "apartment".to_string(),
                metrics(
                    1_800_000,
                    1900,
                    4.8,
                    5.5,
                    50,
                    Level::High,
                    Level::High,
                    &["Marina View", "Gym", "Pool"],
                ),
            )],
        },
        LocationMarket {
            location: "Arabian Ranches".to_string(),
            overview: "Established family-friendly villa community".to_string(),
            property_types: vec![(
                "villa".to_string(),
                metrics(
                    5_500_000,
                    1650,
                    3.8,
                    4.5,
                    65,
                    Level::Moderate,
                    Level::Low,
                    &["Private Garden", "Community Pools", "Sports Facilities"],
                ),
            )],
        },
    ]
}
