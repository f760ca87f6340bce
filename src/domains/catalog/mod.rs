//! Read-only reference data consumed by the tools.
//!
//! Each dataset sits behind a small repository trait so a tool only sees
//! `lookup_by_id` / `filter_by` style capabilities. The in-memory
//! implementations are seeded once at startup and never mutated.

mod market;
mod phrases;
mod properties;

use std::sync::Arc;

use serde::Serialize;

pub use market::{InMemoryMarket, LocationMarket, MarketComparison, TypeMetrics};
pub use phrases::InMemoryPhraseBook;
pub use properties::{InMemoryProperties, PropertyListing, PropertyRecord};

/// Qualitative demand/supply indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Level {
    Low,
    Moderate,
    Medium,
    High,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Property listings and detailed property records.
pub trait PropertyRepository: Send + Sync {
    /// All listings accepted by `predicate`, in catalog order.
    fn filter_by(&self, predicate: &dyn Fn(&PropertyListing) -> bool) -> Vec<PropertyListing>;

    /// Detailed record for an exact property id.
    fn lookup_by_id(&self, id: &str) -> Option<PropertyRecord>;
}

/// Area-level market statistics.
pub trait MarketRepository: Send + Sync {
    /// Market data for a location, matched case-insensitively.
    fn lookup_location(&self, location: &str) -> Option<LocationMarket>;

    /// Display names of every known location.
    fn location_names(&self) -> Vec<String>;

    /// Comparable-sales profile used when valuing a single property.
    fn comparison_for(&self, location: &str) -> MarketComparison;
}

/// Fixed phrase dictionary.
pub trait PhraseBook: Send + Sync {
    /// Exact-match translation of `text` into `target`.
    fn translate(&self, text: &str, target: &str) -> Option<String>;

    /// Placeholder returned for phrases the dictionary does not know.
    fn placeholder(&self, target: &str) -> Option<String>;
}

/// Bundle of repositories handed to the tool constructors.
#[derive(Clone)]
pub struct Catalog {
    pub properties: Arc<dyn PropertyRepository>,
    pub market: Arc<dyn MarketRepository>,
    pub phrases: Arc<dyn PhraseBook>,
}

impl Catalog {
    /// Catalog backed by the built-in demo datasets.
    pub fn in_memory() -> Self {
        Self {
            properties: Arc::new(InMemoryProperties::seeded()),
            market: Arc::new(InMemoryMarket::seeded()),
            phrases: Arc::new(InMemoryPhraseBook::seeded()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display_matches_serialization() {
        for level in [Level::Low, Level::Moderate, Level::Medium, Level::High] {
            let serialized = serde_json::to_value(level).unwrap();
            assert_eq!(serialized, level.to_string());
        }
    }

    #[test]
    fn test_in_memory_catalog_is_seeded() {
        let catalog = Catalog::in_memory();
        assert_eq!(catalog.properties.filter_by(&|_| true).len(), 5);
        assert!(catalog.properties.lookup_by_id("prop-001").is_some());
        assert_eq!(catalog.market.location_names().len(), 3);
        assert_eq!(catalog.phrases.translate("Price", "fr").as_deref(), Some("Prix"));
    }
}
