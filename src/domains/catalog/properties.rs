//! Property listings and detailed property records.

use std::collections::HashMap;

use serde::Serialize;

use super::PropertyRepository;

/// Summary row returned by property search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListing {
    pub id: String,
    pub title: String,
    pub location: String,
    pub property_type: String,
    /// Asking price in AED.
    pub price: u64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Living area in square feet.
    pub area: u32,
    pub description: String,
}

/// Full record used for analysis and proposals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub id: String,
    pub title: String,
    pub location: String,
    pub property_type: String,
    pub price: u64,
    pub price_per_sq_ft: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: u32,
    pub year_built: u16,
    pub amenities: Vec<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// In-memory property store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProperties {
    listings: Vec<PropertyListing>,
    records: HashMap<String, PropertyRecord>,
}

impl InMemoryProperties {
    /// Build a store from explicit data.
    pub fn new(listings: Vec<PropertyListing>, records: Vec<PropertyRecord>) -> Self {
        Self {
            listings,
            records: records.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    /// Store holding the demo listings for Dubai.
    pub fn seeded() -> Self {
        Self::new(seed_listings(), seed_records())
    }
}

impl PropertyRepository for InMemoryProperties {
    fn filter_by(&self, predicate: &dyn Fn(&PropertyListing) -> bool) -> Vec<PropertyListing> {
        self.listings.iter().filter(|l| predicate(l)).cloned().collect()
    }

    fn lookup_by_id(&self, id: &str) -> Option<PropertyRecord> {
        self.records.get(id).cloned()
    }
}

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    title: &str,
    location: &str,
    property_type: &str,
    price: u64,
    bedrooms: u32,
    bathrooms: u32,
    area: u32,
    description: &str,
) -> PropertyListing {
    PropertyListing {
        id: id.to_string(),
        title: title.to_string(),
        location: location.to_string(),
        property_type: property_type.to_string(),
        price,
        bedrooms,
        bathrooms,
        area,
        description: description.to_string(),
    }
}

fn seed_listings() -> Vec<PropertyListing> {
    vec![
        listing(
            "prop-001",
            "Luxury Apartment in Downtown Dubai",
            "Downtown Dubai",
            "apartment",
            2_500_000,
            2,
            2,
            1200,
            "Modern luxury apartment with stunning views of Burj Khalifa",
        ),
        listing(
            "prop-002",
            "Spacious Villa in Arabian Ranches",
            "Arabian Ranches",
            "villa",
            5_500_000,
            4,
            5,
            3500,
            "Family villa with private pool and garden",
        ),
        listing(
            "prop-003",
            "Office Space in Business Bay",
            "Business Bay",
            "office",
            3_200_000,
            0,
            2,
            1800,
            "Modern office space with meeting rooms and reception area",
        ),
        listing(
            "prop-004",
            "Penthouse in Palm Jumeirah",
            "Palm Jumeirah",
            "apartment",
            15_000_000,
            4,
            5,
            5000,
            "Exclusive penthouse with private pool and panoramic sea views",
        ),
        listing(
            "prop-005",
            "Studio Apartment in Dubai Marina",
            "Dubai Marina",
            "apartment",
            950_000,
            0,
            1,
            550,
            "Cozy studio apartment with marina views",
        ),
    ]
}

fn seed_records() -> Vec<PropertyRecord> {
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    vec![
        PropertyRecord {
            id: "prop-001".to_string(),
            title: "Luxury Apartment in Downtown Dubai".to_string(),
            location: "Downtown Dubai".to_string(),
            property_type: "apartment".to_string(),
            price: 2_500_000,
            price_per_sq_ft: 2083,
            bedrooms: 2,
            bathrooms: 2,
            area: 1200,
            year_built: 2018,
            amenities: strings(&["Pool", "Gym", "Concierge", "Parking"]),
            description: "Modern luxury apartment with stunning views of Burj Khalifa".to_string(),
            images: strings(&[
                "https://example.com/property/001/image1.jpg",
                "https://example.com/property/001/image2.jpg",
            ]),
        },
        PropertyRecord {
            id: "prop-002".to_string(),
            title: "Spacious Villa in Arabian Ranches".to_string(),
            location: "Arabian Ranches".to_string(),
            property_type: "villa".to_string(),
            price: 5_500_000,
            price_per_sq_ft: 1571,
            bedrooms: 4,
            bathrooms: 5,
            area: 3500,
            year_built: 2015,
            amenities: strings(&["Private Pool", "Garden", "Maid's Room", "Parking"]),
            description: "Family villa with private pool and garden".to_string(),
            images: strings(&[
                "https://example.com/property/002/image1.jpg",
                "https://example.com/property/002/image2.jpg",
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_keeps_catalog_order() {
        let store = InMemoryProperties::seeded();
        let apartments = store.filter_by(&|l| l.property_type == "apartment");
        let ids: Vec<_> = apartments.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["prop-001", "prop-004", "prop-005"]);
    }

    #[test]
    fn test_lookup_by_id() {
        let store = InMemoryProperties::seeded();
        let record = store.lookup_by_id("prop-002").unwrap();
        assert_eq!(record.price_per_sq_ft, 1571);
        assert_eq!(record.year_built, 2015);
        assert!(store.lookup_by_id("prop-003").is_none());
        assert!(store.lookup_by_id("PROP-001").is_none());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = InMemoryProperties::seeded().lookup_by_id("prop-001").unwrap();
        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value["pricePerSqFt"], 2083);
        assert_eq!(value["yearBuilt"], 2018);
        assert_eq!(value["propertyType"], "apartment");
    }
}
