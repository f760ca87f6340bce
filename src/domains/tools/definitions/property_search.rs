//! Property search tool definition.
//!
//! Filters the listing catalog by location, type, price band and bedroom
//! count.

use std::sync::Arc;
use std::time::Duration;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::core::config::ToolsConfig;
use crate::domains::catalog::{PropertyListing, PropertyRepository};
use crate::domains::tools::ToolError;
use crate::domains::tools::handlers::{
    ParameterDescriptor, ParameterMap, ParameterType, ToolDescriptor, ToolHandler, parse_params,
    simulate_io,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the property search tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertySearchParams {
    /// Location or area to search in (substring, case-insensitive).
    pub location: String,

    /// Type of property (apartment, villa, office, etc.)
    pub property_type: Option<String>,

    /// Minimum price in AED, inclusive.
    pub min_price: Option<f64>,

    /// Maximum price in AED, inclusive.
    pub max_price: Option<f64>,

    /// Minimum number of bedrooms.
    pub bedrooms: Option<f64>,

    /// Maximum number of results to return.
    pub limit: Option<f64>,
}

/// Search output.
#[derive(Debug, Clone, Serialize)]
pub struct PropertySearchResult {
    pub count: usize,
    pub properties: Vec<PropertyListing>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Property search tool - filters the listing catalog.
pub struct PropertySearchTool {
    descriptor: ToolDescriptor,
    properties: Arc<dyn PropertyRepository>,
    settings: ToolsConfig,
}

impl PropertySearchTool {
    /// Tool name as registered.
    pub const NAME: &'static str = "propertySearch";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search for properties based on various criteria";

    const LATENCY: Duration = Duration::from_millis(500);

    pub fn new(properties: Arc<dyn PropertyRepository>, settings: ToolsConfig) -> Self {
        let descriptor = ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            vec![
                ParameterDescriptor::required(
                    "location",
                    "Location or area to search in",
                    ParameterType::String,
                ),
                ParameterDescriptor::optional(
                    "propertyType",
                    "Type of property (apartment, villa, office, etc.)",
                    ParameterType::String,
                ),
                ParameterDescriptor::optional("minPrice", "Minimum price in AED", ParameterType::Number),
                ParameterDescriptor::optional("maxPrice", "Maximum price in AED", ParameterType::Number),
                ParameterDescriptor::optional("bedrooms", "Number of bedrooms", ParameterType::Number),
                ParameterDescriptor::optional(
                    "limit",
                    "Maximum number of results to return",
                    ParameterType::Number,
                ),
            ],
        );

        Self {
            descriptor,
            properties,
            settings,
        }
    }

    /// Apply every filter, then the limit.
    pub fn search(&self, params: &PropertySearchParams) -> PropertySearchResult {
        let location = params.location.to_lowercase();
        let property_type = params
            .property_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);

        let mut properties = self.properties.filter_by(&|listing: &PropertyListing| {
            let price = listing.price as f64;

            (location.is_empty() || listing.location.to_lowercase().contains(&location))
                && property_type
                    .as_ref()
                    .is_none_or(|t| listing.property_type.to_lowercase() == *t)
                && params.min_price.is_none_or(|min| price >= min)
                && params.max_price.is_none_or(|max| price <= max)
                && params
                    .bedrooms
                    .is_none_or(|beds| f64::from(listing.bedrooms) >= beds)
        });

        properties.truncate(limited_len(properties.len(), params.limit));

        PropertySearchResult {
            count: properties.len(),
            properties,
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for PropertySearchTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<PropertySearchParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    async fn execute(&self, params: &ParameterMap) -> Result<Value, ToolError> {
        simulate_io(self.settings, Self::LATENCY).await;

        let params: PropertySearchParams = parse_params(params)?;
        info!("Searching properties in '{}'", params.location);

        let result = self.search(&params);
        info!("Property search matched {} listings", result.count);

        Ok(serde_json::to_value(result)?)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Number of matches kept for a requested limit.
///
/// Absent or zero keeps everything; fractional limits truncate; a negative
/// limit drops that many results from the end.
fn limited_len(available: usize, limit: Option<f64>) -> usize {
    match limit.map(f64::trunc) {
        Some(l) if l > 0.0 => available.min(l as usize),
        Some(l) if l < 0.0 => available.saturating_sub((-l) as usize),
        _ => available,
    }
}

// ============================================================================
// Tests
// ============================================================================
