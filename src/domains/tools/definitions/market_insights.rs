//! Market insights tool definition.
//!
//! Unknown locations and property types are reported inside a successful
//! result (an `error` field plus the valid choices), not as tool failures.

use std::sync::Arc;
use std::time::Duration;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::core::config::ToolsConfig;
use crate::domains::catalog::{Level, LocationMarket, MarketRepository, TypeMetrics};
use crate::domains::tools::ToolError;
use crate::domains::tools::handlers::{
    ParameterDescriptor, ParameterMap, ParameterType, ToolDescriptor, ToolHandler, parse_params,
    simulate_io,
};

const FORECAST_TIMEFRAME: &str = "12-18 months";

/// Parameters for the market insights tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarketInsightsParams {
    /// Location or area to get insights for.
    pub location: String,

    /// Type of property (apartment, villa, office, etc.)
    pub property_type: Option<String>,
}

/// Price forecast for a single property type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub price_outlook: String,
    pub timeframe: String,
    pub confidence_level: String,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub overall_trend: String,
    pub most_profitable_type: String,
    pub investment_recommendation: String,
}

/// Result of a market insights query.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MarketInsights {
    #[serde(rename_all = "camelCase")]
    LocationNotFound {
        error: String,
        available_locations: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    PropertyTypeNotFound {
        error: String,
        available_types: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    PropertyType {
        location: String,
        overview: String,
        property_type: String,
        market_data: TypeMetrics,
        forecast: Forecast,
    },
    #[serde(rename_all = "camelCase")]
    Summary {
        location: String,
        overview: String,
        property_types: Vec<String>,
        market_summary: MarketSummary,
    },
}

/// Market insights tool.
pub struct MarketInsightsTool {
    descriptor: ToolDescriptor,
    market: Arc<dyn MarketRepository>,
    settings: ToolsConfig,
}

impl MarketInsightsTool {
    /// Tool name as registered.
    pub const NAME: &'static str = "marketInsights";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get real estate market insights for a specific area";

    const LATENCY: Duration = Duration::from_millis(700);

    pub fn new(market: Arc<dyn MarketRepository>, settings: ToolsConfig) -> Self {
        let descriptor = ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            vec![
                ParameterDescriptor::required(
                    "location",
                    "Location or area to get insights for",
                    ParameterType::String,
                ),
                ParameterDescriptor::optional(
                    "propertyType",
                    "Type of property (apartment, villa, office, etc.)",
                    ParameterType::String,
                ),
            ],
        );

        Self {
            descriptor,
            market,
            settings,
        }
    }

    /// Build insights for a location and optional property type.
    pub fn insights(&self, params: &MarketInsightsParams) -> MarketInsights {
        let Some(market) = self.market.lookup_location(&params.location) else {
            return MarketInsights::LocationNotFound {
                error: "Location not found".to_string(),
                available_locations: self.market.location_names(),
            };
        };

        match params.property_type.as_deref().filter(|t| !t.is_empty()) {
            Some(requested) => match market.property_type(&requested.to_lowercase()) {
                Some(metrics) => MarketInsights::PropertyType {
                    forecast: forecast(metrics),
                    market_data: metrics.clone(),
                    property_type: requested.to_string(),
                    location: market.location,
                    overview: market.overview,
                },
                None => MarketInsights::PropertyTypeNotFound {
                    error: format!(
                        "Property type '{}' not found in {}",
                        requested, market.location
                    ),
                    available_types: market.type_names(),
                },
            },
            None => MarketInsights::Summary {
                property_types: market.type_names(),
                market_summary: MarketSummary {
                    overall_trend: overall_trend(&market).to_string(),
                    most_profitable_type: most_profitable_type(&market),
                    investment_recommendation: investment_recommendation(&market),
                },
                location: market.location,
                overview: market.overview,
            },
        }
    }
}

/// Price outlook for one property type.
pub fn forecast(metrics: &TypeMetrics) -> Forecast {
    let change = metrics.price_change_12_months;

    let (price_outlook, confidence_level) = if change > 5.0
        && metrics.demand_level == Level::High
        && metrics.supply_level != Level::High
    {
        ("Strong Growth", "High")
    } else if change > 3.0 && metrics.demand_level != Level::Low {
        ("Moderate Growth", "Moderate")
    } else if change < 0.0 {
        ("Potential Decline", "Moderate")
    } else {
        ("Stable", "Moderate")
    };

    let direction = if change > 0.0 { "Positive" } else { "Negative" };

    Forecast {
        price_outlook: price_outlook.to_string(),
        timeframe: FORECAST_TIMEFRAME.to_string(),
        confidence_level: confidence_level.to_string(),
        factors: vec![
            format!("{direction} price trend ({change}% in last 12 months)"),
            format!("{} buyer demand", metrics.demand_level),
            format!("{} property supply", metrics.supply_level),
        ],
    }
}

/// Trend band of the mean 12-month change across property types.
pub fn overall_trend(market: &LocationMarket) -> &'static str {
    let count = market.property_types.len() as f64;
    let average = market.metrics().map(|m| m.price_change_12_months).sum::<f64>() / count;

    if average > 5.0 {
        "Strong Growth"
    } else if average > 2.0 {
        "Moderate Growth"
    } else if average > 0.0 {
        "Stable"
    } else {
        "Declining"
    }
}

/// First property type with the strictly highest rental yield.
pub fn most_profitable_type(market: &LocationMarket) -> String {
    let mut best_name = "";
    let mut best_yield = 0.0;

    for (name, metrics) in &market.property_types {
        if metrics.rent_yield > best_yield {
            best_yield = metrics.rent_yield;
            best_name = name;
        }
    }

    format!("{best_name} ({best_yield:.1}% yield)")
}

/// Qualitative recommendation from demand, supply and yield signals.
pub fn investment_recommendation(market: &LocationMarket) -> String {
    let high_demand = market.metrics().any(|m| m.demand_level == Level::High);
    let low_supply = market.metrics().any(|m| m.supply_level == Level::Low);
    let good_yield = market.metrics().any(|m| m.rent_yield > 5.0);
    let location = &market.location;

    if high_demand && low_supply {
        format!("{location} shows strong investment potential due to high demand and limited supply.")
    } else if good_yield {
        format!("{location} offers good rental yields, making it suitable for income-focused investors.")
    } else {
        format!("{location} presents a balanced market with moderate investment potential.")
    }
}

#[async_trait::async_trait]
impl ToolHandler for MarketInsightsTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<MarketInsightsParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    async fn execute(&self, params: &ParameterMap) -> Result<Value, ToolError> {
        simulate_io(self.settings, Self::LATENCY).await;

        let params: MarketInsightsParams = parse_params(params)?;
        info!(
            "Market insights for '{}' ({})",
            params.location,
            params.property_type.as_deref().unwrap_or("all types")
        );

        Ok(serde_json::to_value(self.insights(&params))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::InMemoryMarket;
    use serde_json::json;

    fn tool() -> MarketInsightsTool {
        MarketInsightsTool::new(Arc::new(InMemoryMarket::seeded()), ToolsConfig::default())
    }

    fn params(location: &str, property_type: Option<&str>) -> MarketInsightsParams {
        MarketInsightsParams {
            location: location.to_string(),
            property_type: property_type.map(str::to_string),
        }
    }

    fn metrics(change: f64, demand: Level, supply: Level) -> TypeMetrics {
        TypeMetrics {
            average_price: 1,
            price_per_sq_ft: 1,
            price_change_12_months: change,
            rent_yield: 4.0,
            average_days_on_market: 30,
            demand_level: demand,
            supply_level: supply,
            trending_amenities: vec![],
        }
    }

    fn market(types: Vec<(&str, TypeMetrics)>) -> LocationMarket {
        LocationMarket {
            location: "Testville".to_string(),
            overview: "Test".to_string(),
            property_types: types.into_iter().map(|(n, m)| (n.to_string(), m)).collect(),
        }
    }

    #[tokio::test]
    async fn test_unknown_location_is_soft_failure() {
        let args = json!({"location": "Atlantis"});
        let value = tool().execute(args.as_object().unwrap()).await.unwrap();
        assert_eq!(value["error"], "Location not found");
        assert_eq!(
            value["availableLocations"],
            json!(["Downtown Dubai", "Dubai Marina", "Arabian Ranches"])
        );
    }

    #[test]
    fn test_unknown_property_type_is_soft_failure() {
        let value =
            serde_json::to_value(tool().insights(&params("Dubai Marina", Some("Villa")))).unwrap();
        assert_eq!(value["error"], "Property type 'Villa' not found in Dubai Marina");
        assert_eq!(value["availableTypes"], json!(["apartment"]));
    }

    #[test]
    fn test_single_type_detail() {
        let value = serde_json::to_value(
            tool().insights(&params("downtown dubai", Some("Villa"))),
        )
        .unwrap();
        assert_eq!(value["location"], "Downtown Dubai");
        assert_eq!(value["propertyType"], "Villa");
        assert_eq!(value["marketData"]["rentYield"], 4.2);
        assert_eq!(value["forecast"]["priceOutlook"], "Strong Growth");
        assert_eq!(value["forecast"]["confidenceLevel"], "High");
        assert_eq!(value["forecast"]["timeframe"], "12-18 months");
        assert_eq!(
            value["forecast"]["factors"],
            json!([
                "Positive price trend (6.5% in last 12 months)",
                "High buyer demand",
                "Low property supply"
            ])
        );
    }

    #[test]
    fn test_summary() {
        let value = serde_json::to_value(tool().insights(&params("Downtown Dubai", None))).unwrap();
        assert_eq!(value["propertyTypes"], json!(["apartment", "villa"]));
        let summary = &value["marketSummary"];
        // (5.2 + 6.5) / 2 = 5.85
        assert_eq!(summary["overallTrend"], "Strong Growth");
        assert_eq!(summary["mostProfitableType"], "apartment (5.1% yield)");
        assert_eq!(
            summary["investmentRecommendation"],
            "Downtown Dubai shows strong investment potential due to high demand and limited supply."
        );
    }

    #[test]
    fn test_empty_property_type_means_summary() {
        let insights = tool().insights(&params("Dubai Marina", Some("")));
        assert!(matches!(insights, MarketInsights::Summary { .. }));
    }

    #[test]
    fn test_marina_recommendation_is_yield_driven() {
        let value = serde_json::to_value(tool().insights(&params("Dubai Marina", None))).unwrap();
        assert_eq!(value["marketSummary"]["overallTrend"], "Moderate Growth");
        assert_eq!(
            value["marketSummary"]["investmentRecommendation"],
            "Dubai Marina offers good rental yields, making it suitable for income-focused investors."
        );
    }

    #[test]
    fn test_forecast_rules() {
        let outlook = |m: TypeMetrics| forecast(&m).price_outlook;
        assert_eq!(outlook(metrics(5.5, Level::High, Level::Low)), "Strong Growth");
        assert_eq!(outlook(metrics(5.5, Level::High, Level::High)), "Moderate Growth");
        assert_eq!(outlook(metrics(4.0, Level::Moderate, Level::High)), "Moderate Growth");
        assert_eq!(outlook(metrics(4.0, Level::Low, Level::Low)), "Stable");
        assert_eq!(outlook(metrics(-1.0, Level::High, Level::Low)), "Potential Decline");
        assert_eq!(outlook(metrics(2.0, Level::High, Level::Low)), "Stable");

        let declining = forecast(&metrics(-1.5, Level::Low, Level::High));
        assert_eq!(declining.factors[0], "Negative price trend (-1.5% in last 12 months)");
    }

    #[test]
    fn test_trend_bands() {
        let trend = |change: f64| overall_trend(&market(vec![("a", metrics(change, Level::Low, Level::Low))]));
        assert_eq!(trend(5.1), "Strong Growth");
        assert_eq!(trend(5.0), "Moderate Growth");
        assert_eq!(trend(2.0), "Stable");
        assert_eq!(trend(0.0), "Declining");
    }

    #[test]
    fn test_most_profitable_first_wins_ties() {
        let mut a = metrics(1.0, Level::Low, Level::Low);
        a.rent_yield = 6.0;
        let b = a.clone();
        assert_eq!(
            most_profitable_type(&market(vec![("first", a), ("second", b)])),
            "first (6.0% yield)"
        );
    }

    #[test]
    fn test_balanced_recommendation() {
        let m = market(vec![("a", metrics(1.0, Level::Moderate, Level::High))]);
        assert_eq!(
            investment_recommendation(&m),
            "Testville presents a balanced market with moderate investment potential."
        );
    }
}
