//! Property analysis tool definition.
//!
//! Compares one property against its area's market profile and derives
//! value, investment and liquidity insights.

use std::sync::Arc;
use std::time::Duration;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::core::config::ToolsConfig;
use crate::domains::catalog::{
    Level, MarketComparison, MarketRepository, PropertyRecord, PropertyRepository,
};
use crate::domains::tools::ToolError;
use crate::domains::tools::handlers::{
    ParameterDescriptor, ParameterMap, ParameterType, ToolDescriptor, ToolHandler, parse_params,
    simulate_io,
};

/// Construction year before which maintenance costs are flagged.
const MODERN_CONSTRUCTION_YEAR: u16 = 2010;

/// Parameters for the property analysis tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAnalysisParams {
    /// ID of the property to analyze.
    pub property_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInsights {
    pub price_comparison: String,
    pub price_per_sq_ft: u32,
    pub value_assessment: String,
    pub investment_potential: String,
    pub liquidity_assessment: String,
}

/// Full analysis payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAnalysis {
    pub property: PropertyRecord,
    pub market_data: MarketComparison,
    pub insights: AnalysisInsights,
    pub recommendations: Vec<String>,
}

/// Property analysis tool.
pub struct PropertyAnalysisTool {
    descriptor: ToolDescriptor,
    properties: Arc<dyn PropertyRepository>,
    market: Arc<dyn MarketRepository>,
    settings: ToolsConfig,
}

impl PropertyAnalysisTool {
    /// Tool name as registered.
    pub const NAME: &'static str = "propertyAnalysis";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Analyze a property and provide insights";

    const LATENCY: Duration = Duration::from_millis(800);

    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        market: Arc<dyn MarketRepository>,
        settings: ToolsConfig,
    ) -> Self {
        let descriptor = ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            vec![ParameterDescriptor::required(
                "propertyId",
                "ID of the property to analyze",
                ParameterType::String,
            )],
        );

        Self {
            descriptor,
            properties,
            market,
            settings,
        }
    }

    /// Analyze the property with the given id.
    pub fn analyze_by_id(&self, property_id: &str) -> Result<PropertyAnalysis, ToolError> {
        let mut property = self
            .properties
            .lookup_by_id(property_id)
            .ok_or_else(|| ToolError::PropertyNotFound(property_id.to_string()))?;

        // Media links belong to proposals only.
        property.images.clear();

        let market = self.market.comparison_for(&property.location);
        Ok(analyze(property, market))
    }
}

/// Derive insights and recommendations from a property and its market.
pub fn analyze(property: PropertyRecord, market_data: MarketComparison) -> PropertyAnalysis {
    let price_per_sq_ft = f64::from(property.price_per_sq_ft);
    let market_average = f64::from(market_data.average_price_per_sq_ft);
    let undervalued = price_per_sq_ft < market_average * 0.9;
    let overvalued = price_per_sq_ft > market_average * 1.1;

    let insights = AnalysisInsights {
        price_comparison: if price_per_sq_ft < market_average {
            "Below market average"
        } else {
            "Above market average"
        }
        .to_string(),
        price_per_sq_ft: property.price_per_sq_ft,
        value_assessment: if undervalued {
            "Potentially undervalued"
        } else if overvalued {
            "Potentially overvalued"
        } else {
            "Fairly priced"
        }
        .to_string(),
        investment_potential: if market_data.price_change_12_months > 5.0 {
            "High"
        } else {
            "Moderate"
        }
        .to_string(),
        liquidity_assessment: if market_data.average_days_on_market < 50 {
            "High"
        } else {
            "Moderate"
        }
        .to_string(),
    };

    let recommendations = vec![
        if undervalued {
            "Consider making an offer soon as the property appears to be priced below market value."
        } else {
            "Property is priced in line with market values for the area."
        }
        .to_string(),
        if market_data.demand_level == Level::High {
            "High demand area with strong resale potential."
        } else {
            "Moderate demand area with stable resale potential."
        }
        .to_string(),
        if property.year_built < MODERN_CONSTRUCTION_YEAR {
            "Consider budgeting for potential maintenance costs due to the age of the property."
        } else {
            "Newer construction should have minimal maintenance requirements."
        }
        .to_string(),
    ];

    PropertyAnalysis {
        property,
        market_data,
        insights,
        recommendations,
    }
}

#[async_trait::async_trait]
impl ToolHandler for PropertyAnalysisTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<PropertyAnalysisParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    async fn execute(&self, params: &ParameterMap) -> Result<Value, ToolError> {
        simulate_io(self.settings, Self::LATENCY).await;

        let params: PropertyAnalysisParams = parse_params(params)?;
        info!("Analyzing property {}", params.property_id);

        let analysis = self.analyze_by_id(&params.property_id).inspect_err(|e| {
            warn!("Property analysis failed: {}", e);
        })?;

        Ok(serde_json::to_value(analysis)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::{InMemoryMarket, InMemoryProperties};
    use serde_json::json;

    fn tool() -> PropertyAnalysisTool {
        PropertyAnalysisTool::new(
            Arc::new(InMemoryProperties::seeded()),
            Arc::new(InMemoryMarket::seeded()),
            ToolsConfig::default(),
        )
    }

    fn record_with(price_per_sq_ft: u32, year_built: u16) -> PropertyRecord {
        let mut record = InMemoryProperties::seeded().lookup_by_id("prop-001").unwrap();
        record.price_per_sq_ft = price_per_sq_ft;
        record.year_built = year_built;
        record
    }

    fn downtown() -> MarketComparison {
        InMemoryMarket::seeded().comparison_for("Downtown Dubai")
    }

    #[test]
    fn test_prop_001_analysis() {
        let analysis = tool().analyze_by_id("prop-001").unwrap();
        assert_eq!(analysis.market_data.average_price_per_sq_ft, 2200);
        assert_eq!(
            analysis.insights,
            AnalysisInsights {
                price_comparison: "Below market average".to_string(),
                price_per_sq_ft: 2083,
                value_assessment: "Fairly priced".to_string(),
                investment_potential: "High".to_string(),
                liquidity_assessment: "High".to_string(),
            }
        );
        assert_eq!(
            analysis.recommendations,
            vec![
                "Property is priced in line with market values for the area.",
                "High demand area with strong resale potential.",
                "Newer construction should have minimal maintenance requirements.",
            ]
        );
    }

    #[test]
    fn test_prop_002_uses_secondary_profile() {
        let analysis = tool().analyze_by_id("prop-002").unwrap();
        assert_eq!(analysis.market_data.average_price_per_sq_ft, 1650);
        assert_eq!(analysis.insights.investment_potential, "Moderate");
        assert_eq!(analysis.insights.liquidity_assessment, "Moderate");
        assert_eq!(
            analysis.recommendations[1],
            "Moderate demand area with stable resale potential."
        );
    }

    #[test]
    fn test_value_bands() {
        // 90% of 2200 is 1980, 110% is 2420.
        let cases = [
            (1979, "Potentially undervalued"),
            (1980, "Fairly priced"),
            (2420, "Fairly priced"),
            (2421, "Potentially overvalued"),
        ];
        for (pps, expected) in cases {
            let analysis = analyze(record_with(pps, 2018), downtown());
            assert_eq!(analysis.insights.value_assessment, expected, "pps {pps}");
        }
    }

    #[test]
    fn test_undervalued_and_old_recommendations() {
        let analysis = analyze(record_with(1500, 2009), downtown());
        assert!(analysis.recommendations[0].starts_with("Consider making an offer"));
        assert!(analysis.recommendations[2].contains("maintenance costs"));

        let analysis = analyze(record_with(1500, 2010), downtown());
        assert!(analysis.recommendations[2].starts_with("Newer construction"));
    }

    #[test]
    fn test_price_comparison_at_average_is_above() {
        let analysis = analyze(record_with(2200, 2018), downtown());
        assert_eq!(analysis.insights.price_comparison, "Above market average");
    }

    #[tokio::test]
    async fn test_execute_payload_shape() {
        let args = json!({"propertyId": "prop-001"});
        let value = tool().execute(args.as_object().unwrap()).await.unwrap();
        assert_eq!(value["property"]["id"], "prop-001");
        assert!(value["property"].get("images").is_none());
        assert_eq!(value["marketData"]["demandLevel"], "High");
        assert_eq!(value["insights"]["valueAssessment"], "Fairly priced");
        assert_eq!(value["recommendations"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_property_fails_with_id() {
        let args = json!({"propertyId": "prop-999"});
        let err = tool().execute(args.as_object().unwrap()).await.unwrap_err();
        assert!(matches!(err, ToolError::PropertyNotFound(_)));
        assert!(err.to_string().contains("prop-999"));
    }
}
