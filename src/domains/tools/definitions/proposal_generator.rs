//! Proposal generator tool definition.
//!
//! Produces a client-facing proposal for one property: templated prose in
//! English, Arabic or French, a mortgage and fees breakdown, and a fixed
//! list of next steps. Unsupported languages fall back to English text while
//! the metadata keeps the code that was requested.

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::core::config::ToolsConfig;
use crate::domains::catalog::{MarketComparison, MarketRepository, PropertyRecord, PropertyRepository};
use crate::domains::tools::ToolError;
use crate::domains::tools::handlers::{
    ParameterDescriptor, ParameterMap, ParameterType, ToolDescriptor, ToolHandler, parse_params,
    simulate_io,
};

const DOWN_PAYMENT_RATIO: f64 = 0.2;
const ANNUAL_RATE_PERCENT: f64 = 3.5;
const LOAN_TERM_YEARS: u32 = 25;
const REGISTRATION_FEE_RATIO: f64 = 0.04;
const AGENCY_FEE_RATIO: f64 = 0.02;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the proposal generator tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalParams {
    /// ID of the property to include in the proposal.
    pub property_id: String,

    /// Name of the client.
    pub client_name: String,

    /// Client preferences and requirements.
    pub client_preferences: Option<Value>,

    /// Language for the proposal (en, ar, fr).
    pub language: Option<String>,
}

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalMetadata {
    pub generated_at: String,
    pub property_id: String,
    pub client_name: String,
    pub language: String,
}

/// Prose sections of a proposal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalContent {
    pub introduction: String,
    pub property_description: String,
    pub amenities_description: String,
    /// Empty when no preferences were given.
    pub personalization: String,
    pub conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Financing {
    pub down_payment: f64,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub loan_term_years: u32,
    pub monthly_payment: f64,
    pub total_interest_paid: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalCosts {
    pub registration_fee: f64,
    pub agency_fee: f64,
    pub total_initial_costs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    pub purchase_price: u64,
    pub financing: Financing,
    pub additional_costs: AdditionalCosts,
    pub estimated_rental_yield: f64,
    pub projected_appreciation: f64,
}

/// Complete proposal payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub metadata: ProposalMetadata,
    pub property: PropertyRecord,
    pub proposal: ProposalContent,
    pub financials: Financials,
    pub next_steps: Vec<String>,
}

// ============================================================================
// Languages
// ============================================================================

/// Languages with proposal templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalLanguage {
    English,
    Arabic,
    French,
}

impl ProposalLanguage {
    /// Template language for a requested code; unknown codes use English.
    pub fn from_code(code: &str) -> Self {
        match code {
            "ar" => Self::Arabic,
            "fr" => Self::French,
            _ => Self::English,
        }
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Proposal generator tool.
pub struct ProposalGeneratorTool {
    descriptor: ToolDescriptor,
    properties: Arc<dyn PropertyRepository>,
    market: Arc<dyn MarketRepository>,
    settings: ToolsConfig,
}

impl ProposalGeneratorTool {
    /// Tool name as registered.
    pub const NAME: &'static str = "proposalGenerator";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Generate a property proposal for a client";

    const LATENCY: Duration = Duration::from_millis(1200);

    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        market: Arc<dyn MarketRepository>,
        settings: ToolsConfig,
    ) -> Self {
        let descriptor = ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            vec![
                ParameterDescriptor::required(
                    "propertyId",
                    "ID of the property to include in the proposal",
                    ParameterType::String,
                ),
                ParameterDescriptor::required("clientName", "Name of the client", ParameterType::String),
                ParameterDescriptor::optional(
                    "clientPreferences",
                    "Client preferences and requirements",
                    ParameterType::Object,
                ),
                ParameterDescriptor::optional(
                    "language",
                    "Language for the proposal (en, ar, fr)",
                    ParameterType::String,
                ),
            ],
        );

        Self {
            descriptor,
            properties,
            market,
            settings,
        }
    }

    /// Build the proposal described by `params`.
    pub fn generate(&self, params: &ProposalParams) -> Result<Proposal, ToolError> {
        let property = self
            .properties
            .lookup_by_id(&params.property_id)
            .ok_or_else(|| ToolError::PropertyNotFound(params.property_id.clone()))?;

        let language = params
            .language
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "en".to_string());
        let template = ProposalLanguage::from_code(&language);
        let preference_keys = preference_keys(params.client_preferences.as_ref());
        let market = self.market.comparison_for(&property.location);

        Ok(Proposal {
            metadata: ProposalMetadata {
                generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                property_id: property.id.clone(),
                client_name: params.client_name.clone(),
                language,
            },
            proposal: proposal_content(&property, &params.client_name, &preference_keys, template),
            financials: financials(property.price, &market),
            next_steps: next_steps(template),
            property,
        })
    }
}

#[async_trait::async_trait]
impl ToolHandler for ProposalGeneratorTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<ProposalParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    async fn execute(&self, params: &ParameterMap) -> Result<Value, ToolError> {
        simulate_io(self.settings, Self::LATENCY).await;

        let params: ProposalParams = parse_params(params)?;
        info!(
            "Generating proposal for {} on property {}",
            params.client_name, params.property_id
        );

        let proposal = self.generate(&params).inspect_err(|e| {
            warn!("Proposal generation failed: {}", e);
        })?;

        Ok(serde_json::to_value(proposal)?)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Keys of an object-valued preferences parameter, in insertion order.
fn preference_keys(preferences: Option<&Value>) -> Vec<String> {
    match preferences {
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

/// Render the templated prose sections.
pub fn proposal_content(
    property: &PropertyRecord,
    client_name: &str,
    preference_keys: &[String],
    language: ProposalLanguage,
) -> ProposalContent {
    let PropertyRecord {
        title,
        location,
        property_type,
        bedrooms,
        bathrooms,
        area,
        ..
    } = property;
    let amenities = property.amenities.join(", ");
    let price = group_thousands(property.price);
    let preferences = preference_keys.join(", ");

    let (introduction, property_description, amenities_description, personalization, conclusion) =
        match language {
            ProposalLanguage::English => (
                format!(
                    "Dear {client_name},\n\nI am pleased to present this exclusive property proposal for the {title}. Based on your preferences and requirements, I believe this property represents an excellent opportunity that aligns with your real estate goals."
                ),
                format!(
                    "This exceptional {property_type} is located in the prestigious {location} area. Featuring {bedrooms} bedrooms and {bathrooms} bathrooms across {area} square feet of living space, this property offers the perfect blend of luxury and comfort."
                ),
                format!(
                    "The property boasts an impressive array of amenities, including {amenities}, ensuring a luxurious and convenient lifestyle."
                ),
                format!(
                    "This property specifically addresses your preferences for {preferences}, making it an ideal match for your requirements."
                ),
                format!(
                    "I believe this property represents excellent value at AED {price} and would be delighted to arrange a viewing at your convenience."
                ),
            ),
            ProposalLanguage::Arabic => (
                format!(
                    "عزيزي {client_name}،\n\nيسعدني أن أقدم لك هذا العرض الحصري للعقار {title}. بناءً على تفضيلاتك ومتطلباتك، أعتقد أن هذا العقار يمثل فرصة ممتازة تتماشى مع أهدافك العقارية."
                ),
                format!(
                    "يقع هذا {property_type} الاستثنائي في منطقة {location} المرموقة. يضم {bedrooms} غرف نوم و {bathrooms} حمامات على مساحة {area} قدم مربع من المساحة المعيشية، ويوفر هذا العقار مزيجًا مثاليًا من الفخامة والراحة."
                ),
                format!(
                    "يتميز العقار بمجموعة مثيرة للإعجاب من وسائل الراحة، بما في ذلك {amenities}، مما يضمن أسلوب حياة فاخر ومريح."
                ),
                format!(
                    "يلبي هذا العقار على وجه التحديد تفضيلاتك لـ {preferences}، مما يجعله مناسبًا مثاليًا لمتطلباتك."
                ),
                format!(
                    "أعتقد أن هذا العقار يمثل قيمة ممتازة بسعر {price} درهم إماراتي وسأكون سعيدًا بترتيب جلسة عرض في الوقت المناسب لك."
                ),
            ),
            ProposalLanguage::French => (
                format!(
                    "Cher/Chère {client_name},\n\nJ'ai le plaisir de vous présenter cette proposition exclusive pour la propriété {title}. Selon vos préférences et exigences, je crois que cette propriété représente une excellente opportunité qui s'aligne avec vos objectifs immobiliers."
                ),
                format!(
                    "Cette {property_type} exceptionnelle est située dans le prestigieux quartier de {location}. Avec {bedrooms} chambres et {bathrooms} salles de bains réparties sur {area} pieds carrés d'espace de vie, cette propriété offre le mélange parfait de luxe et de confort."
                ),
                format!(
                    "La propriété dispose d'un impressionnant éventail d'équipements, notamment {amenities}, garantissant un style de vie luxueux et pratique."
                ),
                format!(
                    "Cette propriété répond spécifiquement à vos préférences pour {preferences}, ce qui en fait une correspondance idéale pour vos exigences."
                ),
                format!(
                    "Je crois que cette propriété représente une excellente valeur à AED {price} et je serais ravi d'organiser une visite à votre convenance."
                ),
            ),
        };

    ProposalContent {
        introduction,
        property_description,
        amenities_description,
        personalization: if preference_keys.is_empty() {
            String::new()
        } else {
            personalization
        },
        conclusion,
    }
}

/// Mortgage and transaction cost breakdown for a purchase price.
///
/// Standard annuity payment over monthly periods:
/// `M = L * r / (1 - (1 + r)^-n)` with `r` the monthly rate.
pub fn financials(price: u64, market: &MarketComparison) -> Financials {
    let purchase = price as f64;
    let down_payment = purchase * DOWN_PAYMENT_RATIO;
    let loan_amount = purchase - down_payment;

    let monthly_rate = ANNUAL_RATE_PERCENT / 100.0 / 12.0;
    let payments = LOAN_TERM_YEARS * 12;
    let monthly_payment =
        loan_amount * monthly_rate / (1.0 - (1.0 + monthly_rate).powi(-(payments as i32)));

    let registration_fee = purchase * REGISTRATION_FEE_RATIO;
    let agency_fee = purchase * AGENCY_FEE_RATIO;

    Financials {
        purchase_price: price,
        financing: Financing {
            down_payment,
            loan_amount,
            interest_rate: ANNUAL_RATE_PERCENT,
            loan_term_years: LOAN_TERM_YEARS,
            monthly_payment,
            total_interest_paid: monthly_payment * f64::from(payments) - loan_amount,
        },
        additional_costs: AdditionalCosts {
            registration_fee,
            agency_fee,
            total_initial_costs: down_payment + registration_fee + agency_fee,
        },
        estimated_rental_yield: market.rental_yield,
        projected_appreciation: market.price_change_12_months,
    }
}

pub fn next_steps(language: ProposalLanguage) -> Vec<String> {
    let steps: [&str; 5] = match language {
        ProposalLanguage::English => [
            "Schedule a property viewing",
            "Discuss financing options",
            "Review and finalize offer",
            "Complete property inspection",
            "Prepare purchase documentation",
        ],
        ProposalLanguage::Arabic => [
            "جدولة معاينة العقار",
            "مناقشة خيارات التمويل",
            "مراجعة وإنهاء العرض",
            "إكمال فحص العقار",
            "إعداد وثائق الشراء",
        ],
        ProposalLanguage::French => [
            "Planifier une visite de la propriété",
            "Discuter des options de financement",
            "Examiner et finaliser l'offre",
            "Effectuer l'inspection de la propriété",
            "Préparer la documentation d'achat",
        ],
    };
    steps.iter().map(|s| s.to_string()).collect()
}

/// `2500000` → `2,500,000`.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

// ============================================================================
// Tests
// ============================================================================
