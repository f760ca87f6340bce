//! Translation tool definition.
//!
//! Exact-match lookup in the phrase book. Anything else gets the target
//! language's placeholder and an explanatory note.

use std::sync::Arc;
use std::time::Duration;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::core::config::ToolsConfig;
use crate::domains::catalog::PhraseBook;
use crate::domains::tools::ToolError;
use crate::domains::tools::handlers::{
    ParameterDescriptor, ParameterMap, ParameterType, ToolDescriptor, ToolHandler, parse_params,
    simulate_io,
};

const UNAVAILABLE: &str = "Translation not available";
const PLACEHOLDER_NOTE: &str = "This is a placeholder translation. In a production environment, this would use a proper translation service.";

/// Parameters for the translation tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslationParams {
    /// Text to translate.
    pub text: String,

    /// Source language code (en, ar, fr). Accepted but unused.
    pub source_language: Option<String>,

    /// Target language code (en, ar, fr).
    pub target_language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub original_text: String,
    pub translated_text: String,
    pub target_language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

pub struct TranslationTool {
    descriptor: ToolDescriptor,
    phrases: Arc<dyn PhraseBook>,
    settings: ToolsConfig,
}

impl TranslationTool {
    /// Tool name as registered.
    pub const NAME: &'static str = "translation";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Translate text between English, Arabic, and French";

    const LATENCY: Duration = Duration::from_millis(500);

    pub fn new(phrases: Arc<dyn PhraseBook>, settings: ToolsConfig) -> Self {
        let descriptor = ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            vec![
                ParameterDescriptor::required("text", "Text to translate", ParameterType::String),
                ParameterDescriptor::optional(
                    "sourceLanguage",
                    "Source language code (en, ar, fr)",
                    ParameterType::String,
                ),
                ParameterDescriptor::required(
                    "targetLanguage",
                    "Target language code (en, ar, fr)",
                    ParameterType::String,
                ),
            ],
        );

        Self {
            descriptor,
            phrases,
            settings,
        }
    }

    pub fn translate(&self, text: &str, target_language: &str) -> TranslationResult {
        let (translated_text, note) = match self.phrases.translate(text, target_language) {
            Some(translated) => (translated, None),
            None => (
                self.phrases
                    .placeholder(target_language)
                    .unwrap_or_else(|| UNAVAILABLE.to_string()),
                Some(PLACEHOLDER_NOTE.to_string()),
            ),
        };

        TranslationResult {
            original_text: text.to_string(),
            translated_text,
            target_language: target_language.to_string(),
            note,
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for TranslationTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<TranslationParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    async fn execute(&self, params: &ParameterMap) -> Result<Value, ToolError> {
        simulate_io(self.settings, Self::LATENCY).await;

        let params: TranslationParams = parse_params(params)?;
        debug!(
            "Translating {} chars into '{}'",
            params.text.chars().count(),
            params.target_language
        );

        Ok(serde_json::to_value(
            self.translate(&params.text, &params.target_language),
        )?)
    }
}
