//! Tool definitions module.
//!
//! Each tool lives in its own file and implements [`ToolHandler`].
//!
//! [`ToolHandler`]: super::ToolHandler

pub mod market_insights;
pub mod property_analysis;
pub mod property_search;
pub mod proposal_generator;
pub mod translation;

pub use market_insights::{MarketInsightsParams, MarketInsightsTool};
pub use property_analysis::{PropertyAnalysisParams, PropertyAnalysisTool};
pub use property_search::{PropertySearchParams, PropertySearchTool};
pub use proposal_generator::{ProposalGeneratorTool, ProposalParams};
pub use translation::{TranslationParams, TranslationTool};
