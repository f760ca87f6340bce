//! Tool Registry - central registration and lookup for all tools.
//!
//! The registry owns the tool set. Tools are kept in registration order,
//! which is also the order of every listing.

use std::sync::Arc;

use tracing::debug;

use super::definitions::{
    MarketInsightsTool, PropertyAnalysisTool, PropertySearchTool, ProposalGeneratorTool,
    TranslationTool,
};
use super::{ToolDescriptor, ToolError, ToolHandler};
use crate::core::config::ToolsConfig;
use crate::domains::catalog::Catalog;

// ============================================================================
// Tool Registry
// ============================================================================

/// Ordered set of tools with unique names.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the five built-in tools.
    pub fn with_default_tools(catalog: &Catalog, settings: ToolsConfig) -> Result<Self, ToolError> {
        let mut registry = Self::new();
        registry.register(Arc::new(PropertySearchTool::new(
            catalog.properties.clone(),
            settings,
        )))?;
        registry.register(Arc::new(PropertyAnalysisTool::new(
            catalog.properties.clone(),
            catalog.market.clone(),
            settings,
        )))?;
        registry.register(Arc::new(MarketInsightsTool::new(
            catalog.market.clone(),
            settings,
        )))?;
        registry.register(Arc::new(ProposalGeneratorTool::new(
            catalog.properties.clone(),
            catalog.market.clone(),
            settings,
        )))?;
        registry.register(Arc::new(TranslationTool::new(
            catalog.phrases.clone(),
            settings,
        )))?;
        Ok(registry)
    }

    /// Add a tool. Names must be unique.
    pub fn register(&mut self, tool: Arc<dyn ToolHandler>) -> Result<(), ToolError> {
        if self.tools.iter().any(|t| t.name() == tool.name()) {
            return Err(ToolError::DuplicateName(tool.name().to_string()));
        }
        debug!("Registered tool '{}'", tool.name());
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by exact, case-sensitive name.
    pub fn find(&self, name: &str) -> Result<Arc<dyn ToolHandler>, ToolError> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .ok_or_else(|| ToolError::not_found(name))
    }

    /// Public descriptors, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor().clone()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ToolHandler>> {
        self.tools.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ToolRegistry {
        ToolRegistry::with_default_tools(&Catalog::in_memory(), ToolsConfig::default()).unwrap()
    }

    #[test]
    fn test_default_tools_in_order() {
        let registry = registry();
        assert_eq!(registry.len(), 5);
        assert_eq!(
            registry.names(),
            vec![
                "propertySearch",
                "propertyAnalysis",
                "marketInsights",
                "proposalGenerator",
                "translation"
            ]
        );
    }

    #[test]
    fn test_find_is_case_sensitive() {
        let registry = registry();
        assert_eq!(registry.find("translation").unwrap().name(), "translation");
        let err = registry.find("Translation").err().unwrap();
        assert!(matches!(err, ToolError::NotFound(ref n) if n == "Translation"));
        assert_eq!(err.to_string(), "Tool 'Translation' not found");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let catalog = Catalog::in_memory();
        let mut registry = registry();
        let again = Arc::new(TranslationTool::new(
            catalog.phrases.clone(),
            ToolsConfig::default(),
        ));
        let err = registry.register(again).unwrap_err();
        assert!(matches!(err, ToolError::DuplicateName(_)));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_descriptors_are_public_metadata() {
        let descriptors = registry().descriptors();
        let proposal = &descriptors[3];
        assert_eq!(proposal.name, "proposalGenerator");
        assert_eq!(proposal.required_names(), vec!["propertyId", "clientName"]);
        assert_eq!(proposal.parameters.len(), 4);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.descriptors().is_empty());
    }
}
