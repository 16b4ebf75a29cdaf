use std::collections::HashMap;
use std::sync::Arc;

use super::extractors::{OttoExtractor, PriceTagExtractor};
use super::traits::Extractor;
use crate::utils::error::AppError;

pub type ExtractorHandle = Arc<dyn Extractor>;

/// Extractors by name, as referenced from `[[targets]]` in the configuration.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, ExtractorHandle>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry with every built-in retailer extractor.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(OttoExtractor::new()));
        registry.register(Arc::new(PriceTagExtractor::otto()));
        registry
    }

    /// Register an extractor, replacing any previous one with the same name
    pub fn register(&mut self, extractor: ExtractorHandle) {
        let name = extractor.name().to_string();
        tracing::debug!(
            extractor = %name,
            description = %extractor.description(),
            "Registered extractor"
        );
        self.extractors.insert(name, extractor);
    }

    pub fn get(&self, name: &str) -> Result<ExtractorHandle, AppError> {
        self.extractors
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::UnknownExtractor(name.to_string()))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.extractors.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
