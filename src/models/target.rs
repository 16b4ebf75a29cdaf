use serde::{Deserialize, Serialize};

use crate::models::FetchStrategy;

/// A monitored product page and the extractor registered for its retailer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchTarget {
    pub url: String,
    pub description: String,
    /// Registry name of the extractor, e.g. `"otto"`.
    pub extractor: String,
    #[serde(default)]
    pub fetcher: FetchStrategy,
}

impl WatchTarget {
    pub fn new(
        url: impl Into<String>,
        description: impl Into<String>,
        extractor: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            description: description.into(),
            extractor: extractor.into(),
            fetcher: FetchStrategy::Http,
        }
    }

    pub fn with_fetcher(mut self, fetcher: FetchStrategy) -> Self {
        self.fetcher = fetcher;
        self
    }
}
