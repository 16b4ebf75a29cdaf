use crate::models::Fields;
use crate::utils::error::Result;

/// Trait for implementing per-retailer extractors.
///
/// An extractor is a pure transformation from raw page content (server HTML or
/// a rendered DOM) to normalized rows, one per product variant. It never
/// fetches anything itself, so the same extractor works behind any fetcher.
pub trait Extractor: Send + Sync {
    /// Plugin metadata
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// CSS selector a browser fetcher should wait for before handing over the DOM.
    fn wait_selector(&self) -> Option<String> {
        None
    }

    /// Locate the embedded payload in `content` and turn it into rows.
    ///
    /// Fails with `NotFound` when the payload element is missing and with
    /// `Parse` when it is present but malformed. Rows without a price are
    /// already dropped.
    fn extract(&self, content: &str) -> Result<Vec<Fields>>;
}
