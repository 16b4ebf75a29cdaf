use scraper::{Html, Selector};
use serde_json::Value;

use crate::models::{Fields, PRICE_FIELD};
use crate::plugins::traits::Extractor;
use crate::utils::error::{AppError, Result};

/// Reads the visible price tag of a product page by CSS class.
///
/// The text is returned verbatim as `price` (e.g. `"799,00 €"`), without
/// numeric coercion. Price tags are usually client-rendered, so this extractor
/// is meant to run behind the browser fetcher.
pub struct PriceTagExtractor {
    name: String,
    class_name: String,
}

impl PriceTagExtractor {
    pub const OTTO_NAME: &'static str = "otto-price-tag";
    pub const OTTO_PRICE_CLASS: &'static str = "js_pdp_price__retail-price__value";

    pub fn new(name: &str, class_name: &str) -> Self {
        PriceTagExtractor {
            name: name.to_string(),
            class_name: class_name.to_string(),
        }
    }

    pub fn otto() -> Self {
        Self::new(Self::OTTO_NAME, Self::OTTO_PRICE_CLASS)
    }

    fn selector(&self) -> String {
        format!(".{}", self.class_name)
    }
}

impl Extractor for PriceTagExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Visible price tag text, located by CSS class"
    }

    fn wait_selector(&self) -> Option<String> {
        Some(self.selector())
    }

    fn extract(&self, content: &str) -> Result<Vec<Fields>> {
        let selector_str = self.selector();
        let selector = Selector::parse(&selector_str)
            .map_err(|e| AppError::parse(format!("Invalid CSS selector '{}': {:?}", selector_str, e)))?;

        let document = Html::parse_document(content);
        let element = document
            .select(&selector)
            .next()
            .ok_or(AppError::NotFound {
                selector: selector_str,
            })?;

        // Markup indentation is not part of the price
        let text = element.text().collect::<String>();
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let mut row = Fields::new();
        row.insert(PRICE_FIELD.to_string(), Value::String(text));
        Ok(vec![row])
    }
}
