use scraper::{Html, Selector};

use super::payload;
use crate::models::Fields;
use crate::plugins::traits::Extractor;
use crate::utils::error::{AppError, Result};

/// Reads the variant tracking payload that otto.de embeds in product pages.
///
/// The payload is a JSON document inside the element with id
/// [`OttoExtractor::DEFAULT_PAYLOAD_ID`]; it is present in the server response,
/// so a plain HTTP fetch is enough.
pub struct OttoExtractor {
    payload_id: String,
}

impl Default for OttoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl OttoExtractor {
    pub const NAME: &'static str = "otto";
    pub const DEFAULT_PAYLOAD_ID: &'static str = "variationTracking";

    pub fn new() -> Self {
        Self::with_payload_id(Self::DEFAULT_PAYLOAD_ID)
    }

    pub fn with_payload_id(payload_id: &str) -> Self {
        OttoExtractor {
            payload_id: payload_id.to_string(),
        }
    }

    fn payload_selector(&self) -> String {
        format!("[id=\"{}\"]", self.payload_id)
    }

    fn payload_text(&self, content: &str) -> Result<String> {
        let selector_str = self.payload_selector();
        let selector = Selector::parse(&selector_str)
            .map_err(|e| AppError::parse(format!("Invalid CSS selector '{}': {:?}", selector_str, e)))?;

        let document = Html::parse_document(content);
        let element = document
            .select(&selector)
            .next()
            .ok_or(AppError::NotFound {
                selector: selector_str,
            })?;

        Ok(element.text().collect::<String>())
    }
}

impl Extractor for OttoExtractor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Variant prices, availability and stock from the otto.de tracking payload"
    }

    fn wait_selector(&self) -> Option<String> {
        Some(self.payload_selector())
    }

    fn extract(&self, content: &str) -> Result<Vec<Fields>> {
        let text = self.payload_text(content)?;
        let payload = payload::parse_payload(&text)?;
        payload::normalize_variants(&payload)
    }
}
