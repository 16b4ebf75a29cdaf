use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::fetcher::{FetchRequest, Fetcher};
use crate::models::{has_price, PriceRecord, WatchTarget};
use crate::plugins::traits::Extractor;
use crate::utils::error::{AppError, Result};

/// Binds one watch target to its extractor and the fetcher that loads it.
pub struct Watcher {
    target: WatchTarget,
    extractor: Arc<dyn Extractor>,
    fetcher: Arc<dyn Fetcher>,
}

impl Watcher {
    pub fn new(target: WatchTarget, extractor: Arc<dyn Extractor>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            target,
            extractor,
            fetcher,
        }
    }

    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    pub fn description(&self) -> &str {
        &self.target.description
    }

    /// Fetch the page, extract its rows and stamp them with this target and
    /// the run timestamp.
    ///
    /// Never returns an empty list: a page without any priced row is a
    /// `NoPrices` error. Every error is wrapped with the target description.
    pub async fn observe(&self, run_timestamp: NaiveDateTime) -> Result<Vec<PriceRecord>> {
        self.observe_target(run_timestamp)
            .await
            .map_err(|e| AppError::watcher(&self.target.description, e))
    }

    async fn observe_target(&self, run_timestamp: NaiveDateTime) -> Result<Vec<PriceRecord>> {
        let request = FetchRequest::new(&self.target.url).wait_for(self.extractor.wait_selector());
        let content = self.fetcher.fetch(&request).await?;

        let records: Vec<PriceRecord> = self
            .extractor
            .extract(&content)?
            .into_iter()
            .filter(has_price)
            .map(|fields| PriceRecord::new(&self.target, run_timestamp, fields))
            .collect();

        if records.is_empty() {
            return Err(AppError::NoPrices {
                url: self.target.url.clone(),
            });
        }

        tracing::debug!(
            description = %self.target.description,
            extractor = self.extractor.name(),
            rows = records.len(),
            "Observed target"
        );
        Ok(records)
    }
}
