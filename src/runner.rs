use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, OutputConfig};
use crate::fetcher::{BrowserFetcher, Fetcher, HttpFetcher, UnavailableFetcher};
use crate::models::{FetchStrategy, RunOutput};
use crate::output;
use crate::plugins::ExtractorRegistry;
use crate::utils::error::Result;
use crate::watcher::Watcher;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatcherFailure {
    pub description: String,
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_timestamp: NaiveDateTime,
    pub output_path: PathBuf,
    pub records_written: usize,
    pub watchers_succeeded: usize,
    pub failures: Vec<WatcherFailure>,
}

/// Runs every watcher once, in order, and writes a single output file.
pub struct RunDriver {
    watchers: Vec<Watcher>,
    output: OutputConfig,
    request_delay: Duration,
}

impl RunDriver {
    pub fn new(watchers: Vec<Watcher>, output: OutputConfig, request_delay: Duration) -> Self {
        Self {
            watchers,
            output,
            request_delay,
        }
    }

    /// Build one watcher per configured target.
    ///
    /// The browser is only launched when a target asks for it; its session is
    /// shared by those targets and ends when the driver is dropped. If it
    /// cannot be launched, only the browser targets fail.
    pub fn from_config(config: &AppConfig, registry: &ExtractorRegistry) -> Result<Self> {
        let http: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config.scraper)?);
        let browser: Option<Arc<dyn Fetcher>> = if config.needs_browser() {
            let browser: Arc<dyn Fetcher> = match BrowserFetcher::launch(&config.scraper) {
                Ok(browser) => Arc::new(browser),
                Err(e) => {
                    tracing::error!(error = %e, "Browser unavailable; browser targets will fail");
                    Arc::new(UnavailableFetcher::new(e))
                }
            };
            Some(browser)
        } else {
            None
        };

        let mut watchers = Vec::with_capacity(config.targets.len());
        for target in &config.targets {
            let extractor = registry.get(&target.extractor).inspect_err(|_| {
                tracing::error!(
                    description = %target.description,
                    extractor = %target.extractor,
                    available = ?registry.names(),
                    "Unknown extractor"
                );
            })?;
            let fetcher = match (target.fetcher, &browser) {
                (FetchStrategy::Browser, Some(browser)) => Arc::clone(browser),
                _ => Arc::clone(&http),
            };
            watchers.push(Watcher::new(target.clone(), extractor, fetcher));
        }

        Ok(Self::new(
            watchers,
            config.output.clone(),
            config.scraper.request_delay(),
        ))
    }

    pub fn watchers(&self) -> &[Watcher] {
        &self.watchers
    }

    pub async fn run(self) -> Result<RunReport> {
        let run_timestamp = Local::now().naive_local();
        self.run_at(run_timestamp).await
    }

    /// Observe every watcher with the given run timestamp.
    ///
    /// A failing watcher is logged and skipped. Only writing the output can
    /// fail the run; an empty run still writes an (empty) file.
    pub async fn run_at(self, run_timestamp: NaiveDateTime) -> Result<RunReport> {
        tracing::info!(watchers = self.watchers.len(), "Starting run");

        let mut run_output = RunOutput::new(run_timestamp);
        let mut failures = Vec::new();
        let mut watchers_succeeded = 0;

        for (index, watcher) in self.watchers.iter().enumerate() {
            if index > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            match watcher.observe(run_timestamp).await {
                Ok(records) => {
                    tracing::info!(
                        description = %watcher.description(),
                        rows = records.len(),
                        "Watcher succeeded"
                    );
                    watchers_succeeded += 1;
                    run_output.extend(records);
                }
                Err(e) => {
                    tracing::error!(
                        description = %watcher.description(),
                        error = %e,
                        "Watcher failed"
                    );
                    failures.push(WatcherFailure {
                        description: watcher.description().to_string(),
                        url: watcher.target().url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if run_output.is_empty() {
            tracing::warn!("No records collected; writing empty output");
        }

        let output_path = output::write_output(&self.output, &run_output).await?;

        Ok(RunReport {
            run_timestamp,
            output_path,
            records_written: run_output.len(),
            watchers_succeeded,
            failures,
        })
    }
}
