use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::models::{FetchStrategy, WatchTarget};

/// The configuration is compiled into the binary; runs take no arguments.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
    pub targets: Vec<WatchTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub user_agent: String,
    pub request_timeout: u64,
    pub wait_timeout: u64,
    pub request_delay_ms: u64,
    pub chrome_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl ScraperConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl AppConfig {
    /// Load the compiled-in configuration.
    pub fn load() -> crate::Result<Self> {
        Ok(Self::from_toml(DEFAULT_CONFIG)?)
    }

    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate scraper configuration
        if self.scraper.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("Scraper user_agent must not be empty".into()));
        }

        if self.scraper.request_timeout == 0 {
            return Err(ConfigError::Message("Scraper request_timeout must be greater than 0".into()));
        }

        if self.scraper.wait_timeout == 0 {
            return Err(ConfigError::Message("Scraper wait_timeout must be greater than 0".into()));
        }

        // Validate output configuration
        if self.output.directory.as_os_str().is_empty() {
            return Err(ConfigError::Message("Output directory must not be empty".into()));
        }

        // Validate targets
        if self.targets.is_empty() {
            return Err(ConfigError::Message("At least one target must be configured".into()));
        }

        for target in &self.targets {
            self.validate_target(target)?;
        }

        Ok(())
    }

    fn validate_target(&self, target: &WatchTarget) -> Result<(), ConfigError> {
        match Url::parse(&target.url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => {
                return Err(ConfigError::Message(format!("Invalid target URL: {}", target.url)));
            }
        }

        if target.description.trim().is_empty() {
            return Err(ConfigError::Message(format!(
                "Target description must not be empty: {}",
                target.url
            )));
        }

        if target.extractor.trim().is_empty() {
            return Err(ConfigError::Message(format!(
                "Target extractor must not be empty: {}",
                target.description
            )));
        }

        Ok(())
    }

    /// Whether any target needs a browser session.
    pub fn needs_browser(&self) -> bool {
        self.targets
            .iter()
            .any(|target| target.fetcher == FetchStrategy::Browser)
    }
}
