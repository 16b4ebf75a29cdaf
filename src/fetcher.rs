use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::config::ScraperConfig;
use crate::utils::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    /// Element to wait for before the content is considered loaded.
    /// Only meaningful for client-rendered pages.
    pub wait_for: Option<String>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            wait_for: None,
        }
    }

    pub fn wait_for(mut self, selector: Option<String>) -> Self {
        self.wait_for = selector;
        self
    }
}

/// Loads a page and returns its raw content for an extractor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<String>;
}

/// Plain GET. Only works when the data is in the server response.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String> {
        let start_time = std::time::Instant::now();
        let response = self.client.get(&request.url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: request.url.clone(),
            });
        }

        let body = response.text().await?;
        tracing::debug!(
            url = %request.url,
            bytes = body.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

/// Drives one headless Chrome session for the whole run.
///
/// The browser process is shut down when the fetcher is dropped.
pub struct BrowserFetcher {
    browser: Browser,
    user_agent: String,
    wait_timeout: Duration,
}

impl BrowserFetcher {
    pub fn launch(config: &ScraperConfig) -> Result<Self> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false) // Often needed in containerized environments
            .window_size(Some((1920, 1080)))
            .args(vec![
                std::ffi::OsStr::new("--no-sandbox"),
                std::ffi::OsStr::new("--disable-dev-shm-usage"),
                std::ffi::OsStr::new("--disable-gpu"),
                std::ffi::OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| AppError::Browser(format!("Failed to create launch options: {}", e)))?;

        if let Some(chrome_path) = &config.chrome_path {
            launch_options.path = Some(std::path::PathBuf::from(chrome_path));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| AppError::Browser(format!("Failed to launch browser: {}", e)))?;
        tracing::info!("Launched headless browser");

        Ok(Self {
            browser,
            user_agent: config.user_agent.clone(),
            wait_timeout: config.wait_timeout(),
        })
    }

    fn render(&self, request: &FetchRequest) -> Result<String> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| AppError::Browser(format!("Failed to create tab: {}", e)))?;

        let content = self.load(&tab, request);

        // Close tab to free resources, whatever the outcome
        let _ = tab.close(true);
        content
    }

    fn load(&self, tab: &Tab, request: &FetchRequest) -> Result<String> {
        tab.set_user_agent(&self.user_agent, None, None)
            .map_err(|e| AppError::Browser(format!("Failed to set user agent: {}", e)))?;

        tab.navigate_to(&request.url)
            .map_err(|e| AppError::Browser(format!("Navigation failed: {}", e)))?;
        tab.wait_until_navigated()
            .map_err(|e| AppError::Browser(format!("Page load failed: {}", e)))?;

        if let Some(selector) = &request.wait_for {
            tab.wait_for_element_with_custom_timeout(selector, self.wait_timeout)
                .map_err(|e| wait_error(selector, e))?;
        }

        tab.get_content()
            .map_err(|e| AppError::Browser(format!("Failed to get page content: {}", e)))
    }
}

#[async_trait]
impl Fetcher for BrowserFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String> {
        let start_time = std::time::Instant::now();
        let content = self.render(request)?;
        tracing::debug!(
            url = %request.url,
            bytes = content.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Rendered page"
        );
        Ok(content)
    }
}

/// Only an expired wait means the element is missing; anything else is the
/// browser failing underneath us.
fn wait_error(selector: &str, error: anyhow::Error) -> AppError {
    if error.is::<headless_chrome::util::Timeout>() {
        AppError::NotFound {
            selector: selector.to_string(),
        }
    } else {
        AppError::Browser(format!("Waiting for {} failed: {}", selector, error))
    }
}

/// Stands in for a browser that could not be launched.
///
/// Every fetch fails with the launch error, so browser targets fail one by one
/// while the rest of the run goes ahead.
pub struct UnavailableFetcher {
    reason: String,
}

impl UnavailableFetcher {
    pub fn new(error: AppError) -> Self {
        let reason = match error {
            AppError::Browser(message) => message,
            other => other.to_string(),
        };
        Self { reason }
    }
}

#[async_trait]
impl Fetcher for UnavailableFetcher {
    async fn fetch(&self, _request: &FetchRequest) -> Result<String> {
        Err(AppError::Browser(self.reason.clone()))
    }
}
