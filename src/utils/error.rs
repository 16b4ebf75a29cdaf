use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parse { message: String },

    #[error("Element not found: {selector}")]
    NotFound { selector: String },

    #[error("No priced rows extracted from {url}")]
    NoPrices { url: String },

    #[error("Unknown extractor: {0}")]
    UnknownExtractor(String),

    #[error("{description}: {source}")]
    Watcher {
        description: String,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Attach the watcher description to an error raised while observing it.
    pub fn watcher(description: impl Into<String>, source: AppError) -> Self {
        AppError::Watcher {
            description: description.into(),
            source: Box::new(source),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        AppError::Parse {
            message: message.into(),
        }
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
