pub mod config;
pub mod fetcher;
pub mod models;
pub mod output;
pub mod plugins;
pub mod runner;
pub mod utils;
pub mod watcher;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
