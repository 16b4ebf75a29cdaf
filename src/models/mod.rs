use serde::{Deserialize, Serialize};

pub mod record;
pub mod target;

// Re-exports for convenience
pub use record::*;
pub use target::*;

/// How a target's page is loaded before extraction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// Plain GET; the data must be present in the server response.
    #[default]
    Http,
    /// Headless Chrome; for client-rendered pages.
    Browser,
}
