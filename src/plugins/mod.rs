pub mod traits;
pub mod manager;
pub mod extractors;

pub use manager::ExtractorRegistry;
pub use traits::Extractor;
